use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::{ast::Literal, ParseError, QueryParser};

static RADIX_INTEGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?)0([bBoOxX])([0-9a-fA-F]+)").expect("valid radix integer pattern")
});

static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.[0-9]*(?:[eE][+-]?[0-9]+)?|\.[0-9]+(?:[eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+)")
        .expect("valid float pattern")
});

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+").expect("valid integer pattern"));

pub struct NumberParser;

impl NumberParser {
    pub fn is_number(parser: &QueryParser) -> bool {
        let current = parser.current();
        let next = parser.peek(1);
        current.is_ascii_digit()
            || ((current == '+' || current == '-' || current == '.') && (next.is_ascii_digit() || next == '.'))
            || Self::special_length(parser).is_some()
    }

    fn special_length(parser: &QueryParser) -> Option<(usize, f64)> {
        let comparers = &parser.comparers;
        if let Some(length) = comparers.positive_infinity.match_length(parser) {
            return Some((length, f64::INFINITY));
        }
        if let Some(length) = comparers.negative_infinity.match_length(parser) {
            return Some((length, f64::NEG_INFINITY));
        }
        if let Some(length) = comparers.infinity.match_length(parser) {
            return Some((length, f64::INFINITY));
        }
        comparers.nan.match_length(parser).map(|length| (length, f64::NAN))
    }

    /// Returns `Ok(None)` without moving the cursor when no number starts here.
    pub fn parse(parser: &mut QueryParser) -> Result<Option<Literal>, ParseError> {
        let pivot = parser.position;

        if let Some((length, value)) = Self::special_length(parser) {
            parser.jump(length);
            return Ok(Some(Literal::float(value)));
        }

        if !Self::is_number(parser) {
            return Ok(None);
        }

        let matched: Option<(usize, Result<Literal, &'static str>)> = {
            let rest = parser.rest();
            if let Some(captures) = RADIX_INTEGER.captures(rest) {
                let radix = match captures[2].to_ascii_lowercase().as_str() {
                    "b" => 2,
                    "o" => 8,
                    _ => 16,
                };
                let text = format!("{}{}", &captures[1], &captures[3]);
                let value = i64::from_str_radix(&text, radix)
                    .map(Literal::Int)
                    .map_err(|_| "Invalid integer literal");
                Some((captures[0].len(), value))
            } else if let Some(found) = FLOAT.find(rest) {
                let value = found.as_str().parse::<f64>()
                    .map(Literal::float)
                    .map_err(|_| "Invalid float literal");
                Some((found.as_str().len(), value))
            } else {
                INTEGER.find(rest).map(|found| {
                    let value = found.as_str().parse::<i64>()
                        .map(Literal::Int)
                        .map_err(|_| "Invalid integer literal");
                    (found.as_str().len(), value)
                })
            }
        };

        let Some((length, value)) = matched else {
            return Ok(None);
        };
        parser.jump_bytes(length);
        let literal = match value {
            Ok(literal) => literal,
            Err(message) => return ParseError::new(message, pivot, parser).err(),
        };

        if !parser.is_word_boundary(parser.position) {
            return ParseError::new("Invalid number literal", pivot, parser).err();
        }

        Ok(Some(literal))
    }
}
