use crate::parser::{ParseError, QueryParser, WordComparer};

const UNTERMINATED: &str = "An unexpected termination has appeared in the string literal.";
const UNEXPECTED_NEWLINE: &str = "An unexpected newline has appeared in the string literal.";

/// Quoted text: `'...'` string literals may span lines, `"..."` symbol
/// strings (quoted identifiers) may not.
pub struct StringParser;

impl StringParser {
    pub fn is_string_delimiter(parser: &QueryParser) -> bool {
        parser.current() == '\'' && !parser.eof()
    }

    pub fn is_symbol_delimiter(parser: &QueryParser) -> bool {
        parser.current() == '"' && !parser.eof()
    }

    pub fn parse(parser: &mut QueryParser) -> Result<String, ParseError> {
        Self::parse_quoted(parser, '\'', true)
    }

    pub fn parse_symbol(parser: &mut QueryParser) -> Result<String, ParseError> {
        Self::parse_quoted(parser, '"', false)
    }

    fn parse_quoted(parser: &mut QueryParser, quote: char, multiline: bool) -> Result<String, ParseError> {
        let pivot = parser.position;
        if parser.eof() || parser.current() != quote {
            return ParseError::new("Invalid string value", pivot, parser).err();
        }
        parser.next();

        let mut value = String::new();
        loop {
            if parser.eof() {
                return ParseError::new(UNTERMINATED, pivot, parser).err();
            }

            let current = parser.current();
            if current == quote {
                parser.next();
                return Ok(value);
            }

            if current == '\\' {
                Self::parse_escape(parser, &mut value, pivot)?;
                continue;
            }

            if !multiline && WordComparer::is_break_line(current) {
                return ParseError::new(UNEXPECTED_NEWLINE, pivot, parser).err();
            }

            value.push(current);
            parser.next();
        }
    }

    fn parse_escape(parser: &mut QueryParser, value: &mut String, pivot: usize) -> Result<(), ParseError> {
        parser.next();
        if parser.eof() {
            return ParseError::new(UNTERMINATED, pivot, parser).err();
        }

        let current = parser.current();
        let escaped = match current {
            '\\' | '\'' | '"' | '`' => current,
            'n' | 'N' => '\n',
            'r' | 'R' => '\r',
            'v' | 'V' => '\u{0b}',
            't' | 'T' => '\t',
            'b' | 'B' => '\u{08}',
            'f' | 'F' => '\u{0c}',
            // kept escaped so LIKE patterns can match them literally
            '_' | '%' => {
                value.push('\\');
                current
            },
            'u' | 'U' => {
                parser.next();
                if parser.consume_char('{') {
                    let code = Self::read_code_point(parser, 1, 6, 16, pivot)?;
                    if !parser.consume_char('}') {
                        return ParseError::new("Invalid unicode escape sequence in the string literal.", pivot, parser).err();
                    }
                    value.push(code);
                } else {
                    value.push(Self::read_code_point(parser, 4, 4, 16, pivot)?);
                }
                return Ok(());
            },
            'x' | 'X' => {
                parser.next();
                value.push(Self::read_code_point(parser, 2, 2, 16, pivot)?);
                return Ok(());
            },
            '0'..='7' => {
                value.push(Self::read_code_point(parser, 3, 3, 8, pivot)?);
                return Ok(());
            },
            _ => return ParseError::new("Invalid escape sequence in the string literal.", pivot, parser).err(),
        };

        value.push(escaped);
        parser.next();
        Ok(())
    }

    fn read_code_point(parser: &mut QueryParser, min: usize, max: usize, radix: u32, pivot: usize) -> Result<char, ParseError> {
        let mut digits = String::new();
        while digits.len() < max && parser.current().is_digit(radix) && !parser.eof() {
            digits.push(parser.current());
            parser.next();
        }

        if digits.len() < min {
            return ParseError::new("Invalid escape sequence in the string literal.", pivot, parser).err();
        }

        match u32::from_str_radix(&digits, radix).ok().and_then(char::from_u32) {
            Some(code) => Ok(code),
            None => ParseError::new("Invalid code point in the string literal.", pivot, parser).err(),
        }
    }
}
