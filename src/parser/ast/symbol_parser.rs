use crate::parser::{ast::StringParser, ParseError, QueryParser};

/// Identifiers: `[A-Za-z$_][0-9A-Za-z$_]*`, or a `"quoted"` symbol string.
pub struct SymbolParser;

impl SymbolParser {
    pub fn is_symbol_start(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
    }

    pub fn is_symbol_part(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
    }

    pub fn is_symbol(parser: &QueryParser) -> bool {
        !parser.eof() && Self::is_symbol_start(parser.current())
    }

    /// Plain identifier. `Ok(None)` leaves the cursor untouched.
    pub fn parse(parser: &mut QueryParser) -> Result<Option<String>, ParseError> {
        if !Self::is_symbol(parser) {
            return Ok(None);
        }

        let pivot = parser.position;
        while !parser.eof() && Self::is_symbol_part(parser.current()) {
            parser.next();
        }

        if !parser.is_word_boundary(parser.position) {
            return ParseError::new("Invalid identifier", pivot, parser).err();
        }

        Ok(Some(parser.text_from_pivot(pivot)))
    }

    /// Identifier or quoted symbol string, i.e. one segment of a dotted name.
    pub fn parse_segment(parser: &mut QueryParser) -> Result<Option<String>, ParseError> {
        if StringParser::is_symbol_delimiter(parser) {
            return StringParser::parse_symbol(parser).map(Some);
        }
        Self::parse(parser)
    }
}
