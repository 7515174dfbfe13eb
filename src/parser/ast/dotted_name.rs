use crate::parser::{ast::SymbolParser, ParseError, QueryParser};

/// `segment ( . segment )*`, where a segment is an identifier or a quoted symbol.
/// Names are left unqualified; resolution happens during normalization.
pub struct DottedNameParser;

impl DottedNameParser {
    /// `Ok(None)` leaves the cursor untouched.
    pub fn parse(parser: &mut QueryParser) -> Result<Option<Vec<String>>, ParseError> {
        let pivot = parser.position;
        let Some(first) = SymbolParser::parse_segment(parser)? else {
            return Ok(None);
        };

        let mut name = vec![first];
        loop {
            let before_dot = parser.position;
            parser.next_non_whitespace()?;
            if !parser.consume_char('.') {
                parser.rewind(before_dot);
                break;
            }
            parser.next_non_whitespace()?;
            match SymbolParser::parse_segment(parser)? {
                Some(segment) => name.push(segment),
                None => return ParseError::new("A name is expected after '.'", pivot, parser).err(),
            }
        }

        Ok(Some(name))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::DottedNameParser, QueryParser};

    #[test]
    pub fn test_single_segment() {
        let mut parser = QueryParser::new("Contact con");

        let result = DottedNameParser::parse(&mut parser).expect("Failed to parse name");

        assert_eq!(result, Some(vec!["Contact".to_string()]));
        assert_eq!(parser.position, 7);
    }

    #[test]
    pub fn test_dotted_with_spaces_and_quotes() {
        let mut parser = QueryParser::new("con . \"Account\".Name ,");

        let result = DottedNameParser::parse(&mut parser).expect("Failed to parse name");

        assert_eq!(result, Some(vec!["con".to_string(), "Account".to_string(), "Name".to_string()]));
        assert_eq!(parser.current(), ' ');
    }

    #[test]
    pub fn test_trailing_dot() {
        let mut parser = QueryParser::new("con. ,");

        match DottedNameParser::parse(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.start, 0),
        }
    }

    #[test]
    pub fn test_not_a_name() {
        let mut parser = QueryParser::new("(x)");

        assert_eq!(DottedNameParser::parse(&mut parser).expect("No error expected"), None);
    }
}
