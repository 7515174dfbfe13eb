use crate::parser::{ast::SymbolParser, ParseError, QueryParser};

pub struct ParamParser;

impl ParamParser {
    pub fn is_param(parser: &QueryParser) -> bool {
        parser.current() == ':' && SymbolParser::is_symbol_start(parser.peek(1))
    }

    /// `:name` placeholder, returning the name without the colon.
    pub fn parse(parser: &mut QueryParser) -> Result<String, ParseError> {
        let pivot = parser.position;
        if !Self::is_param(parser) {
            return ParseError::new("Invalid Parameter", pivot, parser).err();
        }
        parser.next();

        match SymbolParser::parse(parser)? {
            Some(name) => Ok(name),
            None => ParseError::new("Invalid Parameter", pivot, parser).err(),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use crate::parser::{ast::ParamParser, QueryParser};

    #[test]
    pub fn test_param_parser() {
        let text = ":accountId";

        let mut parser = QueryParser::new(text);

        let result = ParamParser::parse(&mut parser).expect("Failed to parse parameter");

        assert_eq!(result, "accountId");
        assert!(parser.eof());
    }

    #[test]
    pub fn test_param_parser_delimiter() {
        let text = ":p1)";

        let mut parser = QueryParser::new(text);

        let result = ParamParser::parse(&mut parser).expect("Failed to parse parameter");

        assert_eq!(result, "p1");
        assert_eq!(parser.current(), ')');
    }

    #[test]
    pub fn test_param_parser_without_name() {
        let text = ": x";

        let mut parser = QueryParser::new(text);

        match ParamParser::parse(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.start, 0),
        }
    }
}
