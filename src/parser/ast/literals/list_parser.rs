use crate::parser::{ast::{Literal, LiteralParser}, ParseError, QueryParser};

pub struct ListParser;

impl ListParser {
    /// `( value, value, ... )` with at least one value.
    pub fn parse(parser: &mut QueryParser) -> Result<Literal, ParseError> {
        let pivot = parser.position;
        parser.expect_char('(', "'(' is expected")?;
        parser.enter_nesting()?;

        let mut items = vec![];
        loop {
            parser.next_non_whitespace()?;
            match LiteralParser::parse(parser)? {
                Some(item) => items.push(item),
                None => return ParseError::new("A literal value is expected in the list", pivot, parser).err(),
            }
            parser.next_non_whitespace()?;

            if parser.consume_char(',') {
                continue;
            }
            if parser.consume_char(')') {
                break;
            }
            return ParseError::new("')' is expected", pivot, parser).err();
        }

        parser.leave_nesting();
        Ok(Literal::List(items))
    }
}

#[cfg(test)]
pub mod tests {
    use crate::parser::{ast::{ListItem, ListParser, Literal}, QueryParser};

    #[test]
    pub fn test_list_parser() {
        let text = "( 'a', 2 ,:p, TODAY)";

        let mut parser = QueryParser::new(text);

        let result = ListParser::parse(&mut parser).expect("Failed to parse list");

        match result {
            Literal::List(items) => {
                assert_eq!(items.len(), 4);
                assert_eq!(items[0], ListItem::Literal(Literal::String("a".into())));
                assert_eq!(items[1], ListItem::Literal(Literal::Int(2)));
                assert_eq!(items[2], ListItem::Parameter("p".into()));
            },
            _ => panic!(),
        }
        assert!(parser.eof());
    }

    #[test]
    pub fn test_list_parser_missing_close() {
        let text = "('a', 'b'";

        let mut parser = QueryParser::new(text);

        match ListParser::parse(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.message, "')' is expected"),
        }
    }

    #[test]
    pub fn test_list_parser_rejects_field() {
        let text = "(Name)";

        let mut parser = QueryParser::new(text);

        assert!(ListParser::parse(&mut parser).is_err());
    }
}
