use crate::parser::{
    ast::{DateLiteralParser, DateParser, ListItem, Literal, NumberParser, ParamParser, StringParser},
    ParseError, QueryParser,
};

pub struct LiteralParser;

impl LiteralParser {
    /// Any single literal value: datetime, date, time, number, string,
    /// boolean, null, `:param` or a date keyword, in that order.
    /// `Ok(None)` leaves the cursor untouched.
    pub fn parse(parser: &mut QueryParser) -> Result<Option<ListItem>, ParseError> {
        if let Some(literal) = DateParser::parse(parser)? {
            return Ok(Some(ListItem::Literal(literal)));
        }

        if let Some(literal) = NumberParser::parse(parser)? {
            return Ok(Some(ListItem::Literal(literal)));
        }

        if StringParser::is_string_delimiter(parser) {
            return Ok(Some(ListItem::Literal(Literal::String(StringParser::parse(parser)?))));
        }

        if parser.consume_keyword(|keywords| &keywords.b_true) {
            return Ok(Some(ListItem::Literal(Literal::Bool(true))));
        }

        if parser.consume_keyword(|keywords| &keywords.b_false) {
            return Ok(Some(ListItem::Literal(Literal::Bool(false))));
        }

        if parser.consume_keyword(|keywords| &keywords.null) {
            return Ok(Some(ListItem::Literal(Literal::Null)));
        }

        if ParamParser::is_param(parser) {
            return Ok(Some(ListItem::Parameter(ParamParser::parse(parser)?)));
        }

        Ok(DateLiteralParser::parse(parser)?.map(ListItem::DateTimeLiteral))
    }
}

#[cfg(test)]
pub mod tests {
    use crate::parser::{ast::{ListItem, Literal, LiteralParser}, QueryParser};

    fn parse(text: &str) -> Option<ListItem> {
        let mut parser = QueryParser::new(text);
        LiteralParser::parse(&mut parser).expect("Failed to parse literal")
    }

    #[test]
    pub fn test_literal_kinds() {
        assert_eq!(parse("42"), Some(ListItem::Literal(Literal::Int(42))));
        assert_eq!(parse("'x'"), Some(ListItem::Literal(Literal::String("x".into()))));
        assert_eq!(parse("TRUE"), Some(ListItem::Literal(Literal::Bool(true))));
        assert_eq!(parse("false"), Some(ListItem::Literal(Literal::Bool(false))));
        assert_eq!(parse("Null"), Some(ListItem::Literal(Literal::Null)));
        assert_eq!(parse(":p"), Some(ListItem::Parameter("p".into())));
    }

    #[test]
    pub fn test_literal_date_before_number() {
        match parse("2020-01-01") {
            Some(ListItem::Literal(Literal::Date(_))) => {},
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_literal_date_keyword() {
        match parse("THIS_WEEK") {
            Some(ListItem::DateTimeLiteral(literal)) => assert_eq!(literal.name, "THIS_WEEK"),
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_identifier_is_not_literal() {
        assert_eq!(parse("Name"), None);
        assert_eq!(parse("trueValue"), None);
        assert_eq!(parse("nullable"), None);
    }
}
