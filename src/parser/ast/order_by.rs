use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::parser::{ast::{DottedNameParser, FieldInfo}, ParseError, QueryParser};

const ORDER_BY_ERROR: &str = "Unexpected token aheads near by the 'order by' clause";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderByInfo {
    pub field: FieldInfo,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub desc: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nulls_last: bool,
}

impl OrderByInfo {
    pub fn parse_single(parser: &mut QueryParser) -> Result<Self, ParseError> {
        parser.next_non_whitespace()?;
        if parser.is_reserved_ahead() {
            return ParseError::new(ORDER_BY_ERROR, parser.position, parser).err();
        }

        let Some(name) = DottedNameParser::parse(parser)? else {
            return ParseError::new(ORDER_BY_ERROR, parser.position, parser).err();
        };
        let mut order = OrderByInfo { field: FieldInfo::field(name), ..Default::default() };

        // cursor stays right after the last token that belongs to this item
        let mut end = parser.position;

        parser.next_non_whitespace()?;
        if parser.consume_keyword(|keywords| &keywords.desc) {
            order.desc = true;
            end = parser.position;
        } else if parser.consume_keyword(|keywords| &keywords.asc) {
            end = parser.position;
        }
        parser.rewind(end);

        parser.next_non_whitespace()?;
        if parser.consume_keyword(|keywords| &keywords.nulls_last) {
            order.nulls_last = true;
            end = parser.position;
        } else if parser.consume_keyword(|keywords| &keywords.nulls_first) {
            end = parser.position;
        }
        parser.rewind(end);

        Ok(order)
    }

    /// Sort keys after the ORDER BY keyword.
    pub fn parse(parser: &mut QueryParser) -> Result<Vec<Self>, ParseError> {
        let mut orders = vec![Self::parse_single(parser)?];

        loop {
            let pivot = parser.position;
            parser.next_non_whitespace()?;
            if !parser.consume_char(',') {
                parser.rewind(pivot);
                return Ok(orders);
            }
            orders.push(Self::parse_single(parser)?);
        }
    }
}

impl Display for OrderByInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field)?;
        if self.desc {
            write!(f, " DESC")?;
        }
        if self.nulls_last {
            write!(f, " NULLS LAST")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::OrderByInfo, QueryParser};

    #[test]
    pub fn test_order_by_single() {
        let mut parser = QueryParser::new("tableA.columnA");

        let result = OrderByInfo::parse_single(&mut parser).expect("Failed to parse order by");

        assert!(!result.desc);
        assert!(!result.nulls_last);
        assert_eq!(result.field.name(), Some(&["tableA".to_string(), "columnA".to_string()][..]));
    }

    #[test]
    pub fn test_order_by_direction_and_nulls() {
        let mut parser = QueryParser::new("a DESC NULLS LAST, b asc nulls first, c nulls last, d LIMIT 1");

        let result = OrderByInfo::parse(&mut parser).expect("Failed to parse order by");

        assert_eq!(result.len(), 4);
        assert!(result[0].desc && result[0].nulls_last);
        assert!(!result[1].desc && !result[1].nulls_last);
        assert!(!result[2].desc && result[2].nulls_last);
        assert!(!result[3].desc && !result[3].nulls_last);
        assert_eq!(parser.text_from_range(parser.position, parser.length), " LIMIT 1");
    }

    #[test]
    pub fn test_order_by_keeps_cursor_after_direction() {
        let mut parser = QueryParser::new("a desc  ");

        OrderByInfo::parse_single(&mut parser).expect("Failed to parse order by");

        assert_eq!(parser.position, 6);
    }

    #[test]
    pub fn test_order_by_missing_field() {
        let mut parser = QueryParser::new("a, LIMIT 1");

        match OrderByInfo::parse(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.message, "Unexpected token aheads near by the 'order by' clause"),
        }
    }

    #[test]
    pub fn test_order_by_display() {
        let mut parser = QueryParser::new("acc.Name desc nulls last");

        let result = OrderByInfo::parse_single(&mut parser).expect("Failed to parse order by");

        assert_eq!(result.to_string(), "acc.Name DESC NULLS LAST");
    }
}
