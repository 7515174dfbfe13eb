use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::parser::{ParseError, QueryComparers, QueryParser, WordComparer};

const FOR_ERROR: &str = "Unexpected token aheads near by the 'for' clause";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForClause {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub view: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub reference: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub update: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub update_tracking: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub update_viewstat: bool,
}

type Keyword = fn(&QueryComparers) -> &WordComparer;

impl ForClause {
    pub fn is_empty(&self) -> bool {
        *self == ForClause::default()
    }

    /// Options after the FOR keyword:
    /// `VIEW[, REFERENCE]`, `REFERENCE[, VIEW]` or
    /// `UPDATE [TRACKING[, VIEWSTAT] | VIEWSTAT[, TRACKING]]`.
    pub fn parse(parser: &mut QueryParser) -> Result<Self, ParseError> {
        let pivot = parser.position;
        parser.expect_whitespace(FOR_ERROR)?;
        let mut clause = ForClause::default();

        if parser.consume_keyword(|keywords| &keywords.view) {
            clause.view = true;
            clause.reference = Self::parse_partner(parser, |keywords| &keywords.reference)?;
        } else if parser.consume_keyword(|keywords| &keywords.reference) {
            clause.reference = true;
            clause.view = Self::parse_partner(parser, |keywords| &keywords.view)?;
        } else if parser.consume_keyword(|keywords| &keywords.update) {
            clause.update = true;

            let before = parser.position;
            parser.next_non_whitespace()?;
            if parser.consume_keyword(|keywords| &keywords.tracking) {
                clause.update_tracking = true;
                clause.update_viewstat = Self::parse_partner(parser, |keywords| &keywords.viewstat)?;
            } else if parser.consume_keyword(|keywords| &keywords.viewstat) {
                clause.update_viewstat = true;
                clause.update_tracking = Self::parse_partner(parser, |keywords| &keywords.tracking)?;
            } else {
                parser.rewind(before);
            }
        } else {
            return ParseError::new(FOR_ERROR, pivot, parser).err();
        }

        Ok(clause)
    }

    /// Optional `, KEYWORD` completing a pair.
    fn parse_partner(parser: &mut QueryParser, partner: Keyword) -> Result<bool, ParseError> {
        let before = parser.position;
        parser.next_non_whitespace()?;
        if !parser.consume_char(',') {
            parser.rewind(before);
            return Ok(false);
        }

        parser.next_non_whitespace()?;
        if !parser.consume_keyword(partner) {
            return ParseError::new(FOR_ERROR, before, parser).err();
        }
        Ok(true)
    }
}

impl Display for ForClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut options = vec![];
        if self.view {
            options.push("VIEW");
        }
        if self.reference {
            options.push("REFERENCE");
        }
        if self.update {
            options.push("UPDATE");
        }

        let mut update_options = vec![];
        if self.update_tracking {
            update_options.push("TRACKING");
        }
        if self.update_viewstat {
            update_options.push("VIEWSTAT");
        }

        write!(f, "FOR {}", options.join(", "))?;
        if !update_options.is_empty() {
            write!(f, " {}", update_options.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::ForClause, QueryParser};

    fn parse(text: &str) -> ForClause {
        let mut parser = QueryParser::new(text);
        ForClause::parse(&mut parser).expect("Failed to parse for clause")
    }

    #[test]
    pub fn test_for_view_and_reference() {
        let expected = ForClause { view: true, reference: true, ..Default::default() };

        assert_eq!(parse(" VIEW, REFERENCE"), expected);
        assert_eq!(parse(" reference ,view"), expected);
        assert_eq!(parse(" view"), ForClause { view: true, ..Default::default() });
    }

    #[test]
    pub fn test_for_update() {
        assert_eq!(parse(" UPDATE"), ForClause { update: true, ..Default::default() });

        let all = ForClause { update: true, update_tracking: true, update_viewstat: true, ..Default::default() };
        assert_eq!(parse(" update tracking, viewstat"), all);
        assert_eq!(parse(" UPDATE VIEWSTAT , TRACKING"), all);
        assert_eq!(all.to_string(), "FOR UPDATE TRACKING, VIEWSTAT");
    }

    #[test]
    pub fn test_for_update_leaves_trailing_input() {
        let mut parser = QueryParser::new(" UPDATE )");

        ForClause::parse(&mut parser).expect("Failed to parse for clause");

        assert_eq!(parser.position, 7);
    }

    #[test]
    pub fn test_bare_for() {
        for text in ["", " ", " something", " VIEW, UPDATE"] {
            let mut parser = QueryParser::new(text);
            match ForClause::parse(&mut parser) {
                Ok(_) => panic!("{text:?} should fail"),
                Err(err) => assert_eq!(err.message, "Unexpected token aheads near by the 'for' clause"),
            }
        }
    }
}
