use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::parser::{ast::{NumberParser, Literal, ParamParser}, ParseError, QueryParser};

/// Row bound of OFFSET or LIMIT: a literal count or a `:param` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowBound {
    Value(i64),
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "OffsetAndLimitWire", into = "OffsetAndLimitWire")]
pub struct OffsetAndLimit {
    pub offset: Option<RowBound>,
    pub limit: Option<RowBound>,
}

/// Flat wire shape: a bound is either a count or a parameter name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct OffsetAndLimitWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset_param_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit_param_name: Option<String>,
}

fn split_bound(bound: Option<RowBound>) -> (Option<i64>, Option<String>) {
    match bound {
        Some(RowBound::Value(value)) => (Some(value), None),
        Some(RowBound::Param(name)) => (None, Some(name)),
        None => (None, None),
    }
}

fn join_bound(value: Option<i64>, param_name: Option<String>) -> Option<RowBound> {
    param_name.map(RowBound::Param).or(value.map(RowBound::Value))
}

impl From<OffsetAndLimit> for OffsetAndLimitWire {
    fn from(clause: OffsetAndLimit) -> Self {
        let (offset, offset_param_name) = split_bound(clause.offset);
        let (limit, limit_param_name) = split_bound(clause.limit);
        Self { offset, limit, offset_param_name, limit_param_name }
    }
}

impl From<OffsetAndLimitWire> for OffsetAndLimit {
    fn from(wire: OffsetAndLimitWire) -> Self {
        Self {
            offset: join_bound(wire.offset, wire.offset_param_name),
            limit: join_bound(wire.limit, wire.limit_param_name),
        }
    }
}

impl OffsetAndLimit {
    pub fn is_empty(&self) -> bool {
        self.offset.is_none() && self.limit.is_none()
    }

    /// Parameter names referenced by either bound.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        [&self.offset, &self.limit].into_iter().filter_map(|bound| match bound {
            Some(RowBound::Param(name)) => Some(name.as_str()),
            _ => None,
        })
    }
}

pub struct LimitAndOffsetParser;

impl LimitAndOffsetParser {
    fn parse_bound(parser: &mut QueryParser, clause: &str) -> Result<RowBound, ParseError> {
        let message = format!("Unexpected token aheads near by the '{}' clause", clause);
        parser.expect_whitespace(&message)?;

        if ParamParser::is_param(parser) {
            return Ok(RowBound::Param(ParamParser::parse(parser)?));
        }

        let pivot = parser.position;
        match NumberParser::parse(parser)? {
            Some(Literal::Int(value)) if value >= 0 => Ok(RowBound::Value(value)),
            _ => ParseError::new(&message, pivot, parser).err(),
        }
    }

    /// `OFFSET n [LIMIT m]` or `LIMIT m [OFFSET n]`. Returns an empty
    /// structure and leaves the cursor untouched when neither keyword is ahead.
    pub fn parse(parser: &mut QueryParser) -> Result<OffsetAndLimit, ParseError> {
        let mut result = OffsetAndLimit::default();

        for _ in 0..2 {
            let pivot = parser.position;
            parser.next_non_whitespace()?;

            if result.offset.is_none() && parser.consume_keyword(|keywords| &keywords.offset) {
                result.offset = Some(Self::parse_bound(parser, "offset")?);
            } else if result.limit.is_none() && parser.consume_keyword(|keywords| &keywords.limit) {
                result.limit = Some(Self::parse_bound(parser, "limit")?);
            } else {
                parser.rewind(pivot);
                break;
            }
        }

        Ok(result)
    }
}

impl Display for RowBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowBound::Value(value) => write!(f, "{}", value),
            RowBound::Param(name) => write!(f, ":{}", name),
        }
    }
}
