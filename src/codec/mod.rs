//! JSON wire form of a compiled query.
//!
//! Discriminants are written by name and every node keeps a fixed key
//! order, so `encode(decode(encode(q)))` reproduces the same bytes.

use std::fmt::{self, Display};

use crate::parser::ast::Query;

mod literal;
mod field_info;
mod condition;

#[derive(Debug)]
pub struct CodecError {
    source: serde_json::Error,
}

impl CodecError {
    /// 1-based line of the failure inside the decoded text, 0 when encoding.
    pub fn line(&self) -> usize {
        self.source.line()
    }

    pub fn column(&self) -> usize {
        self.source.column()
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(source: serde_json::Error) -> Self {
        Self { source }
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CodecError: {}", self.source)
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

pub fn encode(query: &Query) -> Result<String, CodecError> {
    Ok(serde_json::to_string(query)?)
}

pub fn encode_pretty(query: &Query) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(query)?)
}

pub fn decode(text: &str) -> Result<Query, CodecError> {
    Ok(serde_json::from_str(text)?)
}
