//! Source text to a normalized [`ast::Query`]: the character cursor, the
//! keyword comparers, the syntax tree and the normalization pass.

pub mod query_parser;
pub use query_parser::*;

pub mod parse_error;
pub use parse_error::*;

pub mod word_comparer;
pub use word_comparer::*;

pub mod query_comparers;
pub use query_comparers::*;

pub mod ast;

pub mod analyzer;
