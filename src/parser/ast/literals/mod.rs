pub mod literal;
pub use literal::*;

pub mod number_parser;
pub use number_parser::*;

pub mod string_parser;
pub use string_parser::*;

pub mod date_parser;
pub use date_parser::*;

pub mod date_literal_parser;
pub use date_literal_parser::*;

pub mod param_parser;
pub use param_parser::*;

pub mod literal_parser;
pub use literal_parser::*;

pub mod list_parser;
pub use list_parser::*;
