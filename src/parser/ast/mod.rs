pub mod literals;
pub use literals::*;

pub mod symbol_parser;
pub use symbol_parser::*;

pub mod dotted_name;
pub use dotted_name::*;

pub mod field_info;
pub use field_info::*;

pub mod condition;
pub use condition::*;

pub mod object_info;
pub use object_info::*;

pub mod function;
pub use function::*;

pub mod select_field;
pub use select_field::*;

pub mod operators;
pub use operators::*;

pub mod condition_parser;
pub use condition_parser::*;

pub mod from_clause;
pub use from_clause::*;

pub mod group_by;
pub use group_by::*;

pub mod order_by;
pub use order_by::*;

pub mod limit_offset_parser;
pub use limit_offset_parser::*;

pub mod for_clause;
pub use for_clause::*;

pub mod meta;
pub use meta::*;

pub mod query;
pub use query::*;
