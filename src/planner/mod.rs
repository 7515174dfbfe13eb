pub mod pushdown;
pub use pushdown::*;

pub mod col_index;
pub use col_index::*;

pub mod post_filter;
pub use post_filter::*;

pub mod per_object;
pub use per_object::*;
