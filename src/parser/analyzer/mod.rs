pub mod analyzer_error;
pub use analyzer_error::*;

pub mod condition_tree;
pub use condition_tree::*;

pub mod analysis_context;
pub use analysis_context::*;

pub mod resolvers;
pub use resolvers::*;
