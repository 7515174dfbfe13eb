pub mod name_key;
pub use name_key::*;

pub mod object_resolver;
pub use object_resolver::*;

pub mod field_resolver;
pub use field_resolver::*;

pub mod aggregate_resolver;
pub use aggregate_resolver::*;

pub mod negation_resolver;
pub use negation_resolver::*;

pub mod unselected_resolver;
pub use unselected_resolver::*;

pub mod view_resolver;
pub use view_resolver::*;

pub mod column_resolver;
pub use column_resolver::*;
