use std::fmt::{self, Display};

/// Where a function call was found when its placement is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionPlace {
    Nested,
    Conditional,
    AggregationResult,
}

impl Display for FunctionPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionPlace::Nested => write!(f, "nested function"),
            FunctionPlace::Conditional => write!(f, "conditional clause"),
            FunctionPlace::AggregationResult => write!(f, "aggregation result"),
        }
    }
}

/// Semantic errors raised while normalizing a parsed query.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    QualifiedPrimaryObject(String),
    DuplicateObjectAlias(String),
    DuplicateFieldAlias(String),
    AncestorSelection { field: String, primary: String },
    SiblingSelection { field: String, primary: String },
    UnregisteredObject { field: String, primary: String },
    UngroupedField(String),
    HavingWithoutGroupBy(String),
    FunctionNotAllowed { name: String, place: FunctionPlace },
    InvalidFunctionArgs { name: String, reason: String },
    UnknownFieldSetTarget(String),
    CorrelatedAncestorNotFound(String),
    DuplicateGroupByField(String),
    DuplicateOrderByField(String),
    NestingTooDeep { depth: usize, max: usize },
}

impl AnalyzerError {
    pub fn err<T>(self) -> Result<T, AnalyzerError> { Err(self) }
}

impl Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerError::QualifiedPrimaryObject(name) =>
                write!(f, "The name of the primary object is qualified by the parent object name: {}", name),
            AnalyzerError::DuplicateObjectAlias(alias) => write!(f, "Duplicate object alias name found: {}", alias),
            AnalyzerError::DuplicateFieldAlias(alias) => write!(f, "Duplicate field alias name found: {}", alias),
            AnalyzerError::AncestorSelection { field, primary } =>
                write!(f, "The ancestor object item is not allowed to be selected: {} at {}", field, primary),
            AnalyzerError::SiblingSelection { field, primary } =>
                write!(f, "The siblings object item is not allowed to be selected: {} at {}", field, primary),
            AnalyzerError::UnregisteredObject { field, primary } =>
                write!(f, "Unregistered object names are not allowed: {} at {}", field, primary),
            AnalyzerError::UngroupedField(field) => write!(f, "The item must be included in a Group By clause: {}", field),
            AnalyzerError::HavingWithoutGroupBy(primary) => write!(f, "Group by clause not found: {}", primary),
            AnalyzerError::FunctionNotAllowed { name, place } =>
                write!(f, "The function name is not allowed in {}: {}", place, name),
            AnalyzerError::InvalidFunctionArgs { name, reason } => write!(f, "Function '{}()' {}", name, reason),
            AnalyzerError::UnknownFieldSetTarget(name) =>
                write!(f, "Field set 'Fields()' parameter refers unknown object: {}", name),
            AnalyzerError::CorrelatedAncestorNotFound(field) =>
                write!(f, "An incorrect ancestor field of object referred to in the correlated subquery: {}", field),
            AnalyzerError::DuplicateGroupByField(field) => write!(f, "Duplicate field found in Group by clause: {}", field),
            AnalyzerError::DuplicateOrderByField(field) => write!(f, "Duplicate field found in Order by clause: {}", field),
            AnalyzerError::NestingTooDeep { depth, max } =>
                write!(f, "Query nesting is too deep: {} (max {})", depth, max),
        }
    }
}

impl std::error::Error for AnalyzerError {}

/// Broken invariant inside the compiler. Never caused by user input alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalError {
    pub message: String,
}

impl InternalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn err<T>(self) -> Result<T, InternalError> { Err(self) }
}

impl Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[FATAL]Internal error: {}", self.message)
    }
}

impl std::error::Error for InternalError {}
