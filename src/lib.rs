//! Compiler for a hierarchical object query language.
//!
//! `compile` turns query text into a resolved [`Query`] tree: names are
//! qualified against the object graph, identifiers are assigned and the
//! statement is split into one query per object plus a residual filter
//! over the joined rows.

pub mod parser;
pub mod planner;
pub mod codec;

pub mod config;
pub use config::CompilerConfig;

pub mod compiler;
pub use compiler::{compile, CompileError, Compiler};

pub use parser::ast::{
    Condition, FieldInfo, FieldKind, ForClause, Literal, ObjectInfo, OffsetAndLimit, Opcode, OrderByInfo, Query,
    QueryMeta, RowBound,
};
