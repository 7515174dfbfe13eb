use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Compilation metadata attached to the root query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMeta {
    pub version: String,
    pub date: DateTime<Utc>,
    /// nanoseconds
    pub elapsed_time: u64,
    pub source: String,
    pub max_query_depth: usize,
    pub max_view_depth: usize,
    pub next_query_id: usize,
    pub next_view_id: usize,
    pub next_column_id: usize,
    pub query_graph: BTreeMap<usize, QueryGraphLeaf>,
    pub view_graph: BTreeMap<usize, ViewGraphLeaf>,
    pub functions: BTreeSet<String>,
    pub parameters: BTreeSet<String>,
    pub date_time_literals: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryGraphLeaf {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<usize>,
    pub depth: usize,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_conditional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewGraphLeaf {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_view_id: Option<usize>,
    pub query_id: usize,
    /// object path depth, counted from the root query's primary object
    pub depth: usize,
    pub query_depth: usize,
}
