use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::parser::ast::Query;

/// A FROM-clause object or relationship reference.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInfo {
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default, rename = "aliasName", skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    /// some WHERE leaf referenced this object before pushdown
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_conditions: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inner_join: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_id: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_view_id: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_object_query: Option<Box<Query>>,
}

impl ObjectInfo {
    pub fn new(name: Vec<String>, alias: Option<String>) -> Self {
        Self { name, alias, ..Default::default() }
    }
}

impl Display for ObjectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.join("."))?;
        if let Some(alias) = &self.alias {
            write!(f, " {}", alias)?;
        }
        Ok(())
    }
}
