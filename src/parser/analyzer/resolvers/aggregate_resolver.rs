use std::collections::HashSet;

use crate::parser::{analyzer::NameKey, ast::{FieldInfo, FieldKind}};

pub struct AggregateResolver;

impl AggregateResolver {
    pub fn is_count_name(name: &str) -> bool {
        matches!(name.to_ascii_lowercase().as_str(), "count" | "count_distinct")
    }

    /// COUNT or COUNT_DISTINCT anywhere in the field, nested calls included.
    pub fn contains_count(field: &FieldInfo) -> bool {
        match &field.kind {
            FieldKind::Function { name, parameters } =>
                Self::is_count_name(name) || parameters.iter().any(Self::contains_count),
            _ => false,
        }
    }

    /// A call over plain fields aggregates them; any nested call makes the
    /// outer call a scalar over that call's result.
    pub fn aggregates_fields(parameters: &[FieldInfo]) -> bool {
        let mut aggregated = false;
        for parameter in parameters {
            match parameter.kind {
                FieldKind::Field { .. } => aggregated = true,
                FieldKind::Function { .. } => return false,
                _ => {},
            }
        }
        aggregated
    }

    /// The field's key is a grouping key, or its select alias names one.
    pub fn is_grouped(field: &FieldInfo, primary: &[String], grouping: &HashSet<String>) -> bool {
        if grouping.contains(&field.key) {
            return true;
        }
        field.alias.as_ref().is_some_and(|alias| {
            let mut aliased = primary.to_vec();
            aliased.push(alias.clone());
            grouping.contains(&NameKey::of(&aliased))
        })
    }
}
