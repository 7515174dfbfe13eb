use std::collections::HashSet;

use indexmap::IndexMap;

use crate::parser::{
    analyzer::{AnalyzerError, NormalizeContext},
    ast::{Condition, FieldInfo, FieldKind, Query},
};

pub struct ColumnResolver;

impl ColumnResolver {
    fn assign_to_field(ctx: &mut NormalizeContext, field: &mut FieldInfo, parameter: bool, aggregated_pass: bool) {
        if field.column_id.is_none() {
            match &field.kind {
                FieldKind::Field { .. } => {
                    field.column_id = Some(match ctx.column_ids.get(&field.key) {
                        Some(id) => *id,
                        None => {
                            let id = ctx.take_column_id();
                            ctx.column_ids.insert(field.key.clone(), id);
                            id
                        },
                    });
                },
                FieldKind::Function { .. } => {
                    let top_level = !aggregated_pass && !parameter;
                    if top_level || (aggregated_pass && field.aggregated) {
                        field.column_id = Some(ctx.take_column_id());
                    }
                },
                FieldKind::FieldSet { .. } | FieldKind::SubQuery(_) => field.column_id = Some(ctx.take_column_id()),
                _ => {},
            }
        }

        if let Some(parameters) = field.parameters_mut() {
            for parameter in parameters.iter_mut() {
                Self::assign_to_field(ctx, parameter, true, aggregated_pass);
            }
        }
    }

    fn assign_to_conditions(ctx: &mut NormalizeContext, conditions: &mut [Condition], aggregated_pass: bool) {
        for field in conditions.iter_mut().filter_map(Condition::operand_mut) {
            Self::assign_to_field(ctx, field, false, aggregated_pass);
        }
    }

    /// Column ids in a fixed clause order, so equivalent input always gets
    /// the same ids. The same column shares one id across the query graph.
    pub fn assign_column_ids(ctx: &mut NormalizeContext, query: &mut Query) {
        for field in query.fields.iter_mut() {
            Self::assign_to_field(ctx, field, false, false);
        }
        for order in query.order_by.iter_mut() {
            Self::assign_to_field(ctx, &mut order.field, false, false);
        }
        for field in query.group_by.iter_mut() {
            Self::assign_to_field(ctx, field, false, false);
        }

        Self::assign_to_conditions(ctx, &mut query.r#where, false);
        Self::assign_to_conditions(ctx, &mut query.having, true);
        Self::assign_to_conditions(ctx, &mut query.having, false);

        for field in query.fields.iter_mut().filter(|field| field.is_function()) {
            Self::assign_to_field(ctx, field, false, true);
        }
    }

    /// Unaliased select items get `exprN`. The first unaliased reference to
    /// a plain column keeps its own name.
    pub fn assign_implicit_aliases(query: &mut Query, explicit: &IndexMap<String, usize>) {
        let mut named_columns = HashSet::new();
        let mut counter = 0;

        for field in query.fields.iter_mut().filter(|field| field.alias.is_none()) {
            let needs_alias = match field.kind {
                FieldKind::Field { .. } => !named_columns.insert(field.column_id),
                FieldKind::Function { .. } => true,
                _ => false,
            };
            if !needs_alias {
                continue;
            }

            loop {
                let name = format!("expr{}", counter);
                counter += 1;
                if !explicit.contains_key(&name) {
                    field.alias = Some(name);
                    break;
                }
            }
        }
    }

    pub fn check_duplicates(query: &Query) -> Result<(), AnalyzerError> {
        let display = |field: &FieldInfo| match field.name() {
            Some(name) => name.join("."),
            None => field.to_string(),
        };

        let mut used = HashSet::new();
        for field in &query.group_by {
            if !used.insert(field.column_id) {
                return AnalyzerError::DuplicateGroupByField(display(field)).err();
            }
        }

        used.clear();
        for order in &query.order_by {
            if !used.insert(order.field.column_id) {
                return AnalyzerError::DuplicateOrderByField(display(&order.field)).err();
            }
        }
        Ok(())
    }
}
