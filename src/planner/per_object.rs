use tracing::trace;

use crate::{
    compiler::CompileError,
    parser::{
        analyzer::{ConditionNode, NameKey, NormalizeContext},
        ast::{FieldInfo, FieldKind, OffsetAndLimit, OrderByInfo, Query},
    },
    planner::{belongs_to, push_down, ColIndexResolver, PostFilterPlanner, Pushdown},
};

/// Splits a query into one single-object query per FROM object plus the
/// residual filter over the joined result.
pub struct PerObjectPlanner;

impl PerObjectPlanner {
    /// Columns the object itself must return. Functions and subqueries are
    /// evaluated after the join.
    fn object_fields(fields: &[FieldInfo], path: &[String]) -> Vec<FieldInfo> {
        fields.iter()
            .filter(|field| match field.kind {
                FieldKind::Field { .. } | FieldKind::FieldSet { .. } =>
                    field.object_path().is_some_and(|object| NameKey::equals(object, path)),
                _ => false,
            })
            .cloned()
            .enumerate()
            .map(|(position, mut field)| {
                field.col_index = Some(position);
                field
            })
            .collect()
    }

    fn object_orders(order_by: &[OrderByInfo], path: &[String]) -> Vec<OrderByInfo> {
        order_by.iter().filter(|order| belongs_to(&order.field, path)).cloned().collect()
    }

    pub fn build(ctx: &mut NormalizeContext, query: &mut Query, parent: Option<&mut Query>) -> Result<(), CompileError> {
        for index in 0..query.from.len() {
            let mut object = query.from[index].clone();
            object.per_object_query = None;

            let fields = Self::object_fields(&query.fields, &object.name);
            for field in &fields {
                ctx.col_indexes.insert(field.key.clone(), field.col_index.unwrap_or_default());
            }

            query.from[index].per_object_query = Some(Box::new(Query { from: vec![object], fields, ..Default::default() }));
        }

        ColIndexResolver::apply(ctx, query, parent)?;

        let tree = ConditionNode::build(&query.r#where)?;

        for index in 0..query.from.len() {
            let path = query.from[index].name.clone();

            let has_conditions = query.r#where.iter()
                .filter_map(|condition| condition.operand())
                .any(|field| belongs_to(field, &path));
            let (pushdown, conditions) = match &tree {
                Some(tree) => push_down(tree, &path),
                None => (Pushdown::Unknown, vec![]),
            };
            let order_by = Self::object_orders(&query.order_by, &path);
            let offset_and_limit = match index {
                0 => query.offset_and_limit.clone(),
                _ => OffsetAndLimit::default(),
            };
            let r#for = query.r#for.clone();

            let object = &mut query.from[index];
            object.has_conditions = has_conditions;
            object.inner_join = index != 0 && !conditions.is_empty();
            trace!(query = query.id, object = %object, ?pushdown, pushed = conditions.len(), "planned object");

            if let Some(per_object) = object.per_object_query.as_mut() {
                per_object.r#where = conditions;
                per_object.order_by = order_by;
                per_object.offset_and_limit = offset_and_limit;
                per_object.r#for = r#for;
            }
        }

        query.post_process_where = PostFilterPlanner::residual(&query.r#where, tree.as_ref(), &query.from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{
        analyzer::NormalizeContext,
        ast::{FieldKind, Query, RowBound},
    };

    fn plan(text: &str) -> Query {
        let mut query = Query::try_from(text).expect("Failed to parse query");
        NormalizeContext::new(None).normalize(&mut query).expect("Failed to normalize");
        query
    }

    fn pushed(query: &Query, index: usize) -> Vec<String> {
        query.from[index].per_object_query.as_ref()
            .map(|per_object| per_object.r#where.iter().map(|condition| condition.to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    pub fn test_inner_join_pushes_everything() {
        let query = plan("SELECT Id FROM Contact WHERE Account.Name = 'bar'");

        assert_eq!(query.from[1].name.join("."), "Contact.Account");
        assert_eq!(pushed(&query, 1), vec!["Contact.Account.Name", "'bar'", "="]);
        assert!(query.from[1].inner_join);
        assert!(query.from[1].has_conditions);
        assert!(pushed(&query, 0).is_empty());
        assert!(!query.from[0].has_conditions);
        assert!(query.post_process_where.is_empty());
    }

    #[test]
    pub fn test_inner_join_with_both_sides() {
        let query = plan("SELECT Id FROM Contact WHERE LastName = 'foo' and Account.Name = 'bar'");

        assert_eq!(pushed(&query, 0), vec!["Contact.LastName", "'foo'", "="]);
        assert_eq!(pushed(&query, 1), vec!["Contact.Account.Name", "'bar'", "="]);
        assert!(!query.from[0].inner_join);
        assert!(query.from[1].inner_join);
        assert!(query.post_process_where.is_empty());
    }

    #[test]
    pub fn test_negated_mixed_disjunction_is_pushed() {
        let query = plan("SELECT Id FROM Contact WHERE NOT (Name = 'a' OR Account.Name = 'b')");

        assert_eq!(pushed(&query, 0), vec!["Contact.Name", "'a'", "!="]);
        assert_eq!(pushed(&query, 1), vec!["Contact.Account.Name", "'b'", "!="]);
        assert!(query.from[1].inner_join);
        assert!(query.post_process_where.is_empty());
    }

    #[test]
    pub fn test_negated_mixed_conjunction_keeps_the_residual() {
        let query = plan("SELECT Id FROM Contact WHERE NOT (Name = 'a' AND Account.Name = 'b')");

        assert!(pushed(&query, 0).is_empty());
        assert!(pushed(&query, 1).is_empty());
        assert!(!query.from[1].inner_join);
        assert_eq!(
            query.post_process_where.iter().map(|condition| condition.to_string()).collect::<Vec<_>>(),
            vec!["Contact.Name", "'a'", "!=", "Contact.Account.Name", "'b'", "!=", "or"]
        );
    }

    #[test]
    pub fn test_left_join_keeps_the_residual() {
        let query = plan("SELECT Id FROM Contact WHERE LastName = 'foo' or Account.Name = 'bar'");

        assert!(pushed(&query, 0).is_empty());
        assert!(pushed(&query, 1).is_empty());
        assert!(!query.from[1].inner_join);
        assert!(query.from[1].has_conditions);
        assert_eq!(query.post_process_where, query.r#where);
    }

    #[test]
    pub fn test_fields_and_orders_per_object() {
        let query = plan("SELECT Id, Account.Id, Account.Name FROM Contact ORDER BY Account.Name LIMIT 10 FOR VIEW");

        let contact = query.from[0].per_object_query.as_ref().expect("Per-object query expected");
        let account = query.from[1].per_object_query.as_ref().expect("Per-object query expected");

        assert_eq!(contact.fields.len(), 1);
        assert_eq!(account.fields.iter().map(|field| field.col_index).collect::<Vec<_>>(), vec![Some(0), Some(1)]);
        assert_eq!(account.order_by.len(), 1);
        assert_eq!(query.order_by[0].field.col_index, Some(1));
        assert_eq!(contact.offset_and_limit.limit, Some(RowBound::Value(10)));
        assert!(account.offset_and_limit.is_empty());
        assert!(contact.r#for.view && account.r#for.view);
        assert!(!query.from[1].inner_join);
    }

    #[test]
    pub fn test_functions_stay_in_the_residual() {
        let query = plan("SELECT Id FROM Contact WHERE LEN(Name) > 0 AND Id = 'x'");

        assert_eq!(pushed(&query, 0), vec!["Contact.Id", "'x'", "="]);
        let residual: Vec<_> = query.post_process_where.iter().map(|condition| condition.to_string()).collect();
        assert_eq!(residual, vec!["LEN(Contact.Name)", "0", ">"]);
    }

    #[test]
    pub fn test_correlated_sub_query_fetches_the_parent_column() {
        let query = plan("SELECT (SELECT Id FROM con.Departments WHERE contact = con.id) qwerty FROM Contact con");

        let contact = query.from[0].per_object_query.as_ref().expect("Per-object query expected");
        assert_eq!(contact.fields.iter().map(|field| field.key.as_str()).collect::<Vec<_>>(), vec!["contact.id"]);
        assert!(query.fields.iter().any(|field| field.key == "contact.id" && field.not_selected));

        match &query.fields[0].kind {
            FieldKind::SubQuery(sub_query) => assert!(sub_query.is_correlated),
            _ => panic!(),
        }
    }
}
