use crate::parser::{
    analyzer::{AnalyzerError, NameKey, NormalizeContext},
    ast::{Condition, FieldInfo, Query},
};

/// Points every field at its column inside its object's per-object query.
///
/// A field of an ancestor object makes the query correlated; when the
/// ancestor does not fetch that column yet it is appended to the parent.
pub struct ColIndexResolver;

struct Correlation<'a, 'p> {
    primary_len: usize,
    parent: &'a mut Option<&'p mut Query>,
    correlated: bool,
}

impl ColIndexResolver {
    pub fn apply(ctx: &mut NormalizeContext, query: &mut Query, mut parent: Option<&mut Query>) -> Result<(), AnalyzerError> {
        let mut correlation = Correlation {
            primary_len: query.from.first().map(|object| object.name.len()).unwrap_or_default(),
            parent: &mut parent,
            correlated: false,
        };

        Self::apply_to_fields(ctx, &mut query.fields, &mut correlation)?;
        for order in query.order_by.iter_mut() {
            order.field.col_index = ctx.col_indexes.get(&order.field.key).copied();
        }
        Self::apply_to_fields(ctx, &mut query.group_by, &mut correlation)?;
        Self::apply_to_conditions(ctx, &mut query.r#where, &mut correlation)?;
        Self::apply_to_conditions(ctx, &mut query.having, &mut correlation)?;

        if correlation.correlated {
            query.is_correlated = true;
        }
        Ok(())
    }

    fn apply_to_fields(
        ctx: &mut NormalizeContext,
        fields: &mut [FieldInfo],
        correlation: &mut Correlation,
    ) -> Result<(), AnalyzerError> {
        for field in fields.iter_mut() {
            if let Some(parameters) = field.parameters_mut() {
                Self::apply_to_fields(ctx, parameters, correlation)?;
                continue;
            }
            if !field.is_field() {
                continue;
            }

            field.col_index = ctx.col_indexes.get(&field.key).copied();
            if field.name().is_some_and(|name| name.len() <= correlation.primary_len) {
                correlation.correlated = true;
                if field.col_index.is_none() {
                    Self::fetch_from_parent(ctx, field, correlation)?;
                }
            }
        }
        Ok(())
    }

    fn apply_to_conditions(
        ctx: &mut NormalizeContext,
        conditions: &mut [Condition],
        correlation: &mut Correlation,
    ) -> Result<(), AnalyzerError> {
        for field in conditions.iter_mut().filter_map(Condition::operand_mut) {
            if let Some(parameters) = field.parameters_mut() {
                Self::apply_to_fields(ctx, parameters, correlation)?;
            } else if field.is_field() {
                field.col_index = ctx.col_indexes.get(&field.key).copied();
            }
        }
        Ok(())
    }

    fn fetch_from_parent(
        ctx: &mut NormalizeContext,
        field: &mut FieldInfo,
        correlation: &mut Correlation,
    ) -> Result<(), AnalyzerError> {
        let not_found = || AnalyzerError::CorrelatedAncestorNotFound(field.name().unwrap_or_default().join("."));
        let object_key = field.object_path().map(NameKey::of).unwrap_or_default();

        let Some(parent) = correlation.parent.as_deref_mut() else {
            return Err(not_found());
        };
        let per_object = parent.from.iter_mut()
            .find(|object| object.key == object_key)
            .and_then(|object| object.per_object_query.as_mut());
        let Some(per_object) = per_object else {
            return Err(not_found());
        };

        let position = per_object.fields.len();
        ctx.col_indexes.insert(field.key.clone(), position);
        field.col_index = Some(position);

        let mut fetched = field.clone();
        fetched.not_selected = true;
        per_object.fields.push(fetched.clone());
        parent.fields.push(fetched);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        parser::{analyzer::{AnalyzerError, NormalizeContext}, ast::{FieldInfo, ObjectInfo, Query}},
        planner::ColIndexResolver,
    };

    fn field(name: &str) -> FieldInfo {
        let mut field = FieldInfo::field(name.split('.').map(|segment| segment.to_string()).collect());
        field.key = name.to_lowercase();
        field
    }

    fn object(name: &str) -> ObjectInfo {
        ObjectInfo {
            name: name.split('.').map(|segment| segment.to_string()).collect(),
            key: name.to_lowercase(),
            per_object_query: Some(Box::default()),
            ..Default::default()
        }
    }

    #[test]
    pub fn test_ancestor_column_is_fetched_by_the_parent() {
        let mut ctx = NormalizeContext::new(None);
        let mut parent = Query { from: vec![object("Contact")], ..Default::default() };
        let mut sub_query = Query {
            from: vec![object("Contact.Departments")],
            fields: vec![field("Contact.Departments.Id"), field("Contact.Id")],
            ..Default::default()
        };
        ctx.col_indexes.insert("contact.departments.id".into(), 0);

        ColIndexResolver::apply(&mut ctx, &mut sub_query, Some(&mut parent)).expect("Failed to apply");

        assert!(sub_query.is_correlated);
        assert_eq!(sub_query.fields[1].col_index, Some(0));
        assert_eq!(parent.fields.len(), 1);
        assert!(parent.fields[0].not_selected);
        let per_object = parent.from[0].per_object_query.as_ref().expect("Per-object query expected");
        assert_eq!(per_object.fields[0].key, "contact.id");
    }

    #[test]
    pub fn test_missing_ancestor() {
        let mut ctx = NormalizeContext::new(None);
        let mut sub_query = Query {
            from: vec![object("Contact.Departments")],
            fields: vec![field("Contact.Id")],
            ..Default::default()
        };

        match ColIndexResolver::apply(&mut ctx, &mut sub_query, None) {
            Err(err) => assert_eq!(err, AnalyzerError::CorrelatedAncestorNotFound("Contact.Id".into())),
            Ok(_) => panic!(),
        }
    }
}
