use std::collections::HashSet;

use crate::parser::ast::{Condition, FieldInfo, FieldKind, Query};

/// Appends every column the query reads but does not select to the select
/// list, marked `not_selected`, so that each per-object query fetches it.
pub struct UnselectedResolver;

impl UnselectedResolver {
    pub fn add_unselected_fields(query: &mut Query) {
        let mut seen: HashSet<String> = query.fields.iter()
            .filter(|field| field.is_field())
            .map(|field| field.key.clone())
            .collect();
        let mut appended = vec![];

        Self::collect_fields(&query.fields, &mut seen, &mut appended);
        Self::collect_conditions(&query.r#where, &mut seen, &mut appended);
        Self::collect_fields(&query.group_by, &mut seen, &mut appended);
        Self::collect_conditions(&query.having, &mut seen, &mut appended);
        for order in &query.order_by {
            if order.field.is_field() {
                Self::append(&order.field, &mut seen, &mut appended);
            }
        }

        query.fields.extend(appended);
    }

    fn append(field: &FieldInfo, seen: &mut HashSet<String>, appended: &mut Vec<FieldInfo>) {
        if seen.insert(field.key.clone()) {
            let mut unselected = field.clone();
            unselected.not_selected = true;
            appended.push(unselected);
        }
    }

    fn collect_fields(fields: &[FieldInfo], seen: &mut HashSet<String>, appended: &mut Vec<FieldInfo>) {
        for field in fields {
            match &field.kind {
                FieldKind::Field { .. } => Self::append(field, seen, appended),
                FieldKind::Function { parameters, .. } => Self::collect_fields(parameters, seen, appended),
                _ => {},
            }
        }
    }

    fn collect_conditions(conditions: &[Condition], seen: &mut HashSet<String>, appended: &mut Vec<FieldInfo>) {
        for condition in conditions {
            if let Condition::Operand(field) = condition {
                Self::collect_fields(std::slice::from_ref(field), seen, appended);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{
        analyzer::UnselectedResolver,
        ast::{Condition, FieldInfo, Literal, Opcode, OrderByInfo, Query},
    };

    fn field(name: &str) -> FieldInfo {
        let mut field = FieldInfo::field(name.split('.').map(|segment| segment.to_string()).collect());
        field.key = name.to_lowercase();
        field
    }

    #[test]
    pub fn test_unselected_fields_are_appended_once() {
        let mut query = Query {
            fields: vec![
                field("Contact.Id"),
                FieldInfo::function("CONCAT", vec![field("Contact.Name"), FieldInfo::function("TRIM", vec![field("Contact.Title")])]),
            ],
            r#where: vec![
                Condition::Operand(field("Contact.Account.Name")),
                Condition::Operand(FieldInfo::literal(Literal::String("x".into()))),
                Condition::Operator(Opcode::Eq),
                Condition::Operand(field("Contact.Id")),
            ],
            order_by: vec![OrderByInfo { field: field("contact.account.name"), ..Default::default() }],
            ..Default::default()
        };

        UnselectedResolver::add_unselected_fields(&mut query);

        let appended: Vec<_> = query.fields[2..].iter().map(|field| (field.to_string(), field.not_selected)).collect();
        assert_eq!(appended, vec![
            ("Contact.Name".to_string(), true),
            ("Contact.Title".to_string(), true),
            ("Contact.Account.Name".to_string(), true),
        ]);
        assert!(!query.fields[0].not_selected);
    }
}
