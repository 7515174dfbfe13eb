use std::fmt;

use crate::parser::{
    analyzer::{ConditionNode, ConditionNodeKind, NameKey},
    ast::{Condition, FieldInfo, FieldKind, Opcode},
};

/// How much of a condition one object can decide from its own rows.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Pushdown {
    /// the whole condition
    Known,
    /// a weaker condition implied by it
    Partial,
    Unknown,
}

impl Pushdown {
    pub fn not(&self) -> Self {
        match self {
            Self::Known => Self::Known,
            _ => Self::Unknown,
        }
    }

    pub fn and(&self, other: Self) -> Self {
        match (self, other) {
            (Self::Unknown, Self::Unknown) => Self::Unknown,
            (Self::Known, Self::Known) => Self::Known,
            _ => Self::Partial,
        }
    }

    /// OR and comparisons: one undecidable side spoils the whole node.
    pub fn combine(&self, other: Self) -> Self {
        match (self, other) {
            (Self::Unknown, _) | (_, Self::Unknown) => Self::Unknown,
            (Self::Known, Self::Known) => Self::Known,
            _ => Self::Partial,
        }
    }
}

impl fmt::Display for Pushdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known => write!(f, "Known"),
            Self::Partial => write!(f, "Partial"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

impl fmt::Debug for Pushdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pushdown({})", self)
    }
}

/// The field reads a column of the object at `path`.
pub fn belongs_to(field: &FieldInfo, path: &[String]) -> bool {
    field.is_field() && field.object_path().is_some_and(|object| NameKey::equals(object, path))
}

fn classify_leaf(condition: &Condition, path: &[String]) -> Pushdown {
    let Condition::Operand(field) = condition else {
        return Pushdown::Unknown;
    };
    match &field.kind {
        FieldKind::Field { .. } if belongs_to(field, path) => Pushdown::Known,
        FieldKind::Literal(_) | FieldKind::Parameter(_) | FieldKind::DateTimeLiteral(_) => Pushdown::Known,
        _ => Pushdown::Unknown,
    }
}

/// Evaluates `node` for the object at `path` and returns the postfix
/// condition that object can apply on its own. Nothing survives an
/// `Unknown` result.
pub fn push_down(node: &ConditionNode, path: &[String]) -> (Pushdown, Vec<Condition>) {
    match &node.kind {
        ConditionNodeKind::Leaf(condition) => match classify_leaf(condition, path) {
            Pushdown::Unknown => (Pushdown::Unknown, vec![]),
            pushdown => (pushdown, vec![condition.clone()]),
        },
        ConditionNodeKind::Not(operand) => {
            let (pushdown, mut conditions) = push_down(operand, path);
            match pushdown.not() {
                Pushdown::Known => {
                    conditions.push(Condition::Operator(Opcode::Not));
                    (Pushdown::Known, conditions)
                },
                _ => (Pushdown::Unknown, vec![]),
            }
        },
        ConditionNodeKind::Binary { opcode, left, right } => {
            let (left, mut left_conditions) = push_down(left, path);
            let (right, right_conditions) = push_down(right, path);

            if *opcode == Opcode::And {
                match (left, right) {
                    (Pushdown::Unknown, Pushdown::Unknown) => return (Pushdown::Unknown, vec![]),
                    (Pushdown::Unknown, _) => return (Pushdown::Partial, right_conditions),
                    (_, Pushdown::Unknown) => return (Pushdown::Partial, left_conditions),
                    _ => {},
                }
            }

            let pushdown = if *opcode == Opcode::And { left.and(right) } else { left.combine(right) };
            if pushdown == Pushdown::Unknown {
                return (Pushdown::Unknown, vec![]);
            }
            left_conditions.extend(right_conditions);
            left_conditions.push(Condition::Operator(*opcode));
            (pushdown, left_conditions)
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        parser::{analyzer::ConditionNode, ast::{Condition, FieldInfo, Literal, Opcode}},
        planner::{push_down, Pushdown},
    };

    fn field(name: &str) -> Condition {
        Condition::Operand(FieldInfo::field(name.split('.').map(|segment| segment.to_string()).collect()))
    }

    fn text(value: &str) -> Condition {
        Condition::Operand(FieldInfo::literal(Literal::String(value.into())))
    }

    fn path(name: &str) -> Vec<String> {
        name.split('.').map(|segment| segment.to_string()).collect()
    }

    fn rendered(conditions: &[Condition]) -> Vec<String> {
        conditions.iter().map(|condition| condition.to_string()).collect()
    }

    #[test]
    pub fn test_truth_table() {
        assert_eq!(Pushdown::Known.and(Pushdown::Unknown), Pushdown::Partial);
        assert_eq!(Pushdown::Unknown.and(Pushdown::Unknown), Pushdown::Unknown);
        assert_eq!(Pushdown::Partial.combine(Pushdown::Known), Pushdown::Partial);
        assert_eq!(Pushdown::Known.combine(Pushdown::Unknown), Pushdown::Unknown);
        assert_eq!(Pushdown::Partial.not(), Pushdown::Unknown);
    }

    #[test]
    pub fn test_and_keeps_the_decidable_side() {
        let conditions = vec![
            field("Contact.LastName"), text("foo"), Condition::Operator(Opcode::Eq),
            field("Contact.Account.Name"), text("bar"), Condition::Operator(Opcode::Eq),
            Condition::Operator(Opcode::And),
        ];
        let tree = ConditionNode::build(&conditions).expect("Failed to build").expect("Tree expected");

        let (pushdown, pushed) = push_down(&tree, &path("Contact"));
        assert_eq!(pushdown, Pushdown::Partial);
        assert_eq!(rendered(&pushed), vec!["Contact.LastName", "'foo'", "="]);

        let (pushdown, pushed) = push_down(&tree, &path("contact.account"));
        assert_eq!(pushdown, Pushdown::Partial);
        assert_eq!(rendered(&pushed), vec!["Contact.Account.Name", "'bar'", "="]);
    }

    #[test]
    pub fn test_or_with_an_undecidable_side_pushes_nothing() {
        let conditions = vec![
            field("Contact.LastName"), text("foo"), Condition::Operator(Opcode::Eq),
            field("Contact.Account.Name"), text("bar"), Condition::Operator(Opcode::Eq),
            Condition::Operator(Opcode::Or),
        ];
        let tree = ConditionNode::build(&conditions).expect("Failed to build").expect("Tree expected");

        assert_eq!(push_down(&tree, &path("Contact")), (Pushdown::Unknown, vec![]));
    }

    #[test]
    pub fn test_functions_are_evaluated_after_the_join() {
        let conditions = vec![
            Condition::Operand(FieldInfo::function("LEN", vec![FieldInfo::field(path("Contact.Name"))])),
            Condition::Operand(FieldInfo::literal(Literal::Int(0))),
            Condition::Operator(Opcode::Gt),
        ];
        let tree = ConditionNode::build(&conditions).expect("Failed to build").expect("Tree expected");

        assert_eq!(push_down(&tree, &path("Contact")).0, Pushdown::Unknown);
    }
}
