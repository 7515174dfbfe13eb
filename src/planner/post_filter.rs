use crate::{
    parser::{
        analyzer::{ConditionNode, ConditionNodeKind, InternalError},
        ast::{Condition, ObjectInfo, Opcode},
    },
    planner::{push_down, Pushdown},
};

/// Builds the filter that still has to run over the joined rows.
pub struct PostFilterPlanner;

impl PostFilterPlanner {
    pub fn residual(
        conditions: &[Condition],
        tree: Option<&ConditionNode>,
        objects: &[ObjectInfo],
    ) -> Result<Vec<Condition>, InternalError> {
        let mut residual = conditions.to_vec();
        if let Some(tree) = tree {
            for object in objects {
                Self::mark_pushed(tree, &object.name, &mut residual);
            }
        }

        let mut depth = 0;
        for condition in residual.iter_mut() {
            match condition {
                Condition::Noop => {},
                Condition::Unknown | Condition::Operand(_) => depth += 1,
                Condition::Operator(Opcode::Not) => {
                    if depth == 0 {
                        *condition = Condition::Noop;
                    }
                },
                // both sides were already filtered by their objects
                Condition::Operator(Opcode::And) if depth < 2 => *condition = Condition::Noop,
                Condition::Operator(_) if depth < 2 => {
                    return InternalError::new(format!(
                        "The operand for the binary operator is missing in the Where clause of the post-process filter: n={}",
                        depth
                    )).err();
                },
                Condition::Operator(_) => depth -= 1,
            }
        }

        residual.retain(|condition| !condition.is_noop());
        Ok(residual)
    }

    /// Blanks the subtrees an object decides completely. Only conjuncts of
    /// the root qualify; anything under OR or NOT is re-checked.
    fn mark_pushed(node: &ConditionNode, path: &[String], residual: &mut [Condition]) {
        if push_down(node, path).0 == Pushdown::Known {
            for condition in &mut residual[node.start..=node.end] {
                *condition = Condition::Noop;
            }
            return;
        }

        if let ConditionNodeKind::Binary { opcode: Opcode::And, left, right } = &node.kind {
            Self::mark_pushed(left, path, residual);
            Self::mark_pushed(right, path, residual);
        }
    }
}
