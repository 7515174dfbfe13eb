use crate::parser::{analyzer::InternalError, ast::{Condition, Opcode}};

/// Binary-tree view of a postfix condition sequence.
///
/// `start..=end` is the span of sequence positions the node was built from;
/// `end` is the position of the node itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionNode {
    pub start: usize,
    pub end: usize,
    pub kind: ConditionNodeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNodeKind {
    /// an operand or the `Unknown` sentinel
    Leaf(Condition),
    Not(Box<ConditionNode>),
    Binary { opcode: Opcode, left: Box<ConditionNode>, right: Box<ConditionNode> },
}

fn missing_operand(opcode: Opcode, position: usize) -> InternalError {
    InternalError::new(format!("The operand for the '{}' operator is missing at {}", opcode, position))
}

impl ConditionNode {
    /// Rebuilds the tree, skipping `Noop` entries. An empty sequence has no tree.
    pub fn build(conditions: &[Condition]) -> Result<Option<Self>, InternalError> {
        let mut stack: Vec<ConditionNode> = Vec::with_capacity(conditions.len());

        for (index, condition) in conditions.iter().enumerate() {
            match condition {
                Condition::Noop => {},
                Condition::Operand(_) | Condition::Unknown => stack.push(ConditionNode {
                    start: index,
                    end: index,
                    kind: ConditionNodeKind::Leaf(condition.clone()),
                }),
                Condition::Operator(Opcode::Not) => {
                    let operand = stack.pop().ok_or_else(|| missing_operand(Opcode::Not, index))?;
                    stack.push(ConditionNode {
                        start: operand.start,
                        end: index,
                        kind: ConditionNodeKind::Not(Box::new(operand)),
                    });
                },
                Condition::Operator(opcode) => {
                    let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                        return missing_operand(*opcode, index).err();
                    };
                    stack.push(ConditionNode {
                        start: left.start,
                        end: index,
                        kind: ConditionNodeKind::Binary { opcode: *opcode, left: Box::new(left), right: Box::new(right) },
                    });
                },
            }
        }

        match stack.len() {
            0 | 1 => Ok(stack.pop()),
            count => InternalError::new(format!("{} condition operands are not combined by an operator", count)).err(),
        }
    }

    /// Appends the subtree back in postfix order.
    pub fn write_postfix(&self, target: &mut Vec<Condition>) {
        match &self.kind {
            ConditionNodeKind::Leaf(condition) => target.push(condition.clone()),
            ConditionNodeKind::Not(operand) => {
                operand.write_postfix(target);
                target.push(Condition::Operator(Opcode::Not));
            },
            ConditionNodeKind::Binary { opcode, left, right } => {
                left.write_postfix(target);
                right.write_postfix(target);
                target.push(Condition::Operator(*opcode));
            },
        }
    }

    pub fn to_postfix(&self) -> Vec<Condition> {
        let mut conditions = Vec::with_capacity(self.end - self.start + 1);
        self.write_postfix(&mut conditions);
        conditions
    }

    pub fn opcode(&self) -> Option<Opcode> {
        match &self.kind {
            ConditionNodeKind::Leaf(_) => None,
            ConditionNodeKind::Not(_) => Some(Opcode::Not),
            ConditionNodeKind::Binary { opcode, .. } => Some(*opcode),
        }
    }
}
