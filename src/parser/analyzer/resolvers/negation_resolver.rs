use crate::parser::{
    analyzer::{ConditionNode, ConditionNodeKind, InternalError},
    ast::{Condition, Opcode},
};

/// Pushes NOT down to the comparisons (De Morgan), so a condition list
/// carries no NOT above a comparison afterwards.
pub struct NegationResolver;

impl NegationResolver {
    pub fn distribute(conditions: &[Condition]) -> Result<Vec<Condition>, InternalError> {
        let mut distributed = Vec::with_capacity(conditions.len());
        if let Some(tree) = ConditionNode::build(conditions)? {
            Self::write(&tree, false, &mut distributed);
        }
        Ok(distributed)
    }

    fn write(node: &ConditionNode, negate: bool, target: &mut Vec<Condition>) {
        match &node.kind {
            ConditionNodeKind::Leaf(condition) => {
                target.push(condition.clone());
                if negate {
                    target.push(Condition::Operator(Opcode::Not));
                }
            },
            ConditionNodeKind::Not(operand) => Self::write(operand, !negate, target),
            ConditionNodeKind::Binary { opcode, left, right } => {
                let logical = matches!(opcode, Opcode::And | Opcode::Or);
                // comparison operands are values, only the operator flips
                Self::write(left, negate && logical, target);
                Self::write(right, negate && logical, target);

                let opcode = match negate {
                    true => opcode.negated().unwrap_or(*opcode),
                    false => *opcode,
                };
                target.push(Condition::Operator(opcode));
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{
        analyzer::NegationResolver,
        ast::{Condition, ConditionClause, ConditionParser, Opcode},
        QueryParser,
    };

    fn opcodes(text: &str) -> Vec<String> {
        let mut parser = QueryParser::new(text);
        let conditions = ConditionParser::parse(&mut parser, ConditionClause::Where).expect("Failed to parse conditions");
        NegationResolver::distribute(&conditions)
            .expect("Failed to distribute")
            .iter()
            .map(|condition| match condition {
                Condition::Operand(field) => field.to_string(),
                other => other.opcode_name().to_string(),
            })
            .collect()
    }

    #[test]
    pub fn test_de_morgan() {
        assert_eq!(opcodes("NOT (A = 1 OR B = 2)"), vec!["A", "1", "NotEq", "B", "2", "NotEq", "And"]);
        assert_eq!(opcodes("NOT (A < 1 AND B IN (1, 2))"), vec!["A", "1", "Ge", "B", "(1, 2)", "NotIn", "Or"]);
    }

    #[test]
    pub fn test_double_negation_cancels() {
        assert_eq!(opcodes("NOT NOT A LIKE 'x%'"), vec!["A", "'x%'", "Like"]);
        assert_eq!(opcodes("NOT (NOT (A = 1) OR B = 2)"), vec!["A", "1", "Eq", "B", "2", "NotEq", "And"]);
    }

    #[test]
    pub fn test_negation_stays_inside_its_operand() {
        assert_eq!(
            opcodes("X = 0 AND NOT (A = 1 OR B = 2)"),
            vec!["X", "0", "Eq", "A", "1", "NotEq", "B", "2", "NotEq", "And", "And"]
        );
        assert!(!opcodes("NOT A = 1 OR B = 2").contains(&Opcode::Not.name().to_string()));
    }
}
