use std::fmt::{self, Display};

use crate::parser::ast::FieldInfo;

/// One entry of a postfix (reverse-Polish) condition sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Noop,
    /// cannot be decided from a single object's data
    Unknown,
    Operand(FieldInfo),
    Operator(Opcode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Not,
    And,
    Or,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
    In,
    NotIn,
    Includes,
    Excludes,
}

impl Opcode {
    pub const ALL: [Opcode; 15] = [
        Opcode::Not,
        Opcode::And,
        Opcode::Or,
        Opcode::Eq,
        Opcode::NotEq,
        Opcode::Lt,
        Opcode::Le,
        Opcode::Gt,
        Opcode::Ge,
        Opcode::Like,
        Opcode::NotLike,
        Opcode::In,
        Opcode::NotIn,
        Opcode::Includes,
        Opcode::Excludes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Not => "Not",
            Opcode::And => "And",
            Opcode::Or => "Or",
            Opcode::Eq => "Eq",
            Opcode::NotEq => "NotEq",
            Opcode::Lt => "Lt",
            Opcode::Le => "Le",
            Opcode::Gt => "Gt",
            Opcode::Ge => "Ge",
            Opcode::Like => "Like",
            Opcode::NotLike => "NotLike",
            Opcode::In => "In",
            Opcode::NotIn => "NotIn",
            Opcode::Includes => "Includes",
            Opcode::Excludes => "Excludes",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|opcode| opcode.name() == name).copied()
    }

    /// Canonical lowercase spelling of the operator.
    pub fn keyword(&self) -> &'static str {
        match self {
            Opcode::Not => "not",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Eq => "=",
            Opcode::NotEq => "!=",
            Opcode::Lt => "<",
            Opcode::Le => "<=",
            Opcode::Gt => ">",
            Opcode::Ge => ">=",
            Opcode::Like => "like",
            Opcode::NotLike => "notlike",
            Opcode::In => "in",
            Opcode::NotIn => "notin",
            Opcode::Includes => "includes",
            Opcode::Excludes => "excludes",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Opcode::Not => 1,
            _ => 2,
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Opcode::Not | Opcode::And | Opcode::Or)
    }

    /// Operator whose result is the negation of this one under three-valued logic.
    pub fn negated(&self) -> Option<Self> {
        let negated = match self {
            Opcode::Eq => Opcode::NotEq,
            Opcode::NotEq => Opcode::Eq,
            Opcode::Lt => Opcode::Ge,
            Opcode::Le => Opcode::Gt,
            Opcode::Gt => Opcode::Le,
            Opcode::Ge => Opcode::Lt,
            Opcode::Like => Opcode::NotLike,
            Opcode::NotLike => Opcode::Like,
            Opcode::In => Opcode::NotIn,
            Opcode::NotIn => Opcode::In,
            Opcode::Includes => Opcode::Excludes,
            Opcode::Excludes => Opcode::Includes,
            Opcode::And => Opcode::Or,
            Opcode::Or => Opcode::And,
            Opcode::Not => return None,
        };
        Some(negated)
    }
}

impl Condition {
    /// Discriminant name used by the wire form.
    pub fn opcode_name(&self) -> &'static str {
        match self {
            Condition::Noop => "Noop",
            Condition::Unknown => "Unknown",
            Condition::Operand(_) => "FieldInfo",
            Condition::Operator(opcode) => opcode.name(),
        }
    }

    pub fn operand(&self) -> Option<&FieldInfo> {
        match self {
            Condition::Operand(field) => Some(field),
            _ => None,
        }
    }

    pub fn operand_mut(&mut self) -> Option<&mut FieldInfo> {
        match self {
            Condition::Operand(field) => Some(field),
            _ => None,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Condition::Noop)
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Noop => write!(f, "noop"),
            Condition::Unknown => write!(f, "unknown"),
            Condition::Operand(field) => write!(f, "{}", field),
            Condition::Operator(opcode) => write!(f, "{}", opcode),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::{Condition, Opcode};

    #[test]
    pub fn test_opcode_names_round_trip() {
        for opcode in Opcode::ALL {
            assert_eq!(Opcode::from_name(opcode.name()), Some(opcode));
        }
        assert_eq!(Opcode::from_name("FieldInfo"), None);
    }

    #[test]
    pub fn test_negation_is_an_involution() {
        for opcode in Opcode::ALL {
            if let Some(negated) = opcode.negated() {
                assert_eq!(negated.negated(), Some(opcode));
            }
        }
    }

    #[test]
    pub fn test_condition_opcode_names() {
        assert_eq!(Condition::Noop.opcode_name(), "Noop");
        assert_eq!(Condition::Operator(Opcode::NotLike).opcode_name(), "NotLike");
    }
}
