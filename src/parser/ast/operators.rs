use crate::parser::{ast::Opcode, QueryParser};

pub struct OperatorParser;

impl OperatorParser {
    /// Comparison operator at the cursor; longer spellings are tried first.
    pub fn parse(parser: &mut QueryParser) -> Option<Opcode> {
        let comparers = &parser.comparers;
        let candidates = [
            (&comparers.not_equal_c, Opcode::NotEq),
            (&comparers.not_equal_b, Opcode::NotEq),
            (&comparers.less_than_or_equal, Opcode::Le),
            (&comparers.greater_than_or_equal, Opcode::Ge),
            (&comparers.equal, Opcode::Eq),
            (&comparers.less_than, Opcode::Lt),
            (&comparers.greater_than, Opcode::Gt),
            (&comparers.not_like, Opcode::NotLike),
            (&comparers.not_in, Opcode::NotIn),
            (&comparers.like, Opcode::Like),
            (&comparers.r#in, Opcode::In),
            (&comparers.includes, Opcode::Includes),
            (&comparers.excludes, Opcode::Excludes),
        ];

        let (length, opcode) = candidates
            .iter()
            .find_map(|(comparer, opcode)| comparer.match_length(parser).map(|length| (length, *opcode)))?;

        parser.jump(length);
        Some(opcode)
    }
}
