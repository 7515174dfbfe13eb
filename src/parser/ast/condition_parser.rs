use crate::parser::{
    ast::{Condition, DottedNameParser, FieldInfo, FieldKind, FunctionParser, ListParser, LiteralParser, Opcode, OperatorParser, Query},
    ParseError, QueryParser,
};

/// Clause a condition list belongs to. HAVING only accepts function calls
/// on the left-hand side and no plain names on the right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionClause {
    Where,
    Having,
}

impl ConditionClause {
    pub fn name(&self) -> &'static str {
        match self {
            ConditionClause::Where => "where",
            ConditionClause::Having => "having",
        }
    }

    fn error(&self, detail: Option<&str>) -> String {
        match detail {
            Some(detail) => format!("Unexpected token aheads near by the '{}' clause ({})", self.name(), detail),
            None => format!("Unexpected token aheads near by the '{}' clause", self.name()),
        }
    }
}

/// Condition expressions in postfix order.
///
/// An expression is a chain of terms joined by AND / OR, where each term is
/// a comparison or a parenthesized expression, optionally preceded by NOTs.
/// NOT binds tightest, then AND, then OR; each tier is left-associative.
pub struct ConditionParser;

impl ConditionParser {
    pub fn parse(parser: &mut QueryParser, clause: ConditionClause) -> Result<Vec<Condition>, ParseError> {
        let mut or_terms: Vec<Vec<Condition>> = vec![];
        let mut and_chain: Option<Vec<Condition>> = None;

        loop {
            parser.next_non_whitespace()?;
            let term = Self::parse_term(parser, clause)?;

            and_chain = Some(match and_chain.take() {
                Some(mut chain) => {
                    chain.extend(term);
                    chain.push(Condition::Operator(Opcode::And));
                    chain
                },
                None => term,
            });

            let pivot = parser.position;
            parser.next_non_whitespace()?;
            if parser.consume_keyword(|keywords| &keywords.and) {
                continue;
            }

            if let Some(chain) = and_chain.take() {
                or_terms.push(chain);
            }
            if parser.consume_keyword(|keywords| &keywords.or) {
                continue;
            }

            parser.rewind(pivot);
            break;
        }

        let mut terms = or_terms.into_iter();
        let mut conditions = terms.next().unwrap_or_default();
        for term in terms {
            conditions.extend(term);
            conditions.push(Condition::Operator(Opcode::Or));
        }
        Ok(conditions)
    }

    fn parse_term(parser: &mut QueryParser, clause: ConditionClause) -> Result<Vec<Condition>, ParseError> {
        let mut negations = 0;
        while parser.consume_keyword(|keywords| &keywords.not) {
            negations += 1;
            parser.next_non_whitespace()?;
        }

        let mut term = if parser.current() == '(' && !parser.eof() {
            let pivot = parser.position;
            parser.next();
            parser.enter_nesting()?;

            let inner = Self::parse(parser, clause)?;
            parser.next_non_whitespace()?;
            if !parser.consume_char(')') {
                return ParseError::new(&clause.error(None), pivot, parser).err();
            }

            parser.leave_nesting();
            inner
        } else {
            Self::parse_comparison(parser, clause)?
        };

        for _ in 0..negations {
            term.push(Condition::Operator(Opcode::Not));
        }
        Ok(term)
    }

    /// `lhs op rhs`, encoded as `[lhs, rhs, op]`.
    fn parse_comparison(parser: &mut QueryParser, clause: ConditionClause) -> Result<Vec<Condition>, ParseError> {
        if parser.is_reserved_ahead() {
            return ParseError::new(&clause.error(None), parser.position, parser).err();
        }

        let lhs = match FunctionParser::parse(parser)? {
            Some(function) => function,
            None => match clause {
                ConditionClause::Where => match DottedNameParser::parse(parser)? {
                    Some(name) => FieldInfo::field(name),
                    None => return ParseError::new(&clause.error(Some("unknown operand1")), parser.position, parser).err(),
                },
                ConditionClause::Having => {
                    return ParseError::new(&clause.error(Some("unknown operand1")), parser.position, parser).err();
                },
            },
        };

        parser.next_non_whitespace()?;
        let Some(opcode) = OperatorParser::parse(parser) else {
            return ParseError::new(&clause.error(Some("unknown operator")), parser.position, parser).err();
        };

        parser.next_non_whitespace()?;
        let rhs = Self::parse_right_operand(parser, clause)?;

        Ok(vec![Condition::Operand(lhs), Condition::Operand(rhs), Condition::Operator(opcode)])
    }

    fn parse_right_operand(parser: &mut QueryParser, clause: ConditionClause) -> Result<FieldInfo, ParseError> {
        if let Some(item) = LiteralParser::parse(parser)? {
            return Ok(FieldInfo::new(FieldKind::from(item)));
        }

        if Query::is_sub_query_ahead(parser)? {
            return Ok(FieldInfo::sub_query(Query::parse_sub_query(parser)?));
        }

        if let Some(function) = FunctionParser::parse(parser)? {
            return Ok(function);
        }

        if clause == ConditionClause::Where {
            if let Some(name) = DottedNameParser::parse(parser)? {
                return Ok(FieldInfo::field(name));
            }
        }

        if parser.current() == '(' && !parser.eof() {
            return Ok(FieldInfo::literal(ListParser::parse(parser)?));
        }

        ParseError::new(&clause.error(Some("unknown operand2")), parser.position, parser).err()
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{
        ast::{Condition, ConditionClause, ConditionParser, FieldKind, Literal, Opcode},
        QueryParser,
    };

    fn opcodes(conditions: &[Condition]) -> Vec<&'static str> {
        conditions.iter().map(|condition| condition.opcode_name()).collect()
    }

    fn parse_where(text: &str) -> Vec<Condition> {
        let mut parser = QueryParser::new(text);
        ConditionParser::parse(&mut parser, ConditionClause::Where).expect("Failed to parse condition")
    }

    #[test]
    pub fn test_single_comparison() {
        let conditions = parse_where("Name = 'bar'");

        assert_eq!(opcodes(&conditions), vec!["FieldInfo", "FieldInfo", "Eq"]);
        match &conditions[1] {
            Condition::Operand(field) => assert_eq!(field.kind, FieldKind::Literal(Literal::String("bar".into()))),
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_and_binds_tighter_than_or() {
        let conditions = parse_where("a = 1 or b = 2 and c = 3");

        assert_eq!(
            opcodes(&conditions),
            vec![
                "FieldInfo", "FieldInfo", "Eq",
                "FieldInfo", "FieldInfo", "Eq",
                "FieldInfo", "FieldInfo", "Eq",
                "And", "Or",
            ]
        );
    }

    #[test]
    pub fn test_chains_are_left_associative() {
        let conditions = parse_where("a = 1 and b = 2 and c = 3");

        assert_eq!(conditions[6], Condition::Operator(Opcode::And));
        assert_eq!(conditions[10], Condition::Operator(Opcode::And));
    }

    #[test]
    pub fn test_not_and_groups() {
        let conditions = parse_where("NOT (a = 1 OR b = 2) AND not not c != 3");

        assert_eq!(
            opcodes(&conditions),
            vec![
                "FieldInfo", "FieldInfo", "Eq",
                "FieldInfo", "FieldInfo", "Eq",
                "Or", "Not",
                "FieldInfo", "FieldInfo", "NotEq", "Not", "Not",
                "And",
            ]
        );
    }

    #[test]
    pub fn test_right_operand_kinds() {
        let conditions = parse_where("a IN ('x', :p) AND b = c.d AND e = LAST_N_DAYS:3 AND f IN (SELECT Id FROM X)");

        match &conditions[1] {
            Condition::Operand(field) => assert!(matches!(field.kind, FieldKind::Literal(Literal::List(_)))),
            _ => panic!(),
        }
        match &conditions[4] {
            Condition::Operand(field) => assert!(field.is_field()),
            _ => panic!(),
        }
        match &conditions[8] {
            Condition::Operand(field) => assert!(matches!(field.kind, FieldKind::DateTimeLiteral(_))),
            _ => panic!(),
        }
        match &conditions[12] {
            Condition::Operand(field) => assert!(field.is_sub_query()),
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_stops_before_next_clause() {
        let mut parser = QueryParser::new("a = 1 ORDER BY a");

        let conditions = ConditionParser::parse(&mut parser, ConditionClause::Where).expect("Failed to parse condition");

        assert_eq!(conditions.len(), 3);
        assert_eq!(parser.position, 5);
    }

    #[test]
    pub fn test_where_errors() {
        let cases = [
            ("= 1", "Unexpected token aheads near by the 'where' clause (unknown operand1)"),
            ("a ~ 1", "Unexpected token aheads near by the 'where' clause (unknown operator)"),
            ("a = ,", "Unexpected token aheads near by the 'where' clause (unknown operand2)"),
            ("(a = 1", "Unexpected token aheads near by the 'where' clause"),
            ("a = 1 AND", "Unexpected token aheads near by the 'where' clause (unknown operand1)"),
        ];

        for (text, message) in cases {
            let mut parser = QueryParser::new(text);
            match ConditionParser::parse(&mut parser, ConditionClause::Where) {
                Ok(_) => panic!("{text} should fail"),
                Err(err) => assert_eq!(err.message, message),
            }
        }
    }

    #[test]
    pub fn test_having_requires_function() {
        let mut parser = QueryParser::new("COUNT(Id) > 1");
        let conditions = ConditionParser::parse(&mut parser, ConditionClause::Having).expect("Failed to parse having");
        assert_eq!(opcodes(&conditions), vec!["FieldInfo", "FieldInfo", "Gt"]);

        let mut parser = QueryParser::new("Name > 1");
        match ConditionParser::parse(&mut parser, ConditionClause::Having) {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.message, "Unexpected token aheads near by the 'having' clause (unknown operand1)"),
        }

        let mut parser = QueryParser::new("COUNT(Id) > Name");
        assert!(ConditionParser::parse(&mut parser, ConditionClause::Having).is_err());
    }
}
