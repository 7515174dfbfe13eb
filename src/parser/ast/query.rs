use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::parser::{
    ast::{
        Condition, ConditionClause, ConditionParser, FieldInfo, ForClause, FromParser, GroupByParser,
        LimitAndOffsetParser, ObjectInfo, OffsetAndLimit, Opcode, OrderByInfo, QueryMeta, SelectFieldParser,
    },
    ParseError, QueryComparers, QueryParser, WordComparer,
};

/// A SELECT statement. Subqueries nest through `FieldKind::SubQuery`.
///
/// After normalization `id` is unique across the whole query graph (root is 1)
/// and `parent_id` links a subquery back to the query it appears in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default)]
    pub id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<ObjectInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub r#where: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<FieldInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub having: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderByInfo>,
    #[serde(default, skip_serializing_if = "OffsetAndLimit::is_empty")]
    pub offset_and_limit: OffsetAndLimit,
    #[serde(default, skip_serializing_if = "ForClause::is_empty")]
    pub r#for: ForClause,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_aggregation: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_correlated: bool,
    /// residual filter applied after the per-object results are joined
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_process_where: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Box<QueryMeta>>,
}

type Keyword = fn(&QueryComparers) -> &WordComparer;

impl Query {
    /// Top-level statement; anything after it is an error.
    pub fn parse(parser: &mut QueryParser) -> Result<Self, ParseError> {
        parser.next_non_whitespace()?;
        let query = Self::parse_statement(parser)?;

        parser.next_non_whitespace()?;
        if !parser.eof() {
            return ParseError::new("Unexpected token aheads", parser.position, parser).err();
        }
        Ok(query)
    }

    /// `(` followed by SELECT, without moving the cursor.
    pub fn is_sub_query_ahead(parser: &mut QueryParser) -> Result<bool, ParseError> {
        if parser.current() != '(' || parser.eof() {
            return Ok(false);
        }

        let pivot = parser.position;
        parser.next();
        let ahead = parser.lookahead(|parser| parser.comparers.select.compare(parser));
        parser.rewind(pivot);
        ahead
    }

    /// `( SELECT ... )`
    pub fn parse_sub_query(parser: &mut QueryParser) -> Result<Self, ParseError> {
        parser.expect_char('(', "'(' is expected")?;
        parser.enter_nesting()?;

        parser.next_non_whitespace()?;
        let query = Self::parse_statement(parser)?;

        parser.next_non_whitespace()?;
        if !parser.consume_char(')') {
            return ParseError::new("Unexpected token aheads", parser.position, parser).err();
        }

        parser.leave_nesting();
        Ok(query)
    }

    /// Skips whitespace and consumes the clause keyword, or restores the cursor.
    fn clause_ahead(parser: &mut QueryParser, keyword: Keyword) -> Result<bool, ParseError> {
        let pivot = parser.position;
        parser.next_non_whitespace()?;
        if parser.consume_keyword(keyword) {
            return Ok(true);
        }
        parser.rewind(pivot);
        Ok(false)
    }

    /// Clauses in their fixed order. Once a clause keyword is consumed its
    /// content must parse; there is no fallback interpretation.
    fn parse_statement(parser: &mut QueryParser) -> Result<Self, ParseError> {
        if !parser.consume_keyword(|keywords| &keywords.select) {
            return ParseError::new("The 'select' keyword is expected", parser.position, parser).err();
        }
        parser.expect_whitespace("Unexpected token aheads near by the select clause (field list)")?;

        let mut query = Query { fields: SelectFieldParser::parse(parser)?, ..Default::default() };

        if !Self::clause_ahead(parser, |keywords| &keywords.from)? {
            return ParseError::new("The 'from' clause is expected", parser.position, parser).err();
        }
        query.from = FromParser::parse(parser)?;

        if Self::clause_ahead(parser, |keywords| &keywords.r#where)? {
            query.r#where = Self::parse_conditions(parser, ConditionClause::Where)?;
        }

        if Self::clause_ahead(parser, |keywords| &keywords.group_by)? {
            query.group_by = GroupByParser::parse(parser)?;
            query.is_aggregation = true;
        }

        // accepted without GROUP BY so normalization can report the missing grouping
        if Self::clause_ahead(parser, |keywords| &keywords.having)? {
            query.having = Self::parse_conditions(parser, ConditionClause::Having)?;
        }

        if Self::clause_ahead(parser, |keywords| &keywords.order_by)? {
            query.order_by = OrderByInfo::parse(parser)?;
        }

        query.offset_and_limit = LimitAndOffsetParser::parse(parser)?;

        if Self::clause_ahead(parser, |keywords| &keywords.r#for)? {
            query.r#for = ForClause::parse(parser)?;
        }

        Ok(query)
    }

    fn parse_conditions(parser: &mut QueryParser, clause: ConditionClause) -> Result<Vec<Condition>, ParseError> {
        if parser.current() != '(' {
            let message = format!("Unexpected token aheads near by the '{}' clause", clause.name());
            parser.expect_whitespace(&message)?;
        }
        ConditionParser::parse(parser, clause)
    }

    pub fn primary(&self) -> Option<&ObjectInfo> {
        self.from.first()
    }
}

impl TryFrom<&str> for Query {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut parser = QueryParser::new(value);
        Query::parse(&mut parser)
    }
}

fn spelled(opcode: Opcode) -> &'static str {
    match opcode {
        Opcode::Not => "NOT",
        Opcode::And => "AND",
        Opcode::Or => "OR",
        Opcode::Like => "LIKE",
        Opcode::NotLike => "NOT LIKE",
        Opcode::In => "IN",
        Opcode::NotIn => "NOT IN",
        Opcode::Includes => "INCLUDES",
        Opcode::Excludes => "EXCLUDES",
        _ => opcode.keyword(),
    }
}

/// Infix rendering of a postfix condition list.
pub fn render_conditions(conditions: &[Condition]) -> String {
    let mut stack: Vec<String> = vec![];

    for condition in conditions {
        match condition {
            Condition::Noop => {},
            Condition::Unknown => stack.push("UNKNOWN".to_string()),
            Condition::Operand(field) => stack.push(field.to_string()),
            Condition::Operator(Opcode::Not) => {
                let operand = stack.pop().unwrap_or_default();
                stack.push(format!("NOT ({})", operand));
            },
            Condition::Operator(opcode) => {
                let rhs = stack.pop().unwrap_or_default();
                let lhs = stack.pop().unwrap_or_default();
                if opcode.is_logical() {
                    stack.push(format!("({} {} {})", lhs, spelled(*opcode), rhs));
                } else {
                    stack.push(format!("{} {} {}", lhs, spelled(*opcode), rhs));
                }
            },
        }
    }

    stack.join(" ")
}

fn join<T: Display>(items: &[T]) -> String {
    items.iter().map(|item| item.to_string()).collect::<Vec<_>>().join(", ")
}

impl Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&FieldInfo> = self.fields.iter().filter(|field| !field.not_selected).collect();
        write!(f, "SELECT {} FROM {}", join(&fields), join(&self.from))?;

        if !self.r#where.is_empty() {
            write!(f, " WHERE {}", render_conditions(&self.r#where))?;
        }
        if !self.group_by.is_empty() {
            write!(f, " GROUP BY {}", join(&self.group_by))?;
        }
        if !self.having.is_empty() {
            write!(f, " HAVING {}", render_conditions(&self.having))?;
        }
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY {}", join(&self.order_by))?;
        }
        if let Some(offset) = &self.offset_and_limit.offset {
            write!(f, " OFFSET {}", offset)?;
        }
        if let Some(limit) = &self.offset_and_limit.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        if !self.r#for.is_empty() {
            write!(f, " {}", self.r#for)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::{FieldKind, Query, RowBound}, QueryParser};

    #[test]
    pub fn test_query() {
        let text = r#"
SELECT Id, acc.Name, COUNT(Id) cnt, (SELECT Id FROM con.Departments)
FROM Contact con, con.Account acc
WHERE acc.Name = 'bar' AND (Age > 16 OR NOT Name LIKE 'a%')
GROUP BY Id, acc.Name
HAVING COUNT(Id) > 3
ORDER BY acc.Name DESC NULLS LAST
OFFSET 60
LIMIT :max
FOR VIEW
        "#;

        let query = Query::try_from(text).expect("Failed to parse query");

        assert_eq!(query.fields.len(), 4);
        assert_eq!(query.from.len(), 2);
        assert_eq!(query.r#where.len(), 12);
        assert_eq!(query.group_by.len(), 2);
        assert!(query.is_aggregation);
        assert_eq!(query.having.len(), 3);
        assert_eq!(query.order_by.len(), 1);
        assert_eq!(query.offset_and_limit.offset, Some(RowBound::Value(60)));
        assert_eq!(query.offset_and_limit.limit, Some(RowBound::Param("max".into())));
        assert!(query.r#for.view);
        assert!(query.fields[3].is_sub_query());
    }

    #[test]
    pub fn test_minimal_query() {
        let query = Query::try_from("select Id from Contact").expect("Failed to parse query");

        assert_eq!(query.fields.len(), 1);
        assert_eq!(query.primary().map(|object| object.name.clone()), Some(vec!["Contact".to_string()]));
        assert!(!query.is_aggregation);
        assert!(query.r#where.is_empty());
    }

    #[test]
    pub fn test_where_accepts_parenthesis_without_space() {
        let query = Query::try_from("SELECT Id FROM Contact WHERE(Id = 1)").expect("Failed to parse query");

        assert_eq!(query.r#where.len(), 3);
    }

    #[test]
    pub fn test_having_without_group_by_is_parsed() {
        let query = Query::try_from("SELECT COUNT(Id) FROM Contact HAVING COUNT(Id) > 0").expect("Failed to parse query");

        assert!(query.group_by.is_empty());
        assert_eq!(query.having.len(), 3);
    }

    #[test]
    pub fn test_conditional_sub_query() {
        let text = "SELECT Id FROM Contact WHERE AccountId IN (SELECT Id FROM Account WHERE Name = 'x')";

        let query = Query::try_from(text).expect("Failed to parse query");

        match query.r#where[1].operand().map(|field| &field.kind) {
            Some(FieldKind::SubQuery(sub_query)) => assert_eq!(sub_query.r#where.len(), 3),
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_statement_errors() {
        let cases = [
            ("SELECT Id", "The 'from' clause is expected"),
            ("SELECT Id FROM Contact extra tokens", "Unexpected token aheads"),
            ("SELECT Id FROM Contact WHERE", "Unexpected token aheads near by the 'where' clause (unknown operand1)"),
            ("SELECT Id FROM Contact FOR", "Unexpected token aheads near by the 'for' clause"),
            ("SELECT FROM Contact", "Unexpected token aheads near by the select clause (field list)"),
            ("UPDATE Contact", "The 'select' keyword is expected"),
            ("SELECT Id FROM Contact LIMIT 1 LIMIT 2", "Unexpected token aheads"),
        ];

        for (text, message) in cases {
            match Query::try_from(text) {
                Ok(_) => panic!("{text} should fail"),
                Err(err) => assert_eq!(err.message, message, "{text}"),
            }
        }
    }

    #[test]
    pub fn test_unclosed_sub_query() {
        match Query::try_from("SELECT Id, (SELECT Id FROM con.Departments FROM Contact con") {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.message, "Unexpected token aheads"),
        }
    }

    #[test]
    pub fn test_nesting_limit() {
        let text = "SELECT Id FROM Contact WHERE ((((Id = 1))))";
        let mut parser = QueryParser::new(text).with_max_depth(3);

        match Query::parse(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.message, "The expression is nested too deeply."),
        }

        let mut parser = QueryParser::new(text).with_max_depth(4);
        assert!(Query::parse(&mut parser).is_ok());
    }

    #[test]
    pub fn test_display_parses_back() {
        let text = "SELECT Id, MAX(Amount) top FROM Contact WHERE NOT (a = 1 OR b NOT IN ('x', :p)) AND c != null \
                    ORDER BY Id DESC LIMIT 10 OFFSET 5 FOR UPDATE TRACKING";

        let query = Query::try_from(text).expect("Failed to parse query");
        let rendered = query.to_string();
        let reparsed = Query::try_from(rendered.as_str()).expect("Failed to parse rendered query");

        assert_eq!(reparsed, query);
    }
}
