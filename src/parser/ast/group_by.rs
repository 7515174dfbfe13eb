use crate::parser::{ast::{DottedNameParser, FieldInfo}, ParseError, QueryParser};

const GROUP_BY_ERROR: &str = "Unexpected token aheads near by the 'group by' clause";

pub struct GroupByParser;

impl GroupByParser {
    fn parse_single(parser: &mut QueryParser) -> Result<FieldInfo, ParseError> {
        parser.next_non_whitespace()?;
        if parser.is_reserved_ahead() {
            return ParseError::new(GROUP_BY_ERROR, parser.position, parser).err();
        }

        match DottedNameParser::parse(parser)? {
            Some(name) => Ok(FieldInfo::field(name)),
            None => ParseError::new(GROUP_BY_ERROR, parser.position, parser).err(),
        }
    }

    /// Grouping keys after the GROUP BY keyword.
    pub fn parse(parser: &mut QueryParser) -> Result<Vec<FieldInfo>, ParseError> {
        let mut groups = vec![Self::parse_single(parser)?];

        loop {
            let pivot = parser.position;
            parser.next_non_whitespace()?;
            if !parser.consume_char(',') {
                parser.rewind(pivot);
                return Ok(groups);
            }
            groups.push(Self::parse_single(parser)?);
        }
    }
}
