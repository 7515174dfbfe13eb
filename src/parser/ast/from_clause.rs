use crate::parser::{
    ast::{AliasParser, DottedNameParser, ObjectInfo},
    ParseError, QueryParser,
};

const FROM_ERROR: &str = "Unexpected token aheads near by the 'from' clause";

pub struct FromParser;

impl FromParser {
    fn parse_single(parser: &mut QueryParser) -> Result<ObjectInfo, ParseError> {
        parser.next_non_whitespace()?;
        if parser.is_reserved_ahead() {
            return ParseError::new(FROM_ERROR, parser.position, parser).err();
        }

        let Some(name) = DottedNameParser::parse(parser)? else {
            return ParseError::new(FROM_ERROR, parser.position, parser).err();
        };

        Ok(ObjectInfo::new(name, AliasParser::parse(parser)?))
    }

    /// Object list after the FROM keyword.
    pub fn parse(parser: &mut QueryParser) -> Result<Vec<ObjectInfo>, ParseError> {
        let mut objects = vec![Self::parse_single(parser)?];

        loop {
            let pivot = parser.position;
            parser.next_non_whitespace()?;
            if !parser.consume_char(',') {
                parser.rewind(pivot);
                return Ok(objects);
            }
            objects.push(Self::parse_single(parser)?);
        }
    }
}
