use crate::parser::{
    ast::{DottedNameParser, FieldInfo, FunctionParser, Query, SymbolParser},
    ParseError, QueryParser,
};

const FIELD_LIST_ERROR: &str = "Unexpected token aheads near by the select clause (field list)";

/// Optional trailing alias: a plain identifier that is not a clause keyword.
pub struct AliasParser;

impl AliasParser {
    pub fn parse(parser: &mut QueryParser) -> Result<Option<String>, ParseError> {
        let pivot = parser.position;
        parser.next_non_whitespace()?;

        if parser.is_reserved_ahead() || !SymbolParser::is_symbol(parser) {
            parser.rewind(pivot);
            return Ok(None);
        }

        SymbolParser::parse(parser)
    }
}

pub struct SelectFieldParser;

impl SelectFieldParser {
    /// One select item: a function call, a dotted name or a subquery,
    /// optionally followed by an alias.
    pub fn parse_single(parser: &mut QueryParser) -> Result<FieldInfo, ParseError> {
        parser.next_non_whitespace()?;
        if parser.is_reserved_ahead() {
            return ParseError::new(FIELD_LIST_ERROR, parser.position, parser).err();
        }

        let field = if Query::is_sub_query_ahead(parser)? {
            FieldInfo::sub_query(Query::parse_sub_query(parser)?)
        } else if let Some(function) = FunctionParser::parse(parser)? {
            function
        } else if let Some(name) = DottedNameParser::parse(parser)? {
            FieldInfo::field(name)
        } else {
            return ParseError::new(FIELD_LIST_ERROR, parser.position, parser).err();
        };

        Ok(field.with_alias(AliasParser::parse(parser)?))
    }

    pub fn parse(parser: &mut QueryParser) -> Result<Vec<FieldInfo>, ParseError> {
        let mut fields = vec![Self::parse_single(parser)?];

        loop {
            let pivot = parser.position;
            parser.next_non_whitespace()?;
            if !parser.consume_char(',') {
                parser.rewind(pivot);
                return Ok(fields);
            }
            fields.push(Self::parse_single(parser)?);
        }
    }
}
