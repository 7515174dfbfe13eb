use crate::parser::{
    ast::{DottedNameParser, FieldInfo, FieldKind, LiteralParser, SymbolParser},
    ParseError, QueryParser,
};

pub struct FunctionParser;

impl FunctionParser {
    /// `name ( arg, ... )`. When the identifier is not followed by `(` the
    /// cursor is restored and `Ok(None)` returned.
    pub fn parse(parser: &mut QueryParser) -> Result<Option<FieldInfo>, ParseError> {
        let pivot = parser.position;
        let Some(name) = SymbolParser::parse(parser)? else {
            return Ok(None);
        };

        parser.next_non_whitespace()?;
        if parser.current() != '(' || parser.eof() {
            parser.rewind(pivot);
            return Ok(None);
        }
        parser.next();
        parser.enter_nesting()?;

        let parameters = ArgsParser::parse(parser, pivot)?;

        parser.leave_nesting();
        Ok(Some(FieldInfo::function(&name, parameters)))
    }
}

pub struct ArgsParser;

impl ArgsParser {
    /// Arguments after the opening parenthesis, consuming the closing one.
    pub fn parse(parser: &mut QueryParser, pivot: usize) -> Result<Vec<FieldInfo>, ParseError> {
        let mut args = vec![];

        parser.next_non_whitespace()?;
        if parser.consume_char(')') {
            return Ok(args);
        }

        loop {
            parser.next_non_whitespace()?;
            args.push(Self::parse_arg(parser)?);
            parser.next_non_whitespace()?;

            if parser.consume_char(',') {
                continue;
            }
            if parser.consume_char(')') {
                return Ok(args);
            }
            return ParseError::new("')' is expected", pivot, parser).err();
        }
    }

    fn parse_arg(parser: &mut QueryParser) -> Result<FieldInfo, ParseError> {
        if let Some(function) = FunctionParser::parse(parser)? {
            return Ok(function);
        }

        if let Some(item) = LiteralParser::parse(parser)? {
            return Ok(FieldInfo::new(FieldKind::from(item)));
        }

        if let Some(name) = DottedNameParser::parse(parser)? {
            return Ok(FieldInfo::field(name));
        }

        ParseError::new("Unexpected token aheads near by the function arguments", parser.position, parser).err()
    }
}
