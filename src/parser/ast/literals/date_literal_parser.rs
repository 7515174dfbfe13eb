use crate::parser::{ast::DateTimeLiteral, ParseError, QueryParser, WordComparer};

/// (keyword, takes a `:n` count)
const DATE_LITERALS: [(&str, bool); 37] = [
    ("NEXT_N_FISCAL_QUARTERS", true),
    ("LAST_N_FISCAL_QUARTERS", true),
    ("NEXT_N_FISCAL_YEARS", true),
    ("LAST_N_FISCAL_YEARS", true),
    ("THIS_FISCAL_QUARTER", false),
    ("LAST_FISCAL_QUARTER", false),
    ("NEXT_FISCAL_QUARTER", false),
    ("THIS_FISCAL_YEAR", false),
    ("LAST_FISCAL_YEAR", false),
    ("NEXT_FISCAL_YEAR", false),
    ("NEXT_N_QUARTERS", true),
    ("LAST_N_QUARTERS", true),
    ("NEXT_N_MONTHS", true),
    ("LAST_N_MONTHS", true),
    ("NEXT_N_YEARS", true),
    ("LAST_N_YEARS", true),
    ("NEXT_N_WEEKS", true),
    ("LAST_N_WEEKS", true),
    ("LAST_N_DAYS", true),
    ("NEXT_N_DAYS", true),
    ("LAST_90_DAYS", false),
    ("NEXT_90_DAYS", false),
    ("THIS_QUARTER", false),
    ("LAST_QUARTER", false),
    ("NEXT_QUARTER", false),
    ("LAST_MONTH", false),
    ("THIS_MONTH", false),
    ("NEXT_MONTH", false),
    ("LAST_WEEK", false),
    ("THIS_WEEK", false),
    ("NEXT_WEEK", false),
    ("THIS_YEAR", false),
    ("LAST_YEAR", false),
    ("NEXT_YEAR", false),
    ("YESTERDAY", false),
    ("TOMORROW", false),
    ("TODAY", false),
];

pub struct DateLiteralParser;

impl DateLiteralParser {
    pub fn lookup(word: &str) -> Option<(&'static str, bool)> {
        DATE_LITERALS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(word))
            .copied()
    }

    /// `Ok(None)` leaves the cursor untouched when the word at the cursor is
    /// not a date keyword.
    pub fn parse(parser: &mut QueryParser) -> Result<Option<DateTimeLiteral>, ParseError> {
        let pivot = parser.position;
        let first = parser.current();
        if parser.eof() || !(first.is_ascii_alphabetic() || first == '_') {
            return Ok(None);
        }

        let mut end = parser.position;
        while end < parser.length && WordComparer::is_word_char(parser.text_v[end]) {
            end += 1;
        }
        let word = parser.text_from_range(parser.position, end);

        let Some((name, takes_count)) = Self::lookup(&word) else {
            return Ok(None);
        };
        parser.rewind(end);

        let mut n = 0;
        if takes_count && parser.current() == ':' {
            parser.next();
            let digits = Self::collect_digits(parser);
            if digits.is_empty() || !parser.is_word_boundary(parser.position) {
                return ParseError::new("A positive integer is expected after the date literal.", pivot, parser).err();
            }
            n = match digits.parse::<i64>() {
                Ok(value) => value,
                Err(_) => return ParseError::new("The date literal count is out of range.", pivot, parser).err(),
            };
        }

        Ok(Some(DateTimeLiteral { name: name.to_string(), n }))
    }

    fn collect_digits(parser: &mut QueryParser) -> String {
        let start = parser.position;
        while parser.current().is_ascii_digit() && !parser.eof() {
            parser.next();
        }
        parser.text_from_pivot(start)
    }
}
