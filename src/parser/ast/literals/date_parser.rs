use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::parser::{ast::Literal, ParseError, QueryParser};

static DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})[Tt]([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]{1,9}))?(?:([Zz])|([+-])([0-9]{2}):?([0-9]{2}))")
        .expect("valid datetime pattern")
});

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})").expect("valid date pattern")
});

static TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]{1,9}))?[Zz]?").expect("valid time pattern")
});

/// Date, datetime and time literals, all normalized to UTC.
pub struct DateParser;

impl DateParser {
    /// Tries datetime, then date, then time. `Ok(None)` leaves the cursor untouched.
    pub fn parse(parser: &mut QueryParser) -> Result<Option<Literal>, ParseError> {
        if !parser.current().is_ascii_digit() {
            return Ok(None);
        }

        let pivot = parser.position;
        let matched = {
            let rest = parser.rest();
            if let Some(captures) = DATE_TIME.captures(rest) {
                Some((captures[0].len(), Self::date_time(&captures).map(Literal::DateTime)))
            } else if let Some(captures) = DATE.captures(rest) {
                Some((captures[0].len(), Self::date(&captures).map(Literal::Date)))
            } else {
                TIME.captures(rest)
                    .map(|captures| (captures[0].len(), Self::time(&captures).map(Literal::Time)))
            }
        };

        let Some((length, literal)) = matched else {
            return Ok(None);
        };

        let end = parser.byte_offset(parser.position) + length;
        let mut probe = parser.position;
        while parser.byte_offset(probe) < end {
            probe += 1;
        }
        if !parser.is_word_boundary(probe) {
            return Ok(None);
        }

        parser.jump_bytes(length);
        match literal {
            Some(literal) => Ok(Some(literal)),
            None => ParseError::new("Invalid date/time literal", pivot, parser).err(),
        }
    }

    fn number(captures: &Captures, index: usize) -> u32 {
        captures.get(index).and_then(|found| found.as_str().parse().ok()).unwrap_or(0)
    }

    fn nanos(captures: &Captures, index: usize) -> u32 {
        match captures.get(index) {
            Some(found) => format!("{:0<9}", found.as_str()).parse().unwrap_or(0),
            None => 0,
        }
    }

    fn date(captures: &Captures) -> Option<DateTime<Utc>> {
        let year = Self::number(captures, 1) as i32;
        NaiveDate::from_ymd_opt(year, Self::number(captures, 2), Self::number(captures, 3))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|date| date.and_utc())
    }

    fn date_time(captures: &Captures) -> Option<DateTime<Utc>> {
        let year = Self::number(captures, 1) as i32;
        let date = NaiveDate::from_ymd_opt(year, Self::number(captures, 2), Self::number(captures, 3))?;
        let time = NaiveTime::from_hms_nano_opt(
            Self::number(captures, 4),
            Self::number(captures, 5),
            Self::number(captures, 6),
            Self::nanos(captures, 7),
        )?;
        let local = date.and_time(time).and_utc();

        if captures.get(8).is_some() {
            return Some(local);
        }

        let hours = Self::number(captures, 10) as i64;
        let minutes = Self::number(captures, 11) as i64;
        if hours > 23 || minutes > 59 {
            return None;
        }
        let offset = chrono::Duration::minutes(hours * 60 + minutes);
        match captures.get(9).map(|sign| sign.as_str()) {
            Some("-") => local.checked_add_signed(offset),
            _ => local.checked_sub_signed(offset),
        }
    }

    fn time(captures: &Captures) -> Option<DateTime<Utc>> {
        let time = NaiveTime::from_hms_nano_opt(
            Self::number(captures, 1),
            Self::number(captures, 2),
            Self::number(captures, 3),
            Self::nanos(captures, 4),
        )?;
        NaiveDate::from_ymd_opt(1970, 1, 1).map(|date| date.and_time(time).and_utc())
    }
}
