use chrono::{DateTime, SecondsFormat, Utc};
use ordered_float::OrderedFloat;
use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Null,
    Int(i64),
    Float(OrderedFloat<f64>),
    Bool(bool),
    String(String),
    Blob(Vec<u8>),
    Date(DateTime<Utc>),
    DateTime(DateTime<Utc>),
    Time(DateTime<Utc>),
    DateTimeRange { start: DateTime<Utc>, end: DateTime<Utc> },
    List(Vec<ListItem>),
}

/// One entry of a parenthesized value list, e.g. `IN ('a', :b, TODAY)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListItem {
    Literal(Literal),
    Parameter(String),
    DateTimeLiteral(DateTimeLiteral),
}

/// Relative date keyword such as `TODAY` or `LAST_N_DAYS:3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateTimeLiteral {
    pub name: String,
    pub n: i64,
}

impl Literal {
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Null => "Null",
            Literal::Int(_) => "Int",
            Literal::Float(_) => "Float",
            Literal::Bool(_) => "Bool",
            Literal::String(_) => "String",
            Literal::Blob(_) => "Blob",
            Literal::Date(_) => "Date",
            Literal::DateTime(_) => "DateTime",
            Literal::Time(_) => "Time",
            Literal::DateTimeRange { .. } => "DateTimeRange",
            Literal::List(_) => "List",
        }
    }

    pub fn float(value: f64) -> Self {
        Literal::Float(OrderedFloat(value))
    }
}

fn format_instant(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(n) => {
                let n = n.into_inner();
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    write!(f, "{}Infinity", if n < 0.0 { "-" } else { "" })
                } else {
                    write!(f, "{:?}", n)
                }
            },
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::String(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Literal::Blob(bytes) => write!(f, "<blob {} bytes>", bytes.len()),
            Literal::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Literal::DateTime(d) => write!(f, "{}", format_instant(d)),
            Literal::Time(d) => write!(f, "{}", d.format("%H:%M:%S%.fZ")),
            Literal::DateTimeRange { start, end } => write!(f, "[{}, {}]", format_instant(start), format_instant(end)),
            Literal::List(items) => {
                write!(f, "(")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            },
        }
    }
}

impl Display for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListItem::Literal(literal) => write!(f, "{}", literal),
            ListItem::Parameter(name) => write!(f, ":{}", name),
            ListItem::DateTimeLiteral(literal) => write!(f, "{}", literal),
        }
    }
}

impl Display for DateTimeLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.contains("_N_") {
            write!(f, "{}:{}", self.name, self.n)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::parser::ast::{DateTimeLiteral, ListItem, Literal};

    #[test]
    pub fn test_display_scalars() {
        assert_eq!(Literal::Null.to_string(), "null");
        assert_eq!(Literal::Int(-3).to_string(), "-3");
        assert_eq!(Literal::float(1.5).to_string(), "1.5");
        assert_eq!(Literal::float(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Literal::float(f64::NAN).to_string(), "NaN");
        assert_eq!(Literal::String("it's".into()).to_string(), "'it\\'s'");
    }

    #[test]
    pub fn test_display_dates() {
        let instant = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();

        assert_eq!(Literal::Date(instant).to_string(), "2021-03-04");
        assert_eq!(Literal::DateTime(instant).to_string(), "2021-03-04T05:06:07Z");
    }

    #[test]
    pub fn test_display_list() {
        let list = Literal::List(vec![
            ListItem::Literal(Literal::Int(1)),
            ListItem::Parameter("p".into()),
            ListItem::DateTimeLiteral(DateTimeLiteral { name: "LAST_N_DAYS".into(), n: 2 }),
        ]);

        assert_eq!(list.to_string(), "(1, :p, LAST_N_DAYS:2)");
    }

    #[test]
    pub fn test_nan_equals_itself() {
        assert_eq!(Literal::float(f64::NAN), Literal::float(f64::NAN));
    }
}
