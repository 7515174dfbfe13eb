use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{
    de::{self, Error as _, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::parser::ast::{FieldInfo, FieldKind, ListItem, Literal};

/// Float payloads that JSON numbers cannot carry.
const NAN: &str = "NaN";
const INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";

fn format_instant(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_instant<E: de::Error>(text: &str) -> Result<DateTime<Utc>, E> {
    DateTime::parse_from_rfc3339(text)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| E::custom(format!("invalid date '{}': {}", text, err)))
}

#[derive(Deserialize)]
struct RangeText {
    start: String,
    end: String,
}

struct FloatVisitor;

impl<'de> Visitor<'de> for FloatVisitor {
    type Value = f64;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a number, \"NaN\", \"Infinity\" or \"-Infinity\"")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
        Ok(value as f64)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
        Ok(value as f64)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
        match value {
            NAN => Ok(f64::NAN),
            INFINITY => Ok(f64::INFINITY),
            NEG_INFINITY => Ok(f64::NEG_INFINITY),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}

/// The `value` member of a literal node, shaped by the literal type.
pub(crate) struct LiteralPayload<'a>(pub &'a Literal);

impl Serialize for LiteralPayload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Literal::Null => serializer.serialize_unit(),
            Literal::Int(value) => serializer.serialize_i64(*value),
            Literal::Float(value) => {
                let value = value.into_inner();
                if value.is_nan() {
                    serializer.serialize_str(NAN)
                } else if value.is_infinite() {
                    serializer.serialize_str(if value < 0.0 { NEG_INFINITY } else { INFINITY })
                } else {
                    serializer.serialize_f64(value)
                }
            },
            Literal::Bool(value) => serializer.serialize_bool(*value),
            Literal::String(value) => serializer.serialize_str(value),
            Literal::Blob(bytes) => bytes.serialize(serializer),
            Literal::Date(instant) | Literal::DateTime(instant) | Literal::Time(instant) =>
                serializer.serialize_str(&format_instant(instant)),
            Literal::DateTimeRange { start, end } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("start", &format_instant(start))?;
                map.serialize_entry("end", &format_instant(end))?;
                map.end()
            },
            Literal::List(items) => {
                let items: Vec<FieldInfo> = items.iter()
                    .map(|item| FieldInfo::new(FieldKind::from(item.clone())))
                    .collect();
                items.serialize(serializer)
            },
        }
    }
}

/// Type names that denote a literal node.
pub(crate) fn is_literal_type(type_name: &str) -> bool {
    matches!(
        type_name,
        "Null" | "Int" | "Float" | "Bool" | "String" | "Blob" | "Date" | "DateTime" | "Time" | "DateTimeRange" | "List"
    )
}

/// Reads the `value` of a literal node whose type is already known.
///
/// The payload is read straight from `deserializer` so list items reach the
/// field visitor in their written key order.
pub(crate) fn decode_literal<'de, D: Deserializer<'de>>(type_name: &str, deserializer: D) -> Result<Literal, D::Error> {
    let literal = match type_name {
        "Null" => {
            <()>::deserialize(deserializer)?;
            Literal::Null
        },
        "Int" => Literal::Int(i64::deserialize(deserializer)?),
        "Float" => Literal::float(deserializer.deserialize_any(FloatVisitor)?),
        "Bool" => Literal::Bool(bool::deserialize(deserializer)?),
        "String" => Literal::String(String::deserialize(deserializer)?),
        "Blob" => Literal::Blob(Vec::<u8>::deserialize(deserializer)?),
        "Date" => Literal::Date(parse_instant(&String::deserialize(deserializer)?)?),
        "DateTime" => Literal::DateTime(parse_instant(&String::deserialize(deserializer)?)?),
        "Time" => Literal::Time(parse_instant(&String::deserialize(deserializer)?)?),
        "DateTimeRange" => {
            let range = RangeText::deserialize(deserializer)?;
            Literal::DateTimeRange {
                start: parse_instant(&range.start)?,
                end: parse_instant(&range.end)?,
            }
        },
        "List" => {
            let items = Vec::<FieldInfo>::deserialize(deserializer)?
                .into_iter()
                .map(|field| match field.kind {
                    FieldKind::Literal(literal) => Ok(ListItem::Literal(literal)),
                    FieldKind::Parameter(name) => Ok(ListItem::Parameter(name)),
                    FieldKind::DateTimeLiteral(literal) => Ok(ListItem::DateTimeLiteral(literal)),
                    other => Err(D::Error::custom(format!("a list cannot hold a {} item", other.type_name()))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Literal::List(items)
        },
        other => return Err(D::Error::custom(format!("unknown literal type: {}", other))),
    };
    Ok(literal)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        codec::literal::{decode_literal, LiteralPayload},
        parser::ast::{DateTimeLiteral, ListItem, Literal},
    };

    fn decode_text(type_name: &str, text: &str) -> Result<Literal, serde_json::Error> {
        let mut deserializer = serde_json::Deserializer::from_str(text);
        decode_literal(type_name, &mut deserializer)
    }

    #[test]
    pub fn test_non_finite_floats_are_strings() {
        assert_eq!(serde_json::to_value(LiteralPayload(&Literal::float(f64::NAN))).expect("encode"), json!("NaN"));
        assert_eq!(serde_json::to_value(LiteralPayload(&Literal::float(f64::NEG_INFINITY))).expect("encode"), json!("-Infinity"));
        assert_eq!(serde_json::to_value(LiteralPayload(&Literal::float(1.5))).expect("encode"), json!(1.5));

        match decode_literal("Float", json!("Infinity")) {
            Ok(Literal::Float(value)) => assert!(value.into_inner().is_infinite()),
            _ => panic!(),
        }
        assert_eq!(decode_literal("Float", json!("NaN")).expect("decode"), Literal::float(f64::NAN));
        assert_eq!(decode_literal("Float", json!(2)).expect("decode"), Literal::float(2.0));
        assert!(decode_literal("Float", json!("Inf")).is_err());
    }

    #[test]
    pub fn test_list_items_keep_their_kind() {
        let list = Literal::List(vec![
            ListItem::Literal(Literal::String("a".into())),
            ListItem::Parameter("owner".into()),
            ListItem::DateTimeLiteral(DateTimeLiteral { name: "LAST_N_DAYS".into(), n: 3 }),
        ]);

        let text = serde_json::to_string(&LiteralPayload(&list)).expect("encode");
        assert_eq!(
            text,
            r#"[{"type":"String","value":"a"},{"type":"ParameterizedValue","name":"owner"},{"type":"DateTimeLiteralName","name":"LAST_N_DAYS","value":3}]"#
        );

        assert_eq!(decode_text("List", &text).expect("decode"), list);
    }

    #[test]
    pub fn test_payload_shape_is_checked() {
        assert!(decode_literal("Int", json!("1")).is_err());
        assert!(decode_literal("Date", json!("not a date")).is_err());
        assert!(decode_text("List", r#"[{"type":"Field","name":["Id"]}]"#).is_err());
        assert!(decode_text("List", r#"[{"name":"owner","type":"ParameterizedValue"}]"#).is_err());
    }

    #[test]
    pub fn test_date_time_range_payload() {
        let text = r#"{"start":"2020-01-01T00:00:00Z","end":"2020-01-02T00:00:00Z"}"#;
        match decode_text("DateTimeRange", text).expect("decode") {
            Literal::DateTimeRange { start, end } => assert!(start < end),
            _ => panic!(),
        }
    }
}
