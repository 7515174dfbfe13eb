use std::fmt;

use serde::{
    de::{self, DeserializeSeed, Error as _, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use crate::{
    codec::literal::{decode_literal, is_literal_type, LiteralPayload},
    parser::ast::{DateTimeLiteral, FieldInfo, FieldKind, Literal, Query},
};

const FIELDS: &[&str] = &[
    "type", "name", "value", "aliasName", "parameters", "subQuery",
    "notSelected", "aggregated", "key", "columnId", "colIndex",
];

impl Serialize for FieldInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.kind.type_name())?;

        match &self.kind {
            FieldKind::Field { name } | FieldKind::FieldSet { name } => map.serialize_entry("name", name)?,
            FieldKind::Function { name, .. } | FieldKind::Parameter(name) => map.serialize_entry("name", name)?,
            FieldKind::DateTimeLiteral(literal) => {
                map.serialize_entry("name", &literal.name)?;
                map.serialize_entry("value", &literal.n)?;
            },
            FieldKind::Literal(Literal::Null) => {},
            FieldKind::Literal(literal) => map.serialize_entry("value", &LiteralPayload(literal))?,
            FieldKind::SubQuery(_) => {},
        }

        if let Some(alias) = &self.alias {
            map.serialize_entry("aliasName", alias)?;
        }
        match &self.kind {
            FieldKind::Function { parameters, .. } if !parameters.is_empty() => map.serialize_entry("parameters", parameters)?,
            FieldKind::SubQuery(query) => map.serialize_entry("subQuery", query)?,
            _ => {},
        }
        if self.not_selected {
            map.serialize_entry("notSelected", &true)?;
        }
        if self.aggregated {
            map.serialize_entry("aggregated", &true)?;
        }
        if !self.key.is_empty() {
            map.serialize_entry("key", &self.key)?;
        }
        if let Some(column_id) = self.column_id {
            map.serialize_entry("columnId", &column_id)?;
        }
        if let Some(col_index) = self.col_index {
            map.serialize_entry("colIndex", &col_index)?;
        }
        map.end()
    }
}

/// `name` is a path for fields and field sets, a single word otherwise.
enum Name {
    Path(Vec<String>),
    Word(String),
}

enum Payload {
    Literal(Literal),
    Count(i64),
}

fn known_type<E: de::Error>(type_name: &Option<String>, key: &str) -> Result<String, E> {
    type_name.clone().ok_or_else(|| E::custom(format!("'{}' arrived before 'type'", key)))
}

/// Reads a `value` member once the node type is known.
struct PayloadSeed<'a> {
    type_name: &'a str,
}

impl<'de> DeserializeSeed<'de> for PayloadSeed<'_> {
    type Value = Payload;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Payload, D::Error> {
        match self.type_name {
            "DateTimeLiteralName" => i64::deserialize(deserializer).map(Payload::Count),
            type_name if is_literal_type(type_name) => decode_literal(type_name, deserializer).map(Payload::Literal),
            other => Err(D::Error::custom(format!("a {} node has no value", other))),
        }
    }
}

struct FieldInfoVisitor;

impl<'de> Visitor<'de> for FieldInfoVisitor {
    type Value = FieldInfo;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a field info object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<FieldInfo, A::Error> {
        let mut type_name: Option<String> = None;
        let mut name: Option<Name> = None;
        let mut payload: Option<Payload> = None;
        let mut parameters: Vec<FieldInfo> = vec![];
        let mut sub_query: Option<Box<Query>> = None;
        let mut field = FieldInfo::default();

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "type" => type_name = Some(map.next_value()?),
                "name" => {
                    let type_name = known_type::<A::Error>(&type_name, "name")?;
                    name = Some(match type_name.as_str() {
                        "Field" | "FieldSet" => Name::Path(map.next_value()?),
                        _ => Name::Word(map.next_value()?),
                    });
                },
                "value" => {
                    let type_name = known_type::<A::Error>(&type_name, "value")?;
                    payload = Some(map.next_value_seed(PayloadSeed { type_name: &type_name })?);
                },
                "aliasName" => field.alias = Some(map.next_value()?),
                "parameters" => parameters = map.next_value()?,
                "subQuery" => sub_query = Some(map.next_value()?),
                "notSelected" => field.not_selected = map.next_value()?,
                "aggregated" => field.aggregated = map.next_value()?,
                "key" => field.key = map.next_value()?,
                "columnId" => field.column_id = Some(map.next_value()?),
                "colIndex" => field.col_index = Some(map.next_value()?),
                other => return Err(de::Error::unknown_field(other, FIELDS)),
            }
        }

        let type_name = type_name.ok_or_else(|| A::Error::missing_field("type"))?;
        let path = |name: Option<Name>| -> Result<Vec<String>, A::Error> {
            match name {
                Some(Name::Path(path)) => Ok(path),
                _ => Err(de::Error::missing_field("name")),
            }
        };
        let word = |name: Option<Name>| -> Result<String, A::Error> {
            match name {
                Some(Name::Word(word)) => Ok(word),
                _ => Err(de::Error::missing_field("name")),
            }
        };

        field.kind = match type_name.as_str() {
            "Field" => FieldKind::Field { name: path(name)? },
            "FieldSet" => FieldKind::FieldSet { name: path(name)? },
            "Function" => FieldKind::Function { name: word(name)?, parameters },
            "SubQuery" => FieldKind::SubQuery(sub_query.ok_or_else(|| A::Error::missing_field("subQuery"))?),
            "ParameterizedValue" => FieldKind::Parameter(word(name)?),
            "DateTimeLiteralName" => {
                let n = match payload {
                    Some(Payload::Count(n)) => n,
                    _ => 0,
                };
                FieldKind::DateTimeLiteral(DateTimeLiteral { name: word(name)?, n })
            },
            "Null" => FieldKind::Literal(Literal::Null),
            literal if is_literal_type(literal) => match payload {
                Some(Payload::Literal(literal)) => FieldKind::Literal(literal),
                _ => return Err(de::Error::missing_field("value")),
            },
            other => return Err(de::Error::custom(format!("unknown field type: {}", other))),
        };
        Ok(field)
    }
}

impl<'de> Deserialize<'de> for FieldInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FieldInfoVisitor)
    }
}
