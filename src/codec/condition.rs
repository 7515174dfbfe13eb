use std::fmt;

use serde::{
    de::{self, Error as _, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::parser::ast::{Condition, FieldInfo, Opcode};

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("opcode", self.opcode_name())?;
        if let Condition::Operand(field) = self {
            map.serialize_entry("value", field)?;
        }
        map.end()
    }
}

struct ConditionVisitor;

impl<'de> Visitor<'de> for ConditionVisitor {
    type Value = Condition;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a condition object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Condition, A::Error> {
        let mut condition: Option<Condition> = None;
        let mut operand: Option<FieldInfo> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "opcode" => {
                    let name: String = map.next_value()?;
                    condition = Some(match name.as_str() {
                        "Noop" => Condition::Noop,
                        "Unknown" => Condition::Unknown,
                        "FieldInfo" => Condition::Operand(FieldInfo::default()),
                        other => Opcode::from_name(other)
                            .map(Condition::Operator)
                            .ok_or_else(|| A::Error::custom(format!("unknown opcode: {}", other)))?,
                    });
                },
                "value" => match condition {
                    Some(Condition::Operand(_)) => operand = Some(map.next_value()?),
                    Some(_) => return Err(A::Error::custom("only a FieldInfo condition carries a value")),
                    None => return Err(A::Error::custom("'value' arrived before 'opcode'")),
                },
                other => return Err(de::Error::unknown_field(other, &["opcode", "value"])),
            }
        }

        match condition {
            Some(Condition::Operand(_)) => operand
                .map(Condition::Operand)
                .ok_or_else(|| A::Error::missing_field("value")),
            Some(condition) => Ok(condition),
            None => Err(A::Error::missing_field("opcode")),
        }
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ConditionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::parser::ast::{Condition, FieldInfo, Literal, Opcode};

    #[test]
    pub fn test_symbolic_opcodes() {
        let conditions = vec![
            Condition::Operand(FieldInfo::literal(Literal::Bool(true))),
            Condition::Operator(Opcode::Not),
            Condition::Noop,
        ];

        let value = serde_json::to_value(&conditions).expect("Failed to encode");
        assert_eq!(value, json!([
            { "opcode": "FieldInfo", "value": { "type": "Bool", "value": true } },
            { "opcode": "Not" },
            { "opcode": "Noop" },
        ]));

        let decoded: Vec<Condition> = serde_json::from_value(value).expect("Failed to decode");
        assert_eq!(decoded, conditions);
    }

    #[test]
    pub fn test_malformed_conditions() {
        assert!(serde_json::from_str::<Condition>(r#"{"value":{"type":"Null"},"opcode":"FieldInfo"}"#).is_err());
        assert!(serde_json::from_str::<Condition>(r#"{"opcode":"Xor"}"#).is_err());
        assert!(serde_json::from_str::<Condition>(r#"{"opcode":"FieldInfo"}"#).is_err());
        assert!(serde_json::from_str::<Condition>(r#"{"opcode":"And","value":{"type":"Null"}}"#).is_err());
    }
}
