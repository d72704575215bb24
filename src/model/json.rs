//! JSON bridge for values

use serde_json::{Map, Number, Value as JsonValue};

use super::collections::{MapKey, Mapping};
use super::value::{Payload, Value};

impl Value {
    /// Build a value from JSON.
    ///
    /// Objects become mappings keyed by text, arrays become sequences and
    /// numbers take the integer path whenever they fit in an `i64`.
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::null(),
            JsonValue::Bool(b) => Value::bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::integer(i),
                None => Value::float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::text(s.clone()),
            JsonValue::Array(items) => Value::list(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(fields) => Value::mapping(
                fields
                    .iter()
                    .map(|(k, v)| (MapKey::Text(k.clone()), Value::from_json(v)))
                    .collect::<Mapping>(),
            ),
        }
    }

    /// Render the value as JSON.
    ///
    /// Structured payloads without a JSON counterpart (functions, patterns,
    /// objects) are rendered as their display text.
    pub fn to_json(&self) -> JsonValue {
        let Some(payload) = self.payload() else {
            return JsonValue::Null;
        };
        match payload {
            Payload::Bool(b) => JsonValue::Bool(*b),
            Payload::Integer(i) => JsonValue::from(*i),
            Payload::Float(x) => Number::from_f64(*x).map_or(JsonValue::Null, JsonValue::Number),
            Payload::Text(s) => JsonValue::String(s.clone()),
            Payload::Sequence(seq) => {
                JsonValue::Array(seq.to_vec().iter().map(Value::to_json).collect())
            }
            Payload::Mapping(map) => JsonValue::Object(
                map.entries()
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
            Payload::Composite(composite) => {
                let mut fields = Map::new();
                for name in composite.attribute_names() {
                    let value = composite.get(&name).map_or(JsonValue::Null, |v| v.to_json());
                    fields.insert(name, value);
                }
                JsonValue::Object(fields)
            }
            Payload::Tags(tags) => {
                let mut fields = Map::new();
                for name in tags.tag_names() {
                    let value = tags.get_tag(&name).map_or(JsonValue::Null, |v| v.to_json());
                    fields.insert(name, value);
                }
                JsonValue::Object(fields)
            }
            Payload::Record(record) => {
                let guard = record.read();
                let mut fields = Map::new();
                for key in guard.keys() {
                    let value = guard.get(&key).map_or(JsonValue::Null, |v| v.to_json());
                    fields.insert(key.name().to_string(), value);
                }
                JsonValue::Object(fields)
            }
            Payload::Key(key) => JsonValue::String(key.name().to_string()),
            other => JsonValue::String(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_keep_compute_path() {
        assert_eq!(Value::from_json(&json!(2)).payload(), Some(&Payload::Integer(2)));
        assert_eq!(Value::from_json(&json!(2.5)).payload(), Some(&Payload::Float(2.5)));
    }

    #[test]
    fn test_nested_structures() {
        let json = json!({"a": [1, "x", null], "b": true});
        let value = Value::from_json(&json);
        assert_eq!(value.to_json(), json);
    }
}
