//! Conversion from serde_json::Value to cel_interpreter values

use cel_interpreter::objects::{Key, Map, Value as CelValue};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

/// Convert serde_json::Value to cel_interpreter::Value
///
/// Integers that fit `i64` become `Int`, larger ones `UInt`, everything else
/// `Float`.
pub fn json_to_cel(value: &JsonValue) -> CelValue {
    match value {
        JsonValue::Null => CelValue::Null,
        JsonValue::Bool(b) => CelValue::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CelValue::Int(i)
            } else if let Some(u) = n.as_u64() {
                CelValue::UInt(u)
            } else if let Some(f) = n.as_f64() {
                CelValue::Float(f)
            } else {
                CelValue::Null
            }
        }
        JsonValue::String(s) => CelValue::String(s.clone().into()),
        JsonValue::Array(arr) => {
            let items: Vec<CelValue> = arr.iter().map(json_to_cel).collect();
            CelValue::List(items.into())
        }
        JsonValue::Object(obj) => {
            let entries: HashMap<Key, CelValue> = obj
                .iter()
                .map(|(k, v)| (Key::from(k.clone()), json_to_cel(v)))
                .collect();
            CelValue::Map(Map {
                map: Arc::new(entries),
            })
        }
    }
}
