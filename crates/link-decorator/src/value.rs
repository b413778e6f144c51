//! Conversions between JSON metadata values and CEL values.
//!
//! Frontmatter arrives as `serde_json::Value`; expressions run on
//! `cel_interpreter::Value`. Both sides share one truthiness rule and one
//! display form so that literal comparisons and templated output agree.

use cel_interpreter::objects::{Key, Map};
use cel_interpreter::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Converts a JSON value into a CEL value.
pub fn to_cel(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                n.as_f64().map_or(Value::Null, Value::Float)
            }
        }
        serde_json::Value::String(s) => Value::String(Arc::new(s.clone())),
        serde_json::Value::Array(items) => {
            Value::List(Arc::new(items.iter().map(to_cel).collect()))
        }
        serde_json::Value::Object(obj) => {
            let fields: HashMap<Arc<String>, Value> = obj
                .iter()
                .map(|(k, v)| (Arc::new(k.clone()), to_cel(v)))
                .collect();
            Value::Map(Map::from(fields))
        }
    }
}

/// Looks up a string-keyed field of a CEL map.
pub fn map_field<'a>(map: &'a Map, name: &str) -> Option<&'a Value> {
    map.map.get(&Key::String(Arc::new(name.to_string())))
}

/// `false`, zero, NaN, the empty string and `null` are falsy; lists and maps
/// are truthy even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::UInt(u) => *u != 0,
        Value::Float(f) => *f != 0.0 && !f.is_nan(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// How any map displays, whatever its contents.
pub const OBJECT_DISPLAY: &str = "[object Object]";

/// Display form of a CEL value, used for templated text, icons and classes.
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        Value::Float(f) => format_float(*f),
        Value::String(s) => s.to_string(),
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Map(_) => OBJECT_DISPLAY.to_string(),
        other => format!("{:?}", other),
    }
}

/// Display form of a JSON value; literal frontmatter rules compare against it.
pub fn stringify(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                n.as_f64().map_or_else(|| n.to_string(), format_float)
            }
        }
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::Null => String::new(),
                other => stringify(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        serde_json::Value::Object(_) => OBJECT_DISPLAY.to_string(),
    }
}

/// Integral floats print without a fractional part: `10.0` → `10`.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if f.fract() == 0.0 {
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}
