//! JsonLogic rule application over per-scope decisions

use serde_json::Value;

use super::error::{LogicError, Result};

/// Apply `rule` to the ordered scope `decisions`
///
/// With no decisions the rule is applied without data.
///
/// # Returns
///
/// JsonLogic truthiness of the rule result
pub fn apply(rule: &Value, decisions: &[bool]) -> Result<bool> {
    let data = if decisions.is_empty() {
        Value::Null
    } else {
        Value::Array(decisions.iter().map(|d| Value::Bool(*d)).collect())
    };

    let result = jsonlogic_rs::apply(rule, &data)
        .map_err(|e| LogicError::EvaluationError(e.to_string()))?;

    Ok(truthy(&result))
}

/// JsonLogic truthiness: `false`, `null`, `0`, `""` and `[]` are false
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}
