//! Data-driven style expressions.
//!
//! Pure builders producing the nested arrays the map library evaluates per
//! feature, e.g. as a `circle-color` paint value.

use crate::error::MapError;
use serde_json::{Value, json};

/// `["get", name]`
pub fn column(name: &str) -> Value {
    json!(["get", name])
}

/// `["case", ["boolean", ["get", name], false], when_true, when_false]`
pub fn boolean_switch(
    name: &str,
    when_true: impl Into<Value>,
    when_false: impl Into<Value>,
) -> Value {
    json!([
        "case",
        ["boolean", column(name), false],
        when_true.into(),
        when_false.into()
    ])
}

/// `["match", ["get", name], k1, v1, k2, v2, ..., default]`
///
/// Pairs keep the caller's order; keys are compared as strings.
pub fn group_lookup<K, V>(
    name: &str,
    mapping: impl IntoIterator<Item = (K, V)>,
    default: impl Into<Value>,
) -> Value
where
    K: ToString,
    V: Into<Value>,
{
    let mut expression = vec![json!("match"), column(name)];
    for (key, value) in mapping {
        expression.push(Value::String(key.to_string()));
        expression.push(value.into());
    }
    expression.push(default.into());
    Value::Array(expression)
}

/// `["step", ["get", name], c0, b0, c1, b1, c2, ...]`
///
/// Needs exactly one more colour than breaks: `colours[0]` applies below the
/// first break.
pub fn step_colours<B, C>(
    name: &str,
    breaks: impl IntoIterator<Item = B>,
    colours: impl IntoIterator<Item = C>,
) -> Result<Value, MapError>
where
    B: Into<Value>,
    C: Into<Value>,
{
    let breaks: Vec<Value> = breaks.into_iter().map(Into::into).collect();
    let colours: Vec<Value> = colours.into_iter().map(Into::into).collect();

    if colours.len() != breaks.len() + 1 {
        return Err(MapError::ArityMismatch {
            breaks: breaks.len(),
            colours: colours.len(),
            expected: breaks.len() + 1,
        });
    }

    let mut colours = colours.into_iter();
    let mut expression = vec![json!("step"), column(name)];
    expression.extend(colours.next());
    for (threshold, colour) in breaks.into_iter().zip(colours) {
        expression.push(threshold);
        expression.push(colour);
    }
    Ok(Value::Array(expression))
}
