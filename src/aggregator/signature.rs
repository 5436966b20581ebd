//! Parameter signatures.
//!
//! A signature is the comma-joined list of one invocation's argument values
//! and is used to count how many distinct argument shapes a method sees.
//!
//! Values are canonicalised as follows:
//! - strings are used verbatim
//! - a missing or `null` value becomes `<nil>`
//! - numbers and booleans use their JSON text (`42`, `true`)
//! - arrays and objects use compact JSON with sorted keys

use crate::parser::Parameter;
use crate::utils::config::NIL_MARKER;
use serde_json::Value;

/// Build the signature of a parameter list, preserving order
pub fn build(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|param| canonical_value(param.value.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// String form of one parameter value
pub fn canonical_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NIL_MARKER.to_string(),
        Some(Value::String(s)) => s.clone(),
        // Display on Value is compact JSON; maps are ordered by key
        Some(other) => other.to_string(),
    }
}
