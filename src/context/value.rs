//! Config values that may refer to environment variables.
//!
//! A value written as `$NAME` is not stored literally: it is read from the
//! environment each time it is used.

use std::env;

/// Whether a stored value is a `$VARIABLE` reference
pub fn is_env_reference(value: &str) -> bool {
    value.trim_start().starts_with('$')
}

/// Resolve a stored value against the process environment
pub fn resolve_value(value: &str) -> String {
    resolve_value_with(value, |name| env::var(name).ok())
}

/// Resolve a stored value using a custom variable lookup
pub fn resolve_value_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    match value.trim().strip_prefix('$') {
        Some(name) if !name.is_empty() => lookup(name).unwrap_or_default(),
        _ => value.to_string(),
    }
}
