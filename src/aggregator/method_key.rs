//! Call-site identity for call events.
//!
//! A method key is `Class#method:line` for instance methods and
//! `Class.method:line` for static ones. The label is the same string
//! without the line and is what users see in JSON output.

use crate::parser::TraceEvent;
use std::borrow::Borrow;
use std::fmt;

/// Canonical identity of one call site
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodKey(String);

impl MethodKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for MethodKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MethodKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Whether an event takes part in method statistics
///
/// Only call events with a defining class are counted.
pub fn is_aggregated(event: &TraceEvent) -> bool {
    event.is_call() && !event.defined_class.is_empty()
}

/// `Class#method` or `Class.method`
pub fn method_label(event: &TraceEvent) -> String {
    let sep = if event.is_static { '.' } else { '#' };
    format!("{}{}{}", event.defined_class, sep, event.method_id)
}

/// Resolve the call site of an event that passed [`is_aggregated`]
pub fn resolve(event: &TraceEvent) -> MethodKey {
    MethodKey(format!("{}:{}", method_label(event), event.lineno))
}
