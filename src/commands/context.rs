//! Context management commands.
//!
//! Each function returns the line to print so that the command output can
//! be checked without capturing stdout.

use crate::context::ContextStore;
use anyhow::{Context as _, Result};

pub fn add_context(store: &mut ContextStore, name: &str, url: &str) -> Result<String> {
    store.add(name, url)?;
    Ok(format!("successfully added new context '{}'", name))
}

pub fn current_context(store: &ContextStore) -> Result<String> {
    let context = store.current().context("no context selected")?;
    Ok(format!("{}: {}", store.current_name(), context.url()))
}

/// Set a variable on the named context, or on the current one
pub fn set_variable(
    store: &mut ContextStore,
    context: Option<&str>,
    key: &str,
    value: &str,
) -> Result<String> {
    let name = context
        .map(str::to_string)
        .unwrap_or_else(|| store.current_name().to_string());

    store.set_variable(&name, key, value)?;
    Ok(format!("'{}' set for '{}'", key, name))
}

pub fn use_context(store: &mut ContextStore, name: &str) -> Result<String> {
    store.use_context(name)?;
    Ok(format!("current context set to '{}'", name))
}

/// One line per context, current one marked with `*`
pub fn list_contexts(store: &ContextStore) -> Vec<String> {
    store
        .list()
        .map(|(name, context)| {
            let marker = if name == store.current_name() { "*" } else { " " };
            format!("{} {}: {}", marker, name, context.url())
        })
        .collect()
}
