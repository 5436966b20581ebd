//! Input schema for AppMap trace files.
//!
//! Only the fields needed for statistics and uploads are modelled;
//! everything else in the document (class map, HTTP details, ...) is ignored.
//! Recorders emit `null` for fields that don't apply to an event, so scalar
//! fields tolerate both a missing key and an explicit `null`. A `null` entry
//! in the event or parameter list decodes to a default value.

use serde::{Deserialize, Deserializer};

/// A decoded trace file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraceFile {
    /// Recorded events; `None` when the document has no event list at all
    #[serde(default, deserialize_with = "entries_or_default")]
    pub events: Option<Vec<TraceEvent>>,

    /// Recording metadata (application name, git state)
    #[serde(default)]
    pub metadata: Option<TraceMetadata>,
}

impl TraceFile {
    /// Events in recording order (empty when the list is missing)
    pub fn events(&self) -> &[TraceEvent] {
        self.events.as_deref().unwrap_or_default()
    }

    /// Whether the document carried an event list, even an empty one
    pub fn has_events(&self) -> bool {
        self.events.is_some()
    }

    /// Git state recorded alongside the trace
    pub fn git(&self) -> Option<&GitMetadata> {
        self.metadata.as_ref().and_then(|m| m.git.as_ref())
    }

    /// Application name recorded alongside the trace
    pub fn app(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.app.as_deref())
            .filter(|app| !app.is_empty())
    }
}

/// One record in a trace file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraceEvent {
    /// Event kind: "call", "return", ...
    #[serde(default, rename = "event", deserialize_with = "nullable")]
    pub kind: String,

    #[serde(default, deserialize_with = "nullable")]
    pub defined_class: String,

    #[serde(default, deserialize_with = "nullable")]
    pub method_id: String,

    #[serde(default, rename = "static", deserialize_with = "nullable")]
    pub is_static: bool,

    /// Source file of the method, when the recorder knows it
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub lineno: i64,

    #[serde(default, deserialize_with = "list_or_default")]
    pub parameters: Vec<Parameter>,
}

impl TraceEvent {
    pub fn is_call(&self) -> bool {
        self.kind == "call"
    }
}

/// A named argument of a call event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameter {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    /// Recorded value; `None` for both a missing key and `null`
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraceMetadata {
    #[serde(default)]
    pub app: Option<String>,

    #[serde(default)]
    pub git: Option<GitMetadata>,
}

/// Repository state captured by the recording agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GitMetadata {
    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default)]
    pub branch: Option<String>,

    #[serde(default)]
    pub commit: Option<String>,

    #[serde(default, alias = "annotated_tag")]
    pub tag: Option<String>,
}

/// Deserialize `null` as the type's default value
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Deserialize a list whose `null` entries stand for default values
fn entries_or_default<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let entries = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
    Ok(entries.map(|list| list.into_iter().map(Option::unwrap_or_default).collect()))
}

/// Like [`entries_or_default`], with a `null` list decoding as empty
fn list_or_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    entries_or_default(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_fields_use_defaults() {
        let event: TraceEvent = serde_json::from_str(
            r#"{"event": "call", "defined_class": null, "lineno": null, "static": null, "parameters": null}"#,
        )
        .unwrap();

        assert!(event.is_call());
        assert_eq!(event.defined_class, "");
        assert_eq!(event.lineno, 0);
        assert!(!event.is_static);
        assert!(event.parameters.is_empty());
    }

    #[test]
    fn test_missing_and_null_values() {
        let params: Vec<Parameter> =
            serde_json::from_str(r#"[{"name": "a"}, {"name": "b", "value": null}]"#).unwrap();

        assert!(params[0].value.is_none());
        assert!(params[1].value.is_none());
    }

    #[test]
    fn test_null_list_entries_use_defaults() {
        let trace: TraceFile = serde_json::from_str(
            r#"{"events": [null, {"event": "call", "defined_class": "Foo", "method_id": "bar", "parameters": [null]}]}"#,
        )
        .unwrap();

        let events = trace.events();
        assert_eq!(events.len(), 2);
        assert!(!events[0].is_call());
        assert_eq!(events[1].parameters.len(), 1);
        assert_eq!(events[1].parameters[0].name, "");
        assert!(events[1].parameters[0].value.is_none());
    }

    #[test]
    fn test_missing_event_list() {
        let trace: TraceFile = serde_json::from_str(r#"{"metadata": {}}"#).unwrap();
        assert!(!trace.has_events());
        assert!(trace.events().is_empty());

        let trace: TraceFile = serde_json::from_str(r#"{"events": []}"#).unwrap();
        assert!(trace.has_events());
    }

    #[test]
    fn test_git_metadata() {
        let trace: TraceFile = serde_json::from_str(
            r#"{"metadata": {"app": "myorg/myapp", "git": {"branch": "main", "commit": "abc", "annotated_tag": "v1"}}}"#,
        )
        .unwrap();

        assert_eq!(trace.app(), Some("myorg/myapp"));
        let git = trace.git().unwrap();
        assert_eq!(git.branch.as_deref(), Some("main"));
        assert_eq!(git.tag.as_deref(), Some("v1"));
    }
}
