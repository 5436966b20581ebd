//! Named server contexts persisted in a TOML file.
//!
//! The store is looked up in `$APPLAND_CONFIG`, then `./.appland.toml`, then
//! `~/.appland.toml`. When none can be loaded a single `default` context
//! pointing at the public server is used, and saved to the explicit path
//! (or the home directory) once something changes.

use super::value::{is_env_reference, resolve_value_with};
use crate::utils::config::{
    API_KEY_ENV, CONFIG_FILE_NAME, CONFIG_PATH_ENV, DEFAULT_CONTEXT_NAME, DEFAULT_URL, URL_ENV,
};
use crate::utils::error::ConfigError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// A server and the API key used to talk to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub api_key: String,
}

impl Context {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: String::new(),
        }
    }

    /// Server URL, honouring `APPLAND_URL` and `$VAR` values
    pub fn url(&self) -> String {
        self.url_with(|name| env::var(name).ok())
    }

    pub fn url_with(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        lookup(URL_ENV)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| resolve_value_with(&self.url, &lookup))
    }

    /// API key, honouring `APPLAND_API_KEY` and `$VAR` values
    pub fn api_key(&self) -> String {
        self.api_key_with(|name| env::var(name).ok())
    }

    pub fn api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        lookup(API_KEY_ENV)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| resolve_value_with(&self.api_key, &lookup))
    }

    /// Replace the URL unless it is an environment reference
    ///
    /// Returns whether anything changed.
    fn set_url(&mut self, url: &str) -> bool {
        if is_env_reference(&self.url) || self.url == url {
            return false;
        }
        self.url = url.to_string();
        true
    }

    /// Replace the API key unless it is an environment reference
    fn set_api_key(&mut self, api_key: &str) -> bool {
        if is_env_reference(&self.api_key) || self.api_key == api_key {
            return false;
        }
        self.api_key = api_key.to_string();
        true
    }
}

/// On-disk layout of the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub current_context: String,

    #[serde(default)]
    pub contexts: BTreeMap<String, Context>,
}

impl CliConfig {
    fn with_default_context() -> Self {
        Self {
            current_context: DEFAULT_CONTEXT_NAME.to_string(),
            contexts: BTreeMap::from([(DEFAULT_CONTEXT_NAME.to_string(), Context::new(DEFAULT_URL))]),
        }
    }
}

/// Loaded config plus where to write it back
#[derive(Debug, Clone)]
pub struct ContextStore {
    path: Option<PathBuf>,
    config: CliConfig,
    dirty: bool,
}

impl ContextStore {
    /// Default contexts, to be saved at `path`
    pub fn with_defaults(path: Option<PathBuf>) -> Self {
        Self {
            path,
            config: CliConfig::with_default_context(),
            dirty: false,
        }
    }

    /// Locate and load the store
    ///
    /// **Public** - called once by main before dispatching commands
    ///
    /// An explicit path (usually from `--config` / `APPLAND_CONFIG`) is tried
    /// first. Files that exist but can't be read are reported and skipped.
    pub fn locate(explicit: Option<&Path>) -> Self {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
        let local = env::current_dir().ok().map(|d| d.join(CONFIG_FILE_NAME));
        let home = dirs::home_dir().map(|d| d.join(CONFIG_FILE_NAME));

        let target = explicit.clone().or_else(|| home.clone());
        for candidate in [explicit, local, home].into_iter().flatten() {
            if let Some(store) = Self::try_open(&candidate) {
                return store;
            }
        }

        debug!("No config file found, using defaults");
        Self::with_defaults(target)
    }

    fn try_open(path: &Path) -> Option<Self> {
        match Self::open(path) {
            Ok(store) => Some(store),
            Err(ConfigError::ReadFailed { source, .. }) if source.kind() == ErrorKind::NotFound => {
                None
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    /// Load the store from a specific file
    ///
    /// # Errors
    /// * `ConfigError::ReadFailed` - file missing or unreadable (including directories)
    /// * `ConfigError::InvalidFormat` - file is not valid TOML for the store
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: CliConfig = toml::from_str(&data)?;
        if config.contexts.is_empty() {
            config = CliConfig::with_default_context();
        }

        debug!("Loaded config from {}", path.display());
        Ok(Self {
            path: Some(path.to_path_buf()),
            config,
            dirty: false,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn current_name(&self) -> &str {
        &self.config.current_context
    }

    pub fn current(&self) -> Result<&Context, ConfigError> {
        self.get(&self.config.current_context)
    }

    pub fn get(&self, name: &str) -> Result<&Context, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::UnnamedContext);
        }
        self.config
            .contexts
            .get(name)
            .ok_or_else(|| ConfigError::UnknownContext(name.to_string()))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Context, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::UnnamedContext);
        }
        self.config
            .contexts
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownContext(name.to_string()))
    }

    /// Contexts sorted by name
    pub fn list(&self) -> impl Iterator<Item = (&str, &Context)> {
        self.config.contexts.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Create a new context without an API key
    pub fn add(&mut self, name: &str, url: &str) -> Result<(), ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::UnnamedContext);
        }
        if self.config.contexts.contains_key(name) {
            return Err(ConfigError::DuplicateContext(name.to_string()));
        }

        self.config
            .contexts
            .insert(name.to_string(), Context::new(url));
        self.dirty = true;
        Ok(())
    }

    /// Select the context used by subsequent commands
    pub fn use_context(&mut self, name: &str) -> Result<(), ConfigError> {
        self.get(name)?;
        if self.config.current_context != name {
            self.config.current_context = name.to_string();
            self.dirty = true;
        }
        Ok(())
    }

    /// Rename a context, following it if it is the current one
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), ConfigError> {
        if old == new {
            return Ok(());
        }
        if new.is_empty() {
            return Err(ConfigError::UnnamedContext);
        }
        if self.config.contexts.contains_key(new) {
            return Err(ConfigError::DuplicateContext(new.to_string()));
        }

        let context = self
            .config
            .contexts
            .remove(old)
            .ok_or_else(|| ConfigError::UnknownContext(old.to_string()))?;
        self.config.contexts.insert(new.to_string(), context);

        if self.config.current_context == old {
            self.config.current_context = new.to_string();
        }
        self.dirty = true;
        Ok(())
    }

    /// Set `url`, `api_key` or `name` on a context
    pub fn set_variable(&mut self, name: &str, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "url" => {
                let changed = self.get_mut(name)?.set_url(value);
                self.dirty |= changed;
            }
            "api_key" => {
                let changed = self.get_mut(name)?.set_api_key(value);
                self.dirty |= changed;
            }
            "name" => {
                self.get(name)?;
                self.rename(name, value)?;
            }
            other => return Err(ConfigError::UnknownVariable(other.to_string())),
        }
        Ok(())
    }

    /// Store an API key on the current context
    pub fn set_current_api_key(&mut self, api_key: &str) -> Result<(), ConfigError> {
        let name = self.config.current_context.clone();
        self.set_variable(&name, "api_key", api_key)
    }

    /// Write the store back if it was modified
    ///
    /// Returns whether a file was written.
    pub fn save(&mut self) -> Result<bool, ConfigError> {
        if !self.dirty {
            return Ok(false);
        }
        let path = self.path.clone().ok_or(ConfigError::NoPath)?;
        let data = toml::to_string_pretty(&self.config)?;

        write_private(&path, data.as_bytes()).map_err(|source| ConfigError::WriteFailed {
            path: path.clone(),
            source,
        })?;

        debug!("Config written to {}", path.display());
        self.dirty = false;
        Ok(true)
    }
}

/// Write a file readable only by its owner
fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let store = ContextStore::with_defaults(None);
        assert_eq!(store.current_name(), "default");
        assert_eq!(store.current().unwrap().url_with(no_env), "https://app.land");
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_env_overrides_url() {
        let context = Context::new("https://example.com");
        let url = context.url_with(|name| (name == URL_ENV).then(|| "http://localhost:3000".to_string()));
        assert_eq!(url, "http://localhost:3000");
    }

    #[test]
    fn test_env_reference_not_overwritten() {
        let mut context = Context {
            url: "https://example.com".to_string(),
            api_key: "$MY_KEY".to_string(),
        };
        assert!(!context.set_api_key("plain"));
        assert_eq!(context.api_key, "$MY_KEY");
        assert_eq!(
            context.api_key_with(|n| (n == "MY_KEY").then(|| "k".to_string())),
            "k"
        );
    }

    #[test]
    fn test_save_without_changes_is_noop() {
        let mut store = ContextStore::with_defaults(None);
        assert!(!store.save().unwrap());
    }

    #[test]
    fn test_save_requires_path() {
        let mut store = ContextStore::with_defaults(None);
        store.add("local", "http://localhost:3000").unwrap();
        assert!(matches!(store.save(), Err(ConfigError::NoPath)));
    }
}
