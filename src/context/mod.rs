//! Server contexts: which AppLand instance to talk to, and with which key.

pub mod store;
pub mod value;

pub use store::{CliConfig, Context, ContextStore};
pub use value::{is_env_reference, resolve_value};
