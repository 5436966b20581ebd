//! Login and logout.

use crate::api::ApplandClient;
use crate::context::ContextStore;
use anyhow::{bail, Context as _, Result};
use log::info;
use std::io::BufRead;

/// How the user authenticates
#[derive(Debug, Clone)]
pub enum Credentials {
    ApiKey(String),

    /// Login name; the password is read from stdin
    User(String),
}

/// Log into the current context and store the resulting API key
pub fn execute_login(
    store: &mut ContextStore,
    credentials: Credentials,
    stdin: impl BufRead,
) -> Result<String> {
    let url = store.current()?.url();
    info!("Logging into {}", url);

    let api_key = match credentials {
        Credentials::ApiKey(key) => {
            let client = ApplandClient::new(&url, key.trim())?;
            if !client.test_api_key().context("Failed to verify API key")? {
                bail!("Invalid API key");
            }
            key.trim().to_string()
        }
        Credentials::User(login) => {
            let password = read_line(stdin).context("Failed to read password")?;
            let client = ApplandClient::new(&url, "")?;
            client
                .login(login.trim(), &password)
                .context("Login failed")?
        }
    };

    store.set_current_api_key(&api_key)?;
    Ok(format!("logged in to {}", url))
}

/// Revoke the current context's API key
pub fn execute_logout(store: &mut ContextStore) -> Result<String> {
    let context = store.current()?;
    let url = context.url();
    let api_key = context.api_key();

    if api_key.is_empty() {
        bail!("not logged in to {}", url);
    }

    ApplandClient::new(&url, api_key)?
        .delete_api_key()
        .context("Failed to revoke API key")?;

    store.set_current_api_key("")?;
    Ok(format!("logged out of {}", url))
}

fn read_line(mut input: impl BufRead) -> std::io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_line_strips_newline() {
        assert_eq!(read_line("hunter2\r\nrest".as_bytes()).unwrap(), "hunter2");
        assert_eq!(read_line("".as_bytes()).unwrap(), "");
    }

    #[test]
    fn test_logout_requires_key() {
        let mut store = ContextStore::with_defaults(None);
        // a key set through the environment would make this a real request
        if std::env::var(crate::utils::config::API_KEY_ENV).is_ok() {
            return;
        }
        let err = execute_logout(&mut store).unwrap_err();
        assert!(err.to_string().starts_with("not logged in to"));
    }
}
