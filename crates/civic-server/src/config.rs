use std::path::PathBuf;

use anyhow::{Context, Result};

use civic_core::analytics::DEFAULT_TOP_USERS;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub default_top_users: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("CIVIC_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = lookup("CIVIC_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("CIVIC_PORT must be a port number")?;
        let db_path = lookup("CIVIC_DB_PATH")
            .unwrap_or_else(|| "civic.db".into())
            .into();
        let default_top_users = match lookup("CIVIC_DEFAULT_TOP_USERS") {
            Some(v) => v
                .parse()
                .context("CIVIC_DEFAULT_TOP_USERS must be a non-negative integer")?,
            None => DEFAULT_TOP_USERS,
        };

        Ok(Self {
            host,
            port,
            db_path,
            default_top_users,
        })
    }
}
