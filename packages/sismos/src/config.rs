//! Environment-derived configuration.
//!
//! Kept as an explicit value handed to the wiring code rather than read
//! from globals inside the pipeline.

use anyhow::{bail, Result};

/// Default destination table when `TABLE_NAME` is unset.
pub const DEFAULT_TABLE_NAME: &str = "TablaSismosIGP";

/// Default SQLite location when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:sismos.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct Config {
    /// Destination table for the snapshot.
    pub table_name: String,

    /// SQLite connection URL.
    pub database_url: String,
}

impl Config {
    /// Load configuration from the environment, applying defaults.
    pub fn from_env() -> Result<Self> {
        let table_name =
            std::env::var("TABLE_NAME").unwrap_or_else(|_| DEFAULT_TABLE_NAME.to_string());
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        // The table name is interpolated into SQL; restrict it to a bare
        // identifier.
        if !is_bare_identifier(&table_name) {
            bail!("TABLE_NAME must be a bare SQL identifier, got {table_name:?}");
        }

        Ok(Self {
            table_name,
            database_url,
        })
    }
}

fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_identifier() {
        assert!(is_bare_identifier("TablaSismosIGP"));
        assert!(is_bare_identifier("_snapshot_v2"));
        assert!(!is_bare_identifier("2fast"));
        assert!(!is_bare_identifier("sismos; DROP TABLE x"));
        assert!(!is_bare_identifier(""));
    }
}
