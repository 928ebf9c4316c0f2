//! Provider configuration.
//!
//! # Responsibility
//! - Load the provider authority, startup catalog and storage settings.
//! - Validate everything before a connection or router is created.
//!
//! # Invariants
//! - A config that passes `validate()` always builds a router.
//! - `schema` statements become migrations `1..=n` in declaration order.

use crate::db::{open_db, open_db_in_memory, DbError, Migration};
use crate::logging::{default_log_level, normalize_level, LoggingError};
use crate::model::entity::CatalogEntry;
use crate::routing::{ContentRouter, RouterBuildError, RouterBuilder};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Router(RouterBuildError),
    Logging(LoggingError),
    Db(DbError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid provider config: {err}"),
            Self::Router(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Router(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<RouterBuildError> for ConfigError {
    fn from(value: RouterBuildError) -> Self {
        Self::Router(value)
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for ConfigError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Provider settings, usually read from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Namespace for every served identifier.
    pub authority: String,
    /// SQLite file; in-memory when absent.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Defaults to [`default_log_level`].
    #[serde(default)]
    pub log_level: Option<String>,
    /// File logging is enabled only when set.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Ordered startup catalog; order fixes route codes.
    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
    /// Bootstrap DDL statements.
    #[serde(default)]
    pub schema: Vec<String>,
}

impl ProviderConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks the log level and registers the catalog without freezing a
    /// router.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = self.log_level.as_deref() {
            normalize_level(level)?;
        }
        self.router_builder()?;
        Ok(())
    }

    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    /// Registers every catalog entry, in order, on a fresh builder.
    pub fn router_builder(&self) -> Result<RouterBuilder, ConfigError> {
        let builder = self
            .catalog
            .iter()
            .try_fold(ContentRouter::builder(&self.authority)?, |builder, entry| {
                builder.with_entry(entry)
            })?;
        Ok(builder)
    }

    /// Builds the route table from `authority` and `catalog`.
    pub fn build_router(&self) -> Result<ContentRouter, ConfigError> {
        Ok(self.router_builder()?.build())
    }

    pub fn migrations(&self) -> Vec<Migration> {
        Migration::sequence(self.schema.iter().cloned())
    }

    /// Opens the configured database with `schema` applied.
    pub fn open_connection(&self) -> Result<Connection, ConfigError> {
        let migrations = self.migrations();
        let conn = match &self.database_path {
            Some(path) => open_db(path, &migrations)?,
            None => open_db_in_memory(&migrations)?,
        };
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ProviderConfig};
    use crate::logging::default_log_level;
    use crate::routing::RouterBuildError;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config = ProviderConfig::from_json_str(r#"{"authority":"com.example"}"#).unwrap();
        assert!(config.catalog.is_empty());
        assert!(config.database_path.is_none());
        assert!(!config.effective_log_level().is_empty());
    }

    #[test]
    fn rejects_invalid_catalog_before_opening_anything() {
        let err = ProviderConfig::from_json_str(
            r#"{
                "authority": "com.example",
                "catalog": [
                    {"table_name": "Items", "entity": "com.example.Item"},
                    {"table_name": "items", "entity": "com.example.Other"}
                ]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Router(RouterBuildError::DuplicateTable(_))
        ));
    }

    #[test]
    fn effective_log_level_prefers_configured_value() {
        let configured = ProviderConfig::from_json_str(
            r#"{"authority":"com.example","log_level":"debug"}"#,
        )
        .unwrap();
        assert_eq!(configured.effective_log_level(), "debug");

        let defaulted = ProviderConfig::from_json_str(r#"{"authority":"com.example"}"#).unwrap();
        assert_eq!(defaulted.effective_log_level(), default_log_level());
    }

    #[test]
    fn router_builder_registers_catalog_in_order() {
        let config = ProviderConfig::from_json_str(
            r#"{
                "authority": "com.example",
                "catalog": [
                    {"table_name": "Items", "entity": "com.example.Item"},
                    {"table_name": "notes", "entity": "com.example.Note"}
                ]
            }"#,
        )
        .unwrap();
        let router = config.router_builder().unwrap().build();
        assert_eq!(router.matcher().route_count(), 4);
        assert_eq!(router.types().len(), 2);
        assert_eq!(
            config.build_router().unwrap().matcher().entries(),
            router.matcher().entries()
        );
    }

    #[test]
    fn rejects_unknown_log_level() {
        let err = ProviderConfig::from_json_str(
            r#"{"authority":"com.example","log_level":"loud"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Logging(_)));
    }

    #[test]
    fn schema_statements_become_sequential_migrations() {
        let config = ProviderConfig::from_json_str(
            r#"{"authority":"a","schema":["CREATE TABLE t (x);","CREATE TABLE u (y);"]}"#,
        )
        .unwrap();
        let versions: Vec<u32> = config
            .migrations()
            .iter()
            .map(|migration| migration.version)
            .collect();
        assert_eq!(versions, vec![1, 2]);
    }
}
