//! Repository settings read from the `[repository]` and `[postgres]` tables
//! of `deals.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
use crate::db::PostgresConfig;

/// Repository configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub postgres: PostgresSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

/// Postgres connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostgresSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl PostgresSettings {
    /// Apply `DATABASE_URL`/`PG_DATABASE_URL` and the `PG_*` pool variables
    /// on top of the file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) =
            std::env::var("DATABASE_URL").or_else(|_| std::env::var("PG_DATABASE_URL"))
        {
            self.database_url = url;
        }
        if let Some(v) = env_parse("PG_POOL_MAX") {
            self.max_connections = v;
        }
        if let Some(v) = env_parse("PG_POOL_MIN") {
            self.min_connections = v;
        }
        if let Some(v) = env_parse("PG_CONN_TIMEOUT_SEC") {
            self.connect_timeout = v;
        }
        if let Some(v) = env_parse("PG_IDLE_TIMEOUT_SEC") {
            self.idle_timeout = v;
        }
        if let Some(v) = env_parse("PG_MAX_RETRIES") {
            self.max_retries = v;
        }
        if let Some(v) = env_parse("PG_RETRY_DELAY_MS") {
            self.retry_delay_ms = v;
        }
    }
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Convert to PostgresConfig if this is a Postgres configuration.
    #[cfg(feature = "postgres-repo")]
    pub fn to_postgres_config(&self) -> Result<Option<PostgresConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Postgres {
            return Ok(None);
        }

        if self.postgres.database_url.is_empty() {
            return Err(RepositoryError::configuration(
                "Postgres repository requires 'postgres.database_url' setting",
            ));
        }

        Ok(Some(PostgresConfig {
            database_url: self.postgres.database_url.clone(),
            max_pool_size: self.postgres.max_connections,
            min_pool_size: self.postgres.min_connections,
            connection_timeout_sec: self.postgres.connect_timeout,
            idle_timeout_sec: self.postgres.idle_timeout,
            max_retries: self.postgres.max_retries,
            retry_delay_ms: self.postgres.retry_delay_ms,
        }))
    }

    #[cfg(not(feature = "postgres-repo"))]
    pub fn to_postgres_config(&self) -> Result<Option<PostgresConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type == RepositoryType::Postgres {
            return Err(RepositoryError::configuration(
                "Postgres repository feature not enabled",
            ));
        }

        Ok(None)
    }
}
