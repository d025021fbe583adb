//! # Database Configuration
//!
//! ```text
//! COOP_DB_PATH                   SQLite file                     (./coop.db)
//! COOP_DB_MAX_CONNECTIONS        pool ceiling                    (5)
//! COOP_DB_MIN_CONNECTIONS        connections kept open           (1)
//! COOP_DB_CONNECT_TIMEOUT_SECS   wait for a pooled connection    (30)
//! COOP_DB_BUSY_TIMEOUT_MS        wait for the SQLite write lock  (5000)
//! COOP_DB_RUN_MIGRATIONS         apply migrations on start       (true)
//! ```

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PATH: &str = "./coop.db";
const MEMORY_PATH: &str = ":memory:";

/// Catalog database settings.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/coop/coop.db")
///     .max_connections(8)
///     .busy_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a repository call waits for a free pooled connection.
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    /// How long a writer waits on another connection's write lock before
    /// failing with `DbError::Busy`.
    pub busy_timeout: Duration,
    pub run_migrations: bool,
}

impl DbConfig {
    /// Settings for a file-backed catalog; the file is created on connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// A private in-memory catalog.
    ///
    /// Pinned to one connection: every SQLite connection to `:memory:` opens
    /// its own empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            ..DbConfig::new(MEMORY_PATH)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Reads `COOP_DB_*` variables; unset ones keep the `new` defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DbConfig::new(lookup("COOP_DB_PATH").unwrap_or_else(|| DEFAULT_PATH.to_string()));

        config.max_connections = parse_or(&lookup, "COOP_DB_MAX_CONNECTIONS", config.max_connections)?;
        config.min_connections = parse_or(&lookup, "COOP_DB_MIN_CONNECTIONS", config.min_connections)?;
        config.connect_timeout = Duration::from_secs(parse_or(
            &lookup,
            "COOP_DB_CONNECT_TIMEOUT_SECS",
            config.connect_timeout.as_secs(),
        )?);
        config.busy_timeout = Duration::from_millis(parse_or(
            &lookup,
            "COOP_DB_BUSY_TIMEOUT_MS",
            config.busy_timeout.as_millis() as u64,
        )?);
        config.run_migrations = parse_or(&lookup, "COOP_DB_RUN_MIGRATIONS", config.run_migrations)?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects an empty pool, a floor above the ceiling, and more than one
    /// connection to an in-memory database.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("COOP_DB_MAX_CONNECTIONS".to_string()));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::InvalidValue("COOP_DB_MIN_CONNECTIONS".to_string()));
        }
        if self.database_path.as_os_str() == MEMORY_PATH && self.max_connections > 1 {
            return Err(ConfigError::InvalidValue("COOP_DB_MAX_CONNECTIONS".to_string()));
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
