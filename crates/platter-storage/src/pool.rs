//! # SQLite Storage
//!
//! Connection pool setup and the `state_entries` backed [`StateStorage`].
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SQLite State Storage                               │
//! │                                                                         │
//! │  SqliteConfig::new(path)  ← pool settings                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteStorage::open(config).await  ← pool + migrations                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  state_entries                                                          │
//! │  ┌──────────────┬──────────────────────────────┬─────────────────────┐  │
//! │  │ key (PK)     │ value (JSON text)            │ updated_at (RFC3339)│  │
//! │  ├──────────────┼──────────────────────────────┼─────────────────────┤  │
//! │  │ user-store   │ {"state":{...},"version":0}  │ 2026-01-05T10:00Z   │  │
//! │  │ cart-store   │ {"state":{...},"version":0}  │ 2026-01-05T10:02Z   │  │
//! │  └──────────────┴──────────────────────────────┴─────────────────────┘  │
//! │                                                                         │
//! │  set_item = INSERT ... ON CONFLICT(key) DO UPDATE                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases use WAL so a reader never waits on a snapshot write.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::{migrations, validate_key, StateStorage};

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// SQLite storage configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = SqliteConfig::new("/path/to/platter.db")
///     .max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 4
    pub max_connections: u32,

    /// Connection timeout.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before a connection is closed. `None` keeps it forever.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Whether to run migrations on open.
    /// Default: true
    pub run_migrations: bool,
}

impl SqliteConfig {
    /// Creates a configuration for the database file at `path`.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteConfig {
            database_path: path.into(),
            max_connections: 4,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory configuration (for testing).
    ///
    /// An in-memory database lives and dies with its one connection, so the
    /// pool holds exactly one and never lets it idle out.
    pub fn in_memory() -> Self {
        SqliteConfig {
            database_path: PathBuf::from(MEMORY_PATH),
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    fn is_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }
}

// =============================================================================
// SqliteStorage
// =============================================================================

/// [`StateStorage`] over a SQLite `state_entries` table.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens the pool and applies pending migrations.
    ///
    /// ## Returns
    /// * `Ok(SqliteStorage)` - Ready to use
    /// * `Err(StorageError)` - Connection or migration failed
    pub async fn open(config: SqliteConfig) -> StorageResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening state database"
        );

        let connect_options = if config.is_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?
        } else {
            let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());
            SqliteConnectOptions::from_str(&connect_url)
                .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        debug!("Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);

        if config.is_memory() {
            pool_options = pool_options.max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "State database pool created");

        let storage = SqliteStorage { pool };

        if config.run_migrations {
            migrations::run_migrations(&storage.pool).await?;
        }

        Ok(storage)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the pool. Later operations fail.
    pub async fn close(&self) {
        info!("Closing state database pool");
        self.pool.close().await;
    }
}

#[async_trait]
impl StateStorage for SqliteStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;

        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM state_entries WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;

        sqlx::query(
            r#"
            INSERT INTO state_entries (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(key, bytes = value.len(), "State entry written");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;

        sqlx::query("DELETE FROM state_entries WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
