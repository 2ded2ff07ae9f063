//! Connection pool for the seat ledger database.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::{info, warn};

use skyseat_core::config::DatabaseConfig;
use skyseat_core::error::{AppError, ErrorKind};
use skyseat_core::result::AppResult;

use crate::error::map_sqlx_error;
use crate::migration::run_migrations;

/// Reported as `application_name` so allocation sessions and the row locks
/// they hold can be found in `pg_stat_activity` / `pg_locks`.
const APPLICATION_NAME: &str = "skyseat";

/// Tables the allocation engine reads and locks.
const LEDGER_TABLES: [&str; 3] = ["flights", "seats", "bookings"];

/// Pool of PostgreSQL connections holding the seat ledger.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open a pool sized by `config`.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = PgConnectOptions::from_str(&config.url)
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Invalid database URL", e)
            })?
            .application_name(APPLICATION_NAME);

        info!(
            url = %mask_password(&config.url),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to seat ledger database"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("Failed to connect to database", e))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> AppResult<()> {
        run_migrations(&self.pool).await
    }

    /// Whether the database answers and carries the ledger schema.
    ///
    /// An unreachable database is an error. A reachable one that is missing
    /// any ledger table reports `false`.
    pub async fn health_check(&self) -> AppResult<bool> {
        let missing: Vec<String> = sqlx::query_scalar(
            "SELECT t FROM unnest($1::text[]) AS t WHERE to_regclass(t) IS NULL",
        )
        .bind(&LEDGER_TABLES[..])
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Health check failed", e))?;

        if !missing.is_empty() {
            warn!(missing = ?missing, "Seat ledger tables missing; run migrations");
        }
        Ok(missing.is_empty())
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Seat ledger pool closed");
    }
}

fn mask_password(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map_or(0, |p| p + 3);
    match url[..at_pos].rfind(':') {
        Some(colon_pos) if colon_pos > scheme_end => {
            format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
