use config::Config;
use log::{info, warn};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::sync::Arc;
use tokio::time::Duration;

pub mod config;
pub mod logging;

// sqlx has no "never" setting; this outlives any realistic process.
const IN_MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 100);

/// Connects to the configured database.
///
/// An in-memory SQLite database lives and dies with its connection, so for those
/// the pool is pinned to exactly one connection that is never idled out or recycled.
pub async fn init_database(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let in_memory = config.is_in_memory_database();

    let (max_connections, min_connections, idle_timeout, max_lifetime) = if in_memory {
        if config.db_max_connections != 1 || config.db_min_connections != 1 {
            warn!("In-memory database: ignoring pool sizing and using a single connection");
        }
        (
            1,
            1,
            IN_MEMORY_CONNECTION_LIFETIME,
            IN_MEMORY_CONNECTION_LIFETIME,
        )
    } else {
        (
            config.db_max_connections,
            config.db_min_connections,
            Duration::from_secs(config.db_idle_timeout_secs),
            Duration::from_secs(config.db_max_lifetime_secs),
        )
    };

    info!(
        "Database pool config: url={}, max_connections={}, min_connections={}, \
         connect_timeout={}s, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
        config.database_url(),
        max_connections,
        min_connections,
        config.db_connect_timeout_secs,
        config.db_acquire_timeout_secs,
        idle_timeout.as_secs(),
        max_lifetime.as_secs(),
    );

    let mut opt = ConnectOptions::new(config.database_url());
    opt.max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .idle_timeout(idle_timeout)
        .max_lifetime(max_lifetime)
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    Ok(db)
}

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub database_connection: Arc<DatabaseConnection>,
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config, db: &Arc<DatabaseConnection>) -> Self {
        Self {
            database_connection: Arc::clone(db),
            config: app_config,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.database_connection.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Statement};

    #[tokio::test]
    async fn in_memory_database_keeps_its_data_between_statements() -> Result<(), DbErr> {
        let config = Config::default();
        let db = init_database(&config).await?;
        let backend = db.get_database_backend();

        db.execute(Statement::from_string(
            backend,
            "CREATE TABLE probes (id INTEGER PRIMARY KEY)",
        ))
        .await?;
        db.execute(Statement::from_string(
            backend,
            "INSERT INTO probes (id) VALUES (1)",
        ))
        .await?;
        let row = db
            .query_one(Statement::from_string(
                backend,
                "SELECT COUNT(*) AS count FROM probes",
            ))
            .await?;

        assert_eq!(row.map(|r| r.try_get::<i64>("", "count")).transpose()?, Some(1));
        Ok(())
    }
}
