use std::time::Duration;

use db_migration::Migrator;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;

pub use sea_orm::{DatabaseConnection, DbErr};

pub mod entities;
pub mod models;

pub type DbPool = DatabaseConnection;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct DBService {
    pub pool: DbPool,
}

impl DBService {
    /// Connects to `database_url` and brings the schema up to date.
    ///
    /// Both `postgres://` and `sqlite:` URLs are accepted.
    pub async fn new(database_url: &str) -> Result<DBService, DbErr> {
        let mut options = ConnectOptions::new(database_url.to_string());
        options
            .connect_timeout(CONNECT_TIMEOUT)
            .sqlx_logging(false);

        let pool = Database::connect(options).await?;
        Migrator::up(&pool, None).await?;
        tracing::info!(backend = ?pool.get_database_backend(), "Connected to database");

        Ok(DBService { pool })
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(pool: DbPool) -> Self {
        DBService { pool }
    }
}
