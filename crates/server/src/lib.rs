use config::ServerConfig;
use db::{DBService, DbErr};

pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
#[cfg(test)]
mod test_support;

/// Shared handler state.
#[derive(Clone)]
pub struct Deployment {
    db: DBService,
}

impl Deployment {
    /// Connects to the configured database. Startup fails if this does.
    pub async fn new(config: &ServerConfig) -> Result<Self, DbErr> {
        let db = DBService::new(&config.database_url).await?;
        Ok(Self { db })
    }

    pub fn from_db(db: DBService) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }
}
