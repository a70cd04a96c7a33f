//! Opinion persistence
//!
//! The handlers only ever talk to the [`OpinionStore`] trait; the sea-orm
//! backend is the production implementation, and tests swap in mocks.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveValue::Set, ConnectOptions, Database, DatabaseConnection, EntityTrait};
use tracing::{debug, info};

use migration::entities::{opinion, opinion_email};
use migration::{Migrator, MigratorTrait};

use crate::config::DatabaseConfig;
use crate::errors::{FeedbackerError, Result};

/// A feedback submission ready to be persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewOpinion {
    pub happy: bool,
    pub description: String,
    pub url: Option<String>,
    pub prodchan: String,
    pub user_agent: String,
    pub browser: Option<String>,
    pub browser_version: Option<String>,
    pub platform: Option<String>,
    pub locale: Option<String>,
    pub manufacturer: Option<String>,
    pub device: Option<String>,
}

#[async_trait]
pub trait OpinionStore: Send + Sync {
    /// Persist one opinion, returning its row id.
    async fn insert_opinion(&self, opinion: NewOpinion) -> Result<i64>;

    /// Persist the opt-in contact email linked to an opinion.
    async fn insert_email(&self, opinion_id: i64, email: &str) -> Result<()>;
}

/// Connect to the configured database.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.pool_size)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .map_err(|e| FeedbackerError::database_connection(e.to_string()))?;
    info!("Connected to database");
    Ok(db)
}

/// Apply pending schema migrations.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .map_err(|e| FeedbackerError::database_operation(e.to_string()))?;
    debug!("Database migrations applied");
    Ok(())
}

/// sea-orm backed store.
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OpinionStore for SeaOrmStore {
    async fn insert_opinion(&self, new: NewOpinion) -> Result<i64> {
        let model = opinion::ActiveModel {
            happy: Set(new.happy),
            description: Set(new.description),
            url: Set(new.url),
            prodchan: Set(new.prodchan),
            user_agent: Set(new.user_agent),
            browser: Set(new.browser),
            browser_version: Set(new.browser_version),
            platform: Set(new.platform),
            locale: Set(new.locale),
            manufacturer: Set(new.manufacturer),
            device: Set(new.device),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let inserted = opinion::Entity::insert(model)
            .exec_with_returning(&self.db)
            .await?;
        debug!("Persisted opinion id={}", inserted.id);
        Ok(inserted.id)
    }

    async fn insert_email(&self, opinion_id: i64, email: &str) -> Result<()> {
        let model = opinion_email::ActiveModel {
            opinion_id: Set(opinion_id),
            email: Set(email.to_string()),
            ..Default::default()
        };

        opinion_email::Entity::insert(model).exec(&self.db).await?;
        debug!("Persisted contact email for opinion id={}", opinion_id);
        Ok(())
    }
}
