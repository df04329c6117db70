use std::sync::Arc;

use tracing::{info, warn};

use scoreboard_config::{CorsConfig, DatabaseConfig, EmailConfig, JwtConfig};
use scoreboard_db::{DocumentStore, MemoryStore, PgStore, Repository, StoreError};
use scoreboard_models::{Competition, User};

use crate::utils::email::{LogMailer, Mailer, SmtpMailer};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub mailer: Arc<dyn Mailer>,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn users(&self) -> Repository<User> {
        Repository::new(Arc::clone(&self.store))
    }

    pub fn competitions(&self) -> Repository<Competition> {
        Repository::new(Arc::clone(&self.store))
    }
}

/// Opens the configured store. Postgres when `DATABASE_URL` is set, memory otherwise.
pub async fn init_store(config: &DatabaseConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match &config.url {
        Some(url) => {
            let store = PgStore::connect(url, config.max_connections).await?;
            store.migrate().await?;
            info!("Connected to PostgreSQL document store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub fn init_mailer(config: &EmailConfig) -> Arc<dyn Mailer> {
    if config.enabled {
        Arc::new(SmtpMailer::new(config.clone()))
    } else {
        Arc::new(LogMailer)
    }
}

pub async fn init_app_state() -> Result<AppState, StoreError> {
    let email_config = EmailConfig::from_env();

    Ok(AppState {
        store: init_store(&DatabaseConfig::from_env()).await?,
        mailer: init_mailer(&email_config),
        jwt_config: JwtConfig::from_env(),
        email_config,
        cors_config: CorsConfig::from_env(),
    })
}
