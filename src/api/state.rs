//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::infra::{CleanupQueue, Database, ImageStorage};
use crate::services::{
    AuthService, HeroService, InquiryService, PropertyService, ServiceContainer, Services,
    UserService,
};

/// Limits and location for incoming image uploads.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub max_files: usize,
    pub max_bytes: usize,
}

impl From<&Config> for UploadSettings {
    fn from(config: &Config) -> Self {
        Self {
            dir: config.upload_dir.clone(),
            max_files: config.max_upload_files,
            max_bytes: config.max_upload_bytes,
        }
    }
}

/// Cross-origin and timeout policy of the HTTP server.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Allowed browser origin; any origin when unset.
    pub cors_origin: Option<String>,
    pub request_timeout: Duration,
}

impl From<&Config> for HttpSettings {
    fn from(config: &Config) -> Self {
        Self {
            cors_origin: config.cors_origin.clone(),
            request_timeout: Duration::from_secs(config.http_timeout_seconds),
        }
    }
}

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub property_service: Arc<dyn PropertyService>,
    pub hero_service: Arc<dyn HeroService>,
    pub inquiry_service: Arc<dyn InquiryService>,
    /// Database connection
    pub database: Arc<Database>,
    pub uploads: UploadSettings,
    pub http: HttpSettings,
}

impl AppState {
    /// Create application state from database connection, config and the
    /// remote image host.
    pub fn from_config(
        database: Arc<Database>,
        config: Config,
        storage: Arc<dyn ImageStorage>,
        queue: Arc<dyn CleanupQueue>,
    ) -> Self {
        let container = Services::from_connection(
            database.get_connection(),
            config.clone(),
            storage,
            queue,
        );

        Self::new(&container, database, &config)
    }

    /// Create application state from any service container.
    pub fn new(services: &dyn ServiceContainer, database: Arc<Database>, config: &Config) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            property_service: services.properties(),
            hero_service: services.hero(),
            inquiry_service: services.inquiries(),
            database,
            uploads: UploadSettings::from(config),
            http: HttpSettings::from(config),
        }
    }
}
