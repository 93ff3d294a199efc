//! Service Container - Centralized service access.
//!
//! Wires every service over one shared Unit of Work and hands them out
//! behind their traits.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, HeroCurator, HeroService, InquiryDesk, InquiryService,
    PropertyManager, PropertyService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{CleanupQueue, ImageJanitor, ImageStorage, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn properties(&self) -> Arc<dyn PropertyService>;

    fn hero(&self) -> Arc<dyn HeroService>;

    fn inquiries(&self) -> Arc<dyn InquiryService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    property_service: Arc<dyn PropertyService>,
    hero_service: Arc<dyn HeroService>,
    inquiry_service: Arc<dyn InquiryService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        property_service: Arc<dyn PropertyService>,
        hero_service: Arc<dyn HeroService>,
        inquiry_service: Arc<dyn InquiryService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            property_service,
            hero_service,
            inquiry_service,
        }
    }

    /// Create service container from database connection, config and the
    /// remote image host.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        storage: Arc<dyn ImageStorage>,
        queue: Arc<dyn CleanupQueue>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let janitor = ImageJanitor::new(storage.clone(), queue);

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone(), janitor.clone())),
            property_service: Arc::new(PropertyManager::new(uow.clone(), storage, janitor)),
            hero_service: Arc::new(HeroCurator::new(uow.clone())),
            inquiry_service: Arc::new(InquiryDesk::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn properties(&self) -> Arc<dyn PropertyService> {
        self.property_service.clone()
    }

    fn hero(&self) -> Arc<dyn HeroService> {
        self.hero_service.clone()
    }

    fn inquiries(&self) -> Arc<dyn InquiryService> {
        self.inquiry_service.clone()
    }
}
