//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use the Unit of Work pattern for centralized repository
//! access and transaction management.

mod auth_service;
pub mod container;
mod hero_service;
mod inquiry_service;
mod property_service;
mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthPayload, AuthService, Authenticator, Claims};
pub use hero_service::{HeroCurator, HeroService};
pub use inquiry_service::{InquiryDesk, InquiryService};
pub use property_service::{PropertyManager, PropertyService};
pub use user_service::{AdminStats, UserManager, UserService, UserStats};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
