//! Repository layer - Data access abstraction
//!
//! One trait per aggregate, each with a SeaORM-backed store.

mod base;
pub(crate) mod entities;
mod image_repository;
mod inquiry_repository;
mod property_repository;
mod user_repository;

pub use image_repository::{ImageRepository, ImageStore};
pub use inquiry_repository::{InquiryRepository, InquiryStore};
pub use property_repository::{PropertyRepository, PropertyStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use image_repository::MockImageRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use inquiry_repository::MockInquiryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use property_repository::MockPropertyRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
