//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Remote image storage and its cleanup queue
//! - Transient upload files
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;
pub mod uploads;

pub use db::{Database, Migrator};
pub use repositories::{
    ImageRepository, ImageStore, InquiryRepository, InquiryStore, PropertyRepository,
    PropertyStore, UserRepository, UserStore,
};
pub use storage::{
    CleanupQueue, CloudinaryStorage, ImageCleanupJob, ImageJanitor, ImageStorage,
    JobCleanupQueue, NoopCleanupQueue, UnconfiguredStorage,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TransactionFuture, TxImageRepository, UnitOfWork,
};
pub use uploads::UploadedImage;

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockImageRepository, MockInquiryRepository, MockPropertyRepository, MockUserRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use storage::{MockCleanupQueue, MockImageStorage};
