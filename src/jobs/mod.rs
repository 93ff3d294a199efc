//! Background jobs processed by `jobs work`.

mod image_cleanup;

pub use image_cleanup::image_cleanup_handler;
pub use crate::infra::ImageCleanupJob;
