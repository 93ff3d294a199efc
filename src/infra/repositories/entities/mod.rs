//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod inquiry;
pub mod property;
pub mod property_image;
pub mod user;
