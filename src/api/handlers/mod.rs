//! HTTP request handlers.

pub mod auth_handler;
pub mod hero_handler;
pub mod inquiry_handler;
pub mod property_handler;
pub mod user_handler;

pub use auth_handler::{auth_routes, profile_routes};
pub use hero_handler::hero_routes;
pub use inquiry_handler::inquiry_routes;
pub use property_handler::property_routes;
pub use user_handler::user_routes;
