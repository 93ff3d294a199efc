//! Estate API - real-estate listing service
//!
//! Property search and listing lifecycle, hero curation, user
//! administration and inquiries over Axum and SeaORM, plus a typed client
//! with a read-through property store.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Application use cases and business logic
//! - **infra**: Database, repositories, remote image storage, uploads
//! - **jobs**: Background remote image cleanup
//! - **api**: HTTP handlers, middleware, and routes
//! - **client**: HTTP client and client-side property store
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create the first admin account
//! cargo run -- seed
//! ```

pub mod api;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Actor, Password, Property, User, UserRole};
pub use errors::{AppError, AppResult};
