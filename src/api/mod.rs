//! API layer - HTTP handlers and middleware
//!
//! This module contains all HTTP-related concerns:
//! - Request handlers
//! - Middleware (authentication)
//! - Custom extractors (validated JSON, property forms)
//! - Route definitions and OpenAPI documentation

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::{AppState, HttpSettings, UploadSettings};
