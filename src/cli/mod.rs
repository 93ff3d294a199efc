//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `seed` - Initial admin account
//! - `jobs` - Remote image cleanup worker

pub mod args;

pub use args::{Cli, Commands};
