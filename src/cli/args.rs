//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Estate API - real-estate listing service
#[derive(Parser, Debug)]
#[command(name = "estate-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create the initial admin account from ADMIN_* variables
    Seed,

    /// Manage remote image cleanup jobs
    Jobs(JobsArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to (defaults to SERVER_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to SERVER_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback applied migrations
    Down {
        /// Number of migrations to roll back
        #[arg(short, long, default_value_t = 1)]
        steps: u32,
    },
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the jobs command
#[derive(Parser, Debug)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub action: JobsAction,
}

/// Job management actions
#[derive(Subcommand, Debug)]
pub enum JobsAction {
    /// Start the image cleanup worker
    Work,
    /// Show queue status counts
    List,
    /// Clear failed jobs
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["estate-api", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert!(args.host.is_none());
                assert!(args.port.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_migrate_down_steps() {
        let cli = Cli::try_parse_from(["estate-api", "-v", "migrate", "down", "--steps", "2"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Down { steps: 2 }
            })
        ));
    }

    #[test]
    fn test_seed_and_jobs_parse() {
        let cli = Cli::try_parse_from(["estate-api", "seed"]).unwrap();
        assert!(matches!(cli.command, Commands::Seed));

        let cli = Cli::try_parse_from(["estate-api", "jobs", "clear"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Jobs(JobsArgs {
                action: JobsAction::Clear
            })
        ));
    }
}
