//! Database connection and initialization.

use sea_orm::{Database as SeaDatabase, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Connect and apply pending migrations.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let db = Self::connect_without_migrations(config).await?;
        db.run_migrations().await?;
        tracing::info!("Database connected and migrations applied");
        Ok(db)
    }

    /// Connect without running migrations (for CLI commands).
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(&config.database_url).await?;
        Ok(Self { connection })
    }

    /// Wrap an existing connection, e.g. a mock or disconnected handle in tests.
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Roll back the last `steps` migrations.
    pub async fn rollback_migration(&self, steps: u32) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(steps)).await
    }

    /// All known migrations with their applied flag.
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect())
    }

    /// Drop everything and re-run all migrations.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Check database connectivity.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection.ping().await
    }
}
