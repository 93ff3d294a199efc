//! Seed command - Creates the initial admin account.

use crate::config::{AdminSeed, Config};
use crate::domain::{normalize_email, NewUser, Password, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, UserRepository, UserStore};

/// Result of a seed run.
#[derive(Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    Created { id: i32 },
    AdminExists,
}

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    let seed = config.admin_seed.clone().ok_or_else(|| {
        AppError::internal("ADMIN_EMAIL and ADMIN_PASSWORD must be set to seed an admin")
    })?;

    let db = Database::connect(&config).await?;
    let users = UserStore::new(db.get_connection());

    match seed_admin(&users, &seed).await? {
        SeedOutcome::Created { id } => {
            tracing::info!(id, email = %seed.email, "Admin account created");
        }
        SeedOutcome::AdminExists => {
            tracing::info!("An admin account already exists, nothing to seed");
        }
    }

    Ok(())
}

/// Create the admin from `seed` unless any admin is already present.
pub async fn seed_admin(users: &dyn UserRepository, seed: &AdminSeed) -> AppResult<SeedOutcome> {
    if users.admin_exists().await? {
        return Ok(SeedOutcome::AdminExists);
    }

    let email = normalize_email(&seed.email);
    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("User already exists with this email"));
    }

    let password = Password::new(seed.password())?;
    let admin = users
        .create(NewUser {
            name: seed.name.clone(),
            email,
            password_hash: password.into_string(),
            phone: None,
            role: UserRole::Admin,
        })
        .await?;

    Ok(SeedOutcome::Created { id: admin.id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::User;
    use crate::infra::MockUserRepository;

    fn seed() -> AdminSeed {
        AdminSeed::new("Administrator", "Admin@Example.com ", "admin-password")
    }

    #[tokio::test]
    async fn test_existing_admin_is_left_alone() {
        let mut users = MockUserRepository::new();
        users.expect_admin_exists().returning(|| Ok(true));
        users.expect_create().never();

        let outcome = seed_admin(&users, &seed()).await.unwrap();

        assert_eq!(outcome, SeedOutcome::AdminExists);
    }

    #[tokio::test]
    async fn test_creates_admin_with_hashed_password() {
        let mut users = MockUserRepository::new();
        users.expect_admin_exists().returning(|| Ok(false));
        users
            .expect_find_by_email()
            .withf(|email| email == "admin@example.com")
            .returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|new_user| {
                new_user.role == UserRole::Admin
                    && new_user.email == "admin@example.com"
                    && new_user.password_hash != "admin-password"
                    && Password::from_hash(new_user.password_hash.clone()).verify("admin-password")
            })
            .returning(|new_user| {
                Ok(User {
                    id: 7,
                    name: new_user.name,
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    phone: None,
                    role: new_user.role,
                    is_active: true,
                    avatar: None,
                    last_login: None,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let outcome = seed_admin(&users, &seed()).await.unwrap();

        assert_eq!(outcome, SeedOutcome::Created { id: 7 });
    }
}
