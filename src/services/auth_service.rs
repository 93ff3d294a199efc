//! Authentication service - Registration, login, tokens and own profile.
//!
//! Password hashing lives in the domain `Password` value object; tokens are
//! HS256 JWTs carrying the user's id, email and role.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::Config;
use crate::domain::{
    normalize_email, Actor, NewUser, Password, RegisterUser, UpdateProfile, User, UserResponse,
    UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Returned by register and login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthPayload {
    pub user: UserResponse,
    /// Bearer token for the `Authorization` header
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, input: RegisterUser) -> AppResult<AuthPayload>;

    async fn login(&self, email: String, password: String) -> AppResult<AuthPayload>;

    /// Login restricted to admin accounts.
    async fn admin_login(&self, email: String, password: String) -> AppResult<AuthPayload>;

    async fn profile(&self, actor: &Actor) -> AppResult<UserResponse>;

    /// Blank fields keep their current value.
    async fn update_profile(&self, actor: &Actor, changes: UpdateProfile)
        -> AppResult<UserResponse>;

    async fn change_password(
        &self,
        actor: &Actor,
        current_password: String,
        new_password: String,
    ) -> AppResult<()>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a bearer token to an active user.
    async fn authenticate(&self, token: &str) -> AppResult<Actor>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?)
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Messages for one login flavour.
struct LoginRules {
    admin_only: bool,
    invalid: &'static str,
    deactivated: &'static str,
}

const USER_LOGIN: LoginRules = LoginRules {
    admin_only: false,
    invalid: "Invalid credentials",
    deactivated: "Account is deactivated",
};

const ADMIN_LOGIN: LoginRules = LoginRules {
    admin_only: true,
    invalid: "Invalid admin credentials",
    deactivated: "Admin account is deactivated",
};

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    async fn login_with(
        &self,
        email: String,
        password: String,
        rules: LoginRules,
    ) -> AppResult<AuthPayload> {
        let candidate = self
            .uow
            .users()
            .find_by_email(&normalize_email(&email))
            .await?
            .filter(|u| !rules.admin_only || u.is_admin());

        // Unknown emails still pay for one hash verification.
        let mut user = match candidate {
            Some(user) if Password::from_hash(user.password_hash.clone()).verify(&password) => user,
            Some(_) => return Err(AppError::invalid_credentials(rules.invalid)),
            None => {
                Password::verify_dummy(&password);
                return Err(AppError::invalid_credentials(rules.invalid));
            }
        };

        if !user.is_active {
            return Err(AppError::invalid_credentials(rules.deactivated));
        }

        let token = generate_token(&user, &self.config)?;
        let now = Utc::now();
        self.uow.users().record_login(user.id, now).await?;
        user.last_login = Some(now);

        tracing::info!(user_id = user.id, "User logged in");
        Ok(AuthPayload {
            user: user.into(),
            token,
        })
    }

    async fn current_user(&self, actor: &Actor) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(actor.id)
            .await?
            .ok_or_not_found("User")
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, input: RegisterUser) -> AppResult<AuthPayload> {
        let email = normalize_email(&input.email);
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User already exists with this email"));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let mut user = self
            .uow
            .users()
            .create(NewUser {
                name: input.name,
                email,
                password_hash,
                phone: input.phone.filter(|p| !p.trim().is_empty()),
                role: UserRole::User,
            })
            .await?;

        let token = generate_token(&user, &self.config)?;
        let now = Utc::now();
        self.uow.users().record_login(user.id, now).await?;
        user.last_login = Some(now);

        tracing::info!(user_id = user.id, "User registered");
        Ok(AuthPayload {
            user: user.into(),
            token,
        })
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthPayload> {
        self.login_with(email, password, USER_LOGIN).await
    }

    async fn admin_login(&self, email: String, password: String) -> AppResult<AuthPayload> {
        self.login_with(email, password, ADMIN_LOGIN).await
    }

    async fn profile(&self, actor: &Actor) -> AppResult<UserResponse> {
        Ok(self.current_user(actor).await?.into())
    }

    async fn update_profile(
        &self,
        actor: &Actor,
        changes: UpdateProfile,
    ) -> AppResult<UserResponse> {
        self.uow
            .users()
            .update_profile(actor.id, changes.without_blanks())
            .await?
            .map(UserResponse::from)
            .ok_or_not_found("User")
    }

    async fn change_password(
        &self,
        actor: &Actor,
        current_password: String,
        new_password: String,
    ) -> AppResult<()> {
        let user = self.current_user(actor).await?;
        if !Password::from_hash(user.password_hash).verify(&current_password) {
            return Err(AppError::validation("Current password is incorrect"));
        }

        let password_hash = Password::new(&new_password)?.into_string();
        self.uow.users().update_password(user.id, password_hash).await?;
        tracing::info!(user_id = user.id, "Password changed");
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn authenticate(&self, token: &str) -> AppResult<Actor> {
        let claims = self.verify_token(token)?;
        match self.uow.users().find_by_id(claims.sub).await? {
            Some(user) if user.is_active => Ok(Actor::from(&user)),
            _ => Err(AppError::Unauthorized),
        }
    }
}
