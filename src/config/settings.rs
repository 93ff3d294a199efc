//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_HTTP_TIMEOUT_SECONDS, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MAX_UPLOAD_FILES, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MIN_JWT_SECRET_LENGTH,
};

/// Credentials for the remote image host.
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    api_secret: String,
}

impl CloudinaryConfig {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Secret used to sign upload and destroy requests.
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

/// Credentials for the initial admin account created by `seed`.
#[derive(Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    password: String,
}

impl AdminSeed {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub cors_origin: Option<String>,
    pub upload_dir: PathBuf,
    pub max_upload_files: usize,
    pub max_upload_bytes: usize,
    pub http_timeout_seconds: u64,
    pub cloudinary: Option<CloudinaryConfig>,
    pub admin_seed: Option<AdminSeed>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cors_origin", &self.cors_origin)
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_files", &self.max_upload_files)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .field("cloudinary", &self.cloudinary.as_ref().map(|_| "[REDACTED]"))
            .field("admin_seed", &self.admin_seed.as_ref().map(|s| &s.email))
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let cloudinary = match (
            env::var("CLOUDINARY_CLOUD_NAME"),
            env::var("CLOUDINARY_API_KEY"),
            env::var("CLOUDINARY_API_SECRET"),
        ) {
            (Ok(cloud_name), Ok(api_key), Ok(api_secret)) => {
                Some(CloudinaryConfig::new(cloud_name, api_key, api_secret))
            }
            _ => {
                tracing::warn!("Cloudinary credentials not set, image uploads are disabled");
                None
            }
        };

        let admin_seed = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminSeed::new(
                env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
                email,
                password,
            )),
            _ => None,
        };

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: parse_var("JWT_EXPIRATION_HOURS")
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty()),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            max_upload_files: parse_var("MAX_UPLOAD_FILES").unwrap_or(DEFAULT_MAX_UPLOAD_FILES),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES").unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            http_timeout_seconds: parse_var("HTTP_TIMEOUT_SECONDS")
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECONDS),
            cloudinary,
            admin_seed,
        }
    }

    /// Configuration for tests and embedding, with fixed defaults and the given secret.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            cors_origin: None,
            upload_dir: env::temp_dir(),
            max_upload_files: DEFAULT_MAX_UPLOAD_FILES,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            http_timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECONDS,
            cloudinary: None,
            admin_seed: None,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
