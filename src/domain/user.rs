//! User domain entity and related types.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::property::{ListingStatus, ListingType};
use crate::config::{ROLE_ADMIN, ROLE_USER};

/// Accepted phone format: optional leading `+`, then digits, spaces, dashes
/// and parentheses.
pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+]?[\d\s\-()]+$").expect("phone pattern is valid"));

/// Canonical stored form of an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::User => ROLE_USER,
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

/// Strict parse for query filters; unlike `From<&str>` it rejects unknown roles.
impl std::str::FromStr for UserRole {
    type Err = super::UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(UserRole::Admin),
            ROLE_USER => Ok(UserRole::User),
            _ => Err(super::UnknownVariant {
                kind: "UserRole",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub avatar: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Fields required to insert a user row. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    #[schema(example = "Asha Rao")]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    #[schema(example = "secret123", min_length = 6)]
    pub password: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Please provide a valid phone number"))]
    #[schema(example = "+91 98765 43210")]
    pub phone: Option<String>,
}

/// Own-profile patch. Blank values keep the current value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[validate(regex(path = *PHONE_REGEX, message = "Please provide a valid phone number"))]
    pub phone: Option<String>,
}

impl UpdateProfile {
    /// Drop blank fields so they leave the stored value untouched.
    pub fn without_blanks(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            name: keep(self.name),
            phone: keep(self.phone),
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Asha Rao")]
    pub name: String,
    #[schema(example = "asha@example.com")]
    pub email: String,
    pub phone: Option<String>,
    #[schema(example = "user")]
    pub role: UserRole,
    pub is_active: bool,
    pub avatar: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            is_active: user.is_active,
            avatar: user.avatar,
            last_login: user.last_login,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A property as listed under its owner in the admin user views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnedProperty {
    pub id: i32,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ListingType,
    pub status: ListingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// User plus the properties they own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserWithProperties {
    #[serde(flatten)]
    pub user: UserResponse,
    pub properties: Vec<OwnedProperty>,
}

/// Admin user-list filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    /// Case-insensitive substring of name or email.
    pub search: Option<String>,
    pub role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from("user"), UserRole::User);
        assert_eq!(UserRole::from("superuser"), UserRole::User);
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_phone_pattern() {
        assert!(PHONE_REGEX.is_match("+91 98765-43210"));
        assert!(PHONE_REGEX.is_match("(020) 555 0101"));
        assert!(!PHONE_REGEX.is_match("call me"));
        assert!(!PHONE_REGEX.is_match("12+34"));
    }

    #[test]
    fn test_email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Asha@X.com "), "asha@x.com");
        assert_eq!(normalize_email("asha@x.com"), "asha@x.com");
    }

    #[test]
    fn test_register_validation() {
        let payload = RegisterUser {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
            phone: Some("abc".to_string()),
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("phone"));
    }

    #[test]
    fn test_profile_blanks_are_dropped() {
        let patch = UpdateProfile {
            name: Some("  ".to_string()),
            phone: Some("+1 555".to_string()),
        }
        .without_blanks();

        assert_eq!(patch.name, None);
        assert_eq!(patch.phone.as_deref(), Some("+1 555"));
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let now = Utc::now();
        let response = UserResponse::from(User {
            id: 7,
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: "hash".to_string(),
            phone: None,
            role: UserRole::Admin,
            is_active: true,
            avatar: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["isActive"], true);
        assert_eq!(json["role"], "admin");
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
