//! The authenticated identity a request acts as.

use super::user::{User, UserRole};
use crate::errors::{AppError, AppResult};

/// Identity attached to a request by the auth middleware and threaded into
/// every service call that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: i32,
    pub email: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: i32, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            email: email.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Admins may change anything; everyone else only what they own.
    pub fn can_mutate(&self, owner_id: i32) -> bool {
        self.is_admin() || self.id == owner_id
    }

    /// Reject the actor unless its role is in `allowed`.
    pub fn require_role(&self, allowed: &[UserRole]) -> AppResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub fn require_admin(&self) -> AppResult<()> {
        self.require_role(&[UserRole::Admin])
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.email.clone(), user.role)
    }
}
