//! User service - Account administration and dashboard statistics.
//!
//! Role checks happen at the API boundary; this service only enforces
//! rules that depend on the acting user, such as not deleting oneself.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::RECENT_USERS_DAYS;
use crate::domain::{
    Actor, OwnedProperty, Property, PropertyCriteria, User, UserFilter, UserResponse,
    UserWithProperties,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{ImageJanitor, UnitOfWork};
use crate::types::{Page, PageRequest};

/// Listing counters for one user's own properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_properties: u64,
    pub total_views: i64,
    /// Listing count per status; statuses with no listing are absent.
    pub by_status: BTreeMap<String, u64>,
}

/// Global dashboard counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub total_properties: u64,
    /// Approved and available.
    pub total_active_properties: u64,
    pub total_pending_approval: u64,
    /// Registrations within the last 30 days.
    pub recent_users: u64,
    pub properties_by_type: BTreeMap<String, u64>,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Filtered page of users, each with a brief projection of their listings.
    async fn list_users(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> AppResult<Page<UserWithProperties>>;

    async fn get_user(&self, id: i32) -> AppResult<UserWithProperties>;

    async fn set_active(&self, id: i32, is_active: bool) -> AppResult<UserResponse>;

    /// Delete another user's account with everything it owns.
    async fn delete_user(&self, actor: &Actor, id: i32) -> AppResult<()>;

    async fn user_stats(&self, actor: &Actor) -> AppResult<UserStats>;

    async fn admin_stats(&self) -> AppResult<AdminStats>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    janitor: ImageJanitor,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, janitor: ImageJanitor) -> Self {
        Self { uow, janitor }
    }

    async fn find_user(&self, id: i32) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }
}

fn brief(property: Property) -> OwnedProperty {
    OwnedProperty {
        id: property.id,
        title: property.title,
        kind: property.kind,
        status: property.status,
        price: None,
        created_at: None,
    }
}

fn detailed(property: Property) -> OwnedProperty {
    OwnedProperty {
        id: property.id,
        title: property.title,
        kind: property.kind,
        status: property.status,
        price: Some(property.price),
        created_at: Some(property.created_at),
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list_users(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> AppResult<Page<UserWithProperties>> {
        let (users, total) = self.uow.users().list(filter, page).await?;

        let owner_ids = users.iter().map(|u| u.id).collect();
        let mut by_owner: HashMap<i32, Vec<OwnedProperty>> = HashMap::new();
        for property in self.uow.properties().list_by_owners(owner_ids).await? {
            by_owner
                .entry(property.user_id)
                .or_default()
                .push(brief(property));
        }

        let items = users
            .into_iter()
            .map(|user| UserWithProperties {
                properties: by_owner.remove(&user.id).unwrap_or_default(),
                user: user.into(),
            })
            .collect();

        Ok(Page::new(items, total, page))
    }

    async fn get_user(&self, id: i32) -> AppResult<UserWithProperties> {
        let user = self.find_user(id).await?;
        let properties = self
            .uow
            .properties()
            .list_by_owners(vec![user.id])
            .await?
            .into_iter()
            .map(detailed)
            .collect();

        Ok(UserWithProperties {
            user: user.into(),
            properties,
        })
    }

    async fn set_active(&self, id: i32, is_active: bool) -> AppResult<UserResponse> {
        let user = self
            .uow
            .users()
            .set_active(id, is_active)
            .await?
            .ok_or_not_found("User")?;

        tracing::info!(user_id = id, is_active, "User status changed");
        Ok(user.into())
    }

    async fn delete_user(&self, actor: &Actor, id: i32) -> AppResult<()> {
        if actor.id == id {
            return Err(AppError::BadRequest(
                "Cannot delete your own account".to_string(),
            ));
        }

        let user = self.find_user(id).await?;

        let property_ids = self
            .uow
            .properties()
            .list_by_owners(vec![user.id])
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        let public_ids: Vec<String> = self
            .uow
            .images()
            .for_properties(property_ids)
            .await?
            .into_iter()
            .filter_map(|image| image.public_id)
            .collect();

        if !self.uow.users().delete(user.id).await? {
            return Err(AppError::not_found("User"));
        }

        let queued = self.janitor.remove_all(public_ids).await;
        tracing::info!(user_id = user.id, deleted_by = actor.id, queued, "User deleted");
        Ok(())
    }

    async fn user_stats(&self, actor: &Actor) -> AppResult<UserStats> {
        let properties = self.uow.properties();
        let owner = Some(actor.id);

        let total_properties = properties
            .count(PropertyCriteria {
                owner,
                ..Default::default()
            })
            .await?;
        let total_views = properties.total_views(owner).await?;
        let by_status = properties
            .count_by_status(owner)
            .await?
            .into_iter()
            .map(|(status, count)| (status.to_string(), count))
            .collect();

        Ok(UserStats {
            total_properties,
            total_views,
            by_status,
        })
    }

    async fn admin_stats(&self) -> AppResult<AdminStats> {
        let users = self.uow.users();
        let properties = self.uow.properties();
        let since = Utc::now() - Duration::days(RECENT_USERS_DAYS);

        let (
            total_users,
            total_properties,
            total_active_properties,
            total_pending_approval,
            recent_users,
            by_type,
        ) = tokio::try_join!(
            users.count(),
            properties.count(PropertyCriteria::default()),
            properties.count(PropertyCriteria::public()),
            properties.count(PropertyCriteria {
                is_approved: Some(false),
                ..Default::default()
            }),
            users.count_created_since(since),
            properties.count_by_type(),
        )?;

        Ok(AdminStats {
            total_users,
            total_properties,
            total_active_properties,
            total_pending_approval,
            recent_users,
            properties_by_type: by_type
                .into_iter()
                .map(|(kind, count)| (kind.to_string(), count))
                .collect(),
        })
    }
}
