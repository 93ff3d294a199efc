//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::base::{conflict_on_duplicate, contains_ci, fetch_page, updated};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, OwnerSummary, UpdateProfile, User, UserFilter, UserRole};
use crate::errors::AppResult;
use crate::types::PageRequest;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Exact match; callers pass an already normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply the supplied profile fields; `None` if the user is gone.
    async fn update_profile(&self, id: i32, changes: UpdateProfile) -> AppResult<Option<User>>;

    async fn update_password(&self, id: i32, password_hash: String) -> AppResult<()>;

    async fn record_login(&self, id: i32, at: DateTime<Utc>) -> AppResult<()>;

    async fn set_active(&self, id: i32, is_active: bool) -> AppResult<Option<User>>;

    /// Hard delete; owned rows go with it through the foreign keys.
    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// Filtered page, newest first.
    async fn list(&self, filter: UserFilter, page: PageRequest) -> AppResult<(Vec<User>, u64)>;

    /// Owner projections for the given ids, in no particular order.
    async fn summaries(&self, ids: Vec<i32>) -> AppResult<Vec<OwnerSummary>>;

    async fn count(&self) -> AppResult<u64>;

    async fn count_created_since(&self, since: DateTime<Utc>) -> AppResult<u64>;

    async fn admin_exists(&self) -> AppResult<bool>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn filter_condition(filter: &UserFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(search) = filter.search.as_deref() {
        condition = condition.add(
            Condition::any()
                .add(contains_ci(user::Column::Name, search))
                .add(contains_ci(user::Column::Email, search)),
        );
    }
    if let Some(role) = filter.role {
        condition = condition.add(user::Column::Role.eq(role.as_str()));
    }
    condition
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            phone: Set(new_user.phone),
            role: Set(new_user.role.as_str().to_string()),
            is_active: Set(true),
            avatar: Set(None),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_duplicate(e, "User already exists with this email"))?;
        Ok(User::from(model))
    }

    async fn update_profile(&self, id: i32, changes: UpdateProfile) -> AppResult<Option<User>> {
        let mut active = ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone));
        }

        Ok(updated(active.update(&self.db).await)?.map(User::from))
    }

    async fn update_password(&self, id: i32, password_hash: String) -> AppResult<()> {
        let active = ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        active.update(&self.db).await?;
        Ok(())
    }

    async fn record_login(&self, id: i32, at: DateTime<Utc>) -> AppResult<()> {
        UserEntity::update_many()
            .col_expr(user::Column::LastLogin, Expr::value(at))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn set_active(&self, id: i32, is_active: bool) -> AppResult<Option<User>> {
        let active = ActiveModel {
            id: Set(id),
            is_active: Set(is_active),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(updated(active.update(&self.db).await)?.map(User::from))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self, filter: UserFilter, page: PageRequest) -> AppResult<(Vec<User>, u64)> {
        let select = UserEntity::find()
            .filter(filter_condition(&filter))
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id);

        let (models, total) = fetch_page(&self.db, select, page).await?;
        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn summaries(&self, ids: Vec<i32>) -> AppResult<Vec<OwnerSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(OwnerSummary::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(UserEntity::find().count(&self.db).await?)
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        Ok(UserEntity::find()
            .filter(user::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await?)
    }

    async fn admin_exists(&self) -> AppResult<bool> {
        let admins = UserEntity::find()
            .filter(user::Column::Role.eq(UserRole::Admin.as_str()))
            .count(&self.db)
            .await?;
        Ok(admins > 0)
    }
}
