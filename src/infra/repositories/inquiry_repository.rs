//! Inquiry repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::base::{fetch_page, updated};
use super::entities::inquiry::{ActiveModel, Column, Entity as InquiryEntity};
use crate::domain::{Inquiry, InquiryFilter, InquiryStatus, InquiryUpdate, NewInquiry};
use crate::errors::AppResult;
use crate::types::PageRequest;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait InquiryRepository: Send + Sync {
    /// Store a new inquiry, linked to `user_id` when the sender is signed in.
    async fn create(&self, inquiry: NewInquiry, user_id: Option<i32>) -> AppResult<Inquiry>;

    /// Filtered page, newest first.
    async fn list(&self, filter: InquiryFilter, page: PageRequest)
        -> AppResult<(Vec<Inquiry>, u64)>;

    async fn update(&self, id: i32, changes: InquiryUpdate) -> AppResult<Option<Inquiry>>;
}

pub struct InquiryStore {
    db: DatabaseConnection,
}

impl InquiryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InquiryRepository for InquiryStore {
    async fn create(&self, inquiry: NewInquiry, user_id: Option<i32>) -> AppResult<Inquiry> {
        let now = Utc::now();
        let active = ActiveModel {
            name: Set(inquiry.name),
            email: Set(inquiry.email),
            phone: Set(inquiry.phone),
            message: Set(inquiry.message),
            inquiry_type: Set(inquiry.inquiry_type.as_str().to_string()),
            status: Set(InquiryStatus::New.as_str().to_string()),
            is_read: Set(false),
            property_id: Set(inquiry.property_id),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(Inquiry::from(active.insert(&self.db).await?))
    }

    async fn list(
        &self,
        filter: InquiryFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<Inquiry>, u64)> {
        let condition = Condition::all()
            .add_option(filter.status.map(|s| Column::Status.eq(s.as_str())))
            .add_option(filter.is_read.map(|r| Column::IsRead.eq(r)));
        let select = InquiryEntity::find()
            .filter(condition)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let (models, total) = fetch_page(&self.db, select, page).await?;
        Ok((models.into_iter().map(Inquiry::from).collect(), total))
    }

    async fn update(&self, id: i32, changes: InquiryUpdate) -> AppResult<Option<Inquiry>> {
        let mut active = ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(is_read) = changes.is_read {
            active.is_read = Set(is_read);
        }
        Ok(updated(active.update(&self.db).await)?.map(Inquiry::from))
    }
}
