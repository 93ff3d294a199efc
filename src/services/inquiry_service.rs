//! Inquiry service - Contact requests and their admin triage.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Actor, Inquiry, InquiryFilter, InquiryUpdate, NewInquiry};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Page, PageRequest};

#[async_trait]
pub trait InquiryService: Send + Sync {
    /// Record an inquiry, linked to `sender` when signed in. A referenced
    /// property must be publicly visible.
    async fn submit(&self, inquiry: NewInquiry, sender: Option<Actor>) -> AppResult<Inquiry>;

    async fn list(&self, filter: InquiryFilter, page: PageRequest) -> AppResult<Page<Inquiry>>;

    async fn update(&self, id: i32, changes: InquiryUpdate) -> AppResult<Inquiry>;
}

pub struct InquiryDesk<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> InquiryDesk<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> InquiryService for InquiryDesk<U> {
    async fn submit(&self, inquiry: NewInquiry, sender: Option<Actor>) -> AppResult<Inquiry> {
        if let Some(property_id) = inquiry.property_id {
            self.uow
                .properties()
                .find_public(property_id)
                .await?
                .ok_or_not_found("Property")?;
        }

        let created = self
            .uow
            .inquiries()
            .create(inquiry, sender.map(|actor| actor.id))
            .await?;

        tracing::info!(
            inquiry_id = created.id,
            property_id = ?created.property_id,
            kind = %created.inquiry_type,
            "Inquiry received"
        );
        Ok(created)
    }

    async fn list(&self, filter: InquiryFilter, page: PageRequest) -> AppResult<Page<Inquiry>> {
        let (items, total) = self.uow.inquiries().list(filter, page).await?;
        Ok(Page::new(items, total, page))
    }

    async fn update(&self, id: i32, changes: InquiryUpdate) -> AppResult<Inquiry> {
        self.uow
            .inquiries()
            .update(id, changes)
            .await?
            .ok_or_not_found("Inquiry")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::domain::{InquiryStatus, InquiryType};
    use crate::errors::AppError;
    use crate::infra::{MockInquiryRepository, MockPropertyRepository};
    use crate::services::test_support::{member, property, TestUnitOfWork};

    fn submission(property_id: Option<i32>) -> NewInquiry {
        NewInquiry {
            name: "Meera".to_string(),
            email: "meera@example.com".to_string(),
            phone: None,
            message: Some("Is the price negotiable?".to_string()),
            inquiry_type: InquiryType::Buy,
            property_id,
        }
    }

    fn stored(inquiry: NewInquiry, user_id: Option<i32>) -> Inquiry {
        let now = Utc::now();
        Inquiry {
            id: 1,
            name: inquiry.name,
            email: inquiry.email,
            phone: inquiry.phone,
            message: inquiry.message,
            inquiry_type: inquiry.inquiry_type,
            status: InquiryStatus::New,
            is_read: false,
            property_id: inquiry.property_id,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_hidden_property_rejects_inquiry() {
        let mut properties = MockPropertyRepository::new();
        properties
            .expect_find_public()
            .with(eq(9))
            .returning(|_| Ok(None));
        let mut inquiries = MockInquiryRepository::new();
        inquiries.expect_create().never();

        let desk = InquiryDesk::new(Arc::new(TestUnitOfWork::with_inquiries(
            properties, inquiries,
        )));

        let err = desk.submit(submission(Some(9)), None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Property not found"));
    }

    #[tokio::test]
    async fn test_signed_in_sender_is_linked() {
        let mut properties = MockPropertyRepository::new();
        properties
            .expect_find_public()
            .returning(|id| Ok(Some(property(id, 2))));
        let mut inquiries = MockInquiryRepository::new();
        inquiries
            .expect_create()
            .withf(|_, user_id| *user_id == Some(5))
            .times(1)
            .returning(|inquiry, user_id| Ok(stored(inquiry, user_id)));

        let desk = InquiryDesk::new(Arc::new(TestUnitOfWork::with_inquiries(
            properties, inquiries,
        )));

        let inquiry = desk
            .submit(submission(Some(3)), Some(member(5)))
            .await
            .unwrap();
        assert_eq!(inquiry.user_id, Some(5));
        assert_eq!(inquiry.property_id, Some(3));
    }

    #[tokio::test]
    async fn test_general_inquiry_skips_property_lookup() {
        let mut properties = MockPropertyRepository::new();
        properties.expect_find_public().never();
        let mut inquiries = MockInquiryRepository::new();
        inquiries
            .expect_create()
            .returning(|inquiry, user_id| Ok(stored(inquiry, user_id)));

        let desk = InquiryDesk::new(Arc::new(TestUnitOfWork::with_inquiries(
            properties, inquiries,
        )));

        let inquiry = desk.submit(submission(None), None).await.unwrap();
        assert_eq!(inquiry.user_id, None);
    }

    #[tokio::test]
    async fn test_update_missing_inquiry() {
        let mut inquiries = MockInquiryRepository::new();
        inquiries.expect_update().returning(|_, _| Ok(None));

        let desk = InquiryDesk::new(Arc::new(TestUnitOfWork::with_inquiries(
            MockPropertyRepository::new(),
            inquiries,
        )));

        let err = desk
            .update(77, InquiryUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Inquiry not found");
    }
}
