//! Unit of Work over repository mocks, plus row fixtures.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::{
    Actor, Amenities, Furnishing, ListingStatus, ListingType, Property, PropertyCategory,
    PropertyImage, User, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    ImageRepository, InquiryRepository, MockImageRepository, MockInquiryRepository,
    MockPropertyRepository, MockUserRepository, PropertyRepository, TransactionContext,
    TransactionFuture, UnitOfWork, UserRepository,
};

/// Repositories are fixed at construction; transactions are unsupported.
pub struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    properties: Arc<MockPropertyRepository>,
    images: Arc<MockImageRepository>,
    inquiries: Arc<MockInquiryRepository>,
}

impl TestUnitOfWork {
    pub fn new() -> Self {
        Self::with(
            MockUserRepository::new(),
            MockPropertyRepository::new(),
            MockImageRepository::new(),
            MockInquiryRepository::new(),
        )
    }

    pub fn with(
        users: MockUserRepository,
        properties: MockPropertyRepository,
        images: MockImageRepository,
        inquiries: MockInquiryRepository,
    ) -> Self {
        Self {
            users: Arc::new(users),
            properties: Arc::new(properties),
            images: Arc::new(images),
            inquiries: Arc::new(inquiries),
        }
    }

    pub fn with_users(users: MockUserRepository) -> Self {
        Self::with(
            users,
            MockPropertyRepository::new(),
            MockImageRepository::new(),
            MockInquiryRepository::new(),
        )
    }

    pub fn with_inquiries(
        properties: MockPropertyRepository,
        inquiries: MockInquiryRepository,
    ) -> Self {
        Self::with(
            MockUserRepository::new(),
            properties,
            MockImageRepository::new(),
            inquiries,
        )
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn properties(&self) -> Arc<dyn PropertyRepository> {
        self.properties.clone()
    }

    fn images(&self) -> Arc<dyn ImageRepository> {
        self.images.clone()
    }

    fn inquiries(&self) -> Arc<dyn InquiryRepository> {
        self.inquiries.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

pub fn member(id: i32) -> Actor {
    Actor::new(id, format!("user{}@example.com", id), UserRole::User)
}

pub fn admin(id: i32) -> Actor {
    Actor::new(id, format!("admin{}@example.com", id), UserRole::Admin)
}

pub fn user(id: i32, role: UserRole) -> User {
    let now = Utc::now();
    User {
        id,
        name: format!("User {}", id),
        email: format!("user{}@example.com", id),
        password_hash: "hashed".to_string(),
        phone: None,
        role,
        is_active: true,
        avatar: None,
        last_login: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn property(id: i32, owner_id: i32) -> Property {
    let now = Utc::now();
    Property {
        id,
        user_id: owner_id,
        title: format!("Listing number {}", id),
        description: None,
        kind: ListingType::Buy,
        property_type: PropertyCategory::Apartment,
        price: Decimal::from(2_500_000),
        location: "Pune".to_string(),
        address: None,
        city: Some("Pune".to_string()),
        state: None,
        zip_code: None,
        bedrooms: Some(2),
        bathrooms: Some(2),
        kitchens: Some(1),
        area: Some(Decimal::from(950)),
        built_year: None,
        floor: None,
        total_floors: None,
        facing: None,
        parking: Some(1),
        balcony: Some(1),
        amenities: Amenities::default(),
        furnished: Furnishing::Unfurnished,
        features: vec![],
        images: vec![],
        contact: None,
        owner: None,
        status: ListingStatus::Available,
        is_approved: true,
        is_featured: false,
        views: 0,
        latitude: None,
        longitude: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn image(id: i32, property_id: i32, is_primary: bool) -> PropertyImage {
    PropertyImage {
        id,
        property_id,
        url: format!("https://img.example.com/{}.jpg", id),
        public_id: Some(format!("properties/{}", id)),
        caption: None,
        is_primary,
        order: id,
        created_at: Utc::now(),
    }
}
