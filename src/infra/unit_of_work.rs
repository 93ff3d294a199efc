//! Unit of Work pattern implementation.
//!
//! Centralizes access to the repositories and runs multi-statement work
//! inside one database transaction (commit on `Ok`, rollback on `Err`).

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    AccessMode, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, IsolationLevel,
    QueryFilter, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::entities::property_image::{Column as ImageColumn, Entity as ImageEntity};
use super::repositories::{
    ImageRepository, ImageStore, InquiryRepository, InquiryStore, PropertyRepository,
    PropertyStore, UserRepository, UserStore,
};
use crate::domain::PropertyImage;
use crate::errors::{AppError, AppResult};

/// Boxed transaction body.
pub type TransactionFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction` method;
/// tests provide their own implementation over repository mocks.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn properties(&self) -> Arc<dyn PropertyRepository>;

    fn images(&self) -> Arc<dyn ImageRepository>;

    fn inquiries(&self) -> Arc<dyn InquiryRepository>;

    /// Execute a closure within a ReadCommitted transaction.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn images(&self) -> TxImageRepository<'_> {
        TxImageRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    property_repo: Arc<PropertyStore>,
    image_repo: Arc<ImageStore>,
    inquiry_repo: Arc<InquiryStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            property_repo: Arc::new(PropertyStore::new(db.clone())),
            image_repo: Arc::new(ImageStore::new(db.clone())),
            inquiry_repo: Arc::new(InquiryStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn properties(&self) -> Arc<dyn PropertyRepository> {
        self.property_repo.clone()
    }

    fn images(&self) -> Arc<dyn ImageRepository> {
        self.image_repo.clone()
    }

    fn inquiries(&self) -> Arc<dyn InquiryRepository> {
        self.inquiry_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Image writes that must happen together.
pub struct TxImageRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxImageRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Make `image_id` the only primary image of `property_id`.
    ///
    /// Clears every primary flag of the property, then sets the chosen one.
    /// Fails with not-found, undoing the clear, if the image does not
    /// belong to the property.
    pub async fn set_primary(&self, property_id: i32, image_id: i32) -> AppResult<PropertyImage> {
        let now = Utc::now();

        ImageEntity::update_many()
            .col_expr(ImageColumn::IsPrimary, Expr::value(false))
            .col_expr(ImageColumn::UpdatedAt, Expr::value(now))
            .filter(ImageColumn::PropertyId.eq(property_id))
            .filter(ImageColumn::IsPrimary.eq(true))
            .exec(self.txn)
            .await?;

        let result = ImageEntity::update_many()
            .col_expr(ImageColumn::IsPrimary, Expr::value(true))
            .col_expr(ImageColumn::UpdatedAt, Expr::value(now))
            .filter(ImageColumn::Id.eq(image_id))
            .filter(ImageColumn::PropertyId.eq(property_id))
            .exec(self.txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Image"));
        }

        let model = ImageEntity::find_by_id(image_id)
            .one(self.txn)
            .await?
            .ok_or_else(|| AppError::not_found("Image"))?;
        Ok(PropertyImage::from(model))
    }
}

/// Simpler API for executing transactional operations.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
