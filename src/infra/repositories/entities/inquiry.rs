//! Inquiry database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Inquiry, InquiryStatus, InquiryType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inquiries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    pub inquiry_type: String,
    pub status: String,
    pub is_read: bool,
    pub property_id: Option<i32>,
    pub user_id: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "Cascade"
    )]
    Property,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Inquiry {
    fn from(model: Model) -> Self {
        Inquiry {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            message: model.message,
            inquiry_type: model.inquiry_type.parse().unwrap_or(InquiryType::General),
            status: model.status.parse().unwrap_or(InquiryStatus::New),
            is_read: model.is_read,
            property_id: model.property_id,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
