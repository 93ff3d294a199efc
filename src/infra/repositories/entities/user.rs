//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{OwnerSummary, User, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub avatar: Option<String>,
    pub last_login: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::property::Entity")]
    Property,
    #[sea_orm(has_many = "super::inquiry::Entity")]
    Inquiry,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::inquiry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inquiry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            phone: model.phone,
            role: UserRole::from(model.role.as_str()),
            is_active: model.is_active,
            avatar: model.avatar,
            last_login: model.last_login,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Model> for OwnerSummary {
    fn from(model: Model) -> Self {
        OwnerSummary {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
        }
    }
}
