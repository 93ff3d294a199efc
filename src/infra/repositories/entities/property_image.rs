//! Property image database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::PropertyImage;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "property_images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub property_id: i32,
    pub url: String,
    pub public_id: Option<String>,
    pub caption: Option<String>,
    pub is_primary: bool,
    pub order: i32,
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
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PropertyImage {
    fn from(model: Model) -> Self {
        PropertyImage {
            id: model.id,
            property_id: model.property_id,
            url: model.url,
            public_id: model.public_id,
            caption: model.caption,
            is_primary: model.is_primary,
            order: model.order,
            created_at: model.created_at,
        }
    }
}
