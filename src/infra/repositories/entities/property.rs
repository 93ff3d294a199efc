//! Property database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::normalize::string_list;
use crate::domain::{
    Amenities, Furnishing, ListingStatus, ListingType, Property, PropertyCategory,
};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub property_type: String,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub price: Decimal,
    pub location: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub kitchens: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub area: Option<Decimal>,
    pub built_year: Option<i32>,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub facing: Option<String>,
    pub parking: Option<i32>,
    pub balcony: Option<i32>,
    pub garden: bool,
    pub swimming_pool: bool,
    pub gym: bool,
    pub security: bool,
    pub wifi: bool,
    pub tv: bool,
    pub ac: bool,
    pub heating: bool,
    pub lift: bool,
    pub power_backup: bool,
    pub water_supply: bool,
    pub gas_connection: bool,
    pub furnished: String,
    pub features: Json,
    pub images: Json,
    pub contact: Option<String>,
    pub owner: Option<String>,
    pub status: String,
    pub is_approved: bool,
    pub is_featured: bool,
    pub views: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 8)))", nullable)]
    pub latitude: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((11, 8)))", nullable)]
    pub longitude: Option<Decimal>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::property_image::Entity")]
    PropertyImage,
    #[sea_orm(has_many = "super::inquiry::Entity")]
    Inquiry,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::property_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyImage.def()
    }
}

impl Related<super::inquiry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inquiry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Property {
    fn from(model: Model) -> Self {
        Property {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            kind: model.kind.parse().unwrap_or(ListingType::Buy),
            property_type: model
                .property_type
                .parse()
                .unwrap_or(PropertyCategory::Apartment),
            price: model.price,
            location: model.location,
            address: model.address,
            city: model.city,
            state: model.state,
            zip_code: model.zip_code,
            bedrooms: model.bedrooms,
            bathrooms: model.bathrooms,
            kitchens: model.kitchens,
            area: model.area,
            built_year: model.built_year,
            floor: model.floor,
            total_floors: model.total_floors,
            facing: model.facing.and_then(|f| f.parse().ok()),
            parking: model.parking,
            balcony: model.balcony,
            amenities: Amenities {
                garden: model.garden,
                swimming_pool: model.swimming_pool,
                gym: model.gym,
                security: model.security,
                wifi: model.wifi,
                tv: model.tv,
                ac: model.ac,
                heating: model.heating,
                lift: model.lift,
                power_backup: model.power_backup,
                water_supply: model.water_supply,
                gas_connection: model.gas_connection,
            },
            furnished: model.furnished.parse().unwrap_or(Furnishing::Unfurnished),
            features: string_list(&model.features),
            images: string_list(&model.images),
            contact: model.contact,
            owner: model.owner,
            status: model.status.parse().unwrap_or(ListingStatus::Pending),
            is_approved: model.is_approved,
            is_featured: model.is_featured,
            views: model.views,
            latitude: model.latitude,
            longitude: model.longitude,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
