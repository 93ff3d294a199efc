//! Migration: Create properties table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Amenity flag columns, all `BOOLEAN NOT NULL DEFAULT false`.
const AMENITIES: [Properties; 12] = [
    Properties::Garden,
    Properties::SwimmingPool,
    Properties::Gym,
    Properties::Security,
    Properties::Wifi,
    Properties::Tv,
    Properties::Ac,
    Properties::Heating,
    Properties::Lift,
    Properties::PowerBackup,
    Properties::WaterSupply,
    Properties::GasConnection,
];

/// Listing filter columns that get a single-column index.
const INDEXED: [(&str, Properties); 8] = [
    ("idx_properties_type", Properties::Type),
    ("idx_properties_property_type", Properties::PropertyType),
    ("idx_properties_location", Properties::Location),
    ("idx_properties_price", Properties::Price),
    ("idx_properties_status", Properties::Status),
    ("idx_properties_is_approved", Properties::IsApproved),
    ("idx_properties_is_featured", Properties::IsFeatured),
    ("idx_properties_user_id", Properties::UserId),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Properties::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Properties::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Properties::UserId).integer().not_null())
            .col(ColumnDef::new(Properties::Title).string_len(200).not_null())
            .col(ColumnDef::new(Properties::Description).text().null())
            .col(ColumnDef::new(Properties::Type).string_len(16).not_null())
            .col(
                ColumnDef::new(Properties::PropertyType)
                    .string_len(16)
                    .not_null()
                    .default("apartment"),
            )
            .col(ColumnDef::new(Properties::Price).decimal_len(15, 2).not_null())
            .col(ColumnDef::new(Properties::Location).string().not_null())
            .col(ColumnDef::new(Properties::Address).text().null())
            .col(ColumnDef::new(Properties::City).string().null())
            .col(ColumnDef::new(Properties::State).string().null())
            .col(ColumnDef::new(Properties::ZipCode).string().null())
            .col(ColumnDef::new(Properties::Bedrooms).integer().null())
            .col(ColumnDef::new(Properties::Bathrooms).integer().null())
            .col(ColumnDef::new(Properties::Kitchens).integer().null().default(1))
            .col(ColumnDef::new(Properties::Area).decimal_len(10, 2).null())
            .col(ColumnDef::new(Properties::BuiltYear).integer().null())
            .col(ColumnDef::new(Properties::Floor).integer().null())
            .col(ColumnDef::new(Properties::TotalFloors).integer().null())
            .col(ColumnDef::new(Properties::Facing).string_len(16).null())
            .col(ColumnDef::new(Properties::Parking).integer().null().default(0))
            .col(ColumnDef::new(Properties::Balcony).integer().null().default(0));

        for amenity in AMENITIES {
            table.col(ColumnDef::new(amenity).boolean().not_null().default(false));
        }

        table
            .col(
                ColumnDef::new(Properties::Furnished)
                    .string_len(20)
                    .not_null()
                    .default("unfurnished"),
            )
            .col(
                ColumnDef::new(Properties::Features)
                    .json()
                    .not_null()
                    .default(Expr::cust("'[]'")),
            )
            .col(
                ColumnDef::new(Properties::Images)
                    .json()
                    .not_null()
                    .default(Expr::cust("'[]'")),
            )
            .col(ColumnDef::new(Properties::Contact).string().null())
            .col(ColumnDef::new(Properties::Owner).string().null())
            .col(
                ColumnDef::new(Properties::Status)
                    .string_len(16)
                    .not_null()
                    .default("available"),
            )
            .col(
                ColumnDef::new(Properties::IsApproved)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Properties::IsFeatured)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Properties::Views)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(ColumnDef::new(Properties::Latitude).decimal_len(10, 8).null())
            .col(ColumnDef::new(Properties::Longitude).decimal_len(11, 8).null())
            .col(
                ColumnDef::new(Properties::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(Properties::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_properties_user")
                    .from(Properties::Table, Properties::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::Cascade),
            );

        manager.create_table(table.to_owned()).await?;

        for (name, column) in INDEXED {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Properties::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
pub enum Properties {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Type,
    PropertyType,
    Price,
    Location,
    Address,
    City,
    State,
    ZipCode,
    Bedrooms,
    Bathrooms,
    Kitchens,
    Area,
    BuiltYear,
    Floor,
    TotalFloors,
    Facing,
    Parking,
    Balcony,
    Garden,
    SwimmingPool,
    Gym,
    Security,
    Wifi,
    Tv,
    Ac,
    Heating,
    Lift,
    PowerBackup,
    WaterSupply,
    GasConnection,
    Furnished,
    Features,
    Images,
    Contact,
    Owner,
    Status,
    IsApproved,
    IsFeatured,
    Views,
    Latitude,
    Longitude,
    CreatedAt,
    UpdatedAt,
}
