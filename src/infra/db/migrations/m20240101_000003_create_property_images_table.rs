//! Migration: Create property_images table.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_properties_table::Properties;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PropertyImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PropertyImages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PropertyImages::PropertyId).integer().not_null())
                    .col(ColumnDef::new(PropertyImages::Url).string().not_null())
                    .col(ColumnDef::new(PropertyImages::PublicId).string().null())
                    .col(ColumnDef::new(PropertyImages::Caption).string().null())
                    .col(
                        ColumnDef::new(PropertyImages::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PropertyImages::Order)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PropertyImages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PropertyImages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_images_property")
                            .from(PropertyImages::Table, PropertyImages::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_property_images_property_order")
                    .table(PropertyImages::Table)
                    .col(PropertyImages::PropertyId)
                    .col(PropertyImages::Order)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PropertyImages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PropertyImages {
    Table,
    Id,
    PropertyId,
    Url,
    PublicId,
    Caption,
    IsPrimary,
    Order,
    CreatedAt,
    UpdatedAt,
}
