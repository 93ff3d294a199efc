//! Migration: Create inquiries table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_properties_table::Properties;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Inquiries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inquiries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Inquiries::Name).string().not_null())
                    .col(ColumnDef::new(Inquiries::Email).string().not_null())
                    .col(ColumnDef::new(Inquiries::Phone).string().null())
                    .col(ColumnDef::new(Inquiries::Message).text().null())
                    .col(
                        ColumnDef::new(Inquiries::InquiryType)
                            .string_len(16)
                            .not_null()
                            .default("general"),
                    )
                    .col(
                        ColumnDef::new(Inquiries::Status)
                            .string_len(16)
                            .not_null()
                            .default("new"),
                    )
                    .col(
                        ColumnDef::new(Inquiries::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Inquiries::PropertyId).integer().null())
                    .col(ColumnDef::new(Inquiries::UserId).integer().null())
                    .col(
                        ColumnDef::new(Inquiries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Inquiries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiries_property")
                            .from(Inquiries::Table, Inquiries::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiries_user")
                            .from(Inquiries::Table, Inquiries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inquiries_status")
                    .table(Inquiries::Table)
                    .col(Inquiries::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Inquiries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Inquiries {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Message,
    InquiryType,
    Status,
    IsRead,
    PropertyId,
    UserId,
    CreatedAt,
    UpdatedAt,
}
