//! Create `user` table.
//!
//! Stores every account on the platform; the role column separates
//! customers, caregivers, vendors and admins.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Name, 100).not_null())
                    .col(string_len(User::Email, 255).unique_key().not_null())
                    .col(
                        ColumnDef::new(User::Phone)
                            .string_len(32)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(User::City)
                            .string_len(100)
                            .null(),
                    )
                    .col(string_len(User::Role, 32).not_null())
                    .col(boolean(User::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(User::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(User::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User { Table, Id, Name, Email, Phone, City, Role, IsActive, CreatedAt, UpdatedAt }
