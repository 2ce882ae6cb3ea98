//! Create `booking` table.
//!
//! Rows are never deleted; cancellation is a terminal status. Price is
//! stored in integer minor-currency units.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::CustomerId).not_null())
                    .col(
                        ColumnDef::new(Booking::CaregiverId)
                            .uuid()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Booking::StartTime).not_null())
                    .col(
                        ColumnDef::new(Booking::EndTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(string_len(Booking::Status, 32).not_null())
                    .col(big_integer(Booking::PriceCents).not_null())
                    .col(string_len(Booking::Address, 500).not_null())
                    .col(
                        ColumnDef::new(Booking::Notes)
                            .string_len(500)
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Booking::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Booking::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_customer")
                            .from(Booking::Table, Booking::CustomerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_caregiver_profile")
                            .from(Booking::Table, Booking::CaregiverId)
                            .to(CaregiverProfile::Table, CaregiverProfile::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Booking::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Booking {
    Table,
    Id,
    CustomerId,
    CaregiverId,
    StartTime,
    EndTime,
    Status,
    PriceCents,
    Address,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum CaregiverProfile { Table, Id }
