//! Create `caregiver_profile` table with FK to `user`.
//!
//! Service tags are stored as a JSON array; the `verified` flag is kept in
//! sync with `verification_status` by the service layer.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CaregiverProfile::Table)
                    .if_not_exists()
                    .col(uuid(CaregiverProfile::Id).primary_key())
                    .col(uuid(CaregiverProfile::UserId).unique_key().not_null())
                    .col(json_binary(CaregiverProfile::Services).not_null())
                    .col(integer(CaregiverProfile::ExperienceYears).not_null())
                    .col(boolean(CaregiverProfile::Verified).not_null().default(false))
                    .col(string_len(CaregiverProfile::VerificationStatus, 32).not_null())
                    .col(
                        ColumnDef::new(CaregiverProfile::Rating)
                            .float()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CaregiverProfile::HourlyRateCents)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CaregiverProfile::Bio)
                            .string_len(500)
                            .null(),
                    )
                    .col(timestamp_with_time_zone(CaregiverProfile::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(CaregiverProfile::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_caregiver_profile_user")
                            .from(CaregiverProfile::Table, CaregiverProfile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CaregiverProfile::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CaregiverProfile {
    Table,
    Id,
    UserId,
    Services,
    ExperienceYears,
    Verified,
    VerificationStatus,
    Rating,
    HourlyRateCents,
    Bio,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
