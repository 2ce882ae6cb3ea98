//! Create `caregiver_document` table for uploaded credential documents.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CaregiverDocument::Table)
                    .if_not_exists()
                    .col(uuid(CaregiverDocument::Id).primary_key())
                    .col(uuid(CaregiverDocument::ProfileId).not_null())
                    .col(string_len(CaregiverDocument::DocType, 32).not_null())
                    .col(string_len(CaregiverDocument::Url, 1024).not_null())
                    .col(boolean(CaregiverDocument::Verified).not_null().default(false))
                    .col(timestamp_with_time_zone(CaregiverDocument::UploadedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_caregiver_document_profile")
                            .from(CaregiverDocument::Table, CaregiverDocument::ProfileId)
                            .to(CaregiverProfile::Table, CaregiverProfile::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CaregiverDocument::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CaregiverDocument {
    Table,
    Id,
    ProfileId,
    DocType,
    Url,
    Verified,
    UploadedAt,
}

#[derive(DeriveIden)]
enum CaregiverProfile { Table, Id }
