//! Supporting indexes for the hot query paths: user listing filters,
//! caregiver search, and per-actor booking listings.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_role")
                    .table(User::Table)
                    .col(User::Role)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_city")
                    .table(User::Table)
                    .col(User::City)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_caregiver_profile_verification_status")
                    .table(CaregiverProfile::Table)
                    .col(CaregiverProfile::VerificationStatus)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_caregiver_profile_verified")
                    .table(CaregiverProfile::Table)
                    .col(CaregiverProfile::Verified)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_booking_customer_status")
                    .table(Booking::Table)
                    .col(Booking::CustomerId)
                    .col(Booking::Status)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_booking_caregiver_status")
                    .table(Booking::Table)
                    .col(Booking::CaregiverId)
                    .col(Booking::Status)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_booking_start_time")
                    .table(Booking::Table)
                    .col(Booking::StartTime)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_booking_created_at")
                    .table(Booking::Table)
                    .col(Booking::CreatedAt)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_user_role", "idx_user_city"] {
            manager
                .drop_index(Index::drop().name(name).table(User::Table).to_owned())
                .await
                .ok();
        }
        for name in [
            "idx_caregiver_profile_verification_status",
            "idx_caregiver_profile_verified",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(CaregiverProfile::Table).to_owned())
                .await
                .ok();
        }
        for name in [
            "idx_booking_customer_status",
            "idx_booking_caregiver_status",
            "idx_booking_start_time",
            "idx_booking_created_at",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Booking::Table).to_owned())
                .await
                .ok();
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum User { Table, Role, City }

#[derive(DeriveIden)]
enum CaregiverProfile { Table, VerificationStatus, Verified }

#[derive(DeriveIden)]
enum Booking { Table, CustomerId, CaregiverId, Status, StartTime, CreatedAt }
