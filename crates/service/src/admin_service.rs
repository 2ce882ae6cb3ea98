use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Iterable, PaginatorTrait, QueryFilter, QueryOrder};
use serde::Serialize;

use models::booking::{self, BookingStatus};
use models::caregiver_profile::{self, VerificationStatus};
use models::user;

use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};

#[derive(Debug, Clone, Serialize)]
pub struct BookingStatusCount {
    pub status: BookingStatus,
    pub count: u64,
}

/// Dashboard counters for the admin panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminReport {
    pub total_users: u64,
    pub active_users: u64,
    pub total_caregivers: u64,
    pub pending_verifications: u64,
    pub bookings_by_status: Vec<BookingStatusCount>,
}

/// Aggregate platform counts. One count query per bucket; fine at the
/// scale of an admin dashboard.
pub async fn report(db: &DatabaseConnection) -> Result<AdminReport, ServiceError> {
    let total_users = user::Entity::find()
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let active_users = user::Entity::find()
        .filter(user::Column::IsActive.eq(true))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let total_caregivers = caregiver_profile::Entity::find()
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let pending_verifications = caregiver_profile::Entity::find()
        .filter(caregiver_profile::Column::VerificationStatus.eq(VerificationStatus::Pending))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut bookings_by_status = Vec::new();
    for status in BookingStatus::iter() {
        let count = booking::Entity::find()
            .filter(booking::Column::Status.eq(status))
            .count(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        bookings_by_status.push(BookingStatusCount { status, count });
    }

    Ok(AdminReport {
        total_users,
        active_users,
        total_caregivers,
        pending_verifications,
        bookings_by_status,
    })
}

/// Caregiver profiles awaiting review, oldest submissions first.
pub async fn pending_verifications(
    db: &DatabaseConnection,
    opts: Pagination,
) -> Result<Page<caregiver_profile::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let paginator = caregiver_profile::Entity::find()
        .filter(caregiver_profile::Column::VerificationStatus.eq(VerificationStatus::Pending))
        .order_by_asc(caregiver_profile::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(Page::new(items, opts, total))
}
