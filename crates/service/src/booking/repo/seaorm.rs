use chrono::Utc;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use models::booking::{self, BookingStatus};
use models::caregiver_profile;

use crate::booking::domain::CaregiverSummary;
use crate::booking::errors::BookingError;
use crate::booking::repository::{BookingRepository, NewBooking, OwnerFilter};

fn to_summary(p: caregiver_profile::Model) -> CaregiverSummary {
    CaregiverSummary {
        profile_id: p.id,
        owner_user_id: p.user_id,
        verified: p.verified,
        hourly_rate_cents: p.hourly_rate_cents.unwrap_or(0),
    }
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmBookingRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn caregiver_summary(&self, profile_id: Uuid) -> Result<Option<CaregiverSummary>, BookingError> {
        let res = caregiver_profile::Entity::find_by_id(profile_id)
            .one(&self.db)
            .await
            .map_err(|e| BookingError::Repository(e.to_string()))?;
        Ok(res.map(to_summary))
    }

    async fn caregiver_summary_by_user(&self, user_id: Uuid) -> Result<Option<CaregiverSummary>, BookingError> {
        let res = caregiver_profile::find_by_user(&self.db, user_id)
            .await
            .map_err(|e| BookingError::Repository(e.to_string()))?;
        Ok(res.map(to_summary))
    }

    async fn insert(&self, new: NewBooking) -> Result<booking::Model, BookingError> {
        let now = Utc::now().into();
        let am = booking::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(new.customer_id),
            caregiver_id: Set(Some(new.caregiver_id)),
            start_time: Set(new.start_time.into()),
            end_time: Set(new.end_time.map(Into::into)),
            status: Set(BookingStatus::Requested),
            price_cents: Set(new.price_cents),
            address: Set(new.address),
            notes: Set(new.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };
        am.insert(&self.db).await.map_err(|e| BookingError::Repository(e.to_string()))
    }

    async fn find(&self, id: Uuid) -> Result<Option<booking::Model>, BookingError> {
        booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| BookingError::Repository(e.to_string()))
    }

    async fn save(&self, m: booking::Model) -> Result<booking::Model, BookingError> {
        // Write every mutable column; the service already merged the patch.
        let am = booking::ActiveModel {
            id: Unchanged(m.id),
            customer_id: Set(m.customer_id),
            caregiver_id: Set(m.caregiver_id),
            start_time: Set(m.start_time),
            end_time: Set(m.end_time),
            status: Set(m.status),
            price_cents: Set(m.price_cents),
            address: Set(m.address),
            notes: Set(m.notes),
            created_at: Set(m.created_at),
            updated_at: Set(m.updated_at),
        };
        am.update(&self.db).await.map_err(|e| BookingError::Repository(e.to_string()))
    }

    async fn list_page(
        &self,
        owner: OwnerFilter,
        page_idx: u64,
        per_page: u64,
    ) -> Result<(Vec<booking::Model>, u64), BookingError> {
        let query = match owner {
            OwnerFilter::Customer(id) => booking::Entity::find().filter(booking::Column::CustomerId.eq(id)),
            OwnerFilter::CaregiverProfile(id) => booking::Entity::find().filter(booking::Column::CaregiverId.eq(id)),
        };
        let paginator = query
            .order_by_desc(booking::Column::CreatedAt)
            .paginate(&self.db, per_page);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| BookingError::Repository(e.to_string()))?;
        let items = paginator
            .fetch_page(page_idx)
            .await
            .map_err(|e| BookingError::Repository(e.to_string()))?;
        Ok((items, total))
    }
}
