use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use models::booking;

use super::domain::CaregiverSummary;
use super::errors::BookingError;

/// Row to insert; the service computes the price and fixes the initial
/// status to `requested`.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub customer_id: Uuid,
    pub caregiver_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub price_cents: i64,
    pub address: String,
    pub notes: Option<String>,
}

/// Which side of the booking a listing is scoped to.
#[derive(Debug, Clone, Copy)]
pub enum OwnerFilter {
    Customer(Uuid),
    CaregiverProfile(Uuid),
}

/// Repository abstraction for booking persistence.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn caregiver_summary(&self, profile_id: Uuid) -> Result<Option<CaregiverSummary>, BookingError>;
    async fn caregiver_summary_by_user(&self, user_id: Uuid) -> Result<Option<CaregiverSummary>, BookingError>;

    async fn insert(&self, new: NewBooking) -> Result<booking::Model, BookingError>;
    async fn find(&self, id: Uuid) -> Result<Option<booking::Model>, BookingError>;
    async fn save(&self, model: booking::Model) -> Result<booking::Model, BookingError>;
    /// Returns one page (newest first) and the total row count for the filter.
    async fn list_page(
        &self,
        owner: OwnerFilter,
        page_idx: u64,
        per_page: u64,
    ) -> Result<(Vec<booking::Model>, u64), BookingError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use models::booking::BookingStatus;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockBookingRepository {
        caregivers: Mutex<HashMap<Uuid, CaregiverSummary>>,
        bookings: Mutex<HashMap<Uuid, booking::Model>>,
        counter: Mutex<i64>,
    }

    impl MockBookingRepository {
        pub fn add_caregiver(&self, summary: CaregiverSummary) {
            self.caregivers.lock().unwrap().insert(summary.profile_id, summary);
        }

        pub fn with_caregiver(summary: CaregiverSummary) -> Self {
            let repo = Self::default();
            repo.add_caregiver(summary);
            repo
        }
    }

    #[async_trait]
    impl BookingRepository for MockBookingRepository {
        async fn caregiver_summary(&self, profile_id: Uuid) -> Result<Option<CaregiverSummary>, BookingError> {
            Ok(self.caregivers.lock().unwrap().get(&profile_id).copied())
        }

        async fn caregiver_summary_by_user(&self, user_id: Uuid) -> Result<Option<CaregiverSummary>, BookingError> {
            Ok(self
                .caregivers
                .lock()
                .unwrap()
                .values()
                .find(|s| s.owner_user_id == user_id)
                .copied())
        }

        async fn insert(&self, new: NewBooking) -> Result<booking::Model, BookingError> {
            // Monotonic creation times so newest-first ordering is stable
            let mut counter = self.counter.lock().unwrap();
            *counter += 1;
            let created = Utc::now() + chrono::Duration::milliseconds(*counter);
            let model = booking::Model {
                id: Uuid::new_v4(),
                customer_id: new.customer_id,
                caregiver_id: Some(new.caregiver_id),
                start_time: new.start_time.into(),
                end_time: new.end_time.map(Into::into),
                status: BookingStatus::Requested,
                price_cents: new.price_cents,
                address: new.address,
                notes: new.notes,
                created_at: created.into(),
                updated_at: created.into(),
            };
            self.bookings.lock().unwrap().insert(model.id, model.clone());
            Ok(model)
        }

        async fn find(&self, id: Uuid) -> Result<Option<booking::Model>, BookingError> {
            Ok(self.bookings.lock().unwrap().get(&id).cloned())
        }

        async fn save(&self, model: booking::Model) -> Result<booking::Model, BookingError> {
            let mut bookings = self.bookings.lock().unwrap();
            if !bookings.contains_key(&model.id) {
                return Err(BookingError::NotFound("booking"));
            }
            bookings.insert(model.id, model.clone());
            Ok(model)
        }

        async fn list_page(
            &self,
            owner: OwnerFilter,
            page_idx: u64,
            per_page: u64,
        ) -> Result<(Vec<booking::Model>, u64), BookingError> {
            let bookings = self.bookings.lock().unwrap();
            let mut rows: Vec<booking::Model> = bookings
                .values()
                .filter(|b| match owner {
                    OwnerFilter::Customer(id) => b.customer_id == id,
                    OwnerFilter::CaregiverProfile(id) => b.caregiver_id == Some(id),
                })
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let total = rows.len() as u64;
            let start = (page_idx * per_page) as usize;
            let page = rows.into_iter().skip(start).take(per_page as usize).collect();
            Ok((page, total))
        }
    }
}
