use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use models::booking::{self, BookingStatus};
use models::user::Role;

use crate::pagination::{Page, Pagination};

use super::domain::{quote_price_cents, validate_address, validate_notes, validate_window, Actor, CreateBookingInput, UpdateBookingInput};
use super::errors::BookingError;
use super::repository::{BookingRepository, NewBooking, OwnerFilter};

/// Booking lifecycle service independent of the web framework.
///
/// Reads and writes a single booking row per call; concurrent transition
/// requests on the same booking are not arbitrated (last write wins).
pub struct BookingService<R: BookingRepository> {
    repo: Arc<R>,
}

impl<R: BookingRepository> BookingService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a booking in the `requested` state.
    ///
    /// The referenced caregiver must exist and be verified. The quoted
    /// price is hourly rate times duration, one hour when open-ended.
    #[instrument(skip(self, input), fields(customer_id = %input.customer_id, caregiver_id = %input.caregiver_id))]
    pub async fn create(&self, input: CreateBookingInput) -> Result<booking::Model, BookingError> {
        validate_address(&input.address)?;
        if let Some(notes) = &input.notes {
            validate_notes(notes)?;
        }
        validate_window(input.start_time, input.end_time)?;

        let caregiver = self.repo
            .caregiver_summary(input.caregiver_id)
            .await?
            .ok_or(BookingError::NotFound("caregiver"))?;
        if !caregiver.verified {
            return Err(BookingError::Validation("caregiver is not verified".into()));
        }

        let price_cents = quote_price_cents(caregiver.hourly_rate_cents, input.start_time, input.end_time);
        let created = self.repo
            .insert(NewBooking {
                customer_id: input.customer_id,
                caregiver_id: caregiver.profile_id,
                start_time: input.start_time,
                end_time: input.end_time,
                price_cents,
                address: input.address.trim().to_string(),
                notes: input.notes,
            })
            .await?;
        info!(booking_id = %created.id, price_cents, "booking_created");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<booking::Model, BookingError> {
        self.repo.find(id).await?.ok_or(BookingError::NotFound("booking"))
    }

    /// Apply a patch, enforcing actor authorization and the transition table.
    ///
    /// Permitted actors: the booking's customer, the assigned caregiver,
    /// or an admin. A requested status must be directly reachable from the
    /// current one; the lifecycle never regresses.
    #[instrument(skip(self, input), fields(booking_id = %id, actor_id = %actor.user_id))]
    pub async fn update(
        &self,
        id: Uuid,
        actor: Actor,
        input: UpdateBookingInput,
    ) -> Result<booking::Model, BookingError> {
        let mut booking = self.get(id).await?;
        self.authorize(&booking, &actor).await?;

        if let Some(target) = input.status {
            if !booking.status.can_transition_to(target) {
                return Err(BookingError::InvalidTransition { from: booking.status, to: target });
            }
            booking.status = target;
        }
        if let Some(end) = input.end_time {
            if end <= booking.start_time.with_timezone(&Utc) {
                return Err(BookingError::Validation("end time must be after start time".into()));
            }
            booking.end_time = Some(end.into());
        }
        if let Some(notes) = input.notes {
            validate_notes(&notes)?;
            booking.notes = Some(notes);
        }
        booking.updated_at = Utc::now().into();

        let saved = self.repo.save(booking).await?;
        info!(booking_id = %saved.id, status = saved.status.as_str(), "booking_updated");
        Ok(saved)
    }

    /// Customer-only shortcut to the cancelled state.
    #[instrument(skip(self), fields(booking_id = %id, actor_id = %actor.user_id))]
    pub async fn cancel(&self, id: Uuid, actor: Actor) -> Result<booking::Model, BookingError> {
        let mut booking = self.get(id).await?;
        if booking.customer_id != actor.user_id {
            return Err(BookingError::Forbidden("only the customer can cancel this booking".into()));
        }
        if booking.status.is_terminal() {
            return Err(BookingError::Validation(
                "cannot cancel a completed or already cancelled booking".into(),
            ));
        }
        booking.status = BookingStatus::Cancelled;
        booking.updated_at = Utc::now().into();
        let saved = self.repo.save(booking).await?;
        info!(booking_id = %saved.id, "booking_cancelled");
        Ok(saved)
    }

    /// Paginated newest-first listing scoped to the caller: customers see
    /// their own bookings, caregivers the ones assigned to their profile.
    pub async fn list_for_actor(
        &self,
        actor: Actor,
        opts: Pagination,
    ) -> Result<Page<booking::Model>, BookingError> {
        let owner = match actor.role {
            Role::Caregiver => {
                let summary = self.repo
                    .caregiver_summary_by_user(actor.user_id)
                    .await?
                    .ok_or(BookingError::NotFound("caregiver profile"))?;
                OwnerFilter::CaregiverProfile(summary.profile_id)
            }
            _ => OwnerFilter::Customer(actor.user_id),
        };
        let (page_idx, per_page) = opts.normalize();
        let (items, total) = self.repo.list_page(owner, page_idx, per_page).await?;
        Ok(Page::new(items, opts, total))
    }

    async fn authorize(&self, booking: &booking::Model, actor: &Actor) -> Result<(), BookingError> {
        if actor.is_admin() || booking.customer_id == actor.user_id {
            return Ok(());
        }
        if let Some(profile_id) = booking.caregiver_id {
            if let Some(summary) = self.repo.caregiver_summary(profile_id).await? {
                if summary.owner_user_id == actor.user_id {
                    return Ok(());
                }
            }
        }
        Err(BookingError::Forbidden("not authorized to update this booking".into()))
    }
}
