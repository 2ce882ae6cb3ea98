use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::booking::BookingStatus;
use models::user::Role;

use super::errors::BookingError;

/// Input for creating a booking. The customer comes from the authenticated
/// request, never from the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingInput {
    pub customer_id: Uuid,
    pub caregiver_id: Uuid,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Patch applied by update/transition requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookingInput {
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Identity acting on a booking.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool { self.role == Role::Admin }
}

/// The slice of a caregiver profile the booking workflow needs.
#[derive(Debug, Clone, Copy)]
pub struct CaregiverSummary {
    pub profile_id: Uuid,
    pub owner_user_id: Uuid,
    pub verified: bool,
    /// Missing hourly rate counts as zero when quoting.
    pub hourly_rate_cents: i32,
}

/// Price is hourly rate times duration in hours, rounded to whole cents.
/// Duration defaults to one hour when no end time is given.
pub fn quote_price_cents(
    hourly_rate_cents: i32,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> i64 {
    let duration_hours = match end {
        Some(e) => (e - start).num_seconds() as f64 / 3600.0,
        None => 1.0,
    };
    (hourly_rate_cents as f64 * duration_hours).round() as i64
}

pub fn validate_window(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Result<(), BookingError> {
    if let Some(e) = end {
        if e <= start {
            return Err(BookingError::Validation("end time must be after start time".into()));
        }
    }
    Ok(())
}

pub fn validate_address(address: &str) -> Result<(), BookingError> {
    let len = address.trim().chars().count();
    if len < 10 {
        return Err(BookingError::Validation("address must be at least 10 characters".into()));
    }
    if len > 500 {
        return Err(BookingError::Validation("address cannot exceed 500 characters".into()));
    }
    Ok(())
}

pub fn validate_notes(notes: &str) -> Result<(), BookingError> {
    if notes.chars().count() > 500 {
        return Err(BookingError::Validation("notes cannot exceed 500 characters".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn price_defaults_to_one_hour() {
        assert_eq!(quote_price_cents(2500, at(9), None), 2500);
    }

    #[test]
    fn price_scales_with_duration() {
        assert_eq!(quote_price_cents(2500, at(9), Some(at(12))), 7500);
    }

    #[test]
    fn price_rounds_fractional_hours() {
        // 90 minutes at 25.00/h = 37.50
        let end = at(9) + chrono::Duration::minutes(90);
        assert_eq!(quote_price_cents(2500, at(9), Some(end)), 3750);
        // 100 minutes at 9.99/h = 16.65
        let end = at(9) + chrono::Duration::minutes(100);
        assert_eq!(quote_price_cents(999, at(9), Some(end)), 1665);
    }

    #[test]
    fn zero_rate_quotes_zero() {
        assert_eq!(quote_price_cents(0, at(9), Some(at(17))), 0);
    }

    #[test]
    fn window_must_move_forward() {
        assert!(validate_window(at(9), None).is_ok());
        assert!(validate_window(at(9), Some(at(10))).is_ok());
        assert!(validate_window(at(9), Some(at(9))).is_err());
        assert!(validate_window(at(9), Some(at(8))).is_err());
    }

    #[test]
    fn address_bounds() {
        assert!(validate_address("too short").is_err());
        assert!(validate_address("221B Baker Street, London").is_ok());
        assert!(validate_address(&"x".repeat(501)).is_err());
    }
}
