//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod auth;
pub mod booking;
pub mod user_service;
pub mod caregiver_service;
pub mod admin_service;
#[cfg(test)]
pub mod test_support;
