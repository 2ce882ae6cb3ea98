//! Booking lifecycle module: three-layer architecture (domain, repository,
//! service). Owns the one finite state machine in the system.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::BookingService;
