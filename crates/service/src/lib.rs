//! # Booking Service Crate
//!
//! The business operations on clients and reservations. Each operation is a
//! single unit of work handed to the `TransactionManager`, so its checks and
//! writes commit or roll back together, whichever backend is configured.

pub mod service;

pub use service::{BookingService, TransactionalBookingService};
