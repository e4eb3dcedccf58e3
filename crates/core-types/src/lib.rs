//! # Booking Core Types
//!
//! The vocabulary shared by every other crate in the workspace: the two entity
//! models, the repository capabilities the backends implement, and the error
//! taxonomy that flows from the repositories up to the presenter.
//!
//! ## Public API
//!
//! - `Client`, `Reservation`: value objects validated at construction.
//! - `ClientRepository`, `ReservationRepository`, `Repositories`: the persistence
//!   capabilities a unit of work is handed inside a transaction.
//! - `ModelError`, `RepositoryError`, `TransactionFailure`, `BookingError`.

pub mod client;
pub mod error;
pub mod repository;
pub mod reservation;

// Re-export the core types to provide a clean public API.
pub use client::Client;
pub use error::{BookingError, ModelError, RepositoryError, TransactionFailure};
pub use repository::{ClientRepository, Repositories, ReservationRepository};
pub use reservation::{Reservation, parse_date};
