//! # Booking Transaction Crate
//!
//! Lets the same business logic run against either persistence backend with
//! the same atomicity guarantees.
//!
//! ## Architectural Principles
//!
//! - **Uniform handler:** `TransactionHandler` wraps one backend session behind
//!   start/commit/rollback/has-active-transaction, whatever the session type.
//! - **Backend as a value:** `TransactionBackend` is the session provider plus
//!   the repository factories of one store. The manager is generic over it, so
//!   the backend is chosen when the manager is constructed.
//! - **Single translation point:** `TransactionManager` is the only place where
//!   persistence failures become `BookingError::Transaction` categories.
//!
//! ## Public API
//!
//! - `TransactionHandler`, `TransactionBackend`: the seams each backend implements.
//! - `TransactionManager`: runs a unit of work inside one transaction.

pub mod backend;
pub mod handler;
pub mod manager;

pub use backend::TransactionBackend;
pub use handler::TransactionHandler;
pub use manager::TransactionManager;
