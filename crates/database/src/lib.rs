//! # Booking Database Crate
//!
//! The persistence backends of the booking service. Each one provides a
//! session type, a `TransactionHandler` over it, and client/reservation
//! repositories bound to that session.
//!
//! ## Architectural Principles
//!
//! - **Adapter layer:** all SQL and document-store details stay in here. The
//!   rest of the application sees only `core_types` repositories and the
//!   `transaction` seams.
//! - **Session-bound repositories:** repositories never open their own
//!   transactions; they fail with `RepositoryError::NoActiveTransaction` when
//!   used outside one.
//! - **Uniqueness in the store:** client names and reservation dates are backed
//!   by unique constraints (PostgreSQL) or unique indexes (MongoDB), so races
//!   that slip past the service's checks still end in a constraint violation.
//!
//! ## Public API
//!
//! - `connect`, `run_migrations`: PostgreSQL pool setup and schema migrations.
//! - `PostgresBackend`, `MongoBackend`, `MemoryBackend`: the `TransactionBackend`s.
//! - `DbError`: failures while bringing a backend up.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod mongo;
pub mod postgres;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use memory::MemoryBackend;
pub use mongo::MongoBackend;
pub use postgres::PostgresBackend;
