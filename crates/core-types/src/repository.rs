//! Persistence capabilities, one per entity type.
//!
//! Every backend implements both traits over its own session type. Instances
//! are created by the backend's repository factories, bound to the session of
//! the transaction they run in, and handed to a unit of work as `Repositories`.

use crate::error::RepositoryError;
use crate::{Client, Reservation};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Client>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, RepositoryError>;

    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Client>, RepositoryError>;

    /// Inserts the client when it has no id (assigning one) or updates it otherwise.
    ///
    /// Fails with `UniquenessConstraintViolation` when another client already
    /// holds the same name.
    async fn save(&mut self, client: Client) -> Result<Client, RepositoryError>;

    /// Removes the client; a client that is already gone is not an error.
    async fn delete(&mut self, client: &Client) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Reservation>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, RepositoryError>;

    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<Reservation>, RepositoryError>;

    async fn find_by_client_id(&self, client_id: Uuid) -> Result<Vec<Reservation>, RepositoryError>;

    /// Inserts the reservation when it has no id (assigning one) or updates it otherwise.
    ///
    /// Fails with `UniquenessConstraintViolation` when another reservation is
    /// already booked on the same date.
    async fn save(&mut self, reservation: Reservation) -> Result<Reservation, RepositoryError>;

    /// Removes the reservation; one that is already gone is not an error.
    async fn delete(&mut self, reservation: &Reservation) -> Result<(), RepositoryError>;
}

/// The repositories of a single transaction, all bound to the same session.
pub struct Repositories {
    pub clients: Box<dyn ClientRepository>,
    pub reservations: Box<dyn ReservationRepository>,
}

impl Repositories {
    pub fn new(
        clients: Box<dyn ClientRepository>,
        reservations: Box<dyn ReservationRepository>,
    ) -> Self {
        Self {
            clients,
            reservations,
        }
    }
}
