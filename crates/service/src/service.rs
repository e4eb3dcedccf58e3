use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{BookingError, Client, Repositories, Reservation};
use transaction::{TransactionBackend, TransactionManager};
use uuid::Uuid;

pub const CLIENT_NOT_FOUND: &str = "Client not found.";
pub const RESERVATION_NOT_FOUND: &str = "Reservation not found.";

/// Client and reservation operations with all-or-nothing semantics.
#[async_trait]
pub trait BookingService: Send + Sync {
    async fn find_all_clients(&self) -> Result<Vec<Client>, BookingError>;

    async fn find_all_reservations(&self) -> Result<Vec<Reservation>, BookingError>;

    async fn find_client(&self, id: Uuid) -> Result<Client, BookingError>;

    async fn find_reservation(&self, id: Uuid) -> Result<Reservation, BookingError>;

    async fn find_client_named(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Client, BookingError>;

    async fn find_reservation_on(&self, date: NaiveDate) -> Result<Reservation, BookingError>;

    /// Persists a client whose name is not taken yet and returns it with its id.
    async fn insert_new_client(&self, client: Client) -> Result<Client, BookingError>;

    /// Persists a reservation for an existing client on a free date.
    async fn insert_new_reservation(
        &self,
        reservation: Reservation,
    ) -> Result<Reservation, BookingError>;

    /// Deletes the client together with all of its reservations.
    async fn remove_client(&self, id: Uuid) -> Result<(), BookingError>;

    async fn remove_client_named(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), BookingError>;

    async fn remove_reservation(&self, id: Uuid) -> Result<(), BookingError>;

    async fn remove_reservation_on(&self, date: NaiveDate) -> Result<(), BookingError>;

    /// Gives the client a new name that no other client holds.
    async fn rename_client(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Client, BookingError>;

    /// Moves the reservation to a date no other reservation holds.
    async fn reschedule_reservation(
        &self,
        id: Uuid,
        date: NaiveDate,
    ) -> Result<Reservation, BookingError>;
}

/// The `BookingService` backed by a `TransactionManager`.
#[derive(Debug, Clone)]
pub struct TransactionalBookingService<B> {
    manager: TransactionManager<B>,
}

impl<B: TransactionBackend> TransactionalBookingService<B> {
    pub fn new(manager: TransactionManager<B>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &TransactionManager<B> {
        &self.manager
    }
}

fn client_not_found() -> BookingError {
    BookingError::InstanceNotFound(CLIENT_NOT_FOUND.to_string())
}

fn reservation_not_found() -> BookingError {
    BookingError::InstanceNotFound(RESERVATION_NOT_FOUND.to_string())
}

fn client_name_taken(client: &Client) -> BookingError {
    BookingError::InstanceAlreadyExists(format!(
        "A client named {} {} already exists.",
        client.first_name(),
        client.last_name()
    ))
}

fn date_taken(date: NaiveDate) -> BookingError {
    BookingError::InstanceAlreadyExists(format!("A reservation on {date} already exists."))
}

/// Deletes the client's reservations, then the client.
async fn delete_client_cascading(
    repositories: &mut Repositories,
    client: &Client,
) -> Result<(), BookingError> {
    let id = client.require_id()?;
    for reservation in repositories.reservations.find_by_client_id(id).await? {
        repositories.reservations.delete(&reservation).await?;
    }
    repositories.clients.delete(client).await?;
    Ok(())
}

#[async_trait]
impl<B: TransactionBackend> BookingService for TransactionalBookingService<B> {
    async fn find_all_clients(&self) -> Result<Vec<Client>, BookingError> {
        self.manager
            .do_in_transaction(|repositories| async move {
                Ok(repositories.clients.find_all().await?)
            })
            .await
    }

    async fn find_all_reservations(&self) -> Result<Vec<Reservation>, BookingError> {
        self.manager
            .do_in_transaction(|repositories| async move {
                Ok(repositories.reservations.find_all().await?)
            })
            .await
    }

    async fn find_client(&self, id: Uuid) -> Result<Client, BookingError> {
        self.manager
            .do_in_transaction(move |repositories| async move {
                repositories
                    .clients
                    .find_by_id(id)
                    .await?
                    .ok_or_else(client_not_found)
            })
            .await
    }

    async fn find_reservation(&self, id: Uuid) -> Result<Reservation, BookingError> {
        self.manager
            .do_in_transaction(move |repositories| async move {
                repositories
                    .reservations
                    .find_by_id(id)
                    .await?
                    .ok_or_else(reservation_not_found)
            })
            .await
    }

    async fn find_client_named(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Client, BookingError> {
        let wanted = Client::new(first_name, last_name).map_err(|_| client_not_found())?;
        self.manager
            .do_in_transaction(move |repositories| async move {
                repositories
                    .clients
                    .find_by_name(wanted.first_name(), wanted.last_name())
                    .await?
                    .ok_or_else(client_not_found)
            })
            .await
    }

    async fn find_reservation_on(&self, date: NaiveDate) -> Result<Reservation, BookingError> {
        self.manager
            .do_in_transaction(move |repositories| async move {
                repositories
                    .reservations
                    .find_by_date(date)
                    .await?
                    .ok_or_else(reservation_not_found)
            })
            .await
    }

    async fn insert_new_client(&self, client: Client) -> Result<Client, BookingError> {
        let saved = self
            .manager
            .do_in_transaction(move |mut repositories| async move {
                if repositories
                    .clients
                    .find_by_name(client.first_name(), client.last_name())
                    .await?
                    .is_some()
                {
                    return Err(client_name_taken(&client));
                }
                Ok(repositories.clients.save(client).await?)
            })
            .await?;
        tracing::info!(client = %saved, "Client inserted.");
        Ok(saved)
    }

    async fn insert_new_reservation(
        &self,
        reservation: Reservation,
    ) -> Result<Reservation, BookingError> {
        let saved = self
            .manager
            .do_in_transaction(move |mut repositories| async move {
                if repositories
                    .clients
                    .find_by_id(reservation.client_id())
                    .await?
                    .is_none()
                {
                    return Err(client_not_found());
                }
                if repositories
                    .reservations
                    .find_by_date(reservation.date())
                    .await?
                    .is_some()
                {
                    return Err(date_taken(reservation.date()));
                }
                Ok(repositories.reservations.save(reservation).await?)
            })
            .await?;
        tracing::info!(reservation = %saved, "Reservation inserted.");
        Ok(saved)
    }

    async fn remove_client(&self, id: Uuid) -> Result<(), BookingError> {
        self.manager
            .do_in_transaction(move |mut repositories| async move {
                let client = repositories
                    .clients
                    .find_by_id(id)
                    .await?
                    .ok_or_else(client_not_found)?;
                delete_client_cascading(&mut repositories, &client).await
            })
            .await?;
        tracing::info!(%id, "Client removed.");
        Ok(())
    }

    async fn remove_client_named(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), BookingError> {
        let wanted = Client::new(first_name, last_name).map_err(|_| client_not_found())?;
        self.manager
            .do_in_transaction(move |mut repositories| async move {
                let client = repositories
                    .clients
                    .find_by_name(wanted.first_name(), wanted.last_name())
                    .await?
                    .ok_or_else(client_not_found)?;
                delete_client_cascading(&mut repositories, &client).await
            })
            .await
    }

    async fn remove_reservation(&self, id: Uuid) -> Result<(), BookingError> {
        self.manager
            .do_in_transaction(move |mut repositories| async move {
                let reservation = repositories
                    .reservations
                    .find_by_id(id)
                    .await?
                    .ok_or_else(reservation_not_found)?;
                Ok(repositories.reservations.delete(&reservation).await?)
            })
            .await
    }

    async fn remove_reservation_on(&self, date: NaiveDate) -> Result<(), BookingError> {
        self.manager
            .do_in_transaction(move |mut repositories| async move {
                let reservation = repositories
                    .reservations
                    .find_by_date(date)
                    .await?
                    .ok_or_else(reservation_not_found)?;
                Ok(repositories.reservations.delete(&reservation).await?)
            })
            .await
    }

    async fn rename_client(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Client, BookingError> {
        let renamed = Client::new(first_name, last_name)?.with_id(id);
        let saved = self
            .manager
            .do_in_transaction(move |mut repositories| async move {
                if repositories.clients.find_by_id(id).await?.is_none() {
                    return Err(client_not_found());
                }
                let holder = repositories
                    .clients
                    .find_by_name(renamed.first_name(), renamed.last_name())
                    .await?;
                if holder.is_some_and(|holder| holder.id() != Some(id)) {
                    return Err(client_name_taken(&renamed));
                }
                Ok(repositories.clients.save(renamed).await?)
            })
            .await?;
        tracing::info!(%id, client = %saved, "Client renamed.");
        Ok(saved)
    }

    async fn reschedule_reservation(
        &self,
        id: Uuid,
        date: NaiveDate,
    ) -> Result<Reservation, BookingError> {
        let saved = self
            .manager
            .do_in_transaction(move |mut repositories| async move {
                let reservation = repositories
                    .reservations
                    .find_by_id(id)
                    .await?
                    .ok_or_else(reservation_not_found)?;
                let holder = repositories.reservations.find_by_date(date).await?;
                if holder.is_some_and(|holder| holder.id() != Some(id)) {
                    return Err(date_taken(date));
                }
                Ok(repositories
                    .reservations
                    .save(reservation.rescheduled(date))
                    .await?)
            })
            .await?;
        tracing::info!(%id, reservation = %saved, "Reservation rescheduled.");
        Ok(saved)
    }
}
