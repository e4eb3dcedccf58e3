use super::{MemorySession, tables, tables_mut};
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{Client, ClientRepository, RepositoryError, Reservation, ReservationRepository};
use uuid::Uuid;

#[derive(Clone)]
pub struct ClientMemoryRepository {
    session: MemorySession,
}

impl ClientMemoryRepository {
    pub fn new(session: MemorySession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ClientRepository for ClientMemoryRepository {
    async fn find_all(&self) -> Result<Vec<Client>, RepositoryError> {
        let slot = self.session.lock().await;
        Ok(tables(&slot)?.clients.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, RepositoryError> {
        let slot = self.session.lock().await;
        Ok(tables(&slot)?
            .clients
            .iter()
            .find(|client| client.id() == Some(id))
            .cloned())
    }

    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Client>, RepositoryError> {
        let slot = self.session.lock().await;
        Ok(tables(&slot)?
            .clients
            .iter()
            .find(|client| client.first_name() == first_name && client.last_name() == last_name)
            .cloned())
    }

    async fn save(&mut self, client: Client) -> Result<Client, RepositoryError> {
        let id = client.id().unwrap_or_else(Uuid::new_v4);
        let client = client.with_id(id);
        let mut slot = self.session.lock().await;
        let clients = &mut tables_mut(&mut slot)?.clients;

        if clients
            .iter()
            .any(|other| other == &client && other.id() != Some(id))
        {
            return Err(RepositoryError::UniquenessConstraintViolation(format!(
                "clients (first_name, last_name) already contains {client}"
            )));
        }
        match clients.iter_mut().find(|other| other.id() == Some(id)) {
            Some(existing) => *existing = client.clone(),
            None => clients.push(client.clone()),
        }
        Ok(client)
    }

    async fn delete(&mut self, client: &Client) -> Result<(), RepositoryError> {
        let id = client
            .id()
            .ok_or_else(|| RepositoryError::InvalidArgument(format!("{client} has no id")))?;
        let mut slot = self.session.lock().await;
        tables_mut(&mut slot)?
            .clients
            .retain(|other| other.id() != Some(id));
        Ok(())
    }
}

#[derive(Clone)]
pub struct ReservationMemoryRepository {
    session: MemorySession,
}

impl ReservationMemoryRepository {
    pub fn new(session: MemorySession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ReservationRepository for ReservationMemoryRepository {
    async fn find_all(&self) -> Result<Vec<Reservation>, RepositoryError> {
        let slot = self.session.lock().await;
        Ok(tables(&slot)?.reservations.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, RepositoryError> {
        let slot = self.session.lock().await;
        Ok(tables(&slot)?
            .reservations
            .iter()
            .find(|reservation| reservation.id() == Some(id))
            .cloned())
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<Reservation>, RepositoryError> {
        let slot = self.session.lock().await;
        Ok(tables(&slot)?
            .reservations
            .iter()
            .find(|reservation| reservation.date() == date)
            .cloned())
    }

    async fn find_by_client_id(&self, client_id: Uuid) -> Result<Vec<Reservation>, RepositoryError> {
        let slot = self.session.lock().await;
        Ok(tables(&slot)?
            .reservations
            .iter()
            .filter(|reservation| reservation.client_id() == client_id)
            .cloned()
            .collect())
    }

    async fn save(&mut self, reservation: Reservation) -> Result<Reservation, RepositoryError> {
        let id = reservation.id().unwrap_or_else(Uuid::new_v4);
        let reservation = reservation.with_id(id);
        let mut slot = self.session.lock().await;
        let reservations = &mut tables_mut(&mut slot)?.reservations;

        if reservations
            .iter()
            .any(|other| other.date() == reservation.date() && other.id() != Some(id))
        {
            return Err(RepositoryError::UniquenessConstraintViolation(format!(
                "reservations (date) already contains {}",
                reservation.date()
            )));
        }
        match reservations.iter_mut().find(|other| other.id() == Some(id)) {
            Some(existing) => *existing = reservation.clone(),
            None => reservations.push(reservation.clone()),
        }
        Ok(reservation)
    }

    async fn delete(&mut self, reservation: &Reservation) -> Result<(), RepositoryError> {
        let id = reservation.id().ok_or_else(|| {
            RepositoryError::InvalidArgument(format!("{reservation} has no id"))
        })?;
        let mut slot = self.session.lock().await;
        tables_mut(&mut slot)?
            .reservations
            .retain(|other| other.id() != Some(id));
        Ok(())
    }
}
