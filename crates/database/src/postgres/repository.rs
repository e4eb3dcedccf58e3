use super::{PostgresSession, classify, connection};
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{Client, ClientRepository, RepositoryError, Reservation, ReservationRepository};
use sqlx::FromRow;
use uuid::Uuid;

// This struct represents a row fetched from the clients table.
#[derive(FromRow, Debug, Clone)]
struct ClientRow {
    id: Uuid,
    first_name: String,
    last_name: String,
}

impl TryFrom<ClientRow> for Client {
    type Error = RepositoryError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        Client::new(&row.first_name, &row.last_name)
            .map(|client| client.with_id(row.id))
            .map_err(RepositoryError::backend)
    }
}

#[derive(FromRow, Debug, Clone)]
struct ReservationRow {
    id: Uuid,
    client_id: Uuid,
    date: NaiveDate,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Reservation::new(row.client_id, row.date).with_id(row.id)
    }
}

/// Client persistence inside the session's open transaction.
#[derive(Clone)]
pub struct ClientPostgresRepository {
    session: PostgresSession,
}

impl ClientPostgresRepository {
    pub fn new(session: PostgresSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ClientRepository for ClientPostgresRepository {
    async fn find_all(&self) -> Result<Vec<Client>, RepositoryError> {
        let mut slot = self.session.lock().await;
        let rows = sqlx::query_as::<_, ClientRow>(
            "SELECT id, first_name, last_name FROM clients ORDER BY last_name, first_name",
        )
        .fetch_all(connection(&mut slot)?)
        .await
        .map_err(classify)?;

        rows.into_iter().map(Client::try_from).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, RepositoryError> {
        let mut slot = self.session.lock().await;
        sqlx::query_as::<_, ClientRow>(
            "SELECT id, first_name, last_name FROM clients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(connection(&mut slot)?)
        .await
        .map_err(classify)?
        .map(Client::try_from)
        .transpose()
    }

    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Client>, RepositoryError> {
        let mut slot = self.session.lock().await;
        sqlx::query_as::<_, ClientRow>(
            "SELECT id, first_name, last_name FROM clients WHERE first_name = $1 AND last_name = $2",
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(connection(&mut slot)?)
        .await
        .map_err(classify)?
        .map(Client::try_from)
        .transpose()
    }

    async fn save(&mut self, client: Client) -> Result<Client, RepositoryError> {
        let id = client.id().unwrap_or_else(Uuid::new_v4);
        let mut slot = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO clients (id, first_name, last_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET first_name = EXCLUDED.first_name, last_name = EXCLUDED.last_name
            "#,
        )
        .bind(id)
        .bind(client.first_name())
        .bind(client.last_name())
        .execute(connection(&mut slot)?)
        .await
        .map_err(classify)?;

        tracing::debug!(%id, "Client saved.");
        Ok(client.with_id(id))
    }

    async fn delete(&mut self, client: &Client) -> Result<(), RepositoryError> {
        let id = client
            .id()
            .ok_or_else(|| RepositoryError::InvalidArgument(format!("{client} has no id")))?;
        let mut slot = self.session.lock().await;
        sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(connection(&mut slot)?)
            .await
            .map_err(classify)?;
        Ok(())
    }
}

/// Reservation persistence inside the session's open transaction.
#[derive(Clone)]
pub struct ReservationPostgresRepository {
    session: PostgresSession,
}

impl ReservationPostgresRepository {
    pub fn new(session: PostgresSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ReservationRepository for ReservationPostgresRepository {
    async fn find_all(&self) -> Result<Vec<Reservation>, RepositoryError> {
        let mut slot = self.session.lock().await;
        let rows = sqlx::query_as::<_, ReservationRow>(
            "SELECT id, client_id, date FROM reservations ORDER BY date",
        )
        .fetch_all(connection(&mut slot)?)
        .await
        .map_err(classify)?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, RepositoryError> {
        let mut slot = self.session.lock().await;
        let row = sqlx::query_as::<_, ReservationRow>(
            "SELECT id, client_id, date FROM reservations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(connection(&mut slot)?)
        .await
        .map_err(classify)?;

        Ok(row.map(Reservation::from))
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<Reservation>, RepositoryError> {
        let mut slot = self.session.lock().await;
        let row = sqlx::query_as::<_, ReservationRow>(
            "SELECT id, client_id, date FROM reservations WHERE date = $1",
        )
        .bind(date)
        .fetch_optional(connection(&mut slot)?)
        .await
        .map_err(classify)?;

        Ok(row.map(Reservation::from))
    }

    async fn find_by_client_id(&self, client_id: Uuid) -> Result<Vec<Reservation>, RepositoryError> {
        let mut slot = self.session.lock().await;
        let rows = sqlx::query_as::<_, ReservationRow>(
            "SELECT id, client_id, date FROM reservations WHERE client_id = $1 ORDER BY date",
        )
        .bind(client_id)
        .fetch_all(connection(&mut slot)?)
        .await
        .map_err(classify)?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    async fn save(&mut self, reservation: Reservation) -> Result<Reservation, RepositoryError> {
        let id = reservation.id().unwrap_or_else(Uuid::new_v4);
        let mut slot = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO reservations (id, client_id, date)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET client_id = EXCLUDED.client_id, date = EXCLUDED.date
            "#,
        )
        .bind(id)
        .bind(reservation.client_id())
        .bind(reservation.date())
        .execute(connection(&mut slot)?)
        .await
        .map_err(classify)?;

        tracing::debug!(%id, date = %reservation.date(), "Reservation saved.");
        Ok(reservation.with_id(id))
    }

    async fn delete(&mut self, reservation: &Reservation) -> Result<(), RepositoryError> {
        let id = reservation.id().ok_or_else(|| {
            RepositoryError::InvalidArgument(format!("{reservation} has no id"))
        })?;
        let mut slot = self.session.lock().await;
        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(connection(&mut slot)?)
            .await
            .map_err(classify)?;
        Ok(())
    }
}
