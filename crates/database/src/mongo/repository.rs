use super::document::{ClientDocument, ReservationDocument, format_date};
use super::{CLIENT_COLLECTION, MongoSession, RESERVATION_COLLECTION, classify};
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{Client, ClientRepository, RepositoryError, Reservation, ReservationRepository};
use mongodb::Collection;
use mongodb::bson::{Document, doc};
use mongodb::options::ReplaceOptions;
use uuid::Uuid;

/// Client persistence bound to one session's transaction.
#[derive(Clone)]
pub struct ClientMongoRepository {
    session: MongoSession,
    collection: Collection<ClientDocument>,
}

impl ClientMongoRepository {
    pub fn new(session: MongoSession) -> Self {
        let collection = session.database().collection(CLIENT_COLLECTION);
        Self {
            session,
            collection,
        }
    }

    async fn find_many(&self, filter: Option<Document>) -> Result<Vec<Client>, RepositoryError> {
        let mut state = self.session.lock_active().await?;
        let mut cursor = self
            .collection
            .find_with_session(filter, None, &mut state.handle)
            .await
            .map_err(classify)?;

        let mut clients = Vec::new();
        while let Some(document) = cursor.next(&mut state.handle).await {
            clients.push(Client::try_from(document.map_err(classify)?)?);
        }
        Ok(clients)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Client>, RepositoryError> {
        let mut state = self.session.lock_active().await?;
        self.collection
            .find_one_with_session(filter, None, &mut state.handle)
            .await
            .map_err(classify)?
            .map(Client::try_from)
            .transpose()
    }
}

#[async_trait]
impl ClientRepository for ClientMongoRepository {
    async fn find_all(&self) -> Result<Vec<Client>, RepositoryError> {
        self.find_many(None).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, RepositoryError> {
        self.find_one(doc! { "_id": id.to_string() }).await
    }

    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Client>, RepositoryError> {
        self.find_one(doc! { "firstName": first_name, "lastName": last_name })
            .await
    }

    async fn save(&mut self, client: Client) -> Result<Client, RepositoryError> {
        let id = client.id().unwrap_or_else(Uuid::new_v4);
        let document = ClientDocument::new(id, &client);
        let mut state = self.session.lock_active().await?;
        self.collection
            .replace_one_with_session(
                doc! { "_id": document.id.as_str() },
                &document,
                ReplaceOptions::builder().upsert(true).build(),
                &mut state.handle,
            )
            .await
            .map_err(classify)?;

        tracing::debug!(%id, "Client document saved.");
        Ok(client.with_id(id))
    }

    async fn delete(&mut self, client: &Client) -> Result<(), RepositoryError> {
        let id = client
            .id()
            .ok_or_else(|| RepositoryError::InvalidArgument(format!("{client} has no id")))?;
        let mut state = self.session.lock_active().await?;
        self.collection
            .delete_one_with_session(doc! { "_id": id.to_string() }, None, &mut state.handle)
            .await
            .map_err(classify)?;
        Ok(())
    }
}

/// Reservation persistence bound to one session's transaction.
#[derive(Clone)]
pub struct ReservationMongoRepository {
    session: MongoSession,
    collection: Collection<ReservationDocument>,
}

impl ReservationMongoRepository {
    pub fn new(session: MongoSession) -> Self {
        let collection = session.database().collection(RESERVATION_COLLECTION);
        Self {
            session,
            collection,
        }
    }

    async fn find_many(
        &self,
        filter: Option<Document>,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        let mut state = self.session.lock_active().await?;
        let mut cursor = self
            .collection
            .find_with_session(filter, None, &mut state.handle)
            .await
            .map_err(classify)?;

        let mut reservations = Vec::new();
        while let Some(document) = cursor.next(&mut state.handle).await {
            reservations.push(Reservation::try_from(document.map_err(classify)?)?);
        }
        Ok(reservations)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Reservation>, RepositoryError> {
        let mut state = self.session.lock_active().await?;
        self.collection
            .find_one_with_session(filter, None, &mut state.handle)
            .await
            .map_err(classify)?
            .map(Reservation::try_from)
            .transpose()
    }
}

#[async_trait]
impl ReservationRepository for ReservationMongoRepository {
    async fn find_all(&self) -> Result<Vec<Reservation>, RepositoryError> {
        self.find_many(None).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, RepositoryError> {
        self.find_one(doc! { "_id": id.to_string() }).await
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<Reservation>, RepositoryError> {
        self.find_one(doc! { "date": format_date(date) }).await
    }

    async fn find_by_client_id(&self, client_id: Uuid) -> Result<Vec<Reservation>, RepositoryError> {
        self.find_many(Some(doc! { "clientId": client_id.to_string() }))
            .await
    }

    async fn save(&mut self, reservation: Reservation) -> Result<Reservation, RepositoryError> {
        let id = reservation.id().unwrap_or_else(Uuid::new_v4);
        let document = ReservationDocument::new(id, &reservation);
        let mut state = self.session.lock_active().await?;
        self.collection
            .replace_one_with_session(
                doc! { "_id": document.id.as_str() },
                &document,
                ReplaceOptions::builder().upsert(true).build(),
                &mut state.handle,
            )
            .await
            .map_err(classify)?;

        tracing::debug!(%id, date = %document.date, "Reservation document saved.");
        Ok(reservation.with_id(id))
    }

    async fn delete(&mut self, reservation: &Reservation) -> Result<(), RepositoryError> {
        let id = reservation.id().ok_or_else(|| {
            RepositoryError::InvalidArgument(format!("{reservation} has no id"))
        })?;
        let mut state = self.session.lock_active().await?;
        self.collection
            .delete_one_with_session(doc! { "_id": id.to_string() }, None, &mut state.handle)
            .await
            .map_err(classify)?;
        Ok(())
    }
}
