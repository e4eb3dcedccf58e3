//! Document backend over the official MongoDB driver.
//!
//! Multi-document transactions need a replica set or sharded cluster; a
//! standalone server rejects `start_transaction`.

mod document;
mod handler;
mod repository;

pub use handler::MongoTransactionHandler;
pub use repository::{ClientMongoRepository, ReservationMongoRepository};

use crate::error::DbError;
use async_trait::async_trait;
use configuration::MongoSettings;
use core_types::{ClientRepository, RepositoryError, ReservationRepository};
use document::{ClientDocument, ReservationDocument};
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{
    Acknowledgment, IndexOptions, ReadConcern, TransactionOptions, WriteConcern,
};
use mongodb::{ClientSession, Database, IndexModel};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use transaction::TransactionBackend;

pub const CLIENT_COLLECTION: &str = "clients";
pub const RESERVATION_COLLECTION: &str = "reservations";

const DUPLICATE_KEY: i32 = 11000;

pub(crate) struct SessionState {
    pub(crate) handle: ClientSession,
    in_transaction: bool,
}

/// A cloneable handle on one driver `ClientSession`.
#[derive(Clone)]
pub struct MongoSession {
    database: Database,
    state: Arc<Mutex<SessionState>>,
}

impl MongoSession {
    pub async fn open(client: &mongodb::Client, database: Database) -> Result<Self, RepositoryError> {
        let handle = client.start_session(None).await.map_err(classify)?;
        Ok(Self {
            database,
            state: Arc::new(Mutex::new(SessionState {
                handle,
                in_transaction: false,
            })),
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    async fn start_transaction(
        &self,
        options: Option<TransactionOptions>,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        state.handle.start_transaction(options).await.map_err(classify)?;
        state.in_transaction = true;
        Ok(())
    }

    async fn commit_transaction(&self) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        if !state.in_transaction {
            return Ok(());
        }
        state.in_transaction = false;
        state.handle.commit_transaction().await.map_err(classify)
    }

    async fn abort_transaction(&self) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        if !state.in_transaction {
            return Ok(());
        }
        state.in_transaction = false;
        state.handle.abort_transaction().await.map_err(classify)
    }

    async fn in_transaction(&self) -> bool {
        self.state.lock().await.in_transaction
    }

    /// Locks the session for one driver call; fails outside a transaction.
    pub(crate) async fn lock_active(&self) -> Result<MutexGuard<'_, SessionState>, RepositoryError> {
        let state = self.state.lock().await;
        if state.in_transaction {
            Ok(state)
        } else {
            Err(RepositoryError::NoActiveTransaction)
        }
    }
}

/// Maps a driver error onto the repository error categories.
pub(crate) fn classify(error: mongodb::error::Error) -> RepositoryError {
    let category = match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY =>
        {
            Some(RepositoryError::UniquenessConstraintViolation(
                write_error.message.clone(),
            ))
        }
        ErrorKind::Command(command_error) if command_error.code == DUPLICATE_KEY => Some(
            RepositoryError::UniquenessConstraintViolation(command_error.message.clone()),
        ),
        ErrorKind::InvalidArgument { message, .. } => {
            Some(RepositoryError::InvalidArgument(message.clone()))
        }
        _ => None,
    };
    category.unwrap_or_else(|| RepositoryError::backend(error))
}

/// Snapshot reads and majority writes, so a committed transaction is durable
/// and a transaction never sees a half-applied concurrent one.
pub fn default_transaction_options() -> TransactionOptions {
    TransactionOptions::builder()
        .read_concern(ReadConcern::snapshot())
        .write_concern(WriteConcern::builder().w(Acknowledgment::Majority).build())
        .build()
}

/// The MongoDB store: a client, the booking database and the options every
/// transaction is started with.
#[derive(Clone)]
pub struct MongoBackend {
    client: mongodb::Client,
    database: Database,
    transaction_options: Option<TransactionOptions>,
}

impl MongoBackend {
    /// Connects and makes sure the unique indexes backing the booking rules exist.
    pub async fn connect(settings: &MongoSettings) -> Result<Self, DbError> {
        let client = mongodb::Client::with_uri_str(&settings.uri).await?;
        let database = client.database(&settings.database);
        ensure_indexes(&database).await?;

        tracing::info!(database = %settings.database, "Connected to MongoDB.");
        Ok(Self {
            client,
            database,
            transaction_options: Some(default_transaction_options()),
        })
    }

    /// Replaces the options passed to every `start_transaction`; `None` uses
    /// the driver defaults.
    pub fn with_transaction_options(mut self, options: Option<TransactionOptions>) -> Self {
        self.transaction_options = options;
        self
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

async fn ensure_indexes(database: &Database) -> Result<(), DbError> {
    let unique = || IndexOptions::builder().unique(true).build();

    database
        .collection::<ClientDocument>(CLIENT_COLLECTION)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "firstName": 1, "lastName": 1 })
                .options(unique())
                .build(),
            None,
        )
        .await?;
    database
        .collection::<ReservationDocument>(RESERVATION_COLLECTION)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "date": 1 })
                .options(unique())
                .build(),
            None,
        )
        .await?;
    Ok(())
}

#[async_trait]
impl TransactionBackend for MongoBackend {
    type Handler = MongoTransactionHandler;

    async fn open_handler(&self) -> Result<Self::Handler, RepositoryError> {
        let session = MongoSession::open(&self.client, self.database.clone()).await?;
        Ok(MongoTransactionHandler::new(
            session,
            self.transaction_options.clone(),
        ))
    }

    fn client_repository(&self, session: &MongoSession) -> Box<dyn ClientRepository> {
        Box::new(ClientMongoRepository::new(session.clone()))
    }

    fn reservation_repository(&self, session: &MongoSession) -> Box<dyn ReservationRepository> {
        Box::new(ReservationMongoRepository::new(session.clone()))
    }
}
