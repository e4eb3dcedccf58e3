//! Relational backend over a sqlx `PgPool`.

mod handler;
mod repository;

pub use handler::PostgresTransactionHandler;
pub use repository::{ClientPostgresRepository, ReservationPostgresRepository};

use async_trait::async_trait;
use configuration::IsolationLevel;
use core_types::{ClientRepository, RepositoryError, ReservationRepository};
use sqlx::error::ErrorKind;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use transaction::TransactionBackend;

type Slot = Option<Transaction<'static, Postgres>>;

/// A handle on at most one open database transaction.
///
/// Clones share the same transaction, which is how every repository of a unit
/// of work ends up on the same connection.
#[derive(Clone)]
pub struct PostgresSession {
    pool: PgPool,
    transaction: Arc<Mutex<Slot>>,
}

impl PostgresSession {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            transaction: Arc::new(Mutex::new(None)),
        }
    }

    /// Checks a connection out of the pool and begins a transaction on it.
    async fn begin(&self, isolation_level: IsolationLevel) -> Result<(), RepositoryError> {
        let mut slot = self.transaction.lock().await;
        let mut transaction = self.pool.begin().await.map_err(classify)?;
        let statement = format!(
            "SET TRANSACTION ISOLATION LEVEL {}",
            isolation_level.as_sql()
        );
        sqlx::query(&statement)
            .execute(&mut *transaction)
            .await
            .map_err(classify)?;
        *slot = Some(transaction);
        Ok(())
    }

    async fn commit(&self) -> Result<(), RepositoryError> {
        if let Some(transaction) = self.transaction.lock().await.take() {
            transaction.commit().await.map_err(classify)?;
        }
        Ok(())
    }

    async fn rollback(&self) -> Result<(), RepositoryError> {
        if let Some(transaction) = self.transaction.lock().await.take() {
            transaction.rollback().await.map_err(classify)?;
        }
        Ok(())
    }

    async fn is_active(&self) -> bool {
        self.transaction.lock().await.is_some()
    }

    async fn lock(&self) -> MutexGuard<'_, Slot> {
        self.transaction.lock().await
    }
}

/// The connection of the open transaction held in `slot`.
fn connection(slot: &mut Slot) -> Result<&mut PgConnection, RepositoryError> {
    slot.as_deref_mut()
        .ok_or(RepositoryError::NoActiveTransaction)
}

/// Maps a driver error onto the repository error categories.
pub(crate) fn classify(error: sqlx::Error) -> RepositoryError {
    let category = match &error {
        sqlx::Error::Database(db_error) => database_category(
            db_error.kind(),
            db_error.code().as_deref(),
            db_error.message(),
        ),
        sqlx::Error::Encode(cause) => Some(RepositoryError::InvalidArgument(cause.to_string())),
        _ => None,
    };
    category.unwrap_or_else(|| RepositoryError::backend(error))
}

/// Category of a server-side error from its kind and SQLSTATE code.
///
/// Class `22` covers data exceptions: values the server refuses to store.
fn database_category(
    kind: ErrorKind,
    code: Option<&str>,
    message: &str,
) -> Option<RepositoryError> {
    match kind {
        ErrorKind::UniqueViolation => Some(RepositoryError::UniquenessConstraintViolation(
            message.to_string(),
        )),
        ErrorKind::NotNullViolation => Some(RepositoryError::NotNullConstraintViolation(
            message.to_string(),
        )),
        _ if code.is_some_and(|code| code.starts_with("22")) => {
            Some(RepositoryError::InvalidArgument(message.to_string()))
        }
        _ => None,
    }
}

/// The PostgreSQL store: a pool plus the isolation level transactions run at.
#[derive(Debug, Clone)]
pub struct PostgresBackend {
    pool: PgPool,
    isolation_level: IsolationLevel,
}

impl PostgresBackend {
    pub fn new(pool: PgPool, isolation_level: IsolationLevel) -> Self {
        Self {
            pool,
            isolation_level,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TransactionBackend for PostgresBackend {
    type Handler = PostgresTransactionHandler;

    async fn open_handler(&self) -> Result<Self::Handler, RepositoryError> {
        Ok(PostgresTransactionHandler::new(
            PostgresSession::new(self.pool.clone()),
            self.isolation_level,
        ))
    }

    fn client_repository(&self, session: &PostgresSession) -> Box<dyn ClientRepository> {
        Box::new(ClientPostgresRepository::new(session.clone()))
    }

    fn reservation_repository(&self, session: &PostgresSession) -> Box<dyn ReservationRepository> {
        Box::new(ReservationPostgresRepository::new(session.clone()))
    }
}
