//! Process-local backend.
//!
//! A transaction takes the store's lock for its whole lifetime and works on a
//! private copy of the tables, which replaces the committed state on commit.
//! Transactions are therefore fully serialized, the strongest isolation the
//! other backends can offer.

mod repository;

pub use repository::{ClientMemoryRepository, ReservationMemoryRepository};

use async_trait::async_trait;
use core_types::{Client, ClientRepository, RepositoryError, Reservation, ReservationRepository};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};
use transaction::{TransactionBackend, TransactionHandler};

#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub(crate) clients: Vec<Client>,
    pub(crate) reservations: Vec<Reservation>,
}

struct MemoryTransaction {
    committed: OwnedMutexGuard<Tables>,
    working: Tables,
}

type Slot = Option<MemoryTransaction>;

#[derive(Clone)]
pub struct MemorySession {
    store: Arc<Mutex<Tables>>,
    transaction: Arc<Mutex<Slot>>,
}

impl MemorySession {
    fn new(store: Arc<Mutex<Tables>>) -> Self {
        Self {
            store,
            transaction: Arc::new(Mutex::new(None)),
        }
    }

    /// Waits for every other transaction to finish, then copies the tables.
    async fn begin(&self) {
        let mut slot = self.transaction.lock().await;
        let committed = Arc::clone(&self.store).lock_owned().await;
        let working = committed.clone();
        *slot = Some(MemoryTransaction { committed, working });
    }

    async fn commit(&self) {
        if let Some(MemoryTransaction {
            mut committed,
            working,
        }) = self.transaction.lock().await.take()
        {
            *committed = working;
        }
    }

    async fn rollback(&self) {
        self.transaction.lock().await.take();
    }

    async fn is_active(&self) -> bool {
        self.transaction.lock().await.is_some()
    }

    async fn lock(&self) -> MutexGuard<'_, Slot> {
        self.transaction.lock().await
    }
}

fn tables(slot: &Slot) -> Result<&Tables, RepositoryError> {
    slot.as_ref()
        .map(|transaction| &transaction.working)
        .ok_or(RepositoryError::NoActiveTransaction)
}

fn tables_mut(slot: &mut Slot) -> Result<&mut Tables, RepositoryError> {
    slot.as_mut()
        .map(|transaction| &mut transaction.working)
        .ok_or(RepositoryError::NoActiveTransaction)
}

pub struct MemoryTransactionHandler {
    session: MemorySession,
}

#[async_trait]
impl TransactionHandler for MemoryTransactionHandler {
    type Session = MemorySession;

    async fn start_transaction(&mut self) -> Result<(), RepositoryError> {
        if !self.session.is_active().await {
            self.session.begin().await;
        }
        Ok(())
    }

    async fn commit_transaction(&mut self) -> Result<(), RepositoryError> {
        self.session.commit().await;
        Ok(())
    }

    async fn rollback_transaction(&mut self) -> Result<(), RepositoryError> {
        self.session.rollback().await;
        Ok(())
    }

    async fn has_active_transaction(&self) -> bool {
        self.session.is_active().await
    }

    fn session(&self) -> &MemorySession {
        &self.session
    }
}

/// An in-memory store; clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    store: Arc<Mutex<Tables>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed clients, in insertion order.
    pub async fn clients(&self) -> Vec<Client> {
        self.store.lock().await.clients.clone()
    }

    /// The committed reservations, in insertion order.
    pub async fn reservations(&self) -> Vec<Reservation> {
        self.store.lock().await.reservations.clone()
    }
}

#[async_trait]
impl TransactionBackend for MemoryBackend {
    type Handler = MemoryTransactionHandler;

    async fn open_handler(&self) -> Result<Self::Handler, RepositoryError> {
        Ok(MemoryTransactionHandler {
            session: MemorySession::new(Arc::clone(&self.store)),
        })
    }

    fn client_repository(&self, session: &MemorySession) -> Box<dyn ClientRepository> {
        Box::new(ClientMemoryRepository::new(session.clone()))
    }

    fn reservation_repository(&self, session: &MemorySession) -> Box<dyn ReservationRepository> {
        Box::new(ReservationMemoryRepository::new(session.clone()))
    }
}
