use crate::handler::TransactionHandler;
use async_trait::async_trait;
use core_types::{ClientRepository, RepositoryError, ReservationRepository};

/// One persistence store: where sessions come from and how repositories bind to them.
#[async_trait]
pub trait TransactionBackend: Send + Sync {
    type Handler: TransactionHandler;

    /// Opens a fresh session and wraps it in its transaction handler.
    async fn open_handler(&self) -> Result<Self::Handler, RepositoryError>;

    /// Creates a client repository bound to `session`.
    fn client_repository(
        &self,
        session: &<Self::Handler as TransactionHandler>::Session,
    ) -> Box<dyn ClientRepository>;

    /// Creates a reservation repository bound to `session`.
    fn reservation_repository(
        &self,
        session: &<Self::Handler as TransactionHandler>::Session,
    ) -> Box<dyn ReservationRepository>;
}
