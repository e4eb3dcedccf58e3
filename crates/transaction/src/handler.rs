use async_trait::async_trait;
use core_types::RepositoryError;

/// Wraps exactly one backend session and normalises its transaction calls.
///
/// Implementations hold nothing besides the session and the backend-specific
/// options used every time a transaction is started.
#[async_trait]
pub trait TransactionHandler: Send + Sync {
    /// The session type repositories are bound to.
    type Session: Send + Sync;

    /// Begins a transaction unless one is already active.
    async fn start_transaction(&mut self) -> Result<(), RepositoryError>;

    /// Commits the active transaction; does nothing when none is active.
    async fn commit_transaction(&mut self) -> Result<(), RepositoryError>;

    /// Rolls back the active transaction; does nothing when none is active.
    async fn rollback_transaction(&mut self) -> Result<(), RepositoryError>;

    async fn has_active_transaction(&self) -> bool;

    fn session(&self) -> &Self::Session;
}
