use super::PostgresSession;
use async_trait::async_trait;
use configuration::IsolationLevel;
use core_types::RepositoryError;
use transaction::TransactionHandler;

pub struct PostgresTransactionHandler {
    session: PostgresSession,
    isolation_level: IsolationLevel,
}

impl PostgresTransactionHandler {
    pub fn new(session: PostgresSession, isolation_level: IsolationLevel) -> Self {
        Self {
            session,
            isolation_level,
        }
    }
}

#[async_trait]
impl TransactionHandler for PostgresTransactionHandler {
    type Session = PostgresSession;

    async fn start_transaction(&mut self) -> Result<(), RepositoryError> {
        if !self.session.is_active().await {
            self.session.begin(self.isolation_level).await?;
            tracing::debug!(isolation_level = self.isolation_level.as_sql(), "PostgreSQL transaction started.");
        }
        Ok(())
    }

    async fn commit_transaction(&mut self) -> Result<(), RepositoryError> {
        self.session.commit().await
    }

    async fn rollback_transaction(&mut self) -> Result<(), RepositoryError> {
        self.session.rollback().await
    }

    async fn has_active_transaction(&self) -> bool {
        self.session.is_active().await
    }

    fn session(&self) -> &PostgresSession {
        &self.session
    }
}
