use super::MongoSession;
use async_trait::async_trait;
use core_types::RepositoryError;
use mongodb::options::TransactionOptions;
use transaction::TransactionHandler;

pub struct MongoTransactionHandler {
    session: MongoSession,
    options: Option<TransactionOptions>,
}

impl MongoTransactionHandler {
    pub fn new(session: MongoSession, options: Option<TransactionOptions>) -> Self {
        Self { session, options }
    }
}

#[async_trait]
impl TransactionHandler for MongoTransactionHandler {
    type Session = MongoSession;

    async fn start_transaction(&mut self) -> Result<(), RepositoryError> {
        if !self.session.in_transaction().await {
            self.session.start_transaction(self.options.clone()).await?;
            tracing::debug!("MongoDB transaction started.");
        }
        Ok(())
    }

    async fn commit_transaction(&mut self) -> Result<(), RepositoryError> {
        self.session.commit_transaction().await
    }

    async fn rollback_transaction(&mut self) -> Result<(), RepositoryError> {
        self.session.abort_transaction().await
    }

    async fn has_active_transaction(&self) -> bool {
        self.session.in_transaction().await
    }

    fn session(&self) -> &MongoSession {
        &self.session
    }
}
