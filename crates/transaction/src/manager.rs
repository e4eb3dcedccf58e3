use crate::backend::TransactionBackend;
use crate::handler::TransactionHandler;
use core_types::{BookingError, Repositories, RepositoryError, TransactionFailure};
use std::future::Future;

/// Runs units of work atomically against one backend.
///
/// Every call of `do_in_transaction` opens its own session, so no transaction
/// state is ever shared between concurrent callers.
#[derive(Debug, Clone)]
pub struct TransactionManager<B> {
    backend: B,
}

impl<B: TransactionBackend> TransactionManager<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Executes `code` inside a single transaction.
    ///
    /// The repositories handed to `code` are bound to a fresh session. On
    /// success the transaction is committed and the value returned. On failure
    /// the transaction is rolled back first, then constraint and argument
    /// violations are translated into `BookingError::Transaction`; any other
    /// error is returned unchanged.
    pub async fn do_in_transaction<T, F, Fut>(&self, code: F) -> Result<T, BookingError>
    where
        F: FnOnce(Repositories) -> Fut + Send,
        Fut: Future<Output = Result<T, BookingError>> + Send,
        T: Send,
    {
        let mut handler = self
            .backend
            .open_handler()
            .await
            .map_err(|e| classify(e.into()))?;

        let repositories = Repositories::new(
            self.backend.client_repository(handler.session()),
            self.backend.reservation_repository(handler.session()),
        );

        handler
            .start_transaction()
            .await
            .map_err(|e| classify(e.into()))?;
        tracing::trace!("Transaction started.");

        let outcome = match code(repositories).await {
            Ok(value) => handler
                .commit_transaction()
                .await
                .map(|()| value)
                .map_err(BookingError::from),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(value) => {
                tracing::trace!("Transaction committed.");
                Ok(value)
            }
            Err(error) => {
                roll_back(&mut handler, &error).await;
                Err(classify(error))
            }
        }
    }
}

/// Rolls back without letting a rollback failure replace the original error.
async fn roll_back<H: TransactionHandler>(handler: &mut H, cause: &BookingError) {
    tracing::debug!(cause = %cause, "Unit of work failed, rolling back.");
    if let Err(rollback_error) = handler.rollback_transaction().await {
        tracing::error!(
            error = %rollback_error,
            cause = %cause,
            "Rollback failed; reporting the original error."
        );
    }
}

fn classify(error: BookingError) -> BookingError {
    let failure = match &error {
        BookingError::Repository(RepositoryError::UniquenessConstraintViolation(_)) => {
            Some(TransactionFailure::UniquenessConstraint)
        }
        BookingError::Repository(RepositoryError::NotNullConstraintViolation(_)) => {
            Some(TransactionFailure::NotNullConstraint)
        }
        BookingError::Repository(RepositoryError::InvalidArgument(_)) => {
            Some(TransactionFailure::InvalidArgument)
        }
        _ => None,
    };

    match failure {
        Some(failure) => {
            tracing::warn!(cause = %error, "{}", failure);
            BookingError::Transaction(failure)
        }
        None => error,
    }
}
