use thiserror::Error;

/// Raised while constructing an entity from operator input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Client needs a non-empty {0}.")]
    EmptyName(&'static str),

    #[error("Client's {0} must contain only alphabet letters.")]
    NotAlphabetic(&'static str),

    #[error("Date '{0}' must be in the format YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("{0} has no identifier; it must be persisted first.")]
    MissingId(String),
}

/// Failures reported by a repository or by the session it is bound to.
///
/// The first three variants are the ones the transaction manager knows how to
/// classify; everything else is carried opaquely in `Backend`.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Uniqueness constraint violated: {0}")]
    UniquenessConstraintViolation(String),

    #[error("Not-null constraint violated: {0}")]
    NotNullConstraintViolation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No transaction is active on this session.")]
    NoActiveTransaction,

    #[error("Persistence backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps any driver error that has no dedicated category.
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RepositoryError::Backend(Box::new(error))
    }
}

/// The categories a failed transaction is translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionFailure {
    UniquenessConstraint,
    NotNullConstraint,
    InvalidArgument,
}

impl std::fmt::Display for TransactionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            TransactionFailure::UniquenessConstraint => {
                "Transaction fails due to violation of uniqueness constraint(s)."
            }
            TransactionFailure::NotNullConstraint => {
                "Transaction fails due to violation of not-null constraint(s)."
            }
            TransactionFailure::InvalidArgument => {
                "Transaction fails due to invalid argument(s) passed."
            }
        };
        f.write_str(message)
    }
}

/// The error surface of every booking operation.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error(transparent)]
    InvalidInput(#[from] ModelError),

    #[error("{0}")]
    InstanceNotFound(String),

    #[error("{0}")]
    InstanceAlreadyExists(String),

    #[error("{0}")]
    Transaction(TransactionFailure),

    /// An unclassified persistence failure, passed through verbatim.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
