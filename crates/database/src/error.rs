use thiserror::Error;

/// Failures while bringing a backend up; per-operation failures are
/// `core_types::RepositoryError`.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("MongoDB error: {0}")]
    MongoError(#[from] mongodb::error::Error),
}
