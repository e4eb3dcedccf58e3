// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    BackendKind, Config, DatabaseSettings, IsolationLevel, Level, LoggerSettings, MongoSettings,
    PostgresSettings,
};
pub use telemetry::init_tracing;

/// Prefix of the environment variables that override file values,
/// e.g. `BOOKING__DATABASE__BACKEND=mongo`.
pub const ENV_PREFIX: &str = "BOOKING";

/// Loads the application configuration from `path` (extension optional).
///
/// Environment variables prefixed with `BOOKING__` override the file, using
/// `__` between nested keys. Call `validate` once any command-line overrides
/// have been applied.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    Ok(config)
}

/// Checks that the settings of the selected backend are usable.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let database = &config.database;
    match database.backend {
        BackendKind::Postgres => {
            if database.postgres.url.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "database.postgres.url must be set for the postgres backend".to_string(),
                ));
            }
            if database.postgres.max_connections == 0 {
                return Err(ConfigError::ValidationError(
                    "database.postgres.max_connections must be at least 1".to_string(),
                ));
            }
        }
        BackendKind::Mongo => {
            if database.mongo.uri.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "database.mongo.uri must be set for the mongo backend".to_string(),
                ));
            }
            if database.mongo.database.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "database.mongo.database must not be empty".to_string(),
                ));
            }
        }
        BackendKind::Memory => {}
    }
    Ok(())
}
