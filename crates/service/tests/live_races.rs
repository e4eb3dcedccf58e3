//! Ten callers racing on one natural key against a real store, where the
//! unique constraint or index is the last line of defence.
//!
//! `DATABASE_URL=postgres://... MONGODB_URI=mongodb://...?replicaSet=rs0 \
//!     cargo test -p service --test live_races -- --ignored`

use configuration::{IsolationLevel, MongoSettings, PostgresSettings};
use core_types::{BookingError, Client, TransactionFailure};
use database::{MongoBackend, PostgresBackend, connect, run_migrations};
use futures::future::join_all;
use service::{BookingService, TransactionalBookingService};
use std::sync::Arc;
use transaction::{TransactionBackend, TransactionManager};

const CALLERS: usize = 10;

const FIRST_NAMES: [&str; CALLERS] = [
    "Anna", "Bruno", "Carla", "Dario", "Elena", "Fabio", "Gina", "Ivo", "Luca", "Nora",
];

async fn postgres_service() -> Arc<TransactionalBookingService<PostgresBackend>> {
    let settings = PostgresSettings {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
        max_connections: CALLERS as u32,
        ..PostgresSettings::default()
    };
    let pool = connect(&settings).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let backend = PostgresBackend::new(pool, IsolationLevel::Serializable);
    sqlx::query("TRUNCATE clients, reservations")
        .execute(backend.pool())
        .await
        .unwrap();
    Arc::new(TransactionalBookingService::new(TransactionManager::new(
        backend,
    )))
}

async fn mongo_service() -> Arc<TransactionalBookingService<MongoBackend>> {
    let settings = MongoSettings {
        uri: std::env::var("MONGODB_URI").expect("MONGODB_URI must be set"),
        database: format!("booking_race_{}", uuid::Uuid::new_v4().simple()),
    };
    let backend = MongoBackend::connect(&settings).await.unwrap();
    Arc::new(TransactionalBookingService::new(TransactionManager::new(
        backend,
    )))
}

async fn drop_mongo_database(service: &TransactionalBookingService<MongoBackend>) {
    service
        .manager()
        .backend()
        .database()
        .drop(None)
        .await
        .unwrap();
}

/// One caller wins; every other one is told its request lost.
fn assert_single_winner<T>(outcomes: &[Result<T, BookingError>]) {
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    for error in outcomes.iter().filter_map(|outcome| outcome.as_ref().err()) {
        assert!(
            matches!(
                error,
                BookingError::InstanceAlreadyExists(_)
                    | BookingError::Transaction(TransactionFailure::UniquenessConstraint)
                    | BookingError::Repository(_)
            ),
            "unexpected error: {error:?}"
        );
    }
}

async fn assert_stored_once<B: TransactionBackend>(
    service: &TransactionalBookingService<B>,
    target: &Client,
) {
    let clients = service.find_all_clients().await.unwrap();
    assert_eq!(clients.iter().filter(|client| *client == target).count(), 1);
}

async fn race_inserts<B: TransactionBackend + 'static>(
    service: Arc<TransactionalBookingService<B>>,
) {
    let tasks = (0..CALLERS).map(|_| {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .insert_new_client(Client::new("Mario", "Rossi")?)
                .await
        })
    });
    let outcomes: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_single_winner(&outcomes);
    assert_stored_once(&service, &Client::new("Mario", "Rossi").unwrap()).await;
}

async fn race_renames<B: TransactionBackend + 'static>(
    service: Arc<TransactionalBookingService<B>>,
) {
    let mut ids = Vec::new();
    for first_name in FIRST_NAMES {
        let saved = service
            .insert_new_client(Client::new(first_name, "Verdi").unwrap())
            .await
            .unwrap();
        ids.push(saved.id().unwrap());
    }

    let tasks = ids.into_iter().map(|id| {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.rename_client(id, "Mario", "Rossi").await })
    });
    let outcomes: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_single_winner(&outcomes);
    assert_stored_once(&service, &Client::new("Mario", "Rossi").unwrap()).await;
    assert_eq!(service.find_all_clients().await.unwrap().len(), CALLERS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "needs a PostgreSQL server"]
async fn postgres_concurrent_inserts_of_one_client_succeed_once() {
    race_inserts(postgres_service().await).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "needs a PostgreSQL server"]
async fn postgres_concurrent_renames_to_one_name_apply_once() {
    race_renames(postgres_service().await).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "needs a MongoDB replica set"]
async fn mongo_concurrent_inserts_of_one_client_succeed_once() {
    let service = mongo_service().await;
    race_inserts(Arc::clone(&service)).await;
    drop_mongo_database(&service).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "needs a MongoDB replica set"]
async fn mongo_concurrent_renames_to_one_name_apply_once() {
    let service = mongo_service().await;
    race_renames(Arc::clone(&service)).await;
    drop_mongo_database(&service).await;
}
