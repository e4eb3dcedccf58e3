//! Runs against a MongoDB replica set named by `MONGODB_URI`:
//! `MONGODB_URI=mongodb://localhost:27017/?replicaSet=rs0 cargo test -p database -- --ignored`

use chrono::NaiveDate;
use configuration::MongoSettings;
use core_types::{BookingError, Client, Reservation, TransactionFailure};
use database::MongoBackend;
use transaction::{TransactionBackend, TransactionHandler, TransactionManager};

async fn manager() -> TransactionManager<MongoBackend> {
    let settings = MongoSettings {
        uri: std::env::var("MONGODB_URI").expect("MONGODB_URI must be set"),
        database: format!("booking_test_{}", uuid::Uuid::new_v4().simple()),
    };
    TransactionManager::new(MongoBackend::connect(&settings).await.unwrap())
}

async fn drop_database(manager: &TransactionManager<MongoBackend>) {
    manager.backend().database().drop(None).await.unwrap();
}

#[tokio::test]
#[ignore = "needs a MongoDB replica set"]
async fn committed_documents_are_visible_to_later_transactions() {
    let manager = manager().await;

    let saved = manager
        .do_in_transaction(|mut repositories| async move {
            Ok(repositories
                .clients
                .save(Client::new("Mario", "Rossi")?)
                .await?)
        })
        .await
        .unwrap();

    let found = manager
        .do_in_transaction(move |repositories| async move {
            Ok(repositories.clients.find_by_name("Mario", "Rossi").await?)
        })
        .await
        .unwrap();

    assert_eq!(found.and_then(|client| client.id()), saved.id());
    drop_database(&manager).await;
}

#[tokio::test]
#[ignore = "needs a MongoDB replica set"]
async fn duplicate_dates_abort_the_whole_transaction() {
    let manager = manager().await;
    let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

    let error = manager
        .do_in_transaction(move |mut repositories| async move {
            let client = repositories
                .clients
                .save(Client::new("Mario", "Rossi")?)
                .await?;
            let owner = client.require_id()?;
            repositories
                .reservations
                .save(Reservation::new(owner, date))
                .await?;
            repositories
                .reservations
                .save(Reservation::new(owner, date))
                .await?;
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        BookingError::Transaction(TransactionFailure::UniquenessConstraint)
    ));
    let clients = manager
        .do_in_transaction(|repositories| async move { Ok(repositories.clients.find_all().await?) })
        .await
        .unwrap();
    assert!(clients.is_empty());
    drop_database(&manager).await;
}

#[tokio::test]
#[ignore = "needs a MongoDB replica set"]
async fn a_second_start_keeps_the_open_transaction() {
    let manager = manager().await;
    let backend = manager.backend();
    let mut handler = backend.open_handler().await.unwrap();

    handler.start_transaction().await.unwrap();
    let mut clients = backend.client_repository(handler.session());
    clients.save(Client::new("Mario", "Rossi").unwrap()).await.unwrap();

    handler.start_transaction().await.unwrap();
    assert!(handler.has_active_transaction().await);
    assert_eq!(clients.find_all().await.unwrap().len(), 1);

    handler.rollback_transaction().await.unwrap();
    assert!(!handler.has_active_transaction().await);
    handler.commit_transaction().await.unwrap();
    handler.rollback_transaction().await.unwrap();

    let stored = manager
        .do_in_transaction(|repositories| async move { Ok(repositories.clients.find_all().await?) })
        .await
        .unwrap();
    assert!(stored.is_empty());
    drop_database(&manager).await;
}
