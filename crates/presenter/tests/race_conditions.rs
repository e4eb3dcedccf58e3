//! Ten operators issuing the same request at once: one succeeds, the other
//! nine are told why theirs did not.

mod common;

use chrono::NaiveDate;
use common::{Fixture, Presenter, fixture};
use core_types::{Client, Reservation};
use futures::future::join_all;
use service::BookingService;
use std::future::Future;

const OPERATORS: usize = 10;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, day).unwrap()
}

async fn race<F, Fut>(f: &Fixture, request: F)
where
    F: Fn(Presenter, usize) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let tasks = (0..OPERATORS).map(|index| tokio::spawn(request(f.presenter.clone(), index)));
    for joined in join_all(tasks).await {
        joined.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn adding_the_same_client() {
    let f = fixture();

    race(&f, |presenter, _| async move {
        presenter.add_client("Mario", "Rossi").await
    })
    .await;

    assert_eq!(f.backend.clients().await.len(), 1);
    let errors = f.view.operation_errors();
    assert_eq!(errors.len(), OPERATORS - 1);
    assert!(errors.iter().all(|message| {
        message == "A client named Mario Rossi has already been made."
            || message == "Something went wrong while adding Client [Mario Rossi]."
    }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn adding_a_reservation_on_the_same_date() {
    let f = fixture();
    let mario = f
        .service
        .insert_new_client(Client::new("Mario", "Rossi").unwrap())
        .await
        .unwrap();

    race(&f, move |presenter, _| {
        let mario = mario.clone();
        async move { presenter.add_reservation(&mario, "2024-08-01").await }
    })
    .await;

    assert_eq!(f.backend.reservations().await.len(), 1);
    let errors = f.view.operation_errors();
    assert_eq!(errors.len(), OPERATORS - 1);
    assert!(errors.iter().all(|message| {
        message == "A reservation on 2024-08-01 has already been made."
            || message == "Something went wrong while adding Reservation [on 2024-08-01]."
    }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn deleting_the_same_client() {
    let f = fixture();
    let mario = f
        .service
        .insert_new_client(Client::new("Mario", "Rossi").unwrap())
        .await
        .unwrap();

    race(&f, move |presenter, _| {
        let mario = mario.clone();
        async move { presenter.delete_client(&mario).await }
    })
    .await;

    assert!(f.backend.clients().await.is_empty());
    let errors = f.view.operation_errors();
    assert_eq!(errors.len(), OPERATORS - 1);
    assert!(errors.iter().all(|message| message.contains("Client [Mario Rossi]")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn deleting_the_same_reservation() {
    let f = fixture();
    let mario = f
        .service
        .insert_new_client(Client::new("Mario", "Rossi").unwrap())
        .await
        .unwrap();
    let booked = f
        .service
        .insert_new_reservation(Reservation::new(mario.id().unwrap(), date(2)))
        .await
        .unwrap();

    race(&f, move |presenter, _| {
        let booked = booked.clone();
        async move { presenter.delete_reservation(&booked).await }
    })
    .await;

    assert!(f.backend.reservations().await.is_empty());
    let errors = f.view.operation_errors();
    assert_eq!(errors.len(), OPERATORS - 1);
    assert!(errors.iter().all(|message| message.contains("Reservation [on 2024-08-02]")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn renaming_different_clients_to_the_same_name() {
    let f = fixture();
    let mut clients = Vec::new();
    for first_name in ["Anna", "Bruno", "Carla", "Dario", "Elena", "Fabio", "Gina", "Ivo", "Luca", "Nora"] {
        clients.push(
            f.service
                .insert_new_client(Client::new(first_name, "Verdi").unwrap())
                .await
                .unwrap(),
        );
    }

    race(&f, move |presenter, index| {
        let client = clients[index].clone();
        async move { presenter.rename_client(&client, "Mario", "Rossi").await }
    })
    .await;

    let target = Client::new("Mario", "Rossi").unwrap();
    let stored = f.backend.clients().await;
    assert_eq!(stored.iter().filter(|client| **client == target).count(), 1);
    assert_eq!(f.view.operation_errors().len(), OPERATORS - 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn rescheduling_different_reservations_to_the_same_date() {
    let f = fixture();
    let mario = f
        .service
        .insert_new_client(Client::new("Mario", "Rossi").unwrap())
        .await
        .unwrap();
    let mut bookings = Vec::new();
    for day in 1..=OPERATORS as u32 {
        bookings.push(
            f.service
                .insert_new_reservation(Reservation::new(mario.id().unwrap(), date(day)))
                .await
                .unwrap(),
        );
    }

    race(&f, move |presenter, index| {
        let booking = bookings[index].clone();
        async move { presenter.reschedule_reservation(&booking, "2024-08-25").await }
    })
    .await;

    let stored = f.backend.reservations().await;
    assert_eq!(
        stored.iter().filter(|reservation| reservation.date() == date(25)).count(),
        1
    );
    assert_eq!(f.view.operation_errors().len(), OPERATORS - 1);
}
