#![allow(dead_code)]

use core_types::{Client, Reservation};
use database::MemoryBackend;
use presenter::{BookingPresenter, BookingView};
use service::TransactionalBookingService;
use std::sync::{Arc, Mutex};
use transaction::TransactionManager;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Clients(Vec<Client>),
    Reservations(Vec<Reservation>),
    ClientAdded(Client),
    ReservationAdded(Reservation),
    ClientRemoved(Client),
    ReservationRemoved(Reservation),
    ClientRenamed(Client, Client),
    ReservationRescheduled(Reservation, Reservation),
    OperationError(String),
    FormError(String),
}

/// Records every callback in order.
#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<Event>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn operation_errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::OperationError(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl BookingView for RecordingView {
    fn show_all_clients(&self, clients: &[Client]) {
        self.record(Event::Clients(clients.to_vec()));
    }

    fn show_all_reservations(&self, reservations: &[Reservation]) {
        self.record(Event::Reservations(reservations.to_vec()));
    }

    fn client_added(&self, client: &Client) {
        self.record(Event::ClientAdded(client.clone()));
    }

    fn reservation_added(&self, reservation: &Reservation) {
        self.record(Event::ReservationAdded(reservation.clone()));
    }

    fn client_removed(&self, client: &Client) {
        self.record(Event::ClientRemoved(client.clone()));
    }

    fn reservation_removed(&self, reservation: &Reservation) {
        self.record(Event::ReservationRemoved(reservation.clone()));
    }

    fn client_renamed(&self, old: &Client, renamed: &Client) {
        self.record(Event::ClientRenamed(old.clone(), renamed.clone()));
    }

    fn reservation_rescheduled(&self, old: &Reservation, rescheduled: &Reservation) {
        self.record(Event::ReservationRescheduled(old.clone(), rescheduled.clone()));
    }

    fn show_operation_error(&self, message: &str) {
        self.record(Event::OperationError(message.to_string()));
    }

    fn show_form_error(&self, message: &str) {
        self.record(Event::FormError(message.to_string()));
    }
}

pub type Service = TransactionalBookingService<MemoryBackend>;
pub type Presenter = BookingPresenter<Service, RecordingView>;

pub struct Fixture {
    pub backend: MemoryBackend,
    pub service: Arc<Service>,
    pub view: Arc<RecordingView>,
    pub presenter: Presenter,
}

pub fn fixture() -> Fixture {
    let backend = MemoryBackend::new();
    let service = Arc::new(TransactionalBookingService::new(TransactionManager::new(
        backend.clone(),
    )));
    let view = Arc::new(RecordingView::default());
    let presenter = BookingPresenter::new(Arc::clone(&service), Arc::clone(&view));
    Fixture {
        backend,
        service,
        view,
        presenter,
    }
}
