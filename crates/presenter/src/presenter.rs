use crate::view::BookingView;
use core_types::{BookingError, Client, Reservation, parse_date};
use service::BookingService;
use std::sync::Arc;

/// Runs operator requests against the service and reports back to the view.
///
/// Whenever an operation loses a race (its target vanished or its natural key
/// was taken meanwhile) both lists are reloaded, so the view stops showing
/// stale rows.
pub struct BookingPresenter<S, V> {
    service: Arc<S>,
    view: Arc<V>,
}

impl<S, V> Clone for BookingPresenter<S, V> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            view: Arc::clone(&self.view),
        }
    }
}

impl<S: BookingService, V: BookingView> BookingPresenter<S, V> {
    pub fn new(service: Arc<S>, view: Arc<V>) -> Self {
        Self { service, view }
    }

    pub async fn all_clients(&self) {
        match self.service.find_all_clients().await {
            Ok(clients) => self.view.show_all_clients(&clients),
            Err(error) => self.unexpected(&error, "Something went wrong while updating clients."),
        }
    }

    pub async fn all_reservations(&self) {
        match self.service.find_all_reservations().await {
            Ok(reservations) => self.view.show_all_reservations(&reservations),
            Err(error) => self.unexpected(
                &error,
                "Something went wrong while updating reservations.",
            ),
        }
    }

    pub async fn add_client(&self, first_name: &str, last_name: &str) {
        let client = match Client::new(first_name, last_name) {
            Ok(client) => client,
            Err(error) => return self.view.show_form_error(&error.to_string()),
        };

        match self.service.insert_new_client(client.clone()).await {
            Ok(saved) => self.view.client_added(&saved),
            Err(BookingError::InstanceAlreadyExists(_)) => {
                self.lost_race(&format!(
                    "A client named {} {} has already been made.",
                    client.first_name(),
                    client.last_name()
                ))
                .await
            }
            Err(error) => {
                self.unexpected(&error, &format!("Something went wrong while adding {client}."))
            }
        }
    }

    pub async fn add_reservation(&self, client: &Client, date: &str) {
        let (client_id, date) = match (client.require_id(), parse_date(date)) {
            (Ok(client_id), Ok(date)) => (client_id, date),
            (Err(error), _) | (_, Err(error)) => {
                return self.view.show_form_error(&error.to_string());
            }
        };
        let reservation = Reservation::new(client_id, date);

        match self.service.insert_new_reservation(reservation.clone()).await {
            Ok(saved) => self.view.reservation_added(&saved),
            Err(BookingError::InstanceNotFound(_)) => {
                self.lost_race(&format!("{client} has been deleted by another user."))
                    .await
            }
            Err(BookingError::InstanceAlreadyExists(_)) => {
                self.lost_race(&format!("A reservation on {date} has already been made."))
                    .await
            }
            Err(error) => self.unexpected(
                &error,
                &format!("Something went wrong while adding {reservation}."),
            ),
        }
    }

    pub async fn delete_client(&self, client: &Client) {
        let id = match client.require_id() {
            Ok(id) => id,
            Err(error) => return self.view.show_form_error(&error.to_string()),
        };

        match self.service.remove_client(id).await {
            Ok(()) => self.view.client_removed(client),
            Err(BookingError::InstanceNotFound(_)) => {
                self.lost_race(&format!("{client} has already been deleted."))
                    .await
            }
            Err(error) => {
                self.unexpected(&error, &format!("Something went wrong while deleting {client}."))
            }
        }
    }

    pub async fn delete_reservation(&self, reservation: &Reservation) {
        let id = match reservation.require_id() {
            Ok(id) => id,
            Err(error) => return self.view.show_form_error(&error.to_string()),
        };

        match self.service.remove_reservation(id).await {
            Ok(()) => self.view.reservation_removed(reservation),
            Err(BookingError::InstanceNotFound(_)) => {
                self.lost_race(&format!("{reservation} has already been deleted."))
                    .await
            }
            Err(error) => self.unexpected(
                &error,
                &format!("Something went wrong while deleting {reservation}."),
            ),
        }
    }

    pub async fn rename_client(&self, client: &Client, first_name: &str, last_name: &str) {
        let (id, renamed) = match (client.require_id(), Client::new(first_name, last_name)) {
            (Ok(id), Ok(renamed)) => (id, renamed),
            (Err(error), _) | (_, Err(error)) => {
                return self.view.show_form_error(&error.to_string());
            }
        };

        match self
            .service
            .rename_client(id, renamed.first_name(), renamed.last_name())
            .await
        {
            Ok(saved) => self.view.client_renamed(client, &saved),
            Err(BookingError::InstanceNotFound(_)) => {
                self.lost_race(&format!("{client} has been deleted by another user."))
                    .await
            }
            Err(BookingError::InstanceAlreadyExists(_)) => {
                self.lost_race(&format!(
                    "A client named {} {} already exists.",
                    renamed.first_name(),
                    renamed.last_name()
                ))
                .await
            }
            Err(error) => {
                self.unexpected(&error, &format!("Something went wrong while renaming {client}."))
            }
        }
    }

    pub async fn reschedule_reservation(&self, reservation: &Reservation, date: &str) {
        let (id, date) = match (reservation.require_id(), parse_date(date)) {
            (Ok(id), Ok(date)) => (id, date),
            (Err(error), _) | (_, Err(error)) => {
                return self.view.show_form_error(&error.to_string());
            }
        };

        match self.service.reschedule_reservation(id, date).await {
            Ok(saved) => self.view.reservation_rescheduled(reservation, &saved),
            Err(BookingError::InstanceNotFound(_)) => {
                self.lost_race(&format!("{reservation} has been deleted by another user."))
                    .await
            }
            Err(BookingError::InstanceAlreadyExists(_)) => {
                self.lost_race(&format!("A reservation on {date} already exists."))
                    .await
            }
            Err(error) => self.unexpected(
                &error,
                &format!("Something went wrong while rescheduling {reservation}."),
            ),
        }
    }

    async fn lost_race(&self, message: &str) {
        self.view.show_operation_error(message);
        self.all_clients().await;
        self.all_reservations().await;
    }

    fn unexpected(&self, error: &BookingError, message: &str) {
        tracing::error!(%error, "{}", message);
        self.view.show_operation_error(message);
    }
}
