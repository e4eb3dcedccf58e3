use core_types::{Client, Reservation};

/// Callbacks through which the presenter drives whatever shows the data.
pub trait BookingView: Send + Sync {
    fn show_all_clients(&self, clients: &[Client]);

    fn show_all_reservations(&self, reservations: &[Reservation]);

    fn client_added(&self, client: &Client);

    fn reservation_added(&self, reservation: &Reservation);

    fn client_removed(&self, client: &Client);

    fn reservation_removed(&self, reservation: &Reservation);

    fn client_renamed(&self, old: &Client, renamed: &Client);

    fn reservation_rescheduled(&self, old: &Reservation, rescheduled: &Reservation);

    /// An operation reached the service and failed.
    fn show_operation_error(&self, message: &str);

    /// The input was rejected before any operation ran.
    fn show_form_error(&self, message: &str);
}
