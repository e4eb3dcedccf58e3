//! # Booking Presenter Crate
//!
//! Sits between an operator-facing view and the `BookingService`: it validates
//! raw input, runs the operation and tells the view what happened, turning
//! service failures into messages an operator can act on.

pub mod presenter;
pub mod view;

pub use presenter::BookingPresenter;
pub use view::BookingView;
