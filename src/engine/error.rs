//! Error types for seat allocation.

use thiserror::Error;

use crate::model::Pnr;

/// Top-level error returned by [`Engine::apply`](super::Engine::apply).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("booking failed: {0}")]
    Book(#[from] BookError),

    #[error("cancellation failed: {0}")]
    Cancel(#[from] CancelError),
}

/// Error during booking.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("invalid station '{0}'")]
    InvalidStation(String),

    #[error("origin and destination are both '{0}'")]
    SameStation(String),

    #[error("a booking needs at least one passenger")]
    NoPassengers,

    #[error("not enough seats and waitlist is full: requested {requested}, available {available}")]
    CapacityExhausted { requested: u32, available: u32 },

    #[error("no PNR left to issue")]
    PnrExhausted,
}

/// Error during cancellation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CancelError {
    #[error("no confirmed booking with PNR {0}")]
    PnrNotFound(Pnr),
}
