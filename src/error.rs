use crate::manager::PlanIssue;
use crate::time::Instant;
use thiserror::Error;

/// Validation failures surfaced to the caller. All recoverable; the
/// operation that raised one has made no state change.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("city '{0}' not found")]
    CityNotFound(String),
    #[error("plane '{0}' not found")]
    PlaneNotFound(String),
    #[error("plane model '{0}' not found")]
    ModelNotFound(String),
    #[error("{registration} seats {capacity} passengers, {requested} requested")]
    CapacityExceeded {
        registration: String,
        requested: u32,
        capacity: u32,
    },
    #[error("route is {distance:.0} km but {registration} has a range of {range:.0} km")]
    RangeExceeded {
        registration: String,
        distance: f64,
        range: f64,
    },
    #[error("no hub in {0}")]
    HubMissing(String),
    #[error("'{model}' costs {price:.2} but the balance is {balance:.2}")]
    InsufficientFunds {
        model: String,
        price: f64,
        balance: f64,
    },
    #[error("{registration} still has {flights} scheduled flight(s)")]
    AssetInUse {
        registration: String,
        flights: usize,
    },
    #[error("{registration} already has a departure at {start}")]
    DuplicateDeparture {
        registration: String,
        start: Instant,
    },
    #[error("flight plan has {} issue(s); fix them before advancing the week", .0.len())]
    PlanInvalid(Vec<PlanIssue>),
}
