use ulid::Ulid;

use crate::model::Ms;
use crate::store::StoreError;

#[derive(Debug)]
pub enum EngineError {
    NotFound { entity: &'static str, id: Ulid },
    InvalidRange { start: Ms, end: Ms },
    /// Carries the ids of the blocking reservations that collided.
    ResourceConflict(Vec<Ulid>),
    Forbidden(Ulid),
    AlreadyFinalized(Ulid),
    Unauthenticated,
    /// The requested wall-clock time does not exist in the configured zone.
    InvalidLocalTime(String),
    StoreUnavailable(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            EngineError::InvalidRange { start, end } => {
                write!(f, "invalid range: end {end} must be after start {start}")
            }
            EngineError::ResourceConflict(ids) => {
                write!(f, "resource conflict with reservations: {ids:?}")
            }
            EngineError::Forbidden(id) => {
                write!(f, "reservation {id} belongs to another user")
            }
            EngineError::AlreadyFinalized(id) => {
                write!(f, "reservation {id} already ended and cannot be cancelled")
            }
            EngineError::Unauthenticated => write!(f, "no authenticated user"),
            EngineError::InvalidLocalTime(msg) => write!(f, "invalid local time: {msg}"),
            EngineError::StoreUnavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        EngineError::StoreUnavailable(err.to_string())
    }
}
