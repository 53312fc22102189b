//! Reservation engine for shared classroom hardware: projectors, laptop
//! computers, and power extensions booked against calendar dates and named
//! schedule slots. Persistence lives behind the [`store::Store`] trait;
//! identity is resolved by a [`session::IdentityProvider`] and passed into
//! each operation explicitly.

pub mod engine;
pub mod model;
pub mod observability;
pub mod session;
pub mod store;

pub use engine::{EngineConfig, EngineError, ReservationEngine};
