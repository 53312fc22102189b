mod availability;
mod catalog;
mod conflict;
mod error;
mod localtime;
mod mutations;
mod queries;

pub use error::EngineError;
pub use localtime::to_absolute_instant;

use std::sync::Arc;

use chrono_tz::Tz;

use crate::model::Ms;
use crate::store::Store;

/// Engine configuration. The zone is the institution's local zone; slot
/// times are wall-clock in that zone and every stored instant is UTC.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub zone: Tz,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zone: chrono_tz::America::Caracas,
        }
    }
}

impl EngineConfig {
    /// Read the zone from `RESERVA_TZ` (IANA name). Falls back to the
    /// default zone when unset or unparseable.
    pub fn from_env() -> Self {
        match std::env::var("RESERVA_TZ") {
            Ok(name) => match name.parse::<Tz>() {
                Ok(zone) => Self { zone },
                Err(_) => {
                    tracing::warn!("RESERVA_TZ `{name}` is not an IANA zone, using default");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

/// The reservation engine. Owns no durable state; every operation is a
/// short-lived sequence of round-trips to the external store.
pub struct ReservationEngine {
    store: Arc<dyn Store>,
    zone: Tz,
}

impl ReservationEngine {
    pub fn new(store: Arc<dyn Store>, config: EngineConfig) -> Self {
        Self {
            store,
            zone: config.zone,
        }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }
}

pub(crate) fn now_ms() -> Ms {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_millis() as Ms
}
