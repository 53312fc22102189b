use chrono::offset::LocalResult;
use chrono::{NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use ulid::Ulid;

use crate::model::{Ms, ScheduleSlot, Span};
use crate::store::Predicate;
use crate::store::ident_value;

use super::catalog::decode_slot;
use super::{EngineError, ReservationEngine};

/// Compose a calendar date and a wall-clock time in `zone` into a UTC
/// instant, using the zone's actual offset at that date. Ambiguous local
/// times (clock rolled back) take the earliest instant; nonexistent ones
/// (clock jumped forward) fail.
pub fn to_absolute_instant(date: NaiveDate, time: NaiveTime, zone: Tz) -> Result<Ms, EngineError> {
    let local = date.and_time(time);
    match zone.from_local_datetime(&local) {
        LocalResult::Single(instant) => Ok(instant.timestamp_millis()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp_millis()),
        LocalResult::None => Err(EngineError::InvalidLocalTime(format!(
            "{local} does not exist in {zone}"
        ))),
    }
}

impl ReservationEngine {
    /// Look up a schedule slot by id.
    pub async fn resolve_slot(&self, slot_id: Ulid) -> Result<ScheduleSlot, EngineError> {
        let rows = self
            .store
            .select(
                "schedule_slots",
                super::catalog::SLOT_COLUMNS,
                &[Predicate::Eq("id", ident_value(slot_id))],
            )
            .await?;
        let row = rows.first().ok_or(EngineError::NotFound {
            entity: "schedule slot",
            id: slot_id,
        })?;
        Ok(decode_slot(row)?)
    }

    /// Resolve two slot ids against `date` into a half-open UTC interval.
    pub(super) async fn resolve_span(
        &self,
        date: NaiveDate,
        start_slot: Ulid,
        end_slot: Ulid,
    ) -> Result<Span, EngineError> {
        let start = self.resolve_slot(start_slot).await?;
        let end = self.resolve_slot(end_slot).await?;
        let start_ms = to_absolute_instant(date, start.time, self.zone)?;
        let end_ms = to_absolute_instant(date, end.time, self.zone)?;
        if end_ms <= start_ms {
            return Err(EngineError::InvalidRange {
                start: start_ms,
                end: end_ms,
            });
        }
        Ok(Span::new(start_ms, end_ms))
    }
}
