use ulid::Ulid;

use crate::model::{MineFilter, Reservation, ReservationState, Span};
use crate::store::{Predicate, Row, StoreError, Value, ident_value};

use super::{EngineError, ReservationEngine, now_ms};

pub(super) const RESERVATION_COLUMNS: &[&str] = &[
    "id",
    "owner_id",
    "equipment_id",
    "computer_id",
    "extension_id",
    "division_id",
    "room",
    "start_instant",
    "end_instant",
    "state",
];

pub(super) fn decode_reservation(row: &Row) -> Result<Reservation, EngineError> {
    let code = row.integer("state")?;
    let state = ReservationState::from_code(code)
        .ok_or_else(|| StoreError::Malformed(format!("unknown reservation state code {code}")))?;
    let start = row.integer("start_instant")?;
    let end = row.integer("end_instant")?;
    if end <= start {
        return Err(StoreError::Malformed(format!(
            "reservation interval [{start}, {end}) is empty"
        ))
        .into());
    }
    Ok(Reservation {
        id: row.ident("id")?,
        owner: row.ident("owner_id")?,
        projector: row.opt_ident("equipment_id")?,
        computer: row.opt_ident("computer_id")?,
        extension: row.opt_ident("extension_id")?,
        division: row.opt_ident("division_id")?,
        room: row.opt_text("room")?,
        span: Span::new(start, end),
        state,
    })
}

impl ReservationEngine {
    /// Reservations owned by `requester`, ordered by start ascending.
    /// `only_future` keeps rows whose end is still ahead of now; a range
    /// keeps rows intersecting the half-open window.
    pub async fn list_mine(
        &self,
        requester: Ulid,
        filter: &MineFilter,
    ) -> Result<Vec<Reservation>, EngineError> {
        let mut predicates = vec![Predicate::Eq("owner_id", ident_value(requester))];
        if filter.only_future {
            predicates.push(Predicate::Gte("end_instant", Value::from(now_ms())));
        }
        if let Some(range) = filter.range {
            predicates.push(Predicate::Lt("start_instant", Value::from(range.end)));
            predicates.push(Predicate::Gt("end_instant", Value::from(range.start)));
        }

        let rows = self
            .store
            .select("reservations", RESERVATION_COLUMNS, &predicates)
            .await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(decode_reservation(row)?);
        }
        out.sort_by_key(|r| r.span.start);
        Ok(out)
    }
}
