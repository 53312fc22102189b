use chrono::NaiveDate;
use ulid::Ulid;

use crate::model::{ConflictCheck, ReservationState, ResourceSelection, Span};
use crate::store::{Predicate, Value, ident_value};

use super::{EngineError, ReservationEngine};

pub(super) fn blocking_state_codes() -> Vec<Value> {
    ReservationState::BLOCKING
        .iter()
        .map(|s| Value::from(s.code()))
        .collect()
}

/// Predicates matching blocking reservations that intersect `span` on any of
/// the selected resources. Interval test is half-open:
/// `existing.start < span.end AND existing.end > span.start`.
pub(super) fn overlap_guard(span: &Span, selection: &ResourceSelection) -> Vec<Predicate> {
    let branches: Vec<Vec<Predicate>> = selection
        .selected()
        .into_iter()
        .map(|(kind, id)| vec![Predicate::Eq(kind.reservation_column(), ident_value(id))])
        .collect();
    vec![
        Predicate::Lt("start_instant", Value::from(span.end)),
        Predicate::Gt("end_instant", Value::from(span.start)),
        Predicate::In("state", blocking_state_codes()),
        Predicate::Or(branches),
    ]
}

impl ReservationEngine {
    /// Pre-insert conflict probe over the specific selected resource ids.
    /// Advisory only: the authoritative decision is made again atomically by
    /// the guarded insert in `create_reservation`.
    pub async fn check_conflicts(
        &self,
        date: NaiveDate,
        start_slot: Ulid,
        end_slot: Ulid,
        selection: &ResourceSelection,
    ) -> Result<ConflictCheck, EngineError> {
        if selection.is_empty() {
            return Ok(ConflictCheck::none());
        }
        let span = self.resolve_span(date, start_slot, end_slot).await?;
        let guard = overlap_guard(&span, selection);
        let rows = self
            .store
            .select("reservations", &["id"], &guard)
            .await?;
        let mut collisions = Vec::with_capacity(rows.len());
        for row in &rows {
            collisions.push(row.ident("id")?);
        }
        Ok(ConflictCheck { collisions })
    }
}
