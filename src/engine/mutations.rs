use chrono::NaiveDate;
use tracing::{info, warn};
use ulid::Ulid;

use crate::model::{ReservationState, ResourceSelection};
use crate::observability::{
    RESERVATION_CONFLICTS_TOTAL, RESERVATIONS_CANCELLED_TOTAL, RESERVATIONS_CREATED_TOTAL,
};
use crate::store::{InsertOutcome, Predicate, Row, ident_value, opt_ident_value, opt_text_value};

use super::conflict::overlap_guard;
use super::queries::decode_reservation;
use super::{EngineError, ReservationEngine, now_ms};

impl ReservationEngine {
    /// Create a reservation for `owner` over the interval spanned by the two
    /// slots on `date`. The conflict decision and the write are one atomic
    /// store call: insert-unless-overlapping-blocking-row. On refusal nothing
    /// is committed and the colliding reservation ids are returned.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_reservation(
        &self,
        owner: Ulid,
        date: NaiveDate,
        start_slot: Ulid,
        end_slot: Ulid,
        selection: &ResourceSelection,
        division: Option<Ulid>,
        room: Option<String>,
    ) -> Result<Ulid, EngineError> {
        let span = self.resolve_span(date, start_slot, end_slot).await?;

        let id = Ulid::new();
        let row = Row::new()
            .set("id", ident_value(id))
            .set("owner_id", ident_value(owner))
            .set("equipment_id", opt_ident_value(selection.projector))
            .set("computer_id", opt_ident_value(selection.computer))
            .set("extension_id", opt_ident_value(selection.extension))
            .set("division_id", opt_ident_value(division))
            .set("room", opt_text_value(room.as_deref()))
            .set("start_instant", span.start)
            .set("end_instant", span.end)
            .set("state", ReservationState::Active.code());

        if selection.is_empty() {
            // Room-only booking: no shared resource, nothing to guard.
            self.store.insert("reservations", row).await?;
        } else {
            let guard = overlap_guard(&span, selection);
            match self.store.insert_unless("reservations", row, &guard).await? {
                InsertOutcome::Inserted => {}
                InsertOutcome::Refused(rows) => {
                    let mut collisions = Vec::with_capacity(rows.len());
                    for row in &rows {
                        collisions.push(row.ident("id")?);
                    }
                    metrics::counter!(RESERVATION_CONFLICTS_TOTAL).increment(1);
                    warn!(
                        %owner,
                        start = span.start,
                        end = span.end,
                        ?collisions,
                        "reservation refused: interval already taken"
                    );
                    return Err(EngineError::ResourceConflict(collisions));
                }
            }
        }

        metrics::counter!(RESERVATIONS_CREATED_TOTAL).increment(1);
        info!(%id, %owner, start = span.start, end = span.end, "reservation created");
        Ok(id)
    }

    /// Cancel a reservation. Only the owner may cancel, and only while the
    /// reservation has not yet ended. State is the only field that changes.
    pub async fn cancel_reservation(
        &self,
        reservation_id: Ulid,
        requester: Ulid,
    ) -> Result<(), EngineError> {
        let rows = self
            .store
            .select(
                "reservations",
                super::queries::RESERVATION_COLUMNS,
                &[Predicate::Eq("id", ident_value(reservation_id))],
            )
            .await?;
        let row = rows.first().ok_or(EngineError::NotFound {
            entity: "reservation",
            id: reservation_id,
        })?;
        let reservation = decode_reservation(row)?;

        if reservation.owner != requester {
            return Err(EngineError::Forbidden(reservation_id));
        }
        if reservation.span.end <= now_ms() {
            return Err(EngineError::AlreadyFinalized(reservation_id));
        }

        let changed = self
            .store
            .update(
                "reservations",
                Row::new().set("state", ReservationState::Cancelled.code()),
                &[Predicate::Eq("id", ident_value(reservation_id))],
            )
            .await?;
        if changed == 0 {
            // Row vanished between read and write.
            return Err(EngineError::NotFound {
                entity: "reservation",
                id: reservation_id,
            });
        }

        metrics::counter!(RESERVATIONS_CANCELLED_TOTAL).increment(1);
        info!(id = %reservation_id, %requester, "reservation cancelled");
        Ok(())
    }
}
