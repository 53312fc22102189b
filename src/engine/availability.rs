use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;
use ulid::Ulid;

use crate::model::{ConnectorFilter, ResourceEntry, ResourceKind};
use crate::observability::AVAILABILITY_QUERIES_TOTAL;
use crate::store::{Predicate, Value, ident_value};

use super::conflict::blocking_state_codes;
use super::{EngineError, ReservationEngine};

impl ReservationEngine {
    /// Resources of `kind` that are active, satisfy `filter`, and carry no
    /// blocking reservation intersecting the requested interval. Optimistic:
    /// the result is correct at query time and re-validated at commit.
    pub async fn list_available(
        &self,
        kind: ResourceKind,
        date: NaiveDate,
        start_slot: Ulid,
        end_slot: Ulid,
        filter: &ConnectorFilter,
    ) -> Result<Vec<ResourceEntry>, EngineError> {
        let span = self.resolve_span(date, start_slot, end_slot).await?;
        metrics::counter!(AVAILABILITY_QUERIES_TOTAL).increment(1);

        let mut predicates = vec![Predicate::Eq("active", Value::Bool(true))];
        if kind == ResourceKind::Projector {
            if filter.require_hdmi {
                predicates.push(Predicate::Eq("hdmi", Value::Bool(true)));
            }
            if filter.require_vga {
                predicates.push(Predicate::Eq("vga", Value::Bool(true)));
            }
        }
        let candidates = self
            .store
            .select(kind.relation(), &["id", "name"], &predicates)
            .await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::with_capacity(candidates.len());
        for row in &candidates {
            entries.push(ResourceEntry {
                id: row.ident("id")?,
                name: row.text("name")?.to_string(),
                kind,
            });
        }

        let ids: Vec<Value> = entries.iter().map(|e| ident_value(e.id)).collect();
        let busy_rows = self
            .store
            .select(
                "reservations",
                &["id", kind.reservation_column()],
                &[
                    Predicate::In(kind.reservation_column(), ids),
                    Predicate::Lt("start_instant", Value::from(span.end)),
                    Predicate::Gt("end_instant", Value::from(span.start)),
                    Predicate::In("state", blocking_state_codes()),
                ],
            )
            .await?;

        let mut busy: HashSet<Ulid> = HashSet::new();
        for row in &busy_rows {
            if let Some(id) = row.opt_ident(kind.reservation_column())? {
                busy.insert(id);
            }
        }

        entries.retain(|e| !busy.contains(&e.id));
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            kind = kind.relation(),
            start = span.start,
            end = span.end,
            free = entries.len(),
            "availability computed"
        );
        Ok(entries)
    }
}
