use chrono::NaiveTime;

use crate::model::{Computer, Division, PowerExtension, Projector, ScheduleSlot};
use crate::store::{Predicate, Row, StoreError, Value};

use super::{EngineError, ReservationEngine};

pub(super) const SLOT_COLUMNS: &[&str] = &["id", "label", "time_of_day"];

fn active_filter(only_active: bool) -> Vec<Predicate> {
    if only_active {
        vec![Predicate::Eq("active", Value::Bool(true))]
    } else {
        Vec::new()
    }
}

pub(super) fn decode_slot(row: &Row) -> Result<ScheduleSlot, StoreError> {
    let raw = row.text("time_of_day")?;
    let time = NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .map_err(|_| StoreError::Malformed(format!("time_of_day `{raw}` is not HH:MM:SS")))?;
    Ok(ScheduleSlot {
        id: row.ident("id")?,
        label: row.text("label")?.to_string(),
        time,
    })
}

impl ReservationEngine {
    pub async fn list_projectors(&self, only_active: bool) -> Result<Vec<Projector>, EngineError> {
        let rows = self
            .store
            .select(
                "equipment",
                &["id", "name", "active", "hdmi", "vga"],
                &active_filter(only_active),
            )
            .await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(Projector {
                id: row.ident("id")?,
                name: row.text("name")?.to_string(),
                active: row.flag("active")?,
                hdmi: row.flag("hdmi")?,
                vga: row.flag("vga")?,
            });
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    pub async fn list_computers(&self, only_active: bool) -> Result<Vec<Computer>, EngineError> {
        let rows = self
            .store
            .select(
                "computers",
                &["id", "name", "active"],
                &active_filter(only_active),
            )
            .await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(Computer {
                id: row.ident("id")?,
                name: row.text("name")?.to_string(),
                active: row.flag("active")?,
            });
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    pub async fn list_extensions(
        &self,
        only_active: bool,
    ) -> Result<Vec<PowerExtension>, EngineError> {
        let rows = self
            .store
            .select(
                "extensions",
                &["id", "name", "active"],
                &active_filter(only_active),
            )
            .await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(PowerExtension {
                id: row.ident("id")?,
                name: row.text("name")?.to_string(),
                active: row.flag("active")?,
            });
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    /// Schedule slots ordered by time-of-day.
    pub async fn list_slots(&self) -> Result<Vec<ScheduleSlot>, EngineError> {
        let rows = self.store.select("schedule_slots", SLOT_COLUMNS, &[]).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(decode_slot(row)?);
        }
        out.sort_by_key(|s| s.time);
        Ok(out)
    }

    /// Divisions ordered by name.
    pub async fn list_divisions(&self) -> Result<Vec<Division>, EngineError> {
        let rows = self.store.select("divisions", &["id", "name"], &[]).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(Division {
                id: row.ident("id")?,
                name: row.text("name")?.to_string(),
            });
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}
