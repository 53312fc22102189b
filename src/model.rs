use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unix milliseconds — the only instant type.
pub type Ms = i64;

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn duration_ms(&self) -> Ms {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: Ms) -> bool {
        self.start <= t && t < self.end
    }
}

/// Lifecycle state of a reservation. The numeric codes exist only at the
/// storage boundary; everything in-process speaks the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationState {
    /// Written only by an external approval feature; never produced here.
    Pending,
    Active,
    Cancelled,
    /// Set by an external time-driven process once the span has passed.
    Finalized,
}

impl ReservationState {
    /// States that count toward conflict detection.
    pub const BLOCKING: [ReservationState; 2] =
        [ReservationState::Pending, ReservationState::Active];

    pub fn code(self) -> i64 {
        match self {
            ReservationState::Pending => 0,
            ReservationState::Active => 1,
            ReservationState::Cancelled => 2,
            ReservationState::Finalized => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ReservationState::Pending),
            1 => Some(ReservationState::Active),
            2 => Some(ReservationState::Cancelled),
            3 => Some(ReservationState::Finalized),
            _ => None,
        }
    }

    pub fn is_blocking(self) -> bool {
        Self::BLOCKING.contains(&self)
    }
}

/// The three kinds of bookable hardware. Each kind has its own catalog
/// relation and its own foreign-key column on the reservations relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Projector,
    Computer,
    Extension,
}

impl ResourceKind {
    pub fn relation(self) -> &'static str {
        match self {
            ResourceKind::Projector => "equipment",
            ResourceKind::Computer => "computers",
            ResourceKind::Extension => "extensions",
        }
    }

    pub fn reservation_column(self) -> &'static str {
        match self {
            ResourceKind::Projector => "equipment_id",
            ResourceKind::Computer => "computer_id",
            ResourceKind::Extension => "extension_id",
        }
    }
}

// ── Catalog types (read-only to the engine) ──────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projector {
    pub id: Ulid,
    pub name: String,
    pub active: bool,
    pub hdmi: bool,
    pub vga: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Computer {
    pub id: Ulid,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerExtension {
    pub id: Ulid,
    pub name: String,
    pub active: bool,
}

/// Maps a symbolic slot id to a wall-clock time-of-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub id: Ulid,
    pub label: String,
    pub time: NaiveTime,
}

/// Organizational unit attached to a reservation for reporting only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub id: Ulid,
    pub name: String,
}

// ── Reservation ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Ulid,
    pub owner: Ulid,
    pub projector: Option<Ulid>,
    pub computer: Option<Ulid>,
    pub extension: Option<Ulid>,
    pub division: Option<Ulid>,
    pub room: Option<String>,
    pub span: Span,
    pub state: ReservationState,
}

/// Resources a caller wants to attach to one reservation. All optional; an
/// empty selection is a room-only booking and never conflicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceSelection {
    pub projector: Option<Ulid>,
    pub computer: Option<Ulid>,
    pub extension: Option<Ulid>,
}

impl ResourceSelection {
    pub fn projector_only(id: Ulid) -> Self {
        Self {
            projector: Some(id),
            ..Default::default()
        }
    }

    pub fn computer_only(id: Ulid) -> Self {
        Self {
            computer: Some(id),
            ..Default::default()
        }
    }

    pub fn extension_only(id: Ulid) -> Self {
        Self {
            extension: Some(id),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.projector.is_none() && self.computer.is_none() && self.extension.is_none()
    }

    /// Selected (kind, id) pairs in a fixed order.
    pub fn selected(&self) -> Vec<(ResourceKind, Ulid)> {
        let mut out = Vec::new();
        if let Some(id) = self.projector {
            out.push((ResourceKind::Projector, id));
        }
        if let Some(id) = self.computer {
            out.push((ResourceKind::Computer, id));
        }
        if let Some(id) = self.extension {
            out.push((ResourceKind::Extension, id));
        }
        out
    }
}

/// Projector capability filter. Only meaningful for `ResourceKind::Projector`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectorFilter {
    pub require_hdmi: bool,
    pub require_vga: bool,
}

/// One entry in an availability listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub id: Ulid,
    pub name: String,
    pub kind: ResourceKind,
}

/// Result of a pre-insert conflict probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictCheck {
    /// Ids of blocking reservations that intersect the requested interval.
    pub collisions: Vec<Ulid>,
}

impl ConflictCheck {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn has_conflict(&self) -> bool {
        !self.collisions.is_empty()
    }
}

/// Filters for listing a user's own reservations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MineFilter {
    /// Keep only reservations whose end is still in the future.
    pub only_future: bool,
    /// Keep only reservations intersecting this half-open window.
    pub range: Option<Span>,
}

impl Default for MineFilter {
    fn default() -> Self {
        Self {
            only_future: true,
            range: None,
        }
    }
}
