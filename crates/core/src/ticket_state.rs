//! Ticket states, priorities and the lifecycle transition table.
//!
//! State IDs match the `ticket_states` seed data (1-based SMALLINT). The
//! lifecycle operations (check-in, check-out, explicit close) are guarded by
//! [`can_transition`]. Generic ticket updates bypass the table and are
//! recorded as state overrides instead.

use serde::{Deserialize, Serialize};

/// State ID type matching SMALLINT in the database.
pub type StateId = i16;

/// Priority ID type matching SMALLINT in the database.
pub type PriorityId = i16;

/// Placeholder stored as the closing report when a technician checks out
/// without writing one.
pub const EMPTY_REPORT_PLACEHOLDER: &str = "Sin reporte";

#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketState {
    Open = 1,
    InProgress = 2,
    Resolved = 3,
    Closed = 4,
}

impl TicketState {
    pub const ALL: [TicketState; 4] = [
        TicketState::Open,
        TicketState::InProgress,
        TicketState::Resolved,
        TicketState::Closed,
    ];

    /// Return the database state ID.
    pub fn id(self) -> StateId {
        self as StateId
    }

    /// Look up a state by its database ID.
    pub fn from_id(id: StateId) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Human-readable name (for error messages and report bodies).
    pub fn name(self) -> &'static str {
        match self {
            TicketState::Open => "Open",
            TicketState::InProgress => "InProgress",
            TicketState::Resolved => "Resolved",
            TicketState::Closed => "Closed",
        }
    }

    /// States reachable from `self` through a lifecycle operation.
    ///
    /// `Closed` is terminal. `Resolved -> Closed` is listed so an archival
    /// update is not flagged as an override, but no lifecycle operation
    /// produces `Closed` on its own.
    pub fn valid_transitions(self) -> &'static [TicketState] {
        match self {
            TicketState::Open => &[TicketState::InProgress, TicketState::Resolved],
            TicketState::InProgress => &[TicketState::Resolved],
            TicketState::Resolved => &[TicketState::Closed],
            TicketState::Closed => &[],
        }
    }

    /// States from which a transition into `self` is allowed.
    pub fn allowed_sources(self) -> Vec<TicketState> {
        Self::ALL
            .into_iter()
            .filter(|from| can_transition(*from, self))
            .collect()
    }
}

impl From<TicketState> for StateId {
    fn from(value: TicketState) -> Self {
        value as StateId
    }
}

/// Check whether a lifecycle transition from `from` to `to` is valid.
pub fn can_transition(from: TicketState, to: TicketState) -> bool {
    from.valid_transitions().contains(&to)
}

/// Validate a transition, returning an error message for invalid ones.
pub fn validate_transition(from: TicketState, to: TicketState) -> Result<(), String> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(format!(
            "Invalid transition: {} ({}) -> {} ({})",
            from.name(),
            from.id(),
            to.name(),
            to.id()
        ))
    }
}

/// Whether a raw state change applied by a generic update must be recorded
/// as an administrative override.
///
/// Unknown IDs on either side always count as overrides. Unchanged state is
/// never an override.
pub fn is_override(from: StateId, to: StateId) -> bool {
    if from == to {
        return false;
    }
    match (TicketState::from_id(from), TicketState::from_id(to)) {
        (Some(f), Some(t)) => !can_transition(f, t),
        _ => true,
    }
}

/// Ticket priority IDs matching `ticket_priorities` seed data.
#[repr(i16)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TicketPriority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl TicketPriority {
    /// Return the database priority ID.
    pub fn id(self) -> PriorityId {
        self as PriorityId
    }

    pub fn from_id(id: PriorityId) -> Option<Self> {
        match id {
            1 => Some(TicketPriority::Low),
            2 => Some(TicketPriority::Medium),
            3 => Some(TicketPriority::High),
            4 => Some(TicketPriority::Urgent),
            _ => None,
        }
    }
}

/// Resolve the initial state of a new ticket.
///
/// Absent or zero means `Open`. Any other value must be a known state.
pub fn initial_state(requested: Option<StateId>) -> Result<TicketState, String> {
    match requested {
        None | Some(0) => Ok(TicketState::Open),
        Some(id) => {
            TicketState::from_id(id).ok_or_else(|| format!("Unknown state_id {id}"))
        }
    }
}

/// Resolve the priority of a new ticket. Absent or zero means `Medium`.
pub fn initial_priority(requested: Option<PriorityId>) -> Result<TicketPriority, String> {
    match requested {
        None | Some(0) => Ok(TicketPriority::default()),
        Some(id) => {
            TicketPriority::from_id(id).ok_or_else(|| format!("Unknown priority_id {id}"))
        }
    }
}

/// Normalise the technician's closing report, substituting the placeholder
/// for missing or blank text.
pub fn closing_report_or_placeholder(report: Option<&str>) -> String {
    match report.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => EMPTY_REPORT_PLACEHOLDER.to_string(),
    }
}
