//! Event: an immutable record of a device state change.
//!
//! Events are produced by the application services when a door moves, an
//! action starts or stops, or a ring is carried between towers.

use serde::{Deserialize, Serialize};

use crate::action::ActionState;
use crate::door::DoorState;
use crate::id::{DeviceId, EventId};
use crate::time::{Timestamp, now};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    DoorChanged { state: DoorState },
    ActionStarted { action: String },
    ActionStopped { action: String },
    RingMoved { from: String, to: String },
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DoorChanged { state } => write!(f, "door_changed({state})"),
            Self::ActionStarted { action } => write!(f, "action_started({action})"),
            Self::ActionStopped { action } => write!(f, "action_stopped({action})"),
            Self::RingMoved { from, to } => write!(f, "ring_moved({from} -> {to})"),
        }
    }
}

impl EventKind {
    /// The action state implied by this event, if any.
    #[must_use]
    pub fn action_state(&self) -> Option<ActionState> {
        match self {
            Self::ActionStarted { .. } => Some(ActionState::Active),
            Self::ActionStopped { .. } => Some(ActionState::Inactive),
            Self::DoorChanged { .. } | Self::RingMoved { .. } => None,
        }
    }
}

/// A timestamped [`EventKind`] attributed to one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub device_id: DeviceId,
    pub kind: EventKind,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(device_id: DeviceId, kind: EventKind) -> Self {
        Self {
            id: EventId::new(),
            timestamp: now(),
            device_id,
            kind,
        }
    }
}
