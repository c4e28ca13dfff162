//! Door: an optional openable panel mounted on one face of a device.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which face of the enclosure the door is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plane {
    North,
    South,
    East,
    West,
    Top,
    Bottom,
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
            Self::Top => "Top",
            Self::Bottom => "Bottom",
        })
    }
}

/// Whether a door is open or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorState {
    Open,
    #[default]
    Closed,
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

/// A fully populated door. A device either has one of these or none at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub plane: Plane,
    pub state: DoorState,
    /// Time needed to actuate the door.
    #[serde(with = "crate::time::secs_f64")]
    pub move_time: Duration,
}

impl Door {
    #[must_use]
    pub fn new(plane: Plane, state: DoorState, move_time: Duration) -> Self {
        Self {
            plane,
            state,
            move_time,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == DoorState::Open
    }

    /// Overwrite a single field.
    pub fn apply(&mut self, attribute: DoorAttribute) {
        match attribute {
            DoorAttribute::Plane(plane) => self.plane = plane,
            DoorAttribute::State(state) => self.state = state,
            DoorAttribute::MoveTime(move_time) => self.move_time = move_time,
        }
    }
}

/// One field of a [`Door`] together with its new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorAttribute {
    Plane(Plane),
    State(DoorState),
    MoveTime(Duration),
}

impl fmt::Display for DoorAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plane(plane) => write!(f, "plane={plane}"),
            Self::State(state) => write!(f, "state={state}"),
            Self::MoveTime(time) => write!(f, "move_time={}s", time.as_secs_f64()),
        }
    }
}
