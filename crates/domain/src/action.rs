//! Actionable device: a device that performs one named action and may
//! couple that action to its door.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::door::{DoorAttribute, DoorState};
use crate::error::{TransitionError, ValidationError, WorkcellError};

/// How running and stopping the action interacts with the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPolicy {
    /// The door is forced open before every run attempt (even a rejected
    /// one) and forced closed after a successful stop.
    #[default]
    DoorCoupled,
    /// The door is never touched by the action.
    DoorIndependent,
}

/// Whether the action is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionState {
    #[default]
    Inactive,
    Active,
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => f.write_str("inactive"),
            Self::Active => f.write_str("active"),
        }
    }
}

/// A device with a single named action and an `Inactive`/`Active` state.
///
/// The only transitions are `Inactive -> Active` ([`start`](Self::start))
/// and `Active -> Inactive` ([`stop`](Self::stop)).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionableDevice {
    device: Device,
    action: String,
    state: ActionState,
    policy: ActionPolicy,
}

impl ActionableDevice {
    /// Wrap `device` with an inactive action using the default policy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyActionName`] when `action` is empty.
    pub fn new(device: Device, action: impl Into<String>) -> Result<Self, WorkcellError> {
        let action = action.into();
        if action.is_empty() {
            return Err(ValidationError::EmptyActionName.into());
        }
        Ok(Self {
            device,
            action,
            state: ActionState::Inactive,
            policy: ActionPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ActionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut Device {
        &mut self.device
    }

    #[must_use]
    pub fn action_name(&self) -> &str {
        &self.action
    }

    /// Rename the action.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyActionName`] when `action` is empty.
    pub fn set_action_name(&mut self, action: impl Into<String>) -> Result<(), WorkcellError> {
        let action = action.into();
        if action.is_empty() {
            return Err(ValidationError::EmptyActionName.into());
        }
        self.action = action;
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> ActionState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == ActionState::Active
    }

    #[must_use]
    pub fn policy(&self) -> ActionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ActionPolicy) {
        self.policy = policy;
    }

    /// Transition `Inactive -> Active`.
    ///
    /// Under [`ActionPolicy::DoorCoupled`] the door is forced open first,
    /// whether or not the transition is then accepted.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyActive`] when the action is running.
    pub fn start(&mut self) -> Result<(), WorkcellError> {
        if self.policy == ActionPolicy::DoorCoupled {
            self.force_door(DoorState::Open);
        }
        if self.is_active() {
            return Err(TransitionError::AlreadyActive {
                action: self.action.clone(),
            }
            .into());
        }
        self.state = ActionState::Active;
        Ok(())
    }

    /// Transition `Active -> Inactive`.
    ///
    /// Under [`ActionPolicy::DoorCoupled`] the door is forced closed after
    /// the transition. A rejected stop touches nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotActive`] when the action is not running.
    pub fn stop(&mut self) -> Result<(), WorkcellError> {
        if !self.is_active() {
            return Err(TransitionError::NotActive {
                action: self.action.clone(),
            }
            .into());
        }
        self.state = ActionState::Inactive;
        if self.policy == ActionPolicy::DoorCoupled {
            self.force_door(DoorState::Closed);
        }
        Ok(())
    }

    // A doorless device has nothing to force; the action itself still proceeds.
    fn force_door(&mut self, state: DoorState) {
        if let Some(door) = self.device.door_mut() {
            door.apply(DoorAttribute::State(state));
        }
    }
}
