//! Common error types used across the workspace.
//!
//! Every rejected operation is reported through [`WorkcellError`]. None of
//! these are fatal: the entity that rejected the call is left unchanged and
//! the caller decides what to do with the message.

/// Top-level error returned by every fallible workcell operation.
#[derive(Debug, thiserror::Error)]
pub enum WorkcellError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    #[error("missing resource: {0}")]
    MissingResource(#[from] MissingResourceError),

    #[error("capacity exceeded: {0}")]
    CapacityExceeded(#[from] CapacityError),

    #[error("duplicate key: {0}")]
    DuplicateKey(#[from] DuplicateKeyError),

    #[error("actuator fault: {0}")]
    Actuator(#[from] ActuatorError),
}

/// Construction-time or setter invariant violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("action name must not be empty")]
    EmptyActionName,

    #[error("ring capacity must be positive")]
    ZeroCapacity,

    #[error("vial volume must be positive, got {0} mL")]
    NonPositiveVolume(f64),

    #[error("time scale must be a finite, non-negative factor, got {0}")]
    InvalidTimeScale(f64),
}

/// An action or door operation attempted from a state that forbids it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot run action {action}, action already running")]
    AlreadyActive { action: String },

    #[error("cannot stop action {action}, action is not running")]
    NotActive { action: String },
}

/// Something the operation needs does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MissingResourceError {
    #[error("device {device} has no door, create a door first")]
    NoDoor { device: String },

    #[error("cannot remove a ring from the empty ring set of {device}")]
    EmptyRingSet { device: String },

    #[error("ring with key {key} does not exist in {device}")]
    RingNotFound { device: String, key: String },

    #[error("nothing named {name} in the workcell")]
    Unknown { name: String },
}

/// A ring insertion or bulk replacement would go beyond `max_rings`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{device} holds at most {max} rings, {requested} requested")]
pub struct CapacityError {
    pub device: String,
    pub max: usize,
    pub requested: usize,
}

/// A ring key is already present in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ring with key {key} already exists in {device}")]
pub struct DuplicateKeyError {
    pub device: String,
    pub key: String,
}

/// A failure reported by the arm or gripper collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{actuator}: {reason}")]
pub struct ActuatorError {
    /// Which actuator reported the fault (e.g. `"arm"`, `"gripper"`).
    pub actuator: &'static str,
    pub reason: String,
}
