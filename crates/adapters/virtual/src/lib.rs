//! # workcell-adapter-virtual
//!
//! Simulated actuators and timing for running the workcell without hardware.
//!
//! ## Provided adapters
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`SimulatedRobot`] | `Arm` + `Gripper` | Tracks joint targets and gripper state, logs every command, optional fault injection |
//! | [`TokioScheduler`] | `Scheduler` | `tokio::time::sleep` scaled by a time factor (0 skips waiting) |
//!
//! ## Dependency rule
//!
//! Depends on `workcell-app` (port traits) and `workcell-domain` only.

mod robot;
mod scheduler;

pub use robot::{ArmCommand, GripperState, SimulatedRobot};
pub use scheduler::TokioScheduler;
