//! # workcell-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Arm` / `Gripper`: the robot that carries rings between towers
//!   - `Scheduler`: timed waits
//!   - `EventPublisher`: fan-out of device events
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DeviceService`: run/stop actions and move doors, with suspension
//!   - `RingMotionService`: execute the ring transfer choreography
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `workcell-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
