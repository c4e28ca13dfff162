//! # workcell-domain
//!
//! Pure domain model for simulated workcell peripherals.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Doors** and the base **Device** that may carry one
//! - Define **Actionable devices** (one named action, `Inactive`/`Active`)
//! - Define the **Ring inventory** of a Tower-of-Hanoi apparatus
//! - Define **Tower descriptors** and the ring transfer choreography
//! - Define **Vials** and **Events**
//! - Contain all invariant enforcement and state transitions
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! Actuators and timing are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod action;
pub mod device;
pub mod door;
pub mod event;
pub mod ring;
pub mod tower;
pub mod vial;
