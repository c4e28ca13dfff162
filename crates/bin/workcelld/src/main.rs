//! # workcelld: simulated workcell daemon
//!
//! Composition root that wires the simulated robot to the application
//! services and runs the configured plan.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise tracing
//! - Construct the scheduler, event bus and simulated robot (adapters)
//! - Construct application services, injecting adapters via port traits
//! - Build the devices and the Tower-of-Hanoi apparatus, then run the plan
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;
mod plan;

use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;
use workcell_adapter_virtual::{SimulatedRobot, TokioScheduler};
use workcell_app::event_bus::InProcessEventBus;
use workcell_app::services::device_service::DeviceService;
use workcell_app::services::ring_motion_service::RingMotionService;

use crate::config::Config;
use crate::plan::Workcell;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Adapters
    let scheduler = TokioScheduler::new(config.simulation.time_scale)?;
    let robot = SimulatedRobot::new(scheduler);

    // Event bus
    let event_bus = InProcessEventBus::new(256);
    let mut events = event_bus.subscribe();
    let logger = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let device = event.device_id.short();
                    match event.kind.action_state() {
                        Some(state) => {
                            tracing::info!(%device, kind = %event.kind, %state, "action event");
                        }
                        None => tracing::info!(%device, kind = %event.kind, "event"),
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event logger lagging");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Services
    let device_service = DeviceService::new(scheduler, event_bus.clone());
    let motion_service = RingMotionService::new(scheduler, event_bus);

    let mut workcell = Workcell::from_config(&config)?;
    tracing::info!(
        time_scale = scheduler.time_scale(),
        steps = config.plan.len(),
        rings = workcell.hanoi().num_rings(),
        "workcell ready"
    );

    let report = workcell
        .run(&config.plan, &device_service, &motion_service, &robot)
        .await;
    tracing::info!(
        succeeded = report.succeeded,
        rejected = report.rejected,
        commands = robot.commands().len(),
        "plan finished"
    );

    // Closing the last sender lets the logger drain and exit.
    drop(device_service);
    drop(motion_service);
    logger.await?;

    match report.aborted {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
