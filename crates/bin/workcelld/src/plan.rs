//! Plan runner: builds the workcell from configuration and executes plan
//! steps one after another.

use std::collections::HashMap;

use workcell_app::ports::{Arm, EventPublisher, Gripper, Scheduler};
use workcell_app::services::device_service::DeviceService;
use workcell_app::services::ring_motion_service::RingMotionService;
use workcell_domain::action::ActionableDevice;
use workcell_domain::device::Device;
use workcell_domain::error::{MissingResourceError, WorkcellError};
use workcell_domain::ring::RingInventory;
use workcell_domain::tower::TowerDescriptor;

use crate::config::{Config, PlanStep};

/// Every device the plan can address, owned for the duration of the run.
pub struct Workcell {
    smart_devices: Vec<ActionableDevice>,
    hanoi: RingInventory<String, String>,
    towers: Vec<TowerDescriptor>,
}

/// Outcome of a plan run.
#[derive(Debug, Default)]
pub struct PlanReport {
    pub succeeded: usize,
    pub rejected: usize,
    /// Set when an actuator fault stopped the run.
    pub aborted: Option<WorkcellError>,
}

impl Workcell {
    /// Build devices, the apparatus and its towers from `config`.
    ///
    /// # Errors
    ///
    /// Returns the first domain validation error.
    pub fn from_config(config: &Config) -> Result<Self, WorkcellError> {
        let smart_devices = config
            .smart_devices
            .iter()
            .map(|cfg| {
                let mut builder = Device::builder().name(&cfg.name);
                if let Some(door) = &cfg.door {
                    builder = builder.door(door.clone());
                }
                Ok(ActionableDevice::new(builder.build()?, &cfg.action)?
                    .with_policy(cfg.policy.unwrap_or(config.actions.policy)))
            })
            .collect::<Result<Vec<_>, WorkcellError>>()?;

        let mut builder = Device::builder().name(&config.hanoi.name);
        if let Some(door) = &config.hanoi.door {
            builder = builder.door(door.clone());
        }
        let mut hanoi = RingInventory::new(builder.build()?, config.hanoi.max_rings)?;
        for seed in &config.hanoi.rings {
            hanoi.add_ring(seed.key.clone(), seed.value.clone())?;
        }

        for tower in &config.hanoi.towers {
            tower.validate()?;
        }

        Ok(Self {
            smart_devices,
            hanoi,
            towers: config.hanoi.towers.clone(),
        })
    }

    #[must_use]
    pub fn hanoi(&self) -> &RingInventory<String, String> {
        &self.hanoi
    }

    #[must_use]
    pub fn smart_device(&self, name: &str) -> Option<&ActionableDevice> {
        self.smart_devices.iter().find(|d| d.device().name() == name)
    }

    /// Execute `steps` in order.
    ///
    /// A rejected step is logged and counted; the run continues. An
    /// actuator fault stops the run, since the robot is left mid-transfer.
    pub async fn run<S, P, R>(
        &mut self,
        steps: &[PlanStep],
        devices: &DeviceService<S, P>,
        motion: &RingMotionService<S, P>,
        robot: &R,
    ) -> PlanReport
    where
        S: Scheduler,
        P: EventPublisher,
        R: Arm + Gripper + Sync,
    {
        let mut report = PlanReport::default();
        for (index, step) in steps.iter().enumerate() {
            match self.step(step, devices, motion, robot).await {
                Ok(()) => report.succeeded += 1,
                Err(err @ WorkcellError::Actuator(_)) => {
                    tracing::error!(index, ?step, %err, "plan aborted");
                    report.aborted = Some(err);
                    break;
                }
                Err(err) => {
                    tracing::warn!(index, ?step, %err, "step rejected");
                    report.rejected += 1;
                }
            }
        }
        report
    }

    async fn step<S, P, R>(
        &mut self,
        step: &PlanStep,
        devices: &DeviceService<S, P>,
        motion: &RingMotionService<S, P>,
        robot: &R,
    ) -> Result<(), WorkcellError>
    where
        S: Scheduler,
        P: EventPublisher,
        R: Arm + Gripper + Sync,
    {
        match step {
            PlanStep::RunAction { device, delay } => {
                devices.run_action(self.smart_device_mut(device)?, *delay).await
            }
            PlanStep::StopAction { device, delay } => {
                devices.stop_action(self.smart_device_mut(device)?, *delay).await
            }
            PlanStep::SetDoor { device, state } => {
                devices.set_door_state(self.device_mut(device)?, *state).await
            }
            PlanStep::AddRing { key, value } => {
                self.hanoi.add_ring(key.clone(), value.clone())?;
                tracing::info!(%key, rings = self.hanoi.num_rings(), "ring added");
                Ok(())
            }
            PlanStep::RemoveRing { key } => {
                self.hanoi.remove_ring(key)?;
                tracing::info!(%key, rings = self.hanoi.num_rings(), "ring removed");
                Ok(())
            }
            PlanStep::MoveRing { from, to } => {
                let towers: HashMap<&str, &TowerDescriptor> =
                    self.towers.iter().map(|t| (t.name.as_str(), t)).collect();
                let from = towers.get(from.as_str()).ok_or_else(|| missing(from))?;
                let to = towers.get(to.as_str()).ok_or_else(|| missing(to))?;
                motion.move_ring(&self.hanoi, robot, from, to).await
            }
        }
    }

    fn smart_device_mut(&mut self, name: &str) -> Result<&mut ActionableDevice, WorkcellError> {
        self.smart_devices
            .iter_mut()
            .find(|d| d.device().name() == name)
            .ok_or_else(|| missing(name))
    }

    fn device_mut(&mut self, name: &str) -> Result<&mut Device, WorkcellError> {
        if self.hanoi.device().name() == name {
            return Ok(self.hanoi.device_mut());
        }
        self.smart_device_mut(name).map(ActionableDevice::device_mut)
    }
}

fn missing(name: &str) -> WorkcellError {
    tracing::debug!(name, "lookup failed");
    WorkcellError::MissingResource(MissingResourceError::Unknown {
        name: name.to_string(),
    })
}
