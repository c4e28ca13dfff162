//! Simulated arm and gripper.
//!
//! Every command is appended to a log and applied to an internal pose, then
//! the simulated motion time elapses on the scheduler. A fault can be
//! injected at a given command index to reproduce a robot that stops
//! mid-transfer.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use workcell_app::ports::{Arm, Gripper, Scheduler};
use workcell_domain::error::{ActuatorError, WorkcellError};
use workcell_domain::tower::JointPositions;

use crate::scheduler::TokioScheduler;

/// Whether the fingers are open or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GripperState {
    #[default]
    Open,
    Closed,
}

/// One command received by the simulated robot.
#[derive(Debug, Clone, PartialEq)]
pub enum ArmCommand {
    SetJointPositions {
        positions: JointPositions,
        moving_time: Duration,
        accel_time: Option<Duration>,
        blocking: bool,
    },
    GripperClose {
        delay: Duration,
    },
    GripperOpen {
        delay: Duration,
    },
}

#[derive(Debug, Default)]
struct RobotState {
    joints: BTreeMap<String, f64>,
    gripper: GripperState,
    log: Vec<ArmCommand>,
    fault_at: Option<usize>,
    issued: usize,
}

/// An arm with a gripper that moves instantly and then waits out the
/// commanded time on its [`TokioScheduler`].
pub struct SimulatedRobot {
    scheduler: TokioScheduler,
    state: Mutex<RobotState>,
}

impl Default for SimulatedRobot {
    fn default() -> Self {
        Self::new(TokioScheduler::default())
    }
}

impl SimulatedRobot {
    #[must_use]
    pub fn new(scheduler: TokioScheduler) -> Self {
        Self {
            scheduler,
            state: Mutex::new(RobotState::default()),
        }
    }

    /// Make the command with zero-based `index` fail instead of executing.
    pub fn inject_fault(&self, index: usize) {
        self.lock_state().fault_at = Some(index);
    }

    /// Last commanded angle of every joint seen so far.
    #[must_use]
    pub fn joint_positions(&self) -> JointPositions {
        self.lock_state()
            .joints
            .iter()
            .map(|(joint, angle)| (joint.clone(), *angle))
            .collect()
    }

    #[must_use]
    pub fn gripper(&self) -> GripperState {
        self.lock_state().gripper
    }

    /// Every successfully executed command, oldest first.
    #[must_use]
    pub fn commands(&self) -> Vec<ArmCommand> {
        self.lock_state().log.clone()
    }

    fn apply(&self, command: ArmCommand) -> Result<Duration, WorkcellError> {
        let mut state = self.lock_state();
        let index = state.issued;
        state.issued += 1;
        if state.fault_at == Some(index) {
            let actuator = match command {
                ArmCommand::SetJointPositions { .. } => "arm",
                ArmCommand::GripperClose { .. } | ArmCommand::GripperOpen { .. } => "gripper",
            };
            tracing::error!(index, actuator, "simulated fault");
            return Err(ActuatorError {
                actuator,
                reason: format!("simulated fault at command {index}"),
            }
            .into());
        }

        let elapse = match &command {
            ArmCommand::SetJointPositions {
                positions,
                moving_time,
                blocking,
                ..
            } => {
                for (joint, angle) in positions.iter() {
                    state.joints.insert(joint.to_string(), angle);
                }
                tracing::debug!(%positions, ?moving_time, blocking, "arm move");
                if *blocking { *moving_time } else { Duration::ZERO }
            }
            ArmCommand::GripperClose { delay } => {
                state.gripper = GripperState::Closed;
                tracing::debug!(?delay, "gripper close");
                *delay
            }
            ArmCommand::GripperOpen { delay } => {
                state.gripper = GripperState::Open;
                tracing::debug!(?delay, "gripper open");
                *delay
            }
        };
        state.log.push(command);
        Ok(elapse)
    }

    fn run(&self, command: ArmCommand) -> impl Future<Output = Result<(), WorkcellError>> + Send {
        let applied = self.apply(command);
        let scheduler = self.scheduler;
        async move {
            let elapse = applied?;
            scheduler.wait(elapse).await;
            Ok(())
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RobotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Arm for SimulatedRobot {
    fn set_joint_positions(
        &self,
        positions: &JointPositions,
        moving_time: Duration,
        accel_time: Option<Duration>,
        blocking: bool,
    ) -> impl Future<Output = Result<(), WorkcellError>> + Send {
        self.run(ArmCommand::SetJointPositions {
            positions: positions.clone(),
            moving_time,
            accel_time,
            blocking,
        })
    }
}

impl Gripper for SimulatedRobot {
    fn gripper_close(
        &self,
        delay: Duration,
    ) -> impl Future<Output = Result<(), WorkcellError>> + Send {
        self.run(ArmCommand::GripperClose { delay })
    }

    fn gripper_open(
        &self,
        delay: Duration,
    ) -> impl Future<Output = Result<(), WorkcellError>> + Send {
        self.run(ArmCommand::GripperOpen { delay })
    }
}
