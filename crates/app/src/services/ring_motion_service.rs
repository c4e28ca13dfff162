//! Ring motion service: carries a ring between two towers with the robot.

use std::fmt::Display;
use std::hash::Hash;

use workcell_domain::error::WorkcellError;
use workcell_domain::event::{Event, EventKind};
use workcell_domain::ring::RingInventory;
use workcell_domain::tower::{MotionStep, TowerDescriptor, transfer_plan};

use crate::ports::{Arm, EventPublisher, Gripper, Scheduler};

/// Executes the transfer choreography against a borrowed robot.
///
/// Moving a ring never changes the apparatus' ring inventory: rings stay in
/// the same apparatus, only their tower changes. Callers that track rings
/// per tower update their own bookkeeping after a successful move.
pub struct RingMotionService<S, P> {
    scheduler: S,
    publisher: P,
}

impl<S, P> RingMotionService<S, P>
where
    S: Scheduler,
    P: EventPublisher,
{
    /// Create a new service backed by the given scheduler and publisher.
    pub fn new(scheduler: S, publisher: P) -> Self {
        Self {
            scheduler,
            publisher,
        }
    }

    /// Move the top ring of `from` onto `to`.
    ///
    /// Every arm command is blocking and each step waits for the previous
    /// one to finish.
    ///
    /// # Errors
    ///
    /// Returns the first actuator error unchanged. The remaining steps are
    /// skipped and the robot is left wherever that step stopped it; there
    /// is no rollback.
    #[tracing::instrument(skip_all, fields(apparatus = %apparatus.device().name(), from = %from.name, to = %to.name))]
    pub async fn move_ring<K, V, R>(
        &self,
        apparatus: &RingInventory<K, V>,
        robot: &R,
        from: &TowerDescriptor,
        to: &TowerDescriptor,
    ) -> Result<(), WorkcellError>
    where
        K: Eq + Hash + Display,
        R: Arm + Gripper + Sync,
    {
        self.execute(robot, &transfer_plan(from, to)).await?;
        tracing::info!("ring moved");
        let event = Event::new(
            apparatus.device().id(),
            EventKind::RingMoved {
                from: from.name.clone(),
                to: to.name.clone(),
            },
        );
        let _ = self.publisher.publish(event).await;
        Ok(())
    }

    /// Run `steps` in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the failing step's actuator error.
    pub async fn execute<R>(&self, robot: &R, steps: &[MotionStep]) -> Result<(), WorkcellError>
    where
        R: Arm + Gripper + Sync,
    {
        for (index, step) in steps.iter().enumerate() {
            tracing::debug!(index, %step, "motion step");
            let result = match step {
                MotionStep::MoveArm {
                    target,
                    moving_time,
                    settle,
                } => {
                    let moved = robot
                        .set_joint_positions(target, *moving_time, None, true)
                        .await;
                    if let (Ok(()), Some(settle)) = (&moved, settle) {
                        self.scheduler.wait(*settle).await;
                    }
                    moved
                }
                MotionStep::CloseGripper { delay } => robot.gripper_close(*delay).await,
                MotionStep::OpenGripper { delay } => robot.gripper_open(*delay).await,
            };
            if let Err(err) = result {
                tracing::error!(index, %step, %err, "motion aborted, robot left mid-transfer");
                return Err(err);
            }
        }
        Ok(())
    }
}
