//! Actuator ports: the robot arm and gripper that physically move rings.
//!
//! Both are borrowed by the services for the duration of a call; the
//! application never owns an actuator.

use std::future::Future;
use std::time::Duration;

use workcell_domain::error::WorkcellError;
use workcell_domain::tower::JointPositions;

/// A multi-joint arm.
pub trait Arm {
    /// Command every joint in `positions` to its target angle.
    ///
    /// With `blocking` set the future resolves only once the motion is
    /// physically complete. `accel_time` of `None` lets the arm pick its
    /// own acceleration profile.
    fn set_joint_positions(
        &self,
        positions: &JointPositions,
        moving_time: Duration,
        accel_time: Option<Duration>,
        blocking: bool,
    ) -> impl Future<Output = Result<(), WorkcellError>> + Send;
}

/// A two-finger gripper mounted on the arm.
pub trait Gripper {
    /// Close the fingers, then wait `delay` for the grasp to settle.
    fn gripper_close(&self, delay: Duration)
    -> impl Future<Output = Result<(), WorkcellError>> + Send;

    /// Open the fingers, then wait `delay` for the release to settle.
    fn gripper_open(&self, delay: Duration)
    -> impl Future<Output = Result<(), WorkcellError>> + Send;
}
