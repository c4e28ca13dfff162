//! Tower descriptors and the ring transfer choreography.
//!
//! A tower is a set of named arm poses. Moving a ring between two towers is
//! a fixed pick-and-place with intermediate safe heights; [`transfer_plan`]
//! spells it out as data so it can be executed by any arm/gripper pair.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, WorkcellError};

/// Target angle (radians) for each named joint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointPositions(BTreeMap<String, f64>);

impl JointPositions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, joint: impl Into<String>, angle: f64) -> Self {
        self.0.insert(joint.into(), angle);
        self
    }

    #[must_use]
    pub fn get(&self, joint: &str) -> Option<f64> {
        self.0.get(joint).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(joint, angle)| (joint.as_str(), *angle))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for JointPositions {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(j, a)| (j.into(), a)).collect())
    }
}

impl fmt::Display for JointPositions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (joint, angle)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{joint}: {angle:.3}")?;
        }
        f.write_str("}")
    }
}

/// Named pick/place location on the apparatus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerDescriptor {
    pub name: String,
    /// Pose in front of the tower, clear of the rings.
    pub approach: JointPositions,
    /// Pose where the gripper closes around the top ring.
    pub pickup: JointPositions,
    /// Pose straight above `pickup`, high enough to clear the tower.
    pub pickup_safe_height: JointPositions,
}

impl TowerDescriptor {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when `name` is empty.
    pub fn validate(&self) -> Result<(), WorkcellError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Arm moving time for the long travel legs.
pub const TRAVEL_TIME: Duration = Duration::from_secs(3);
/// Arm moving time for the short vertical legs.
pub const LIFT_TIME: Duration = Duration::from_secs(1);
/// Pause after an arm move before the next command.
pub const SETTLE_TIME: Duration = Duration::from_secs(1);
/// Gripper actuation delay.
pub const GRIP_DELAY: Duration = Duration::from_secs(2);

/// One actuator command of a transfer.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionStep {
    /// Blocking arm move, optionally followed by a pause.
    MoveArm {
        target: JointPositions,
        moving_time: Duration,
        settle: Option<Duration>,
    },
    CloseGripper {
        delay: Duration,
    },
    OpenGripper {
        delay: Duration,
    },
}

impl fmt::Display for MotionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveArm {
                target,
                moving_time,
                ..
            } => write!(f, "move_arm({target}, {}s)", moving_time.as_secs_f64()),
            Self::CloseGripper { delay } => write!(f, "close_gripper({}s)", delay.as_secs_f64()),
            Self::OpenGripper { delay } => write!(f, "open_gripper({}s)", delay.as_secs_f64()),
        }
    }
}

/// The eight steps that carry the top ring of `from` onto `to`.
///
/// The plan is unconditional: it does not look at ring inventories and
/// contains no recovery steps.
#[must_use]
pub fn transfer_plan(from: &TowerDescriptor, to: &TowerDescriptor) -> Vec<MotionStep> {
    let arm = |target: &JointPositions, moving_time, settle| MotionStep::MoveArm {
        target: target.clone(),
        moving_time,
        settle,
    };
    vec![
        arm(&from.approach, TRAVEL_TIME, Some(SETTLE_TIME)),
        arm(&from.pickup, TRAVEL_TIME, Some(SETTLE_TIME)),
        MotionStep::CloseGripper { delay: GRIP_DELAY },
        arm(&from.pickup_safe_height, LIFT_TIME, Some(SETTLE_TIME)),
        arm(&to.pickup_safe_height, TRAVEL_TIME, Some(SETTLE_TIME)),
        arm(&to.pickup, LIFT_TIME, Some(SETTLE_TIME)),
        MotionStep::OpenGripper { delay: GRIP_DELAY },
        arm(&to.approach, TRAVEL_TIME, None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(waist: f64) -> JointPositions {
        JointPositions::new().with("waist", waist).with("shoulder", 0.0)
    }

    fn tower(name: &str, base: f64) -> TowerDescriptor {
        TowerDescriptor {
            name: name.to_string(),
            approach: pose(base + 1.0),
            pickup: pose(base + 2.0),
            pickup_safe_height: pose(base + 3.0),
        }
    }

    fn arm_step(step: &MotionStep) -> (f64, Duration, Option<Duration>) {
        match step {
            MotionStep::MoveArm {
                target,
                moving_time,
                settle,
            } => (target.get("waist").unwrap(), *moving_time, *settle),
            other => panic!("expected arm move, got {other}"),
        }
    }

    #[test]
    fn should_produce_eight_steps_in_pick_and_place_order() {
        let a = tower("A", 10.0);
        let b = tower("B", 20.0);
        let plan = transfer_plan(&a, &b);
        assert_eq!(plan.len(), 8);

        let secs = Duration::from_secs;
        assert_eq!(arm_step(&plan[0]), (11.0, secs(3), Some(secs(1))));
        assert_eq!(arm_step(&plan[1]), (12.0, secs(3), Some(secs(1))));
        assert_eq!(plan[2], MotionStep::CloseGripper { delay: secs(2) });
        assert_eq!(arm_step(&plan[3]), (13.0, secs(1), Some(secs(1))));
        assert_eq!(arm_step(&plan[4]), (23.0, secs(3), Some(secs(1))));
        assert_eq!(arm_step(&plan[5]), (22.0, secs(1), Some(secs(1))));
        assert_eq!(plan[6], MotionStep::OpenGripper { delay: secs(2) });
        assert_eq!(arm_step(&plan[7]), (21.0, secs(3), None));
    }

    #[test]
    fn should_reject_tower_without_name() {
        let mut t = tower("A", 0.0);
        t.name.clear();
        assert!(t.validate().is_err());
    }

    #[test]
    fn should_deserialize_tower_from_joint_maps() {
        let json = serde_json::json!({
            "name": "left",
            "approach": {"waist": 0.5, "elbow": 1.0},
            "pickup": {"waist": 0.5, "elbow": 1.2},
            "pickup_safe_height": {"waist": 0.5, "elbow": 0.8}
        });
        let t: TowerDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(t.pickup.get("elbow"), Some(1.2));
        assert_eq!(t.approach.len(), 2);
    }

    #[test]
    fn should_display_joint_positions_sorted_by_joint() {
        let p: JointPositions = [("wrist", 0.25), ("elbow", 1.0)].into_iter().collect();
        assert_eq!(p.to_string(), "{elbow: 1.000, wrist: 0.250}");
    }

    #[test]
    fn should_display_motion_steps() {
        let step = MotionStep::CloseGripper { delay: GRIP_DELAY };
        assert_eq!(step.to_string(), "close_gripper(2s)");
    }
}
