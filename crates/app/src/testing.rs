//! Recording fakes for the ports, shared by the service tests.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use workcell_domain::error::{ActuatorError, WorkcellError};
use workcell_domain::event::Event;
use workcell_domain::tower::JointPositions;

use crate::ports::{Arm, EventPublisher, Gripper, Scheduler};

/// Everything a fake observed, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Arm {
        target: JointPositions,
        moving_time: Duration,
        accel_time: Option<Duration>,
        blocking: bool,
    },
    GripperClose(Duration),
    GripperOpen(Duration),
    Wait(Duration),
}

pub type Journal = Arc<Mutex<Vec<Call>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(journal: &Journal) -> Vec<Call> {
    journal.lock().unwrap().clone()
}

pub struct RecordingScheduler(pub Journal);

impl Scheduler for RecordingScheduler {
    fn wait(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.0.lock().unwrap().push(Call::Wait(duration));
        async {}
    }
}

/// Arm and gripper in one; fails the actuator call with index `fail_at`.
pub struct RecordingRobot {
    pub journal: Journal,
    pub fail_at: Option<usize>,
    issued: Mutex<usize>,
}

impl RecordingRobot {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            fail_at: None,
            issued: Mutex::new(0),
        }
    }

    pub fn failing_at(journal: Journal, index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new(journal)
        }
    }

    fn record(&self, call: Call) -> Result<(), WorkcellError> {
        let mut issued = self.issued.lock().unwrap();
        let index = *issued;
        *issued += 1;
        if self.fail_at == Some(index) {
            return Err(ActuatorError {
                actuator: "arm",
                reason: format!("fault injected at command {index}"),
            }
            .into());
        }
        self.journal.lock().unwrap().push(call);
        Ok(())
    }
}

impl Arm for RecordingRobot {
    fn set_joint_positions(
        &self,
        positions: &JointPositions,
        moving_time: Duration,
        accel_time: Option<Duration>,
        blocking: bool,
    ) -> impl Future<Output = Result<(), WorkcellError>> + Send {
        let result = self.record(Call::Arm {
            target: positions.clone(),
            moving_time,
            accel_time,
            blocking,
        });
        async { result }
    }
}

impl Gripper for RecordingRobot {
    fn gripper_close(
        &self,
        delay: Duration,
    ) -> impl Future<Output = Result<(), WorkcellError>> + Send {
        let result = self.record(Call::GripperClose(delay));
        async { result }
    }

    fn gripper_open(
        &self,
        delay: Duration,
    ) -> impl Future<Output = Result<(), WorkcellError>> + Send {
        let result = self.record(Call::GripperOpen(delay));
        async { result }
    }
}

#[derive(Clone, Default)]
pub struct CollectingPublisher(pub Arc<Mutex<Vec<Event>>>);

impl CollectingPublisher {
    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }
}

impl EventPublisher for CollectingPublisher {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), WorkcellError>> + Send {
        self.0.lock().unwrap().push(event);
        async { Ok(()) }
    }
}
