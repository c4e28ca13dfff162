//! Device service: use-cases for running actions and moving doors.

use std::time::Duration;

use workcell_domain::action::ActionableDevice;
use workcell_domain::device::Device;
use workcell_domain::door::{DoorAttribute, DoorState};
use workcell_domain::error::WorkcellError;
use workcell_domain::event::{Event, EventKind};

use crate::ports::{EventPublisher, Scheduler};

/// Application service driving device state machines.
///
/// Each call runs to completion, including its wait, before returning.
/// Callers serialize access to a device; the service holds no locks.
pub struct DeviceService<S, P> {
    scheduler: S,
    publisher: P,
}

impl<S, P> DeviceService<S, P>
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

    /// Start the device's action, then suspend for `delay`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkcellError::InvalidTransition`] when the action is
    /// already running. Under the door-coupled policy the door has still
    /// been opened.
    #[tracing::instrument(skip(self, device), fields(device = %device.device().name(), action = %device.action_name()))]
    pub async fn run_action(
        &self,
        device: &mut ActionableDevice,
        delay: Duration,
    ) -> Result<(), WorkcellError> {
        let door_before = device.device().door_state();
        let result = device.start();
        self.announce_door(device.device(), door_before).await;

        if let Err(err) = result {
            tracing::warn!(%err, "run rejected");
            return Err(err);
        }
        tracing::info!("running action");
        self.announce(
            device.device(),
            EventKind::ActionStarted {
                action: device.action_name().to_string(),
            },
        )
        .await;
        self.scheduler.wait(delay).await;
        Ok(())
    }

    /// Stop the device's action, then suspend for `delay`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkcellError::InvalidTransition`] when the action is not
    /// running; nothing changes in that case.
    #[tracing::instrument(skip(self, device), fields(device = %device.device().name(), action = %device.action_name()))]
    pub async fn stop_action(
        &self,
        device: &mut ActionableDevice,
        delay: Duration,
    ) -> Result<(), WorkcellError> {
        let door_before = device.device().door_state();
        if let Err(err) = device.stop() {
            tracing::warn!(%err, "stop rejected");
            return Err(err);
        }
        tracing::info!("stopping action");
        self.announce(
            device.device(),
            EventKind::ActionStopped {
                action: device.action_name().to_string(),
            },
        )
        .await;
        self.announce_door(device.device(), door_before).await;
        self.scheduler.wait(delay).await;
        Ok(())
    }

    /// Open or close the door and wait for its move time.
    ///
    /// # Errors
    ///
    /// Returns [`WorkcellError::MissingResource`] when the device has no door.
    #[tracing::instrument(skip(self, device), fields(device = %device.name()))]
    pub async fn set_door_state(
        &self,
        device: &mut Device,
        state: DoorState,
    ) -> Result<(), WorkcellError> {
        let door_before = device.door_state();
        if let Err(err) = device.set_door_attribute(DoorAttribute::State(state)) {
            tracing::warn!(%err, "door change rejected");
            return Err(err);
        }
        if door_before != Some(state) {
            self.announce_door(device, door_before).await;
            if let Some(door) = device.door() {
                self.scheduler.wait(door.move_time).await;
            }
        }
        Ok(())
    }

    async fn announce_door(&self, device: &Device, before: Option<DoorState>) {
        match device.door_state() {
            Some(state) if Some(state) != before => {
                tracing::debug!(%state, "door moved");
                self.announce(device, EventKind::DoorChanged { state }).await;
            }
            _ => {}
        }
    }

    async fn announce(&self, device: &Device, kind: EventKind) {
        // event delivery never fails an operation
        let _ = self.publisher.publish(Event::new(device.id(), kind)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, CollectingPublisher, RecordingScheduler, calls, journal};
    use workcell_domain::action::ActionPolicy;
    use workcell_domain::door::{Door, Plane};
    use workcell_domain::error::{MissingResourceError, TransitionError};

    fn smart_device(policy: ActionPolicy) -> ActionableDevice {
        let device = Device::builder()
            .name("Thermocycler")
            .door(Door::new(
                Plane::North,
                DoorState::Closed,
                Duration::from_millis(500),
            ))
            .build()
            .unwrap();
        ActionableDevice::new(device, "cycle")
            .unwrap()
            .with_policy(policy)
    }

    fn service() -> (
        DeviceService<RecordingScheduler, CollectingPublisher>,
        crate::testing::Journal,
        CollectingPublisher,
    ) {
        let journal = journal();
        let publisher = CollectingPublisher::default();
        let svc = DeviceService::new(RecordingScheduler(journal.clone()), publisher.clone());
        (svc, journal, publisher)
    }

    fn kinds(publisher: &CollectingPublisher) -> Vec<EventKind> {
        publisher.events().into_iter().map(|e| e.kind).collect()
    }

    #[tokio::test]
    async fn should_open_door_activate_and_wait_when_running() {
        let (svc, journal, publisher) = service();
        let mut device = smart_device(ActionPolicy::DoorCoupled);

        svc.run_action(&mut device, Duration::from_secs(1))
            .await
            .unwrap();

        assert!(device.is_active());
        assert_eq!(device.device().door_state(), Some(DoorState::Open));
        assert_eq!(calls(&journal), vec![Call::Wait(Duration::from_secs(1))]);
        assert_eq!(
            kinds(&publisher),
            vec![
                EventKind::DoorChanged {
                    state: DoorState::Open
                },
                EventKind::ActionStarted {
                    action: "cycle".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn should_close_door_and_deactivate_when_stopping() {
        let (svc, journal, publisher) = service();
        let mut device = smart_device(ActionPolicy::DoorCoupled);
        svc.run_action(&mut device, Duration::from_secs(1))
            .await
            .unwrap();

        svc.stop_action(&mut device, Duration::from_secs(1))
            .await
            .unwrap();

        assert!(!device.is_active());
        assert_eq!(device.device().door_state(), Some(DoorState::Closed));
        assert_eq!(calls(&journal).len(), 2);
        let events = kinds(&publisher);
        assert_eq!(
            events[2..],
            [
                EventKind::ActionStopped {
                    action: "cycle".to_string()
                },
                EventKind::DoorChanged {
                    state: DoorState::Closed
                },
            ]
        );
    }

    #[tokio::test]
    async fn should_reject_second_run_without_waiting() {
        let (svc, journal, _) = service();
        let mut device = smart_device(ActionPolicy::DoorCoupled);
        svc.run_action(&mut device, Duration::from_secs(1))
            .await
            .unwrap();

        let result = svc.run_action(&mut device, Duration::from_secs(5)).await;

        assert!(matches!(
            result,
            Err(WorkcellError::InvalidTransition(TransitionError::AlreadyActive { .. }))
        ));
        assert!(device.is_active());
        assert_eq!(device.action_name(), "cycle");
        assert_eq!(calls(&journal), vec![Call::Wait(Duration::from_secs(1))]);
    }

    #[tokio::test]
    async fn should_reject_stop_when_inactive() {
        let (svc, journal, publisher) = service();
        let mut device = smart_device(ActionPolicy::DoorCoupled);
        let before = device.clone();

        let result = svc.stop_action(&mut device, Duration::from_secs(1)).await;

        assert!(matches!(
            result,
            Err(WorkcellError::InvalidTransition(TransitionError::NotActive { .. }))
        ));
        assert_eq!(device, before);
        assert!(calls(&journal).is_empty());
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn should_not_touch_door_when_policy_is_independent() {
        let (svc, _, publisher) = service();
        let mut device = smart_device(ActionPolicy::DoorIndependent);

        svc.run_action(&mut device, Duration::ZERO).await.unwrap();
        svc.stop_action(&mut device, Duration::ZERO).await.unwrap();

        assert_eq!(device.device().door_state(), Some(DoorState::Closed));
        assert!(
            kinds(&publisher)
                .iter()
                .all(|k| !matches!(k, EventKind::DoorChanged { .. }))
        );
    }

    #[tokio::test]
    async fn should_wait_for_door_move_time_when_opening() {
        let (svc, journal, _) = service();
        let mut device = smart_device(ActionPolicy::DoorCoupled);

        svc.set_door_state(device.device_mut(), DoorState::Open)
            .await
            .unwrap();

        assert_eq!(device.device().door_state(), Some(DoorState::Open));
        assert_eq!(calls(&journal), vec![Call::Wait(Duration::from_millis(500))]);
    }

    #[tokio::test]
    async fn should_skip_wait_when_door_already_in_state() {
        let (svc, journal, publisher) = service();
        let mut device = smart_device(ActionPolicy::DoorCoupled);

        svc.set_door_state(device.device_mut(), DoorState::Closed)
            .await
            .unwrap();

        assert!(calls(&journal).is_empty());
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn should_report_missing_door() {
        let (svc, _, _) = service();
        let mut device = Device::builder().name("Balance").build().unwrap();

        let result = svc.set_door_state(&mut device, DoorState::Open).await;

        assert!(matches!(
            result,
            Err(WorkcellError::MissingResource(MissingResourceError::NoDoor { .. }))
        ));
        assert!(device.door().is_none());
    }
}
