//! Device: a named piece of workcell equipment with an optional door.

use serde::Serialize;

use crate::door::{Door, DoorAttribute, DoorState};
use crate::error::{MissingResourceError, ValidationError, WorkcellError};
use crate::id::DeviceId;

/// Base equipment record shared by every device kind.
///
/// The door is either absent or fully populated. A doorless device only
/// gains a door through [`set_door`](Self::set_door).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    id: DeviceId,
    name: String,
    door: Option<Door>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn door(&self) -> Option<&Door> {
        self.door.as_ref()
    }

    /// The door, if the device has one.
    pub fn door_mut(&mut self) -> Option<&mut Door> {
        self.door.as_mut()
    }

    /// Current door state, or `None` for a doorless device.
    #[must_use]
    pub fn door_state(&self) -> Option<DoorState> {
        self.door.as_ref().map(|door| door.state)
    }

    /// Rename the device.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] and keeps the old name when
    /// `name` is empty.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), WorkcellError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        self.name = name;
        Ok(())
    }

    /// Replace the door wholesale. This is the only way to give a doorless
    /// device a door.
    pub fn set_door(&mut self, door: Door) {
        self.door = Some(door);
    }

    /// Mutate one field of the existing door.
    ///
    /// # Errors
    ///
    /// Returns [`MissingResourceError::NoDoor`] and changes nothing when the
    /// device has no door.
    pub fn set_door_attribute(&mut self, attribute: DoorAttribute) -> Result<(), WorkcellError> {
        let Some(door) = self.door.as_mut() else {
            return Err(MissingResourceError::NoDoor {
                device: self.name.clone(),
            }
            .into());
        };
        door.apply(attribute);
        Ok(())
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`WorkcellError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), WorkcellError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: Option<String>,
    door: Option<Door>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn door(mut self, door: Door) -> Self {
        self.door = Some(door);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkcellError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Device, WorkcellError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            door: self.door,
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::door::Plane;

    fn doorless() -> Device {
        Device::builder().name("Shaker").build().unwrap()
    }

    fn with_door() -> Device {
        Device::builder()
            .name("Incubator")
            .door(Door::new(Plane::South, DoorState::Closed, Duration::from_secs(1)))
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_device_without_door() {
        let device = doorless();
        assert_eq!(device.name(), "Shaker");
        assert!(device.door().is_none());
        assert_eq!(device.door_state(), None);
    }

    #[test]
    fn should_return_validation_error_when_name_missing() {
        let result = Device::builder().build();
        assert!(matches!(
            result,
            Err(WorkcellError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_rename_device() {
        let mut device = doorless();
        device.set_name("Orbital Shaker").unwrap();
        assert_eq!(device.name(), "Orbital Shaker");
    }

    #[test]
    fn should_keep_old_name_when_renaming_to_empty() {
        let mut device = doorless();
        let result = device.set_name("");
        assert!(result.is_err());
        assert_eq!(device.name(), "Shaker");
    }

    #[test]
    fn should_reject_door_attribute_on_doorless_device_without_change() {
        let mut device = doorless();
        let before = device.clone();

        let result = device.set_door_attribute(DoorAttribute::State(DoorState::Open));

        assert!(matches!(
            result,
            Err(WorkcellError::MissingResource(MissingResourceError::NoDoor { .. }))
        ));
        assert_eq!(device, before);
    }

    #[test]
    fn should_reject_every_door_attribute_kind_on_doorless_device() {
        let attributes = [
            DoorAttribute::Plane(Plane::East),
            DoorAttribute::State(DoorState::Closed),
            DoorAttribute::MoveTime(Duration::from_secs(3)),
        ];
        for attribute in attributes {
            let mut device = doorless();
            assert!(device.set_door_attribute(attribute).is_err());
            assert!(device.door().is_none());
        }
    }

    #[test]
    fn should_change_door_state_when_door_exists() {
        let mut device = with_door();
        device
            .set_door_attribute(DoorAttribute::State(DoorState::Open))
            .unwrap();
        assert_eq!(device.door_state(), Some(DoorState::Open));
    }

    #[test]
    fn should_create_door_on_doorless_device_with_set_door() {
        let mut device = doorless();
        device.set_door(Door::new(Plane::Top, DoorState::Open, Duration::ZERO));
        assert_eq!(device.door_state(), Some(DoorState::Open));
        assert_eq!(device.door().map(|d| d.plane), Some(Plane::Top));
    }

    #[test]
    fn should_change_door_in_place_through_door_mut() {
        let mut device = with_door();
        if let Some(door) = device.door_mut() {
            door.apply(DoorAttribute::MoveTime(Duration::from_millis(250)));
        }
        assert_eq!(
            device.door().map(|d| d.move_time),
            Some(Duration::from_millis(250))
        );
        assert!(doorless().door_mut().is_none());
    }

    #[test]
    fn should_serialize_name_and_door_as_snapshot() {
        let device = with_door();
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["id"], device.id().to_string());
        assert_eq!(json["name"], "Incubator");
        assert_eq!(json["door"]["state"], "closed");
        let json = serde_json::to_value(doorless()).unwrap();
        assert_eq!(json["door"], serde_json::Value::Null);
    }

    #[test]
    fn should_replace_existing_door_wholesale() {
        let mut device = with_door();
        device.set_door(Door::new(Plane::West, DoorState::Open, Duration::from_secs(4)));
        let door = device.door().unwrap();
        assert_eq!(door.plane, Plane::West);
        assert_eq!(door.state, DoorState::Open);
        assert_eq!(door.move_time, Duration::from_secs(4));
    }
}
