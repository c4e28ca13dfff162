//! Typed identifier newtypes backed by UUIDs.
//!
//! Names are the human identity of a device and may change at any time;
//! these ids stay fixed so events can always be attributed.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Random v4 id.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// First eight hex digits, enough to tell devices apart in logs.
            #[must_use]
            pub fn short(self) -> String {
                let mut text = self.0.simple().to_string();
                text.truncate(8);
                text
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Stable identity of a [`Device`](crate::device::Device), carried by
    /// every event it produces.
    DeviceId
);

define_id!(
    /// Identity of a [`Vial`](crate::vial::Vial).
    VialId
);

define_id!(
    /// Identity of an [`Event`](crate::event::Event).
    EventId
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Device;
    use crate::door::DoorState;
    use crate::event::{Event, EventKind};

    #[test]
    fn should_give_each_built_device_its_own_id() {
        let a = Device::builder().name("Oven").build().unwrap();
        let b = Device::builder().name("Oven").build().unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn should_keep_device_id_when_renamed() {
        let mut device = Device::builder().name("Oven").build().unwrap();
        let id = device.id();
        device.set_name("Kiln").unwrap();
        assert_eq!(device.id(), id);
    }

    #[test]
    fn should_shorten_to_leading_hex_digits_of_display() {
        let id = DeviceId::new();
        let short = id.short();
        assert_eq!(short.len(), 8);
        assert!(short.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(id.to_string().starts_with(&short));
    }

    #[test]
    fn should_serialize_event_ids_as_plain_uuid_strings() {
        let device = DeviceId::new();
        let event = Event::new(device, EventKind::DoorChanged { state: DoorState::Open });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["device_id"], device.to_string());
        assert_eq!(json["id"], event.id.to_string());
    }
}
