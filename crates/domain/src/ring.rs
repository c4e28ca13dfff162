//! Ring inventory: the bounded set of rings held by a Tower-of-Hanoi
//! apparatus.
//!
//! Keys identify rings; values are opaque payloads (colour, size, …). The
//! ring count is always read from the live collection, so it can never
//! drift from the actual contents.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use serde::Serialize;

use crate::device::Device;
use crate::error::{
    CapacityError, DuplicateKeyError, MissingResourceError, ValidationError, WorkcellError,
};

/// A device holding at most `max_rings` keyed rings.
///
/// Before the first insertion or replacement there is no collection at all;
/// [`rings`](Self::rings) returns `None` and the count is 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingInventory<K, V>
where
    K: Eq + Hash,
{
    device: Device,
    max_rings: usize,
    rings: Option<HashMap<K, V>>,
}

impl<K, V> RingInventory<K, V>
where
    K: Eq + Hash + Display,
{
    /// Create an empty inventory.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroCapacity`] when `max_rings` is 0.
    pub fn new(device: Device, max_rings: usize) -> Result<Self, WorkcellError> {
        if max_rings == 0 {
            return Err(ValidationError::ZeroCapacity.into());
        }
        Ok(Self {
            device,
            max_rings,
            rings: None,
        })
    }

    #[must_use]
    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut Device {
        &mut self.device
    }

    #[must_use]
    pub fn max_rings(&self) -> usize {
        self.max_rings
    }

    /// Number of rings currently held.
    #[must_use]
    pub fn num_rings(&self) -> usize {
        self.rings.as_ref().map_or(0, HashMap::len)
    }

    #[must_use]
    pub fn rings(&self) -> Option<&HashMap<K, V>> {
        self.rings.as_ref()
    }

    /// `true` after [`set_max_rings`](Self::set_max_rings) lowered the
    /// capacity below the current count.
    #[must_use]
    pub fn is_over_capacity(&self) -> bool {
        self.num_rings() > self.max_rings
    }

    /// Change the capacity. Rings beyond a smaller capacity are kept; the
    /// limit is only enforced by later insertions and replacements.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroCapacity`] when `max_rings` is 0.
    pub fn set_max_rings(&mut self, max_rings: usize) -> Result<(), WorkcellError> {
        if max_rings == 0 {
            return Err(ValidationError::ZeroCapacity.into());
        }
        self.max_rings = max_rings;
        Ok(())
    }

    /// Look a ring up by key.
    #[must_use]
    pub fn get_ring(&self, key: &K) -> Option<(&K, &V)> {
        self.rings.as_ref()?.get_key_value(key)
    }

    /// Like [`get_ring`](Self::get_ring) but reports a missing ring as an error.
    ///
    /// # Errors
    ///
    /// Returns [`MissingResourceError::RingNotFound`] when `key` is absent.
    pub fn require_ring(&self, key: &K) -> Result<(&K, &V), WorkcellError> {
        self.get_ring(key).ok_or_else(|| self.not_found(key))
    }

    /// Insert a new ring.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] when the inventory is full, or
    /// [`DuplicateKeyError`] when `key` is already present. Nothing changes
    /// in either case.
    pub fn add_ring(&mut self, key: K, value: V) -> Result<(), WorkcellError> {
        let count = self.num_rings();
        if count >= self.max_rings {
            return Err(CapacityError {
                device: self.device.name().to_string(),
                max: self.max_rings,
                requested: count + 1,
            }
            .into());
        }
        let rings = self.rings.get_or_insert_with(HashMap::new);
        if rings.contains_key(&key) {
            return Err(DuplicateKeyError {
                device: self.device.name().to_string(),
                key: key.to_string(),
            }
            .into());
        }
        rings.insert(key, value);
        Ok(())
    }

    /// Remove a ring, returning its payload.
    ///
    /// # Errors
    ///
    /// Returns [`MissingResourceError::EmptyRingSet`] when there are no rings
    /// and [`MissingResourceError::RingNotFound`] when `key` is absent.
    pub fn remove_ring(&mut self, key: &K) -> Result<V, WorkcellError> {
        if self.num_rings() == 0 {
            return Err(MissingResourceError::EmptyRingSet {
                device: self.device.name().to_string(),
            }
            .into());
        }
        match self.rings.as_mut().and_then(|rings| rings.remove(key)) {
            Some(value) => Ok(value),
            None => Err(self.not_found(key)),
        }
    }

    /// Replace the whole collection at once.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] and keeps the previous collection when
    /// `rings` holds more than `max_rings` entries.
    pub fn set_rings(&mut self, rings: HashMap<K, V>) -> Result<(), WorkcellError> {
        if rings.len() > self.max_rings {
            return Err(CapacityError {
                device: self.device.name().to_string(),
                max: self.max_rings,
                requested: rings.len(),
            }
            .into());
        }
        self.rings = Some(rings);
        Ok(())
    }

    fn not_found(&self, key: &K) -> WorkcellError {
        MissingResourceError::RingNotFound {
            device: self.device.name().to_string(),
            key: key.to_string(),
        }
        .into()
    }
}
