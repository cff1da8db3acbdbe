//! Ports: a chip's named, numbered set of pins.

use std::collections::HashMap;
use std::ops::Index;

use crate::circuit::Circuit;
use crate::pin::{Mode, PinId};

/// The pins a chip exposes, looked up by pin number or by name.
#[derive(Debug, Clone, Default)]
pub struct Port {
    name: String,
    pins: Vec<PinId>,
    by_number: HashMap<usize, PinId>,
    by_name: HashMap<String, PinId>,
}

impl Port {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Create a pin in the circuit and register it with this port.
    pub fn add(&mut self, circuit: &mut Circuit, number: usize, name: &str, mode: Mode) -> PinId {
        let id = circuit.add_pin(number, name, mode);
        self.pins.push(id);
        self.by_number.insert(number, id);
        self.by_name.insert(name.to_string(), id);
        id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get(&self, number: usize) -> Option<PinId> {
        self.by_number.get(&number).copied()
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<PinId> {
        self.by_name.get(name).copied()
    }

    /// Pins in the order they were added.
    #[must_use]
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    /// Look up several pins by number, for building a bus.
    ///
    /// # Panics
    ///
    /// Panics if any number is not on this port.
    #[must_use]
    pub fn select(&self, numbers: &[usize]) -> Vec<PinId> {
        numbers.iter().map(|&n| self[n]).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PinId> + '_ {
        self.pins.iter().copied()
    }
}

impl Index<usize> for Port {
    type Output = PinId;

    fn index(&self, number: usize) -> &PinId {
        self.by_number
            .get(&number)
            .unwrap_or_else(|| panic!("{} has no pin {number}", self.name))
    }
}
