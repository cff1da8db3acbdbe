//! Devices: chips that react to level changes on their pins.

use std::any::Any;

use crate::circuit::Circuit;
use crate::pin::PinId;

/// Handle to a device owned by a [`Circuit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub(crate) usize);

/// A chip (or any other listener) attached to the circuit.
///
/// A device registers itself as a listener on the pins it cares about
/// with [`Circuit::add_listener`]. When one of those pins observes a new
/// level the circuit calls [`Device::update`] with that pin.
///
/// Mutations made from inside `update` are queued. A device that needs
/// other chips to react before it continues (for example a video chip
/// waiting for memory to answer an address) calls [`Circuit::settle`].
pub trait Device: Any {
    fn update(&mut self, circuit: &mut Circuit, pin: PinId);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
