//! Traces: wires and buses tying pins together.
//!
//! A trace never stores per-driver state of its own. Each resolution scans
//! the member pins in the order they were added:
//!
//! 1. the first pin driving high makes the trace high;
//! 2. otherwise the first pin driving low makes it low;
//! 3. otherwise the trace's explicitly set value, if not floating;
//! 4. otherwise the trace's pull level.
//!
//! High therefore always beats low (wired-OR). Real contention between
//! opposing drivers would short the line; this model settles it
//! deterministically instead. The tie-break is load-bearing for chip
//! select decoding and must not be changed to an "error" result.

use crate::pin::{Pin, PinId};
use crate::signal::{Pull, Signal};

/// Handle to a trace owned by a [`Circuit`](crate::Circuit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceId(pub(crate) usize);

impl TraceId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One trace record in the circuit arena.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    pub(crate) pins: Vec<PinId>,
    pub(crate) pull: Pull,
    /// Value set on the trace itself rather than through a pin.
    pub(crate) value: Signal,
    pub(crate) level: Signal,
}

impl Trace {
    /// Member pins in membership order.
    #[must_use]
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    #[must_use]
    pub fn pull(&self) -> Pull {
        self.pull
    }

    /// Last resolved level.
    #[must_use]
    pub fn level(&self) -> Signal {
        self.level
    }

    /// Explicit value set on the trace, used when no pin drives it.
    #[must_use]
    pub fn value(&self) -> Signal {
        self.value
    }
}

/// Resolve the net level of a trace from its members' drive states.
///
/// Pure function of member order and drive state, the explicit value and
/// the pull setting.
pub fn resolve<'a>(
    members: impl IntoIterator<Item = &'a Pin> + Clone,
    value: Signal,
    pull: Pull,
) -> Signal {
    let drivers = || members.clone().into_iter().filter_map(Pin::driving);
    if let Some(high) = drivers().find(|s| s.is_high()) {
        return high;
    }
    if let Some(low) = drivers().find(|s| s.is_low()) {
        return low;
    }
    pull.apply(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::Mode;

    fn driver(level: Signal) -> Pin {
        let mut pin = Pin::new(0, "OUT", Mode::Output);
        pin.drive = level;
        pin.level = level;
        pin
    }

    #[test]
    fn high_driver_beats_low_driver() {
        let high_first = [driver(Signal::High), driver(Signal::Low)];
        let low_first = [driver(Signal::Low), driver(Signal::High)];
        assert_eq!(resolve(&high_first, Signal::Floating, Pull::None), Signal::High);
        assert_eq!(resolve(&low_first, Signal::Floating, Pull::None), Signal::High);
    }

    #[test]
    fn pull_never_overrides_an_active_driver() {
        let pins = [driver(Signal::Low)];
        assert_eq!(resolve(&pins, Signal::Floating, Pull::Up), Signal::Low);
        let pins = [driver(Signal::High)];
        assert_eq!(resolve(&pins, Signal::Floating, Pull::Down), Signal::High);
    }

    #[test]
    fn explicit_value_applies_without_drivers() {
        let pins = [driver(Signal::Floating), Pin::new(1, "IN", Mode::Input)];
        assert_eq!(resolve(&pins, Signal::Low, Pull::Up), Signal::Low);
        assert_eq!(resolve(&pins, Signal::Floating, Pull::Up), Signal::High);
    }

    #[test]
    fn pull_fallback_with_no_members() {
        let none: [Pin; 0] = [];
        assert_eq!(resolve(&none, Signal::Floating, Pull::Up), Signal::High);
        assert_eq!(resolve(&none, Signal::Floating, Pull::Down), Signal::Low);
        assert_eq!(resolve(&none, Signal::Floating, Pull::None), Signal::Floating);
    }

    #[test]
    fn input_pins_do_not_drive() {
        let mut input = Pin::new(0, "IN", Mode::Input);
        input.drive = Signal::High;
        input.level = Signal::High;
        assert_eq!(resolve(&[input], Signal::Floating, Pull::Down), Signal::Low);
    }

    #[test]
    fn resolution_is_repeatable() {
        let pins = [driver(Signal::Low), driver(Signal::Floating), driver(Signal::High)];
        let first = resolve(&pins, Signal::Floating, Pull::Down);
        for _ in 0..4 {
            assert_eq!(resolve(&pins, Signal::Floating, Pull::Down), first);
        }
    }
}
