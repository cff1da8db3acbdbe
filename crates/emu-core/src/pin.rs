//! Pins: single electrical terminals of a chip or port.

use crate::device::DeviceId;
use crate::signal::{Pull, Signal};
use crate::trace::TraceId;

/// Handle to a pin owned by a [`Circuit`](crate::Circuit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinId(pub(crate) usize);

impl PinId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Direction of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Mode {
    /// Neither drives nor observes its trace.
    #[default]
    Unconnected,
    Input,
    Output,
    Bidirectional,
}

impl Mode {
    /// Output and bidirectional pins may drive their trace.
    #[must_use]
    pub const fn is_output(self) -> bool {
        matches!(self, Mode::Output | Mode::Bidirectional)
    }

    /// Input and bidirectional pins observe their trace.
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Mode::Input | Mode::Bidirectional)
    }
}

/// One pin record in the circuit arena.
///
/// `drive` is what the pin last put out; `level` is what it currently
/// sees. They differ only for bidirectional pins after the trace has
/// pushed a level the pin did not drive itself.
#[derive(Debug, Clone)]
pub struct Pin {
    number: usize,
    name: String,
    pub(crate) mode: Mode,
    pub(crate) pull: Pull,
    pub(crate) level: Signal,
    pub(crate) drive: Signal,
    pub(crate) trace: Option<TraceId>,
    pub(crate) listeners: Vec<DeviceId>,
    /// Partner pin across a joined connector.
    pub(crate) partner: Option<PinId>,
}

impl Pin {
    pub(crate) fn new(number: usize, name: &str, mode: Mode) -> Self {
        Self {
            number,
            name: name.to_string(),
            mode,
            pull: Pull::None,
            level: Signal::Floating,
            drive: Signal::Floating,
            trace: None,
            listeners: Vec::new(),
            partner: None,
        }
    }

    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn pull(&self) -> Pull {
        self.pull
    }

    #[must_use]
    pub fn level(&self) -> Signal {
        self.level
    }

    #[must_use]
    pub fn trace(&self) -> Option<TraceId> {
        self.trace
    }

    /// Level this pin contributes to trace resolution, if any.
    #[must_use]
    pub fn driving(&self) -> Option<Signal> {
        if self.mode.is_output() && !self.drive.is_floating() {
            Some(self.drive)
        } else {
            None
        }
    }

    #[must_use]
    pub fn listeners(&self) -> &[DeviceId] {
        &self.listeners
    }
}
