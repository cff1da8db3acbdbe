//! Tri-state logic levels and pull policies.

/// The value carried by a pin or trace.
///
/// Levels are ideal digital values. There is no notion of voltage or
/// propagation delay; a line is driven low, driven high, or not driven at
/// all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Signal {
    Low,
    High,
    /// Nothing is driving the line.
    #[default]
    Floating,
}

impl Signal {
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, Signal::High)
    }

    #[must_use]
    pub const fn is_low(self) -> bool {
        matches!(self, Signal::Low)
    }

    #[must_use]
    pub const fn is_floating(self) -> bool {
        matches!(self, Signal::Floating)
    }

    /// The opposite driven level. A floating line toggles high.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Signal::High => Signal::Low,
            Signal::Low | Signal::Floating => Signal::High,
        }
    }

    /// Value of this level as a single bit; floating reads as 0.
    #[must_use]
    pub const fn bit(self) -> u16 {
        match self {
            Signal::High => 1,
            Signal::Low | Signal::Floating => 0,
        }
    }
}

impl From<bool> for Signal {
    fn from(v: bool) -> Self {
        if v { Signal::High } else { Signal::Low }
    }
}

/// Pull resistor setting of a pin or trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Pull {
    #[default]
    None,
    Up,
    Down,
}

impl Pull {
    /// Level supplied when nothing drives the line.
    #[must_use]
    pub const fn level(self) -> Signal {
        match self {
            Pull::None => Signal::Floating,
            Pull::Up => Signal::High,
            Pull::Down => Signal::Low,
        }
    }

    /// `level` unless it is floating, in which case the pull level.
    #[must_use]
    pub const fn apply(self, level: Signal) -> Signal {
        match level {
            Signal::Floating => self.level(),
            driven => driven,
        }
    }
}
