//! Read-only inspection of chip state.
//!
//! Chips expose their internal counters and latches through dotted paths
//! such as `raster` or `sprite3.mc`. Queries never change chip state.

use std::fmt;

use crate::signal::Signal;

/// A dynamically-typed value returned by a state query.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    Level(Signal),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "${v:02X}"),
            Value::U16(v) => write!(f, "${v:04X}"),
            Value::Level(Signal::High) => f.write_str("1"),
            Value::Level(Signal::Low) => f.write_str("0"),
            Value::Level(Signal::Floating) => f.write_str("Z"),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<Signal> for Value {
    fn from(v: Signal) -> Self {
        Value::Level(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// A chip whose state can be inspected between half-cycles.
pub trait Observable {
    /// Query one property by dotted path, or `None` for an unknown path.
    fn query(&self, path: &str) -> Option<Value>;

    /// Every path `query` answers.
    fn query_paths(&self) -> Vec<String>;

    /// All paths with their current values, in `query_paths` order.
    fn snapshot(&self) -> Vec<(String, Value)> {
        self.query_paths()
            .into_iter()
            .filter_map(|path| self.query(&path).map(|value| (path, value)))
            .collect()
    }
}
