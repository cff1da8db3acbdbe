//! Pin-level signal substrate for chip emulation.
//!
//! Chips are wired together the way they are on a board: each chip owns
//! pins, pins are tied together by traces, and a chip reacts when a pin it
//! listens to sees a new level. Everything lives in one [`Circuit`] arena
//! and is addressed by handle.
//!
//! ```
//! use emu_core::{Circuit, Mode, Signal};
//!
//! let mut circuit = Circuit::new();
//! let out = circuit.add_pin(1, "Q", Mode::Output);
//! let inp = circuit.add_pin(2, "D", Mode::Input);
//! circuit.add_trace(&[out, inp]).unwrap();
//!
//! circuit.set_high(out);
//! assert_eq!(circuit.level(inp), Signal::High);
//! ```

mod circuit;
mod connector;
mod device;
mod error;
mod observable;
mod pin;
mod port;
mod signal;
mod trace;

pub use circuit::Circuit;
pub use connector::{Connector, ConnectorId};
pub use device::{Device, DeviceId};
pub use error::WiringError;
pub use observable::{Observable, Value};
pub use pin::{Mode, Pin, PinId};
pub use port::Port;
pub use signal::{Pull, Signal};
pub use trace::{Trace, TraceId, resolve};
