//! Errors raised while wiring a circuit.

use std::fmt;

use crate::connector::ConnectorId;
use crate::pin::PinId;
use crate::trace::TraceId;

/// A wiring request the circuit cannot honour.
///
/// Simulation itself never fails; these only come from building or
/// rewiring a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WiringError {
    /// The pin already belongs to a trace.
    PinAlreadyOnTrace { pin: PinId, trace: TraceId },
    /// The two connectors have different numbers of pins.
    WidthMismatch { left: usize, right: usize },
    /// The connector is already joined to another one.
    AlreadyJoined(ConnectorId),
}

impl fmt::Display for WiringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinAlreadyOnTrace { pin, trace } => write!(
                f,
                "pin {} is already on trace {}",
                pin.index(),
                trace.index()
            ),
            Self::WidthMismatch { left, right } => {
                write!(f, "connector widths differ: {left} vs {right} pins")
            }
            Self::AlreadyJoined(id) => write!(f, "connector {} is already joined", id.index()),
        }
    }
}

impl std::error::Error for WiringError {}
