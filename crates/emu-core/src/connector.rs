//! Connectors: detachable plugs such as the cartridge or user port.
//!
//! Joining two connectors pairs their pins by position. Each pair then acts
//! as one wire: the traces on both sides resolve together, so a driver on
//! either side is seen on the other and a pull on either side applies to
//! both. Splitting them gives each side back its own resolution.

use log::trace;

use crate::circuit::Circuit;
use crate::error::WiringError;
use crate::pin::PinId;

/// Handle to a connector owned by a [`Circuit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorId(pub(crate) usize);

impl ConnectorId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Connector {
    pins: Vec<PinId>,
    joined: Option<ConnectorId>,
}

impl Connector {
    #[must_use]
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    #[must_use]
    pub fn joined(&self) -> Option<ConnectorId> {
        self.joined
    }
}

impl Circuit {
    /// Group existing pins into a connector. Pin order defines pairing.
    pub fn add_connector(&mut self, pins: &[PinId]) -> ConnectorId {
        let id = ConnectorId(self.connectors.len());
        self.connectors.push(Connector {
            pins: pins.to_vec(),
            joined: None,
        });
        id
    }

    #[must_use]
    pub fn connector(&self, id: ConnectorId) -> &Connector {
        &self.connectors[id.0]
    }

    /// Plug two connectors together.
    pub fn join(&mut self, a: ConnectorId, b: ConnectorId) -> Result<(), WiringError> {
        for id in [a, b] {
            if self.connectors[id.0].joined.is_some() {
                return Err(WiringError::AlreadyJoined(id));
            }
        }
        if a == b {
            return Err(WiringError::AlreadyJoined(a));
        }
        let (left, right) = (self.connectors[a.0].pins.len(), self.connectors[b.0].pins.len());
        if left != right {
            return Err(WiringError::WidthMismatch { left, right });
        }

        let pairs: Vec<(PinId, PinId)> = self.connectors[a.0]
            .pins
            .iter()
            .copied()
            .zip(self.connectors[b.0].pins.iter().copied())
            .collect();
        for &(pa, pb) in &pairs {
            self.set_partner(pa, Some(pb));
            self.set_partner(pb, Some(pa));
        }
        self.connectors[a.0].joined = Some(b);
        self.connectors[b.0].joined = Some(a);
        for &(pa, _) in &pairs {
            self.resolve_pin(pa);
        }
        trace!("joined connector {} to {} ({left} pins)", a.0, b.0);
        self.commit();
        Ok(())
    }

    /// Unplug a connector from its partner. Does nothing if not joined.
    pub fn split(&mut self, id: ConnectorId) {
        let Some(other) = self.connectors[id.0].joined.take() else {
            return;
        };
        self.connectors[other.0].joined = None;

        let pairs: Vec<(PinId, PinId)> = self.connectors[id.0]
            .pins
            .iter()
            .copied()
            .zip(self.connectors[other.0].pins.iter().copied())
            .collect();
        for (pa, pb) in pairs {
            self.set_partner(pa, None);
            self.set_partner(pb, None);
            self.resolve_pin(pa);
            self.resolve_pin(pb);
        }
        trace!("split connector {} from {}", id.0, other.0);
        self.commit();
    }
}
