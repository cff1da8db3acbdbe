//! The circuit arena: every pin, trace, device and connector lives here.
//!
//! Pins and traces are addressed by handles rather than references, so the
//! pin ↔ trace ↔ listener graph has no ownership cycles. A pin records the
//! trace it belongs to; a trace records its pins in membership order.
//!
//! # Propagation
//!
//! Setting a level resolves the affected trace immediately and pushes the
//! result into every member pin. Pins that observe a new value put one
//! notification per listener onto a FIFO queue. A top-level mutation
//! drains that queue before returning, so no partially propagated state is
//! ever visible from outside. Listener order is trace-membership order,
//! then registration order.
//!
//! Pins paired through joined connectors tie their traces into one net:
//! resolution then runs over every member of every linked trace.
//!
//! Wiring a combinational loop that never settles (an odd number of
//! inversions with no clocked break) makes the drain loop spin. Avoiding
//! that is the board builder's job.

use std::collections::VecDeque;

use crate::connector::Connector;
use crate::device::{Device, DeviceId};
use crate::error::WiringError;
use crate::pin::{Mode, Pin, PinId};
use crate::signal::{Pull, Signal};
use crate::trace::{self, Trace, TraceId};

/// A pin the device listens to observed a new level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Notify {
    device: DeviceId,
    pin: PinId,
}

/// Traces and pins that currently resolve as one electrical node.
#[derive(Debug, Default)]
struct Net {
    traces: Vec<TraceId>,
    pins: Vec<PinId>,
}

/// Arena of pins, traces, devices and connectors.
pub struct Circuit {
    pins: Vec<Pin>,
    traces: Vec<Trace>,
    devices: Vec<Option<Box<dyn Device>>>,
    pub(crate) connectors: Vec<Connector>,
    queue: VecDeque<Notify>,
    /// Devices whose `update` is on the call stack (or being built).
    running: Vec<DeviceId>,
    draining: bool,
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl Circuit {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pins: Vec::new(),
            traces: Vec::new(),
            devices: Vec::new(),
            connectors: Vec::new(),
            queue: VecDeque::new(),
            running: Vec::new(),
            draining: false,
        }
    }

    // --- Pins ---

    pub fn add_pin(&mut self, number: usize, name: &str, mode: Mode) -> PinId {
        let id = PinId(self.pins.len());
        self.pins.push(Pin::new(number, name, mode));
        id
    }

    #[must_use]
    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.0]
    }

    #[must_use]
    pub fn level(&self, id: PinId) -> Signal {
        self.pins[id.0].level
    }

    #[must_use]
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Drive a level out of a pin. Pins that cannot output ignore this.
    pub fn set_level(&mut self, pin: PinId, level: Signal) {
        self.drive(pin, level);
        self.commit();
    }

    pub fn set_high(&mut self, pin: PinId) {
        self.set_level(pin, Signal::High);
    }

    pub fn set_low(&mut self, pin: PinId) {
        self.set_level(pin, Signal::Low);
    }

    pub fn float(&mut self, pin: PinId) {
        self.set_level(pin, Signal::Floating);
    }

    pub fn toggle(&mut self, pin: PinId) {
        let level = self.pins[pin.0].level.toggled();
        self.set_level(pin, level);
    }

    pub fn set_mode(&mut self, pin: PinId, mode: Mode) {
        self.apply_mode(pin, mode);
        self.commit();
    }

    /// Change the mode of several pins, propagating once at the end.
    pub fn set_modes(&mut self, pins: &[PinId], mode: Mode) {
        for &pin in pins {
            self.apply_mode(pin, mode);
        }
        self.commit();
    }

    pub fn set_pull(&mut self, pin: PinId, pull: Pull) {
        let p = &mut self.pins[pin.0];
        p.pull = pull;
        if p.trace.is_some() || p.partner.is_some() {
            self.resolve_pin(pin);
        } else if !p.mode.is_output() {
            p.level = pull.level();
        }
        self.commit();
    }

    pub fn pull_up(&mut self, pin: PinId) {
        self.set_pull(pin, Pull::Up);
    }

    pub fn pull_down(&mut self, pin: PinId) {
        self.set_pull(pin, Pull::Down);
    }

    pub fn no_pull(&mut self, pin: PinId) {
        self.set_pull(pin, Pull::None);
    }

    /// Register `device` to be updated whenever `pin` observes a new level.
    pub fn add_listener(&mut self, pin: PinId, device: DeviceId) {
        self.pins[pin.0].listeners.push(device);
    }

    // --- Traces ---

    /// Tie pins together into a new trace.
    pub fn add_trace(&mut self, pins: &[PinId]) -> Result<TraceId, WiringError> {
        let id = TraceId(self.traces.len());
        self.check_free(pins, id)?;
        self.traces.push(Trace::default());
        self.attach(id, pins);
        Ok(id)
    }

    /// Add more pins to an existing trace.
    pub fn add_pins(&mut self, trace: TraceId, pins: &[PinId]) -> Result<(), WiringError> {
        self.check_free(pins, trace)?;
        self.attach(trace, pins);
        Ok(())
    }

    #[must_use]
    pub fn trace(&self, id: TraceId) -> &Trace {
        &self.traces[id.0]
    }

    #[must_use]
    pub fn trace_level(&self, id: TraceId) -> Signal {
        self.traces[id.0].level
    }

    /// Set a trace's explicit value. Active drivers still take priority.
    pub fn set_trace_level(&mut self, trace: TraceId, level: Signal) {
        self.traces[trace.0].value = level;
        self.resolve(trace);
        self.commit();
    }

    pub fn set_trace_high(&mut self, trace: TraceId) {
        self.set_trace_level(trace, Signal::High);
    }

    pub fn set_trace_low(&mut self, trace: TraceId) {
        self.set_trace_level(trace, Signal::Low);
    }

    pub fn float_trace(&mut self, trace: TraceId) {
        self.set_trace_level(trace, Signal::Floating);
    }

    pub fn toggle_trace(&mut self, trace: TraceId) {
        let level = self.traces[trace.0].level.toggled();
        self.set_trace_level(trace, level);
    }

    pub fn set_trace_pull(&mut self, trace: TraceId, pull: Pull) {
        self.traces[trace.0].pull = pull;
        self.resolve(trace);
        self.commit();
    }

    // --- Devices ---

    /// Build a device and install it.
    ///
    /// The builder gets the circuit (to create pins and register
    /// listeners) and the id the device will have. Notifications aimed at
    /// the device while it is being built are delivered once it is
    /// installed.
    pub fn add_device<D, F>(&mut self, build: F) -> DeviceId
    where
        D: Device,
        F: FnOnce(&mut Circuit, DeviceId) -> D,
    {
        let id = DeviceId(self.devices.len());
        self.devices.push(None);
        self.running.push(id);
        let device = build(self, id);
        self.running.pop();
        self.devices[id.0] = Some(Box::new(device));
        self.commit();
        id
    }

    #[must_use]
    pub fn device<T: Device>(&self, id: DeviceId) -> Option<&T> {
        self.devices
            .get(id.0)?
            .as_ref()?
            .as_any()
            .downcast_ref::<T>()
    }

    pub fn device_mut<T: Device>(&mut self, id: DeviceId) -> Option<&mut T> {
        self.devices
            .get_mut(id.0)?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Deliver every pending notification now.
    ///
    /// Called by a device in the middle of its own `update` when it needs
    /// other chips to respond before it carries on. Notifications for the
    /// calling device are held back until its `update` returns.
    pub fn settle(&mut self) {
        let was_draining = std::mem::replace(&mut self.draining, true);
        self.drain();
        self.draining = was_draining;
    }

    // --- Buses ---

    /// Read pins as a little-endian value: bit `i` comes from `pins[i]`.
    /// Floating pins read as 0.
    #[must_use]
    pub fn read_value(&self, pins: &[PinId]) -> u16 {
        assert!(pins.len() <= 16, "bus wider than 16 bits");
        pins.iter()
            .enumerate()
            .fold(0, |acc, (bit, pin)| acc | (self.pins[pin.0].level.bit() << bit))
    }

    /// Drive a value onto pins, bit `i` onto `pins[i]`, then propagate once.
    pub fn write_value(&mut self, pins: &[PinId], value: u16) {
        assert!(pins.len() <= 16, "bus wider than 16 bits");
        for (bit, &pin) in pins.iter().enumerate() {
            self.drive(pin, Signal::from((value >> bit) & 1 != 0));
        }
        self.commit();
    }

    /// Stop driving all of `pins`, then propagate once.
    pub fn float_all(&mut self, pins: &[PinId]) {
        for &pin in pins {
            self.drive(pin, Signal::Floating);
        }
        self.commit();
    }

    // --- Internals ---

    fn check_free(&self, pins: &[PinId], target: TraceId) -> Result<(), WiringError> {
        for &pin in pins {
            match self.pins[pin.0].trace {
                Some(trace) if trace != target => {
                    return Err(WiringError::PinAlreadyOnTrace { pin, trace });
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn attach(&mut self, trace: TraceId, pins: &[PinId]) {
        for &pin in pins {
            if self.pins[pin.0].trace.is_none() {
                self.pins[pin.0].trace = Some(trace);
                self.traces[trace.0].pins.push(pin);
            }
        }
        self.resolve(trace);
        self.commit();
    }

    /// Set a pin's drive without draining the queue.
    fn drive(&mut self, pin: PinId, level: Signal) {
        let p = &mut self.pins[pin.0];
        if !p.mode.is_output() {
            return;
        }
        p.drive = level;
        p.level = level;
        if p.trace.is_some() || p.partner.is_some() {
            self.resolve_pin(pin);
        }
    }

    fn apply_mode(&mut self, pin: PinId, mode: Mode) {
        let p = &mut self.pins[pin.0];
        let old = p.mode;
        if old == mode {
            return;
        }
        p.mode = mode;
        if mode.is_output() && !old.is_output() {
            // Start asserting whatever the pin currently holds.
            p.drive = p.level;
        } else if !mode.is_output() && old.is_output() {
            p.drive = Signal::Floating;
        }
        if p.trace.is_some() || p.partner.is_some() {
            self.resolve_pin(pin);
        }
    }

    /// Collect the net containing `trace` and/or `pin`, following
    /// connector partners. Seed trace members come first, in membership
    /// order.
    fn net(&self, trace: Option<TraceId>, pin: Option<PinId>) -> Net {
        let mut net = Net::default();
        let mut pending: Vec<PinId> = pin.into_iter().collect();
        if let Some(trace) = trace {
            self.take_trace(trace, &mut net, &mut pending);
        }
        while let Some(pin) = pending.pop() {
            match self.pins[pin.0].trace {
                Some(trace) if !net.traces.contains(&trace) => {
                    self.take_trace(trace, &mut net, &mut pending);
                }
                Some(_) => {}
                None if !net.pins.contains(&pin) => {
                    net.pins.push(pin);
                    pending.extend(self.pins[pin.0].partner);
                }
                None => {}
            }
        }
        net
    }

    fn take_trace(&self, trace: TraceId, net: &mut Net, pending: &mut Vec<PinId>) {
        net.traces.push(trace);
        for &pin in &self.traces[trace.0].pins {
            net.pins.push(pin);
            pending.extend(self.pins[pin.0].partner);
        }
    }

    /// Re-resolve a trace and push its level into every pin of its net.
    fn resolve(&mut self, trace: TraceId) {
        let net = self.net(Some(trace), None);
        self.resolve_net(&net);
    }

    /// Re-resolve whatever net a pin belongs to.
    pub(crate) fn resolve_pin(&mut self, pin: PinId) {
        let net = self.net(None, Some(pin));
        self.resolve_net(&net);
    }

    fn resolve_net(&mut self, net: &Net) {
        let value = net
            .traces
            .iter()
            .map(|t| self.traces[t.0].value)
            .find(|v| !v.is_floating())
            .unwrap_or_default();
        let pull = net
            .traces
            .iter()
            .map(|t| self.traces[t.0].pull)
            .find(|p| *p != Pull::None)
            .unwrap_or_default();
        let level = trace::resolve(net.pins.iter().map(|id| &self.pins[id.0]), value, pull);
        for trace in &net.traces {
            self.traces[trace.0].level = level;
        }
        for &pin in &net.pins {
            self.observe(pin, level);
        }
    }

    /// Push a trace level into one pin. Output-only pins do not observe.
    fn observe(&mut self, pin: PinId, level: Signal) {
        let p = &mut self.pins[pin.0];
        if !p.mode.is_input() {
            return;
        }
        let seen = p.pull.apply(level);
        if seen == p.level {
            return;
        }
        p.level = seen;
        self.queue
            .extend(p.listeners.iter().map(|&device| Notify { device, pin }));
    }

    /// Drain the queue unless a drain further up the stack will.
    pub(crate) fn commit(&mut self) {
        if !self.draining {
            self.draining = true;
            self.drain();
            self.draining = false;
        }
    }

    pub(crate) fn set_partner(&mut self, pin: PinId, partner: Option<PinId>) {
        self.pins[pin.0].partner = partner;
    }

    fn drain(&mut self) {
        let mut deferred = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            let Notify { device, pin } = event;
            match self.devices[device.0].take() {
                Some(mut dev) => {
                    self.running.push(device);
                    dev.update(self, pin);
                    self.running.pop();
                    self.devices[device.0] = Some(dev);
                }
                None if self.running.contains(&device) => deferred.push(event),
                None => {}
            }
        }
        self.queue.extend(deferred);
    }
}
