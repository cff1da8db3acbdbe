//! The VIC-II wired into a circuit.
//!
//! The chip is driven entirely through its pins. Each PHIN edge runs one
//! half-cycle:
//!
//! 1. advance the beam position and the per-line counters;
//! 2. update IRQ;
//! 3. pick the access and drive PHI0, BA and AEC;
//! 4. put the address out, let memory answer, read D0-D11.
//!
//! Register access happens when CS falls: A0-A5 select the register and
//! R_W picks the direction. A read drives D0-D7 until CS rises again.

use std::any::Any;

use emu_core::{Circuit, Device, DeviceId, Mode, Observable, PinId, Port, Signal, Value};
use log::{debug, trace};

use crate::clock::{ClockModel, Phase};
use crate::config::VicConfig;
use crate::mode::GraphicsMode;
use crate::pins;
use crate::registers::Registers;
use crate::scheduler::{AccessType, BusAccess, MemoryScheduler};

/// Inspection paths other than the per-sprite ones.
const PATHS: [&str; 20] = [
    "raster",
    "cycle",
    "phase",
    "bad_line",
    "den",
    "raster_latch",
    "irq",
    "mode",
    "vc",
    "vcbase",
    "rc",
    "vmli",
    "idle",
    "refresh",
    "ba",
    "aec",
    "access",
    "address",
    "data",
    "phi0",
];

const SPRITE_FIELDS: [&str; 5] = ["mc", "mcbase", "dma", "display", "yexp"];

pub struct Vic {
    port: Port,
    phin: PinId,
    phi0: PinId,
    ba: PinId,
    aec: PinId,
    irq: PinId,
    cs: PinId,
    r_w: PinId,
    /// A0-A13, bit 0 first.
    address: Vec<PinId>,
    /// D0-D11, bit 0 first.
    data: Vec<PinId>,

    regs: Registers,
    clock: ClockModel,
    scheduler: MemoryScheduler,

    ba_level: Signal,
    aec_level: Signal,
    irq_asserted: bool,
    /// D0-D7 are driving a register value.
    register_read: bool,
    last_access: Option<BusAccess>,
}

impl Vic {
    /// Create the chip's pins in `circuit` and listen on PHIN and CS.
    pub fn new(circuit: &mut Circuit, id: DeviceId, config: VicConfig) -> Self {
        let mut port = Port::new("VIC-II");
        let mut add =
            |number: usize, mode: Mode| port.add(circuit, number, &pins::name(number), mode);

        let data: Vec<PinId> = pins::DATA.iter().map(|&n| add(n, Mode::Input)).collect();
        let address: Vec<PinId> = pins::ADDRESS.iter().map(|&n| add(n, Mode::Input)).collect();
        let irq = add(pins::IRQ, Mode::Output);
        let cs = add(pins::CS, Mode::Input);
        let r_w = add(pins::R_W, Mode::Input);
        let ba = add(pins::BA, Mode::Output);
        let aec = add(pins::AEC, Mode::Output);
        let phi0 = add(pins::PHI0, Mode::Output);
        let phin = add(pins::PHIN, Mode::Input);
        // Present for wiring; light pen latching and DRAM strobes are not
        // modelled.
        add(pins::LP, Mode::Input);
        add(pins::RAS, Mode::Output);
        add(pins::CAS, Mode::Output);
        add(pins::PHCOL, Mode::Input);

        circuit.add_listener(phin, id);
        circuit.add_listener(cs, id);

        // The first half-cycle is the CPU's phase 2 at the end of a frame.
        circuit.set_high(ba);
        circuit.set_high(aec);
        circuit.set_high(phi0);

        Self {
            port,
            phin,
            phi0,
            ba,
            aec,
            irq,
            cs,
            r_w,
            address,
            data,
            regs: Registers::new(),
            clock: ClockModel::new(&config),
            scheduler: MemoryScheduler::new(&config),
            ba_level: Signal::High,
            aec_level: Signal::High,
            irq_asserted: false,
            register_read: false,
            last_access: None,
        }
    }

    /// Write a register directly, as a CS/R_W cycle would.
    pub fn write_register(&mut self, circuit: &mut Circuit, index: u8, value: u8) {
        self.regs.write(index, value);
        match index {
            0x11 | 0x12 => {
                let compare = self.regs.raster_compare();
                self.clock.set_raster_latch(compare, &mut self.regs);
            }
            0x17 => self.scheduler.crunch(value),
            0x19 if value & 0x0F != 0 => debug!("interrupt acknowledged: ${:02X}", value & 0x0F),
            _ => {}
        }
        self.drive_irq(circuit);
    }

    /// Read a register directly, with the same side effects as a CPU read.
    pub fn read_register(&mut self, index: u8) -> u8 {
        self.regs.read(index, self.clock.raster())
    }

    #[must_use]
    pub fn port(&self) -> &Port {
        &self.port
    }

    #[must_use]
    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    #[must_use]
    pub fn clock(&self) -> &ClockModel {
        &self.clock
    }

    #[must_use]
    pub fn scheduler(&self) -> &MemoryScheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn graphics_mode(&self) -> GraphicsMode {
        GraphicsMode::from_bits(self.regs.ecm(), self.regs.bmm(), self.regs.mcm())
    }

    /// The access performed on the most recent half-cycle.
    #[must_use]
    pub fn last_access(&self) -> Option<BusAccess> {
        self.last_access
    }

    fn half_cycle(&mut self, circuit: &mut Circuit) {
        self.clock.update(&mut self.regs);
        self.scheduler.advance(&self.clock, &self.regs);
        self.drive_irq(circuit);

        let access = self.scheduler.decide(&self.clock);
        let phase_one = self.clock.phase() == Phase::One;
        if phase_one {
            self.ba_level = Signal::from(!self.scheduler.ba_low(&self.clock));
        }
        self.aec_level = Signal::from(!phase_one && !access.steals_phase_two());
        circuit.set_level(self.phi0, Signal::from(!phase_one));
        circuit.set_level(self.ba, self.ba_level);
        circuit.set_level(self.aec, self.aec_level);

        let address = self.scheduler.address(access, &self.regs);
        let data = match address {
            Some(address) => {
                circuit.set_modes(&self.address, Mode::Output);
                circuit.write_value(&self.address, address);
                circuit.settle();
                let data = circuit.read_value(&self.data);
                self.scheduler.complete(access, data);
                data
            }
            None => {
                circuit.set_modes(&self.address, Mode::Input);
                0
            }
        };

        if let Some(address) = address {
            trace!(
                "${:03X}/{:02}/{} {} ${:04X} = ${:03X}",
                self.clock.raster(),
                self.clock.cycle(),
                if phase_one { 1 } else { 2 },
                access.name(),
                address,
                data
            );
        }
        self.last_access = Some(BusAccess { access, address, data });
    }

    fn select(&mut self, circuit: &mut Circuit) {
        let index = (circuit.read_value(&self.address[..6]) & 0x3F) as u8;
        if circuit.level(self.r_w).is_low() {
            let value = circuit.read_value(&self.data[..8]) as u8;
            self.write_register(circuit, index, value);
        } else {
            let value = self.read_register(index);
            circuit.set_modes(&self.data[..8], Mode::Output);
            circuit.write_value(&self.data[..8], u16::from(value));
            self.register_read = true;
        }
    }

    fn deselect(&mut self, circuit: &mut Circuit) {
        if self.register_read {
            circuit.set_modes(&self.data[..8], Mode::Input);
            self.register_read = false;
        }
    }

    /// IRQ is open drain: pulled low while an enabled source is latched,
    /// released otherwise.
    fn drive_irq(&mut self, circuit: &mut Circuit) {
        let pending = self.regs.irq_pending();
        if pending != self.irq_asserted {
            debug!(
                "IRQ {} on raster ${:03X}",
                if pending { "asserted" } else { "released" },
                self.clock.raster()
            );
            self.irq_asserted = pending;
        }
        if pending {
            circuit.set_low(self.irq);
        } else {
            circuit.float(self.irq);
        }
    }

    fn query_sprite(&self, path: &str) -> Option<Value> {
        let (n, field) = path.strip_prefix("sprite")?.split_once('.')?;
        let n: usize = n.parse().ok().filter(|&n| n < 8)?;
        let sprite = self.scheduler.sprite(n);
        match field {
            "mc" => Some(sprite.mc.into()),
            "mcbase" => Some(sprite.mcbase.into()),
            "dma" => Some(sprite.dma.into()),
            "display" => Some(sprite.display.into()),
            "yexp" => Some(sprite.yexp.into()),
            _ => None,
        }
    }
}

impl Device for Vic {
    fn update(&mut self, circuit: &mut Circuit, pin: PinId) {
        if pin == self.phin {
            if !circuit.level(pin).is_floating() {
                self.half_cycle(circuit);
            }
        } else if pin == self.cs {
            match circuit.level(pin) {
                Signal::Low => self.select(circuit),
                Signal::High => self.deselect(circuit),
                Signal::Floating => {}
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Observable for Vic {
    fn query(&self, path: &str) -> Option<Value> {
        if path.starts_with("sprite") {
            return self.query_sprite(path);
        }
        let bg = self.scheduler.background();
        let last = self.last_access;
        match path {
            "raster" => Some(self.clock.raster().into()),
            "cycle" => Some(self.clock.cycle().into()),
            "phase" => Some(Value::U8(match self.clock.phase() {
                Phase::One => 1,
                Phase::Two => 2,
            })),
            "bad_line" => Some(self.clock.bad_line().into()),
            "den" => Some(self.clock.den().into()),
            "raster_latch" => Some(self.clock.raster_latch().into()),
            "irq" => Some(self.regs.irq_pending().into()),
            "mode" => Some(self.graphics_mode().name().into()),
            "vc" => Some(bg.vc.into()),
            "vcbase" => Some(bg.vcbase.into()),
            "rc" => Some(bg.rc.into()),
            "vmli" => Some(bg.vmli.into()),
            "idle" => Some(bg.idle.into()),
            "refresh" => Some(self.scheduler.refresh().into()),
            "ba" => Some(self.ba_level.into()),
            "aec" => Some(self.aec_level.into()),
            "phi0" => Some(Signal::from(self.clock.phase() == Phase::Two).into()),
            "access" => Some(last.map_or(AccessType::CpuOwned, |a| a.access).name().into()),
            "address" => last.and_then(|a| a.address).map(Value::U16),
            "data" => last.map(|a| Value::U16(a.data)),
            _ => None,
        }
    }

    fn query_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = PATHS.iter().map(ToString::to_string).collect();
        for n in 0..8 {
            paths.extend(SPRITE_FIELDS.iter().map(|field| format!("sprite{n}.{field}")));
        }
        paths
    }
}
