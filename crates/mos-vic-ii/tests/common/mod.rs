//! Test board: a VIC-II, 16K of RAM and the CPU-side pins a test drives.

#![allow(dead_code)]

use std::any::Any;

use emu_core::{Circuit, Device, DeviceId, Mode, PinId, Port, Pull, Signal};
use mos_vic_ii::{BusAccess, Phase, Vic, VicConfig, pins};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 16K x 12 bits (RAM plus colour nybble). Answers only while AEC is low,
/// which is when the VIC owns the bus.
pub struct Ram {
    address: Vec<PinId>,
    data: Vec<PinId>,
    aec: PinId,
    pub memory: Vec<u16>,
}

impl Device for Ram {
    fn update(&mut self, circuit: &mut Circuit, _pin: PinId) {
        if circuit.level(self.aec).is_low() {
            let address = usize::from(circuit.read_value(&self.address)) & 0x3FFF;
            circuit.write_value(&self.data, self.memory[address]);
        } else {
            circuit.float_all(&self.data);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub struct Board {
    pub circuit: Circuit,
    pub vic: DeviceId,
    pub ram: DeviceId,
    /// Dot clock driver.
    pub phin: PinId,
    /// CPU side of the shared lines.
    pub cs: PinId,
    pub r_w: PinId,
    pub cpu_address: Vec<PinId>,
    pub cpu_data: Vec<PinId>,
    pub cpu_irq: PinId,
    pub cpu_ba: PinId,
    pub cpu_aec: PinId,
}

pub fn make_board() -> Board {
    make_board_with(VicConfig::default())
}

pub fn make_board_with(config: VicConfig) -> Board {
    init_logging();
    let mut circuit = Circuit::new();
    let vic = circuit.add_device(|c, id| Vic::new(c, id, config));
    let chip: Port = circuit.device::<Vic>(vic).map(|v| v.port().clone()).expect("vic");

    let ram = circuit.add_device(|c, id| {
        let mut port = Port::new("RAM");
        let address: Vec<PinId> = (0..14)
            .map(|i| port.add(c, i + 1, &format!("A{i}"), Mode::Input))
            .collect();
        let data: Vec<PinId> = (0..12)
            .map(|i| port.add(c, i + 15, &format!("D{i}"), Mode::Output))
            .collect();
        let aec = port.add(c, 27, "AEC", Mode::Input);
        for &pin in address.iter().chain([&aec]) {
            c.add_listener(pin, id);
        }
        Ram { address, data, aec, memory: vec![0; 0x4000] }
    });
    let (ram_address, ram_data, ram_aec) = circuit
        .device::<Ram>(ram)
        .map(|r| (r.address.clone(), r.data.clone(), r.aec))
        .expect("ram");

    let phin = circuit.add_pin(1, "PHI_DOT", Mode::Output);
    let cs = circuit.add_pin(2, "IO", Mode::Output);
    let r_w = circuit.add_pin(3, "R_W", Mode::Output);
    let cpu_irq = circuit.add_pin(4, "IRQ", Mode::Input);
    let cpu_ba = circuit.add_pin(5, "RDY", Mode::Input);
    let cpu_aec = circuit.add_pin(6, "AEC", Mode::Input);
    let cpu_address: Vec<PinId> = (0..6)
        .map(|i| circuit.add_pin(10 + i, &format!("A{i}"), Mode::Output))
        .collect();
    let cpu_data: Vec<PinId> = (0..8)
        .map(|i| circuit.add_pin(20 + i, &format!("D{i}"), Mode::Bidirectional))
        .collect();

    let wire = |circuit: &mut Circuit, members: &[PinId]| {
        circuit.add_trace(members).expect("board wiring")
    };
    wire(&mut circuit, &[phin, chip[pins::PHIN]]);
    wire(&mut circuit, &[cs, chip[pins::CS]]);
    wire(&mut circuit, &[r_w, chip[pins::R_W]]);
    wire(&mut circuit, &[chip[pins::BA], cpu_ba]);
    wire(&mut circuit, &[chip[pins::AEC], ram_aec, cpu_aec]);
    let irq = wire(&mut circuit, &[chip[pins::IRQ], cpu_irq]);
    circuit.set_trace_pull(irq, Pull::Up);
    for (bit, &number) in pins::ADDRESS.iter().enumerate() {
        let mut members = vec![chip[number], ram_address[bit]];
        members.extend(cpu_address.get(bit));
        wire(&mut circuit, &members);
    }
    for (bit, &number) in pins::DATA.iter().enumerate() {
        let mut members = vec![ram_data[bit], chip[number]];
        members.extend(cpu_data.get(bit));
        wire(&mut circuit, &members);
    }

    circuit.set_high(cs);
    circuit.set_high(r_w);

    Board { circuit, vic, ram, phin, cs, r_w, cpu_address, cpu_data, cpu_irq, cpu_ba, cpu_aec }
}

impl Board {
    pub fn vic(&self) -> &Vic {
        self.circuit.device::<Vic>(self.vic).expect("vic")
    }

    pub fn ram_mut(&mut self) -> &mut Ram {
        self.circuit.device_mut::<Ram>(self.ram).expect("ram")
    }

    pub fn poke(&mut self, address: u16, value: u16) {
        self.ram_mut().memory[usize::from(address)] = value;
    }

    /// One half-cycle.
    pub fn step(&mut self) -> BusAccess {
        self.circuit.toggle(self.phin);
        self.vic().last_access().expect("access")
    }

    /// Step until the beam is at the given position.
    pub fn run_to(&mut self, raster: u16, cycle: u8, phase: Phase) -> BusAccess {
        loop {
            let access = self.step();
            let clock = self.vic().clock();
            if clock.raster() == raster && clock.cycle() == cycle && clock.phase() == phase {
                return access;
            }
        }
    }

    /// Step until the CPU owns the bus, so register access does not fight
    /// the VIC's address drivers.
    fn cpu_bus(&mut self) {
        while self.vic().last_access().is_some_and(|a| a.address.is_some()) {
            self.step();
        }
    }

    /// Register write through CS and R_W.
    pub fn write(&mut self, index: u8, value: u8) {
        self.cpu_bus();
        let c = &mut self.circuit;
        c.write_value(&self.cpu_address, u16::from(index));
        c.write_value(&self.cpu_data, u16::from(value));
        c.set_low(self.r_w);
        c.set_low(self.cs);
        c.set_high(self.cs);
        c.set_high(self.r_w);
        c.float_all(&self.cpu_address);
        c.float_all(&self.cpu_data);
    }

    /// Register read through CS and R_W.
    pub fn read(&mut self, index: u8) -> u8 {
        self.cpu_bus();
        let c = &mut self.circuit;
        c.write_value(&self.cpu_address, u16::from(index));
        c.set_low(self.cs);
        let value = c.read_value(&self.cpu_data) as u8;
        c.set_high(self.cs);
        c.float_all(&self.cpu_address);
        value
    }

    pub fn level(&self, pin: PinId) -> Signal {
        self.circuit.level(pin)
    }

    /// A VIC pin by package number.
    pub fn vic_pin(&self, number: usize) -> PinId {
        self.vic().port()[number]
    }
}
