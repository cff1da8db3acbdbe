//! Multi-device propagation scenarios on a small board.

use std::any::Any;

use emu_core::{Circuit, Device, DeviceId, Mode, PinId, Port, Pull, Signal};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 4-bit address in, 8-bit data out, answers from a lookup table.
struct Rom {
    address: Vec<PinId>,
    data: Vec<PinId>,
    contents: [u8; 16],
    reads: usize,
}

impl Device for Rom {
    fn update(&mut self, circuit: &mut Circuit, _pin: PinId) {
        let addr = circuit.read_value(&self.address) as usize;
        self.reads += 1;
        circuit.write_value(&self.data, u16::from(self.contents[addr & 0x0F]));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// On every clock edge puts the next address out and latches what comes back.
struct Fetcher {
    clock: PinId,
    address: Vec<PinId>,
    data: Vec<PinId>,
    next: u16,
    fetched: Vec<u8>,
}

impl Device for Fetcher {
    fn update(&mut self, circuit: &mut Circuit, pin: PinId) {
        if pin != self.clock {
            return;
        }
        circuit.write_value(&self.address, self.next);
        circuit.settle();
        self.fetched.push(circuit.read_value(&self.data) as u8);
        self.next = (self.next + 1) & 0x0F;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct Board {
    circuit: Circuit,
    clock: PinId,
    rom: DeviceId,
    fetcher: DeviceId,
}

fn make_board() -> Board {
    let mut circuit = Circuit::new();
    let clock = circuit.add_pin(1, "CLK", Mode::Output);

    let rom = circuit.add_device(|c, id| {
        let mut port = Port::new("ROM");
        let address: Vec<PinId> = (0..4)
            .map(|i| port.add(c, 10 + i, &format!("A{i}"), Mode::Input))
            .collect();
        let data: Vec<PinId> = (0..8)
            .map(|i| port.add(c, 20 + i, &format!("D{i}"), Mode::Output))
            .collect();
        for &pin in &address {
            c.add_listener(pin, id);
        }
        let mut contents = [0u8; 16];
        for (i, byte) in contents.iter_mut().enumerate() {
            *byte = (i as u8) * 0x11;
        }
        Rom { address, data, contents, reads: 0 }
    });

    let fetcher = circuit.add_device(|c, id| {
        let mut port = Port::new("CPU");
        let clk_in = port.add(c, 1, "PHI", Mode::Input);
        let address: Vec<PinId> = (0..4)
            .map(|i| port.add(c, 10 + i, &format!("A{i}"), Mode::Output))
            .collect();
        let data: Vec<PinId> = (0..8)
            .map(|i| port.add(c, 20 + i, &format!("D{i}"), Mode::Input))
            .collect();
        c.add_listener(clk_in, id);
        Fetcher { clock: clk_in, address, data, next: 1, fetched: Vec::new() }
    });

    // Wire the two chips together pin for pin.
    let rom_pins = circuit.device::<Rom>(rom).map(|r| (r.address.clone(), r.data.clone()));
    let cpu = circuit
        .device::<Fetcher>(fetcher)
        .map(|f| (f.clock, f.address.clone(), f.data.clone()));
    let ((rom_addr, rom_data), (clk_in, cpu_addr, cpu_data)) =
        (rom_pins.expect("rom"), cpu.expect("fetcher"));
    circuit.add_trace(&[clock, clk_in]).expect("clock trace");
    for (&a, &b) in rom_addr.iter().zip(&cpu_addr) {
        circuit.add_trace(&[b, a]).expect("address trace");
    }
    for (&a, &b) in rom_data.iter().zip(&cpu_data) {
        circuit.add_trace(&[a, b]).expect("data trace");
    }

    Board { circuit, clock, rom, fetcher }
}

#[test]
fn handler_reads_memory_response_in_the_same_edge() {
    init_logging();
    let mut board = make_board();

    for _ in 0..4 {
        board.circuit.toggle(board.clock);
    }

    let fetcher = board.circuit.device::<Fetcher>(board.fetcher).expect("fetcher");
    assert_eq!(fetcher.fetched, vec![0x11, 0x22, 0x33, 0x44]);
    let rom = board.circuit.device::<Rom>(board.rom).expect("rom");
    assert!(rom.reads >= 4);
}

#[test]
fn repeated_identical_level_does_not_wake_listeners() {
    let mut board = make_board();
    board.circuit.set_high(board.clock);
    board.circuit.set_high(board.clock);
    board.circuit.set_high(board.clock);
    let fetcher = board.circuit.device::<Fetcher>(board.fetcher).expect("fetcher");
    assert_eq!(fetcher.fetched.len(), 1);
}

#[test]
fn open_drain_interrupt_line() {
    init_logging();
    let mut circuit = Circuit::new();
    let vic_irq = circuit.add_pin(8, "IRQ", Mode::Output);
    let cia_irq = circuit.add_pin(21, "IRQ", Mode::Output);
    let cpu_irq = circuit.add_pin(4, "IRQ", Mode::Input);
    let line = circuit.add_trace(&[vic_irq, cia_irq, cpu_irq]).expect("irq");
    circuit.set_trace_pull(line, Pull::Up);

    assert_eq!(circuit.level(cpu_irq), Signal::High);
    circuit.set_low(vic_irq);
    assert_eq!(circuit.level(cpu_irq), Signal::Low);
    circuit.set_low(cia_irq);
    circuit.float(vic_irq);
    assert_eq!(circuit.level(cpu_irq), Signal::Low);
    circuit.float(cia_irq);
    assert_eq!(circuit.level(cpu_irq), Signal::High);
}

#[test]
fn connector_links_a_cartridge_to_the_expansion_port() {
    let mut circuit = Circuit::new();
    let mut slot = Port::new("EXP");
    let game = slot.add(&mut circuit, 8, "GAME", Mode::Bidirectional);
    let exrom = slot.add(&mut circuit, 9, "EXROM", Mode::Bidirectional);
    let pla_game = circuit.add_pin(25, "GAME", Mode::Input);
    let pla_exrom = circuit.add_pin(26, "EXROM", Mode::Input);
    let game_trace = circuit.add_trace(&[game, pla_game]).expect("trace");
    let exrom_trace = circuit.add_trace(&[exrom, pla_exrom]).expect("trace");
    circuit.set_trace_pull(game_trace, Pull::Up);
    circuit.set_trace_pull(exrom_trace, Pull::Up);

    let mut cart = Port::new("CART");
    let cart_game = cart.add(&mut circuit, 8, "GAME", Mode::Bidirectional);
    let cart_exrom = cart.add(&mut circuit, 9, "EXROM", Mode::Bidirectional);
    circuit.set_low(cart_exrom);

    let slot_conn = circuit.add_connector(slot.pins());
    let cart_conn = circuit.add_connector(cart.pins());
    circuit.join(slot_conn, cart_conn).expect("join");

    // An 8K cartridge grounds EXROM and leaves GAME alone.
    assert_eq!(circuit.level(pla_exrom), Signal::Low);
    assert_eq!(circuit.level(pla_game), Signal::High);
    assert_eq!(circuit.level(cart_game), Signal::High);

    circuit.split(slot_conn);
    assert_eq!(circuit.level(pla_exrom), Signal::High);
}

#[cfg(feature = "serde")]
#[test]
fn inspection_values_serialise() {
    use emu_core::Value;

    let json = serde_json::to_string(&Value::Level(Signal::High)).expect("json");
    assert_eq!(json, r#"{"Level":"High"}"#);
}

#[test]
fn resolution_rule_is_usable_without_a_circuit_trace() {
    let mut circuit = Circuit::new();
    let low = circuit.add_pin(1, "A", Mode::Output);
    let high = circuit.add_pin(2, "B", Mode::Output);
    circuit.set_low(low);
    circuit.set_high(high);

    let members = [circuit.pin(low), circuit.pin(high)];
    assert_eq!(emu_core::resolve(members, Signal::Floating, Pull::Down), Signal::High);
    let members = [circuit.pin(low)];
    assert_eq!(emu_core::resolve(members, Signal::High, Pull::None), Signal::Low);
    let none: Vec<&emu_core::Pin> = Vec::new();
    assert_eq!(emu_core::resolve(none, Signal::Floating, Pull::Up), Signal::High);
}
