//! Pin assignments for the VIC-II package.
//!
//! Numbers follow the 40-pin DIP. A12 and A13 share package pins with A0-A5
//! on real silicon (the address bus is multiplexed for DRAM); here they get
//! numbers 41 and 42 of their own so a board can wire a plain 14-bit bus.
//! Supply pins are not modelled.

/// Data bus D0-D7 (register access and fetched bytes).
pub const D0: usize = 7;
pub const D1: usize = 6;
pub const D2: usize = 5;
pub const D3: usize = 4;
pub const D4: usize = 3;
pub const D5: usize = 2;
pub const D6: usize = 1;
pub const D7: usize = 39;
/// Colour nybble D8-D11, read only.
pub const D8: usize = 38;
pub const D9: usize = 37;
pub const D10: usize = 36;
pub const D11: usize = 35;

/// Interrupt request, open drain, active low.
pub const IRQ: usize = 8;
/// Light pen input.
pub const LP: usize = 9;
/// Chip select, active low.
pub const CS: usize = 10;
/// Read (high) / write (low) for register access.
pub const R_W: usize = 11;
/// Bus available. Goes low three cycles before the VIC takes the bus.
pub const BA: usize = 12;
/// Address enable control. Low while the VIC owns the bus.
pub const AEC: usize = 16;
/// System clock output, low in phase 1 and high in phase 2.
pub const PHI0: usize = 17;
/// DRAM row and column strobes.
pub const RAS: usize = 18;
pub const CAS: usize = 19;
/// Colour and dot clock inputs. Each PHIN transition is one half-cycle.
pub const PHCOL: usize = 21;
pub const PHIN: usize = 22;

pub const A0: usize = 24;
pub const A1: usize = 25;
pub const A2: usize = 26;
pub const A3: usize = 27;
pub const A4: usize = 28;
pub const A5: usize = 29;
pub const A6: usize = 34;
pub const A7: usize = 33;
pub const A8: usize = 32;
pub const A9: usize = 31;
pub const A10: usize = 30;
pub const A11: usize = 23;
pub const A12: usize = 41;
pub const A13: usize = 42;

/// Address bus, bit 0 first.
pub const ADDRESS: [usize; 14] = [A0, A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12, A13];

/// Full 12-bit data bus, bit 0 first.
pub const DATA: [usize; 12] = [D0, D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11];

/// Register select lines A0-A5.
pub const REGISTER_SELECT: [usize; 6] = [A0, A1, A2, A3, A4, A5];

/// Display name of a pin number.
#[must_use]
pub fn name(number: usize) -> String {
    if let Some(bit) = ADDRESS.iter().position(|&n| n == number) {
        return format!("A{bit}");
    }
    if let Some(bit) = DATA.iter().position(|&n| n == number) {
        return format!("D{bit}");
    }
    match number {
        IRQ => "IRQ",
        LP => "LP",
        CS => "CS",
        R_W => "R_W",
        BA => "BA",
        AEC => "AEC",
        PHI0 => "PHI0",
        RAS => "RAS",
        CAS => "CAS",
        PHCOL => "PHCOL",
        PHIN => "PHIN",
        _ => "?",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_unique() {
        let mut all: Vec<usize> = ADDRESS.iter().chain(DATA.iter()).copied().collect();
        all.extend([IRQ, LP, CS, R_W, BA, AEC, PHI0, RAS, CAS, PHCOL, PHIN]);
        let count = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), count);
    }

    #[test]
    fn names() {
        assert_eq!(name(A0), "A0");
        assert_eq!(name(A13), "A13");
        assert_eq!(name(D7), "D7");
        assert_eq!(name(D11), "D11");
        assert_eq!(name(PHIN), "PHIN");
    }
}
