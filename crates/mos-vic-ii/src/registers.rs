//! The 64-byte register file ($D000-$D03F on a C64).
//!
//! Only the flags the bus scheduler and interrupt logic consume are
//! decoded here. Colours, sprite X positions and the like are stored and
//! read back but have no effect inside this crate.

/// Raster interrupt bit in $19/$1A.
pub const IRQ_RASTER: u8 = 0x01;

/// Register file with the read-back quirks of the real chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    regs: [u8; 0x40],
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    #[must_use]
    pub fn new() -> Self {
        Self { regs: [0; 0x40] }
    }

    /// CPU read. `raster` is the current raster line, published through
    /// $11 bit 7 and $12. Collision latches clear on read.
    pub fn read(&mut self, index: u8, raster: u16) -> u8 {
        let value = self.peek(index, raster);
        if matches!(index, 0x1E | 0x1F) {
            self.regs[usize::from(index)] = 0;
        }
        value
    }

    /// Read without side effects.
    #[must_use]
    pub fn peek(&self, index: u8, raster: u16) -> u8 {
        assert!(index < 0x40, "VIC register ${index:02X} out of range");
        let raw = self.regs[usize::from(index)];
        match index {
            0x11 => (raw & 0x7F) | (((raster >> 8) as u8 & 1) << 7),
            0x12 => raster as u8,
            0x16 => raw | 0xC0,
            0x18 => raw | 0x01,
            0x19 => {
                let any = if self.irq_pending() { 0x80 } else { 0x00 };
                (raw & 0x0F) | 0x70 | any
            }
            0x1A => raw | 0xF0,
            0x20..=0x2E => raw | 0xF0,
            0x2F..=0x3F => 0xFF,
            _ => raw,
        }
    }

    /// CPU write. Writing 1s to $19 acknowledges those interrupt bits.
    pub fn write(&mut self, index: u8, value: u8) {
        assert!(index < 0x40, "VIC register ${index:02X} out of range");
        match index {
            0x19 => self.regs[0x19] &= !(value & 0x0F),
            0x1A => self.regs[0x1A] = value & 0x0F,
            0x1E | 0x1F => {}
            _ => self.regs[usize::from(index)] = value,
        }
    }

    /// Set interrupt latch bits in $19.
    pub fn latch_irq(&mut self, bits: u8) {
        self.regs[0x19] |= bits & 0x0F;
    }

    /// True while any latched interrupt source is enabled.
    #[must_use]
    pub fn irq_pending(&self) -> bool {
        self.regs[0x19] & self.regs[0x1A] & 0x0F != 0
    }

    #[must_use]
    pub fn irq_latch(&self) -> u8 {
        self.regs[0x19] & 0x0F
    }

    #[must_use]
    pub fn irq_enabled(&self, bits: u8) -> bool {
        self.regs[0x1A] & bits != 0
    }

    /// 9-bit raster compare value written through $11 bit 7 and $12.
    #[must_use]
    pub fn raster_compare(&self) -> u16 {
        (u16::from(self.regs[0x11] & 0x80) << 1) | u16::from(self.regs[0x12])
    }

    #[must_use]
    pub fn yscroll(&self) -> u8 {
        self.regs[0x11] & 0x07
    }

    /// Display enable.
    #[must_use]
    pub fn den(&self) -> bool {
        self.regs[0x11] & 0x10 != 0
    }

    /// Bitmap mode.
    #[must_use]
    pub fn bmm(&self) -> bool {
        self.regs[0x11] & 0x20 != 0
    }

    /// Extended colour mode.
    #[must_use]
    pub fn ecm(&self) -> bool {
        self.regs[0x11] & 0x40 != 0
    }

    /// Multicolour mode.
    #[must_use]
    pub fn mcm(&self) -> bool {
        self.regs[0x16] & 0x10 != 0
    }

    /// VM13-VM10: video matrix base in 1K steps.
    #[must_use]
    pub fn video_matrix(&self) -> u16 {
        u16::from(self.regs[0x18] >> 4)
    }

    /// CB13-CB11: character/bitmap base in 2K steps.
    #[must_use]
    pub fn char_base(&self) -> u16 {
        u16::from((self.regs[0x18] >> 1) & 0x07)
    }

    #[must_use]
    pub fn sprite_enabled(&self, n: usize) -> bool {
        self.regs[0x15] & (1 << n) != 0
    }

    #[must_use]
    pub fn sprite_y(&self, n: usize) -> u8 {
        self.regs[1 + 2 * n]
    }

    #[must_use]
    pub fn sprite_y_expanded(&self, n: usize) -> bool {
        self.regs[0x17] & (1 << n) != 0
    }
}
