//! VIC-II configuration: frame geometry and sprite fetch slots.

/// Timing parameters of one VIC-II variant.
///
/// The refresh, character and bitmap fetch windows are the same on every
/// variant and are not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VicConfig {
    /// CPU cycles per raster line.
    pub cycles_per_line: u8,
    /// Raster lines per frame.
    pub lines_per_frame: u16,
    /// Raster line on which the DEN bit is latched for the frame.
    pub den_latch_line: u16,
    /// Cycle of each sprite's pointer fetch (phase 1), sprite 0 first.
    /// Sprite data follows in the next three half-cycles.
    pub sprite_pointer_cycles: [u8; 8],
}

impl VicConfig {
    /// NTSC 6567R8: 65 cycles × 263 lines.
    #[must_use]
    pub const fn mos6567r8() -> Self {
        Self {
            cycles_per_line: 65,
            lines_per_frame: 263,
            den_latch_line: 0x30,
            sprite_pointer_cycles: [61, 63, 65, 2, 4, 6, 8, 10],
        }
    }

    /// PAL 6569: 63 cycles × 312 lines.
    #[must_use]
    pub const fn mos6569() -> Self {
        Self {
            cycles_per_line: 63,
            lines_per_frame: 312,
            den_latch_line: 0x30,
            sprite_pointer_cycles: [58, 60, 62, 1, 3, 5, 7, 9],
        }
    }

    /// The cycle after `cycle`, wrapping at the end of the line.
    #[must_use]
    pub const fn next_cycle(&self, cycle: u8) -> u8 {
        if cycle >= self.cycles_per_line { 1 } else { cycle + 1 }
    }
}

impl Default for VicConfig {
    fn default() -> Self {
        Self::mos6567r8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ntsc() {
        let config = VicConfig::default();
        assert_eq!(config, VicConfig::mos6567r8());
        assert_eq!(config.cycles_per_line, 65);
        assert_eq!(config.lines_per_frame, 263);
    }

    #[test]
    fn next_cycle_wraps() {
        let ntsc = VicConfig::mos6567r8();
        assert_eq!(ntsc.next_cycle(64), 65);
        assert_eq!(ntsc.next_cycle(65), 1);
        let pal = VicConfig::mos6569();
        assert_eq!(pal.next_cycle(63), 1);
    }
}
