//! Beam position: phase, cycle and raster line.
//!
//! Every edge on PHIN is one half-cycle. The model starts on the last
//! half-cycle of a frame so the first edge lands on raster 0, cycle 1,
//! phase 1.

use log::debug;

use crate::config::VicConfig;
use crate::registers::{IRQ_RASTER, Registers};

/// Half of a CPU cycle. The VIC fetches in phase 1; the CPU normally owns
/// phase 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    One,
    Two,
}

/// Bad line condition: the VIC must fetch a fresh row of the video matrix.
#[must_use]
pub fn is_bad_line(raster: u16, yscroll: u8, den: bool) -> bool {
    (0x30..=0xF7).contains(&raster) && (raster & 7) == u16::from(yscroll) && den
}

#[derive(Debug, Clone)]
pub struct ClockModel {
    phase: Phase,
    /// 1-based cycle within the line.
    cycle: u8,
    raster: u16,
    /// DEN as latched for this frame.
    den: bool,
    bad_line: bool,
    /// 9-bit raster interrupt compare value.
    raster_latch: u16,
    cycles_per_line: u8,
    lines_per_frame: u16,
    den_latch_line: u16,
}

impl ClockModel {
    #[must_use]
    pub fn new(config: &VicConfig) -> Self {
        Self {
            phase: Phase::Two,
            cycle: config.cycles_per_line,
            raster: config.lines_per_frame - 1,
            den: false,
            bad_line: false,
            raster_latch: 0,
            cycles_per_line: config.cycles_per_line,
            lines_per_frame: config.lines_per_frame,
            den_latch_line: config.den_latch_line,
        }
    }

    /// Advance one half-cycle.
    pub fn update(&mut self, regs: &mut Registers) {
        let mut new_line = false;
        match self.phase {
            Phase::One => self.phase = Phase::Two,
            Phase::Two => {
                self.phase = Phase::One;
                if self.cycle >= self.cycles_per_line {
                    self.cycle = 1;
                    self.raster += 1;
                    if self.raster >= self.lines_per_frame {
                        self.raster = 0;
                        self.den = false;
                    }
                    new_line = true;
                } else {
                    self.cycle += 1;
                }
            }
        }

        if self.raster == self.den_latch_line && !self.den && regs.den() {
            self.den = true;
            debug!("DEN latched on raster ${:03X} cycle {}", self.raster, self.cycle);
        }
        self.bad_line = is_bad_line(self.raster, regs.yscroll(), self.den);

        if new_line {
            self.compare_raster(regs);
        }
    }

    /// Load a raster compare value. Moving the compare onto the current
    /// line latches the interrupt straight away; rewriting the same value
    /// does not.
    pub fn set_raster_latch(&mut self, latch: u16, regs: &mut Registers) {
        let latch = latch & 0x1FF;
        if latch == self.raster_latch {
            return;
        }
        self.raster_latch = latch;
        self.compare_raster(regs);
    }

    /// Only an enabled source latches: a match while $1A bit 0 is clear
    /// is lost.
    fn compare_raster(&self, regs: &mut Registers) {
        if self.raster == self.raster_latch && regs.irq_enabled(IRQ_RASTER) {
            regs.latch_irq(IRQ_RASTER);
            debug!("raster interrupt latched on line ${:03X}", self.raster);
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn cycle(&self) -> u8 {
        self.cycle
    }

    #[must_use]
    pub fn raster(&self) -> u16 {
        self.raster
    }

    #[must_use]
    pub fn den(&self) -> bool {
        self.den
    }

    #[must_use]
    pub fn bad_line(&self) -> bool {
        self.bad_line
    }

    #[must_use]
    pub fn raster_latch(&self) -> u16 {
        self.raster_latch
    }

    /// First half-cycle of a line.
    #[must_use]
    pub fn is_line_start(&self) -> bool {
        self.phase == Phase::One && self.cycle == 1
    }
}
