//! Memory access scheduler.
//!
//! Every half-cycle gets exactly one access. Phase 1 belongs to the VIC:
//! sprite pointers, refresh, character/bitmap data or an idle read. Phase 2
//! belongs to the CPU unless a bad line needs the video matrix or a sprite
//! needs its data bytes.
//!
//! # Line layout (6567R8)
//!
//! ```text
//! cycle    1  2  3 ...  10  11-15   16-55   56 ... 61  62  63  64  65
//! phase 1  .  p3 s3 ... p7  r       g            p0  s0  p1  s1  p2
//! phase 2  s2 s3 s3 ... s7  c(15-54 on bad lines) s0  s0  s1  s1  s2
//! ```
//!
//! BA drops three cycles before any cycle the VIC will claim in phase 2,
//! giving the CPU time to finish a write. AEC follows only when the VIC
//! actually takes the bus.

use crate::clock::{ClockModel, Phase};
use crate::config::VicConfig;
use crate::counters::{BackgroundCounters, SpriteCounters};
use crate::mode::GraphicsMode;
use crate::registers::Registers;

/// Cycles 11-15 carry DRAM refresh.
const REFRESH_CYCLES: std::ops::RangeInclusive<u8> = 11..=15;
/// Cycles 16-55 carry g-accesses.
const GRAPHICS_CYCLES: std::ops::RangeInclusive<u8> = 16..=55;
/// Cycles 15-54 carry c-accesses on a bad line.
const MATRIX_CYCLES: std::ops::RangeInclusive<u8> = 15..=54;

/// How far ahead of a claimed cycle BA goes low.
const BA_LEAD: u8 = 3;

/// What the VIC does with the bus in one half-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessType {
    /// i-access: a throwaway read of the idle address.
    Idle,
    /// r-access: DRAM refresh.
    Refresh,
    /// c-access: video matrix and colour RAM.
    VideoMatrixColor,
    /// g-access: character generator or bitmap.
    BitmapChar,
    /// p-access: sprite pointer.
    SpritePointer(u8),
    /// s-access: sprite data.
    SpriteData(u8),
    /// The CPU has the bus.
    CpuOwned,
}

impl AccessType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "i-access",
            Self::Refresh => "r-access",
            Self::VideoMatrixColor => "c-access",
            Self::BitmapChar => "g-access",
            Self::SpritePointer(_) => "p-access",
            Self::SpriteData(_) => "s-access",
            Self::CpuOwned => "x-access",
        }
    }

    /// Phase-2 accesses that take the bus away from the CPU.
    #[must_use]
    pub const fn steals_phase_two(self) -> bool {
        matches!(self, Self::VideoMatrixColor | Self::SpriteData(_))
    }
}

/// One completed half-cycle on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusAccess {
    pub access: AccessType,
    /// `None` when the CPU owned the half-cycle.
    pub address: Option<u16>,
    /// 12 bits as read from D0-D11.
    pub data: u16,
}

/// Address the VIC reads when it has nothing to fetch.
#[must_use]
pub fn idle_address(regs: &Registers) -> u16 {
    if regs.ecm() { 0x39FF } else { 0x3FFF }
}

#[derive(Debug, Clone)]
pub struct MemoryScheduler {
    background: BackgroundCounters,
    sprites: [SpriteCounters; 8],
    /// Character codes plus colour nybbles fetched by c-accesses.
    line_cache: [u16; 40],
    /// Last p-access result per sprite.
    pointers: [u8; 8],
    /// DRAM refresh row, counts down.
    refresh: u8,
    config: VicConfig,
}

impl MemoryScheduler {
    #[must_use]
    pub fn new(config: &VicConfig) -> Self {
        Self {
            background: BackgroundCounters::default(),
            sprites: Default::default(),
            line_cache: [0; 40],
            pointers: [0; 8],
            refresh: 0xFF,
            config: *config,
        }
    }

    /// Counter transitions tied to fixed beam positions. Runs once per
    /// half-cycle, before the access is chosen.
    pub fn advance(&mut self, clock: &ClockModel, regs: &Registers) {
        let bad_line = clock.bad_line();
        if bad_line {
            self.background.idle = false;
        }
        if clock.phase() != Phase::One {
            return;
        }

        let raster_low = clock.raster() as u8;
        let y_match = |n: usize| regs.sprite_y(n) == raster_low;

        match clock.cycle() {
            1 if clock.raster() == 0 => {
                self.background.start_frame();
                self.refresh = 0xFF;
            }
            14 => self.background.start_line(bad_line),
            15 => {
                for sprite in self.sprites.iter_mut().filter(|s| s.dma) {
                    sprite.advance_base();
                }
            }
            16 => {
                for sprite in self.sprites.iter_mut().filter(|s| s.dma) {
                    sprite.finish_base();
                }
            }
            55 | 56 => {
                for (n, sprite) in self.sprites.iter_mut().enumerate() {
                    let expanded = regs.sprite_y_expanded(n);
                    if clock.cycle() == 55 {
                        sprite.toggle_expansion(expanded);
                    }
                    sprite.check_dma(regs.sprite_enabled(n), y_match(n), expanded);
                }
            }
            58 => {
                self.background.end_line(bad_line);
                for (n, sprite) in self.sprites.iter_mut().enumerate() {
                    sprite.reload(y_match(n));
                }
            }
            _ => {}
        }
    }

    /// Pick the access for the current half-cycle.
    #[must_use]
    pub fn decide(&self, clock: &ClockModel) -> AccessType {
        let cycle = clock.cycle();
        match clock.phase() {
            Phase::One => {
                // Refresh owns 11-15 outright; sprite 7 gets no phase-1
                // byte at cycle 11.
                if REFRESH_CYCLES.contains(&cycle) {
                    AccessType::Refresh
                } else if let Some(n) = self.pointer_slot(cycle) {
                    AccessType::SpritePointer(n)
                } else if let Some(n) = self.data_slot(cycle, Phase::One) {
                    AccessType::SpriteData(n)
                } else if GRAPHICS_CYCLES.contains(&cycle) {
                    AccessType::BitmapChar
                } else {
                    AccessType::Idle
                }
            }
            Phase::Two => {
                if let Some(n) = self.data_slot(cycle, Phase::Two) {
                    AccessType::SpriteData(n)
                } else if clock.bad_line() && MATRIX_CYCLES.contains(&cycle) {
                    AccessType::VideoMatrixColor
                } else {
                    AccessType::CpuOwned
                }
            }
        }
    }

    /// Address for an access, or `None` if the CPU owns the bus.
    #[must_use]
    pub fn address(&self, access: AccessType, regs: &Registers) -> Option<u16> {
        let matrix = regs.video_matrix() << 10;
        let address = match access {
            AccessType::Idle => idle_address(regs),
            AccessType::Refresh => 0x3F00 | u16::from(self.refresh),
            AccessType::VideoMatrixColor => matrix | self.background.vc,
            AccessType::BitmapChar => {
                if self.background.idle {
                    idle_address(regs)
                } else {
                    let mode = GraphicsMode::from_bits(regs.ecm(), regs.bmm(), regs.mcm());
                    let code = self.line_cache[self.cache_index()] as u8;
                    mode.g_address(regs.char_base(), code, self.background.vc, self.background.rc)
                }
            }
            AccessType::SpritePointer(n) => matrix | 0x3F8 | u16::from(n),
            AccessType::SpriteData(n) => {
                let n = usize::from(n);
                (u16::from(self.pointers[n]) << 6) | u16::from(self.sprites[n].mc & 0x3F)
            }
            AccessType::CpuOwned => return None,
        };
        Some(address & 0x3FFF)
    }

    /// Route the data read by an access into the counters and caches.
    pub fn complete(&mut self, access: AccessType, data: u16) {
        match access {
            AccessType::Refresh => self.refresh = self.refresh.wrapping_sub(1),
            AccessType::VideoMatrixColor => {
                let index = self.cache_index();
                self.line_cache[index] = data & 0x0FFF;
            }
            AccessType::BitmapChar => {
                if !self.background.idle {
                    self.background.advance();
                }
            }
            AccessType::SpritePointer(n) => self.pointers[usize::from(n)] = data as u8,
            AccessType::SpriteData(n) => self.sprites[usize::from(n)].fetched(),
            AccessType::Idle | AccessType::CpuOwned => {}
        }
    }

    /// BA state for the current cycle: low when the VIC will claim any of
    /// the next few cycles.
    #[must_use]
    pub fn ba_low(&self, clock: &ClockModel) -> bool {
        let cycle = clock.cycle();
        (0..=BA_LEAD).any(|k| self.claimed(self.ahead(cycle, k), clock.bad_line()))
    }

    /// Handle a write to $17.
    pub fn crunch(&mut self, expansion: u8) {
        for (n, sprite) in self.sprites.iter_mut().enumerate() {
            sprite.crunch(expansion & (1 << n) != 0);
        }
    }

    #[must_use]
    pub fn background(&self) -> &BackgroundCounters {
        &self.background
    }

    /// # Panics
    ///
    /// Panics if `n` is not a sprite number.
    #[must_use]
    pub fn sprite(&self, n: usize) -> &SpriteCounters {
        &self.sprites[n]
    }

    #[must_use]
    pub fn line_cache(&self) -> &[u16; 40] {
        &self.line_cache
    }

    #[must_use]
    pub fn pointer(&self, n: usize) -> u8 {
        self.pointers[n]
    }

    #[must_use]
    pub fn refresh(&self) -> u8 {
        self.refresh
    }

    fn cache_index(&self) -> usize {
        usize::from(self.background.vmli) % self.line_cache.len()
    }

    fn pointer_slot(&self, cycle: u8) -> Option<u8> {
        self.config
            .sprite_pointer_cycles
            .iter()
            .position(|&p| p == cycle)
            .map(|n| n as u8)
    }

    /// Sprite whose s-access falls on this half-cycle.
    fn data_slot(&self, cycle: u8, phase: Phase) -> Option<u8> {
        (0..8)
            .find(|&n| {
                let p = self.config.sprite_pointer_cycles[n];
                let next = self.config.next_cycle(p);
                self.sprites[n].dma
                    && match phase {
                        Phase::One => cycle == next,
                        Phase::Two => cycle == p || cycle == next,
                    }
            })
            .map(|n| n as u8)
    }

    /// A cycle whose phase 2 the VIC takes from the CPU.
    fn claimed(&self, cycle: u8, bad_line: bool) -> bool {
        if bad_line && MATRIX_CYCLES.contains(&cycle) {
            return true;
        }
        self.config
            .sprite_pointer_cycles
            .iter()
            .zip(&self.sprites)
            .any(|(&p, s)| s.dma && (cycle == p || cycle == self.config.next_cycle(p)))
    }

    fn ahead(&self, cycle: u8, k: u8) -> u8 {
        (cycle - 1 + k) % self.config.cycles_per_line + 1
    }
}
