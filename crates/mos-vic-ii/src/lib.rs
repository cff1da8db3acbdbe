//! MOS 6567/6569 VIC-II bus timing.
//!
//! Cycle-accurate model of how the video chip shares the address and data
//! bus with the CPU: which access happens in every half-cycle, what address
//! it puts out, and when BA and AEC take the bus away from the CPU.
//! Pixel output and collision detection are not part of this crate.
//!
//! # Timing (6567R8, NTSC)
//!
//! - 263 raster lines per frame (0-262)
//! - 65 cycles per line, two half-cycles each
//! - Bad lines: raster $30-$F7 where `raster & 7 == YSCROLL` and DEN was
//!   set on line $30
//!
//! The chip lives in an [`emu_core::Circuit`] and is clocked through its
//! PHIN pin; see [`Vic`].

mod clock;
mod config;
mod counters;
mod mode;
pub mod pins;
mod registers;
mod scheduler;
mod vic;

pub use clock::{ClockModel, Phase, is_bad_line};
pub use config::VicConfig;
pub use counters::{BackgroundCounters, SpriteCounters};
pub use mode::GraphicsMode;
pub use registers::{IRQ_RASTER, Registers};
pub use scheduler::{AccessType, BusAccess, MemoryScheduler, idle_address};
pub use vic::Vic;
