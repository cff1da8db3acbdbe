//! Per-line counters behind character and sprite fetches.

/// Video counter, row counter and display/idle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundCounters {
    /// Video counter (10 bits): index of the current character.
    pub vc: u16,
    /// Value `vc` reloads from at the start of each line.
    pub vcbase: u16,
    /// Row within the character cell (0-7).
    pub rc: u8,
    /// Index into the 40-entry line cache.
    pub vmli: u8,
    /// Idle state: g-accesses read the idle address and counters hold.
    pub idle: bool,
}

impl Default for BackgroundCounters {
    fn default() -> Self {
        Self {
            vc: 0,
            vcbase: 0,
            rc: 0,
            vmli: 0,
            idle: true,
        }
    }
}

impl BackgroundCounters {
    /// Raster line 0.
    pub fn start_frame(&mut self) {
        self.vcbase = 0;
    }

    /// Cycle 14.
    pub fn start_line(&mut self, bad_line: bool) {
        self.vc = self.vcbase;
        self.vmli = 0;
        if bad_line {
            self.rc = 0;
        }
    }

    /// Cycle 58. After the last pixel row of a character line the logic
    /// drops to idle unless a bad line keeps it in display state.
    pub fn end_line(&mut self, bad_line: bool) {
        if self.rc == 7 {
            self.vcbase = self.vc;
            if !bad_line {
                self.idle = true;
            }
        }
        if !self.idle {
            self.rc = (self.rc + 1) & 7;
        }
    }

    /// After a display-state g-access: move to the next character slot.
    pub fn advance(&mut self) {
        self.vc = (self.vc + 1) & 0x3FF;
        self.vmli += 1;
    }
}

/// DMA and display state of one sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteCounters {
    /// Data counter: offset of the next byte within the 63-byte block.
    pub mc: u8,
    /// Value `mc` reloads from at cycle 58.
    pub mcbase: u8,
    /// Y expansion flip-flop. While clear, `mcbase` does not advance so the
    /// same row is fetched again.
    pub yexp: bool,
    /// The sprite claims its s-access slots.
    pub dma: bool,
    pub display: bool,
}

impl Default for SpriteCounters {
    fn default() -> Self {
        Self {
            mc: 0,
            mcbase: 0,
            yexp: true,
            dma: false,
            display: false,
        }
    }
}

impl SpriteCounters {
    /// Cycles 55 and 56: start DMA on the sprite's first line.
    pub fn check_dma(&mut self, enabled: bool, y_match: bool, expanded: bool) {
        if enabled && y_match && !self.dma {
            self.dma = true;
            self.mcbase = 0;
            if expanded {
                self.yexp = false;
            }
        }
    }

    /// Cycle 55: expanded sprites alternate between repeating and advancing.
    pub fn toggle_expansion(&mut self, expanded: bool) {
        if expanded {
            self.yexp = !self.yexp;
        }
    }

    /// Cycle 15.
    pub fn advance_base(&mut self) {
        if self.yexp {
            self.mcbase += 2;
        }
    }

    /// Cycle 16. A sprite is done after 21 rows of 3 bytes.
    pub fn finish_base(&mut self) {
        if self.yexp {
            self.mcbase += 1;
        }
        if self.mcbase >= 63 {
            self.dma = false;
            self.display = false;
        }
    }

    /// Cycle 58.
    pub fn reload(&mut self, y_match: bool) {
        self.mc = self.mcbase;
        if self.dma && y_match {
            self.display = true;
        }
    }

    /// A write to $17 with this sprite's bit clear sets the flip-flop,
    /// which is what makes sprite crunching possible mid-sprite.
    pub fn crunch(&mut self, expanded: bool) {
        if !expanded {
            self.yexp = true;
        }
    }

    /// After an s-access.
    pub fn fetched(&mut self) {
        self.mc = (self.mc + 1) & 0x3F;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_line_cycle() {
        let mut bg = BackgroundCounters::default();
        bg.start_frame();
        bg.idle = false;
        // Bad line: rc resets, then eight rows of 40 characters.
        bg.start_line(true);
        for row in 0..8 {
            bg.start_line(row == 0);
            for _ in 0..40 {
                bg.advance();
            }
            bg.end_line(row == 0);
        }
        assert_eq!(bg.vcbase, 40);
        assert!(bg.idle);
        assert_eq!(bg.rc, 7);
    }

    #[test]
    fn bad_line_keeps_display_state_at_row_seven() {
        let mut bg = BackgroundCounters {
            rc: 7,
            vc: 80,
            idle: false,
            ..BackgroundCounters::default()
        };
        bg.end_line(true);
        assert!(!bg.idle);
        assert_eq!(bg.vcbase, 80);
        assert_eq!(bg.rc, 0);
    }

    #[test]
    fn idle_state_holds_rc() {
        let mut bg = BackgroundCounters::default();
        bg.rc = 3;
        bg.end_line(false);
        assert_eq!(bg.rc, 3);
    }

    #[test]
    fn video_counter_wraps_at_ten_bits() {
        let mut bg = BackgroundCounters { vc: 0x3FF, ..BackgroundCounters::default() };
        bg.advance();
        assert_eq!(bg.vc, 0);
    }

    /// One line of sprite bookkeeping as the scheduler drives it.
    fn run_line(s: &mut SpriteCounters, y_match: bool, expanded: bool) {
        if s.dma {
            s.advance_base();
            s.finish_base();
        }
        s.toggle_expansion(expanded);
        s.check_dma(true, y_match, expanded);
        s.check_dma(true, y_match, expanded);
        s.reload(y_match);
    }

    #[test]
    fn unexpanded_sprite_lasts_21_lines() {
        let mut s = SpriteCounters::default();
        run_line(&mut s, true, false);
        assert!(s.dma && s.display);
        let mut lines = 1;
        while s.dma {
            run_line(&mut s, false, false);
            lines += 1;
        }
        assert_eq!(lines, 22);
        assert!(!s.display);
    }

    #[test]
    fn expanded_sprite_lasts_42_lines() {
        let mut s = SpriteCounters::default();
        run_line(&mut s, true, true);
        let mut lines = 1;
        while s.dma {
            run_line(&mut s, false, true);
            lines += 1;
        }
        assert_eq!(lines, 43);
    }

    #[test]
    fn crunch_sets_flip_flop_only_for_cleared_bits() {
        let mut s = SpriteCounters { yexp: false, ..SpriteCounters::default() };
        s.crunch(true);
        assert!(!s.yexp);
        s.crunch(false);
        assert!(s.yexp);
    }

    #[test]
    fn data_counter_wraps_at_six_bits() {
        let mut s = SpriteCounters { mc: 63, ..SpriteCounters::default() };
        s.fetched();
        assert_eq!(s.mc, 0);
    }
}
