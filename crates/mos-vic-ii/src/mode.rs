//! Graphics mode selector and g-access address generation.

/// The eight combinations of ECM, BMM and MCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicsMode {
    StandardText,
    MulticolorText,
    StandardBitmap,
    MulticolorBitmap,
    ExtendedText,
    /// ECM + MCM.
    InvalidText,
    /// ECM + BMM.
    InvalidBitmap,
    /// ECM + BMM + MCM.
    InvalidMulticolorBitmap,
}

impl GraphicsMode {
    #[must_use]
    pub const fn from_bits(ecm: bool, bmm: bool, mcm: bool) -> Self {
        match (ecm, bmm, mcm) {
            (false, false, false) => Self::StandardText,
            (false, false, true) => Self::MulticolorText,
            (false, true, false) => Self::StandardBitmap,
            (false, true, true) => Self::MulticolorBitmap,
            (true, false, false) => Self::ExtendedText,
            (true, false, true) => Self::InvalidText,
            (true, true, false) => Self::InvalidBitmap,
            (true, true, true) => Self::InvalidMulticolorBitmap,
        }
    }

    /// Invalid modes still fetch but always display black.
    #[must_use]
    pub const fn is_blank(self) -> bool {
        matches!(
            self,
            Self::InvalidText | Self::InvalidBitmap | Self::InvalidMulticolorBitmap
        )
    }

    #[must_use]
    pub const fn is_bitmap(self) -> bool {
        matches!(
            self,
            Self::StandardBitmap
                | Self::MulticolorBitmap
                | Self::InvalidBitmap
                | Self::InvalidMulticolorBitmap
        )
    }

    /// g-access address in display state.
    ///
    /// `char_base` is CB13-CB11, `code` the character byte from the line
    /// cache, `vc` the video counter and `rc` the row counter.
    #[must_use]
    pub const fn g_address(self, char_base: u16, code: u8, vc: u16, rc: u8) -> u16 {
        let rc = (rc & 7) as u16;
        match self {
            Self::StandardText | Self::MulticolorText => {
                (char_base << 11) | ((code as u16) << 3) | rc
            }
            Self::ExtendedText | Self::InvalidText => {
                (char_base << 11) | (((code & 0x3F) as u16) << 3) | rc
            }
            Self::StandardBitmap | Self::MulticolorBitmap => {
                ((char_base & 4) << 11) | ((vc & 0x3FF) << 3) | rc
            }
            Self::InvalidBitmap | Self::InvalidMulticolorBitmap => {
                (((char_base & 4) << 11) | ((vc & 0x3FF) << 3) | rc) & 0x39FF
            }
        }
    }

    /// Short name used in logs and inspection.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StandardText => "standard text",
            Self::MulticolorText => "multicolor text",
            Self::StandardBitmap => "standard bitmap",
            Self::MulticolorBitmap => "multicolor bitmap",
            Self::ExtendedText => "extended color text",
            Self::InvalidText => "invalid text",
            Self::InvalidBitmap => "invalid bitmap",
            Self::InvalidMulticolorBitmap => "invalid multicolor bitmap",
        }
    }
}
