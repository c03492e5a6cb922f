//! Write-time brightness scaling
//!
//! Brightness is baked into the stored bytes instead of being applied while
//! the frame is streamed, since the encoder has no spare cycles per bit.
//! Changing the level rescales the existing bytes in place, which is lossy:
//! precision dropped by dimming is not recovered when brightening again.

/// Global brightness, stored as `level + 1`
///
/// The stored value wraps, so `0` stored means "no scaling" (public level
/// 255), `1` is fully off and `255` is just below full brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Brightness {
    stored: u8,
}

impl Brightness {
    /// Sentinel: color values are stored as written
    pub const UNSCALED: Self = Self { stored: 0 };

    pub const fn from_level(level: u8) -> Self {
        Self {
            stored: level.wrapping_add(1),
        }
    }

    /// Public level (0-255); the sentinel reads back as 255
    pub const fn level(self) -> u8 {
        self.stored.wrapping_sub(1)
    }

    pub const fn stored(self) -> u8 {
        self.stored
    }

    pub const fn is_unscaled(self) -> bool {
        self.stored == 0
    }

    /// Scale a channel value written at this brightness
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn apply(self, value: u8) -> u8 {
        if self.stored == 0 {
            return value;
        }
        ((value as u16 * self.stored as u16) >> 8) as u8
    }

    /// Fixed-point factor converting bytes stored at `self` to `target`
    ///
    /// An old level of zero yields zero: the buffer was black already and
    /// the division would be undefined.
    #[allow(clippy::cast_lossless)]
    pub const fn rescale_factor(self, target: Self) -> u16 {
        let old = self.level() as u16;
        if old == 0 {
            0
        } else if target.stored == 0 {
            u16::MAX / old
        } else {
            (((target.stored as u16) << 8) - 1) / old
        }
    }
}

/// Multiply every byte by `scale / 256`, truncating to 8 bits
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn rescale(bytes: &mut [u8], scale: u16) {
    for byte in bytes {
        *byte = ((u32::from(*byte) * u32::from(scale)) >> 8) as u8;
    }
}
