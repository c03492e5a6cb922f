//! Timing profiles for the single-wire protocol
//!
//! All phase lengths are expressed in CPU cycles because the encoder
//! counts instructions instead of reading a hardware timer. A profile is
//! therefore only valid at the clock rate it was tuned for, and the pairing
//! between the configured clock and the active profile is checked at
//! compile time.
//!
//! | Phase | Datasheet  | 16 MHz          | 25 MHz          |
//! |-------|------------|-----------------|-----------------|
//! | T0H   | 350 ns     | 6 cy (375 ns)   | 9 cy (360 ns)   |
//! | T0L   | 800 ns     | 13 cy (812 ns)  | 20 cy (800 ns)  |
//! | T1H   | 700 ns     | 11 cy (687 ns)  | 18 cy (720 ns)  |
//! | T1L   | 600 ns     | 9 cy (562 ns)   | 15 cy (600 ns)  |
//! | Reset | >= 50 us   | 800 cy (50 us)  | 1250 cy (50 us) |

use embassy_time::Duration;

#[cfg(not(any(feature = "clock-16mhz", feature = "clock-25mhz")))]
compile_error!("ws2811-driver: enable one of the `clock-16mhz` or `clock-25mhz` features");

#[cfg(all(feature = "clock-16mhz", feature = "clock-25mhz"))]
compile_error!(
    "ws2811-driver: `clock-16mhz` and `clock-25mhz` are mutually exclusive; \
     `clock-16mhz` is a default feature, so select `clock-25mhz` with `default-features = false`"
);

/// CPU clock frequency the crate is built for
#[cfg(feature = "clock-16mhz")]
pub const CPU_CLOCK_HZ: u32 = 16_000_000;

/// CPU clock frequency the crate is built for
#[cfg(all(feature = "clock-25mhz", not(feature = "clock-16mhz")))]
pub const CPU_CLOCK_HZ: u32 = 25_000_000;

/// Profile matching [`CPU_CLOCK_HZ`]
///
/// Evaluated in a const context, so an unsupported clock is a build error.
pub const ACTIVE_PROFILE: TimingProfile = match ClockRate::from_hz(CPU_CLOCK_HZ) {
    Some(rate) => rate.profile(),
    None => panic!("ws2811-driver: no timing profile for the configured CPU clock"),
};

const _: () = assert!(
    ACTIVE_PROFILE.clock_hz == CPU_CLOCK_HZ,
    "ws2811-driver: timing profile does not match the configured CPU clock"
);
const _: () = assert!(
    DatasheetWindow::WS2812.accepts(&ACTIVE_PROFILE),
    "ws2811-driver: active timing profile is outside the WS2812 datasheet window"
);

/// Phase durations for one clock rate, in CPU cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingProfile {
    /// Clock the cycle counts were tuned for
    pub clock_hz: u32,
    /// T0H
    pub high_zero: u32,
    /// T0L
    pub low_zero: u32,
    /// T1H
    pub high_one: u32,
    /// T1L
    pub low_one: u32,
    /// Minimum low time after the last bit of a frame
    pub reset_gap: u32,
}

impl TimingProfile {
    pub const MHZ_16: Self = Self {
        clock_hz: 16_000_000,
        high_zero: 6,
        low_zero: 13,
        high_one: 11,
        low_one: 9,
        reset_gap: 800,
    };

    pub const MHZ_25: Self = Self {
        clock_hz: 25_000_000,
        high_zero: 9,
        low_zero: 20,
        high_one: 18,
        low_one: 15,
        reset_gap: 1250,
    };

    /// High and low phase lengths for one bit value
    #[inline(always)]
    pub const fn phases(&self, bit: bool) -> (u32, u32) {
        if bit {
            (self.high_one, self.low_one)
        } else {
            (self.high_zero, self.low_zero)
        }
    }

    /// Convert a cycle count at this profile's clock into nanoseconds
    #[allow(clippy::cast_possible_truncation)]
    pub const fn cycles_to_nanos(&self, cycles: u32) -> u32 {
        (cycles as u64 * 1_000_000_000 / self.clock_hz as u64) as u32
    }

    /// Worst-case cycles needed to stream `bytes` bytes plus the reset gap
    pub const fn frame_cycles(&self, bytes: usize) -> u64 {
        let zero = self.high_zero + self.low_zero;
        let one = self.high_one + self.low_one;
        let bit = if zero > one { zero } else { one };
        bytes as u64 * 8 * bit as u64 + self.reset_gap as u64
    }

    /// Wall-clock length of a frame of `bytes` bytes, rounded up
    pub const fn frame_duration(&self, bytes: usize) -> Duration {
        let cycles = self.frame_cycles(bytes);
        let hz = self.clock_hz as u64;
        Duration::from_micros((cycles * 1_000_000).div_ceil(hz))
    }
}

/// Supported clock rates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockRate {
    Mhz16,
    Mhz25,
}

impl ClockRate {
    pub const fn from_hz(hz: u32) -> Option<Self> {
        match hz {
            16_000_000 => Some(Self::Mhz16),
            25_000_000 => Some(Self::Mhz25),
            _ => None,
        }
    }

    pub const fn hz(self) -> u32 {
        self.profile().clock_hz
    }

    pub const fn profile(self) -> TimingProfile {
        match self {
            Self::Mhz16 => TimingProfile::MHZ_16,
            Self::Mhz25 => TimingProfile::MHZ_25,
        }
    }
}

/// Nominal phase lengths and tolerance from a controller datasheet, in ns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasheetWindow {
    pub high_zero: u32,
    pub low_zero: u32,
    pub high_one: u32,
    pub low_one: u32,
    /// Allowed deviation for every data phase
    pub tolerance: u32,
    /// Minimum reset low time
    pub reset: u32,
}

impl DatasheetWindow {
    pub const WS2812: Self = Self {
        high_zero: 350,
        low_zero: 800,
        high_one: 700,
        low_one: 600,
        tolerance: 150,
        reset: 50_000,
    };

    /// Whether a measured phase of `actual` ns is within tolerance of `nominal`
    pub const fn phase_ok(&self, nominal: u32, actual: u32) -> bool {
        actual.abs_diff(nominal) <= self.tolerance
    }

    /// Check every phase of a profile against this window
    pub const fn accepts(&self, profile: &TimingProfile) -> bool {
        self.phase_ok(self.high_zero, profile.cycles_to_nanos(profile.high_zero))
            && self.phase_ok(self.low_zero, profile.cycles_to_nanos(profile.low_zero))
            && self.phase_ok(self.high_one, profile.cycles_to_nanos(profile.high_one))
            && self.phase_ok(self.low_one, profile.cycles_to_nanos(profile.low_one))
            && profile.cycles_to_nanos(profile.reset_gap) >= self.reset
            && profile.high_one > profile.high_zero
    }
}
