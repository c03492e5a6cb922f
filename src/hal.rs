//! `embedded-hal` adapter
//!
//! Lets any [`OutputPin`] serve as the output register of a strip. The pin
//! methods must compile down to a single store for the timing to hold,
//! which is true for most PAC-backed HALs in release builds.

use embedded_hal::digital::OutputPin;

use crate::gpio::{OutputPort, PinMask};

/// Busy-wait for a number of CPU cycles
pub trait CycleDelay {
    fn delay_cycles(&mut self, cycles: u32);
}

/// [`OutputPort`] backed by a single HAL pin
///
/// The pin mask is ignored: the pin already identifies the line.
#[derive(Debug)]
pub struct PinPort<P, D> {
    pin: P,
    delay: D,
}

impl<P: OutputPin, D: CycleDelay> PinPort<P, D> {
    pub const fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P: OutputPin, D: CycleDelay> OutputPort for PinPort<P, D> {
    #[inline(always)]
    fn set_high(&mut self, _mask: PinMask) {
        let _ = self.pin.set_high();
    }

    #[inline(always)]
    fn set_low(&mut self, _mask: PinMask) {
        let _ = self.pin.set_low();
    }

    #[inline(always)]
    fn delay_cycles(&mut self, cycles: u32) {
        self.delay.delay_cycles(cycles);
    }
}

/// Cycle delay using `cortex_m::asm::delay`
///
/// The loop has a granularity of a few cycles, so short phases round up.
#[cfg(feature = "cortex-m")]
#[derive(Debug, Clone, Copy, Default)]
pub struct CortexMDelay;

#[cfg(feature = "cortex-m")]
impl CycleDelay for CortexMDelay {
    #[inline(always)]
    fn delay_cycles(&mut self, cycles: u32) {
        cortex_m::asm::delay(cycles);
    }
}
