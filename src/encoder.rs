//! Protocol encoder
//!
//! Streams a byte sequence as WS2811 pulses: one high/low pair per bit,
//! most significant bit first, then a sustained low period that latches the
//! frame. The routine must run with interrupts disabled; an interruption
//! longer than the low-time tolerance corrupts the rest of the frame and
//! the only remedy is to send it again from the first byte.

use crate::gpio::{OutputPort, PinMask};
use crate::timing::TimingProfile;

/// Emit a full frame and the trailing reset gap
///
/// The line is low on entry and on exit. Timing is only correct when
/// `profile` matches the running clock.
///
/// Each bit is one `delay_cycles` call per phase. The bit loop's overhead
/// falls between the low delay and the next rising edge, so it lengthens
/// the low phase; see [`OutputPort`] for how ports compensate.
pub fn write_frame<P: OutputPort>(
    port: &mut P,
    mask: PinMask,
    data: &[u8],
    profile: &TimingProfile,
) {
    for &byte in data {
        write_byte(port, mask, byte, profile);
    }

    // An empty frame emits no bits, so the line has never been driven here
    port.set_low(mask);
    port.delay_cycles(profile.reset_gap);
}

#[inline(always)]
fn write_byte<P: OutputPort>(port: &mut P, mask: PinMask, mut byte: u8, profile: &TimingProfile) {
    for _ in 0..8 {
        let (high, low) = profile.phases(byte & 0x80 != 0);
        port.set_high(mask);
        port.delay_cycles(high);
        port.set_low(mask);
        port.delay_cycles(low);
        byte <<= 1;
    }
}
