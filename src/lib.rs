#![no_std]

pub mod board;
pub mod buffer;
pub mod color;
pub mod driver;
pub mod encoder;
pub mod gpio;
pub mod hal;
pub mod timing;

pub use board::{BoardSupport, NoMaintenanceTimer};
pub use buffer::{Brightness, ChannelOrder, PixelBuffer, PixelIndexError};
pub use driver::{DriverConfig, DriverState, Ws2811Driver};
pub use gpio::{GpioBinding, Level, OutputPort, PinBinding, PinId, PinMask, PinMode};
pub use timing::{ACTIVE_PROFILE, CPU_CLOCK_HZ, ClockRate, DatasheetWindow, TimingProfile};

pub use color::{Rgb, pack, rgb_from_u32, rgb_to_u32, unpack};
pub use embassy_time::Duration;

/// Abstract LED driver trait
///
/// Implemented by [`Ws2811Driver`]; a renderer producing whole frames can
/// hand them over without knowing how they reach the strip.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
