//! Driver facade
//!
//! Ties the pixel buffer, pin binding and encoder together:
//!
//! ```text
//! Unbound --begin()--> Ready --show()--> Transmitting --> Ready
//!    ^                   |
//!    +------end()--------+        set_pin() rebinds within Ready
//! ```
//!
//! Nothing here reports errors. Unresolved pins, out-of-range indices and
//! an inert buffer all turn the affected call into a no-op; the checked
//! `try_*` accessors are available when a caller wants to know.

use core::convert::Infallible;

use embassy_time::Duration;
use smart_leds::SmartLedsWrite;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::board::{BoardSupport, MaintenanceGuard};
use crate::buffer::{ChannelOrder, PixelBuffer, PixelIndexError};
use crate::color::{Rgb, pack};
use crate::encoder;
use crate::gpio::{GpioBinding, Level, PinBinding, PinId, PinMask, PinMode};
use crate::timing::ACTIVE_PROFILE;

/// Construction parameters for [`Ws2811Driver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Number of LEDs on the strip
    pub led_count: u16,
    /// Data pin
    pub pin: PinId,
    /// Wiring order of the strand
    pub order: ChannelOrder,
    /// Initial brightness, `None` leaves colors unscaled
    pub brightness: Option<u8>,
}

impl DriverConfig {
    /// GRB strand, no brightness scaling
    pub const fn new(led_count: u16, pin: PinId) -> Self {
        Self {
            led_count,
            pin,
            order: ChannelOrder::Grb,
            brightness: None,
        }
    }

    pub const fn with_order(mut self, order: ChannelOrder) -> Self {
        self.order = order;
        self
    }

    pub const fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(brightness);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No output register bound
    Unbound,
    /// Pin is an output held low
    Ready,
    /// A frame is being streamed
    Transmitting,
}

/// WS2811/WS2812 strip driver
///
/// `MAX_LEDS` is the buffer capacity reserved up front.
pub struct Ws2811Driver<G: GpioBinding, B: BoardSupport, const MAX_LEDS: usize> {
    gpio: G,
    board: B,
    pin: PinId,
    mask_override: Option<PinMask>,
    binding: Option<PinBinding<G::Port>>,
    pixels: PixelBuffer<MAX_LEDS>,
    state: DriverState,
}

impl<G: GpioBinding, B: BoardSupport, const MAX_LEDS: usize> Ws2811Driver<G, B, MAX_LEDS> {
    /// Create a driver for a GRB strand
    pub fn new(led_count: u16, pin: PinId, gpio: G, board: B) -> Self {
        Self::with_config(&DriverConfig::new(led_count, pin), gpio, board)
    }

    pub fn with_config(config: &DriverConfig, gpio: G, board: B) -> Self {
        let mut pixels = PixelBuffer::new(config.led_count, config.order);
        if let Some(brightness) = config.brightness {
            pixels.set_brightness(brightness);
        }
        Self {
            gpio,
            board,
            pin: config.pin,
            mask_override: None,
            binding: None,
            pixels,
            state: DriverState::Unbound,
        }
    }

    /// Pack separate channels into a canonical `0xRRGGBB` color
    pub const fn color(r: u8, g: u8, b: u8) -> u32 {
        pack(r, g, b)
    }

    /// Configure the pin as an output, drive it low and bind its register
    pub fn begin(&mut self) {
        self.gpio.set_mode(self.pin, PinMode::Output);
        self.gpio.write(self.pin, Level::Low);

        self.binding = self.gpio.resolve(self.pin);
        if let (Some(binding), Some(mask)) = (self.binding.as_mut(), self.mask_override) {
            binding.set_mask(mask);
        }

        self.state = if self.binding.is_some() {
            DriverState::Ready
        } else {
            #[cfg(feature = "esp32-log")]
            println!("[Ws2811Driver.begin] pin {} could not be resolved", self.pin);
            DriverState::Unbound
        };
    }

    /// Release the pin to input mode
    pub fn end(&mut self) {
        self.gpio.set_mode(self.pin, PinMode::Input);
        self.binding = None;
        self.state = DriverState::Unbound;
    }

    /// Move output to another pin
    ///
    /// The old pin is released to input first. A mask set with
    /// [`Ws2811Driver::set_pin_mask`] does not carry over.
    pub fn set_pin(&mut self, pin: PinId) {
        self.gpio.set_mode(self.pin, PinMode::Input);
        self.pin = pin;
        self.mask_override = None;
        self.begin();
    }

    /// Override the bit mask used for the data pin
    pub fn set_pin_mask(&mut self, mask: PinMask) {
        self.mask_override = Some(mask);
        if let Some(binding) = self.binding.as_mut() {
            binding.set_mask(mask);
        }
    }

    /// Stream the buffer to the strip
    ///
    /// Runs with interrupts disabled and the maintenance timer suspended.
    /// Does nothing while unbound or inert.
    pub fn show(&mut self) {
        let Self {
            board,
            binding,
            pixels,
            state,
            ..
        } = self;
        let (Some(binding), Some(data)) = (binding.as_mut(), pixels.as_bytes()) else {
            return;
        };

        *state = DriverState::Transmitting;
        {
            let _timer = MaintenanceGuard::suspend(board);
            let mask = binding.mask();
            let port = binding.port_mut();
            critical_section::with(|_| {
                encoder::write_frame(port, mask, data, &ACTIVE_PROFILE);
            });
        }
        *state = DriverState::Ready;
    }

    pub fn set_pixel_color(&mut self, index: u16, r: u8, g: u8, b: u8) {
        self.pixels.set(index, r, g, b);
    }

    pub fn set_pixel_color_packed(&mut self, index: u16, color: u32) {
        self.pixels.set_packed(index, color);
    }

    pub fn try_set_pixel_color(
        &mut self,
        index: u16,
        r: u8,
        g: u8,
        b: u8,
    ) -> Result<(), PixelIndexError> {
        self.pixels.try_set(index, r, g, b)
    }

    /// Stored color as `0xRRGGBB`, 0 when out of range
    pub fn pixel_color(&self, index: u16) -> u32 {
        self.pixels.get(index)
    }

    pub fn try_pixel_color(&self, index: u16) -> Result<u32, PixelIndexError> {
        self.pixels.try_get(index)
    }

    pub const fn num_pixels(&self) -> u16 {
        self.pixels.len()
    }

    /// Set brightness (0 = off, 255 = unscaled)
    ///
    /// Rescales the stored colors in place; see [`crate::buffer::Brightness`].
    pub fn set_brightness(&mut self, level: u8) {
        self.pixels.set_brightness(level);
    }

    pub const fn brightness(&self) -> u8 {
        self.pixels.brightness().level()
    }

    pub const fn order(&self) -> ChannelOrder {
        self.pixels.order()
    }

    pub const fn pin(&self) -> PinId {
        self.pin
    }

    /// Output register of the bound pin, if any
    pub fn port(&self) -> Option<&G::Port> {
        self.binding.as_ref().map(PinBinding::port)
    }

    /// Bit mask of the bound pin, if any
    pub fn pin_mask(&self) -> Option<PinMask> {
        self.binding.as_ref().map(PinBinding::mask)
    }

    pub const fn state(&self) -> DriverState {
        self.state
    }

    pub const fn is_inert(&self) -> bool {
        self.pixels.is_inert()
    }

    pub const fn pixels(&self) -> &PixelBuffer<MAX_LEDS> {
        &self.pixels
    }

    /// Time `show()` spends with interrupts disabled
    #[allow(clippy::cast_lossless)]
    pub const fn frame_duration(&self) -> Duration {
        ACTIVE_PROFILE.frame_duration(self.pixels.len() as usize * 3)
    }

    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    pub fn board(&self) -> &B {
        &self.board
    }
}

impl<G: GpioBinding, B: BoardSupport, const MAX_LEDS: usize> Drop for Ws2811Driver<G, B, MAX_LEDS> {
    fn drop(&mut self) {
        self.gpio.set_mode(self.pin, PinMode::Input);
    }
}

impl<G: GpioBinding, B: BoardSupport, const MAX_LEDS: usize> OutputDriver
    for Ws2811Driver<G, B, MAX_LEDS>
{
    fn write(&mut self, colors: &[Rgb]) {
        for (index, color) in (0..self.num_pixels()).zip(colors) {
            self.set_pixel_color(index, color.r, color.g, color.b);
        }
        self.show();
    }
}

impl<G: GpioBinding, B: BoardSupport, const MAX_LEDS: usize> SmartLedsWrite
    for Ws2811Driver<G, B, MAX_LEDS>
{
    type Error = Infallible;
    type Color = Rgb;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        for (index, color) in (0..self.num_pixels()).zip(iterator) {
            let color = color.into();
            self.set_pixel_color(index, color.r, color.g, color.b);
        }
        self.show();
        Ok(())
    }
}
