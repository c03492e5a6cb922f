//! Pixel buffer
//!
//! Holds the wire-ordered bytes for every LED. Channel order and brightness
//! are applied on write, so the buffer can be streamed as-is.

mod brightness;
mod order;

use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

pub use brightness::Brightness;
pub use order::{ChannelOffsets, ChannelOrder, FLAG_BRG, FLAG_GRB, FLAG_RGB};

use crate::color::{pack, unpack};

/// Error reported by the checked pixel accessors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelIndexError {
    /// Index is not below the LED count
    OutOfRange { index: u16, len: u16 },
    /// The buffer could not be reserved at construction
    Inert,
}

/// Per-LED RGB state in physical channel order
///
/// `MAX_LEDS` is the reserved capacity. Requesting more LEDs than that
/// leaves the buffer inert: every mutator becomes a no-op and every read
/// returns black.
#[derive(Debug, Clone)]
pub struct PixelBuffer<const MAX_LEDS: usize> {
    pixels: Option<Vec<[u8; 3], MAX_LEDS>>,
    len: u16,
    order: ChannelOrder,
    offsets: ChannelOffsets,
    brightness: Brightness,
}

impl<const MAX_LEDS: usize> PixelBuffer<MAX_LEDS> {
    /// Create a zeroed buffer for `len` LEDs
    pub fn new(len: u16, order: ChannelOrder) -> Self {
        let pixels = if usize::from(len) <= MAX_LEDS {
            let mut pixels = Vec::new();
            pixels.resize(usize::from(len), [0; 3]).ok().map(|()| pixels)
        } else {
            None
        };

        #[cfg(feature = "esp32-log")]
        {
            if pixels.is_none() {
                println!(
                    "[PixelBuffer.new] {} LEDs requested, capacity is {}; buffer is inert",
                    len, MAX_LEDS
                );
            }
        }

        Self {
            pixels,
            len,
            order,
            offsets: order.offsets(),
            brightness: Brightness::UNSCALED,
        }
    }

    /// Number of LEDs requested at construction
    pub const fn len(&self) -> u16 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn is_inert(&self) -> bool {
        self.pixels.is_none()
    }

    pub const fn order(&self) -> ChannelOrder {
        self.order
    }

    pub const fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Wire-ordered bytes, three per LED
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.pixels.as_deref().map(<[[u8; 3]]>::as_flattened)
    }

    /// Store a color, scaled by the active brightness
    ///
    /// Out-of-range indices are ignored.
    pub fn set(&mut self, index: u16, r: u8, g: u8, b: u8) {
        let _ = self.try_set(index, r, g, b);
    }

    pub fn set_packed(&mut self, index: u16, color: u32) {
        let (r, g, b) = unpack(color);
        self.set(index, r, g, b);
    }

    pub fn try_set(&mut self, index: u16, r: u8, g: u8, b: u8) -> Result<(), PixelIndexError> {
        let brightness = self.brightness;
        let offsets = self.offsets;
        let pixel = self.pixel_mut(index)?;

        pixel[offsets.r] = brightness.apply(r);
        pixel[offsets.g] = brightness.apply(g);
        pixel[offsets.b] = brightness.apply(b);
        Ok(())
    }

    /// Stored color repacked as canonical `0xRRGGBB`
    ///
    /// Returns 0 for out-of-range indices, which is indistinguishable from
    /// a black pixel. Use [`PixelBuffer::try_get`] to tell them apart.
    pub fn get(&self, index: u16) -> u32 {
        self.try_get(index).unwrap_or(0)
    }

    pub fn try_get(&self, index: u16) -> Result<u32, PixelIndexError> {
        let pixels = self.pixels.as_ref().ok_or(PixelIndexError::Inert)?;
        let pixel = pixels
            .get(usize::from(index))
            .ok_or(PixelIndexError::OutOfRange {
                index,
                len: self.len,
            })?;
        let offsets = self.offsets;
        Ok(pack(pixel[offsets.r], pixel[offsets.g], pixel[offsets.b]))
    }

    /// Change brightness and rescale the stored bytes once
    ///
    /// Returns `true` if the buffer was rescaled. Setting the current level
    /// again does nothing.
    pub fn set_brightness(&mut self, level: u8) -> bool {
        let target = Brightness::from_level(level);
        if target == self.brightness {
            return false;
        }
        let Some(pixels) = self.pixels.as_mut() else {
            return false;
        };

        let scale = self.brightness.rescale_factor(target);
        #[cfg(feature = "esp32-log")]
        println!(
            "[PixelBuffer.set_brightness] {} -> {} (scale {})",
            self.brightness.level(),
            level,
            scale
        );
        brightness::rescale(pixels.as_flattened_mut(), scale);
        self.brightness = target;
        true
    }

    fn pixel_mut(&mut self, index: u16) -> Result<&mut [u8; 3], PixelIndexError> {
        let len = self.len;
        let pixels = self.pixels.as_mut().ok_or(PixelIndexError::Inert)?;
        pixels
            .get_mut(usize::from(index))
            .ok_or(PixelIndexError::OutOfRange { index, len })
    }
}
