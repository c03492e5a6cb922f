//! GPIO binding capability
//!
//! The driver never touches registers directly. A platform provides a
//! [`GpioBinding`] that resolves a logical pin into a bit mask and an
//! [`OutputPort`] handle. The port owns the architecture-specific
//! instruction sequences (register writes and cycle burning) used by the
//! encoder.

/// Logical pin identifier, as used by the board pin map
pub type PinId = u8;

/// Bit mask selecting a pin within its output register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PinMask(pub u16);

impl PinMask {
    /// Mask for a single bit of the port
    ///
    /// # Panics
    ///
    /// `bit` must be in `0..16`.
    pub const fn bit(bit: u8) -> Self {
        assert!(bit < 16, "PinMask::bit: bit must be below 16");
        Self(1 << bit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Resolved output register of a port
///
/// Implementations must keep `set_high`/`set_low` free of branches so that
/// the cost of an edge is constant, and must account for that cost inside
/// `delay_cycles`: a phase of `n` cycles is measured from one edge to the
/// next.
///
/// The low phase of every bit also carries the encoder's own per-bit work
/// (shifting the byte, the loop branch and selecting the next phase pair),
/// which runs between the low delay and the next `set_high`. A port tuned
/// for exact timing trims that overhead from its low-phase delays.
pub trait OutputPort {
    /// Drive the masked pins high
    fn set_high(&mut self, mask: PinMask);

    /// Drive the masked pins low
    fn set_low(&mut self, mask: PinMask);

    /// Burn `cycles` CPU cycles
    fn delay_cycles(&mut self, cycles: u32);
}

/// Board pin map and pin mode control
pub trait GpioBinding {
    type Port: OutputPort;

    /// Resolve a logical pin to its mask and output register
    ///
    /// Returns `None` for pins the board does not map.
    fn resolve(&mut self, pin: PinId) -> Option<PinBinding<Self::Port>>;

    fn set_mode(&mut self, pin: PinId, mode: PinMode);

    fn write(&mut self, pin: PinId, level: Level);
}

/// A pin resolved to an output register
#[derive(Debug, Clone)]
pub struct PinBinding<P> {
    pin: PinId,
    mask: PinMask,
    port: P,
}

impl<P: OutputPort> PinBinding<P> {
    pub const fn new(pin: PinId, mask: PinMask, port: P) -> Self {
        Self { pin, mask, port }
    }

    pub const fn pin(&self) -> PinId {
        self.pin
    }

    pub const fn mask(&self) -> PinMask {
        self.mask
    }

    pub(crate) fn set_mask(&mut self, mask: PinMask) {
        self.mask = mask;
    }

    pub const fn port(&self) -> &P {
        &self.port
    }

    pub(crate) fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }
}

impl<G: GpioBinding + ?Sized> GpioBinding for &mut G {
    type Port = G::Port;

    fn resolve(&mut self, pin: PinId) -> Option<PinBinding<Self::Port>> {
        (**self).resolve(pin)
    }

    fn set_mode(&mut self, pin: PinId, mode: PinMode) {
        (**self).set_mode(pin, mode);
    }

    fn write(&mut self, pin: PinId, level: Level) {
        (**self).write(pin, level);
    }
}
