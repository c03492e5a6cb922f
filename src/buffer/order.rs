/// Legacy type flag for RGB wired strands
pub const FLAG_RGB: u8 = 0x00;
/// Legacy type flag for GRB wired strands
pub const FLAG_GRB: u8 = 0x01;
/// Legacy type flag for BRG wired strands
pub const FLAG_BRG: u8 = 0x04;

/// Physical channel order of a strand
///
/// Determines where red, green and blue land inside each 3-byte pixel on
/// the wire. Packed colors at the API boundary stay canonical RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    Rgb,
    #[default]
    Grb,
    Brg,
}

/// Byte offsets of each channel within a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOffsets {
    pub r: usize,
    pub g: usize,
    pub b: usize,
}

impl ChannelOrder {
    /// Parse the legacy type flags
    ///
    /// The GRB bit takes precedence, unknown values fall back to RGB.
    pub const fn from_flags(flags: u8) -> Self {
        if flags & FLAG_GRB != 0 {
            Self::Grb
        } else if flags & FLAG_BRG != 0 {
            Self::Brg
        } else {
            Self::Rgb
        }
    }

    pub const fn flags(self) -> u8 {
        match self {
            Self::Rgb => FLAG_RGB,
            Self::Grb => FLAG_GRB,
            Self::Brg => FLAG_BRG,
        }
    }

    pub const fn offsets(self) -> ChannelOffsets {
        match self {
            Self::Rgb => ChannelOffsets { r: 0, g: 1, b: 2 },
            Self::Grb => ChannelOffsets { r: 1, g: 0, b: 2 },
            Self::Brg => ChannelOffsets { r: 1, g: 2, b: 0 },
        }
    }
}
