//! Field Enum: MODE

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockModeE {
    /// Pixels pass through untouched
    Bypass = 0,
    /// Single-frame processing
    Normal = 1,
    /// Uses history from the previous frame
    Temporal = 2,
    /// Flush internal state without DMA traffic
    PostProcess = 3,
}

impl BlockModeE {
    /// Decode a bit pattern into an encoded enum variant.
    ///
    /// # Errors
    /// Returns an error if the bit pattern does not match any encoded variants.
    pub const fn from_bits(bits: u8) -> Result<Self, crate::encode::UnknownVariant<u8>> {
        match bits {
            0 => Ok(Self::Bypass),
            1 => Ok(Self::Normal),
            2 => Ok(Self::Temporal),
            3 => Ok(Self::PostProcess),
            bits => Err(crate::encode::UnknownVariant::new(bits)),
        }
    }

    /// The bit pattern of the variant
    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}
