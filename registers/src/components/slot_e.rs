//! Field Enum: SLOT

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotE {
    /// Context slot A
    SlotA = 0,
    /// Context slot B
    SlotB = 1,
    /// Context slot C
    SlotC = 2,
    /// Context slot D
    SlotD = 3,
    /// Writes land in the live register file immediately
    Direct = 7,
}

impl SlotE {
    /// Decode a bit pattern into an encoded enum variant.
    ///
    /// # Errors
    /// Returns an error if the bit pattern does not match any encoded variants.
    pub const fn from_bits(bits: u8) -> Result<Self, crate::encode::UnknownVariant<u8>> {
        match bits {
            0 => Ok(Self::SlotA),
            1 => Ok(Self::SlotB),
            2 => Ok(Self::SlotC),
            3 => Ok(Self::SlotD),
            7 => Ok(Self::Direct),
            bits => Err(crate::encode::UnknownVariant::new(bits)),
        }
    }

    /// The bit pattern of the variant
    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}
