//! Register: CTX_SLOT

/// CTX_SLOT
///
/// Slot index. Used by CTX_SELECT (slot targeted by register writes)
/// and CTX_ACTIVE (read-only, slot the hardware is consuming).
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct CtxSlotReg(u32);

impl core::default::Default for CtxSlotReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for CtxSlotReg {
    type Regwidth = u32;

    fn from_raw(val: Self::Regwidth) -> Self {
        Self(val)
    }

    fn to_raw(self) -> Self::Regwidth {
        self.0
    }
}

impl CtxSlotReg {
    pub const SLOT_OFFSET: usize = 0;
    pub const SLOT_WIDTH: usize = 3;
    pub const SLOT_MASK: u32 = 0x7;

    /// SLOT
    ///
    /// Slot encoding, see SlotE
    #[inline(always)]
    #[must_use]
    pub fn slot(&self) -> u8 {
        let val = (self.0 >> Self::SLOT_OFFSET) & Self::SLOT_MASK;
        val as u8
    }

    /// SLOT
    #[inline(always)]
    pub fn set_slot(&mut self, val: u8) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::SLOT_MASK << Self::SLOT_OFFSET))
            | ((val & Self::SLOT_MASK) << Self::SLOT_OFFSET);
    }

    pub const RSVD_OFFSET: usize = 3;
    pub const RSVD_WIDTH: usize = 29;
    pub const RSVD_MASK: u32 = 0x1FFF_FFFF;

    /// RSVD
    #[inline(always)]
    #[must_use]
    pub fn rsvd(&self) -> u32 {
        (self.0 >> Self::RSVD_OFFSET) & Self::RSVD_MASK
    }

    /// RSVD
    #[inline(always)]
    pub fn set_rsvd(&mut self, val: u32) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::RSVD_MASK << Self::RSVD_OFFSET))
            | ((val & Self::RSVD_MASK) << Self::RSVD_OFFSET);
    }
}

impl core::fmt::Debug for CtxSlotReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CtxSlotReg")
            .field("slot", &self.slot())
            .field("rsvd", &self.rsvd())
            .finish()
    }
}
