//! Register: CTX_COMMIT

/// CTX_COMMIT
///
/// Writing TRIGGER queues SLOT to be applied at the next frame boundary.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct CtxCommitReg(u32);

impl core::default::Default for CtxCommitReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for CtxCommitReg {
    type Regwidth = u32;

    fn from_raw(val: Self::Regwidth) -> Self {
        Self(val)
    }

    fn to_raw(self) -> Self::Regwidth {
        self.0
    }
}

impl CtxCommitReg {
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
    pub const RSVD_WIDTH: usize = 28;
    pub const RSVD_MASK: u32 = 0xFFF_FFFF;

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

    pub const TRIGGER_OFFSET: usize = 31;
    pub const TRIGGER_WIDTH: usize = 1;
    pub const TRIGGER_MASK: u32 = 0x1;

    /// TRIGGER
    ///
    /// Queue the commit
    #[inline(always)]
    #[must_use]
    pub fn trigger(&self) -> bool {
        let val = (self.0 >> Self::TRIGGER_OFFSET) & Self::TRIGGER_MASK;
        val == 1
    }

    /// TRIGGER
    #[inline(always)]
    pub fn set_trigger(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::TRIGGER_MASK << Self::TRIGGER_OFFSET))
            | ((val & Self::TRIGGER_MASK) << Self::TRIGGER_OFFSET);
    }
}

impl core::fmt::Debug for CtxCommitReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CtxCommitReg")
            .field("slot", &self.slot())
            .field("rsvd", &self.rsvd())
            .field("trigger", &self.trigger())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let reg = CtxCommitReg::default();
        assert_eq!(reg.slot(), 0);
        assert_eq!(reg.rsvd(), 0);
        assert!(!reg.trigger());
    }

    #[test]
    fn test_set_trigger() {
        let mut reg = CtxCommitReg::default();
        reg.set_trigger(true);
        assert!(reg.trigger());
        assert_eq!(crate::reg::Register::to_raw(reg), 1 << CtxCommitReg::TRIGGER_OFFSET);
    }
}
