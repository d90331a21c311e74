//! Register: CTX_CTRL

/// CTX_CTRL
///
/// Context-slot engine control.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct CtxCtrlReg(u32);

impl core::default::Default for CtxCtrlReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for CtxCtrlReg {
    type Regwidth = u32;

    fn from_raw(val: Self::Regwidth) -> Self {
        Self(val)
    }

    fn to_raw(self) -> Self::Regwidth {
        self.0
    }
}

impl CtxCtrlReg {
    pub const ENABLE_OFFSET: usize = 0;
    pub const ENABLE_WIDTH: usize = 1;
    pub const ENABLE_MASK: u32 = 0x1;

    /// ENABLE
    ///
    /// Enable slot-banked register writes
    #[inline(always)]
    #[must_use]
    pub fn enable(&self) -> bool {
        let val = (self.0 >> Self::ENABLE_OFFSET) & Self::ENABLE_MASK;
        val == 1
    }

    /// ENABLE
    #[inline(always)]
    pub fn set_enable(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::ENABLE_MASK << Self::ENABLE_OFFSET))
            | ((val & Self::ENABLE_MASK) << Self::ENABLE_OFFSET);
    }

    pub const RSVD_OFFSET: usize = 1;
    pub const RSVD_WIDTH: usize = 31;
    pub const RSVD_MASK: u32 = 0x7FFF_FFFF;

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

impl core::fmt::Debug for CtxCtrlReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CtxCtrlReg")
            .field("enable", &self.enable())
            .field("rsvd", &self.rsvd())
            .finish()
    }
}
