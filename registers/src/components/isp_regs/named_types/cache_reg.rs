//! Register: CACHE

/// CACHE
///
/// DMA cache policy (slot-banked).
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct CacheReg(u32);

impl core::default::Default for CacheReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for CacheReg {
    type Regwidth = u32;

    fn from_raw(val: Self::Regwidth) -> Self {
        Self(val)
    }

    fn to_raw(self) -> Self::Regwidth {
        self.0
    }
}

impl CacheReg {
    pub const ENABLE_OFFSET: usize = 0;
    pub const ENABLE_WIDTH: usize = 1;
    pub const ENABLE_MASK: u32 = 0x1;

    /// ENABLE
    ///
    /// Allocate on read
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

    pub const RSVD0_OFFSET: usize = 1;
    pub const RSVD0_WIDTH: usize = 3;
    pub const RSVD0_MASK: u32 = 0x7;

    /// RSVD0
    #[inline(always)]
    #[must_use]
    pub fn rsvd0(&self) -> u8 {
        let val = (self.0 >> Self::RSVD0_OFFSET) & Self::RSVD0_MASK;
        val as u8
    }

    /// RSVD0
    #[inline(always)]
    pub fn set_rsvd0(&mut self, val: u8) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::RSVD0_MASK << Self::RSVD0_OFFSET))
            | ((val & Self::RSVD0_MASK) << Self::RSVD0_OFFSET);
    }

    pub const HINT_OFFSET: usize = 4;
    pub const HINT_WIDTH: usize = 4;
    pub const HINT_MASK: u32 = 0xF;

    /// HINT
    ///
    /// System-cache hint
    #[inline(always)]
    #[must_use]
    pub fn hint(&self) -> u8 {
        let val = (self.0 >> Self::HINT_OFFSET) & Self::HINT_MASK;
        val as u8
    }

    /// HINT
    #[inline(always)]
    pub fn set_hint(&mut self, val: u8) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::HINT_MASK << Self::HINT_OFFSET))
            | ((val & Self::HINT_MASK) << Self::HINT_OFFSET);
    }

    pub const RSVD1_OFFSET: usize = 8;
    pub const RSVD1_WIDTH: usize = 24;
    pub const RSVD1_MASK: u32 = 0xFF_FFFF;

    /// RSVD1
    #[inline(always)]
    #[must_use]
    pub fn rsvd1(&self) -> u32 {
        (self.0 >> Self::RSVD1_OFFSET) & Self::RSVD1_MASK
    }

    /// RSVD1
    #[inline(always)]
    pub fn set_rsvd1(&mut self, val: u32) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::RSVD1_MASK << Self::RSVD1_OFFSET))
            | ((val & Self::RSVD1_MASK) << Self::RSVD1_OFFSET);
    }
}

impl core::fmt::Debug for CacheReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CacheReg")
            .field("enable", &self.enable())
            .field("rsvd0", &self.rsvd0())
            .field("hint", &self.hint())
            .field("rsvd1", &self.rsvd1())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let reg = CacheReg::default();
        assert!(!reg.enable());
        assert_eq!(reg.rsvd0(), 0);
        assert_eq!(reg.hint(), 0);
        assert_eq!(reg.rsvd1(), 0);
    }

    #[test]
    fn test_set_hint_masks_overflow() {
        let mut reg = CacheReg::default();
        reg.set_hint(0xf);
        assert_eq!(reg.hint(), 0xf);
        assert_eq!(crate::reg::Register::to_raw(reg) >> CacheReg::HINT_OFFSET, 0xf);
    }
}
