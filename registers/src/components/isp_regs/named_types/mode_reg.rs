//! Register: MODE

/// MODE
///
/// Processing mode (slot-banked).
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct ModeReg(u32);

impl core::default::Default for ModeReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for ModeReg {
    type Regwidth = u32;

    fn from_raw(val: Self::Regwidth) -> Self {
        Self(val)
    }

    fn to_raw(self) -> Self::Regwidth {
        self.0
    }
}

impl ModeReg {
    pub const MODE_OFFSET: usize = 0;
    pub const MODE_WIDTH: usize = 4;
    pub const MODE_MASK: u32 = 0xF;

    /// MODE
    ///
    /// Mode encoding, see BlockModeE
    #[inline(always)]
    #[must_use]
    pub fn mode(&self) -> u8 {
        let val = (self.0 >> Self::MODE_OFFSET) & Self::MODE_MASK;
        val as u8
    }

    /// MODE
    #[inline(always)]
    pub fn set_mode(&mut self, val: u8) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::MODE_MASK << Self::MODE_OFFSET))
            | ((val & Self::MODE_MASK) << Self::MODE_OFFSET);
    }

    pub const REPROCESS_OFFSET: usize = 4;
    pub const REPROCESS_WIDTH: usize = 1;
    pub const REPROCESS_MASK: u32 = 0x1;

    /// REPROCESS
    ///
    /// Input comes from memory rather than the sensor path
    #[inline(always)]
    #[must_use]
    pub fn reprocess(&self) -> bool {
        let val = (self.0 >> Self::REPROCESS_OFFSET) & Self::REPROCESS_MASK;
        val == 1
    }

    /// REPROCESS
    #[inline(always)]
    pub fn set_reprocess(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::REPROCESS_MASK << Self::REPROCESS_OFFSET))
            | ((val & Self::REPROCESS_MASK) << Self::REPROCESS_OFFSET);
    }

    pub const RSVD_OFFSET: usize = 5;
    pub const RSVD_WIDTH: usize = 27;
    pub const RSVD_MASK: u32 = 0x7FF_FFFF;

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

impl core::fmt::Debug for ModeReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModeReg")
            .field("mode", &self.mode())
            .field("reprocess", &self.reprocess())
            .field("rsvd", &self.rsvd())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let reg = ModeReg::default();
        assert_eq!(reg.mode(), 0);
        assert!(!reg.reprocess());
        assert_eq!(reg.rsvd(), 0);
    }

    #[test]
    fn test_set_reprocess() {
        let mut reg = ModeReg::default();
        reg.set_reprocess(true);
        assert!(reg.reprocess());
        assert_eq!(crate::reg::Register::to_raw(reg), 1 << ModeReg::REPROCESS_OFFSET);
    }
}
