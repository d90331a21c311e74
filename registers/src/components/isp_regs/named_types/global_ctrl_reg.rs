//! Register: GLOBAL_CTRL

/// GLOBAL_CTRL
///
/// Block-level control. RESET is self-clearing; CLK_EN gates the
/// core clock between frames when the power token is released.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct GlobalCtrlReg(u32);

impl core::default::Default for GlobalCtrlReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for GlobalCtrlReg {
    type Regwidth = u32;

    fn from_raw(val: Self::Regwidth) -> Self {
        Self(val)
    }

    fn to_raw(self) -> Self::Regwidth {
        self.0
    }
}

impl GlobalCtrlReg {
    pub const RESET_OFFSET: usize = 0;
    pub const RESET_WIDTH: usize = 1;
    pub const RESET_MASK: u32 = 0x1;

    /// RESET
    ///
    /// Assert soft reset
    #[inline(always)]
    #[must_use]
    pub fn reset(&self) -> bool {
        let val = (self.0 >> Self::RESET_OFFSET) & Self::RESET_MASK;
        val == 1
    }

    /// RESET
    #[inline(always)]
    pub fn set_reset(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::RESET_MASK << Self::RESET_OFFSET))
            | ((val & Self::RESET_MASK) << Self::RESET_OFFSET);
    }

    pub const START_OFFSET: usize = 1;
    pub const START_WIDTH: usize = 1;
    pub const START_MASK: u32 = 0x1;

    /// START
    ///
    /// Start the frame engine
    #[inline(always)]
    #[must_use]
    pub fn start(&self) -> bool {
        let val = (self.0 >> Self::START_OFFSET) & Self::START_MASK;
        val == 1
    }

    /// START
    #[inline(always)]
    pub fn set_start(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::START_MASK << Self::START_OFFSET))
            | ((val & Self::START_MASK) << Self::START_OFFSET);
    }

    pub const CLK_EN_OFFSET: usize = 2;
    pub const CLK_EN_WIDTH: usize = 1;
    pub const CLK_EN_MASK: u32 = 0x1;

    /// CLK_EN
    ///
    /// Core clock enable
    #[inline(always)]
    #[must_use]
    pub fn clk_en(&self) -> bool {
        let val = (self.0 >> Self::CLK_EN_OFFSET) & Self::CLK_EN_MASK;
        val == 1
    }

    /// CLK_EN
    #[inline(always)]
    pub fn set_clk_en(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::CLK_EN_MASK << Self::CLK_EN_OFFSET))
            | ((val & Self::CLK_EN_MASK) << Self::CLK_EN_OFFSET);
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

impl core::fmt::Debug for GlobalCtrlReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlobalCtrlReg")
            .field("reset", &self.reset())
            .field("start", &self.start())
            .field("clk_en", &self.clk_en())
            .field("rsvd", &self.rsvd())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let reg = GlobalCtrlReg::default();
        assert!(!reg.reset());
        assert!(!reg.start());
        assert!(!reg.clk_en());
        assert_eq!(reg.rsvd(), 0);
    }

    #[test]
    fn test_set_clk_en() {
        let mut reg = GlobalCtrlReg::default();
        reg.set_clk_en(true);
        assert!(reg.clk_en());
        assert_eq!(crate::reg::Register::to_raw(reg), 1 << GlobalCtrlReg::CLK_EN_OFFSET);
    }
}
