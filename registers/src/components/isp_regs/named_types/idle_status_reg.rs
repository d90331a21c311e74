//! Register: IDLE_STATUS

/// IDLE_STATUS
///
/// Read-only idle indication. IDLE is set once every DMA channel
/// has drained and the pixel pipe is empty.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct IdleStatusReg(u32);

impl core::default::Default for IdleStatusReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for IdleStatusReg {
    type Regwidth = u32;

    fn from_raw(val: Self::Regwidth) -> Self {
        Self(val)
    }

    fn to_raw(self) -> Self::Regwidth {
        self.0
    }
}

impl IdleStatusReg {
    pub const IDLE_OFFSET: usize = 0;
    pub const IDLE_WIDTH: usize = 1;
    pub const IDLE_MASK: u32 = 0x1;

    /// IDLE
    ///
    /// Whole block idle
    #[inline(always)]
    #[must_use]
    pub fn idle(&self) -> bool {
        let val = (self.0 >> Self::IDLE_OFFSET) & Self::IDLE_MASK;
        val == 1
    }

    /// IDLE
    #[inline(always)]
    pub fn set_idle(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::IDLE_MASK << Self::IDLE_OFFSET))
            | ((val & Self::IDLE_MASK) << Self::IDLE_OFFSET);
    }

    pub const RSVD0_OFFSET: usize = 1;
    pub const RSVD0_WIDTH: usize = 7;
    pub const RSVD0_MASK: u32 = 0x7F;

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

    pub const BUSY_CH_OFFSET: usize = 8;
    pub const BUSY_CH_WIDTH: usize = 8;
    pub const BUSY_CH_MASK: u32 = 0xFF;

    /// BUSY_CH
    ///
    /// Per-channel DMA busy bitmap
    #[inline(always)]
    #[must_use]
    pub fn busy_ch(&self) -> u8 {
        let val = (self.0 >> Self::BUSY_CH_OFFSET) & Self::BUSY_CH_MASK;
        val as u8
    }

    /// BUSY_CH
    #[inline(always)]
    pub fn set_busy_ch(&mut self, val: u8) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::BUSY_CH_MASK << Self::BUSY_CH_OFFSET))
            | ((val & Self::BUSY_CH_MASK) << Self::BUSY_CH_OFFSET);
    }

    pub const RSVD1_OFFSET: usize = 16;
    pub const RSVD1_WIDTH: usize = 16;
    pub const RSVD1_MASK: u32 = 0xFFFF;

    /// RSVD1
    #[inline(always)]
    #[must_use]
    pub fn rsvd1(&self) -> u16 {
        let val = (self.0 >> Self::RSVD1_OFFSET) & Self::RSVD1_MASK;
        val as u16
    }

    /// RSVD1
    #[inline(always)]
    pub fn set_rsvd1(&mut self, val: u16) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::RSVD1_MASK << Self::RSVD1_OFFSET))
            | ((val & Self::RSVD1_MASK) << Self::RSVD1_OFFSET);
    }
}

impl core::fmt::Debug for IdleStatusReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdleStatusReg")
            .field("idle", &self.idle())
            .field("rsvd0", &self.rsvd0())
            .field("busy_ch", &self.busy_ch())
            .field("rsvd1", &self.rsvd1())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let reg = IdleStatusReg::default();
        assert!(!reg.idle());
        assert_eq!(reg.rsvd0(), 0);
        assert_eq!(reg.busy_ch(), 0);
        assert_eq!(reg.rsvd1(), 0);
    }

    #[test]
    fn test_set_busy_ch_masks_overflow() {
        let mut reg = IdleStatusReg::default();
        reg.set_busy_ch(0xff);
        assert_eq!(reg.busy_ch(), 0xff);
        assert_eq!(crate::reg::Register::to_raw(reg) >> IdleStatusReg::BUSY_CH_OFFSET, 0xff);
    }
}
