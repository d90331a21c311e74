//! Register: DMA_CTRL

/// DMA_CTRL
///
/// Per-channel DMA control (slot-banked, one bank per channel).
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct DmaCtrlReg(u32);

impl core::default::Default for DmaCtrlReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for DmaCtrlReg {
    type Regwidth = u32;

    fn from_raw(val: Self::Regwidth) -> Self {
        Self(val)
    }

    fn to_raw(self) -> Self::Regwidth {
        self.0
    }
}

impl DmaCtrlReg {
    pub const ENABLE_OFFSET: usize = 0;
    pub const ENABLE_WIDTH: usize = 1;
    pub const ENABLE_MASK: u32 = 0x1;

    /// ENABLE
    ///
    /// Channel enable
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

    pub const PLANES_OFFSET: usize = 4;
    pub const PLANES_WIDTH: usize = 2;
    pub const PLANES_MASK: u32 = 0x3;

    /// PLANES
    ///
    /// Number of planes minus one
    #[inline(always)]
    #[must_use]
    pub fn planes(&self) -> u8 {
        let val = (self.0 >> Self::PLANES_OFFSET) & Self::PLANES_MASK;
        val as u8
    }

    /// PLANES
    #[inline(always)]
    pub fn set_planes(&mut self, val: u8) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::PLANES_MASK << Self::PLANES_OFFSET))
            | ((val & Self::PLANES_MASK) << Self::PLANES_OFFSET);
    }

    pub const RSVD1_OFFSET: usize = 6;
    pub const RSVD1_WIDTH: usize = 2;
    pub const RSVD1_MASK: u32 = 0x3;

    /// RSVD1
    #[inline(always)]
    #[must_use]
    pub fn rsvd1(&self) -> u8 {
        let val = (self.0 >> Self::RSVD1_OFFSET) & Self::RSVD1_MASK;
        val as u8
    }

    /// RSVD1
    #[inline(always)]
    pub fn set_rsvd1(&mut self, val: u8) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::RSVD1_MASK << Self::RSVD1_OFFSET))
            | ((val & Self::RSVD1_MASK) << Self::RSVD1_OFFSET);
    }

    pub const BATCH_OFFSET: usize = 8;
    pub const BATCH_WIDTH: usize = 4;
    pub const BATCH_MASK: u32 = 0xF;

    /// BATCH
    ///
    /// Number of batched buffers minus one
    #[inline(always)]
    #[must_use]
    pub fn batch(&self) -> u8 {
        let val = (self.0 >> Self::BATCH_OFFSET) & Self::BATCH_MASK;
        val as u8
    }

    /// BATCH
    #[inline(always)]
    pub fn set_batch(&mut self, val: u8) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::BATCH_MASK << Self::BATCH_OFFSET))
            | ((val & Self::BATCH_MASK) << Self::BATCH_OFFSET);
    }

    pub const BOTTOM_UP_OFFSET: usize = 12;
    pub const BOTTOM_UP_WIDTH: usize = 1;
    pub const BOTTOM_UP_MASK: u32 = 0x1;

    /// BOTTOM_UP
    ///
    /// Write scanlines bottom-up
    #[inline(always)]
    #[must_use]
    pub fn bottom_up(&self) -> bool {
        let val = (self.0 >> Self::BOTTOM_UP_OFFSET) & Self::BOTTOM_UP_MASK;
        val == 1
    }

    /// BOTTOM_UP
    #[inline(always)]
    pub fn set_bottom_up(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::BOTTOM_UP_MASK << Self::BOTTOM_UP_OFFSET))
            | ((val & Self::BOTTOM_UP_MASK) << Self::BOTTOM_UP_OFFSET);
    }

    pub const RSVD2_OFFSET: usize = 13;
    pub const RSVD2_WIDTH: usize = 3;
    pub const RSVD2_MASK: u32 = 0x7;

    /// RSVD2
    #[inline(always)]
    #[must_use]
    pub fn rsvd2(&self) -> u8 {
        let val = (self.0 >> Self::RSVD2_OFFSET) & Self::RSVD2_MASK;
        val as u8
    }

    /// RSVD2
    #[inline(always)]
    pub fn set_rsvd2(&mut self, val: u8) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::RSVD2_MASK << Self::RSVD2_OFFSET))
            | ((val & Self::RSVD2_MASK) << Self::RSVD2_OFFSET);
    }

    pub const SUB_FRAME_EN_OFFSET: usize = 16;
    pub const SUB_FRAME_EN_WIDTH: usize = 8;
    pub const SUB_FRAME_EN_MASK: u32 = 0xFF;

    /// SUB_FRAME_EN
    ///
    /// Per-buffer enable bitmap
    #[inline(always)]
    #[must_use]
    pub fn sub_frame_en(&self) -> u8 {
        let val = (self.0 >> Self::SUB_FRAME_EN_OFFSET) & Self::SUB_FRAME_EN_MASK;
        val as u8
    }

    /// SUB_FRAME_EN
    #[inline(always)]
    pub fn set_sub_frame_en(&mut self, val: u8) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::SUB_FRAME_EN_MASK << Self::SUB_FRAME_EN_OFFSET))
            | ((val & Self::SUB_FRAME_EN_MASK) << Self::SUB_FRAME_EN_OFFSET);
    }

    pub const RSVD3_OFFSET: usize = 24;
    pub const RSVD3_WIDTH: usize = 8;
    pub const RSVD3_MASK: u32 = 0xFF;

    /// RSVD3
    #[inline(always)]
    #[must_use]
    pub fn rsvd3(&self) -> u8 {
        let val = (self.0 >> Self::RSVD3_OFFSET) & Self::RSVD3_MASK;
        val as u8
    }

    /// RSVD3
    #[inline(always)]
    pub fn set_rsvd3(&mut self, val: u8) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::RSVD3_MASK << Self::RSVD3_OFFSET))
            | ((val & Self::RSVD3_MASK) << Self::RSVD3_OFFSET);
    }
}

impl core::fmt::Debug for DmaCtrlReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DmaCtrlReg")
            .field("enable", &self.enable())
            .field("rsvd0", &self.rsvd0())
            .field("planes", &self.planes())
            .field("rsvd1", &self.rsvd1())
            .field("batch", &self.batch())
            .field("bottom_up", &self.bottom_up())
            .field("rsvd2", &self.rsvd2())
            .field("sub_frame_en", &self.sub_frame_en())
            .field("rsvd3", &self.rsvd3())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let reg = DmaCtrlReg::default();
        assert!(!reg.enable());
        assert_eq!(reg.rsvd0(), 0);
        assert_eq!(reg.planes(), 0);
        assert_eq!(reg.rsvd1(), 0);
        assert_eq!(reg.batch(), 0);
        assert!(!reg.bottom_up());
        assert_eq!(reg.rsvd2(), 0);
        assert_eq!(reg.sub_frame_en(), 0);
        assert_eq!(reg.rsvd3(), 0);
    }

    #[test]
    fn test_set_sub_frame_en_masks_overflow() {
        let mut reg = DmaCtrlReg::default();
        reg.set_sub_frame_en(0xff);
        assert_eq!(reg.sub_frame_en(), 0xff);
        assert_eq!(crate::reg::Register::to_raw(reg) >> DmaCtrlReg::SUB_FRAME_EN_OFFSET, 0xff);
    }
}
