//! Register: IRQ

/// IRQ
///
/// Interrupt source word. Used for IRQ_STATUS (write-one-to-clear),
/// IRQ_ENABLE and IRQ_CLEAR, which share a layout.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct IrqReg(u32);

impl core::default::Default for IrqReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for IrqReg {
    type Regwidth = u32;

    fn from_raw(val: Self::Regwidth) -> Self {
        Self(val)
    }

    fn to_raw(self) -> Self::Regwidth {
        self.0
    }
}

impl IrqReg {
    pub const FRAME_START_OFFSET: usize = 0;
    pub const FRAME_START_WIDTH: usize = 1;
    pub const FRAME_START_MASK: u32 = 0x1;

    /// FRAME_START
    ///
    /// Frame start
    #[inline(always)]
    #[must_use]
    pub fn frame_start(&self) -> bool {
        let val = (self.0 >> Self::FRAME_START_OFFSET) & Self::FRAME_START_MASK;
        val == 1
    }

    /// FRAME_START
    #[inline(always)]
    pub fn set_frame_start(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::FRAME_START_MASK << Self::FRAME_START_OFFSET))
            | ((val & Self::FRAME_START_MASK) << Self::FRAME_START_OFFSET);
    }

    pub const FRAME_END_OFFSET: usize = 1;
    pub const FRAME_END_WIDTH: usize = 1;
    pub const FRAME_END_MASK: u32 = 0x1;

    /// FRAME_END
    ///
    /// Frame end
    #[inline(always)]
    #[must_use]
    pub fn frame_end(&self) -> bool {
        let val = (self.0 >> Self::FRAME_END_OFFSET) & Self::FRAME_END_MASK;
        val == 1
    }

    /// FRAME_END
    #[inline(always)]
    pub fn set_frame_end(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::FRAME_END_MASK << Self::FRAME_END_OFFSET))
            | ((val & Self::FRAME_END_MASK) << Self::FRAME_END_OFFSET);
    }

    pub const COREX_END_OFFSET: usize = 2;
    pub const COREX_END_WIDTH: usize = 1;
    pub const COREX_END_MASK: u32 = 0x1;

    /// COREX_END
    ///
    /// Context-slot copy finished
    #[inline(always)]
    #[must_use]
    pub fn corex_end(&self) -> bool {
        let val = (self.0 >> Self::COREX_END_OFFSET) & Self::COREX_END_MASK;
        val == 1
    }

    /// COREX_END
    #[inline(always)]
    pub fn set_corex_end(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::COREX_END_MASK << Self::COREX_END_OFFSET))
            | ((val & Self::COREX_END_MASK) << Self::COREX_END_OFFSET);
    }

    pub const LINE_OFFSET: usize = 3;
    pub const LINE_WIDTH: usize = 1;
    pub const LINE_MASK: u32 = 0x1;

    /// LINE
    ///
    /// Configured line reached
    #[inline(always)]
    #[must_use]
    pub fn line(&self) -> bool {
        let val = (self.0 >> Self::LINE_OFFSET) & Self::LINE_MASK;
        val == 1
    }

    /// LINE
    #[inline(always)]
    pub fn set_line(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::LINE_MASK << Self::LINE_OFFSET))
            | ((val & Self::LINE_MASK) << Self::LINE_OFFSET);
    }

    pub const DMA_DONE_OFFSET: usize = 4;
    pub const DMA_DONE_WIDTH: usize = 1;
    pub const DMA_DONE_MASK: u32 = 0x1;

    /// DMA_DONE
    ///
    /// All write DMA channels done
    #[inline(always)]
    #[must_use]
    pub fn dma_done(&self) -> bool {
        let val = (self.0 >> Self::DMA_DONE_OFFSET) & Self::DMA_DONE_MASK;
        val == 1
    }

    /// DMA_DONE
    #[inline(always)]
    pub fn set_dma_done(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::DMA_DONE_MASK << Self::DMA_DONE_OFFSET))
            | ((val & Self::DMA_DONE_MASK) << Self::DMA_DONE_OFFSET);
    }

    pub const RSVD0_OFFSET: usize = 5;
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

    pub const DMA_ERR_OFFSET: usize = 8;
    pub const DMA_ERR_WIDTH: usize = 1;
    pub const DMA_ERR_MASK: u32 = 0x1;

    /// DMA_ERR
    ///
    /// DMA bus error
    #[inline(always)]
    #[must_use]
    pub fn dma_err(&self) -> bool {
        let val = (self.0 >> Self::DMA_ERR_OFFSET) & Self::DMA_ERR_MASK;
        val == 1
    }

    /// DMA_ERR
    #[inline(always)]
    pub fn set_dma_err(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::DMA_ERR_MASK << Self::DMA_ERR_OFFSET))
            | ((val & Self::DMA_ERR_MASK) << Self::DMA_ERR_OFFSET);
    }

    pub const OVERFLOW_OFFSET: usize = 9;
    pub const OVERFLOW_WIDTH: usize = 1;
    pub const OVERFLOW_MASK: u32 = 0x1;

    /// OVERFLOW
    ///
    /// Line-buffer overflow
    #[inline(always)]
    #[must_use]
    pub fn overflow(&self) -> bool {
        let val = (self.0 >> Self::OVERFLOW_OFFSET) & Self::OVERFLOW_MASK;
        val == 1
    }

    /// OVERFLOW
    #[inline(always)]
    pub fn set_overflow(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::OVERFLOW_MASK << Self::OVERFLOW_OFFSET))
            | ((val & Self::OVERFLOW_MASK) << Self::OVERFLOW_OFFSET);
    }

    pub const COREX_ERR_OFFSET: usize = 10;
    pub const COREX_ERR_WIDTH: usize = 1;
    pub const COREX_ERR_MASK: u32 = 0x1;

    /// COREX_ERR
    ///
    /// Commit collided with an active slot
    #[inline(always)]
    #[must_use]
    pub fn corex_err(&self) -> bool {
        let val = (self.0 >> Self::COREX_ERR_OFFSET) & Self::COREX_ERR_MASK;
        val == 1
    }

    /// COREX_ERR
    #[inline(always)]
    pub fn set_corex_err(&mut self, val: bool) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::COREX_ERR_MASK << Self::COREX_ERR_OFFSET))
            | ((val & Self::COREX_ERR_MASK) << Self::COREX_ERR_OFFSET);
    }

    pub const RSVD1_OFFSET: usize = 11;
    pub const RSVD1_WIDTH: usize = 21;
    pub const RSVD1_MASK: u32 = 0x1F_FFFF;

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

impl core::fmt::Debug for IrqReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IrqReg")
            .field("frame_start", &self.frame_start())
            .field("frame_end", &self.frame_end())
            .field("corex_end", &self.corex_end())
            .field("line", &self.line())
            .field("dma_done", &self.dma_done())
            .field("rsvd0", &self.rsvd0())
            .field("dma_err", &self.dma_err())
            .field("overflow", &self.overflow())
            .field("corex_err", &self.corex_err())
            .field("rsvd1", &self.rsvd1())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let reg = IrqReg::default();
        assert!(!reg.frame_start());
        assert!(!reg.frame_end());
        assert!(!reg.corex_end());
        assert!(!reg.line());
        assert!(!reg.dma_done());
        assert_eq!(reg.rsvd0(), 0);
        assert!(!reg.dma_err());
        assert!(!reg.overflow());
        assert!(!reg.corex_err());
        assert_eq!(reg.rsvd1(), 0);
    }

    #[test]
    fn test_set_corex_err() {
        let mut reg = IrqReg::default();
        reg.set_corex_err(true);
        assert!(reg.corex_err());
        assert_eq!(crate::reg::Register::to_raw(reg), 1 << IrqReg::COREX_ERR_OFFSET);
    }
}
