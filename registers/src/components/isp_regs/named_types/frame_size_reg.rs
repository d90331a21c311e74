//! Register: FRAME_SIZE

/// FRAME_SIZE
///
/// Input frame geometry in pixels (slot-banked).
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct FrameSizeReg(u32);

impl core::default::Default for FrameSizeReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for FrameSizeReg {
    type Regwidth = u32;

    fn from_raw(val: Self::Regwidth) -> Self {
        Self(val)
    }

    fn to_raw(self) -> Self::Regwidth {
        self.0
    }
}

impl FrameSizeReg {
    pub const WIDTH_OFFSET: usize = 0;
    pub const WIDTH_WIDTH: usize = 16;
    pub const WIDTH_MASK: u32 = 0xFFFF;

    /// WIDTH
    ///
    /// Width in pixels
    #[inline(always)]
    #[must_use]
    pub fn width(&self) -> u16 {
        let val = (self.0 >> Self::WIDTH_OFFSET) & Self::WIDTH_MASK;
        val as u16
    }

    /// WIDTH
    #[inline(always)]
    pub fn set_width(&mut self, val: u16) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::WIDTH_MASK << Self::WIDTH_OFFSET))
            | ((val & Self::WIDTH_MASK) << Self::WIDTH_OFFSET);
    }

    pub const HEIGHT_OFFSET: usize = 16;
    pub const HEIGHT_WIDTH: usize = 16;
    pub const HEIGHT_MASK: u32 = 0xFFFF;

    /// HEIGHT
    ///
    /// Height in lines
    #[inline(always)]
    #[must_use]
    pub fn height(&self) -> u16 {
        let val = (self.0 >> Self::HEIGHT_OFFSET) & Self::HEIGHT_MASK;
        val as u16
    }

    /// HEIGHT
    #[inline(always)]
    pub fn set_height(&mut self, val: u16) {
        let val = val as u32;
        self.0 = (self.0 & !(Self::HEIGHT_MASK << Self::HEIGHT_OFFSET))
            | ((val & Self::HEIGHT_MASK) << Self::HEIGHT_OFFSET);
    }
}

impl core::fmt::Debug for FrameSizeReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameSizeReg")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
