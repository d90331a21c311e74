//! Register value types and typed offsets.

use core::marker::PhantomData;

/// A register value with a fixed bit layout.
pub trait Register: Copy + Default {
    type Regwidth: num_traits::PrimInt;

    fn from_raw(val: Self::Regwidth) -> Self;

    fn to_raw(self) -> Self::Regwidth;
}

/// Byte offset of a register of type `T` within a register space.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Reg<T> {
    offset: u32,
    _reg: PhantomData<T>,
}

impl<T> Reg<T> {
    #[inline(always)]
    #[must_use]
    pub const fn at(offset: u32) -> Self {
        Self {
            offset,
            _reg: PhantomData,
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }
}
