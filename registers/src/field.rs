//! Dynamic register field descriptors.
//!
//! Named register types cover the fixed layout. `Field` covers the cases where
//! the caller only knows (register, bit offset, bit width) at runtime, such as
//! vendor tuning tables applied through the generic read-modify-write path.

use num_traits::PrimInt;

/// One bit-field inside a register.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Field {
    /// Byte offset of the containing register.
    pub offset: u32,
    /// Least-significant bit of the field.
    pub bit: u8,
    /// Width in bits, at least 1.
    pub width: u8,
}

impl Field {
    #[must_use]
    pub const fn new(offset: u32, bit: u8, width: u8) -> Self {
        Self { offset, bit, width }
    }

    /// Unshifted all-ones mask of the field width.
    #[must_use]
    pub fn value_mask<T: PrimInt>(&self) -> T {
        let bits = T::zero().count_zeros();
        if u32::from(self.width) >= bits {
            !T::zero()
        } else {
            (T::one() << usize::from(self.width)) - T::one()
        }
    }

    /// Mask of the field in register position.
    #[must_use]
    pub fn mask<T: PrimInt>(&self) -> T {
        self.value_mask::<T>() << usize::from(self.bit)
    }

    /// Replace the field inside `reg` with `val`; bits of `val` beyond the
    /// field width are dropped.
    #[must_use]
    pub fn insert<T: PrimInt>(&self, reg: T, val: T) -> T {
        (reg & !self.mask::<T>()) | ((val & self.value_mask::<T>()) << usize::from(self.bit))
    }

    /// Extract the field value from `reg`.
    #[must_use]
    pub fn extract<T: PrimInt>(&self, reg: T) -> T {
        (reg >> usize::from(self.bit)) & self.value_mask::<T>()
    }
}
