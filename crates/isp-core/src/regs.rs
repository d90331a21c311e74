//! Typed register access over a raw [`RegisterAccess`].

use isp_hal::{RegSpace, RegisterAccess};
use isp_registers::{Field, Reg, Register};

/// Read/modify/write helper bound to one register space.
pub struct RegisterIo<'a, R: RegisterAccess + ?Sized> {
    regs: &'a R,
    space: RegSpace,
}

impl<'a, R: RegisterAccess + ?Sized> RegisterIo<'a, R> {
    pub fn main(regs: &'a R) -> Self {
        Self {
            regs,
            space: RegSpace::Main,
        }
    }

    /// The bias space, when one is mapped.
    pub fn bias(regs: &'a R) -> Option<Self> {
        regs.has_bias().then_some(Self {
            regs,
            space: RegSpace::Bias,
        })
    }

    pub fn space(&self) -> RegSpace {
        self.space
    }

    pub fn read<T: Register<Regwidth = u32>>(&self, reg: Reg<T>) -> T {
        T::from_raw(self.regs.read32(self.space, reg.offset()))
    }

    pub fn write<T: Register<Regwidth = u32>>(&self, reg: Reg<T>, val: T) {
        self.regs.write32(self.space, reg.offset(), val.to_raw());
    }

    pub fn modify<T, F>(&self, reg: Reg<T>, f: F)
    where
        T: Register<Regwidth = u32>,
        F: FnOnce(&mut T),
    {
        let mut val = self.read(reg);
        f(&mut val);
        self.write(reg, val);
    }

    pub fn write_raw(&self, reg: Reg<u32>, val: u32) {
        self.regs.write32(self.space, reg.offset(), val);
    }

    pub fn set_field(&self, field: Field, val: u32) {
        let old = self.regs.read32(self.space, field.offset);
        self.regs
            .write32(self.space, field.offset, field.insert(old, val));
    }
}
