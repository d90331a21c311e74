//! Control/Status Register crate for the ISP hardware blocks.
#![no_std]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::identity_op)]
#![allow(clippy::inline_always)]
#![allow(clippy::unnecessary_cast)]

pub mod components;
pub mod encode;
pub mod field;
pub mod reg;

pub use crate::components::isp_regs::IspRegs;
pub use crate::field::Field;
pub use crate::reg::{Reg, Register};
