//! Register component definitions
#![allow(non_camel_case_types)]

pub mod block_mode_e;
pub mod isp_regs;
pub mod slot_e;
