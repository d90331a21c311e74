//! DMA parameters, tiling and per-channel planning.

pub mod param;
pub mod planner;
pub mod stripe;

pub use planner::{bottom_up_base, bottom_up_start, DmaPlanner, PlanError};
