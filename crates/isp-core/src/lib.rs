//! Per-frame execution framework for ISP hardware blocks.
//!
//! A [`HwIp`] binds one hardware block (motion estimation, dual-frame fusion,
//! ...) to one camera stream. The issuing context drives it through
//! open/init/enable/shot/disable/close; the interrupt context calls
//! [`HwIp::handle_irq`] whenever the block raises its interrupt line.

pub mod block;
pub mod context;
pub mod ddk;
pub mod dma;
pub mod error;
pub mod generation;
pub mod group;
pub mod hw;
pub mod regs;

pub use block::BlockSpec;
pub use context::{ContextCommitter, SlotPolicy};
pub use ddk::{DdkError, RegisterDdk};
pub use dma::param::{ChannelId, ChannelParam, Config, DmaCommand, ParamSet, Rect};
pub use dma::stripe::{StripeInfo, StripeRegion};
pub use error::{ErrorClass, HwIpError};
pub use generation::HwGeneration;
pub use group::{GroupCallbacks, HwMap, OutputId, ShotResult};
pub use hw::frame::{FrameRecord, FrameType, MAX_HW_FRAMES};
pub use hw::ip::{FrameCounters, HwIp, HwIpDeps, SharedBlock, IRQ_DEFAULT_MASK};
pub use hw::state::{HwState, Phase, StateFlags};
