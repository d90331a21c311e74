//! Addrmap: ISP block register map
//!
//! Every block (LME, DLFE, ...) exposes the same frame-control layout. The
//! region from `FRAME_SIZE` upwards is slot-banked: writes land in whichever
//! context slot `CTX_SELECT` names, and the hardware copies a committed slot
//! into the live file at the next frame boundary.

/// Named types defined within this component's body
pub mod named_types {
    pub mod cache_reg;
    pub mod ctx_commit_reg;
    pub mod ctx_ctrl_reg;
    pub mod ctx_slot_reg;
    pub mod dma_ctrl_reg;
    pub mod dma_size_reg;
    pub mod frame_size_reg;
    pub mod global_ctrl_reg;
    pub mod idle_status_reg;
    pub mod irq_reg;
    pub mod mode_reg;
}

// Instances of named component types
pub use crate::components::isp_regs::named_types::cache_reg as cache;
pub use crate::components::isp_regs::named_types::ctx_commit_reg as ctx_commit;
pub use crate::components::isp_regs::named_types::ctx_ctrl_reg as ctx_ctrl;
pub use crate::components::isp_regs::named_types::ctx_slot_reg as ctx_active;
pub use crate::components::isp_regs::named_types::ctx_slot_reg as ctx_select;
pub use crate::components::isp_regs::named_types::dma_ctrl_reg as dma_ctrl;
pub use crate::components::isp_regs::named_types::dma_size_reg as dma_size;
pub use crate::components::isp_regs::named_types::frame_size_reg as frame_size;
pub use crate::components::isp_regs::named_types::global_ctrl_reg as global_ctrl;
pub use crate::components::isp_regs::named_types::idle_status_reg as idle_status;
pub use crate::components::isp_regs::named_types::irq_reg as irq_enable;
pub use crate::components::isp_regs::named_types::irq_reg as irq_status;
pub use crate::components::isp_regs::named_types::mode_reg as mode;

use crate::reg::Reg;

/// Maximum DMA channels per block.
pub const MAX_DMA_CHANNELS: u8 = 8;
/// Maximum planes per DMA channel.
pub const MAX_PLANES: usize = 2;
/// Maximum batched buffers per issue.
pub const MAX_BATCH: usize = 8;

/// ISP block register map
///
/// Offsets are relative to the block's main register base. The bias space
/// (shared core registers) is described by [`BiasRegs`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct IspRegs;

impl IspRegs {
    /// Size in bytes of the main register space
    pub const SIZE: u32 = 0x0C00;

    /// First slot-banked offset
    pub const BANKED_BASE: u32 = 0x0100;

    const DMA_BASE: u32 = 0x0400;
    const DMA_BANK_STRIDE: u32 = 0x0100;
    const DMA_ADDR_BASE: u32 = 0x10;

    /// GLOBAL_CTRL
    #[inline(always)]
    #[must_use]
    pub const fn global_ctrl() -> Reg<global_ctrl::GlobalCtrlReg> {
        Reg::at(0x0000)
    }

    /// IDLE_STATUS
    #[inline(always)]
    #[must_use]
    pub const fn idle_status() -> Reg<idle_status::IdleStatusReg> {
        Reg::at(0x0004)
    }

    /// VERSION
    ///
    /// Plain 32-bit hardware revision word.
    #[inline(always)]
    #[must_use]
    pub const fn version() -> Reg<u32> {
        Reg::at(0x0008)
    }

    /// IRQ_STATUS
    ///
    /// Raw interrupt status, write-one-to-clear.
    #[inline(always)]
    #[must_use]
    pub const fn irq_status() -> Reg<irq_status::IrqReg> {
        Reg::at(0x0010)
    }

    /// IRQ_ENABLE
    #[inline(always)]
    #[must_use]
    pub const fn irq_enable() -> Reg<irq_enable::IrqReg> {
        Reg::at(0x0014)
    }

    /// CTX_CTRL
    #[inline(always)]
    #[must_use]
    pub const fn ctx_ctrl() -> Reg<ctx_ctrl::CtxCtrlReg> {
        Reg::at(0x0020)
    }

    /// CTX_SELECT
    ///
    /// Slot that subsequent banked register writes target.
    #[inline(always)]
    #[must_use]
    pub const fn ctx_select() -> Reg<ctx_select::CtxSlotReg> {
        Reg::at(0x0024)
    }

    /// CTX_ACTIVE
    ///
    /// Slot the hardware is consuming for the current frame (read-only).
    #[inline(always)]
    #[must_use]
    pub const fn ctx_active() -> Reg<ctx_active::CtxSlotReg> {
        Reg::at(0x0028)
    }

    /// CTX_COMMIT
    #[inline(always)]
    #[must_use]
    pub const fn ctx_commit() -> Reg<ctx_commit::CtxCommitReg> {
        Reg::at(0x002C)
    }

    /// FRAME_SIZE
    #[inline(always)]
    #[must_use]
    pub const fn frame_size() -> Reg<frame_size::FrameSizeReg> {
        Reg::at(0x0100)
    }

    /// MODE
    #[inline(always)]
    #[must_use]
    pub const fn mode() -> Reg<mode::ModeReg> {
        Reg::at(0x0104)
    }

    /// CACHE
    #[inline(always)]
    #[must_use]
    pub const fn cache() -> Reg<cache::CacheReg> {
        Reg::at(0x0108)
    }

    const fn dma_bank(channel: u8) -> u32 {
        Self::DMA_BASE + (channel as u32) * Self::DMA_BANK_STRIDE
    }

    /// DMA_CTRL of `channel`
    #[inline(always)]
    #[must_use]
    pub const fn dma_ctrl(channel: u8) -> Reg<dma_ctrl::DmaCtrlReg> {
        Reg::at(Self::dma_bank(channel))
    }

    /// DMA_SIZE of `channel`
    #[inline(always)]
    #[must_use]
    pub const fn dma_size(channel: u8) -> Reg<dma_size::DmaSizeReg> {
        Reg::at(Self::dma_bank(channel) + 0x04)
    }

    /// DMA_STRIDE of `channel`
    ///
    /// Line stride in bytes, shared by all planes of the channel.
    #[inline(always)]
    #[must_use]
    pub const fn dma_stride(channel: u8) -> Reg<u32> {
        Reg::at(Self::dma_bank(channel) + 0x08)
    }

    /// DMA_SKIP of `channel`
    ///
    /// Pixels from the start of each transferred line to the first visible
    /// pixel (tile margin plus alignment padding).
    #[inline(always)]
    #[must_use]
    pub const fn dma_skip(channel: u8) -> Reg<u32> {
        Reg::at(Self::dma_bank(channel) + 0x0C)
    }

    /// DMA_ADDR_LO of (`channel`, `buffer`, `plane`)
    #[inline(always)]
    #[must_use]
    pub const fn dma_addr_lo(channel: u8, buffer: usize, plane: usize) -> Reg<u32> {
        let slot = (buffer * MAX_PLANES + plane) as u32;
        Reg::at(Self::dma_bank(channel) + Self::DMA_ADDR_BASE + slot * 8)
    }

    /// DMA_ADDR_HI of (`channel`, `buffer`, `plane`)
    #[inline(always)]
    #[must_use]
    pub const fn dma_addr_hi(channel: u8, buffer: usize, plane: usize) -> Reg<u32> {
        Reg::at(Self::dma_addr_lo(channel, buffer, plane).offset() + 4)
    }

    /// True when `offset` lies in the slot-banked region.
    #[inline(always)]
    #[must_use]
    pub const fn is_banked(offset: u32) -> bool {
        offset >= Self::BANKED_BASE && offset < Self::SIZE
    }
}

/// Bias register space: core registers shared by every context of a
/// physical block.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct BiasRegs;

impl BiasRegs {
    /// Size in bytes of the bias register space
    pub const SIZE: u32 = 0x0010;

    /// CORE_RESET
    ///
    /// Same layout as GLOBAL_CTRL; only RESET is implemented.
    #[inline(always)]
    #[must_use]
    pub const fn core_reset() -> Reg<global_ctrl::GlobalCtrlReg> {
        Reg::at(0x0000)
    }

    /// CORE_INIT
    ///
    /// Any write re-initialises the shared core.
    #[inline(always)]
    #[must_use]
    pub const fn core_init() -> Reg<u32> {
        Reg::at(0x0004)
    }
}
