#![no_std]

use core::time::Duration;

/// Maximum planes a DMA channel can address.
pub const MAX_PLANES: usize = 2;
/// Maximum sub-frames batched into one issue.
pub const MAX_BATCH: usize = 8;

/// Which register block an access targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegSpace {
    /// The block's own register file.
    Main,
    /// Auxiliary ("bias") block holding registers shared by every context of
    /// the physical block.
    Bias,
}

/// Raw 32-bit register access for one hardware block.
///
/// Accesses are infallible, like MMIO. Implementations must be callable from
/// the interrupt context concurrently with the issuing context.
pub trait RegisterAccess: Send + Sync {
    fn read32(&self, space: RegSpace, offset: u32) -> u32;

    fn write32(&self, space: RegSpace, offset: u32, value: u32);

    /// Whether a bias block is mapped. Without one, bias accesses fall back
    /// to the main space.
    fn has_bias(&self) -> bool {
        false
    }
}

/// A named register-set buffer the hardware can switch to at a frame boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContextSlot {
    A,
    B,
    C,
    D,
    /// Writes take effect immediately; no double buffering.
    Direct,
}

impl ContextSlot {
    /// The multi-buffered slots, in selection order.
    pub const BANKED: [ContextSlot; 4] = [Self::A, Self::B, Self::C, Self::D];

    pub const fn is_banked(self) -> bool {
        !matches!(self, Self::Direct)
    }
}

/// One fully planned DMA channel, as handed to the hardware API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaConfig {
    /// Block-local channel index.
    pub channel: u8,
    pub enabled: bool,
    /// Width in pixels actually transferred (region width when tiled).
    pub width: u32,
    pub height: u32,
    /// Line stride in bytes.
    pub stride: u32,
    pub planes: u8,
    pub buffers: u8,
    pub bottom_up: bool,
    /// Pixels from the start of each transferred line to the first visible
    /// pixel of the tile. Non-zero only for tiled frames.
    pub skip: u32,
    /// Start address per (buffer, plane).
    pub addr: [[u64; MAX_PLANES]; MAX_BATCH],
}

impl DmaConfig {
    /// A channel that is programmed off.
    pub const fn disabled(channel: u8) -> Self {
        Self {
            channel,
            enabled: false,
            width: 0,
            height: 0,
            stride: 0,
            planes: 1,
            buffers: 1,
            bottom_up: false,
            skip: 0,
            addr: [[0; MAX_PLANES]; MAX_BATCH],
        }
    }

    /// Bitmap of buffers whose first-plane address is set.
    pub fn sub_frame_mask(&self) -> u8 {
        let mut mask = 0u8;
        for (i, planes) in self.addr.iter().take(self.buffers as usize).enumerate() {
            if planes[0] != 0 {
                mask |= 1 << i;
            }
        }
        mask
    }
}

/// The per-generation hardware API: translates logical settings into
/// concrete register writes.
///
/// Every method takes `&self`; the interrupt context calls the status methods
/// while the issuing context programs the block.
pub trait HardwareOps: Send + Sync {
    type Error: core::fmt::Debug;

    /// Assert and release the block reset.
    fn reset(&self) -> Result<(), Self::Error>;

    /// Poll until the block reports idle. Returns `Ok(false)` on timeout.
    fn wait_idle(&self, timeout: Duration) -> Result<bool, Self::Error>;

    /// Common register programming done once when the block starts running.
    fn init_common(&self) -> Result<(), Self::Error>;

    /// Prepare a DMA channel for use.
    fn init_dma(&self, channel: u8) -> Result<(), Self::Error>;

    fn set_size(&self, width: u32, height: u32) -> Result<(), Self::Error>;

    fn set_mode(&self, mode: u8, reprocess: bool) -> Result<(), Self::Error>;

    fn set_cache(&self, enable: bool, hint: u8) -> Result<(), Self::Error>;

    fn set_rdma(&self, cfg: &DmaConfig) -> Result<(), Self::Error>;

    fn set_wdma(&self, cfg: &DmaConfig) -> Result<(), Self::Error>;

    /// Read the raw interrupt status, optionally clearing it.
    fn irq_status(&self, clear: bool) -> u32;

    /// Currently enabled interrupt sources.
    fn irq_mask(&self) -> u32;

    fn set_irq_mask(&self, mask: u32);

    /// Enable or disable the context-slot engine.
    fn ctx_init(&self, banked: bool) -> Result<(), Self::Error>;

    /// Point subsequent register writes at `slot`.
    fn ctx_select(&self, slot: ContextSlot) -> Result<(), Self::Error>;

    /// The slot the hardware is consuming right now.
    fn ctx_active(&self) -> ContextSlot;

    /// Queue `slot` to be applied at the next frame boundary.
    fn ctx_commit(&self, slot: ContextSlot) -> Result<(), Self::Error>;

    /// Gate or ungate the core clock (the block's power token).
    fn clock_enable(&self, enable: bool);

    /// Report every diagnostic register as `(space, offset, value)`.
    fn dump(&self, sink: &mut dyn FnMut(RegSpace, u32, u32));
}

/// Allocation failure for an internal buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError {
    pub bytes: usize,
}

impl core::fmt::Display for AllocError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "failed to allocate {} bytes of DMA memory", self.bytes)
    }
}

/// Device-visible memory for buffers a block owns internally.
pub trait BufferAllocator: Send + Sync {
    /// Returns the device address of a zeroed buffer of `bytes`.
    fn alloc(&self, bytes: usize) -> Result<u64, AllocError>;

    fn free(&self, dva: u64, bytes: usize) -> Result<(), AllocError>;
}
