//! Static descriptions of concrete hardware blocks.
//!
//! A [`BlockSpec`] is everything block-specific the framework needs: DMA
//! channel table, programming order, internal buffers and operating modes.
//! The lifecycle and interrupt machinery in [`crate::hw`] is shared.

pub mod dlfe;
pub mod lme;

pub use dlfe::DLFE;
pub use lme::LME;

use isp_registers::components::block_mode_e::BlockModeE;

use crate::dma::param::ChannelId;

/// Pixel layout of a DMA channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaFormat {
    pub planes: u8,
    pub bits_per_pixel: u8,
    /// Vertical subsampling shift of the second plane.
    pub chroma_vshift: u8,
}

impl DmaFormat {
    /// 8-bit luma only.
    pub const Y8: Self = Self::packed(8);
    /// NV12-style 4:2:0, luma plane plus interleaved chroma plane.
    pub const YUV420_2P: Self = Self {
        planes: 2,
        bits_per_pixel: 8,
        chroma_vshift: 1,
    };
    /// 16-bit packed samples.
    pub const P16: Self = Self::packed(16);
    /// 32-bit packed samples (motion vectors).
    pub const P32: Self = Self::packed(32);

    pub const fn packed(bits_per_pixel: u8) -> Self {
        Self {
            planes: 1,
            bits_per_pixel,
            chroma_vshift: 0,
        }
    }

    pub fn bytes_per_line(&self, width: u32) -> u32 {
        (width * u32::from(self.bits_per_pixel)).div_ceil(8)
    }

    /// Byte offset of pixel column `x` within a line.
    pub fn x_offset(&self, x: u32) -> u64 {
        u64::from(x) * u64::from(self.bits_per_pixel) / 8
    }

    /// Lines stored in `plane` for an image `height` lines tall.
    pub fn plane_lines(&self, plane: usize, height: u32) -> u32 {
        if plane == 0 {
            height
        } else {
            height.div_ceil(1 << self.chroma_vshift)
        }
    }

    /// Row of `plane` that holds image row `y`.
    pub fn plane_row(&self, plane: usize, y: u32) -> u32 {
        if plane == 0 {
            y
        } else {
            y >> self.chroma_vshift
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// Where a channel's memory comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Addresses supplied with each frame.
    External,
    /// Block-owned buffer, index into [`BlockSpec::buffers`]. Writes target
    /// the current copy, reads the previous frame's copy.
    Internal(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelDesc {
    pub id: ChannelId,
    pub name: &'static str,
    pub dir: Direction,
    pub source: Source,
    pub format: DmaFormat,
    /// Channel geometry is the leader geometry shifted right by this much.
    pub shift: u8,
    pub bottom_up: bool,
    /// On the first frame of a stream, reuse this channel's address.
    pub alias_first: Option<ChannelId>,
}

/// A block-owned buffer sized from the block's maximum geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSpec {
    pub name: &'static str,
    pub max_width: u32,
    pub max_height: u32,
    pub shift: u8,
    pub bytes_per_elem: u32,
    /// Ping-pong copies.
    pub copies: usize,
}

impl BufferSpec {
    pub fn bytes(&self) -> usize {
        let w = (self.max_width >> self.shift) as usize;
        let h = (self.max_height >> self.shift) as usize;
        w * h * self.bytes_per_elem as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpec {
    pub name: &'static str,
    /// Bit of this block in a frame's hardware map.
    pub hw_id: u8,
    /// Channel whose geometry defines the frame size.
    pub leader: ChannelId,
    pub channels: &'static [ChannelDesc],
    /// Programming order of read channels.
    pub rdma_order: &'static [ChannelId],
    /// Programming order of write channels.
    pub wdma_order: &'static [ChannelId],
    pub buffers: &'static [BufferSpec],
    pub normal_mode: BlockModeE,
    /// Mode used for internal (post-processing) frames.
    pub postproc_mode: BlockModeE,
    /// Reject frames whose leader geometry is zero.
    pub requires_geometry: bool,
    pub cache_hint: u8,
    /// Horizontal margin read beyond each inner tile boundary.
    pub tile_margin: u32,
}

impl BlockSpec {
    pub fn channel(&self, id: ChannelId) -> Option<&ChannelDesc> {
        self.channels.iter().find(|c| c.id == id)
    }

    /// Every channel in programming order, reads first.
    pub fn programming_order(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.rdma_order.iter().chain(self.wdma_order).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_tables(spec: &BlockSpec) {
        assert_eq!(
            spec.programming_order().count(),
            spec.channels.len(),
            "{}: every channel programmed exactly once",
            spec.name
        );
        for id in spec.programming_order() {
            let desc = spec.channel(id).unwrap();
            let expected = if spec.rdma_order.contains(&id) {
                Direction::Read
            } else {
                Direction::Write
            };
            assert_eq!(desc.dir, expected, "{} {}", spec.name, desc.name);
            if let Source::Internal(idx) = desc.source {
                assert!(idx < spec.buffers.len());
            }
            assert!(desc.format.planes as usize <= isp_hal::MAX_PLANES);
            assert!(id.0 < isp_registers::components::isp_regs::MAX_DMA_CHANNELS);
        }
        assert_eq!(spec.channel(spec.leader).map(|c| c.dir), Some(Direction::Read));
    }

    #[test]
    fn block_tables_are_consistent() {
        check_tables(&LME);
        check_tables(&DLFE);
    }

    #[test]
    fn format_geometry() {
        let f = DmaFormat::YUV420_2P;
        assert_eq!(f.plane_lines(0, 31), 31);
        assert_eq!(f.plane_lines(1, 31), 16);
        assert_eq!(f.plane_row(1, 10), 5);
        assert_eq!(DmaFormat::packed(10).bytes_per_line(3), 4);
        assert_eq!(DmaFormat::P32.x_offset(3), 12);
    }
}
