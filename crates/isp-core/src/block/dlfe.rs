//! Dual-frame fusion block.
//!
//! Blends the current frame with the previous fused output. Per-pixel blend
//! weights (half resolution) are carried from frame to frame in a
//! block-owned ping-pong buffer.

use isp_registers::components::block_mode_e::BlockModeE;

use super::{BlockSpec, BufferSpec, ChannelDesc, Direction, DmaFormat, Source};
use crate::dma::param::ChannelId;

pub const CUR_IN: ChannelId = ChannelId(0);
pub const PREV_IN: ChannelId = ChannelId(1);
pub const WGT_IN: ChannelId = ChannelId(2);
pub const OUT: ChannelId = ChannelId(3);
pub const WGT_OUT: ChannelId = ChannelId(4);

pub const MAX_WIDTH: u32 = 8192;
pub const MAX_HEIGHT: u32 = 6144;

const WGT_SHIFT: u8 = 1;

pub static DLFE: BlockSpec = BlockSpec {
    name: "DLFE",
    hw_id: 21,
    leader: CUR_IN,
    channels: &[
        ChannelDesc {
            id: CUR_IN,
            name: "cur",
            dir: Direction::Read,
            source: Source::External,
            format: DmaFormat::YUV420_2P,
            shift: 0,
            bottom_up: false,
            alias_first: None,
        },
        ChannelDesc {
            id: PREV_IN,
            name: "prev",
            dir: Direction::Read,
            source: Source::External,
            format: DmaFormat::YUV420_2P,
            shift: 0,
            bottom_up: false,
            alias_first: Some(CUR_IN),
        },
        ChannelDesc {
            id: WGT_IN,
            name: "wgt_in",
            dir: Direction::Read,
            source: Source::Internal(0),
            format: DmaFormat::Y8,
            shift: WGT_SHIFT,
            bottom_up: false,
            alias_first: None,
        },
        ChannelDesc {
            id: OUT,
            name: "out",
            dir: Direction::Write,
            source: Source::External,
            format: DmaFormat::YUV420_2P,
            shift: 0,
            bottom_up: false,
            alias_first: None,
        },
        ChannelDesc {
            id: WGT_OUT,
            name: "wgt_out",
            dir: Direction::Write,
            source: Source::Internal(0),
            format: DmaFormat::Y8,
            shift: WGT_SHIFT,
            bottom_up: false,
            alias_first: None,
        },
    ],
    rdma_order: &[CUR_IN, PREV_IN, WGT_IN],
    wdma_order: &[OUT, WGT_OUT],
    buffers: &[BufferSpec {
        name: "weight",
        max_width: MAX_WIDTH,
        max_height: MAX_HEIGHT,
        shift: WGT_SHIFT,
        bytes_per_elem: 1,
        copies: 2,
    }],
    normal_mode: BlockModeE::Temporal,
    postproc_mode: BlockModeE::PostProcess,
    requires_geometry: true,
    cache_hint: 0x1,
    tile_margin: 128,
};
