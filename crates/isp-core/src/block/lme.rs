//! Motion estimation block.
//!
//! Compares the current frame against the previous one and writes a motion
//! vector field at 1/16 resolution in each direction, plus a SAD map the
//! hardware stores bottom-up. The vector field is fed back as a hint for the
//! next frame through a ping-pong history buffer.

use isp_registers::components::block_mode_e::BlockModeE;

use super::{BlockSpec, BufferSpec, ChannelDesc, Direction, DmaFormat, Source};
use crate::dma::param::ChannelId;

pub const CUR_IN: ChannelId = ChannelId(0);
pub const PREV_IN: ChannelId = ChannelId(1);
pub const MV_HIST_IN: ChannelId = ChannelId(2);
pub const MV_OUT: ChannelId = ChannelId(3);
pub const SAD_OUT: ChannelId = ChannelId(4);
pub const MV_HIST_OUT: ChannelId = ChannelId(5);

pub const MAX_WIDTH: u32 = 4096;
pub const MAX_HEIGHT: u32 = 3072;

const MV_SHIFT: u8 = 4;

pub static LME: BlockSpec = BlockSpec {
    name: "LME",
    hw_id: 12,
    leader: CUR_IN,
    channels: &[
        ChannelDesc {
            id: CUR_IN,
            name: "cur",
            dir: Direction::Read,
            source: Source::External,
            format: DmaFormat::Y8,
            shift: 0,
            bottom_up: false,
            alias_first: None,
        },
        ChannelDesc {
            id: PREV_IN,
            name: "prev",
            dir: Direction::Read,
            source: Source::External,
            format: DmaFormat::Y8,
            shift: 0,
            bottom_up: false,
            alias_first: Some(CUR_IN),
        },
        ChannelDesc {
            id: MV_HIST_IN,
            name: "mv_hist_in",
            dir: Direction::Read,
            source: Source::Internal(0),
            format: DmaFormat::P32,
            shift: MV_SHIFT,
            bottom_up: false,
            alias_first: None,
        },
        ChannelDesc {
            id: MV_OUT,
            name: "mv",
            dir: Direction::Write,
            source: Source::External,
            format: DmaFormat::P32,
            shift: MV_SHIFT,
            bottom_up: false,
            alias_first: None,
        },
        ChannelDesc {
            id: SAD_OUT,
            name: "sad",
            dir: Direction::Write,
            source: Source::External,
            format: DmaFormat::P16,
            shift: MV_SHIFT,
            bottom_up: true,
            alias_first: None,
        },
        ChannelDesc {
            id: MV_HIST_OUT,
            name: "mv_hist_out",
            dir: Direction::Write,
            source: Source::Internal(0),
            format: DmaFormat::P32,
            shift: MV_SHIFT,
            bottom_up: false,
            alias_first: None,
        },
    ],
    rdma_order: &[CUR_IN, PREV_IN, MV_HIST_IN],
    wdma_order: &[MV_OUT, SAD_OUT, MV_HIST_OUT],
    buffers: &[BufferSpec {
        name: "mv_history",
        max_width: MAX_WIDTH,
        max_height: MAX_HEIGHT,
        shift: MV_SHIFT,
        bytes_per_elem: 4,
        copies: 2,
    }],
    normal_mode: BlockModeE::Temporal,
    postproc_mode: BlockModeE::PostProcess,
    requires_geometry: true,
    cache_hint: 0x3,
    tile_margin: 64,
};
