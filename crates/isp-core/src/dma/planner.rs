//! Turns stored parameters plus a frame's addresses into concrete per-channel
//! DMA settings.

use core::fmt;

use isp_hal::{DmaConfig, MAX_BATCH, MAX_PLANES};
use log::{debug, warn};

use super::param::{ChannelId, ChannelParam, Config, ParamSet, Rect};
use super::stripe::TileWindow;
use crate::block::{BlockSpec, ChannelDesc, Direction, Source};
use crate::error::HwIpError;
use crate::generation::HwGeneration;
use crate::hw::frame::FrameRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("unknown DMA channel {0}")]
    InvalidChannel(ChannelId),
    #[error("channel {0} has no crop region")]
    MissingCrop(ChannelId),
    #[error("invalid geometry {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },
}

impl PlanError {
    pub fn into_hw<E: fmt::Debug>(self) -> HwIpError<E> {
        match self {
            Self::InvalidChannel(id) => HwIpError::InvalidChannel(id),
            Self::MissingCrop(id) => HwIpError::MissingCrop(id),
            Self::InvalidGeometry { width, height } => {
                HwIpError::InvalidGeometry { width, height }
            }
        }
    }
}

/// Start address of a bottom-up transfer whose first line is at `base`.
pub fn bottom_up_start(base: u64, stride: u32, lines: u32) -> u64 {
    base + u64::from(stride) * u64::from(lines.saturating_sub(1))
}

/// Inverse of [`bottom_up_start`].
pub fn bottom_up_base(start: u64, stride: u32, lines: u32) -> u64 {
    start - u64::from(stride) * u64::from(lines.saturating_sub(1))
}

fn align_up(value: u32, align: u32) -> u32 {
    let align = align.max(1);
    value.div_ceil(align) * align
}

/// Reject every channel id the block does not have.
pub fn validate(spec: &BlockSpec, params: &ParamSet) -> Result<(), PlanError> {
    match params.ids().find(|id| spec.channel(*id).is_none()) {
        Some(id) => Err(PlanError::InvalidChannel(id)),
        None => Ok(()),
    }
}

/// Frame geometry from the leader channel.
pub fn derive_config(
    spec: &BlockSpec,
    params: &ParamSet,
    reprocess: bool,
    frame_type: u32,
) -> Result<Config, PlanError> {
    let (width, height) = params
        .get(spec.leader)
        .map(|p| match p.valid_crop() {
            Some(crop) => (crop.w, crop.h),
            None => (p.width, p.height),
        })
        .unwrap_or((0, 0));
    if spec.requires_geometry && (width == 0 || height == 0) {
        return Err(PlanError::InvalidGeometry { width, height });
    }
    Ok(Config {
        width,
        height,
        mode: spec.normal_mode.bits(),
        reprocess,
        frame_type,
    })
}

/// A block-owned buffer as seen by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalSlot {
    /// Copy this frame writes.
    pub write: u64,
    /// Copy written by the previous frame.
    pub read: u64,
    pub bytes: usize,
}

pub struct DmaPlanner<'a> {
    pub instance: u32,
    pub spec: &'static BlockSpec,
    pub gen: &'static HwGeneration,
    pub config: Config,
    pub params: &'a ParamSet,
    pub frame: &'a FrameRecord,
    pub internal: &'a [InternalSlot],
    /// The internal read copies hold data from a compatible previous frame.
    pub history_valid: bool,
    /// No frame has been issued on this stream yet.
    pub first_frame: bool,
}

impl DmaPlanner<'_> {
    pub fn plan(&self, id: ChannelId) -> Result<DmaConfig, PlanError> {
        let desc = self
            .spec
            .channel(id)
            .ok_or(PlanError::InvalidChannel(id))?;
        let full = Rect::full(
            self.config.width >> desc.shift,
            self.config.height >> desc.shift,
        );
        match desc.source {
            Source::Internal(idx) => self.plan_internal(desc, idx, full),
            Source::External => self.plan_external(desc, full),
        }
    }

    fn plan_internal(
        &self,
        desc: &ChannelDesc,
        idx: usize,
        full: Rect,
    ) -> Result<DmaConfig, PlanError> {
        let off = DmaConfig::disabled(desc.id.0);
        let Some(buf) = self.internal.get(idx) else {
            return Ok(off);
        };
        if self.params.get(desc.id).is_some_and(|p| !p.is_enabled()) {
            return Ok(off);
        }
        if desc.dir == Direction::Read && !self.history_valid {
            debug!(
                "[I{}][{}] {} {}: no history yet",
                self.instance, self.spec.name, desc.id, desc.name
            );
            return Ok(off);
        }
        if full.is_empty() {
            return Ok(off);
        }

        let stride = align_up(desc.format.bytes_per_line(full.w), self.gen.dma_align);
        if stride as usize * full.h as usize > buf.bytes {
            return Err(PlanError::InvalidGeometry {
                width: full.w,
                height: full.h,
            });
        }
        let dva = match desc.dir {
            Direction::Read => buf.read,
            Direction::Write => buf.write,
        };
        let mut addrs = [[0; MAX_PLANES]; MAX_BATCH];
        addrs[0][0] = dva;
        Ok(self.build(desc, full, stride, &addrs, 1))
    }

    fn plan_external(&self, desc: &ChannelDesc, full: Rect) -> Result<DmaConfig, PlanError> {
        let off = DmaConfig::disabled(desc.id.0);
        let Some(param) = self.params.get(desc.id).filter(|p| p.is_enabled()) else {
            return Ok(off);
        };

        let rect = match (param.valid_crop(), desc.dir) {
            (Some(crop), _) => crop,
            (None, Direction::Read) => {
                if full.is_empty() {
                    return Err(PlanError::MissingCrop(desc.id));
                }
                warn!(
                    "[I{}][{}] {} {}: crop missing, using {}x{}",
                    self.instance, self.spec.name, desc.id, desc.name, full.w, full.h
                );
                full
            }
            (None, Direction::Write) => {
                debug!(
                    "[I{}][{}] {} {}: no crop, output off",
                    self.instance, self.spec.name, desc.id, desc.name
                );
                return Ok(off);
            }
        };

        let own = self.frame.dva(desc.id).filter(|t| t[0][0] != 0);
        let table = match (own, desc.alias_first) {
            (Some(t), _) => t,
            (None, Some(alias)) if self.first_frame => {
                match self.frame.dva(alias).filter(|t| t[0][0] != 0) {
                    Some(t) => {
                        debug!(
                            "[I{}][{}] {} {}: first frame, aliased to {}",
                            self.instance, self.spec.name, desc.id, desc.name, alias
                        );
                        t
                    }
                    None => return Ok(off),
                }
            }
            _ => {
                debug!(
                    "[I{}][{}] {} {}: no address",
                    self.instance, self.spec.name, desc.id, desc.name
                );
                return Ok(off);
            }
        };

        let stride = self.stride(desc, param, rect);
        Ok(self.build(desc, rect, stride, table, self.frame.buffers()))
    }

    fn stride(&self, desc: &ChannelDesc, param: &ChannelParam, rect: Rect) -> u32 {
        param.stride.unwrap_or_else(|| {
            let width = if param.width != 0 {
                param.width
            } else {
                rect.x + rect.w
            };
            align_up(desc.format.bytes_per_line(width), self.gen.dma_align)
        })
    }

    fn window(&self, desc: &ChannelDesc, rect: Rect) -> TileWindow {
        let untiled = TileWindow {
            start_x: rect.x,
            width: rect.w,
            skip: 0,
        };
        let Some(region) = self.frame.stripe.current() else {
            return untiled;
        };
        let leader_bpp = self
            .spec
            .channel(self.spec.leader)
            .map_or(8, |c| c.format.bits_per_pixel);
        let input = TileWindow::input(&region, self.gen.align_pixels(leader_bpp));
        let tile = match (desc.dir, desc.source) {
            (Direction::Read, Source::External) => input,
            _ => TileWindow::output(&region, &input),
        };
        let tile = tile.scaled(desc.shift, self.frame.stripe.full_width());
        TileWindow {
            start_x: rect.x + tile.start_x,
            ..tile
        }
    }

    fn build(
        &self,
        desc: &ChannelDesc,
        rect: Rect,
        stride: u32,
        table: &[[u64; MAX_PLANES]; MAX_BATCH],
        buffers: u8,
    ) -> DmaConfig {
        let window = self.window(desc, rect);
        let format = desc.format;
        let planes = format.planes.clamp(1, MAX_PLANES as u8);

        let mut addr = [[0; MAX_PLANES]; MAX_BATCH];
        for (dst, src) in addr.iter_mut().zip(table).take(buffers as usize) {
            for plane in 0..planes as usize {
                let base = src[plane];
                if base == 0 {
                    continue;
                }
                let row = format.plane_row(plane, rect.y);
                let mut start =
                    base + u64::from(row) * u64::from(stride) + format.x_offset(window.start_x);
                if desc.bottom_up {
                    start = bottom_up_start(start, stride, format.plane_lines(plane, rect.h));
                }
                dst[plane] = start;
            }
        }

        DmaConfig {
            channel: desc.id.0,
            enabled: true,
            width: window.width,
            height: rect.h,
            stride,
            planes,
            buffers,
            bottom_up: desc.bottom_up,
            skip: window.skip,
            addr,
        }
    }
}
