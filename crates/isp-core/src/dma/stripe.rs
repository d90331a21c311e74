//! Horizontal tiling ("stripe") of frames wider than one hardware pass.
//!
//! A frame is split into regions whose visible parts tile the image exactly.
//! Input channels additionally read a margin on each side; the visible part
//! of every region is written once by the output channels.

/// One horizontal region, in leader-channel pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StripeRegion {
    pub start_x: u32,
    /// Visible crop width.
    pub width: u32,
    pub left_margin: u32,
    pub right_margin: u32,
}

impl StripeRegion {
    pub const fn end_x(&self) -> u32 {
        self.start_x + self.width
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StripeError {
    #[error("cannot split {width} pixels into {count} regions aligned to {align}")]
    TooNarrow { width: u32, count: usize, align: u32 },
    #[error("region {id} out of range ({count} regions)")]
    NoSuchRegion { id: usize, count: usize },
}

/// Tiling of one frame and the region this issue processes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StripeInfo {
    region_id: usize,
    full_width: u32,
    regions: Vec<StripeRegion>,
}

impl StripeInfo {
    /// Split `full_width` into `count` regions. Inner boundaries are aligned
    /// down to `align` pixels and every region reads up to `margin` pixels
    /// beyond each inner boundary.
    pub fn partition(
        full_width: u32,
        count: usize,
        margin: u32,
        align: u32,
    ) -> Result<Self, StripeError> {
        let align = align.max(1);
        let too_narrow = StripeError::TooNarrow {
            width: full_width,
            count,
            align,
        };
        if count == 0 {
            return Err(too_narrow);
        }

        let boundary = |i: usize| -> u32 {
            if i == 0 {
                0
            } else if i == count {
                full_width
            } else {
                let b = (u64::from(full_width) * i as u64 / count as u64) as u32;
                b - b % align
            }
        };

        let mut regions = Vec::with_capacity(count);
        for i in 0..count {
            let (start, end) = (boundary(i), boundary(i + 1));
            if end <= start {
                return Err(too_narrow);
            }
            let (left_margin, right_margin) = if count == 1 {
                (0, 0)
            } else {
                (margin.min(start), margin.min(full_width - end))
            };
            regions.push(StripeRegion {
                start_x: start,
                width: end - start,
                left_margin,
                right_margin,
            });
        }

        Ok(Self {
            region_id: 0,
            full_width,
            regions,
        })
    }

    /// Same tiling, positioned at region `id`.
    pub fn select(mut self, id: usize) -> Result<Self, StripeError> {
        if id >= self.regions.len() {
            return Err(StripeError::NoSuchRegion {
                id,
                count: self.regions.len(),
            });
        }
        self.region_id = id;
        Ok(self)
    }

    pub fn is_tiled(&self) -> bool {
        self.regions.len() > 1
    }

    pub fn region_num(&self) -> usize {
        self.regions.len()
    }

    pub fn region_id(&self) -> usize {
        self.region_id
    }

    pub fn full_width(&self) -> u32 {
        self.full_width
    }

    pub fn regions(&self) -> &[StripeRegion] {
        &self.regions
    }

    /// The region this issue processes, when tiled.
    pub fn current(&self) -> Option<StripeRegion> {
        if self.is_tiled() {
            self.regions.get(self.region_id).copied()
        } else {
            None
        }
    }
}

/// The horizontal span one channel transfers for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileWindow {
    pub start_x: u32,
    pub width: u32,
    /// Pixels from `start_x` to the region's first visible pixel.
    pub skip: u32,
}

impl TileWindow {
    /// Input-side window: the region plus its margins. The start is aligned
    /// down to `align` pixels and the padding is folded into `skip`, so
    /// `start_x + skip` is always the region's visible start.
    pub fn input(region: &StripeRegion, align: u32) -> Self {
        let align = align.max(1);
        let wanted = region.start_x - region.left_margin;
        let start_x = wanted - wanted % align;
        let end = region.end_x() + region.right_margin;
        Self {
            start_x,
            width: end - start_x,
            skip: region.start_x - start_x,
        }
    }

    /// Output-side window of the same region. It covers the visible part
    /// only and carries the input's `skip` so both sides stay registered.
    pub fn output(region: &StripeRegion, input: &TileWindow) -> Self {
        Self {
            start_x: region.start_x,
            width: region.width,
            skip: input.skip,
        }
    }

    /// The window in a channel subsampled horizontally by `1 << shift`.
    /// A window reaching the right edge keeps the rounded-up remainder.
    #[must_use]
    pub fn scaled(&self, shift: u8, full_width: u32) -> Self {
        if shift == 0 {
            return *self;
        }
        let end = self.start_x + self.width;
        let start_x = self.start_x >> shift;
        let end = if end >= full_width {
            (end + (1 << shift) - 1) >> shift
        } else {
            end >> shift
        };
        Self {
            start_x,
            width: end - start_x,
            skip: self.skip >> shift,
        }
    }
}
