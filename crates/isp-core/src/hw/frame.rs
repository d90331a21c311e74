//! Frames handed to a block and the queue of frames it has in flight.

use std::collections::BTreeMap;

use isp_hal::{MAX_BATCH, MAX_PLANES};

use crate::dma::param::{ChannelId, ParamSet};
use crate::dma::stripe::StripeInfo;

/// Frames one block instance may have queued to hardware at once.
pub const MAX_HW_FRAMES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameType {
    #[default]
    Normal,
    /// Drains the block's pipeline: every DMA off, post-processing mode.
    Internal,
}

/// Per-channel device addresses, indexed `[buffer][plane]`.
pub type DvaTable = [[u64; MAX_PLANES]; MAX_BATCH];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameRecord {
    pub fcount: u32,
    pub frame_type: FrameType,
    pub reprocessing: bool,
    /// Sub-frames batched into this issue.
    pub num_buffers: u8,
    /// Index of this record within its batch, for reported sub-frames.
    pub cur_buf_index: u8,
    pub dva: BTreeMap<ChannelId, DvaTable>,
    /// Per-frame parameter overrides merged over the stored set.
    pub params: Option<ParamSet>,
    pub stripe: StripeInfo,
}

impl FrameRecord {
    pub fn new(fcount: u32) -> Self {
        Self {
            fcount,
            num_buffers: 1,
            ..Self::default()
        }
    }

    pub fn internal(fcount: u32) -> Self {
        Self {
            frame_type: FrameType::Internal,
            ..Self::new(fcount)
        }
    }

    /// Set the plane addresses of `buffer` on channel `id`.
    #[must_use]
    pub fn with_dva(mut self, id: ChannelId, buffer: usize, planes: &[u64]) -> Self {
        let table = self.dva.entry(id).or_insert([[0; MAX_PLANES]; MAX_BATCH]);
        if let Some(slot) = table.get_mut(buffer) {
            for (dst, src) in slot.iter_mut().zip(planes) {
                *dst = *src;
            }
        }
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: ParamSet) -> Self {
        self.params = Some(params);
        self
    }

    #[must_use]
    pub fn with_stripe(mut self, stripe: StripeInfo) -> Self {
        self.stripe = stripe;
        self
    }

    #[must_use]
    pub fn with_buffers(mut self, num_buffers: u8) -> Self {
        self.num_buffers = num_buffers;
        self
    }

    #[must_use]
    pub fn reprocess(mut self) -> Self {
        self.reprocessing = true;
        self
    }

    pub fn dva(&self, id: ChannelId) -> Option<&DvaTable> {
        self.dva.get(&id)
    }

    pub fn is_internal(&self) -> bool {
        self.frame_type == FrameType::Internal
    }

    /// Batched sub-frames, clamped to what a DMA channel can address.
    pub fn buffers(&self) -> u8 {
        self.num_buffers.clamp(1, MAX_BATCH as u8)
    }

    /// The record reported for sub-frame `index` of this batch.
    pub fn sub_frame(&self, index: u8) -> FrameRecord {
        let mut sub = self.clone();
        sub.fcount = self.fcount.wrapping_add(u32::from(index));
        sub.cur_buf_index = index;
        sub.num_buffers = 1;
        sub
    }
}

/// Frames committed to hardware, oldest first.
#[derive(Debug)]
pub struct FrameManager {
    queue: heapless::Deque<FrameRecord, MAX_HW_FRAMES>,
}

impl Default for FrameManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameManager {
    pub fn new() -> Self {
        Self {
            queue: heapless::Deque::new(),
        }
    }

    /// Queue a frame; hands it back when the queue is full.
    pub fn push(&mut self, frame: FrameRecord) -> Result<(), FrameRecord> {
        self.queue.push_back(frame)
    }

    pub fn pop_oldest(&mut self) -> Option<FrameRecord> {
        self.queue.pop_front()
    }

    /// Take the frame with `fcount` out of the queue, keeping the order of
    /// the rest.
    pub fn remove(&mut self, fcount: u32) -> Option<FrameRecord> {
        let mut found = None;
        for _ in 0..self.queue.len() {
            let Some(frame) = self.queue.pop_front() else {
                break;
            };
            if found.is_none() && frame.fcount == fcount {
                found = Some(frame);
            } else {
                let _ = self.queue.push_back(frame);
            }
        }
        found
    }

    pub fn drain(&mut self) -> Vec<FrameRecord> {
        let mut out = Vec::with_capacity(self.queue.len());
        while let Some(frame) = self.queue.pop_front() {
            out.push(frame);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn fcounts(&self) -> impl Iterator<Item = u32> + '_ {
        self.queue.iter().map(|f| f.fcount)
    }
}
