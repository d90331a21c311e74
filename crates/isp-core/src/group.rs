//! The group-manager side of the framework: who hears about frame start and
//! frame completion, and which blocks a frame is routed through.

use crate::hw::frame::FrameRecord;

/// Outcome reported with a finished frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotResult {
    Success,
    /// The frame never ended and was retired by the caller.
    Timeout,
    /// The stream was torn down with the frame still queued.
    Aborted,
}

/// Which output finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputId {
    /// The whole block reached frame end.
    CoreEnd,
}

/// Notifications delivered by a block to the owning group.
///
/// Both methods are called from the interrupt context.
pub trait GroupCallbacks: Send + Sync {
    fn frame_start(&self, instance: u32);

    /// One call per completed (sub-)frame. `get_meta` asks the group to
    /// collect statistics metadata for this frame.
    fn frame_done(
        &self,
        instance: u32,
        frame: &FrameRecord,
        output: OutputId,
        result: ShotResult,
        get_meta: bool,
    );
}

/// Bitmap of hardware block ids a frame is routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HwMap(u64);

impl HwMap {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn with(self, hw_id: u8) -> Self {
        Self(self.0 | 1 << hw_id)
    }

    pub const fn contains(self, hw_id: u8) -> bool {
        hw_id < 64 && self.0 & (1 << hw_id) != 0
    }

    pub const fn bits(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hw_map_membership() {
        let map = HwMap::empty().with(3).with(17);
        assert!(map.contains(3));
        assert!(map.contains(17));
        assert!(!map.contains(4));
        assert!(!map.contains(64));
        assert_eq!(map.bits(), (1 << 3) | (1 << 17));
    }
}
