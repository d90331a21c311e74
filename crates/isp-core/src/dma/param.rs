//! Per-channel DMA parameters and the last-applied configuration.

use core::fmt;
use std::collections::BTreeMap;

/// Block-local DMA channel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelId(pub u8);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DmaCommand {
    #[default]
    Disable,
    Enable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn full(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelParam {
    pub cmd: DmaCommand,
    /// Buffer geometry in pixels.
    pub width: u32,
    pub height: u32,
    /// Region of the buffer actually transferred.
    pub crop: Option<Rect>,
    /// Line stride in bytes; derived from the width when absent.
    pub stride: Option<u32>,
}

impl ChannelParam {
    pub fn enabled(width: u32, height: u32) -> Self {
        Self {
            cmd: DmaCommand::Enable,
            width,
            height,
            crop: Some(Rect::full(width, height)),
            stride: None,
        }
    }

    #[must_use]
    pub fn with_crop(mut self, crop: Rect) -> Self {
        self.crop = Some(crop);
        self
    }

    #[must_use]
    pub fn without_crop(mut self) -> Self {
        self.crop = None;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.cmd == DmaCommand::Enable
    }

    /// The crop rectangle if one is set and non-empty.
    pub fn valid_crop(&self) -> Option<Rect> {
        self.crop.filter(|c| !c.is_empty())
    }
}

/// Channel parameters keyed by channel id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamSet {
    channels: BTreeMap<ChannelId, ChannelParam>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, id: ChannelId, param: ChannelParam) -> Self {
        self.set(id, param);
        self
    }

    pub fn set(&mut self, id: ChannelId, param: ChannelParam) {
        self.channels.insert(id, param);
    }

    pub fn get(&self, id: ChannelId) -> Option<&ChannelParam> {
        self.channels.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.channels.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Overlay `other` on top of `self`, channel by channel.
    pub fn merge(&mut self, other: &ParamSet) {
        for (id, param) in &other.channels {
            self.channels.insert(*id, *param);
        }
    }
}

/// Geometry and mode last programmed into the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub mode: u8,
    pub reprocess: bool,
    /// Stream frame type (HDR arrangement) fixed at init.
    pub frame_type: u32,
}

/// How much of the block must be reprogrammed for the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reprogram {
    /// Geometry or mode changed: every register, and temporal history is void.
    Full,
    /// Only addresses and per-frame switches change.
    Incremental,
}

/// Current parameters plus the configuration they last produced.
#[derive(Debug, Clone, Default)]
pub struct ParamStore {
    params: ParamSet,
    applied: Option<Config>,
}

impl ParamStore {
    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn merge(&mut self, params: &ParamSet) {
        self.params.merge(params);
    }

    pub fn applied(&self) -> Option<Config> {
        self.applied
    }

    /// Record `cfg` as programmed and report how it differs from the last one.
    pub fn apply(&mut self, cfg: Config) -> Reprogram {
        let prev = self.applied.replace(cfg);
        match prev {
            Some(prev) if prev == cfg => Reprogram::Incremental,
            _ => Reprogram::Full,
        }
    }

    /// Forget the applied configuration so the next frame reprograms fully.
    pub fn invalidate(&mut self) {
        self.applied = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overrides_per_channel() {
        let mut base = ParamSet::new()
            .with(ChannelId(0), ChannelParam::enabled(64, 32))
            .with(ChannelId(1), ChannelParam::enabled(64, 32));
        let over = ParamSet::new().with(ChannelId(1), ChannelParam::default());
        base.merge(&over);
        assert!(base.get(ChannelId(0)).unwrap().is_enabled());
        assert!(!base.get(ChannelId(1)).unwrap().is_enabled());
    }

    #[test]
    fn empty_crop_is_not_valid() {
        let p = ChannelParam::enabled(64, 32).with_crop(Rect::new(0, 0, 0, 32));
        assert_eq!(p.valid_crop(), None);
    }

    #[test]
    fn apply_reports_geometry_changes() {
        let mut store = ParamStore::default();
        let a = Config {
            width: 64,
            height: 32,
            mode: 1,
            reprocess: false,
            frame_type: 0,
        };
        assert_eq!(store.apply(a), Reprogram::Full);
        assert_eq!(store.apply(a), Reprogram::Incremental);
        assert_eq!(store.apply(Config { width: 128, ..a }), Reprogram::Full);
        store.invalidate();
        assert_eq!(store.apply(Config { width: 128, ..a }), Reprogram::Full);
    }
}
