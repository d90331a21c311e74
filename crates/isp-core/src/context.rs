//! Context-slot selection and commit.
//!
//! Banked hardware stages a frame's registers in a slot the hardware is not
//! consuming, then commits it to take effect at the next frame boundary.
//! Direct hardware has a single live register file.

use isp_hal::{ContextSlot, HardwareOps};
use log::debug;

use crate::error::HwIpError;
use crate::generation::HwGeneration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPolicy {
    Live,
    Reprocess,
}

#[derive(Debug, Clone, Copy)]
pub struct ContextCommitter {
    gen: &'static HwGeneration,
}

impl ContextCommitter {
    pub fn new(gen: &'static HwGeneration) -> Self {
        Self { gen }
    }

    /// Pick the slot to stage the next frame in. The preferred slot for
    /// `policy` is used unless the hardware is consuming it, in which case
    /// the next banked slot is taken.
    pub fn select<H: HardwareOps>(
        &self,
        hw: &H,
        policy: SlotPolicy,
    ) -> Result<ContextSlot, HwIpError<H::Error>> {
        if !self.gen.is_banked() {
            return Ok(ContextSlot::Direct);
        }
        let preferred = match policy {
            SlotPolicy::Live => self.gen.live_slot,
            SlotPolicy::Reprocess => self.gen.reprocess_slot,
        };
        let active = hw.ctx_active();
        if preferred != active {
            return Ok(preferred);
        }
        let start = self
            .gen
            .slots
            .iter()
            .position(|s| *s == preferred)
            .unwrap_or(0);
        let n = self.gen.slots.len();
        (1..n)
            .map(|i| self.gen.slots[(start + i) % n])
            .find(|s| *s != active)
            .inspect(|s| debug!("slot {preferred:?} busy, staging in {s:?}"))
            .ok_or(HwIpError::SlotBusy { active })
    }

    /// Select a slot and open a write session on it.
    pub fn begin<'h, H: HardwareOps>(
        &self,
        hw: &'h H,
        policy: SlotPolicy,
    ) -> Result<ContextWrite<'h, H>, HwIpError<H::Error>> {
        let slot = self.select(hw, policy)?;
        hw.ctx_select(slot)?;
        Ok(ContextWrite {
            hw,
            slot,
            writes: 0,
        })
    }
}

/// Register writes staged into one slot. Nothing reaches the hardware's
/// live state until [`ContextWrite::commit`].
pub struct ContextWrite<'h, H: HardwareOps> {
    hw: &'h H,
    slot: ContextSlot,
    writes: usize,
}

impl<H: HardwareOps> ContextWrite<'_, H> {
    pub fn write<F>(&mut self, f: F) -> Result<(), H::Error>
    where
        F: FnOnce(&H) -> Result<(), H::Error>,
    {
        f(self.hw)?;
        self.writes += 1;
        Ok(())
    }

    /// Hand the staged slot to the hardware.
    pub fn commit(self) -> Result<ContextSlot, H::Error> {
        if self.slot.is_banked() {
            self.hw.ctx_commit(self.slot)?;
        }
        debug!("committed {:?} ({} writes)", self.slot, self.writes);
        Ok(self.slot)
    }
}
