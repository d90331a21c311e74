//! Per-generation hardware capabilities.
//!
//! A block instance is bound to exactly one generation at construction; every
//! capability query goes through the bound [`HwGeneration`] rather than
//! compile-time switches.

use std::time::Duration;

use isp_hal::ContextSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HwGeneration {
    pub name: &'static str,
    /// Banked context slots in selection order. Empty for direct-write parts.
    pub slots: &'static [ContextSlot],
    /// Preferred slot for live streaming frames.
    pub live_slot: ContextSlot,
    /// Preferred slot for reprocessing frames.
    pub reprocess_slot: ContextSlot,
    /// How long `disable` waits for an in-flight frame to end.
    pub stop_timeout: Duration,
    /// How long recovery waits for the block to go idle after reset.
    pub idle_timeout: Duration,
    /// DMA start-address alignment in bytes, a power of two.
    pub dma_align: u32,
    /// Core reset and init live in a separate bias register block.
    pub has_bias: bool,
}

/// Multi-context generation: four banked slots, bias block present.
pub const GEN_COREX: HwGeneration = HwGeneration {
    name: "corex",
    slots: &ContextSlot::BANKED,
    live_slot: ContextSlot::A,
    reprocess_slot: ContextSlot::C,
    stop_timeout: Duration::from_millis(250),
    idle_timeout: Duration::from_millis(50),
    dma_align: 32,
    has_bias: true,
};

/// Single-context generation: register writes take effect immediately.
pub const GEN_DIRECT: HwGeneration = HwGeneration {
    name: "direct",
    slots: &[],
    live_slot: ContextSlot::Direct,
    reprocess_slot: ContextSlot::Direct,
    stop_timeout: Duration::from_millis(250),
    idle_timeout: Duration::from_millis(50),
    dma_align: 16,
    has_bias: false,
};

impl HwGeneration {
    pub fn is_banked(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Alignment in pixels for a channel of `bits_per_pixel`, rounded down to
    /// a power of two and never below one pixel.
    pub fn align_pixels(&self, bits_per_pixel: u8) -> u32 {
        let bpp = u32::from(bits_per_pixel.max(1));
        let px = (self.dma_align * 8 / bpp).max(1);
        1 << (31 - px.leading_zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_alignment() {
        assert_eq!(GEN_COREX.align_pixels(8), 32);
        assert_eq!(GEN_COREX.align_pixels(16), 16);
        assert_eq!(GEN_COREX.align_pixels(12), 16);
        assert_eq!(GEN_DIRECT.align_pixels(32), 4);
        assert_eq!(GEN_DIRECT.align_pixels(255), 1);
    }

    #[test]
    fn banked_generations() {
        assert!(GEN_COREX.is_banked());
        assert!(!GEN_DIRECT.is_banked());
        assert!(!GEN_DIRECT.live_slot.is_banked());
    }
}
