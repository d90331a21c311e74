//! Reference hardware API: programs the block through its register map.

use std::thread;
use std::time::{Duration, Instant};

use isp_hal::{ContextSlot, DmaConfig, HardwareOps, RegSpace, RegisterAccess};
use isp_registers::components::isp_regs::{
    cache::CacheReg, ctx_commit::CtxCommitReg, ctx_ctrl::CtxCtrlReg, ctx_select::CtxSlotReg,
    dma_ctrl::DmaCtrlReg, dma_size::DmaSizeReg, frame_size::FrameSizeReg,
    global_ctrl::GlobalCtrlReg, irq_status::IrqReg, mode::ModeReg, BiasRegs, MAX_DMA_CHANNELS,
};
use isp_registers::components::slot_e::SlotE;
use isp_registers::{Field, IspRegs, Register};

use crate::generation::HwGeneration;
use crate::regs::RegisterIo;

const IDLE_POLL: Duration = Duration::from_micros(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DdkError {
    #[error("DMA channel {0} out of range")]
    BadChannel(u8),
    #[error("context slot {slot:?} not supported by the {gen} generation")]
    UnsupportedSlot { slot: ContextSlot, gen: &'static str },
    #[error("context slot {0:?} is being consumed by the hardware")]
    SlotActive(ContextSlot),
    #[error("{width}x{height} does not fit the size registers")]
    Geometry { width: u32, height: u32 },
}

fn slot_e(slot: ContextSlot) -> SlotE {
    match slot {
        ContextSlot::A => SlotE::SlotA,
        ContextSlot::B => SlotE::SlotB,
        ContextSlot::C => SlotE::SlotC,
        ContextSlot::D => SlotE::SlotD,
        ContextSlot::Direct => SlotE::Direct,
    }
}

fn context_slot(slot: SlotE) -> ContextSlot {
    match slot {
        SlotE::SlotA => ContextSlot::A,
        SlotE::SlotB => ContextSlot::B,
        SlotE::SlotC => ContextSlot::C,
        SlotE::SlotD => ContextSlot::D,
        SlotE::Direct => ContextSlot::Direct,
    }
}

fn size16(width: u32, height: u32) -> Result<(u16, u16), DdkError> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(DdkError::Geometry { width, height }),
    }
}

/// [`HardwareOps`] over any [`RegisterAccess`].
pub struct RegisterDdk<R: RegisterAccess> {
    regs: R,
    gen: &'static HwGeneration,
}

impl<R: RegisterAccess> RegisterDdk<R> {
    pub fn new(regs: R, gen: &'static HwGeneration) -> Self {
        Self { regs, gen }
    }

    pub fn regs(&self) -> &R {
        &self.regs
    }

    fn main(&self) -> RegisterIo<'_, R> {
        RegisterIo::main(&self.regs)
    }

    fn bias(&self) -> Option<RegisterIo<'_, R>> {
        if self.gen.has_bias {
            RegisterIo::bias(&self.regs)
        } else {
            None
        }
    }

    fn check_channel(channel: u8) -> Result<(), DdkError> {
        if channel < MAX_DMA_CHANNELS {
            Ok(())
        } else {
            Err(DdkError::BadChannel(channel))
        }
    }

    fn check_slot(&self, slot: ContextSlot) -> Result<(), DdkError> {
        if !slot.is_banked() || self.gen.slots.contains(&slot) {
            Ok(())
        } else {
            Err(DdkError::UnsupportedSlot {
                slot,
                gen: self.gen.name,
            })
        }
    }

    fn program_dma(&self, cfg: &DmaConfig) -> Result<(), DdkError> {
        Self::check_channel(cfg.channel)?;
        let io = self.main();
        let ch = cfg.channel;
        if !cfg.enabled {
            io.write(IspRegs::dma_ctrl(ch), DmaCtrlReg::default());
            return Ok(());
        }

        let (w, h) = size16(cfg.width, cfg.height)?;
        let mut size = DmaSizeReg::default();
        size.set_width(w);
        size.set_height(h);
        io.write(IspRegs::dma_size(ch), size);
        io.write_raw(IspRegs::dma_stride(ch), cfg.stride);
        io.write_raw(IspRegs::dma_skip(ch), cfg.skip);

        for (buffer, planes) in cfg.addr.iter().enumerate().take(cfg.buffers as usize) {
            for (plane, addr) in planes.iter().enumerate().take(cfg.planes as usize) {
                io.write_raw(IspRegs::dma_addr_lo(ch, buffer, plane), *addr as u32);
                io.write_raw(IspRegs::dma_addr_hi(ch, buffer, plane), (*addr >> 32) as u32);
            }
        }

        let mut ctrl = DmaCtrlReg::default();
        ctrl.set_enable(true);
        ctrl.set_planes(cfg.planes.saturating_sub(1));
        ctrl.set_batch(cfg.buffers.saturating_sub(1));
        ctrl.set_bottom_up(cfg.bottom_up);
        ctrl.set_sub_frame_en(cfg.sub_frame_mask());
        io.write(IspRegs::dma_ctrl(ch), ctrl);
        Ok(())
    }
}

impl<R: RegisterAccess> HardwareOps for RegisterDdk<R> {
    type Error = DdkError;

    fn reset(&self) -> Result<(), DdkError> {
        match self.bias() {
            Some(bias) => {
                bias.modify(BiasRegs::core_reset(), |r| r.set_reset(true));
                bias.modify(BiasRegs::core_reset(), |r| r.set_reset(false));
            }
            None => {
                let io = self.main();
                io.modify(IspRegs::global_ctrl(), |r| r.set_reset(true));
                io.modify(IspRegs::global_ctrl(), |r| r.set_reset(false));
            }
        }
        Ok(())
    }

    fn wait_idle(&self, timeout: Duration) -> Result<bool, DdkError> {
        let start = Instant::now();
        loop {
            if self.main().read(IspRegs::idle_status()).idle() {
                return Ok(true);
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Ok(false);
            }
            thread::sleep(IDLE_POLL.min(timeout - elapsed));
        }
    }

    fn init_common(&self) -> Result<(), DdkError> {
        if let Some(bias) = self.bias() {
            bias.write_raw(BiasRegs::core_init(), 1);
        }
        self.main().modify(IspRegs::global_ctrl(), |r| {
            r.set_start(true);
            r.set_clk_en(true);
        });
        Ok(())
    }

    fn init_dma(&self, channel: u8) -> Result<(), DdkError> {
        Self::check_channel(channel)?;
        self.main()
            .write(IspRegs::dma_ctrl(channel), DmaCtrlReg::default());
        Ok(())
    }

    fn set_size(&self, width: u32, height: u32) -> Result<(), DdkError> {
        let (w, h) = size16(width, height)?;
        let mut reg = FrameSizeReg::default();
        reg.set_width(w);
        reg.set_height(h);
        self.main().write(IspRegs::frame_size(), reg);
        Ok(())
    }

    fn set_mode(&self, mode: u8, reprocess: bool) -> Result<(), DdkError> {
        let mut reg = ModeReg::default();
        reg.set_mode(mode);
        reg.set_reprocess(reprocess);
        self.main().write(IspRegs::mode(), reg);
        Ok(())
    }

    fn set_cache(&self, enable: bool, hint: u8) -> Result<(), DdkError> {
        let mut reg = CacheReg::default();
        reg.set_enable(enable);
        reg.set_hint(hint);
        self.main().write(IspRegs::cache(), reg);
        Ok(())
    }

    fn set_rdma(&self, cfg: &DmaConfig) -> Result<(), DdkError> {
        self.program_dma(cfg)
    }

    fn set_wdma(&self, cfg: &DmaConfig) -> Result<(), DdkError> {
        self.program_dma(cfg)
    }

    fn irq_status(&self, clear: bool) -> u32 {
        let io = self.main();
        let status = io.read(IspRegs::irq_status());
        if clear && status.to_raw() != 0 {
            io.write(IspRegs::irq_status(), status);
        }
        status.to_raw()
    }

    fn irq_mask(&self) -> u32 {
        self.main().read(IspRegs::irq_enable()).to_raw()
    }

    fn set_irq_mask(&self, mask: u32) {
        self.main()
            .write(IspRegs::irq_enable(), IrqReg::from_raw(mask));
    }

    fn ctx_init(&self, banked: bool) -> Result<(), DdkError> {
        let mut reg = CtxCtrlReg::default();
        reg.set_enable(banked);
        self.main().write(IspRegs::ctx_ctrl(), reg);
        Ok(())
    }

    fn ctx_select(&self, slot: ContextSlot) -> Result<(), DdkError> {
        self.check_slot(slot)?;
        let mut reg = CtxSlotReg::default();
        reg.set_slot(slot_e(slot).bits());
        self.main().write(IspRegs::ctx_select(), reg);
        Ok(())
    }

    fn ctx_active(&self) -> ContextSlot {
        let bits = self.main().read(IspRegs::ctx_active()).slot();
        SlotE::from_bits(bits).map_or(ContextSlot::Direct, context_slot)
    }

    fn ctx_commit(&self, slot: ContextSlot) -> Result<(), DdkError> {
        if !slot.is_banked() {
            return Ok(());
        }
        self.check_slot(slot)?;
        if self.ctx_active() == slot {
            return Err(DdkError::SlotActive(slot));
        }
        let mut reg = CtxCommitReg::default();
        reg.set_slot(slot_e(slot).bits());
        reg.set_trigger(true);
        self.main().write(IspRegs::ctx_commit(), reg);
        Ok(())
    }

    fn clock_enable(&self, enable: bool) {
        let clk_en = Field::new(
            IspRegs::global_ctrl().offset(),
            GlobalCtrlReg::CLK_EN_OFFSET as u8,
            GlobalCtrlReg::CLK_EN_WIDTH as u8,
        );
        self.main().set_field(clk_en, u32::from(enable));
    }

    fn dump(&self, sink: &mut dyn FnMut(RegSpace, u32, u32)) {
        let main = [
            IspRegs::global_ctrl().offset(),
            IspRegs::idle_status().offset(),
            IspRegs::version().offset(),
            IspRegs::irq_status().offset(),
            IspRegs::irq_enable().offset(),
            IspRegs::ctx_ctrl().offset(),
            IspRegs::ctx_select().offset(),
            IspRegs::ctx_active().offset(),
            IspRegs::ctx_commit().offset(),
            IspRegs::frame_size().offset(),
            IspRegs::mode().offset(),
            IspRegs::cache().offset(),
        ];
        for offset in main {
            sink(RegSpace::Main, offset, self.regs.read32(RegSpace::Main, offset));
        }
        for ch in 0..MAX_DMA_CHANNELS {
            let ctrl = IspRegs::dma_ctrl(ch).offset();
            for offset in [
                ctrl,
                IspRegs::dma_size(ch).offset(),
                IspRegs::dma_stride(ch).offset(),
                IspRegs::dma_skip(ch).offset(),
            ] {
                sink(RegSpace::Main, offset, self.regs.read32(RegSpace::Main, offset));
            }
        }
        if let Some(bias) = self.bias() {
            for offset in [BiasRegs::core_reset().offset(), BiasRegs::core_init().offset()] {
                sink(bias.space(), offset, self.regs.read32(bias.space(), offset));
            }
        }
    }
}
