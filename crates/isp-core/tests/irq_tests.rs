//! Interrupt-path tests: dispatch through the block's table, frame
//! retirement, counters, suspension and the disable timeout.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::{frame, Event, Rig, FAST_COREX};
use isp_core::block::lme;
use isp_core::hw::ip::{IRQ_DMA_DONE, IRQ_FRAME_END, IRQ_FRAME_START, IRQ_LINE};
use isp_core::{
    ErrorClass, FrameCounters, HwIpError, OutputId, SharedBlock, ShotResult, StateFlags,
};
use isp_registers::components::isp_regs::BiasRegs;
use isp_registers::IspRegs;

const IRQ_DMA_ERR: u32 = 1 << 8;

fn done(fcount: u32, buf_index: u8) -> Event {
    Event::Done {
        instance: 0,
        fcount,
        buf_index,
        output: OutputId::CoreEnd,
        result: ShotResult::Success,
        get_meta: true,
    }
}

fn streaming() -> Rig {
    let rig = Rig::new(&FAST_COREX);
    rig.start_streaming();
    rig
}

// ============================================================================
// Dispatch
// ============================================================================

mod dispatch_tests {
    use super::*;

    #[test]
    fn start_and_end_in_one_word() {
        let rig = streaming();
        rig.shot(1);

        let fired = rig.fire(IRQ_FRAME_START | IRQ_FRAME_END);
        // Overlap warning, frame start, frame end.
        assert_eq!(fired, 3);
        assert_eq!(
            rig.ip.counters(),
            FrameCounters {
                frame_start: 1,
                frame_end: 1,
                dma_done: 0
            }
        );
        assert_eq!(rig.group.events(), vec![Event::Start(0), done(1, 0)]);
        assert_eq!(rig.ip.in_flight(), 0);
        assert!(!rig.ip.is_frame_valid());
        assert_eq!(rig.regs.peek(IspRegs::irq_status().offset()), 0);
    }

    #[test]
    fn separate_start_and_end() {
        let rig = streaming();
        rig.shot(1);

        assert_eq!(rig.fire(IRQ_FRAME_START), 1);
        assert!(rig.ip.is_frame_valid());
        assert_eq!(rig.group.starts(), 1);
        assert!(rig.group.done().is_empty());

        assert_eq!(rig.fire(IRQ_FRAME_END), 1);
        assert!(!rig.ip.is_frame_valid());
        assert_eq!(rig.group.done(), vec![done(1, 0)]);
    }

    #[test]
    fn line_overlap_runs_its_own_entry() {
        let rig = streaming();
        rig.shot(1);
        assert_eq!(rig.fire(IRQ_LINE | IRQ_FRAME_START), 2);
        assert_eq!(rig.fire(IRQ_LINE), 0);
    }

    #[test]
    fn dma_done_and_error() {
        let rig = streaming();
        rig.shot(1);
        assert_eq!(rig.fire(IRQ_DMA_DONE), 1);
        assert_eq!(rig.ip.counters().dma_done, 1);

        let version = IspRegs::version().offset();
        assert_eq!(rig.fire(IRQ_DMA_ERR), 1);
        assert_eq!(rig.regs.reads_of(version), 1);
        assert!(rig.ip.flags().contains(StateFlags::RUN));
    }

    #[test]
    fn masked_sources_are_ignored() {
        let rig = streaming();
        rig.shot(1);
        rig.regs
            .poke(IspRegs::irq_enable().offset(), IRQ_FRAME_END);
        assert_eq!(rig.fire(IRQ_FRAME_START), 0);
        assert_eq!(rig.ip.counters().frame_start, 0);
        // Status is still acknowledged.
        assert_eq!(rig.regs.peek(IspRegs::irq_status().offset()), 0);
    }

    #[test]
    fn irq_before_configuration_is_ignored() {
        let rig = Rig::new(&FAST_COREX);
        rig.start();
        assert_eq!(rig.fire(IRQ_FRAME_START | IRQ_FRAME_END), 0);
        assert_eq!(rig.ip.counters(), FrameCounters::default());
        assert!(rig.group.events().is_empty());
        assert_eq!(rig.regs.peek(IspRegs::irq_status().offset()), 0);
    }

    #[test]
    fn irq_after_disable_is_ignored() {
        let rig = streaming();
        rig.shot(1);
        rig.ip.disable(rig.map()).unwrap();
        assert_eq!(rig.fire(IRQ_FRAME_END), 0);
        assert!(rig.group.events().is_empty());
    }

    #[test]
    fn irq_during_recovery_is_ignored() {
        let flag = Arc::new(AtomicBool::new(false));
        let rig = Rig::with_shared(&FAST_COREX, Arc::new(SharedBlock::new(flag.clone())));
        rig.start_streaming();
        rig.shot(1);

        flag.store(true, Ordering::SeqCst);
        assert!(rig.ip.flags().contains(StateFlags::OVERFLOW_RECOVERY));
        assert_eq!(rig.fire(IRQ_FRAME_START | IRQ_FRAME_END), 0);
        assert_eq!(rig.ip.in_flight(), 1);

        flag.store(false, Ordering::SeqCst);
        assert_eq!(rig.fire(IRQ_FRAME_START | IRQ_FRAME_END), 3);
        assert_eq!(rig.ip.in_flight(), 0);
    }

    #[test]
    fn idle_block_is_clock_gated() {
        let rig = streaming();
        let clk_en = 1 << 2;
        rig.shot(1);
        rig.shot(2);
        let ctrl = IspRegs::global_ctrl().offset();
        assert_ne!(rig.regs.peek(ctrl) & clk_en, 0);

        rig.fire(IRQ_FRAME_START | IRQ_FRAME_END);
        assert_ne!(rig.regs.peek(ctrl) & clk_en, 0);
        rig.fire(IRQ_FRAME_START | IRQ_FRAME_END);
        assert_eq!(rig.regs.peek(ctrl) & clk_en, 0);
    }
}

// ============================================================================
// Frame retirement
// ============================================================================

mod retire_tests {
    use super::*;

    #[test]
    fn frames_retire_in_issue_order() {
        let rig = streaming();
        for fcount in 1..=3 {
            rig.shot(fcount);
        }
        for _ in 0..3 {
            rig.fire(IRQ_FRAME_START | IRQ_FRAME_END);
        }
        assert_eq!(rig.group.done_fcounts(), vec![1, 2, 3]);
    }

    #[test]
    fn batch_counts_every_sub_frame() {
        let rig = streaming();
        let f = frame(4)
            .with_buffers(2)
            .with_dva(lme::CUR_IN, 1, &[0x5_0000_0000])
            .with_dva(lme::PREV_IN, 1, &[0x6_0000_0000]);
        rig.ip.shot(f, rig.map()).unwrap();

        rig.fire(IRQ_FRAME_START);
        assert_eq!(rig.ip.counters().frame_start, 2);
        rig.fire(IRQ_FRAME_END);
        assert_eq!(rig.ip.counters().frame_end, 2);
        assert_eq!(rig.group.done(), vec![done(4, 0), done(5, 1)]);
    }

    #[test]
    fn frame_end_without_frame_only_counts() {
        let rig = streaming();
        rig.shot(1);
        rig.fire(IRQ_FRAME_START | IRQ_FRAME_END);
        assert_eq!(rig.fire(IRQ_FRAME_END), 1);
        assert_eq!(rig.ip.counters().frame_end, 2);
        assert_eq!(rig.group.done_fcounts(), vec![1]);
    }

    #[test]
    fn ndone_reports_and_removes() {
        let rig = streaming();
        rig.shot(1);
        rig.shot(2);

        rig.ip.frame_ndone(&frame(1), ShotResult::Timeout).unwrap();
        assert_eq!(
            rig.group.done(),
            vec![Event::Done {
                instance: 0,
                fcount: 1,
                buf_index: 0,
                output: OutputId::CoreEnd,
                result: ShotResult::Timeout,
                get_meta: false,
            }]
        );
        assert_eq!(rig.ip.in_flight(), 1);

        // Frame end now retires frame 2.
        rig.fire(IRQ_FRAME_START | IRQ_FRAME_END);
        assert_eq!(rig.group.done_fcounts(), vec![1, 2]);
    }

    #[test]
    fn ndone_of_unknown_frame_is_ignored() {
        let rig = streaming();
        rig.shot(1);
        rig.ip.frame_ndone(&frame(7), ShotResult::Aborted).unwrap();
        assert!(rig.group.done().is_empty());
        assert_eq!(rig.ip.in_flight(), 1);
    }

    #[test]
    fn ndone_before_open_is_rejected() {
        let rig = Rig::new(&FAST_COREX);
        let err = rig.ip.frame_ndone(&frame(1), ShotResult::Aborted).unwrap_err();
        assert!(matches!(err, HwIpError::InvalidState { op: "frame_ndone", .. }));
    }

    #[test]
    fn timeout_dumps_registers_once_per_shot() {
        let rig = streaming();
        rig.shot(1);
        let version = IspRegs::version().offset();

        rig.ip.notify_timeout();
        rig.ip.notify_timeout();
        assert_eq!(rig.regs.reads_of(version), 1);

        rig.shot(2);
        rig.ip.notify_timeout();
        assert_eq!(rig.regs.reads_of(version), 2);
    }
}

// ============================================================================
// Suspend / resume
// ============================================================================

mod suspend_tests {
    use super::*;

    #[test]
    fn suspend_waits_for_frame_end() {
        let rig = streaming();
        rig.shot(1);
        rig.fire(IRQ_FRAME_START);

        rig.ip.suspend().unwrap();
        assert!(rig.ip.flags().contains(StateFlags::SUSPENDING));
        let err = rig.ip.shot(frame(2), rig.map()).unwrap_err();
        assert!(matches!(err, HwIpError::InvalidState { op: "shot", .. }));

        rig.fire(IRQ_FRAME_END);
        let flags = rig.ip.flags();
        assert!(flags.contains(StateFlags::SUSPEND));
        assert!(!flags.contains(StateFlags::SUSPENDING));

        rig.ip.resume().unwrap();
        assert!(!rig.ip.flags().contains(StateFlags::SUSPEND));
        rig.shot(2);
    }

    #[test]
    fn suspend_when_idle_is_immediate() {
        let rig = streaming();
        rig.shot(1);
        rig.fire(IRQ_FRAME_START | IRQ_FRAME_END);
        rig.ip.suspend().unwrap();
        assert!(rig.ip.flags().contains(StateFlags::SUSPEND));
    }

    #[test]
    fn suspend_before_configuration_is_ignored() {
        let rig = streaming();
        let before = rig.ip.flags();
        rig.ip.suspend().unwrap();
        assert_eq!(rig.ip.flags(), before);
    }
}

// ============================================================================
// Disable timeout
// ============================================================================

mod disable_timeout_tests {
    use super::*;

    #[test]
    fn timeout_resets_and_tears_down() {
        let rig = streaming();
        rig.shot(1);
        rig.fire(IRQ_FRAME_START);
        rig.regs.clear_writes();

        let err = rig.ip.disable(rig.map()).unwrap_err();
        assert!(matches!(err, HwIpError::Timeout(_)));
        assert_eq!(err.class(), ErrorClass::Timeout);
        assert!(rig
            .regs
            .bias_writes()
            .iter()
            .any(|w| w.offset == BiasRegs::core_reset().offset() && w.value & 1 == 1));

        assert_eq!(rig.shared.users(), 0);
        assert_eq!(rig.ip.flags(), StateFlags::OPEN.union(StateFlags::INIT));
        assert!(!rig.ip.is_frame_valid());
        assert_eq!(rig.ip.in_flight(), 0);
        assert!(!rig.shared.in_recovery());
    }

    #[test]
    fn timeout_with_other_user_keeps_running() {
        let a = streaming();
        let b = a.sibling(1);
        b.start();
        a.shot(1);
        a.fire(IRQ_FRAME_START);
        a.regs.clear_writes();

        let err = a.ip.disable(a.map()).unwrap_err();
        assert!(matches!(err, HwIpError::Timeout(_)));
        assert_eq!(a.shared.users(), 1);
        let flags = a.ip.flags();
        assert!(flags.contains(StateFlags::RUN));
        assert!(flags.contains(StateFlags::CONFIG));
        assert!(b.ip.flags().contains(StateFlags::RUN));
        // b is still running on the block, so nothing may reset it.
        assert!(a.regs.bias_writes().is_empty());
        assert!(!a.shared.in_recovery());
    }

    #[test]
    fn timeout_of_last_user_resets() {
        let a = streaming();
        let b = a.sibling(1);
        b.start();
        a.shot(1);
        a.fire(IRQ_FRAME_START);
        a.regs.clear_writes();

        b.ip.disable(b.map()).unwrap();
        assert_eq!(a.shared.users(), 1);
        assert!(a.regs.bias_writes().is_empty());

        let err = a.ip.disable(a.map()).unwrap_err();
        assert!(matches!(err, HwIpError::Timeout(_)));
        assert_eq!(a.shared.users(), 0);
        assert!(a
            .regs
            .bias_writes()
            .iter()
            .any(|w| w.offset == BiasRegs::core_reset().offset() && w.value & 1 == 1));
        assert_eq!(a.ip.flags(), StateFlags::OPEN.union(StateFlags::INIT));
    }

    #[test]
    fn timeout_recovery_keeps_foreign_recovery_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let rig = Rig::with_shared(&FAST_COREX, Arc::new(SharedBlock::new(flag.clone())));
        rig.start_streaming();
        rig.shot(1);
        rig.fire(IRQ_FRAME_START);
        // Another block starts an overflow recovery while this one waits.
        flag.store(true, Ordering::SeqCst);

        let err = rig.ip.disable(rig.map()).unwrap_err();
        assert!(matches!(err, HwIpError::Timeout(_)));
        assert!(flag.load(Ordering::SeqCst));
        assert!(rig.shared.in_recovery());
        assert!(rig.ip.flags().contains(StateFlags::OVERFLOW_RECOVERY));
    }
}
