//! One hardware block bound to one stream.
//!
//! The issuing context drives [`HwIp`] through its lifecycle and per-frame
//! shots; the interrupt context calls [`HwIp::handle_irq`]. The two meet in
//! the frame queue, the frame-valid completion flag and the atomic counters.
//!
//! Locks are always taken in the order stream, state, frames. The interrupt
//! path never takes the stream lock.

use std::mem;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use isp_hal::{BufferAllocator, DmaConfig, HardwareOps};
use isp_registers::components::isp_regs::irq_status::IrqReg;

use super::completion::CompletionChannel;
use super::frame::{FrameManager, FrameRecord, MAX_HW_FRAMES};
use super::irq::{InterruptDispatcher, IrqEntry, IrqMatch};
use super::recovery::RecoveryController;
use super::state::{HwState, StateFlags, Transition};
use crate::block::{BlockSpec, Direction, Source};
use crate::context::{ContextCommitter, ContextWrite, SlotPolicy};
use crate::dma::param::{Config, ParamSet, ParamStore, Reprogram};
use crate::dma::planner::{self, DmaPlanner, InternalSlot, PlanError};
use crate::error::HwIpError;
use crate::generation::HwGeneration;
use crate::group::{GroupCallbacks, HwMap, OutputId, ShotResult};

macro_rules! hw_log {
    ($lvl:ident, $ip:expr, $($arg:tt)+) => {
        log::$lvl!("[I{}][{}] {}", $ip.instance, $ip.spec.name, format_args!($($arg)+))
    };
}

pub const IRQ_FRAME_START: u32 = 1 << IrqReg::FRAME_START_OFFSET;
pub const IRQ_FRAME_END: u32 = 1 << IrqReg::FRAME_END_OFFSET;
pub const IRQ_LINE: u32 = 1 << IrqReg::LINE_OFFSET;
pub const IRQ_DMA_DONE: u32 = 1 << IrqReg::DMA_DONE_OFFSET;
pub const IRQ_ERRORS: u32 = (1 << IrqReg::DMA_ERR_OFFSET)
    | (1 << IrqReg::OVERFLOW_OFFSET)
    | (1 << IrqReg::COREX_ERR_OFFSET);
/// Sources enabled when a block starts running.
pub const IRQ_DEFAULT_MASK: u32 =
    IRQ_FRAME_START | IRQ_FRAME_END | IRQ_LINE | IRQ_DMA_DONE | IRQ_ERRORS;

const IRQ_TABLE_LEN: usize = 8;

fn line_overlap(status: u32) -> bool {
    status & IRQ_LINE != 0 && status & (IRQ_FRAME_START | IRQ_FRAME_END) != 0
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State of one physical block shared by every instance using it.
#[derive(Debug, Default)]
pub struct SharedBlock {
    run_rsc: AtomicU32,
    recovery: Arc<AtomicBool>,
}

impl SharedBlock {
    /// `recovery` is the hardware-wide overflow-recovery flag.
    pub fn new(recovery: Arc<AtomicBool>) -> Self {
        Self {
            run_rsc: AtomicU32::new(0),
            recovery,
        }
    }

    /// Streams currently running on the block.
    pub fn users(&self) -> u32 {
        self.run_rsc.load(Ordering::SeqCst)
    }

    /// A reset-and-wait-idle recovery is running on the hardware.
    pub fn in_recovery(&self) -> bool {
        self.recovery.load(Ordering::SeqCst)
    }

    /// Drop one user; returns how many remain.
    fn release(&self) -> u32 {
        let prev = self
            .run_rsc
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_sub(1))
            })
            .unwrap_or_else(|n| n);
        prev.saturating_sub(1)
    }
}

/// Collaborators of a block instance.
pub struct HwIpDeps<H> {
    pub hw: Arc<H>,
    pub alloc: Arc<dyn BufferAllocator>,
    pub group: Arc<dyn GroupCallbacks>,
    pub shared: Arc<SharedBlock>,
}

/// Interrupt counts since open. Start and end advance by the batch size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameCounters {
    pub frame_start: u32,
    pub frame_end: u32,
    pub dma_done: u32,
}

struct InternalBuffer {
    dva: Vec<u64>,
    bytes: usize,
}

/// Issuing-context state of the stream.
#[derive(Default)]
struct StreamState {
    params: ParamStore,
    buffers: Vec<InternalBuffer>,
    /// DMA settings of the last committed frame, in programming order.
    plans: Vec<DmaConfig>,
    history_valid: bool,
    /// Normal frames committed since open.
    issued: u32,
    reprocessing: bool,
    frame_type: u32,
}

/// One block instance bound to one stream.
pub struct HwIp<H: HardwareOps> {
    instance: u32,
    spec: &'static BlockSpec,
    gen: &'static HwGeneration,
    hw: Arc<H>,
    alloc: Arc<dyn BufferAllocator>,
    group: Arc<dyn GroupCallbacks>,
    shared: Arc<SharedBlock>,
    committer: ContextCommitter,
    recovery: RecoveryController,
    irq: InterruptDispatcher<Self, IRQ_TABLE_LEN>,

    stream: Mutex<StreamState>,
    state: Mutex<HwState>,
    frames: Mutex<Option<FrameManager>>,
    completion: CompletionChannel,
    fs: AtomicU32,
    fe: AtomicU32,
    dma_done: AtomicU32,
    num_buffers: AtomicU32,
    sfr_dumped: AtomicBool,
}

impl<H: HardwareOps> HwIp<H> {
    const IRQ_TABLE: [IrqEntry<Self>; 6] = [
        IrqEntry {
            name: "start/end overlap",
            when: IrqMatch::All(IRQ_FRAME_START | IRQ_FRAME_END),
            handler: Self::on_overlap,
        },
        IrqEntry {
            name: "line overlap",
            when: IrqMatch::Custom(line_overlap),
            handler: Self::on_line_overlap,
        },
        IrqEntry {
            name: "frame start",
            when: IrqMatch::Any(IRQ_FRAME_START),
            handler: Self::on_frame_start,
        },
        IrqEntry {
            name: "frame end",
            when: IrqMatch::Any(IRQ_FRAME_END),
            handler: Self::on_frame_end,
        },
        IrqEntry {
            name: "dma done",
            when: IrqMatch::Any(IRQ_DMA_DONE),
            handler: Self::on_dma_done,
        },
        IrqEntry {
            name: "error",
            when: IrqMatch::Any(IRQ_ERRORS),
            handler: Self::on_error,
        },
    ];

    /// A closed instance of block `spec` on hardware generation `gen`.
    pub fn new(
        instance: u32,
        spec: &'static BlockSpec,
        gen: &'static HwGeneration,
        deps: HwIpDeps<H>,
    ) -> Self {
        Self {
            instance,
            spec,
            gen,
            hw: deps.hw,
            alloc: deps.alloc,
            group: deps.group,
            shared: deps.shared,
            committer: ContextCommitter::new(gen),
            recovery: RecoveryController::new(gen.idle_timeout),
            irq: InterruptDispatcher::from_entries(&Self::IRQ_TABLE),
            stream: Mutex::new(StreamState::default()),
            state: Mutex::new(HwState::default()),
            frames: Mutex::new(None),
            completion: CompletionChannel::new(),
            fs: AtomicU32::new(0),
            fe: AtomicU32::new(0),
            dma_done: AtomicU32::new(0),
            num_buffers: AtomicU32::new(1),
            sfr_dumped: AtomicBool::new(false),
        }
    }

    /// Logical instance (stream) id.
    pub fn instance(&self) -> u32 {
        self.instance
    }

    /// Static description of the block.
    pub fn spec(&self) -> &'static BlockSpec {
        self.spec
    }

    /// Hardware generation the block runs on.
    pub fn generation(&self) -> &'static HwGeneration {
        self.gen
    }

    /// Hardware API of the block.
    pub fn hw(&self) -> &H {
        &self.hw
    }

    /// State shared with other instances on the same physical block.
    pub fn shared(&self) -> &Arc<SharedBlock> {
        &self.shared
    }

    /// Snapshot of the lifecycle state.
    pub fn state(&self) -> HwState {
        *lock(&self.state)
    }

    /// Lifecycle state as flags, including the hardware-wide recovery flag.
    pub fn flags(&self) -> StateFlags {
        let flags = self.state().flags();
        if self.shared.in_recovery() {
            flags.union(StateFlags::OVERFLOW_RECOVERY)
        } else {
            flags
        }
    }

    /// Frame start, frame end and DMA-done interrupt counts.
    pub fn counters(&self) -> FrameCounters {
        FrameCounters {
            frame_start: self.fs.load(Ordering::SeqCst),
            frame_end: self.fe.load(Ordering::SeqCst),
            dma_done: self.dma_done.load(Ordering::SeqCst),
        }
    }

    /// Frames committed to hardware and not yet retired.
    pub fn in_flight(&self) -> usize {
        lock(&self.frames).as_ref().map_or(0, FrameManager::len)
    }

    /// A frame has started and not yet ended.
    pub fn is_frame_valid(&self) -> bool {
        self.completion.is_valid()
    }

    /// DMA settings of the last committed frame, reads first.
    pub fn last_plans(&self) -> Vec<DmaConfig> {
        lock(&self.stream).plans.clone()
    }

    fn name(&self) -> String {
        format!("I{}][{}", self.instance, self.spec.name)
    }

    fn transition(&self, op: &'static str, t: Transition) -> Result<(), HwIpError<H::Error>> {
        let mut state = lock(&self.state);
        *state = state.apply(t).map_err(|e| {
            hw_log!(error, self, "{op} rejected in state {}", e.from);
            HwIpError::InvalidState { op, state: e.from }
        })?;
        Ok(())
    }

    // ====================================================================
    // Lifecycle
    // ====================================================================

    /// Allocate the frame queue and stream state. Idempotent.
    pub fn open(&self) -> Result<(), HwIpError<H::Error>> {
        let mut stream = lock(&self.stream);
        if self.state().is_open() {
            hw_log!(debug, self, "already open");
            return Ok(());
        }

        *lock(&self.frames) = Some(FrameManager::new());
        *stream = StreamState::default();
        let channels = self.spec.channels.len();
        if stream.plans.try_reserve_exact(channels).is_err() {
            *lock(&self.frames) = None;
            hw_log!(error, self, "failed to allocate stream state");
            return Err(HwIpError::Alloc {
                what: "stream state",
                bytes: channels * mem::size_of::<DmaConfig>(),
            });
        }

        self.completion.clear();
        self.fs.store(0, Ordering::SeqCst);
        self.fe.store(0, Ordering::SeqCst);
        self.dma_done.store(0, Ordering::SeqCst);
        self.sfr_dumped.store(false, Ordering::SeqCst);
        self.transition("open", Transition::Open)?;
        hw_log!(info, self, "open ({})", self.gen.name);
        Ok(())
    }

    /// Allocate internal buffers and prepare every DMA channel.
    /// `reprocessing` marks the whole stream as reprocessing; `frame_type`
    /// is the stream's HDR arrangement.
    pub fn init(&self, reprocessing: bool, frame_type: u32) -> Result<(), HwIpError<H::Error>> {
        let mut stream = lock(&self.stream);
        let state = self.state();
        if !state.is_open() {
            hw_log!(error, self, "init before open");
            return Err(HwIpError::InvalidState {
                op: "init",
                state: state.flags(),
            });
        }

        stream.reprocessing = reprocessing;
        stream.frame_type = frame_type;
        if stream.buffers.is_empty() {
            self.alloc_buffers(&mut stream)?;
        }
        for desc in self.spec.channels {
            if let Err(e) = self.hw.init_dma(desc.id.0) {
                hw_log!(error, self, "{} {}: DMA init failed: {e:?}", desc.id, desc.name);
                self.free_buffers(&mut stream);
                return Err(e.into());
            }
        }

        self.transition("init", Transition::Init)?;
        hw_log!(info, self, "init (reprocessing {reprocessing}, frame type {frame_type})");
        Ok(())
    }

    fn alloc_buffers(&self, stream: &mut StreamState) -> Result<(), HwIpError<H::Error>> {
        for spec in self.spec.buffers {
            let bytes = spec.bytes();
            let mut dva = Vec::with_capacity(spec.copies);
            for _ in 0..spec.copies {
                match self.alloc.alloc(bytes) {
                    Ok(addr) => dva.push(addr),
                    Err(e) => {
                        hw_log!(error, self, "{}: {e}", spec.name);
                        stream.buffers.push(InternalBuffer { dva, bytes });
                        self.free_buffers(stream);
                        return Err(HwIpError::alloc(spec.name, e));
                    }
                }
            }
            hw_log!(debug, self, "{}: {} x {bytes} bytes", spec.name, spec.copies);
            stream.buffers.push(InternalBuffer { dva, bytes });
        }
        Ok(())
    }

    fn free_buffers(&self, stream: &mut StreamState) {
        for buf in stream.buffers.drain(..) {
            for dva in buf.dva {
                if let Err(e) = self.alloc.free(dva, buf.bytes) {
                    hw_log!(warn, self, "free 0x{dva:x}: {e}");
                }
            }
        }
        stream.history_valid = false;
    }

    /// Release internal buffers. The block must not be running.
    pub fn deinit(&self) -> Result<(), HwIpError<H::Error>> {
        let mut stream = lock(&self.stream);
        self.transition("deinit", Transition::Deinit)?;
        self.free_buffers(&mut stream);
        stream.params.invalidate();
        hw_log!(info, self, "deinit");
        Ok(())
    }

    /// Quiesce the block if no stream is running on it and release
    /// everything. Idempotent.
    pub fn close(&self) -> Result<(), HwIpError<H::Error>> {
        let mut stream = lock(&self.stream);
        if !self.state().is_open() {
            return Ok(());
        }

        if self.state().is_running() {
            let users = self.shared.release();
            hw_log!(warn, self, "closing while running ({users} user(s) left)");
        }
        let result = if self.shared.users() == 0 {
            self.recovery
                .recover(&self.name(), &*self.hw, &self.shared.recovery)
        } else {
            Ok(())
        };

        self.free_buffers(&mut stream);
        *stream = StreamState::default();
        if let Some(mut frames) = lock(&self.frames).take() {
            let left = frames.drain();
            if !left.is_empty() {
                hw_log!(warn, self, "closing with {} frame(s) queued", left.len());
            }
        }
        self.completion.clear();
        self.transition("close", Transition::Close)?;
        hw_log!(info, self, "close");
        result
    }

    /// Start the block for this stream. Every call takes a reference on the
    /// physical block that [`HwIp::disable`] releases.
    pub fn enable(&self, hw_map: HwMap) -> Result<(), HwIpError<H::Error>> {
        if !hw_map.contains(self.spec.hw_id) {
            hw_log!(warn, self, "enable: not in hw map");
            return Ok(());
        }
        let state = self.state();
        if !state.is_initialized() {
            hw_log!(error, self, "enable: not initialized");
            return Err(HwIpError::NotInitialized);
        }

        let users = self.shared.run_rsc.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
        if state.is_running() {
            hw_log!(debug, self, "already running ({users} users)");
            return Ok(());
        }
        if let Err(e) = self.start_block(users == 1) {
            self.shared.release();
            hw_log!(error, self, "enable failed: {e:?}");
            return Err(e.into());
        }
        if let Err(e) = self.transition("enable", Transition::Enable) {
            self.shared.release();
            return Err(e);
        }
        hw_log!(info, self, "enable ({users} users)");
        Ok(())
    }

    fn start_block(&self, first: bool) -> Result<(), H::Error> {
        if first {
            self.hw.init_common()?;
            self.hw.ctx_init(self.gen.is_banked())?;
        }
        self.hw.set_irq_mask(IRQ_DEFAULT_MASK);
        Ok(())
    }

    /// Stop the block for this stream.
    ///
    /// Waits for an in-flight frame to end; on timeout `Timeout` is returned
    /// once teardown has finished. The block is only reset, and RUN and
    /// CONFIG only cleared, when no other stream still uses it.
    pub fn disable(&self, hw_map: HwMap) -> Result<(), HwIpError<H::Error>> {
        if !hw_map.contains(self.spec.hw_id) {
            hw_log!(warn, self, "disable: not in hw map");
            return Ok(());
        }
        let state = self.state();
        if !state.is_initialized() {
            hw_log!(error, self, "disable: not initialized");
            return Err(HwIpError::NotInitialized);
        }

        let mut result = Ok(());
        let timeout = self.gen.stop_timeout;
        let timed_out = !self.completion.wait_clear(timeout);
        if timed_out {
            hw_log!(error, self, "frame end not seen within {timeout:?}");
            self.completion.clear();
            result = Err(HwIpError::Timeout(timeout));
        }

        let users = if state.is_running() {
            self.shared.release()
        } else {
            self.shared.users()
        };
        if timed_out {
            if users == 0 {
                // Failure is logged by the controller; the caller gets Timeout.
                let _ = self
                    .recovery
                    .recover(&self.name(), &*self.hw, &self.shared.recovery);
            } else {
                hw_log!(warn, self, "not resetting, block still used by {users} stream(s)");
            }
        }

        if !state.is_running() {
            return result;
        }
        if users > 0 {
            hw_log!(info, self, "disable: still used by {users} stream(s)");
            return result;
        }

        self.hw.clock_enable(false);
        self.transition("disable", Transition::Disable)?;
        let left = lock(&self.frames)
            .as_mut()
            .map(FrameManager::drain)
            .unwrap_or_default();
        if !left.is_empty() {
            let fcounts: Vec<u32> = left.iter().map(|f| f.fcount).collect();
            hw_log!(warn, self, "disable: dropping queued frames {fcounts:?}");
        }
        hw_log!(info, self, "disable");
        result
    }

    // ====================================================================
    // Per-frame
    // ====================================================================

    /// Merge `params` into the stored channel parameters.
    pub fn set_param(&self, params: &ParamSet, hw_map: HwMap) -> Result<(), HwIpError<H::Error>> {
        if !hw_map.contains(self.spec.hw_id) {
            hw_log!(debug, self, "set_param: not in hw map");
            return Ok(());
        }
        let mut stream = lock(&self.stream);
        if !self.state().is_initialized() {
            hw_log!(error, self, "set_param: not initialized");
            return Err(HwIpError::NotInitialized);
        }
        planner::validate(self.spec, params).map_err(PlanError::into_hw)?;
        stream.params.merge(params);
        Ok(())
    }

    fn internal_slots(&self, stream: &StreamState) -> Vec<InternalSlot> {
        let issued = stream.issued as usize;
        stream
            .buffers
            .iter()
            .map(|buf| {
                let copies = buf.dva.len().max(1);
                let at = |i: usize| buf.dva.get(i % copies).copied().unwrap_or(0);
                InternalSlot {
                    write: at(issued),
                    read: at(issued + copies - 1),
                    bytes: buf.bytes,
                }
            })
            .collect()
    }

    fn writes_history(&self, plans: &[DmaConfig]) -> bool {
        self.spec
            .programming_order()
            .zip(plans)
            .any(|(id, plan)| {
                plan.enabled
                    && self.spec.channel(id).is_some_and(|c| {
                        c.dir == Direction::Write && matches!(c.source, Source::Internal(_))
                    })
            })
    }

    /// Program one frame into a context slot and commit it.
    pub fn shot(&self, frame: FrameRecord, hw_map: HwMap) -> Result<(), HwIpError<H::Error>> {
        if !hw_map.contains(self.spec.hw_id) {
            hw_log!(debug, self, "[F{}] shot: not in hw map", frame.fcount);
            return Ok(());
        }
        let mut stream = lock(&self.stream);
        let state = self.state();
        if !state.is_open() {
            return Err(HwIpError::InvalidState {
                op: "shot",
                state: state.flags(),
            });
        }
        if !state.is_initialized() {
            hw_log!(error, self, "[F{}] shot: not initialized", frame.fcount);
            return Err(HwIpError::NotInitialized);
        }
        if !state.is_running() || state.is_suspended() || state.is_suspending() {
            hw_log!(warn, self, "[F{}] shot rejected in state {}", frame.fcount, state.flags());
            return Err(HwIpError::InvalidState {
                op: "shot",
                state: state.flags(),
            });
        }
        if lock(&self.frames).as_ref().map_or(0, FrameManager::len) >= MAX_HW_FRAMES {
            hw_log!(error, self, "[F{}] frame queue full", frame.fcount);
            return Err(HwIpError::QueueFull(MAX_HW_FRAMES));
        }

        let fcount = frame.fcount;
        let internal = frame.is_internal();
        let num_buffers = frame.buffers();
        let reprocess = stream.reprocessing || frame.reprocessing;

        let (cfg, reprogram, plans) = if internal {
            let cfg = Config {
                mode: self.spec.postproc_mode.bits(),
                reprocess,
                frame_type: stream.frame_type,
                ..stream.params.applied().unwrap_or_default()
            };
            let plans = self
                .spec
                .programming_order()
                .map(|id| DmaConfig::disabled(id.0))
                .collect::<Vec<_>>();
            (cfg, Reprogram::Incremental, plans)
        } else {
            if let Some(over) = &frame.params {
                planner::validate(self.spec, over).map_err(PlanError::into_hw)?;
                stream.params.merge(over);
            }
            let derived = planner::derive_config(
                self.spec,
                stream.params.params(),
                reprocess,
                stream.frame_type,
            );
            let cfg = derived.map_err(|e| {
                hw_log!(error, self, "[F{fcount}] {e}");
                e.into_hw()
            })?;
            let reprogram = stream.params.apply(cfg);
            if reprogram == Reprogram::Full {
                stream.history_valid = false;
                hw_log!(info, self, "[F{fcount}] configure {}x{} mode {}", cfg.width, cfg.height, cfg.mode);
            }
            let internal_slots = self.internal_slots(&stream);
            let planner = DmaPlanner {
                instance: self.instance,
                spec: self.spec,
                gen: self.gen,
                config: cfg,
                params: stream.params.params(),
                frame: &frame,
                internal: &internal_slots,
                history_valid: stream.history_valid,
                first_frame: stream.issued == 0,
            };
            let plans = self
                .spec
                .programming_order()
                .map(|id| planner.plan(id))
                .collect::<Result<Vec<_>, _>>();
            match plans {
                Ok(plans) => (cfg, reprogram, plans),
                Err(e) => {
                    hw_log!(error, self, "[F{fcount}] {e}");
                    stream.params.invalidate();
                    return Err(e.into_hw());
                }
            }
        };

        let (width, height) = plans
            .iter()
            .find(|p| p.enabled && p.channel == self.spec.leader.0)
            .map_or((cfg.width, cfg.height), |p| (p.width, p.height));

        self.hw.clock_enable(true);
        let policy = if reprocess {
            SlotPolicy::Reprocess
        } else {
            SlotPolicy::Live
        };
        let staged = self.stage(policy, &plans, width, height, cfg.mode, cfg.reprocess, reprogram);
        let session = match staged {
            Ok(session) => session,
            Err(e) => {
                hw_log!(error, self, "[F{fcount}] programming failed: {e}");
                stream.params.invalidate();
                self.gate_clock_if_idle();
                return Err(e);
            }
        };

        // The state lock is held across the commit so the first frame's
        // interrupts are not taken for pre-configuration ones.
        let mut hw_state = lock(&self.state);
        // Queue before commit so a frame end right after the commit finds it.
        let queued = lock(&self.frames)
            .as_mut()
            .map_or(Ok(()), |frames| frames.push(frame).map_err(drop));
        if queued.is_err() {
            drop(hw_state);
            self.gate_clock_if_idle();
            return Err(HwIpError::QueueFull(MAX_HW_FRAMES));
        }
        let slot = match session.commit() {
            Ok(slot) => slot,
            Err(e) => {
                hw_log!(error, self, "[F{fcount}] commit failed: {e:?}");
                if let Some(frames) = lock(&self.frames).as_mut() {
                    frames.remove(fcount);
                }
                drop(hw_state);
                stream.params.invalidate();
                self.gate_clock_if_idle();
                return Err(e.into());
            }
        };
        match hw_state.apply(Transition::Configure) {
            Ok(next) => *hw_state = next,
            Err(e) => hw_log!(error, self, "[F{fcount}] configure rejected in state {}", e.from),
        }
        drop(hw_state);

        self.num_buffers
            .store(u32::from(num_buffers), Ordering::SeqCst);
        self.sfr_dumped.store(false, Ordering::SeqCst);
        if !internal {
            stream.history_valid = self.writes_history(&plans);
            stream.issued = stream.issued.wrapping_add(1);
        }
        stream.plans.clear();
        stream.plans.extend_from_slice(&plans);
        hw_log!(debug, self, "[F{fcount}] shot in {slot:?} ({num_buffers} buffers)");
        Ok(())
    }

    fn gate_clock_if_idle(&self) {
        if lock(&self.frames).as_ref().is_none_or(FrameManager::is_empty) {
            self.hw.clock_enable(false);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn stage(
        &self,
        policy: SlotPolicy,
        plans: &[DmaConfig],
        width: u32,
        height: u32,
        mode: u8,
        reprocess: bool,
        reprogram: Reprogram,
    ) -> Result<ContextWrite<'_, H>, HwIpError<H::Error>> {
        let mut session = self.committer.begin(&*self.hw, policy)?;
        session.write(|hw| hw.set_size(width, height))?;
        session.write(|hw| hw.set_mode(mode, reprocess))?;
        if reprogram == Reprogram::Full {
            session.write(|hw| hw.set_cache(true, self.spec.cache_hint))?;
        }
        let reads = self.spec.rdma_order.len();
        for (i, plan) in plans.iter().enumerate() {
            if i < reads {
                session.write(|hw| hw.set_rdma(plan))?;
            } else {
                session.write(|hw| hw.set_wdma(plan))?;
            }
        }
        Ok(session)
    }

    /// Retire a frame that will not complete normally and report it with
    /// `result`. Unknown frames are ignored with a warning.
    pub fn frame_ndone(
        &self,
        frame: &FrameRecord,
        result: ShotResult,
    ) -> Result<(), HwIpError<H::Error>> {
        let removed = lock(&self.frames)
            .as_mut()
            .map(|fm| (fm.remove(frame.fcount), fm.is_empty()));
        let Some((removed, idle)) = removed else {
            return Err(HwIpError::InvalidState {
                op: "frame_ndone",
                state: self.flags(),
            });
        };
        let Some(done) = removed else {
            hw_log!(warn, self, "[F{}] ndone: not in flight", frame.fcount);
            return Ok(());
        };

        hw_log!(warn, self, "[F{}] ndone ({result:?})", done.fcount);
        if idle {
            self.completion.clear();
        }
        for i in 0..done.buffers() {
            self.group.frame_done(
                self.instance,
                &done.sub_frame(i),
                OutputId::CoreEnd,
                result,
                false,
            );
        }
        Ok(())
    }

    /// The group saw no frame end in time. Registers are dumped once until
    /// the next successful shot.
    pub fn notify_timeout(&self) {
        let c = self.counters();
        hw_log!(warn, self, "timeout: fs {} fe {} dma {}", c.frame_start, c.frame_end, c.dma_done);
        self.recovery
            .check_counters(&self.name(), c.frame_start, c.frame_end);
        if self.sfr_dumped.swap(true, Ordering::SeqCst) {
            hw_log!(debug, self, "registers already dumped");
        } else {
            self.dump_regs();
        }
    }

    /// Stop accepting shots. With a frame in flight the block is SUSPENDING
    /// until that frame ends.
    pub fn suspend(&self) -> Result<(), HwIpError<H::Error>> {
        let state = self.state();
        if !state.is_configured() {
            hw_log!(warn, self, "suspend ignored in state {}", state.flags());
            return Ok(());
        }
        self.transition(
            "suspend",
            Transition::Suspend {
                frame_valid: self.completion.is_valid(),
            },
        )?;
        hw_log!(info, self, "suspend ({})", self.flags());
        Ok(())
    }

    /// Accept shots again after [`HwIp::suspend`].
    pub fn resume(&self) -> Result<(), HwIpError<H::Error>> {
        self.transition("resume", Transition::Resume)?;
        hw_log!(info, self, "resume");
        Ok(())
    }

    /// Block until the in-flight frame ends.
    pub fn wait_frame_done(&self, timeout: Duration) -> Result<(), HwIpError<H::Error>> {
        if self.completion.wait_clear(timeout) {
            Ok(())
        } else {
            Err(HwIpError::Timeout(timeout))
        }
    }

    /// Log every diagnostic register and the last programmed DMA settings.
    pub fn dump_regs(&self) {
        hw_log!(error, self, "register dump ({})", self.gen.name);
        self.hw.dump(&mut |space, offset, value| {
            hw_log!(error, self, "{space:?}+0x{offset:04X}: 0x{value:08X}");
        });
        // Never block here: the interrupt path dumps on error.
        if let Ok(stream) = self.stream.try_lock() {
            for plan in stream.plans.iter().filter(|p| p.enabled) {
                hw_log!(
                    error,
                    self,
                    "D{}: {}x{} stride {} skip {} addr0 0x{:x}",
                    plan.channel,
                    plan.width,
                    plan.height,
                    plan.stride,
                    plan.skip,
                    plan.addr[0][0]
                );
            }
        }
    }

    // ====================================================================
    // Interrupt context
    // ====================================================================

    /// Read, clear and dispatch the block's interrupt status. Returns the
    /// number of handlers that ran.
    pub fn handle_irq(&self) -> usize {
        let status = self.hw.irq_status(true);
        if status == 0 {
            return 0;
        }
        let enabled = self.hw.irq_mask();
        let state = self.state();
        if !state.is_configured() {
            hw_log!(info, self, "irq 0x{status:x} before configuration, ignored");
            return 0;
        }
        if !state.is_running() {
            hw_log!(error, self, "irq 0x{status:x} in state {}", state.flags());
            return 0;
        }
        if self.shared.in_recovery() {
            hw_log!(error, self, "irq 0x{status:x} during recovery, ignored");
            return 0;
        }
        self.irq.dispatch(self, status, enabled)
    }

    fn on_overlap(&self, status: u32) {
        hw_log!(warn, self, "start/end overlapped (0x{status:x})");
    }

    fn on_line_overlap(&self, status: u32) {
        hw_log!(warn, self, "line overlapped (0x{status:x})");
    }

    fn on_frame_start(&self, _status: u32) {
        let n = self.num_buffers.load(Ordering::SeqCst);
        let fs = self.fs.fetch_add(n, Ordering::SeqCst).wrapping_add(n);
        self.completion.set_valid();
        hw_log!(debug, self, "F.S {fs}");
        self.group.frame_start(self.instance);
    }

    fn on_frame_end(&self, _status: u32) {
        let (frame, idle) = {
            let mut frames = lock(&self.frames);
            match frames.as_mut() {
                Some(fm) => (fm.pop_oldest(), fm.is_empty()),
                None => (None, true),
            }
        };
        let n = frame.as_ref().map_or_else(
            || self.num_buffers.load(Ordering::SeqCst),
            |f| u32::from(f.buffers()),
        );
        let fe = self.fe.fetch_add(n, Ordering::SeqCst).wrapping_add(n);
        let fs = self.fs.load(Ordering::SeqCst);
        self.recovery.check_counters(&self.name(), fs, fe);
        if idle {
            self.hw.clock_enable(false);
        }

        match &frame {
            Some(f) => {
                hw_log!(debug, self, "[F{}] F.E {fe}", f.fcount);
                for i in 0..f.buffers() {
                    self.group.frame_done(
                        self.instance,
                        &f.sub_frame(i),
                        OutputId::CoreEnd,
                        ShotResult::Success,
                        true,
                    );
                }
            }
            None => hw_log!(warn, self, "F.E {fe} with no frame in flight"),
        }

        let mut state = lock(&self.state);
        if let Ok(next) = state.apply(Transition::FrameEnded) {
            *state = next;
        }
        drop(state);
        self.completion.clear();
    }

    fn on_dma_done(&self, _status: u32) {
        self.dma_done.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, status: u32) {
        hw_log!(error, self, "error interrupt 0x{status:x}");
        self.dump_regs();
    }
}
