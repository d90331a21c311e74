//! Shared fixtures for the block-instance integration tests.
//!
//! `MockRegisters` is a register file that records every write together with
//! the context slot selected at the time, so tests can check which slot a
//! banked write landed in.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use isp_core::block::lme::{self, LME};
use isp_core::generation::{GEN_COREX, GEN_DIRECT};
use isp_core::{
    BlockSpec, ChannelParam, FrameRecord, GroupCallbacks, HwGeneration, HwIp, HwIpDeps, HwMap, OutputId,
    ParamSet, RegisterDdk, Rect, SharedBlock, ShotResult,
};
use isp_hal::{AllocError, BufferAllocator, RegSpace, RegisterAccess};
use isp_registers::IspRegs;

pub static FAST_COREX: HwGeneration = HwGeneration {
    stop_timeout: Duration::from_millis(30),
    idle_timeout: Duration::from_millis(5),
    ..GEN_COREX
};

pub static FAST_DIRECT: HwGeneration = HwGeneration {
    stop_timeout: Duration::from_millis(30),
    idle_timeout: Duration::from_millis(5),
    ..GEN_DIRECT
};

pub const WIDTH: u32 = 640;
pub const HEIGHT: u32 = 480;

/// Encoding of "no slot active" in CTX_ACTIVE.
pub const SLOT_NONE: u32 = 7;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Register file
// ============================================================================

/// One captured register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteRecord {
    pub space: RegSpace,
    pub offset: u32,
    pub value: u32,
    /// CTX_SELECT value when the write happened.
    pub slot: u32,
}

struct Inner {
    regs: HashMap<(RegSpace, u32), u32>,
    writes: Vec<WriteRecord>,
    reads: HashMap<(RegSpace, u32), usize>,
    selected: u32,
    /// CTX_ACTIVE value latched after the next CTX_ACTIVE read.
    next_active: Option<u32>,
}

#[derive(Clone)]
pub struct MockRegisters {
    inner: Arc<Mutex<Inner>>,
    bias: bool,
}

impl MockRegisters {
    pub fn new(bias: bool) -> Self {
        let mut regs = HashMap::new();
        regs.insert((RegSpace::Main, IspRegs::idle_status().offset()), 1);
        regs.insert((RegSpace::Main, IspRegs::ctx_active().offset()), SLOT_NONE);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                regs,
                writes: Vec::new(),
                reads: HashMap::new(),
                selected: SLOT_NONE,
                next_active: None,
            })),
            bias,
        }
    }

    fn inner(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// Set a register as the hardware would, without recording a write.
    pub fn poke(&self, offset: u32, value: u32) {
        self.inner().regs.insert((RegSpace::Main, offset), value);
    }

    pub fn peek(&self, offset: u32) -> u32 {
        self.inner()
            .regs
            .get(&(RegSpace::Main, offset))
            .copied()
            .unwrap_or(0)
    }

    /// Latch interrupt status bits.
    pub fn raise(&self, bits: u32) {
        let mut inner = self.inner();
        *inner
            .regs
            .entry((RegSpace::Main, IspRegs::irq_status().offset()))
            .or_insert(0) |= bits;
    }

    pub fn set_active(&self, slot: u32) {
        self.poke(IspRegs::ctx_active().offset(), slot);
    }

    /// The hardware starts consuming `slot` right after CTX_ACTIVE is next
    /// read, as if a frame boundary fell between slot selection and commit.
    pub fn activate_after_next_read(&self, slot: u32) {
        self.inner().next_active = Some(slot);
    }

    pub fn set_idle(&self, idle: bool) {
        self.poke(IspRegs::idle_status().offset(), u32::from(idle));
    }

    pub fn writes(&self) -> Vec<WriteRecord> {
        self.inner().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.inner().writes.clear();
    }

    /// Main-space writes to `offset`, oldest first.
    pub fn writes_to(&self, offset: u32) -> Vec<WriteRecord> {
        self.inner()
            .writes
            .iter()
            .filter(|w| w.space == RegSpace::Main && w.offset == offset)
            .copied()
            .collect()
    }

    pub fn last_write_to(&self, offset: u32) -> Option<u32> {
        self.writes_to(offset).last().map(|w| w.value)
    }

    /// How often the main-space register at `offset` was read.
    pub fn reads_of(&self, offset: u32) -> usize {
        self.inner()
            .reads
            .get(&(RegSpace::Main, offset))
            .copied()
            .unwrap_or(0)
    }

    pub fn bias_writes(&self) -> Vec<WriteRecord> {
        self.inner()
            .writes
            .iter()
            .filter(|w| w.space == RegSpace::Bias)
            .copied()
            .collect()
    }
}

impl RegisterAccess for MockRegisters {
    fn read32(&self, space: RegSpace, offset: u32) -> u32 {
        let mut inner = self.inner();
        *inner.reads.entry((space, offset)).or_insert(0) += 1;
        let value = inner.regs.get(&(space, offset)).copied().unwrap_or(0);
        if space == RegSpace::Main && offset == IspRegs::ctx_active().offset() {
            if let Some(next) = inner.next_active.take() {
                inner.regs.insert((space, offset), next);
            }
        }
        value
    }

    fn write32(&self, space: RegSpace, offset: u32, value: u32) {
        let mut inner = self.inner();
        let slot = inner.selected;
        inner.writes.push(WriteRecord {
            space,
            offset,
            value,
            slot,
        });
        if space != RegSpace::Main {
            inner.regs.insert((space, offset), value);
            return;
        }
        if offset == IspRegs::irq_status().offset() {
            let reg = inner.regs.entry((space, offset)).or_insert(0);
            *reg &= !value;
        } else if offset == IspRegs::ctx_select().offset() {
            inner.selected = value & 0x7;
        } else if offset == IspRegs::ctx_active().offset() || offset == IspRegs::idle_status().offset() {
            // Read-only.
        } else {
            inner.regs.insert((space, offset), value);
        }
    }

    fn has_bias(&self) -> bool {
        self.bias
    }
}

// ============================================================================
// Group and allocator
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start(u32),
    Done {
        instance: u32,
        fcount: u32,
        buf_index: u8,
        output: OutputId,
        result: ShotResult,
        get_meta: bool,
    },
}

#[derive(Default)]
pub struct RecordingGroup {
    events: Mutex<Vec<Event>>,
}

impl RecordingGroup {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn done(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, Event::Done { .. }))
            .collect()
    }

    pub fn done_fcounts(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Done { fcount, .. } => Some(fcount),
                Event::Start(_) => None,
            })
            .collect()
    }

    pub fn starts(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Start(_)))
            .count()
    }
}

impl GroupCallbacks for RecordingGroup {
    fn frame_start(&self, instance: u32) {
        self.events.lock().unwrap().push(Event::Start(instance));
    }

    fn frame_done(
        &self,
        instance: u32,
        frame: &FrameRecord,
        output: OutputId,
        result: ShotResult,
        get_meta: bool,
    ) {
        self.events.lock().unwrap().push(Event::Done {
            instance,
            fcount: frame.fcount,
            buf_index: frame.cur_buf_index,
            output,
            result,
            get_meta,
        });
    }
}

/// Bump allocator that can be told to fail.
pub struct TestAllocator {
    next: Mutex<u64>,
    live: Mutex<HashMap<u64, usize>>,
    fail_after: Option<usize>,
    allocs: AtomicUsize,
}

impl TestAllocator {
    pub fn new() -> Self {
        Self {
            next: Mutex::new(0x8000_0000),
            live: Mutex::new(HashMap::new()),
            fail_after: None,
            allocs: AtomicUsize::new(0),
        }
    }

    /// Fail every allocation after the first `n`.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::new()
        }
    }

    pub fn live(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn live_addrs(&self) -> Vec<u64> {
        let mut addrs: Vec<u64> = self.live.lock().unwrap().keys().copied().collect();
        addrs.sort_unstable();
        addrs
    }
}

impl BufferAllocator for TestAllocator {
    fn alloc(&self, bytes: usize) -> Result<u64, AllocError> {
        let n = self.allocs.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| n >= limit) {
            return Err(AllocError { bytes });
        }
        let mut next = self.next.lock().unwrap();
        let dva = *next;
        *next += (bytes as u64).next_multiple_of(0x1000);
        self.live.lock().unwrap().insert(dva, bytes);
        Ok(dva)
    }

    fn free(&self, dva: u64, bytes: usize) -> Result<(), AllocError> {
        match self.live.lock().unwrap().remove(&dva) {
            Some(b) if b == bytes => Ok(()),
            _ => Err(AllocError { bytes }),
        }
    }
}

// ============================================================================
// Rig
// ============================================================================

pub type TestIp = HwIp<RegisterDdk<MockRegisters>>;

pub struct Rig {
    pub ip: Arc<TestIp>,
    pub regs: MockRegisters,
    pub group: Arc<RecordingGroup>,
    pub alloc: Arc<TestAllocator>,
    pub shared: Arc<SharedBlock>,
}

impl Rig {
    /// An LME instance.
    pub fn new(gen: &'static HwGeneration) -> Self {
        Self::block(&LME, gen)
    }

    pub fn block(spec: &'static BlockSpec, gen: &'static HwGeneration) -> Self {
        Self::build(0, spec, gen, TestAllocator::new(), Arc::default())
    }

    pub fn with_alloc(gen: &'static HwGeneration, alloc: TestAllocator) -> Self {
        Self::build(0, &LME, gen, alloc, Arc::default())
    }

    pub fn with_shared(gen: &'static HwGeneration, shared: Arc<SharedBlock>) -> Self {
        Self::build(0, &LME, gen, TestAllocator::new(), shared)
    }

    /// A second instance on the same physical block as `self`.
    pub fn sibling(&self, instance: u32) -> Self {
        let gen = self.ip.generation();
        let group = Arc::new(RecordingGroup::default());
        let alloc = Arc::new(TestAllocator::new());
        let hw = Arc::new(RegisterDdk::new(self.regs.clone(), gen));
        let ip = HwIp::new(
            instance,
            self.ip.spec(),
            gen,
            HwIpDeps {
                hw,
                alloc: alloc.clone(),
                group: group.clone(),
                shared: self.shared.clone(),
            },
        );
        Self {
            ip: Arc::new(ip),
            regs: self.regs.clone(),
            group,
            alloc,
            shared: self.shared.clone(),
        }
    }

    fn build(
        instance: u32,
        spec: &'static BlockSpec,
        gen: &'static HwGeneration,
        alloc: TestAllocator,
        shared: Arc<SharedBlock>,
    ) -> Self {
        init_logger();
        let regs = MockRegisters::new(gen.has_bias);
        let group = Arc::new(RecordingGroup::default());
        let alloc = Arc::new(alloc);
        let hw = Arc::new(RegisterDdk::new(regs.clone(), gen));
        let ip = HwIp::new(
            instance,
            spec,
            gen,
            HwIpDeps {
                hw,
                alloc: alloc.clone(),
                group: group.clone(),
                shared: shared.clone(),
            },
        );
        Self {
            ip: Arc::new(ip),
            regs,
            group,
            alloc,
            shared,
        }
    }

    pub fn map(&self) -> HwMap {
        HwMap::empty().with(self.ip.spec().hw_id)
    }

    /// Open, init and enable.
    pub fn start(&self) {
        self.ip.open().unwrap();
        self.ip.init(false, 0).unwrap();
        self.ip.enable(self.map()).unwrap();
    }

    /// `start` plus the default stream parameters.
    pub fn start_streaming(&self) {
        self.start();
        self.ip.set_param(&stream_params(), self.map()).unwrap();
    }

    pub fn shot(&self, fcount: u32) {
        self.ip.shot(frame(fcount), self.map()).unwrap();
    }

    /// Latch `bits` and run the interrupt handler.
    pub fn fire(&self, bits: u32) -> usize {
        self.regs.raise(bits);
        self.ip.handle_irq()
    }
}

/// A full-frame LME configuration: both inputs, both external outputs.
pub fn stream_params() -> ParamSet {
    let (mw, mh) = (WIDTH / 16, HEIGHT / 16);
    ParamSet::new()
        .with(lme::CUR_IN, ChannelParam::enabled(WIDTH, HEIGHT))
        .with(lme::PREV_IN, ChannelParam::enabled(WIDTH, HEIGHT))
        .with(lme::MV_OUT, ChannelParam::enabled(mw, mh).with_crop(Rect::full(mw, mh)))
        .with(lme::SAD_OUT, ChannelParam::enabled(mw, mh))
}

pub fn frame(fcount: u32) -> FrameRecord {
    let base = u64::from(fcount) << 24;
    FrameRecord::new(fcount)
        .with_dva(lme::CUR_IN, 0, &[0x1_0000_0000 + base])
        .with_dva(lme::PREV_IN, 0, &[0x2_0000_0000 + base])
        .with_dva(lme::MV_OUT, 0, &[0x3_0000_0000 + base])
        .with_dva(lme::SAD_OUT, 0, &[0x4_0000_0000 + base])
}
