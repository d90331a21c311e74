//! A second thread plays the interrupt context against the issuing thread.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use common::{frame, Rig, FAST_COREX};
use isp_core::hw::ip::{IRQ_FRAME_END, IRQ_FRAME_START};
use isp_core::{HwIpError, StateFlags, MAX_HW_FRAMES};

const FRAMES: u32 = 64;

fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    done()
}

#[test]
fn every_frame_retires_once_in_order() {
    let rig = Arc::new(Rig::new(&FAST_COREX));
    rig.start_streaming();
    let stop = Arc::new(AtomicBool::new(false));

    let isr = {
        let rig = rig.clone();
        let stop = stop.clone();
        thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                if rig.ip.in_flight() > 0 {
                    rig.fire(IRQ_FRAME_START | IRQ_FRAME_END);
                } else {
                    thread::yield_now();
                }
            }
        })
    };

    for fcount in 1..=FRAMES {
        loop {
            match rig.ip.shot(frame(fcount), rig.map()) {
                Ok(()) => break,
                Err(HwIpError::QueueFull(n)) => {
                    assert_eq!(n, MAX_HW_FRAMES);
                    thread::yield_now();
                }
                Err(e) => panic!("shot {fcount}: {e}"),
            }
        }
    }

    let all_done = wait_until(Duration::from_secs(5), || {
        rig.group.done_fcounts().len() == FRAMES as usize
    });
    stop.store(true, Ordering::SeqCst);
    isr.join().unwrap();

    assert!(all_done);
    assert_eq!(rig.group.done_fcounts(), (1..=FRAMES).collect::<Vec<_>>());
    let c = rig.ip.counters();
    assert!(c.frame_start >= c.frame_end);
    assert_eq!(rig.ip.in_flight(), 0);
}

#[test]
fn disable_returns_once_frame_ends() {
    let rig = Arc::new(Rig::new(&FAST_COREX));
    rig.start_streaming();
    rig.shot(1);
    rig.fire(IRQ_FRAME_START);

    let isr = {
        let rig = rig.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            rig.fire(IRQ_FRAME_END);
        })
    };

    rig.ip.disable(rig.map()).unwrap();
    isr.join().unwrap();
    assert_eq!(rig.group.done_fcounts(), vec![1]);
    assert_eq!(rig.ip.flags(), StateFlags::OPEN.union(StateFlags::INIT));
}

#[test]
fn wait_frame_done_wakes_on_frame_end() {
    let rig = Arc::new(Rig::new(&FAST_COREX));
    rig.start_streaming();
    rig.shot(1);
    rig.fire(IRQ_FRAME_START);

    let err = rig.ip.wait_frame_done(Duration::from_millis(5)).unwrap_err();
    assert!(matches!(err, HwIpError::Timeout(_)));

    let isr = {
        let rig = rig.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            rig.fire(IRQ_FRAME_END);
        })
    };
    rig.ip.wait_frame_done(Duration::from_secs(1)).unwrap();
    isr.join().unwrap();
    assert!(!rig.ip.is_frame_valid());
}

#[test]
fn register_dump_does_not_block_on_issuing_context() {
    let rig = Arc::new(Rig::new(&FAST_COREX));
    rig.start_streaming();
    rig.shot(1);

    let dumper = {
        let rig = rig.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                rig.ip.dump_regs();
            }
        })
    };
    for fcount in 2..=8 {
        rig.shot(fcount);
    }
    dumper.join().unwrap();
    assert_eq!(rig.ip.in_flight(), 8);
}
