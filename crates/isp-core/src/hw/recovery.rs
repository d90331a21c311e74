//! Frame-counter sanity checks and the reset-and-wait-idle recovery path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use isp_hal::HardwareOps;
use log::{error, info, warn};

use crate::error::HwIpError;

#[derive(Debug, Clone, Copy)]
pub struct RecoveryController {
    idle_timeout: Duration,
}

impl RecoveryController {
    pub fn new(idle_timeout: Duration) -> Self {
        Self { idle_timeout }
    }

    /// Frame-start count must never trail frame-end count. Returns `false`
    /// and logs when it does.
    pub fn check_counters(&self, name: &str, fs: u32, fe: u32) -> bool {
        if fs < fe {
            warn!("[{name}] frame start {fs} behind frame end {fe}");
            false
        } else {
            true
        }
    }

    /// Reset the block and wait for it to go idle. `in_recovery` is held
    /// for the duration so interrupts arriving meanwhile are dropped, then
    /// put back to what it was: a recovery already running elsewhere keeps
    /// its flag.
    pub fn recover<H: HardwareOps>(
        &self,
        name: &str,
        hw: &H,
        in_recovery: &AtomicBool,
    ) -> Result<(), HwIpError<H::Error>> {
        let was_recovering = in_recovery.swap(true, Ordering::SeqCst);
        let result = self.reset_and_wait(hw);
        in_recovery.store(was_recovering, Ordering::SeqCst);
        match &result {
            Ok(()) => info!("[{name}] recovered"),
            Err(e) => error!("[{name}] recovery failed: {e}"),
        }
        result
    }

    fn reset_and_wait<H: HardwareOps>(&self, hw: &H) -> Result<(), HwIpError<H::Error>> {
        hw.reset()?;
        if hw.wait_idle(self.idle_timeout)? {
            Ok(())
        } else {
            Err(HwIpError::IdleTimeout(self.idle_timeout))
        }
    }
}
