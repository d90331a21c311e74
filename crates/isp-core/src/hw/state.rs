//! Lifecycle state of one block instance.
//!
//! The base lifecycle is a single [`Phase`], so "running without being
//! initialized" cannot be expressed. Configuration, suspension and recovery
//! are orthogonal flags on top of it.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Closed,
    Open,
    Initialized,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Open,
    Init,
    Deinit,
    Enable,
    /// A register set was committed.
    Configure,
    Disable,
    Close,
    /// `frame_valid`: a frame is currently between start and end.
    Suspend { frame_valid: bool },
    /// The in-flight frame ended while suspending.
    FrameEnded,
    Resume,
}

/// A transition not allowed from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{transition:?} not allowed in {from}")]
pub struct InvalidTransition {
    pub from: StateFlags,
    pub transition: Transition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HwState {
    phase: Phase,
    configured: bool,
    suspending: bool,
    suspended: bool,
}

impl HwState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != Phase::Closed
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.phase, Phase::Initialized | Phase::Running)
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn is_suspending(&self) -> bool {
        self.suspending
    }

    pub fn apply(self, transition: Transition) -> Result<Self, InvalidTransition> {
        let reject = Err(InvalidTransition {
            from: self.flags(),
            transition,
        });
        let next = match (self.phase, transition) {
            (Phase::Closed, Transition::Open) => Self {
                phase: Phase::Open,
                ..Self::default()
            },
            (_, Transition::Open) => self,

            (Phase::Open, Transition::Init) => Self {
                phase: Phase::Initialized,
                ..self
            },
            (Phase::Initialized | Phase::Running, Transition::Init) => self,

            (Phase::Initialized, Transition::Deinit) => Self {
                phase: Phase::Open,
                configured: false,
                ..self
            },

            (Phase::Initialized | Phase::Running, Transition::Enable) => Self {
                phase: Phase::Running,
                ..self
            },

            (Phase::Initialized | Phase::Running, Transition::Configure) => Self {
                configured: true,
                ..self
            },

            (Phase::Initialized | Phase::Running, Transition::Disable) => Self {
                phase: Phase::Initialized,
                configured: false,
                suspending: false,
                suspended: false,
            },

            (_, Transition::Close) => Self::default(),

            (_, Transition::Suspend { frame_valid }) if self.configured => Self {
                suspending: frame_valid,
                suspended: !frame_valid,
                ..self
            },

            (_, Transition::FrameEnded) if self.suspending => Self {
                suspending: false,
                suspended: true,
                ..self
            },
            (_, Transition::FrameEnded) => self,

            (_, Transition::Resume) => Self {
                suspending: false,
                suspended: false,
                ..self
            },

            _ => return reject,
        };
        Ok(next)
    }

    pub fn flags(&self) -> StateFlags {
        let mut bits = 0;
        if self.is_open() {
            bits |= StateFlags::OPEN.0;
        }
        if self.is_initialized() {
            bits |= StateFlags::INIT.0;
        }
        if self.is_running() {
            bits |= StateFlags::RUN.0;
        }
        if self.configured {
            bits |= StateFlags::CONFIG.0;
        }
        if self.suspending {
            bits |= StateFlags::SUSPENDING.0;
        }
        if self.suspended {
            bits |= StateFlags::SUSPEND.0;
        }
        StateFlags(bits)
    }
}

/// Flat flag view of [`HwState`], for logs and error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateFlags(u8);

impl StateFlags {
    pub const OPEN: Self = Self(1 << 0);
    pub const INIT: Self = Self(1 << 1);
    pub const CONFIG: Self = Self(1 << 2);
    pub const RUN: Self = Self(1 << 3);
    pub const SUSPENDING: Self = Self(1 << 4);
    pub const SUSPEND: Self = Self(1 << 5);
    /// The hardware-wide recovery flag was set when the view was taken.
    pub const OVERFLOW_RECOVERY: Self = Self(1 << 6);

    const NAMES: [(Self, &'static str); 7] = [
        (Self::OPEN, "OPEN"),
        (Self::INIT, "INIT"),
        (Self::CONFIG, "CONFIG"),
        (Self::RUN, "RUN"),
        (Self::SUSPENDING, "SUSPENDING"),
        (Self::SUSPEND, "SUSPEND"),
        (Self::OVERFLOW_RECOVERY, "OVERFLOW_RECOVERY"),
    ];

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl fmt::Display for StateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("CLOSED");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
