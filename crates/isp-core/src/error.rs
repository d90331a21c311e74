//! Error type for hardware-block operations, generic over hardware API errors.

use core::fmt;
use std::time::Duration;

use isp_hal::{AllocError, ContextSlot};

use crate::dma::param::ChannelId;
use crate::hw::state::StateFlags;

/// Coarse error taxonomy reported to the group manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Operation not valid in the current lifecycle state.
    Sequencing,
    /// Memory, queue or slot exhaustion.
    Resource,
    /// Malformed request from the caller.
    Protocol,
    Timeout,
    /// The hardware API rejected an access.
    Hardware,
}

#[derive(Debug, thiserror::Error)]
pub enum HwIpError<E: fmt::Debug> {
    /// The operation is not valid in the current state.
    #[error("{op} rejected in state {state}")]
    InvalidState { op: &'static str, state: StateFlags },

    /// The block has not been initialized for this stream.
    #[error("block not initialized")]
    NotInitialized,

    /// Internal memory could not be obtained.
    #[error("failed to allocate {what} ({bytes} bytes)")]
    Alloc { what: &'static str, bytes: usize },

    /// Too many frames in flight.
    #[error("frame queue full ({0} frames in flight)")]
    QueueFull(usize),

    /// A parameter or frame names a DMA channel the block does not have.
    #[error("unknown DMA channel {0}")]
    InvalidChannel(ChannelId),

    /// An input channel has no crop and no geometry to substitute.
    #[error("channel {0} has no crop region")]
    MissingCrop(ChannelId),

    /// The configured geometry is unusable for this block.
    #[error("invalid geometry {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },

    /// Every context slot is held by the hardware.
    #[error("no free context slot (active {active:?})")]
    SlotBusy { active: ContextSlot },

    /// The in-flight frame did not end in time.
    #[error("frame end not seen within {0:?}")]
    Timeout(Duration),

    /// The block did not report idle after reset.
    #[error("block not idle within {0:?}")]
    IdleTimeout(Duration),

    /// Hardware API error.
    #[error("hardware access failed: {0:?}")]
    Hardware(E),
}

impl<E: fmt::Debug> From<E> for HwIpError<E> {
    fn from(e: E) -> Self {
        HwIpError::Hardware(e)
    }
}

impl<E: fmt::Debug> HwIpError<E> {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidState { .. } | Self::NotInitialized => ErrorClass::Sequencing,
            Self::Alloc { .. } | Self::QueueFull(_) | Self::SlotBusy { .. } => ErrorClass::Resource,
            Self::InvalidChannel(_) | Self::MissingCrop(_) | Self::InvalidGeometry { .. } => {
                ErrorClass::Protocol
            }
            Self::Timeout(_) | Self::IdleTimeout(_) => ErrorClass::Timeout,
            Self::Hardware(_) => ErrorClass::Hardware,
        }
    }

    pub(crate) fn alloc(what: &'static str, err: AllocError) -> Self {
        Self::Alloc {
            what,
            bytes: err.bytes,
        }
    }
}
