//! Shared hardware-block machinery: lifecycle state, frame bookkeeping,
//! interrupt dispatch and recovery.

pub mod completion;
pub mod frame;
pub mod ip;
pub mod irq;
pub mod recovery;
pub mod state;
