//! Core runtime for UltraDrawer
//!
//! Everything here runs on the UI thread. The runtime owns the per-frame
//! callback queue that drives animations, and the listener plumbing the
//! drawer crates use to broadcast events without owning their observers.

mod float;
mod frame_clock;
mod listener_set;
mod platform;
mod runtime;

pub use float::{ApproxOrd, ClosedRange};
pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use listener_set::{ListenerSet, Notifier};
pub use platform::{Clock, StdClock};
pub use runtime::{FrameCallbackId, RuntimeHandle};

#[cfg(feature = "std-hash")]
pub mod collections {
    pub use std::collections::{HashMap, HashSet};
}

#[cfg(not(feature = "std-hash"))]
pub mod collections {
    pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
}

/// Nominal frame interval of a 60 Hz display.
pub const FRAME_INTERVAL_NANOS: u64 = 16_666_667;
