//! Platform clock abstraction.
//!
//! Hosts whose display callback already carries a timestamp feed it straight
//! into [`RuntimeHandle::drain_frame_callbacks`](crate::RuntimeHandle). Hosts
//! without one stamp frames with a [`Clock`].

use web_time::Instant;

/// Provides timing information for the runtime.
pub trait Clock {
    /// Instant type produced by this clock implementation.
    type Instant: Copy;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of nanoseconds elapsed since `since`.
    fn elapsed_nanos(&self, since: Self::Instant) -> u64;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64 {
        self.elapsed_nanos(since) / 1_000_000
    }
}

/// Monotonic clock backed by `web_time::Instant`, which also works on wasm.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed_nanos(&self, since: Instant) -> u64 {
        u64::try_from(since.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}
