//! Frame callback registry.
//!
//! Hosts call [`RuntimeHandle::drain_frame_callbacks`] once per display
//! refresh. Callbacks are one-shot: anything that wants the following frame
//! registers again from inside its callback, and lands in the next drain.

use crate::collections::HashSet;
use crate::frame_clock::FrameClock;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub type FrameCallbackId = u64;

type FrameCallback = Box<dyn FnOnce(u64)>;

#[derive(Default)]
struct RuntimeInner {
    next_callback_id: FrameCallbackId,
    pending: SmallVec<[(FrameCallbackId, FrameCallback); 4]>,
    /// Ids cancelled while their batch was already taken out for draining.
    cancelled_in_flight: HashSet<FrameCallbackId>,
    draining: bool,
    disposed: bool,
    last_frame_time_nanos: Option<u64>,
}

/// Cheaply clonable handle to the UI-thread runtime.
#[derive(Clone, Default)]
pub struct RuntimeHandle {
    inner: Rc<RefCell<RuntimeInner>>,
}

impl fmt::Debug for RuntimeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("RuntimeHandle")
            .field("pending_callbacks", &inner.pending.len())
            .field("disposed", &inner.disposed)
            .field("last_frame_time_nanos", &inner.last_frame_time_nanos)
            .finish()
    }
}

impl RuntimeHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }

    /// Queue `callback` for the next drained frame.
    ///
    /// Returns `None` once the runtime has been disposed.
    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        let mut inner = self.inner.borrow_mut();
        if inner.disposed {
            return None;
        }
        let id = inner.next_callback_id;
        inner.next_callback_id += 1;
        inner.pending.push((id, Box::new(callback)));
        Some(id)
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            match inner.pending.iter().position(|(pending, _)| *pending == id) {
                Some(index) => Some(inner.pending.remove(index)),
                None => {
                    if inner.draining {
                        inner.cancelled_in_flight.insert(id);
                    }
                    None
                }
            }
        };
        drop(removed);
    }

    pub fn has_pending_frame_callbacks(&self) -> bool {
        !self.inner.borrow().pending.is_empty()
    }

    pub fn last_frame_time_nanos(&self) -> Option<u64> {
        self.inner.borrow().last_frame_time_nanos
    }

    /// Run every callback registered before this call with `frame_time_nanos`.
    ///
    /// Returns the number of callbacks that ran. No borrow of the runtime is
    /// held while a callback runs, so callbacks may register or cancel freely.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) -> usize {
        let batch = {
            let mut inner = self.inner.borrow_mut();
            if inner.draining {
                log::warn!("drain_frame_callbacks called re-entrantly; ignoring");
                return 0;
            }
            inner.draining = true;
            inner.last_frame_time_nanos = Some(frame_time_nanos);
            std::mem::take(&mut inner.pending)
        };

        let mut ran = 0;
        for (id, callback) in batch {
            let cancelled = self.inner.borrow_mut().cancelled_in_flight.remove(&id);
            if cancelled {
                continue;
            }
            callback(frame_time_nanos);
            ran += 1;
        }

        let mut inner = self.inner.borrow_mut();
        inner.draining = false;
        inner.cancelled_in_flight.clear();
        ran
    }

    /// Drop every pending callback and refuse new registrations.
    pub fn dispose(&self) {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            inner.disposed = true;
            std::mem::take(&mut inner.pending)
        };
        // Callbacks may own handles whose Drop touches the runtime.
        drop(pending);
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().disposed
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
