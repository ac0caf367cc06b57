//! Frame-driven step runner.
//!
//! A [`TimerAnimation`] calls its step closure once per frame with the time
//! elapsed since it started, until the closure reports
//! [`TargetState::Finish`] or the animation is invalidated.
//!
//! An animation created after the runtime has drained a frame starts at that
//! frame, so its first tick already moves. The first step is capped at one
//! frame interval. An animation created before any frame starts at its first
//! tick with zero elapsed.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use ultradrawer_core::{FrameCallbackRegistration, FrameClock, FRAME_INTERVAL_NANOS};

/// What the step closure wants after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Continue,
    Finish,
}

type StepFn = Box<dyn FnMut(Duration) -> TargetState>;
type CompletionFn = Box<dyn FnOnce(bool)>;

struct TimerAnimationInner {
    clock: FrameClock,
    running: bool,
    previous_frame_nanos: Option<u64>,
    start_nanos: Option<u64>,
    step: Option<StepFn>,
    completion: Option<CompletionFn>,
    registration: Option<FrameCallbackRegistration>,
}

/// Handle to a running per-frame animation.
///
/// Frame callbacks hold only a weak reference, so dropping every handle stops
/// the animation silently. The completion receives `true` when the step
/// finished and `false` when [`invalidate`](Self::invalidate) cut it short.
#[derive(Clone)]
pub struct TimerAnimation {
    inner: Rc<RefCell<TimerAnimationInner>>,
}

impl TimerAnimation {
    /// Starts ticking on the next frame of `clock`.
    pub fn new(
        clock: &FrameClock,
        step: impl FnMut(Duration) -> TargetState + 'static,
        completion: impl FnOnce(bool) + 'static,
    ) -> Self {
        let inner = Rc::new(RefCell::new(TimerAnimationInner {
            clock: clock.clone(),
            running: true,
            previous_frame_nanos: clock.runtime_handle().last_frame_time_nanos(),
            start_nanos: None,
            step: Some(Box::new(step)),
            completion: Some(Box::new(completion)),
            registration: None,
        }));
        Self::schedule_frame(&inner);
        Self { inner }
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    /// Stops the animation and reports `false` to the completion.
    pub fn invalidate(&self) {
        self.stop(true);
    }

    /// Stops the animation and discards the completion unrun.
    pub fn invalidate_without_completion(&self) {
        self.stop(false);
    }

    fn stop(&self, run_completion: bool) {
        let (registration, step, completion) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.running {
                return;
            }
            inner.running = false;
            (
                inner.registration.take(),
                inner.step.take(),
                inner.completion.take(),
            )
        };
        drop(registration);
        drop(step);
        if run_completion {
            if let Some(completion) = completion {
                completion(false);
            }
        }
    }

    fn schedule_frame(this: &Rc<RefCell<TimerAnimationInner>>) {
        let clock = {
            let inner = this.borrow();
            if !inner.running || inner.registration.is_some() {
                return;
            }
            inner.clock.clone()
        };
        let weak = Rc::downgrade(this);
        let registration = clock.with_frame_nanos(move |frame_time_nanos| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, frame_time_nanos);
            }
        });
        if !registration.is_active() {
            log::warn!("frame clock refused a callback; animation will not advance");
        }
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<TimerAnimationInner>>, frame_time_nanos: u64) {
        let pending = {
            let mut inner = this.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.release();
            }
            if !inner.running {
                return;
            }
            let previous = inner.previous_frame_nanos;
            let start = *inner.start_nanos.get_or_insert_with(|| match previous {
                Some(previous) => {
                    previous.max(frame_time_nanos.saturating_sub(FRAME_INTERVAL_NANOS))
                }
                None => frame_time_nanos,
            });
            let elapsed = Duration::from_nanos(frame_time_nanos.saturating_sub(start));
            inner.step.take().map(|step| (step, elapsed))
        };
        let Some((mut step, elapsed)) = pending else {
            return;
        };

        let target = step(elapsed);

        let completion = {
            let mut inner = this.borrow_mut();
            if !inner.running {
                // Invalidated from inside the step.
                return;
            }
            match target {
                TargetState::Continue => {
                    inner.step = Some(step);
                    None
                }
                TargetState::Finish => {
                    inner.running = false;
                    Some(inner.completion.take())
                }
            }
        };

        match completion {
            None => Self::schedule_frame(this),
            Some(Some(completion)) => completion(true),
            Some(None) => {}
        }
    }
}

impl std::fmt::Debug for TimerAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TimerAnimation")
            .field("running", &inner.running)
            .field("start_nanos", &inner.start_nanos)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/timer_animation_tests.rs"]
mod tests;
