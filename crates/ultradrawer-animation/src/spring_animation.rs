//! Retargetable spring animation of a single scalar.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use ultradrawer_core::FrameClock;

use crate::spring::{AnimationParameters, DampingTimingParameters, SpringTimingParameters};
use crate::timer_animation::{TargetState, TimerAnimation};

/// Amplitude below which a spring session is considered settled, in points.
pub const SPRING_THRESHOLD: f32 = 0.5;

type UpdateFn = Rc<dyn Fn(f32)>;
type CompletionFn = Box<dyn FnOnce(bool)>;

struct SpringAnimationInner {
    clock: FrameClock,
    parameters: AnimationParameters,
    threshold: f32,
    current_origin: f32,
    current_velocity: f32,
    target_origin: f32,
    on_update: UpdateFn,
    completion: Option<CompletionFn>,
    timer: Option<TimerAnimation>,
    done: bool,
}

/// Spring session moving an origin towards `target_origin`.
///
/// `on_update` receives every intermediate origin, then the exact target once
/// the motion settles. The completion fires exactly once: `true` after
/// settling, `false` after [`invalidate`](Self::invalidate).
///
/// Changing the target mid-flight restarts the spring from the current origin
/// and velocity, so the motion stays continuous.
#[derive(Clone)]
pub struct SpringAnimation {
    inner: Rc<RefCell<SpringAnimationInner>>,
}

impl SpringAnimation {
    /// `initial_velocity` is in points per second.
    pub fn new(
        clock: &FrameClock,
        initial_origin: f32,
        target_origin: f32,
        initial_velocity: f32,
        parameters: AnimationParameters,
        on_update: impl Fn(f32) + 'static,
        completion: impl FnOnce(bool) + 'static,
    ) -> Self {
        let inner = Rc::new(RefCell::new(SpringAnimationInner {
            clock: clock.clone(),
            parameters,
            threshold: SPRING_THRESHOLD,
            current_origin: initial_origin,
            current_velocity: initial_velocity,
            target_origin,
            on_update: Rc::new(on_update),
            completion: Some(Box::new(completion)),
            timer: None,
            done: false,
        }));
        Self::restart(&inner);
        Self { inner }
    }

    pub fn target_origin(&self) -> f32 {
        self.inner.borrow().target_origin
    }

    /// Retargets the running spring. Ignored once the session is done.
    pub fn set_target_origin(&self, target_origin: f32) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.done || inner.target_origin == target_origin {
                return;
            }
            log::debug!(
                "spring retarget {} -> {} at origin {}",
                inner.target_origin,
                target_origin,
                inner.current_origin
            );
            inner.target_origin = target_origin;
        }
        Self::restart(&self.inner);
    }

    pub fn current_origin(&self) -> f32 {
        self.inner.borrow().current_origin
    }

    /// Points per second.
    pub fn current_velocity(&self) -> f32 {
        self.inner.borrow().current_velocity
    }

    pub fn parameters(&self) -> AnimationParameters {
        self.inner.borrow().parameters
    }

    pub fn is_done(&self) -> bool {
        self.inner.borrow().done
    }

    /// Stops the session where it is and fires the completion with `false`.
    pub fn invalidate(&self) {
        let timer = {
            let mut inner = self.inner.borrow_mut();
            if inner.done {
                return;
            }
            inner.timer.take()
        };
        match timer {
            Some(timer) => timer.invalidate(),
            None => {
                let completion = {
                    let mut inner = self.inner.borrow_mut();
                    inner.done = true;
                    inner.completion.take()
                };
                if let Some(completion) = completion {
                    completion(false);
                }
            }
        }
    }

    /// Returns `true` when both handles drive the same session.
    pub fn ptr_eq(&self, other: &SpringAnimation) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn restart(this: &Rc<RefCell<SpringAnimationInner>>) {
        let (clock, timing, target, threshold, previous) = {
            let mut inner = this.borrow_mut();
            if inner.done {
                return;
            }
            let AnimationParameters::Spring(spring) = inner.parameters;
            let timing = SpringTimingParameters::new(
                spring,
                inner.current_origin - inner.target_origin,
                inner.current_velocity,
                inner.threshold,
            );
            (
                inner.clock.clone(),
                timing,
                inner.target_origin,
                inner.threshold,
                inner.timer.take(),
            )
        };
        if let Some(previous) = previous {
            previous.invalidate_without_completion();
        }
        log::trace!(
            "spring segment towards {target}, expected {:?}",
            timing.duration()
        );

        let step_session = Rc::downgrade(this);
        let finish_session = Rc::downgrade(this);
        let timer = TimerAnimation::new(
            &clock,
            move |elapsed: Duration| {
                let Some(session) = step_session.upgrade() else {
                    return TargetState::Finish;
                };
                let origin = target + timing.value(elapsed);
                let on_update = {
                    let mut inner = session.borrow_mut();
                    inner.current_origin = origin;
                    inner.current_velocity = timing.velocity(elapsed);
                    Rc::clone(&inner.on_update)
                };
                on_update(origin);
                if timing.amplitude(elapsed) < threshold {
                    TargetState::Finish
                } else {
                    TargetState::Continue
                }
            },
            move |finished| {
                let Some(session) = finish_session.upgrade() else {
                    return;
                };
                let (on_update, completion, _timer) = {
                    let mut inner = session.borrow_mut();
                    inner.done = true;
                    if finished {
                        inner.current_origin = target;
                        inner.current_velocity = 0.0;
                    }
                    (
                        Rc::clone(&inner.on_update),
                        inner.completion.take(),
                        inner.timer.take(),
                    )
                };
                if finished {
                    on_update(target);
                }
                if let Some(completion) = completion {
                    completion(finished);
                }
            },
        );

        this.borrow_mut().timer = Some(timer);
    }
}

impl std::fmt::Debug for SpringAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SpringAnimation")
            .field("current_origin", &inner.current_origin)
            .field("target_origin", &inner.target_origin)
            .field("current_velocity", &inner.current_velocity)
            .field("done", &inner.done)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/spring_animation_tests.rs"]
mod tests;
