//! Anchor/origin engine.
//!
//! [`SnappingView`] owns the drawer origin. It moves it in response to header
//! pans, scroll handoff from the hosted content, and programmatic
//! [`scroll_to`](SnappingView::scroll_to) calls, and settles it onto a set of
//! anchors with a spring.
//!
//! Every logical move is bracketed by `will_begin_updating_origin` and
//! `did_end_updating_origin` (header and content drags, `scroll_to`), with
//! `did_update_origin` after each origin write in between. A move interrupted
//! by a newer one still reports its own end before the newer one starts
//! animating.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ultradrawer_animation::{AnimationParameters, DecelerationRate, SpringAnimation};
use ultradrawer_core::{ApproxOrd, ClosedRange, FrameClock, Notifier};
use ultradrawer_ui_graphics::{Point, Rect, Size};

use crate::anchors::{anchor_limits, normalize_anchors, release_target};
use crate::content::{DrawerContent, DrawerContentListener};
use crate::gesture_constants::VELOCITY_UNITS_PER_SECOND;
use crate::gestures::PanGesture;
use crate::rubber_band::rubber_band_clamp;

/// One-shot callback receiving `true` when a move reached its target.
pub type Completion = Box<dyn FnOnce(bool)>;

/// What caused an origin change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OriginChangeSource {
    Program,
    HeaderInteraction,
    ContentInteraction,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeaderState {
    Idle,
    Dragging { initial_origin: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContentState {
    Idle,
    Dragging { last_content_offset: Point },
}

/// Observer of origin changes. Every method defaults to a no-op.
pub trait SnappingViewListener {
    fn will_begin_updating_origin(&self, _origin: f32, _source: OriginChangeSource) {}

    fn did_update_origin(&self, _origin: f32, _source: OriginChangeSource) {}

    fn did_end_updating_origin(&self, _origin: f32, _source: OriginChangeSource) {}

    /// A spring session was started. Retarget it through `animation`.
    fn will_begin_animation(&self, _animation: &SpringAnimation, _source: OriginChangeSource) {}
}

#[derive(Debug)]
struct SnappingState {
    origin: f32,
    anchors: Vec<f32>,
    bounces: bool,
    animation_parameters: AnimationParameters,
    deceleration_rate: DecelerationRate,
    bounds: Size,
    display_scale: f32,
    header_state: HeaderState,
    content_state: ContentState,
    animation: Option<SpringAnimation>,
}

impl SnappingState {
    fn origin_eps(&self) -> f32 {
        1.0 / self.display_scale
    }

    fn limits(&self) -> Option<ClosedRange> {
        anchor_limits(&self.anchors)
    }

    fn is_header_interaction_enabled(&self) -> bool {
        self.anchors.len() > 1 || self.anchors.first() != Some(&self.origin)
    }

    /// Rubber band past the limits, or a hard stop with bouncing off.
    fn clamp_header_origin(&self, target: f32) -> f32 {
        let Some(limits) = self.limits() else {
            return target;
        };
        if !self.bounces {
            return limits.clamp(target);
        }
        if target < limits.lower {
            let dim = limits.lower.abs();
            limits.lower - rubber_band_clamp(limits.lower - target, dim)
        } else if target > limits.upper {
            let dim = (self.bounds.height - limits.upper).abs();
            limits.upper + rubber_band_clamp(target - limits.upper, dim)
        } else {
            target
        }
    }
}

struct SnappingInner {
    state: RefCell<SnappingState>,
    listeners: Notifier<dyn SnappingViewListener>,
    content: Rc<dyn DrawerContent>,
    clock: FrameClock,
    this: Weak<SnappingInner>,
}

/// Handle to the anchor/origin engine. Clones share one engine.
#[derive(Clone)]
pub struct SnappingView {
    inner: Rc<SnappingInner>,
}

impl SnappingView {
    /// Creates an engine at origin 0 with no anchors and subscribes it to
    /// `content`.
    pub fn new(content: Rc<dyn DrawerContent>, clock: FrameClock) -> Self {
        let inner = Rc::new_cyclic(|this| SnappingInner {
            state: RefCell::new(SnappingState {
                origin: 0.0,
                anchors: Vec::new(),
                bounces: true,
                animation_parameters: AnimationParameters::default(),
                deceleration_rate: DecelerationRate::FAST,
                bounds: Size::ZERO,
                display_scale: 1.0,
                header_state: HeaderState::Idle,
                content_state: ContentState::Idle,
                animation: None,
            }),
            listeners: Notifier::new(),
            content,
            clock,
            this: this.clone(),
        });
        inner.content.add_listener(inner.content_listener());
        Self { inner }
    }

    pub fn content(&self) -> &Rc<dyn DrawerContent> {
        &self.inner.content
    }

    pub fn frame_clock(&self) -> &FrameClock {
        &self.inner.clock
    }

    pub fn origin(&self) -> f32 {
        self.inner.state.borrow().origin
    }

    /// Sorted, deduplicated.
    pub fn anchors(&self) -> Vec<f32> {
        self.inner.state.borrow().anchors.clone()
    }

    /// Replaces the anchors. The origin is left where it is.
    pub fn set_anchors(&self, anchors: Vec<f32>) {
        let anchors = normalize_anchors(anchors);
        log::trace!("anchors -> {:?}", anchors);
        self.inner.state.borrow_mut().anchors = anchors;
    }

    pub fn anchor_limits(&self) -> Option<ClosedRange> {
        self.inner.state.borrow().limits()
    }

    pub fn is_dragging(&self) -> bool {
        let state = self.inner.state.borrow();
        matches!(state.header_state, HeaderState::Dragging { .. })
            || matches!(state.content_state, ContentState::Dragging { .. })
    }

    pub fn header_state(&self) -> HeaderState {
        self.inner.state.borrow().header_state
    }

    pub fn content_state(&self) -> ContentState {
        self.inner.state.borrow().content_state
    }

    pub fn bounces(&self) -> bool {
        self.inner.state.borrow().bounces
    }

    /// With bouncing off, header drags stop hard at the first and last anchor.
    pub fn set_bounces(&self, bounces: bool) {
        self.inner.state.borrow_mut().bounces = bounces;
    }

    pub fn animation_parameters(&self) -> AnimationParameters {
        self.inner.state.borrow().animation_parameters
    }

    /// Used by sessions started after the call.
    pub fn set_animation_parameters(&self, parameters: AnimationParameters) {
        self.inner.state.borrow_mut().animation_parameters = parameters;
    }

    pub fn deceleration_rate(&self) -> DecelerationRate {
        self.inner.state.borrow().deceleration_rate
    }

    pub fn set_deceleration_rate(&self, rate: DecelerationRate) {
        self.inner.state.borrow_mut().deceleration_rate = rate;
    }

    pub fn bounds(&self) -> Size {
        self.inner.state.borrow().bounds
    }

    pub fn set_bounds(&self, bounds: Size) {
        self.inner.state.borrow_mut().bounds = bounds;
    }

    pub fn display_scale(&self) -> f32 {
        self.inner.state.borrow().display_scale
    }

    /// Device pixels per point. Origins closer than one device pixel compare
    /// equal.
    pub fn set_display_scale(&self, scale: f32) {
        if !(scale.is_finite() && scale > 0.0) {
            log::debug!("ignoring display scale {scale}");
            return;
        }
        self.inner.state.borrow_mut().display_scale = scale;
    }

    pub fn origin_eps(&self) -> f32 {
        self.inner.state.borrow().origin_eps()
    }

    /// `false` only when there is a single anchor and the origin sits on it.
    pub fn is_header_interaction_enabled(&self) -> bool {
        self.inner.state.borrow().is_header_interaction_enabled()
    }

    /// The running spring session, if any.
    pub fn animation(&self) -> Option<SpringAnimation> {
        self.inner.state.borrow().animation.clone()
    }

    /// Moves the origin on behalf of the program.
    ///
    /// Without animation the origin is written at once and the move ends
    /// before this returns. With animation a spring starts from rest.
    pub fn scroll_to(&self, origin: f32, animated: bool, completion: Option<Completion>) {
        self.inner
            .notify_will_begin_updating_origin(OriginChangeSource::Program);
        self.inner
            .move_origin(origin, OriginChangeSource::Program, animated, 0.0, completion);
    }

    /// Feeds one phase of a header pan.
    pub fn handle_header_pan(&self, gesture: PanGesture) {
        self.inner.handle_header_pan(gesture);
    }

    /// Hit test against the visible part of the drawer.
    pub fn point_inside(&self, point: Point) -> bool {
        let state = self.inner.state.borrow();
        Rect::new(
            0.0,
            state.origin,
            state.bounds.width,
            state.bounds.height - state.origin,
        )
        .contains(point)
    }

    /// Subscribes without taking ownership of `listener`.
    pub fn add_listener<L: SnappingViewListener + 'static>(&self, listener: &Rc<L>) {
        let weak: Weak<dyn SnappingViewListener> = Rc::downgrade(listener) as Weak<_>;
        self.inner.listeners.subscribe(weak);
    }

    pub fn remove_listener<L: SnappingViewListener + 'static>(&self, listener: &Rc<L>) {
        let weak: Weak<dyn SnappingViewListener> = Rc::downgrade(listener) as Weak<_>;
        self.inner.listeners.unsubscribe(&weak);
    }

    pub fn ptr_eq(&self, other: &SnappingView) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for SnappingView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("SnappingView")
            .field("origin", &state.origin)
            .field("anchors", &state.anchors)
            .field("header_state", &state.header_state)
            .field("content_state", &state.content_state)
            .field("animating", &state.animation.is_some())
            .finish()
    }
}

impl Drop for SnappingInner {
    fn drop(&mut self) {
        let animation = self.state.get_mut().animation.take();
        if let Some(animation) = animation {
            animation.invalidate();
        }
        self.content.remove_listener(&self.content_listener());
    }
}

impl SnappingInner {
    fn content_listener(&self) -> Weak<dyn DrawerContentListener> {
        self.this.clone() as Weak<dyn DrawerContentListener>
    }

    fn set_origin(&self, origin: f32, source: OriginChangeSource) {
        self.state.borrow_mut().origin = origin;
        log::trace!("origin -> {origin} ({source:?})");
        self.listeners
            .for_each(|listener| listener.did_update_origin(origin, source));
    }

    fn notify_will_begin_updating_origin(&self, source: OriginChangeSource) {
        let origin = self.state.borrow().origin;
        self.listeners
            .for_each(|listener| listener.will_begin_updating_origin(origin, source));
    }

    fn notify_did_end_updating_origin(&self, source: OriginChangeSource) {
        let origin = self.state.borrow().origin;
        log::debug!("origin update ended at {origin} ({source:?})");
        self.listeners
            .for_each(|listener| listener.did_end_updating_origin(origin, source));
    }

    fn stop_origin_animation(&self) {
        let animation = self.state.borrow_mut().animation.take();
        if let Some(animation) = animation {
            log::debug!("cancelling spring towards {}", animation.target_origin());
            animation.invalidate();
        }
    }

    fn end_header_drag(&self) -> bool {
        let mut state = self.state.borrow_mut();
        let was_dragging = matches!(state.header_state, HeaderState::Dragging { .. });
        state.header_state = HeaderState::Idle;
        was_dragging
    }

    fn handle_header_pan(&self, gesture: PanGesture) {
        match gesture {
            PanGesture::Began => {
                if !self.state.borrow().is_header_interaction_enabled() {
                    return;
                }
                self.stop_origin_animation();
                {
                    let mut state = self.state.borrow_mut();
                    state.header_state = HeaderState::Dragging {
                        initial_origin: state.origin,
                    };
                }
                log::debug!("header drag began");
                self.notify_will_begin_updating_origin(OriginChangeSource::HeaderInteraction);
            }
            PanGesture::Changed { translation_y } => {
                let origin = {
                    let state = self.state.borrow();
                    match state.header_state {
                        HeaderState::Dragging { initial_origin } => {
                            Some(state.clamp_header_origin(initial_origin + translation_y))
                        }
                        HeaderState::Idle => None,
                    }
                };
                if let Some(origin) = origin {
                    self.set_origin(origin, OriginChangeSource::HeaderInteraction);
                }
            }
            PanGesture::Ended { velocity_y } => {
                if !self.end_header_drag() {
                    return;
                }
                let velocity = velocity_y / VELOCITY_UNITS_PER_SECOND;
                log::debug!("header drag ended, v={velocity} pt/ms");
                self.move_to_nearest_anchor(velocity, OriginChangeSource::HeaderInteraction);
            }
            PanGesture::Cancelled | PanGesture::Failed => {
                if !self.end_header_drag() {
                    return;
                }
                log::debug!("header drag {gesture:?}");
                self.notify_did_end_updating_origin(OriginChangeSource::HeaderInteraction);
            }
        }
    }

    fn move_to_nearest_anchor(&self, velocity: f32, source: OriginChangeSource) {
        let (target, origin, eps) = {
            let state = self.state.borrow();
            (
                release_target(
                    &state.anchors,
                    state.origin,
                    velocity,
                    state.deceleration_rate,
                    state.origin_eps(),
                ),
                state.origin,
                state.origin_eps(),
            )
        };
        let Some(target) = target else {
            self.notify_did_end_updating_origin(source);
            return;
        };
        if origin.is_equal_to(target, eps) {
            self.notify_did_end_updating_origin(source);
            return;
        }
        self.move_origin(target, source, true, velocity, None);
    }

    fn move_origin(
        &self,
        target: f32,
        source: OriginChangeSource,
        animated: bool,
        velocity: f32,
        completion: Option<Completion>,
    ) {
        self.stop_origin_animation();

        if !animated {
            self.set_origin(target, source);
            self.notify_did_end_updating_origin(source);
            if let Some(completion) = completion {
                completion(true);
            }
            return;
        }

        let (origin, parameters) = {
            let state = self.state.borrow();
            (state.origin, state.animation_parameters)
        };
        log::debug!("spring {origin} -> {target} v={velocity} ({source:?})");

        let on_update = self.this.clone();
        let on_complete = self.this.clone();
        let animation = SpringAnimation::new(
            &self.clock,
            origin,
            target,
            velocity,
            parameters,
            move |value| {
                if let Some(inner) = on_update.upgrade() {
                    inner.set_origin(value, source);
                }
            },
            move |finished| {
                if let Some(inner) = on_complete.upgrade() {
                    inner.finish_animation(source);
                }
                if let Some(completion) = completion {
                    completion(finished);
                }
            },
        );

        self.state.borrow_mut().animation = Some(animation.clone());
        self.listeners
            .for_each(|listener| listener.will_begin_animation(&animation, source));
    }

    fn finish_animation(&self, source: OriginChangeSource) {
        let finished = {
            let mut state = self.state.borrow_mut();
            if state.animation.as_ref().is_some_and(SpringAnimation::is_done) {
                state.animation.take()
            } else {
                None
            }
        };
        drop(finished);
        self.notify_did_end_updating_origin(source);
    }
}

impl DrawerContentListener for SnappingInner {
    fn did_scroll(&self, content: &dyn DrawerContent) {
        let last_content_offset = match self.state.borrow().content_state {
            ContentState::Dragging {
                last_content_offset,
            } => last_content_offset,
            ContentState::Idle => return,
        };

        self.hand_off_scroll(content, last_content_offset);

        let offset = content.content_offset();
        let mut state = self.state.borrow_mut();
        if let ContentState::Dragging { .. } = state.content_state {
            state.content_state = ContentState::Dragging {
                last_content_offset: offset,
            };
        }
    }

    fn will_begin_dragging(&self, content: &dyn DrawerContent) {
        self.state.borrow_mut().content_state = ContentState::Dragging {
            last_content_offset: content.content_offset(),
        };
        self.stop_origin_animation();
        log::debug!("content drag began");
        self.notify_will_begin_updating_origin(OriginChangeSource::ContentInteraction);
    }

    fn will_end_dragging(
        &self,
        content: &dyn DrawerContent,
        velocity: Point,
        target_offset: &mut Point,
    ) {
        let inside = {
            let mut state = self.state.borrow_mut();
            state.content_state = ContentState::Idle;
            let eps = state.origin_eps();
            state
                .limits()
                .is_some_and(|limits| limits.contains_strictly(state.origin, eps))
        };
        log::debug!("content drag ended, v={} pt/ms", velocity.y);
        if !inside {
            self.notify_did_end_updating_origin(OriginChangeSource::ContentInteraction);
            return;
        }

        *target_offset = content.content_offset();
        self.move_to_nearest_anchor(-velocity.y, OriginChangeSource::ContentInteraction);
    }
}

impl SnappingInner {
    /// Moves the drawer instead of the content while the content sits at its
    /// top and the drag pushes past it.
    fn hand_off_scroll(&self, content: &dyn DrawerContent, last_content_offset: Point) {
        let (limits, origin, eps) = {
            let state = self.state.borrow();
            if !state.is_header_interaction_enabled() {
                return;
            }
            let Some(limits) = state.limits() else {
                return;
            };
            (limits, state.origin, state.origin_eps())
        };

        let offset = content.content_offset();
        let top = -content.content_inset().top;
        let diff = last_content_offset.y - offset.y;

        let drawer_rises =
            diff < 0.0 && offset.y > top && origin.is_greater_than(limits.lower, eps);
        let drawer_falls = diff > 0.0 && offset.y < top && origin.is_less_than(limits.upper, eps);
        if !(drawer_rises || drawer_falls) {
            return;
        }

        let listener = self.content_listener();
        content.remove_listener(&listener);
        let pinned_y = if diff > 0.0 { top } else { offset.y + diff };
        content.set_content_offset(Point::new(offset.x, pinned_y));
        content.add_listener(listener);

        let new_origin = limits.clamp(origin + diff);
        log::trace!("scroll handoff diff={diff}: origin {origin} -> {new_origin}");
        self.set_origin(new_origin, OriginChangeSource::ContentInteraction);
    }
}

#[cfg(test)]
#[path = "tests/snapping_tests.rs"]
mod tests;
