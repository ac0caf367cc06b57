//! Drawer with discrete states on top of the snapping engine.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use ultradrawer_animation::{AnimationParameters, SpringAnimation};
use ultradrawer_core::collections::HashSet;
use ultradrawer_core::{FrameClock, Notifier};
use ultradrawer_foundation::gesture_constants::FADE_DISTANCE;
use ultradrawer_foundation::{
    Completion, DrawerContent, DrawerContentListener, OriginChangeSource, PanGesture,
    SnappingView, SnappingViewListener,
};
use ultradrawer_ui_graphics::{CornerRadii, EdgeInsets, Point, Size};

use crate::position::{DrawerState, PositionDependencies, ReferencePoint, RelativePosition};

/// Observer of a [`DrawerView`]. Every method defaults to a no-op.
pub trait DrawerViewListener {
    fn will_begin_updating_origin(&self, _origin: f32, _source: OriginChangeSource) {}

    fn did_update_origin(&self, _origin: f32, _source: OriginChangeSource) {}

    fn did_end_updating_origin(&self, _origin: f32, _source: OriginChangeSource) {}

    fn did_change_state(&self, _state: Option<DrawerState>) {}

    /// `state` is the state whose anchor the animation targets, if any.
    /// Retarget the move through `animation`.
    fn will_begin_animation_to_state(
        &self,
        _state: Option<DrawerState>,
        _animation: &SpringAnimation,
        _source: OriginChangeSource,
    ) {
    }
}

struct AnimationSession {
    animation: SpringAnimation,
    target_state: Option<DrawerState>,
}

struct DrawerConfig {
    top_position: RelativePosition,
    middle_position: RelativePosition,
    bottom_position: RelativePosition,
    available_states: HashSet<DrawerState>,
    state: Option<DrawerState>,
    corner_radius: f32,
    should_fade_in_bottom_state: bool,
    bounds: Size,
    header_height: f32,
    safe_area_insets: EdgeInsets,
    content_alpha: f32,
    animation_session: Option<AnimationSession>,
}

impl DrawerConfig {
    fn dependencies(&self) -> PositionDependencies {
        PositionDependencies::new(
            self.bounds.height,
            self.header_height,
            self.safe_area_insets,
        )
    }

    fn available_in_order(&self) -> SmallVec<[DrawerState; 4]> {
        DrawerState::ALL
            .into_iter()
            .filter(|state| self.available_states.contains(state))
            .collect()
    }
}

struct DrawerInner {
    snapping: SnappingView,
    config: RefCell<DrawerConfig>,
    listeners: Notifier<dyn DrawerViewListener>,
}

/// Bottom sheet with top, middle, bottom and dismissed states.
///
/// Positions are declared with [`RelativePosition`] and resolved against the
/// layout inputs whenever they change. The drawer keeps its discrete
/// [`state`](Self::state) in sync with the engine: a drag that comes to rest
/// on a state's anchor selects that state.
#[derive(Clone)]
pub struct DrawerView {
    inner: Rc<DrawerInner>,
}

impl DrawerView {
    pub fn new(content: Rc<dyn DrawerContent>, clock: FrameClock) -> Self {
        let snapping = SnappingView::new(Rc::clone(&content), clock);
        let mut available_states = HashSet::default();
        available_states.extend([DrawerState::Top, DrawerState::Middle, DrawerState::Bottom]);
        let inner = Rc::new(DrawerInner {
            snapping,
            config: RefCell::new(DrawerConfig {
                top_position: RelativePosition::from_top(0.0),
                middle_position: RelativePosition::from_bottom(0.0)
                    .relative_to(ReferencePoint::ContentOrigin),
                bottom_position: RelativePosition::from_bottom(0.0)
                    .relative_to(ReferencePoint::ContentOrigin),
                available_states,
                state: None,
                corner_radius: 0.0,
                should_fade_in_bottom_state: true,
                bounds: Size::ZERO,
                header_height: 0.0,
                safe_area_insets: EdgeInsets::ZERO,
                content_alpha: 1.0,
                animation_session: None,
            }),
            listeners: Notifier::new(),
        });
        inner.snapping.add_listener(&inner);
        let weak: Weak<dyn DrawerContentListener> = Rc::downgrade(&inner) as Weak<_>;
        content.add_listener(weak);
        inner.update_anchors();
        Self { inner }
    }

    pub fn snapping_view(&self) -> &SnappingView {
        &self.inner.snapping
    }

    pub fn content(&self) -> &Rc<dyn DrawerContent> {
        self.inner.snapping.content()
    }

    pub fn origin(&self) -> f32 {
        self.inner.snapping.origin()
    }

    pub fn state(&self) -> Option<DrawerState> {
        self.inner.config.borrow().state
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.snapping.is_dragging()
    }

    pub fn top_position(&self) -> RelativePosition {
        self.inner.config.borrow().top_position
    }

    pub fn set_top_position(&self, position: RelativePosition) {
        self.inner.config.borrow_mut().top_position = position;
        self.inner.update_anchors();
    }

    pub fn middle_position(&self) -> RelativePosition {
        self.inner.config.borrow().middle_position
    }

    pub fn set_middle_position(&self, position: RelativePosition) {
        self.inner.config.borrow_mut().middle_position = position;
        self.inner.update_anchors();
    }

    pub fn bottom_position(&self) -> RelativePosition {
        self.inner.config.borrow().bottom_position
    }

    pub fn set_bottom_position(&self, position: RelativePosition) {
        self.inner.config.borrow_mut().bottom_position = position;
        self.inner.update_anchors();
    }

    /// In top-to-bottom order.
    pub fn available_states(&self) -> Vec<DrawerState> {
        self.inner.config.borrow().available_in_order().into_vec()
    }

    /// A current state that is no longer available becomes `None`.
    pub fn set_available_states(&self, states: impl IntoIterator<Item = DrawerState>) {
        let dropped_state = {
            let mut config = self.inner.config.borrow_mut();
            config.available_states = states.into_iter().collect();
            config
                .state
                .is_some_and(|state| !config.available_states.contains(&state))
        };
        if dropped_state {
            self.inner.set_state_value(None);
        }
        self.inner.update_anchors();
    }

    pub fn bounces(&self) -> bool {
        self.inner.snapping.bounces()
    }

    pub fn set_bounces(&self, bounces: bool) {
        self.inner.snapping.set_bounces(bounces);
    }

    pub fn animation_parameters(&self) -> AnimationParameters {
        self.inner.snapping.animation_parameters()
    }

    pub fn set_animation_parameters(&self, parameters: AnimationParameters) {
        self.inner.snapping.set_animation_parameters(parameters);
    }

    pub fn set_display_scale(&self, scale: f32) {
        self.inner.snapping.set_display_scale(scale);
    }

    pub fn corner_radius(&self) -> f32 {
        self.inner.config.borrow().corner_radius
    }

    /// Non-positive values remove the rounding.
    pub fn set_corner_radius(&self, radius: f32) {
        self.inner.config.borrow_mut().corner_radius = radius.max(0.0);
    }

    /// Radii to mask the drawer container with. Only the top corners round.
    pub fn corner_radii(&self) -> CornerRadii {
        let radius = self.inner.config.borrow().corner_radius;
        if radius > 0.0 {
            CornerRadii::top(radius)
        } else {
            CornerRadii::default()
        }
    }

    pub fn should_fade_in_bottom_state(&self) -> bool {
        self.inner.config.borrow().should_fade_in_bottom_state
    }

    pub fn set_should_fade_in_bottom_state(&self, fade: bool) {
        self.inner.config.borrow_mut().should_fade_in_bottom_state = fade;
        self.inner.update_content_visibility();
    }

    /// Opacity for the hosted content, in `[0, 1]`.
    pub fn content_alpha(&self) -> f32 {
        self.inner.config.borrow().content_alpha
    }

    pub fn bounds(&self) -> Size {
        self.inner.config.borrow().bounds
    }

    /// Resizes the drawer and lays it out again.
    pub fn set_bounds(&self, bounds: Size) {
        {
            let mut config = self.inner.config.borrow_mut();
            if config.bounds == bounds {
                return;
            }
            config.bounds = bounds;
        }
        self.inner.snapping.set_bounds(bounds);
        self.inner.layout();
    }

    pub fn header_height(&self) -> f32 {
        self.inner.config.borrow().header_height
    }

    /// Lays the drawer out again for a new header height.
    pub fn set_header_height(&self, height: f32) {
        {
            let mut config = self.inner.config.borrow_mut();
            if config.header_height == height {
                return;
            }
            config.header_height = height;
        }
        self.inner.layout();
    }

    pub fn safe_area_insets(&self) -> EdgeInsets {
        self.inner.config.borrow().safe_area_insets
    }

    /// Updates the anchors and keeps a bottom drawer pinned to its new anchor.
    pub fn set_safe_area_insets(&self, insets: EdgeInsets) {
        {
            let mut config = self.inner.config.borrow_mut();
            if config.safe_area_insets == insets {
                return;
            }
            config.safe_area_insets = insets;
        }
        self.inner.update_anchors();
        if self.state() == Some(DrawerState::Bottom) {
            self.set_state(DrawerState::Bottom, false, None);
        }
        self.inner.update_content_visibility();
    }

    /// Recomputes anchors and follows the current state to its new origin.
    pub fn layout(&self) {
        self.inner.layout();
    }

    /// Moves to `state`. Unavailable states are ignored and `completion` is
    /// dropped without being called.
    pub fn set_state(&self, state: DrawerState, animated: bool, completion: Option<Completion>) {
        self.inner.set_state(state, animated, completion);
    }

    /// Origin of `state` under the current layout.
    pub fn origin_for(&self, state: DrawerState) -> f32 {
        self.inner.origin_for(state)
    }

    /// Origin of `state` under explicit layout measurements, for callers that
    /// need it before the drawer is laid out.
    pub fn target_origin_for(
        &self,
        state: DrawerState,
        dependencies: &PositionDependencies,
    ) -> f32 {
        self.inner.target_origin_for(state, dependencies)
    }

    pub fn handle_header_pan(&self, gesture: PanGesture) {
        self.inner.snapping.handle_header_pan(gesture);
    }

    pub fn point_inside(&self, point: Point) -> bool {
        self.inner.snapping.point_inside(point)
    }

    pub fn add_listener<L: DrawerViewListener + 'static>(&self, listener: &Rc<L>) {
        let weak: Weak<dyn DrawerViewListener> = Rc::downgrade(listener) as Weak<_>;
        self.inner.listeners.subscribe(weak);
    }

    pub fn remove_listener<L: DrawerViewListener + 'static>(&self, listener: &Rc<L>) {
        let weak: Weak<dyn DrawerViewListener> = Rc::downgrade(listener) as Weak<_>;
        self.inner.listeners.unsubscribe(&weak);
    }
}

impl std::fmt::Debug for DrawerView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawerView")
            .field("origin", &self.origin())
            .field("state", &self.state())
            .field("snapping", &self.inner.snapping)
            .finish()
    }
}

impl DrawerInner {
    fn content_height(&self) -> f32 {
        let content = self.snapping.content();
        let inset = content.content_inset();
        content.content_size().height + inset.top + inset.bottom
    }

    fn target_origin_for(&self, state: DrawerState, dependencies: &PositionDependencies) -> f32 {
        let position = {
            let config = self.config.borrow();
            match state {
                DrawerState::Top => config.top_position,
                DrawerState::Middle => config.middle_position,
                DrawerState::Bottom => config.bottom_position,
                DrawerState::Dismissed => return dependencies.bounds_height,
            }
        };
        position.origin(dependencies, self.content_height())
    }

    fn origin_for(&self, state: DrawerState) -> f32 {
        let dependencies = self.config.borrow().dependencies();
        self.target_origin_for(state, &dependencies)
    }

    fn available_anchors(&self) -> SmallVec<[(DrawerState, f32); 4]> {
        let states = self.config.borrow().available_in_order();
        states
            .into_iter()
            .map(|state| (state, self.origin_for(state)))
            .collect()
    }

    /// First state, top to bottom by anchor, within one device pixel.
    fn state_for_origin(&self, origin: f32) -> Option<DrawerState> {
        let eps = self.snapping.origin_eps();
        let mut anchors = self.available_anchors();
        anchors.sort_by(|a, b| a.1.total_cmp(&b.1));
        anchors
            .into_iter()
            .find(|(_, anchor)| (anchor - origin).abs() < eps)
            .map(|(state, _)| state)
    }

    fn update_anchors(&self) {
        let anchors = self
            .available_anchors()
            .into_iter()
            .map(|(_, anchor)| anchor)
            .collect();
        self.snapping.set_anchors(anchors);
    }

    fn set_state_value(&self, state: Option<DrawerState>) {
        let changed = {
            let mut config = self.config.borrow_mut();
            let changed = config.state != state;
            config.state = state;
            changed
        };
        if changed {
            log::debug!("drawer state -> {state:?}");
            self.listeners
                .for_each(|listener| listener.did_change_state(state));
        }
    }

    fn set_state(&self, state: DrawerState, animated: bool, completion: Option<Completion>) {
        if !self.config.borrow().available_states.contains(&state) {
            log::debug!("ignoring unavailable drawer state {state:?}");
            return;
        }
        self.set_state_value(Some(state));
        let origin = self.origin_for(state);
        self.snapping.scroll_to(origin, animated, completion);
    }

    fn layout(&self) {
        self.update_anchors();
        let (redirect, state) = {
            let config = self.config.borrow();
            let redirect = config.animation_session.as_ref().and_then(|session| {
                session
                    .target_state
                    .map(|target| (session.animation.clone(), target))
            });
            (redirect, config.state)
        };
        if let Some((animation, target)) = redirect {
            animation.set_target_origin(self.origin_for(target));
        } else if let Some(state) = state {
            if !self.snapping.is_dragging() {
                self.set_state(state, false, None);
            }
        }
    }

    fn update_content_visibility(&self) {
        let (fade, safe_bottom) = {
            let config = self.config.borrow();
            (
                config.should_fade_in_bottom_state,
                config.safe_area_insets.bottom,
            )
        };
        let alpha = if fade && safe_bottom > 0.0 {
            let diff = self.origin_for(DrawerState::Bottom) - self.snapping.origin();
            (diff / FADE_DISTANCE).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.config.borrow_mut().content_alpha = alpha;
    }
}

impl SnappingViewListener for DrawerInner {
    fn will_begin_updating_origin(&self, origin: f32, source: OriginChangeSource) {
        self.listeners
            .for_each(|listener| listener.will_begin_updating_origin(origin, source));
    }

    fn did_update_origin(&self, origin: f32, source: OriginChangeSource) {
        self.update_content_visibility();
        self.listeners
            .for_each(|listener| listener.did_update_origin(origin, source));
    }

    fn did_end_updating_origin(&self, origin: f32, source: OriginChangeSource) {
        if source != OriginChangeSource::Program {
            if let Some(state) = self.state_for_origin(origin) {
                self.set_state_value(Some(state));
            }
        }
        let finished = self.config.borrow_mut().animation_session.take();
        drop(finished);
        self.listeners
            .for_each(|listener| listener.did_end_updating_origin(origin, source));
    }

    fn will_begin_animation(&self, animation: &SpringAnimation, source: OriginChangeSource) {
        let target_state = self.state_for_origin(animation.target_origin());
        self.config.borrow_mut().animation_session = Some(AnimationSession {
            animation: animation.clone(),
            target_state,
        });
        self.listeners.for_each(|listener| {
            listener.will_begin_animation_to_state(target_state, animation, source)
        });
    }
}

impl DrawerContentListener for DrawerInner {
    fn did_change_content_size(&self, _content: &dyn DrawerContent, _size: Size) {
        self.layout();
    }

    fn did_change_content_inset(&self, _content: &dyn DrawerContent, _inset: EdgeInsets) {
        self.layout();
    }
}

#[cfg(test)]
#[path = "tests/drawer_tests.rs"]
mod tests;
