//! Listeners that record every event they receive.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ultradrawer_animation::SpringAnimation;
use ultradrawer_foundation::{OriginChangeSource, SnappingViewListener};
use ultradrawer_ui::{DrawerState, DrawerViewListener};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawerEvent {
    WillBegin {
        origin: f32,
        source: OriginChangeSource,
    },
    Update {
        origin: f32,
        source: OriginChangeSource,
    },
    End {
        origin: f32,
        source: OriginChangeSource,
    },
    StateChanged(Option<DrawerState>),
    AnimationToState {
        state: Option<DrawerState>,
        target: f32,
        source: OriginChangeSource,
    },
}

/// Records [`DrawerViewListener`] callbacks in arrival order.
///
/// With [`redirect_animations_to`](Self::redirect_animations_to) set, every
/// animation announced to it is retargeted on the spot.
#[derive(Debug, Default)]
pub struct RecordingDrawerListener {
    events: RefCell<Vec<DrawerEvent>>,
    redirect_to: Cell<Option<f32>>,
}

impl RecordingDrawerListener {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn events(&self) -> Vec<DrawerEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn redirect_animations_to(&self, target: Option<f32>) {
        self.redirect_to.set(target);
    }

    pub fn states(&self) -> Vec<Option<DrawerState>> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                DrawerEvent::StateChanged(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn ends(&self) -> Vec<(f32, OriginChangeSource)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                DrawerEvent::End { origin, source } => Some((*origin, *source)),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<f32> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                DrawerEvent::Update { origin, .. } => Some(*origin),
                _ => None,
            })
            .collect()
    }

    pub fn animation_targets(&self) -> Vec<(Option<DrawerState>, f32)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                DrawerEvent::AnimationToState { state, target, .. } => Some((*state, *target)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: DrawerEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl DrawerViewListener for RecordingDrawerListener {
    fn will_begin_updating_origin(&self, origin: f32, source: OriginChangeSource) {
        self.push(DrawerEvent::WillBegin { origin, source });
    }

    fn did_update_origin(&self, origin: f32, source: OriginChangeSource) {
        self.push(DrawerEvent::Update { origin, source });
    }

    fn did_end_updating_origin(&self, origin: f32, source: OriginChangeSource) {
        self.push(DrawerEvent::End { origin, source });
    }

    fn did_change_state(&self, state: Option<DrawerState>) {
        self.push(DrawerEvent::StateChanged(state));
    }

    fn will_begin_animation_to_state(
        &self,
        state: Option<DrawerState>,
        animation: &SpringAnimation,
        source: OriginChangeSource,
    ) {
        self.push(DrawerEvent::AnimationToState {
            state,
            target: animation.target_origin(),
            source,
        });
        if let Some(target) = self.redirect_to.get() {
            animation.set_target_origin(target);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnappingEvent {
    WillBegin(f32, OriginChangeSource),
    Update(f32, OriginChangeSource),
    End(f32, OriginChangeSource),
    Animation {
        from: f32,
        to: f32,
        source: OriginChangeSource,
    },
}

/// Records [`SnappingViewListener`] callbacks in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSnappingListener {
    events: RefCell<Vec<SnappingEvent>>,
}

impl RecordingSnappingListener {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn events(&self) -> Vec<SnappingEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn end_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, SnappingEvent::End(..)))
            .count()
    }

    pub fn begin_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, SnappingEvent::WillBegin(..)))
            .count()
    }
}

impl SnappingViewListener for RecordingSnappingListener {
    fn will_begin_updating_origin(&self, origin: f32, source: OriginChangeSource) {
        self.events
            .borrow_mut()
            .push(SnappingEvent::WillBegin(origin, source));
    }

    fn did_update_origin(&self, origin: f32, source: OriginChangeSource) {
        self.events
            .borrow_mut()
            .push(SnappingEvent::Update(origin, source));
    }

    fn did_end_updating_origin(&self, origin: f32, source: OriginChangeSource) {
        self.events
            .borrow_mut()
            .push(SnappingEvent::End(origin, source));
    }

    fn will_begin_animation(&self, animation: &SpringAnimation, source: OriginChangeSource) {
        self.events.borrow_mut().push(SnappingEvent::Animation {
            from: animation.current_origin(),
            to: animation.target_origin(),
            source,
        });
    }
}
