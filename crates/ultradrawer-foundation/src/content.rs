//! Scrollable content hosted inside a drawer.
//!
//! The engine never owns a scroll view. It talks to one through
//! [`DrawerContent`] and observes it as one [`DrawerContentListener`] among
//! any number of others.

use std::cell::RefCell;
use std::rc::Weak;

use ultradrawer_animation::{project, DecelerationRate};
use ultradrawer_core::Notifier;
use ultradrawer_ui_graphics::{EdgeInsets, Point, Size};

use crate::gesture_constants::CONTENT_CHANGE_EPSILON;

/// Observer of a content adapter. Every method defaults to a no-op.
pub trait DrawerContentListener {
    fn did_change_content_size(&self, _content: &dyn DrawerContent, _size: Size) {}

    fn did_change_content_inset(&self, _content: &dyn DrawerContent, _inset: EdgeInsets) {}

    /// The content offset changed. Read it from `content`.
    fn did_scroll(&self, _content: &dyn DrawerContent) {}

    fn will_begin_dragging(&self, _content: &dyn DrawerContent) {}

    /// `velocity` is in points per millisecond, positive when the offset
    /// grows. Listeners may overwrite `target_offset` to change where the
    /// content comes to rest.
    fn will_end_dragging(
        &self,
        _content: &dyn DrawerContent,
        _velocity: Point,
        _target_offset: &mut Point,
    ) {
    }
}

/// Scrollable content seen from the drawer.
///
/// Offsets follow scroll-view conventions: `y == -content_inset().top` is the
/// resting top, larger values scroll further into the content.
pub trait DrawerContent {
    fn content_offset(&self) -> Point;

    /// Writes the offset and reports `did_scroll` to current listeners.
    fn set_content_offset(&self, offset: Point);

    fn content_size(&self) -> Size;

    fn content_inset(&self) -> EdgeInsets;

    fn add_listener(&self, listener: Weak<dyn DrawerContentListener>);

    fn remove_listener(&self, listener: &Weak<dyn DrawerContentListener>);
}

#[derive(Debug, Default)]
struct ScrollState {
    offset: Point,
    size: Size,
    inset: EdgeInsets,
    dragging: bool,
}

/// Headless scroll view implementing [`DrawerContent`].
///
/// Hosts mirror their real scroll view into it: layout results through
/// [`set_content_size`](Self::set_content_size) and
/// [`set_content_inset`](Self::set_content_inset), touches through
/// [`begin_dragging`](Self::begin_dragging), [`drag_by`](Self::drag_by) and
/// [`end_dragging`](Self::end_dragging).
#[derive(Debug, Default)]
pub struct ScrollContent {
    state: RefCell<ScrollState>,
    listeners: Notifier<dyn DrawerContentListener>,
}

impl ScrollContent {
    /// Content resting at its top, `offset.y == -inset.top`.
    pub fn new(size: Size, inset: EdgeInsets) -> Self {
        Self {
            state: RefCell::new(ScrollState {
                offset: Point::new(0.0, -inset.top),
                size,
                inset,
                dragging: false,
            }),
            listeners: Notifier::new(),
        }
    }

    /// Broadcasts only changes larger than [`CONTENT_CHANGE_EPSILON`].
    pub fn set_content_size(&self, size: Size) {
        {
            let mut state = self.state.borrow_mut();
            if state.size.approx_eq(&size, CONTENT_CHANGE_EPSILON) {
                return;
            }
            state.size = size;
        }
        self.listeners
            .for_each(|listener| listener.did_change_content_size(self, size));
    }

    /// Broadcasts only changes larger than [`CONTENT_CHANGE_EPSILON`].
    pub fn set_content_inset(&self, inset: EdgeInsets) {
        {
            let mut state = self.state.borrow_mut();
            if state.inset.approx_eq(&inset, CONTENT_CHANGE_EPSILON) {
                return;
            }
            state.inset = inset;
        }
        self.listeners
            .for_each(|listener| listener.did_change_content_inset(self, inset));
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().dragging
    }

    /// Finger down on the content.
    pub fn begin_dragging(&self) {
        self.state.borrow_mut().dragging = true;
        self.listeners
            .for_each(|listener| listener.will_begin_dragging(self));
    }

    /// Finger moved by `translation_y` points, positive downward.
    ///
    /// Moving the finger down pulls the content towards its top, so the offset
    /// decreases by the same amount.
    pub fn drag_by(&self, translation_y: f32) {
        let offset = self.content_offset();
        self.set_content_offset(Point::new(offset.x, offset.y - translation_y));
    }

    /// Finger lifted with `velocity` in points per millisecond.
    ///
    /// The natural resting offset is the projected fling, never above the
    /// resting top. Listeners may override it; the result is applied at once
    /// and returned.
    pub fn end_dragging(&self, velocity: Point) -> Point {
        let (offset, inset) = {
            let mut state = self.state.borrow_mut();
            state.dragging = false;
            (state.offset, state.inset)
        };
        let projected = project(offset.y, velocity.y, DecelerationRate::NORMAL);
        let mut target = Point::new(offset.x, projected.max(-inset.top));
        self.listeners
            .for_each(|listener| listener.will_end_dragging(self, velocity, &mut target));
        self.set_content_offset(target);
        target
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.listener_count()
    }
}

impl DrawerContent for ScrollContent {
    fn content_offset(&self) -> Point {
        self.state.borrow().offset
    }

    fn set_content_offset(&self, offset: Point) {
        {
            let mut state = self.state.borrow_mut();
            if state.offset == offset {
                return;
            }
            state.offset = offset;
        }
        log::trace!("content offset -> {:?}", offset);
        self.listeners.for_each(|listener| listener.did_scroll(self));
    }

    fn content_size(&self) -> Size {
        self.state.borrow().size
    }

    fn content_inset(&self) -> EdgeInsets {
        self.state.borrow().inset
    }

    fn add_listener(&self, listener: Weak<dyn DrawerContentListener>) {
        self.listeners.subscribe(listener);
    }

    fn remove_listener(&self, listener: &Weak<dyn DrawerContentListener>) {
        self.listeners.unsubscribe(listener);
    }
}

#[cfg(test)]
#[path = "tests/content_tests.rs"]
mod tests;
