//! Robot-style harness for drawer tests
//!
//! A [`DrawerRobot`] owns a runtime, a [`ScrollContent`] and a laid out
//! [`DrawerView`]. Tests script header pans and content drags through it and
//! pump 60 Hz frames until the drawer settles.
//!
//! # Example
//!
//! ```
//! use ultradrawer_testing::DrawerRobot;
//! use ultradrawer_ui::DrawerState;
//!
//! let robot = DrawerRobot::phone();
//! robot.drawer().set_state(DrawerState::Middle, false, None);
//!
//! robot.drag_header(&[-40.0, -80.0], -1_500.0);
//! robot.wait_for_idle();
//!
//! assert_eq!(robot.drawer().state(), Some(DrawerState::Top));
//! ```

use std::cell::Cell;
use std::rc::Rc;

use ultradrawer_core::{RuntimeHandle, FRAME_INTERVAL_NANOS};
use ultradrawer_foundation::{PanGesture, ScrollContent};
use ultradrawer_ui::{DrawerView, ReferencePoint, RelativePosition};
use ultradrawer_ui_graphics::{EdgeInsets, Point, Size};

/// Frames [`DrawerRobot::wait_for_idle`] pumps before giving up.
pub const MAX_IDLE_FRAMES: usize = 10_000;

/// Programmatic control over a headless drawer.
pub struct DrawerRobot {
    runtime: RuntimeHandle,
    content: Rc<ScrollContent>,
    drawer: DrawerView,
    frame_time_nanos: Cell<u64>,
}

impl DrawerRobot {
    /// Builds and lays out a drawer with the given measurements.
    pub fn new(
        bounds: Size,
        header_height: f32,
        safe_area: EdgeInsets,
        content_size: Size,
    ) -> Self {
        let runtime = RuntimeHandle::new();
        let content = Rc::new(ScrollContent::new(content_size, EdgeInsets::ZERO));
        let drawer = DrawerView::new(content.clone(), runtime.frame_clock());
        drawer.set_display_scale(2.0);
        drawer.set_header_height(header_height);
        drawer.set_safe_area_insets(safe_area);
        drawer.set_bounds(bounds);
        drawer.layout();
        log::debug!("robot drawer anchors {:?}", drawer.snapping_view().anchors());
        Self {
            runtime,
            content,
            drawer,
            frame_time_nanos: Cell::new(0),
        }
    }

    /// 390x844 phone with a 64pt header, notch and home indicator insets,
    /// tall content and a middle state 280pt above the bottom.
    pub fn phone() -> Self {
        let robot = Self::new(
            Size::new(390.0, 844.0),
            64.0,
            EdgeInsets::vertical(47.0, 34.0),
            Size::new(390.0, 2_000.0),
        );
        robot.drawer.set_middle_position(
            RelativePosition::from_bottom(280.0).relative_to(ReferencePoint::ContentOrigin),
        );
        robot
    }

    pub fn drawer(&self) -> &DrawerView {
        &self.drawer
    }

    pub fn content(&self) -> &Rc<ScrollContent> {
        &self.content
    }

    pub fn runtime(&self) -> &RuntimeHandle {
        &self.runtime
    }

    /// Timestamp handed to the most recent frame.
    pub fn frame_time_nanos(&self) -> u64 {
        self.frame_time_nanos.get()
    }

    /// Runs one frame, 1/60 s after the previous one.
    pub fn advance_frame(&self) -> usize {
        let time = self.frame_time_nanos.get() + FRAME_INTERVAL_NANOS;
        self.frame_time_nanos.set(time);
        self.runtime.drain_frame_callbacks(time)
    }

    pub fn advance_frames(&self, frames: usize) {
        for _ in 0..frames {
            self.advance_frame();
        }
    }

    /// Pumps frames until no animation is pending. Returns the frame count.
    ///
    /// # Panics
    ///
    /// After [`MAX_IDLE_FRAMES`] frames.
    pub fn wait_for_idle(&self) -> usize {
        let mut frames = 0;
        while self.runtime.has_pending_frame_callbacks() {
            assert!(
                frames < MAX_IDLE_FRAMES,
                "drawer did not settle within {MAX_IDLE_FRAMES} frames"
            );
            self.advance_frame();
            frames += 1;
        }
        frames
    }

    /// Begins a header pan without ending it.
    pub fn press_header(&self) {
        self.drawer.handle_header_pan(PanGesture::Began);
    }

    /// Moves an in-progress header pan to `translation_y` from its start.
    pub fn move_header(&self, translation_y: f32) {
        self.drawer
            .handle_header_pan(PanGesture::Changed { translation_y });
    }

    pub fn release_header(&self, velocity_y: f32) {
        self.drawer
            .handle_header_pan(PanGesture::Ended { velocity_y });
    }

    /// Full header pan through the cumulative `translations`, released at
    /// `velocity_y` points per second. One frame passes between moves.
    pub fn drag_header(&self, translations: &[f32], velocity_y: f32) {
        self.press_header();
        for translation in translations {
            self.move_header(*translation);
            self.advance_frame();
        }
        self.release_header(velocity_y);
    }

    /// Content drag through the per-move finger `deltas`, released at
    /// `velocity_y` points per millisecond in content offset terms. Returns
    /// the offset the content comes to rest at.
    pub fn drag_content(&self, deltas: &[f32], velocity_y: f32) -> Point {
        self.content.begin_dragging();
        for delta in deltas {
            self.content.drag_by(*delta);
            self.advance_frame();
        }
        self.content.end_dragging(Point::new(0.0, velocity_y))
    }
}

impl Default for DrawerRobot {
    fn default() -> Self {
        Self::phone()
    }
}
