//! Header pan scenarios on a phone sized drawer.
//!
//! Anchors: top 47, middle 466, bottom 746.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ultradrawer_foundation::PanGesture;
use ultradrawer_testing::robot_assertions::{assert_approx_eq, assert_settled_in};
use ultradrawer_testing::{DrawerEvent, DrawerRobot, RecordingDrawerListener};
use ultradrawer_ui::{DrawerState, DrawerView, DrawerViewListener, OriginChangeSource};

fn robot_in(state: DrawerState) -> (DrawerRobot, Rc<RecordingDrawerListener>) {
    let robot = DrawerRobot::phone();
    robot.drawer().set_state(state, false, None);
    let listener = RecordingDrawerListener::new();
    robot.drawer().add_listener(&listener);
    (robot, listener)
}

#[test]
fn phone_layout_resolves_expected_anchors() {
    let robot = DrawerRobot::phone();
    assert_eq!(robot.drawer().snapping_view().anchors(), vec![47.0, 466.0, 746.0]);
    assert_eq!(robot.drawer().origin_for(DrawerState::Dismissed), 844.0);
}

#[test]
fn fling_up_from_middle_reaches_top() {
    let (robot, listener) = robot_in(DrawerState::Middle);

    robot.drag_header(&[-40.0, -80.0], -1_500.0);
    robot.wait_for_idle();

    assert_settled_in(robot.drawer(), DrawerState::Top);
    assert_eq!(listener.states(), vec![Some(DrawerState::Top)]);
    assert_eq!(
        listener.ends(),
        vec![(47.0, OriginChangeSource::HeaderInteraction)]
    );
}

#[test]
fn slow_release_snaps_to_the_nearest_state() {
    let (robot, _listener) = robot_in(DrawerState::Middle);

    robot.drag_header(&[60.0, 150.0], 0.0);
    robot.wait_for_idle();

    assert_settled_in(robot.drawer(), DrawerState::Bottom);
}

#[test]
fn short_fling_still_leaves_the_starting_state() {
    let (robot, _listener) = robot_in(DrawerState::Middle);

    robot.drag_header(&[10.0], 300.0);
    robot.wait_for_idle();

    assert_settled_in(robot.drawer(), DrawerState::Bottom);
}

#[test]
fn dragging_above_top_rubber_bands_and_springs_back() {
    let (robot, listener) = robot_in(DrawerState::Top);

    robot.press_header();
    robot.move_header(-100.0);
    let stretched = robot.drawer().origin();
    assert!(stretched > 0.0 && stretched < 47.0, "{stretched}");
    assert_approx_eq(stretched, 21.66, 0.05);

    robot.release_header(0.0);
    robot.wait_for_idle();

    assert_settled_in(robot.drawer(), DrawerState::Top);
    assert_eq!(listener.ends().len(), 1);
}

#[test]
fn without_bounces_the_header_stops_at_the_limits() {
    let (robot, _listener) = robot_in(DrawerState::Top);
    robot.drawer().set_bounces(false);

    robot.press_header();
    robot.move_header(-100.0);

    assert_eq!(robot.drawer().origin(), 47.0);
}

#[test]
fn cancelled_pan_ends_where_it_stopped() {
    let (robot, listener) = robot_in(DrawerState::Middle);

    robot.press_header();
    robot.move_header(30.0);
    robot.drawer().handle_header_pan(PanGesture::Cancelled);

    assert_eq!(robot.drawer().origin(), 496.0);
    assert!(!robot.runtime().has_pending_frame_callbacks());
    assert_eq!(
        listener.ends(),
        vec![(496.0, OriginChangeSource::HeaderInteraction)]
    );
    assert_eq!(robot.drawer().state(), Some(DrawerState::Middle));
}

#[test]
fn grabbing_the_header_interrupts_a_program_animation() {
    let (robot, listener) = robot_in(DrawerState::Bottom);
    let finished = Rc::new(Cell::new(None));
    let sink = finished.clone();
    robot.drawer().set_state(
        DrawerState::Top,
        true,
        Some(Box::new(move |done: bool| sink.set(Some(done)))),
    );
    robot.advance_frames(3);
    let caught_at = robot.drawer().origin();

    robot.press_header();

    assert_eq!(finished.get(), Some(false));
    assert!(robot.drawer().snapping_view().animation().is_none());
    let events = listener.events();
    let tail = &events[events.len() - 2..];
    assert_eq!(
        tail,
        &[
            DrawerEvent::End {
                origin: caught_at,
                source: OriginChangeSource::Program,
            },
            DrawerEvent::WillBegin {
                origin: caught_at,
                source: OriginChangeSource::HeaderInteraction,
            },
        ]
    );
}

#[test]
fn listener_can_redirect_an_announced_animation() {
    let (robot, listener) = robot_in(DrawerState::Bottom);
    listener.redirect_animations_to(Some(600.0));

    robot.drawer().set_state(DrawerState::Top, true, None);
    robot.wait_for_idle();

    assert_eq!(listener.animation_targets(), vec![(Some(DrawerState::Top), 47.0)]);
    assert_eq!(robot.drawer().origin(), 600.0);
    assert_eq!(listener.ends().len(), 1);
}

/// Sends the drawer on to `next` as soon as it lands in `trigger`.
struct Relay {
    drawer: RefCell<Option<DrawerView>>,
    trigger: DrawerState,
    next: DrawerState,
}

impl DrawerViewListener for Relay {
    fn did_end_updating_origin(&self, _origin: f32, source: OriginChangeSource) {
        let drawer = self.drawer.borrow().clone();
        if let Some(drawer) = drawer {
            if source != OriginChangeSource::Program && drawer.state() == Some(self.trigger) {
                drawer.set_state(self.next, true, None);
            }
        }
    }
}

#[test]
fn listener_may_start_a_new_move_from_did_end() {
    let (robot, listener) = robot_in(DrawerState::Bottom);
    let relay = Rc::new(Relay {
        drawer: RefCell::new(Some(robot.drawer().clone())),
        trigger: DrawerState::Middle,
        next: DrawerState::Top,
    });
    robot.drawer().add_listener(&relay);

    robot.drag_header(&[-100.0], -500.0);
    robot.wait_for_idle();

    assert_settled_in(robot.drawer(), DrawerState::Top);
    assert_eq!(
        listener.states(),
        vec![Some(DrawerState::Middle), Some(DrawerState::Top)]
    );
    relay.drawer.borrow_mut().take();
}

#[test]
fn dropped_listener_is_skipped() {
    let (robot, listener) = robot_in(DrawerState::Bottom);
    drop(listener);

    robot.drawer().set_state(DrawerState::Middle, true, None);
    robot.wait_for_idle();

    assert_settled_in(robot.drawer(), DrawerState::Middle);
}
