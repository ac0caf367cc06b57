use super::*;

use std::cell::Cell;

use ultradrawer_core::{RuntimeHandle, FRAME_INTERVAL_NANOS};
use ultradrawer_foundation::ScrollContent;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Event {
    WillBegin(OriginChangeSource),
    Update(f32),
    End(f32, OriginChangeSource),
    State(Option<DrawerState>),
    Animation(Option<DrawerState>, f32),
}

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<Event>>,
}

impl Recorder {
    fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    fn states(&self) -> Vec<Option<DrawerState>> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::State(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    fn ends(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, Event::End(..)))
            .count()
    }

    fn animations(&self) -> Vec<(Option<DrawerState>, f32)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Animation(state, target) => Some((*state, *target)),
                _ => None,
            })
            .collect()
    }
}

impl DrawerViewListener for Recorder {
    fn will_begin_updating_origin(&self, _origin: f32, source: OriginChangeSource) {
        self.events.borrow_mut().push(Event::WillBegin(source));
    }

    fn did_update_origin(&self, origin: f32, _source: OriginChangeSource) {
        self.events.borrow_mut().push(Event::Update(origin));
    }

    fn did_end_updating_origin(&self, origin: f32, source: OriginChangeSource) {
        self.events.borrow_mut().push(Event::End(origin, source));
    }

    fn did_change_state(&self, state: Option<DrawerState>) {
        self.events.borrow_mut().push(Event::State(state));
    }

    fn will_begin_animation_to_state(
        &self,
        state: Option<DrawerState>,
        animation: &SpringAnimation,
        _source: OriginChangeSource,
    ) {
        self.events
            .borrow_mut()
            .push(Event::Animation(state, animation.target_origin()));
    }
}

struct Fixture {
    runtime: RuntimeHandle,
    content: Rc<ScrollContent>,
    drawer: DrawerView,
    recorder: Rc<Recorder>,
    frame: Cell<u64>,
}

impl Fixture {
    /// 320x800 bounds, 64pt header, no safe area. Anchors: top 0, middle 436,
    /// bottom 736. Starts at rest in Bottom.
    fn new() -> Self {
        let fixture = Self::with_default_positions();
        fixture.drawer.set_middle_position(
            RelativePosition::from_bottom(300.0).relative_to(ReferencePoint::ContentOrigin),
        );
        fixture.drawer.set_state(DrawerState::Bottom, false, None);
        fixture.subscribe();
        fixture
    }

    fn with_default_positions() -> Self {
        let runtime = RuntimeHandle::new();
        let content = Rc::new(ScrollContent::new(
            Size::new(320.0, 2_000.0),
            EdgeInsets::ZERO,
        ));
        let drawer = DrawerView::new(content.clone(), runtime.frame_clock());
        drawer.set_display_scale(2.0);
        drawer.set_header_height(64.0);
        drawer.set_bounds(Size::new(320.0, 800.0));
        Self {
            runtime,
            content,
            drawer,
            recorder: Rc::new(Recorder::default()),
            frame: Cell::new(0),
        }
    }

    fn subscribe(&self) {
        self.drawer.add_listener(&self.recorder);
    }

    fn pump_frames(&self, frames: usize) {
        for _ in 0..frames {
            let time = self.frame.get() + FRAME_INTERVAL_NANOS;
            self.frame.set(time);
            self.runtime.drain_frame_callbacks(time);
        }
    }

    fn settle(&self) {
        let mut frames = 0;
        while self.runtime.has_pending_frame_callbacks() {
            assert!(frames < 2_000, "drawer did not settle");
            self.pump_frames(1);
            frames += 1;
        }
    }
}

#[test]
fn default_positions_share_the_bottom_anchor() {
    let fixture = Fixture::with_default_positions();

    assert_eq!(fixture.drawer.snapping_view().anchors(), vec![0.0, 736.0]);
    assert_eq!(fixture.drawer.origin_for(DrawerState::Middle), 736.0);
    assert_eq!(
        fixture.drawer.available_states(),
        vec![DrawerState::Top, DrawerState::Middle, DrawerState::Bottom]
    );
    assert_eq!(fixture.drawer.state(), None);
}

#[test]
fn dismissed_rests_at_the_bounds_height() {
    let fixture = Fixture::new();

    assert_eq!(fixture.drawer.origin_for(DrawerState::Dismissed), 800.0);
    let taller = PositionDependencies::new(1_000.0, 64.0, EdgeInsets::ZERO);
    assert_eq!(
        fixture
            .drawer
            .target_origin_for(DrawerState::Dismissed, &taller),
        1_000.0
    );
    assert_eq!(
        fixture.drawer.target_origin_for(DrawerState::Middle, &taller),
        636.0
    );
}

#[test]
fn set_state_without_animation_jumps_and_reports_once() {
    let fixture = Fixture::new();

    fixture.drawer.set_state(DrawerState::Middle, false, None);

    assert_eq!(fixture.drawer.origin(), 436.0);
    assert_eq!(fixture.drawer.state(), Some(DrawerState::Middle));
    assert_eq!(
        fixture.recorder.events(),
        vec![
            Event::State(Some(DrawerState::Middle)),
            Event::WillBegin(OriginChangeSource::Program),
            Event::Update(436.0),
            Event::End(436.0, OriginChangeSource::Program),
        ]
    );
}

#[test]
fn animated_set_state_announces_the_target_state_and_completes() {
    let fixture = Fixture::new();
    let completed = Rc::new(Cell::new(None));
    let sink = completed.clone();

    fixture.drawer.set_state(
        DrawerState::Top,
        true,
        Some(Box::new(move |finished: bool| sink.set(Some(finished)))),
    );

    assert_eq!(fixture.drawer.state(), Some(DrawerState::Top));
    assert_eq!(
        fixture.recorder.animations(),
        vec![(Some(DrawerState::Top), 0.0)]
    );
    assert_eq!(completed.get(), None);

    fixture.settle();

    assert_eq!(fixture.drawer.origin(), 0.0);
    assert_eq!(completed.get(), Some(true));
    assert_eq!(fixture.recorder.ends(), 1);
    assert_eq!(fixture.recorder.states(), vec![Some(DrawerState::Top)]);
}

#[test]
fn unavailable_state_is_ignored_and_drops_the_completion() {
    let fixture = Fixture::new();
    fixture
        .drawer
        .set_available_states([DrawerState::Top, DrawerState::Bottom]);
    let called = Rc::new(Cell::new(false));
    let sink = called.clone();

    fixture.drawer.set_state(
        DrawerState::Middle,
        true,
        Some(Box::new(move |_: bool| sink.set(true))),
    );

    assert!(!called.get());
    assert_eq!(fixture.drawer.origin(), 736.0);
    assert_eq!(fixture.drawer.state(), Some(DrawerState::Bottom));
    assert_eq!(fixture.drawer.snapping_view().anchors(), vec![0.0, 736.0]);
    assert!(fixture.recorder.events().is_empty());
}

#[test]
fn removing_the_current_state_clears_it() {
    let fixture = Fixture::new();

    fixture
        .drawer
        .set_available_states([DrawerState::Top, DrawerState::Middle]);

    assert_eq!(fixture.drawer.state(), None);
    assert_eq!(fixture.recorder.states(), vec![None]);
    assert_eq!(fixture.drawer.snapping_view().anchors(), vec![0.0, 436.0]);
    assert_eq!(fixture.drawer.origin(), 736.0);
}

#[test]
fn header_drag_released_on_an_anchor_selects_its_state() {
    let fixture = Fixture::new();

    fixture.drawer.handle_header_pan(PanGesture::Began);
    fixture
        .drawer
        .handle_header_pan(PanGesture::Changed { translation_y: -300.0 });
    fixture
        .drawer
        .handle_header_pan(PanGesture::Ended { velocity_y: 0.0 });

    assert_eq!(fixture.drawer.origin(), 436.0);
    assert_eq!(fixture.drawer.state(), Some(DrawerState::Middle));
    assert!(!fixture.runtime.has_pending_frame_callbacks());
}

#[test]
fn header_fling_settles_into_the_next_state() {
    let fixture = Fixture::new();

    fixture.drawer.handle_header_pan(PanGesture::Began);
    fixture
        .drawer
        .handle_header_pan(PanGesture::Changed { translation_y: -100.0 });
    fixture
        .drawer
        .handle_header_pan(PanGesture::Ended { velocity_y: -500.0 });

    // Projection 586.5 is closer to bottom, but the fling points upward.
    assert_eq!(
        fixture.recorder.animations(),
        vec![(Some(DrawerState::Middle), 436.0)]
    );
    assert_eq!(fixture.drawer.state(), Some(DrawerState::Bottom));

    fixture.settle();

    assert_eq!(fixture.drawer.origin(), 436.0);
    assert_eq!(fixture.drawer.state(), Some(DrawerState::Middle));
    assert_eq!(fixture.recorder.states(), vec![Some(DrawerState::Middle)]);
}

#[test]
fn coinciding_anchors_resolve_to_the_higher_state() {
    let fixture = Fixture::with_default_positions();
    fixture.drawer.set_state(DrawerState::Top, false, None);
    fixture.subscribe();

    fixture.drawer.handle_header_pan(PanGesture::Began);
    fixture
        .drawer
        .handle_header_pan(PanGesture::Changed { translation_y: 736.0 });
    fixture
        .drawer
        .handle_header_pan(PanGesture::Ended { velocity_y: 0.0 });

    assert_eq!(fixture.drawer.state(), Some(DrawerState::Middle));
}

#[test]
fn layout_retargets_an_animation_towards_a_state() {
    let fixture = Fixture::new();
    fixture.drawer.set_state(DrawerState::Middle, true, None);
    fixture.pump_frames(3);
    let in_flight = fixture.drawer.origin();
    assert!(in_flight < 736.0 && in_flight > 436.0, "{in_flight}");

    fixture.drawer.set_bounds(Size::new(320.0, 900.0));

    let animation = fixture
        .drawer
        .snapping_view()
        .animation()
        .expect("animation still running");
    assert_eq!(animation.target_origin(), 536.0);
    assert_eq!(fixture.drawer.origin(), in_flight);

    fixture.settle();

    assert_eq!(fixture.drawer.origin(), 536.0);
    assert_eq!(fixture.drawer.state(), Some(DrawerState::Middle));
    assert_eq!(fixture.recorder.animations().len(), 1);
    assert_eq!(fixture.recorder.ends(), 1);
}

#[test]
fn layout_at_rest_follows_the_state() {
    let fixture = Fixture::new();
    fixture.drawer.set_state(DrawerState::Middle, false, None);

    fixture.drawer.set_bounds(Size::new(320.0, 900.0));

    assert_eq!(fixture.drawer.origin(), 536.0);
    assert_eq!(fixture.drawer.snapping_view().anchors(), vec![0.0, 536.0, 836.0]);
}

#[test]
fn header_height_change_moves_the_drawer_to_its_state() {
    let fixture = Fixture::new();
    fixture.drawer.set_state(DrawerState::Middle, false, None);

    fixture.drawer.set_header_height(100.0);

    assert_eq!(fixture.drawer.snapping_view().anchors(), vec![0.0, 400.0, 700.0]);
    assert_eq!(fixture.drawer.origin(), 400.0);
    assert_eq!(fixture.drawer.state(), Some(DrawerState::Middle));
}

#[test]
fn shrinking_content_lowers_a_content_sized_top() {
    let fixture = Fixture::new();
    fixture
        .drawer
        .set_top_position(RelativePosition::from_top(0.0).ignoring_content_size(false));
    fixture.drawer.set_state(DrawerState::Top, false, None);
    assert_eq!(fixture.drawer.origin(), 0.0);

    fixture.content.set_content_size(Size::new(320.0, 200.0));

    // The content top rests 200pt above the bottom edge.
    assert_eq!(fixture.drawer.origin(), 800.0 - 200.0 - 64.0);
    assert_eq!(fixture.drawer.state(), Some(DrawerState::Top));
}

#[test]
fn safe_area_change_keeps_bottom_pinned() {
    let fixture = Fixture::new();

    fixture
        .drawer
        .set_safe_area_insets(EdgeInsets::vertical(44.0, 34.0));

    assert_eq!(fixture.drawer.origin(), 702.0);
    assert_eq!(fixture.drawer.snapping_view().anchors(), vec![44.0, 402.0, 702.0]);
}

#[test]
fn safe_area_change_leaves_other_states_in_place() {
    let fixture = Fixture::new();
    fixture.drawer.set_state(DrawerState::Middle, false, None);

    fixture
        .drawer
        .set_safe_area_insets(EdgeInsets::vertical(44.0, 34.0));

    assert_eq!(fixture.drawer.origin(), 436.0);
}

#[test]
fn content_fades_in_as_the_drawer_leaves_bottom() {
    let fixture = Fixture::new();
    assert_eq!(fixture.drawer.content_alpha(), 1.0);

    fixture
        .drawer
        .set_safe_area_insets(EdgeInsets::vertical(0.0, 34.0));
    assert_eq!(fixture.drawer.origin(), 702.0);
    assert_eq!(fixture.drawer.content_alpha(), 0.0);

    fixture.drawer.handle_header_pan(PanGesture::Began);
    fixture
        .drawer
        .handle_header_pan(PanGesture::Changed { translation_y: -20.0 });
    assert!((fixture.drawer.content_alpha() - 0.5).abs() < 1e-4);

    fixture
        .drawer
        .handle_header_pan(PanGesture::Changed { translation_y: -60.0 });
    assert_eq!(fixture.drawer.content_alpha(), 1.0);

    fixture
        .drawer
        .handle_header_pan(PanGesture::Changed { translation_y: 0.0 });
    fixture.drawer.set_should_fade_in_bottom_state(false);
    assert_eq!(fixture.drawer.content_alpha(), 1.0);
}

#[test]
fn corner_radius_rounds_only_the_top_corners() {
    let fixture = Fixture::new();
    assert!(fixture.drawer.corner_radii().is_zero());

    fixture.drawer.set_corner_radius(12.0);
    assert_eq!(fixture.drawer.corner_radii(), CornerRadii::top(12.0));

    fixture.drawer.set_corner_radius(-3.0);
    assert_eq!(fixture.drawer.corner_radius(), 0.0);
    assert!(fixture.drawer.corner_radii().is_zero());
}

#[test]
fn removed_listener_hears_nothing() {
    let fixture = Fixture::new();
    fixture.drawer.remove_listener(&fixture.recorder);

    fixture.drawer.set_state(DrawerState::Top, false, None);

    assert!(fixture.recorder.events().is_empty());
    assert_eq!(fixture.drawer.origin(), 0.0);
}

#[test]
fn only_the_visible_sheet_takes_touches() {
    let fixture = Fixture::new();

    assert!(fixture.drawer.point_inside(Point::new(10.0, 740.0)));
    assert!(!fixture.drawer.point_inside(Point::new(10.0, 700.0)));

    fixture.drawer.set_state(DrawerState::Middle, false, None);
    assert!(fixture.drawer.point_inside(Point::new(10.0, 700.0)));
}
