use std::rc::Rc;
use std::thread;
use std::time::Duration;

use ultradrawer_animation::{AnimationParameters, Spring, SpringAnimation, SpringError};
use ultradrawer_core::{Clock, RuntimeHandle, StdClock, FRAME_INTERVAL_NANOS};
use ultradrawer_foundation::{DrawerContent, PanGesture, ScrollContent};
use ultradrawer_ui::{
    DrawerState, DrawerView, DrawerViewListener, OriginChangeSource, ReferencePoint,
    RelativePosition,
};
use ultradrawer_ui_graphics::{EdgeInsets, Point, Size};

struct StateLogger;

impl DrawerViewListener for StateLogger {
    fn did_end_updating_origin(&self, origin: f32, source: OriginChangeSource) {
        log::info!("came to rest at {origin:.1} after {source:?}");
    }

    fn did_change_state(&self, state: Option<DrawerState>) {
        log::info!("state -> {state:?}");
    }

    fn will_begin_animation_to_state(
        &self,
        state: Option<DrawerState>,
        animation: &SpringAnimation,
        source: OriginChangeSource,
    ) {
        log::info!(
            "animating {:.1} -> {:.1} ({state:?}, {source:?})",
            animation.current_origin(),
            animation.target_origin()
        );
    }
}

/// Drives frames in real time until nothing is scheduled.
struct FrameLoop {
    runtime: RuntimeHandle,
    clock: StdClock,
    start: <StdClock as Clock>::Instant,
}

impl FrameLoop {
    fn new(runtime: RuntimeHandle) -> Self {
        let clock = StdClock;
        Self {
            runtime,
            start: clock.now(),
            clock,
        }
    }

    fn frame(&self) {
        thread::sleep(Duration::from_nanos(FRAME_INTERVAL_NANOS));
        self.runtime
            .drain_frame_callbacks(self.clock.elapsed_nanos(self.start));
    }

    fn run_until_idle(&self) -> usize {
        let mut frames = 0;
        while self.runtime.has_pending_frame_callbacks() {
            self.frame();
            frames += 1;
        }
        frames
    }
}

fn main() -> Result<(), SpringError> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== UltraDrawer headless demo ===");
    println!("Scripted gestures on a 390x844 drawer; set RUST_LOG=debug for engine detail.");
    println!();

    let runtime = RuntimeHandle::new();
    let frames = FrameLoop::new(runtime.clone());
    let content = Rc::new(ScrollContent::new(
        Size::new(390.0, 2_000.0),
        EdgeInsets::ZERO,
    ));

    let drawer = DrawerView::new(content.clone(), runtime.frame_clock());
    drawer.set_display_scale(3.0);
    drawer.set_header_height(64.0);
    drawer.set_safe_area_insets(EdgeInsets::vertical(47.0, 34.0));
    drawer.set_bounds(Size::new(390.0, 844.0));
    drawer.set_middle_position(
        RelativePosition::from_bottom(280.0).relative_to(ReferencePoint::ContentOrigin),
    );
    drawer.set_available_states(DrawerState::ALL);
    drawer.set_corner_radius(16.0);
    drawer.set_animation_parameters(AnimationParameters::Spring(Spring::new(1.0, 300.0, 0.8)?));

    let logger = Rc::new(StateLogger);
    drawer.add_listener(&logger);

    for state in DrawerState::ALL {
        log::info!("{state:?} anchor at {:.1}", drawer.origin_for(state));
    }

    drawer.set_state(DrawerState::Middle, false, None);

    log::info!("header fling upwards");
    drawer.handle_header_pan(PanGesture::Began);
    for step in 1..=4 {
        drawer.handle_header_pan(PanGesture::Changed {
            translation_y: -25.0 * step as f32,
        });
        frames.frame();
    }
    drawer.handle_header_pan(PanGesture::Ended { velocity_y: -1_800.0 });
    let spent = frames.run_until_idle();
    log::info!("settled in {spent} frames, content alpha {:.2}", drawer.content_alpha());

    log::info!("content pulled down from its top");
    content.begin_dragging();
    for _ in 0..6 {
        content.drag_by(30.0);
        frames.frame();
    }
    content.end_dragging(Point::new(0.0, -2.5));
    let spent = frames.run_until_idle();
    log::info!(
        "settled in {spent} frames, content offset {:?}",
        content.content_offset()
    );

    log::info!("dismissing");
    drawer.set_state(
        DrawerState::Dismissed,
        true,
        Some(Box::new(|finished: bool| {
            log::info!("dismiss finished: {finished}");
        })),
    );
    frames.run_until_idle();

    println!();
    println!("Final state {:?} at origin {:.1}", drawer.state(), drawer.origin());
    Ok(())
}
