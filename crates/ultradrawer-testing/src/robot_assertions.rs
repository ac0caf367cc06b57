//! Assertion helpers for drawer tests.

use ultradrawer_ui::{DrawerState, DrawerView};

/// Asserts `actual` is within `eps` of `expected`.
#[track_caller]
pub fn assert_approx_eq(actual: f32, expected: f32, eps: f32) {
    assert!(
        (actual - expected).abs() <= eps,
        "expected {expected} ± {eps}, got {actual}"
    );
}

/// Asserts the drawer rests exactly on the anchor of `state` and reports it.
#[track_caller]
pub fn assert_settled_in(drawer: &DrawerView, state: DrawerState) {
    assert!(!drawer.is_dragging(), "drawer is still being dragged");
    assert!(
        drawer.snapping_view().animation().is_none(),
        "drawer is still animating"
    );
    assert_eq!(drawer.state(), Some(state));
    assert_eq!(drawer.origin(), drawer.origin_for(state));
}
