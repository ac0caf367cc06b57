use super::*;

const ANCHORS: [f32; 3] = [0.0, 100.0, 300.0];
const EPS: f32 = 0.5;

fn release(origin: f32, velocity: f32) -> Option<f32> {
    release_target(&ANCHORS, origin, velocity, DecelerationRate::FAST, EPS)
}

#[test]
fn normalize_sorts_and_dedups() {
    let anchors = normalize_anchors(vec![300.0, 0.0, f32::NAN, 100.0, 300.0]);
    assert_eq!(anchors, vec![0.0, 100.0, 300.0]);
}

#[test]
fn limits_span_first_to_last() {
    let limits = anchor_limits(&ANCHORS).unwrap();
    assert_eq!((limits.lower, limits.upper), (0.0, 300.0));
    assert!(anchor_limits(&[]).is_none());
}

#[test]
fn nearest_prefers_lower_anchor_on_tie() {
    assert_eq!(nearest_anchor(&ANCHORS, 50.0), Some(0.0));
    assert_eq!(nearest_anchor(&ANCHORS, 200.0), Some(100.0));
    assert_eq!(nearest_anchor(&ANCHORS, 201.0), Some(300.0));
    assert_eq!(nearest_anchor(&[], 10.0), None);
}

#[test]
fn next_anchor_clamps_at_the_ends() {
    assert_eq!(select_next_anchor(&ANCHORS, 100.0, 1.0), 300.0);
    assert_eq!(select_next_anchor(&ANCHORS, 100.0, -1.0), 0.0);
    assert_eq!(select_next_anchor(&ANCHORS, 300.0, 1.0), 300.0);
    assert_eq!(select_next_anchor(&ANCHORS, 0.0, -1.0), 0.0);
    assert_eq!(select_next_anchor(&ANCHORS, 100.0, 0.0), 100.0);
    assert_eq!(select_next_anchor(&ANCHORS, 42.0, 1.0), 42.0);
}

#[test]
fn resting_release_snaps_to_nearest() {
    assert_eq!(release(50.0, 0.0), Some(0.0));
    assert_eq!(release(60.0, 0.0), Some(100.0));
    assert_eq!(release(250.0, 0.0), Some(300.0));
}

#[test]
fn slow_release_from_an_anchor_still_moves_on() {
    assert_eq!(release(100.0, -0.01), Some(0.0));
    assert_eq!(release(100.0, 0.01), Some(300.0));
}

#[test]
fn release_against_the_projection_anchor_advances() {
    // Projection lands near 100 while moving down from 110.
    assert_eq!(release(110.0, 0.01), Some(300.0));
    assert_eq!(release(90.0, -0.01), Some(0.0));
}

#[test]
fn release_towards_the_projection_anchor_keeps_it() {
    assert_eq!(release(120.0, -0.05), Some(100.0));
    assert_eq!(release(90.0, 0.05), Some(100.0));
}

#[test]
fn fast_fling_skips_anchors() {
    assert_eq!(release(20.0, 4.0), Some(300.0));
}

#[test]
fn release_at_an_end_stays_there() {
    assert_eq!(release(0.0, -1.0), Some(0.0));
    assert_eq!(release(300.0, 1.0), Some(300.0));
}

#[test]
fn empty_set_has_no_target() {
    assert_eq!(release_target(&[], 10.0, 1.0, DecelerationRate::FAST, EPS), None);
}
