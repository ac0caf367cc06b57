//! Anchor set rules: normalisation, limits and release target selection.
//!
//! Every function here expects an anchor slice already passed through
//! [`normalize_anchors`], i.e. sorted ascending with duplicates removed.

use ultradrawer_animation::{project, DecelerationRate};
use ultradrawer_core::{ApproxOrd, ClosedRange};

/// Sorts ascending, drops exact duplicates and non-finite values.
pub fn normalize_anchors(mut anchors: Vec<f32>) -> Vec<f32> {
    let before = anchors.len();
    anchors.retain(|anchor| anchor.is_finite());
    if anchors.len() != before {
        log::debug!("dropped {} non-finite anchors", before - anchors.len());
    }
    anchors.sort_by(f32::total_cmp);
    anchors.dedup();
    anchors
}

/// `[first, last]`, or `None` for an empty set.
pub fn anchor_limits(anchors: &[f32]) -> Option<ClosedRange> {
    match (anchors.first(), anchors.last()) {
        (Some(&lower), Some(&upper)) => Some(ClosedRange::new(lower, upper)),
        _ => None,
    }
}

/// Anchor closest to `target`. On an exact tie the lower anchor wins.
pub fn nearest_anchor(anchors: &[f32], target: f32) -> Option<f32> {
    anchors
        .iter()
        .copied()
        .min_by(|a, b| (a - target).abs().total_cmp(&(b - target).abs()))
}

/// The neighbour of `anchor` in the direction of `velocity`, clamped to the
/// ends of the set. A zero velocity or an anchor outside the set returns
/// `anchor` unchanged.
pub fn select_next_anchor(anchors: &[f32], anchor: f32, velocity: f32) -> f32 {
    if velocity == 0.0 || anchors.is_empty() {
        return anchor;
    }
    let Some(index) = anchors.iter().position(|candidate| *candidate == anchor) else {
        return anchor;
    };
    let next = if velocity > 0.0 {
        (index + 1).min(anchors.len() - 1)
    } else {
        index.saturating_sub(1)
    };
    anchors[next]
}

/// Resting anchor for a release at `origin` with `velocity` in points per
/// millisecond.
///
/// The fling is projected ballistically and the nearest anchor to the
/// projection is taken. A moving release never settles back onto the anchor
/// it starts from, nor onto one lying against the motion: it advances one
/// anchor further in the direction of travel instead.
pub fn release_target(
    anchors: &[f32],
    origin: f32,
    velocity: f32,
    rate: DecelerationRate,
    eps: f32,
) -> Option<f32> {
    let projection = project(origin, velocity, rate);
    let projection_anchor = nearest_anchor(anchors, projection)?;

    let against_motion = (projection_anchor - origin) * velocity < 0.0;
    let standing_on_it = origin.is_equal_to(projection_anchor, eps);
    let target = if velocity != 0.0 && (against_motion || standing_on_it) {
        select_next_anchor(anchors, projection_anchor, velocity)
    } else {
        projection_anchor
    };
    log::debug!(
        "release at {origin} v={velocity}: projection {projection} -> anchor {target}"
    );
    Some(target)
}

#[cfg(test)]
#[path = "tests/anchors_tests.rs"]
mod tests;
