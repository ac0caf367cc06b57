//! Foundation layer for UltraDrawer
//!
//! The anchor/origin engine ([`SnappingView`]) and everything it talks to:
//! scrollable content adapters, header pan events, rubber banding and the
//! anchor selection rules.

pub mod anchors;
pub mod content;
pub mod gesture_constants;
pub mod gestures;
pub mod rubber_band;
pub mod snapping;

pub use anchors::{
    anchor_limits, nearest_anchor, normalize_anchors, release_target, select_next_anchor,
};
pub use content::{DrawerContent, DrawerContentListener, ScrollContent};
pub use gestures::PanGesture;
pub use rubber_band::{rubber_band_clamp, rubber_band_clamp_with};
pub use snapping::{
    Completion, ContentState, HeaderState, OriginChangeSource, SnappingView, SnappingViewListener,
};

pub mod prelude {
    pub use crate::content::{DrawerContent, DrawerContentListener, ScrollContent};
    pub use crate::gestures::PanGesture;
    pub use crate::snapping::{OriginChangeSource, SnappingView, SnappingViewListener};
}
