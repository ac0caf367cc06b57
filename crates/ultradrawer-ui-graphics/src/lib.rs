//! Pure geometry data for UltraDrawer
//!
//! Points, sizes, rectangles, insets and corner radii shared by the engine,
//! the content adapters and the drawer layer. Values are in logical points.

mod geometry;

pub use geometry::*;

pub mod prelude {
    pub use crate::geometry::{CornerRadii, EdgeInsets, Point, Rect, Size};
}
