//! Declarative drawer positions and their resolution against layout.

use ultradrawer_ui_graphics::EdgeInsets;

/// Discrete resting states of a drawer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DrawerState {
    Top,
    Middle,
    Bottom,
    /// Fully below the bounds.
    Dismissed,
}

impl DrawerState {
    pub const ALL: [DrawerState; 4] = [
        DrawerState::Top,
        DrawerState::Middle,
        DrawerState::Bottom,
        DrawerState::Dismissed,
    ];
}

/// Which bounds edge an offset is measured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
}

/// Which part of the drawer the offset positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferencePoint {
    /// The top of the header.
    DrawerOrigin,
    /// The top of the content, one header height below the origin.
    ContentOrigin,
}

/// Layout measurements a position resolves against.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PositionDependencies {
    pub bounds_height: f32,
    pub header_height: f32,
    pub safe_area_insets: EdgeInsets,
}

impl PositionDependencies {
    pub fn new(bounds_height: f32, header_height: f32, safe_area_insets: EdgeInsets) -> Self {
        Self {
            bounds_height,
            header_height,
            safe_area_insets,
        }
    }
}

/// Position of the drawer relative to its bounds.
///
/// ```
/// use ultradrawer_ui::{ReferencePoint, RelativePosition};
///
/// // Content top sits 280pt above the bottom safe area.
/// let middle = RelativePosition::from_bottom(280.0).relative_to(ReferencePoint::ContentOrigin);
/// assert!(!middle.ignores_safe_area);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelativePosition {
    pub offset: f32,
    pub edge: Edge,
    pub point: ReferencePoint,
    pub ignores_safe_area: bool,
    /// When `false`, the drawer never rests higher than needed to show all of
    /// its content.
    pub ignores_content_size: bool,
}

impl RelativePosition {
    pub const fn new(offset: f32, edge: Edge) -> Self {
        Self {
            offset,
            edge,
            point: ReferencePoint::DrawerOrigin,
            ignores_safe_area: false,
            ignores_content_size: true,
        }
    }

    pub const fn from_top(offset: f32) -> Self {
        Self::new(offset, Edge::Top)
    }

    pub const fn from_bottom(offset: f32) -> Self {
        Self::new(offset, Edge::Bottom)
    }

    pub const fn relative_to(mut self, point: ReferencePoint) -> Self {
        self.point = point;
        self
    }

    pub const fn ignoring_safe_area(mut self, ignores: bool) -> Self {
        self.ignores_safe_area = ignores;
        self
    }

    pub const fn ignoring_content_size(mut self, ignores: bool) -> Self {
        self.ignores_content_size = ignores;
        self
    }

    /// Origin for this position without the content size constraint.
    pub fn origin_ignoring_content_size(&self, dependencies: &PositionDependencies) -> f32 {
        let mut result = match self.edge {
            Edge::Top => {
                let mut top = self.offset;
                if !self.ignores_safe_area {
                    top += dependencies.safe_area_insets.top;
                }
                top
            }
            Edge::Bottom => {
                let mut bottom = dependencies.bounds_height - self.offset;
                if !self.ignores_safe_area {
                    bottom -= dependencies.safe_area_insets.bottom;
                }
                bottom
            }
        };
        if self.point == ReferencePoint::ContentOrigin {
            result -= dependencies.header_height;
        }
        result
    }

    /// Origin for this position. `content_height` is the content size plus
    /// its vertical insets.
    pub fn origin(&self, dependencies: &PositionDependencies, content_height: f32) -> f32 {
        let candidate = self.origin_ignoring_content_size(dependencies);
        if self.ignores_content_size {
            return candidate;
        }
        let fits_content = RelativePosition::from_bottom(content_height)
            .relative_to(ReferencePoint::ContentOrigin)
            .origin_ignoring_content_size(dependencies);
        candidate.max(fits_content)
    }
}

impl Default for RelativePosition {
    fn default() -> Self {
        Self::from_top(0.0)
    }
}

#[cfg(test)]
#[path = "tests/position_tests.rs"]
mod tests;
