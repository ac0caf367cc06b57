//! Stateful drawer for UltraDrawer
//!
//! [`DrawerView`] maps [`DrawerState`]s to origins through declarative
//! [`RelativePosition`]s and keeps the snapping engine's anchors in sync with
//! layout.

pub mod drawer;
pub mod position;

pub use drawer::{DrawerView, DrawerViewListener};
pub use position::{DrawerState, Edge, PositionDependencies, ReferencePoint, RelativePosition};
pub use ultradrawer_foundation::{Completion, OriginChangeSource};

pub mod prelude {
    pub use crate::drawer::{DrawerView, DrawerViewListener};
    pub use crate::position::{DrawerState, ReferencePoint, RelativePosition};
    pub use ultradrawer_foundation::prelude::*;
}
