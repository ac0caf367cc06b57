//! Gesture events fed into the engine by the host.

mod pan;

pub use pan::PanGesture;
