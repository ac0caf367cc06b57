//! Testing utilities and harness for UltraDrawer

pub mod recording;
pub mod robot;
pub mod robot_assertions;

pub use recording::{
    DrawerEvent, RecordingDrawerListener, RecordingSnappingListener, SnappingEvent,
};
pub use robot::*;

pub mod prelude {
    pub use crate::recording::*;
    pub use crate::robot::*;
    pub use crate::robot_assertions;
}
