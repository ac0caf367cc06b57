//! Animation system for UltraDrawer
//!
//! Three layers, leaves first:
//! - [`spring`]: closed-form damped harmonic oscillator trajectories.
//! - [`timer_animation`]: a per-frame driver that runs a step function until
//!   it reports completion.
//! - [`spring_animation`]: a retargetable session that binds the two to
//!   animate one scalar.
//!
//! [`projection`] holds the ballistic fling projection used to pick a target.

pub mod projection;
pub mod spring;
pub mod spring_animation;
pub mod timer_animation;

pub use projection::{project, DecelerationRate};
pub use spring::{
    AnimationParameters, DampingTimingParameters, Spring, SpringError, SpringTimingParameters,
};
pub use spring_animation::{SpringAnimation, SPRING_THRESHOLD};
pub use timer_animation::{TargetState, TimerAnimation};
