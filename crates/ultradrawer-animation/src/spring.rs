//! Damped harmonic oscillator trajectories.
//!
//! A [`Spring`] describes the physical oscillator. Combined with an initial
//! displacement from the rest position and an initial velocity it yields a
//! [`SpringTimingParameters`], which answers position, velocity and envelope
//! queries in closed form at any time.

use std::fmt;
use std::time::Duration;

/// Errors produced when describing a spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpringError {
    /// Damping ratio outside `(0, 1]`. Overdamped springs are not modelled.
    InvalidDampingRatio(f32),
    /// Mass must be finite and positive.
    InvalidMass(f32),
    /// Stiffness must be finite and positive.
    InvalidStiffness(f32),
}

impl fmt::Display for SpringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpringError::InvalidDampingRatio(ratio) => {
                write!(f, "damping ratio {ratio} is outside the supported range (0, 1]")
            }
            SpringError::InvalidMass(mass) => write!(f, "spring mass {mass} must be positive"),
            SpringError::InvalidStiffness(stiffness) => {
                write!(f, "spring stiffness {stiffness} must be positive")
            }
        }
    }
}

impl std::error::Error for SpringError {}

/// Physical description of a damped spring.
///
/// Fields stay private so every value in circulation has passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    mass: f32,
    stiffness: f32,
    damping_ratio: f32,
}

impl Spring {
    /// Unit mass, stiffness 200, critically damped.
    pub const DEFAULT: Spring = Spring {
        mass: 1.0,
        stiffness: 200.0,
        damping_ratio: 1.0,
    };

    pub fn new(mass: f32, stiffness: f32, damping_ratio: f32) -> Result<Self, SpringError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SpringError::InvalidMass(mass));
        }
        if !(stiffness.is_finite() && stiffness > 0.0) {
            return Err(SpringError::InvalidStiffness(stiffness));
        }
        if !(damping_ratio > 0.0 && damping_ratio <= 1.0) {
            return Err(SpringError::InvalidDampingRatio(damping_ratio));
        }
        Ok(Self {
            mass,
            stiffness,
            damping_ratio,
        })
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    pub fn damping_ratio(&self) -> f32 {
        self.damping_ratio
    }

    pub fn is_critically_damped(&self) -> bool {
        self.damping_ratio >= 1.0
    }

    /// Damping coefficient `2ζ√(mk)`.
    pub fn damping(&self) -> f32 {
        2.0 * self.damping_ratio * (self.mass * self.stiffness).sqrt()
    }

    /// Envelope decay rate `damping / 2m`.
    pub fn beta(&self) -> f32 {
        self.damping() / (2.0 * self.mass)
    }

    /// Undamped angular frequency `√(k/m)`.
    pub fn natural_frequency(&self) -> f32 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Angular frequency of the damped oscillation. Zero when critically damped.
    pub fn damped_natural_frequency(&self) -> f32 {
        let damping_term = (1.0 - self.damping_ratio * self.damping_ratio).max(0.0);
        self.natural_frequency() * damping_term.sqrt()
    }
}

impl Default for Spring {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Animation curve selection for drawer moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationParameters {
    Spring(Spring),
}

impl Default for AnimationParameters {
    fn default() -> Self {
        AnimationParameters::Spring(Spring::DEFAULT)
    }
}

/// Queries on a decaying trajectory that settles at zero displacement.
pub trait DampingTimingParameters {
    /// Time until the envelope decays below the threshold.
    fn duration(&self) -> Duration;

    /// Displacement from rest at `time`.
    fn value(&self, time: Duration) -> f32;

    /// Magnitude used to decide when the motion has settled.
    fn amplitude(&self, time: Duration) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Oscillation {
    Underdamped { c1: f32, c2: f32, beta: f32, omega: f32 },
    Critical { c1: f32, c2: f32, beta: f32 },
}

/// Closed-form trajectory of a spring released with a given displacement and
/// velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringTimingParameters {
    spring: Spring,
    displacement: f32,
    initial_velocity: f32,
    threshold: f32,
    oscillation: Oscillation,
}

impl SpringTimingParameters {
    /// `displacement` is the signed offset from rest; `initial_velocity` is in
    /// the same units per second.
    pub fn new(spring: Spring, displacement: f32, initial_velocity: f32, threshold: f32) -> Self {
        let beta = spring.beta();
        let oscillation = if spring.is_critically_damped() {
            Oscillation::Critical {
                c1: displacement,
                c2: initial_velocity + beta * displacement,
                beta,
            }
        } else {
            let omega = spring.damped_natural_frequency();
            Oscillation::Underdamped {
                c1: displacement,
                c2: (initial_velocity + beta * displacement) / omega,
                beta,
                omega,
            }
        };
        Self {
            spring,
            displacement,
            initial_velocity,
            threshold,
            oscillation,
        }
    }

    pub fn spring(&self) -> Spring {
        self.spring
    }

    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    pub fn initial_velocity(&self) -> f32 {
        self.initial_velocity
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Time derivative of [`value`](DampingTimingParameters::value).
    pub fn velocity(&self, time: Duration) -> f32 {
        let t = time.as_secs_f32();
        match self.oscillation {
            Oscillation::Underdamped {
                c1,
                c2,
                beta,
                omega,
            } => {
                let (sin, cos) = (omega * t).sin_cos();
                (-beta * t).exp()
                    * ((c2 * omega - beta * c1) * cos - (c1 * omega + beta * c2) * sin)
            }
            Oscillation::Critical { c1, c2, beta } => {
                (-beta * t).exp() * (c2 - beta * (c1 + c2 * t))
            }
        }
    }
}

impl DampingTimingParameters for SpringTimingParameters {
    fn duration(&self) -> Duration {
        if self.displacement == 0.0 && self.initial_velocity == 0.0 {
            return Duration::ZERO;
        }
        let seconds = match self.oscillation {
            Oscillation::Underdamped { c1, c2, beta, .. } => {
                ((c1.abs() + c2.abs()) / self.threshold).ln() / beta
            }
            Oscillation::Critical { c1, c2, beta } => {
                let position_term = (2.0 * c1.abs() / self.threshold).ln() / beta;
                let velocity_term = 2.0
                    * (4.0 * c2.abs() / (std::f32::consts::E * beta * self.threshold)).ln()
                    / beta;
                position_term.max(velocity_term)
            }
        };
        seconds_to_duration(seconds)
    }

    fn value(&self, time: Duration) -> f32 {
        let t = time.as_secs_f32();
        match self.oscillation {
            Oscillation::Underdamped {
                c1,
                c2,
                beta,
                omega,
            } => {
                let (sin, cos) = (omega * t).sin_cos();
                (-beta * t).exp() * (c1 * cos + c2 * sin)
            }
            Oscillation::Critical { c1, c2, beta } => (-beta * t).exp() * (c1 + c2 * t),
        }
    }

    fn amplitude(&self, time: Duration) -> f32 {
        match self.oscillation {
            Oscillation::Underdamped { c1, c2, beta, .. } => {
                (-beta * time.as_secs_f32()).exp() * (c1.abs() + c2.abs())
            }
            Oscillation::Critical { .. } => self.value(time).abs(),
        }
    }
}

fn seconds_to_duration(seconds: f32) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        Duration::ZERO
    } else {
        Duration::try_from_secs_f32(seconds).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
#[path = "tests/spring_tests.rs"]
mod tests;
