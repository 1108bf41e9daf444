//! Simulation tuning, passed to [`World::new`](crate::World::new).

use crate::{consts::FRAC_1_SQRT_2, error::PhysicsError, Fp, Result, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Contact solver constants.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SolverConfig {
    /// Penetration allowed before positional correction kicks in.
    pub slop: Fp,
    /// Fraction of the remaining penetration removed per correction, `0.0..=1.0`.
    pub correction_percent: Fp,
    /// Friction coefficients of both bodies are combined as `(a + b) * friction_blend`.
    pub friction_blend: Fp,
    /// Tangential relative speed (squared) below which a contact is treated as head-on and gets no friction.
    pub head_on_epsilon: Fp,
}
impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            slop: 0.25,
            correction_percent: 1.0,
            friction_blend: FRAC_1_SQRT_2,
            head_on_epsilon: 0.0001,
        }
    }
}

/// Narrowphase constants.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct NarrowConfig {
    /// Reference face selection keeps the first polygon while
    /// `pen_a >= pen_b * bias_relative + pen_a * bias_absolute`.
    pub bias_relative: Fp,
    pub bias_absolute: Fp,
    /// Separation under which a circle's center counts as inside a polygon.
    pub inside_epsilon: Fp,
}
impl Default for NarrowConfig {
    fn default() -> Self {
        NarrowConfig {
            bias_relative: 0.95,
            bias_absolute: 0.01,
            inside_epsilon: 0.0001,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct WorldConfig {
    /// Fixed interval advanced by each step, in seconds.
    pub timestep: Fp,
    /// Maximum number of bodies, dynamic and static combined.
    pub capacity: usize,
    pub gravity: Vec2,
    /// Cap on the steps a single `World::advance` call may take. Time beyond it is dropped.
    pub max_steps_per_advance: u32,
    pub solver: SolverConfig,
    pub narrow: NarrowConfig,
}
impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            timestep: 0.01,
            capacity: 1000,
            gravity: Vec2::ZERO,
            max_steps_per_advance: 64,
            solver: SolverConfig::default(),
            narrow: NarrowConfig::default(),
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        //! Rejects configurations that would make stepping meaningless or produce NaNs.
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(PhysicsError::InvalidConfig("timestep must be finite and positive"));
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig("gravity must be finite"));
        }
        if self.max_steps_per_advance == 0 {
            return Err(PhysicsError::InvalidConfig("max_steps_per_advance must be at least 1"));
        }

        let s = &self.solver;
        if !(s.slop.is_finite() && s.slop >= 0.0) {
            return Err(PhysicsError::InvalidConfig("slop must be finite and non-negative"));
        }
        if !(0.0..=1.0).contains(&s.correction_percent) {
            return Err(PhysicsError::InvalidConfig("correction_percent must lie within 0..=1"));
        }
        if !(s.friction_blend.is_finite() && s.friction_blend >= 0.0) {
            return Err(PhysicsError::InvalidConfig("friction_blend must be finite and non-negative"));
        }
        if !(s.head_on_epsilon.is_finite() && s.head_on_epsilon >= 0.0) {
            return Err(PhysicsError::InvalidConfig("head_on_epsilon must be finite and non-negative"));
        }

        let n = &self.narrow;
        if !(n.bias_relative.is_finite() && n.bias_absolute.is_finite()) {
            return Err(PhysicsError::InvalidConfig("sat bias constants must be finite"));
        }
        if !(n.inside_epsilon.is_finite() && n.inside_epsilon >= 0.0) {
            return Err(PhysicsError::InvalidConfig("inside_epsilon must be finite and non-negative"));
        }
        Ok(())
    }

    #[inline]
    pub fn half_timestep(&self) -> Fp {
        self.timestep * 0.5
    }
}
