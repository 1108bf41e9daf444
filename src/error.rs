//! Error types for rejected bodies and configurations.

use crate::Fp;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("world is at capacity ({capacity} bodies)")]
    CapacityExceeded { capacity: usize },

    #[error("every body handle has been issued")]
    HandlesExhausted,

    #[error("circle radius must be finite and positive, got {0}")]
    InvalidRadius(Fp),

    #[error("density must be zero, positive or infinite, got {0}")]
    InvalidDensity(Fp),

    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("polygon has {positions} positions but {normals} normals")]
    NormalCountMismatch { positions: usize, normals: usize },

    #[error("normal {index} is not unit length")]
    NonUnitNormal { index: usize },

    #[error("vertex {index} is not finite")]
    NonFiniteVertex { index: usize },

    #[error("polygon has no area")]
    DegenerateArea,

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
