//! A fixed-timestep 2D rigid body engine.
//!
//! Circles and convex polygons are stepped by a [`World`]: every dynamic body is tested against
//! every other body (no broadphase), overlapping pairs produce a [`Manifold`], which is resolved
//! with sequential impulses, Coulomb friction and positional correction before the body is
//! integrated with a half-step semi-implicit Euler scheme.
//!
//! ```
//! use rebound::{Material, Motion, Transform, Vec2, World, WorldConfig};
//!
//! let mut world = World::new(WorldConfig { gravity: Vec2::new(0.0, -100.0), ..Default::default() }).unwrap();
//! let floor = rebound::Poly::rect(400.0, 1.0);
//! world.add_poly(Transform::at(Vec2::new(400.0, 0.0)), Material::default(), Motion::default(), rebound::Fp::INFINITY, floor).unwrap();
//! let ball = world.add_circle(Transform::at(Vec2::new(400.0, 50.0)), Material::default(), Motion::default(), 1.0, 25.0).unwrap();
//!
//! world.advance(0.5);
//! assert!(world.get(ball).unwrap().transform.position.y < 50.0);
//! ```

pub mod body;
pub mod config;
pub mod error;
pub mod mass;
pub mod math;
pub mod narrow;
pub mod registry;
pub mod solver;
pub mod world;

#[cfg(not(feature = "f64"))]
pub type Fp = f32;
#[cfg(not(feature = "f64"))]
pub use glam::{Mat2, Vec2};
#[cfg(not(feature = "f64"))]
pub use std::f32::consts;

#[cfg(feature = "f64")]
pub type Fp = f64;
#[cfg(feature = "f64")]
pub use glam::{DMat2 as Mat2, DVec2 as Vec2};
#[cfg(feature = "f64")]
pub use std::f64::consts;

pub use body::{Body, BodyHandle, Circle, MassData, Material, Motion, Poly, Shape, ShapeKind, Transform};
pub use config::{NarrowConfig, SolverConfig, WorldConfig};
pub use error::{PhysicsError, Result};
pub use narrow::Manifold;
pub use world::World;
