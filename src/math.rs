//! Vector and matrix helpers on top of glam's `Vec2`/`Mat2`.

use crate::{Fp, Mat2, Vec2};

#[inline]
pub fn rotate(v: Vec2, radians: Fp) -> Vec2 {
    //! Rotates `v` counter-clockwise by `radians`.
    Mat2::from_angle(radians) * v
}
#[inline]
pub fn unrotate(v: Vec2, radians: Fp) -> Vec2 {
    //! Inverse of `rotate`.
    Mat2::from_angle(radians).transpose() * v
}

#[inline]
pub fn cross(a: Vec2, b: Vec2) -> Fp {
    //! 2D cross product, the z component of `a × b`.
    a.perp_dot(b)
}
#[inline]
pub fn cross_sv(s: Fp, v: Vec2) -> Vec2 {
    //! Cross product of a scalar (z axis) with a vector: the tangential velocity of `v` spinning at `s`.
    (v * s).perp()
}

#[inline]
pub fn rotate_cw90(v: Vec2) -> Vec2 {
    -v.perp()
}

#[inline]
pub fn sign(x: Fp) -> Fp {
    //! `-1.0` for negative values, `1.0` otherwise.
    if x < 0.0 { -1.0 } else { 1.0 }
}

#[inline]
pub fn to_world(local: Vec2, position: Vec2, orientation: Fp) -> Vec2 {
    rotate(local, orientation) + position
}
#[inline]
pub fn to_local(world: Vec2, position: Vec2, orientation: Fp) -> Vec2 {
    unrotate(world - position, orientation)
}
