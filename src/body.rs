//! Rigid bodies and the shapes they carry.

use crate::{
    consts::TAU,
    error::PhysicsError,
    mass::{is_degenerate, poly_area},
    math::{cross, rotate_cw90},
    Fp, Result, Vec2,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Surface response of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    /// Elasticity, `0.0..=1.0`. The lower of both bodies' values is used.
    pub restitution: Fp,
    /// Friction while resting.
    pub static_friction: Fp,
    /// Friction while sliding.
    pub dynamic_friction: Fp,
}
impl Material {
    #[inline]
    pub fn new(restitution: Fp, static_friction: Fp, dynamic_friction: Fp) -> Material {
        Material { restitution, static_friction, dynamic_friction }
    }
}
impl Default for Material {
    fn default() -> Self {
        Material::new(0.1, 0.5, 0.3)
    }
}

/// Placement in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform {
    pub position: Vec2,
    /// Counter-clockwise rotation in radians.
    pub orientation: Fp,
    /// Carried for presentation, ignored by the dynamics.
    pub scale: Fp,
}
impl Transform {
    #[inline]
    pub fn new(position: Vec2, orientation: Fp) -> Transform {
        Transform { position, orientation, scale: 1.0 }
    }
    #[inline]
    pub fn at(position: Vec2) -> Transform {
        Transform::new(position, 0.0)
    }
}
impl Default for Transform {
    fn default() -> Self {
        Transform::at(Vec2::ZERO)
    }
}

/// Linear and angular motion. `force` and `torque` are accumulated by the caller and cleared every step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Motion {
    pub velocity: Vec2,
    pub force: Vec2,
    /// Angular velocity.
    pub omega: Fp,
    pub torque: Fp,
}
impl Motion {
    #[inline]
    pub fn with_velocity(velocity: Vec2) -> Motion {
        Motion { velocity, ..Default::default() }
    }
}

/// Mass properties, fixed once a body is added. Zero inverses mark a static body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MassData {
    pub mass: Fp,
    pub inv_mass: Fp,
    pub inertia: Fp,
    pub inv_inertia: Fp,
}
impl MassData {
    pub fn new(mass: Fp, inertia: Fp) -> MassData {
        //! Zero or infinite mass yields a static body, with both inverses zeroed.
        if mass == 0.0 || !mass.is_finite() {
            MassData { mass, inv_mass: 0.0, inertia, inv_inertia: 0.0 }
        } else {
            let inv_inertia = if inertia == 0.0 || !inertia.is_finite() { 0.0 } else { 1.0 / inertia };
            MassData { mass, inv_mass: 1.0 / mass, inertia, inv_inertia }
        }
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }
}

// ---------- Shapes ---------- //

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: Fp,
}
impl Circle {
    #[inline]
    pub fn new(radius: Fp) -> Circle {
        Circle { radius }
    }
}

/// A convex polygon in body space: counter-clockwise, centered on its center of mass.
///
/// `normals[i]` is the outward unit normal of the edge from `positions[i]` to `positions[i + 1]`, wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    positions: Vec<Vec2>,
    normals: Vec<Vec2>,
}
impl Poly {
    /// Wraps an arbitrary point cloud in its convex hull. Interior and duplicate points are dropped.
    pub fn new(points: &[Vec2]) -> Result<Poly> {
        check_vertices(points)?;

        let len = points.len();
        let mut start = 0;
        for (i, v) in points.iter().enumerate() {
            let s = points[start];
            if v.y > s.y || (v.y == s.y && v.x < s.x) {
                start = i;
            }
        }

        // giftwrap, counter-clockwise
        let mut hull = Vec::with_capacity(len);
        let mut current = start;
        loop {
            hull.push(points[current]);
            let origin = points[current];
            let mut next = (current + 1) % len;
            for (i, &p) in points.iter().enumerate() {
                let edge = points[next] - origin;
                let turn = cross(edge, p - origin);
                // p lies right of the candidate edge, or along it and further out
                if turn < 0.0 || (turn == 0.0 && (p - origin).length_squared() > edge.length_squared()) {
                    next = i;
                }
            }
            current = next;
            if points[current] == points[start] || hull.len() > len {
                break;
            }
        }

        Poly::new_from_wound(hull)
    }

    /// `points` must form a convex polygon in order. Either winding is accepted; the polygon is
    /// rewound counter-clockwise and recentered on its centroid.
    pub fn new_from_wound(mut points: Vec<Vec2>) -> Result<Poly> {
        check_vertices(&points)?;

        // positive trapezoid area means clockwise
        let area = poly_area(&points);
        if is_degenerate(area, &points) {
            return Err(PhysicsError::DegenerateArea);
        }
        if area > 0.0 {
            points.reverse();
        }

        let centroid = centroid(&points).ok_or(PhysicsError::DegenerateArea)?;
        for v in points.iter_mut() {
            *v -= centroid;
        }

        let len = points.len();
        let mut normals = Vec::with_capacity(len);
        for i in 0..len {
            let edge = points[(i + 1) % len] - points[i];
            normals.push(rotate_cw90(edge).normalize());
        }
        for (index, n) in normals.iter().enumerate() {
            if !n.is_finite() {
                return Err(PhysicsError::NonUnitNormal { index });
            }
        }

        Ok(Poly { positions: points, normals })
    }

    /// Takes copies of caller-computed geometry. Winding and centering are trusted, not re-derived.
    pub fn from_raw(positions: &[Vec2], normals: &[Vec2]) -> Result<Poly> {
        check_vertices(positions)?;
        if positions.len() != normals.len() {
            return Err(PhysicsError::NormalCountMismatch { positions: positions.len(), normals: normals.len() });
        }
        for (index, n) in normals.iter().enumerate() {
            if !approx::relative_eq!(n.length(), 1.0, epsilon = 1e-3) {
                return Err(PhysicsError::NonUnitNormal { index });
            }
        }
        Ok(Poly { positions: positions.to_vec(), normals: normals.to_vec() })
    }

    /// An axis aligned box of the given half extents, centered on the origin. The extents' signs are ignored.
    pub fn rect(half_w: Fp, half_h: Fp) -> Poly {
        let (half_w, half_h) = (half_w.abs(), half_h.abs());
        Poly {
            positions: vec![
                Vec2::new(-half_w, -half_h),
                Vec2::new(half_w, -half_h),
                Vec2::new(half_w, half_h),
                Vec2::new(-half_w, half_h),
            ],
            normals: vec![Vec2::new(0.0, -1.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(-1.0, 0.0)],
        }
    }

    /// A regular polygon with `count` vertices on a circle of `radius`.
    pub fn regular(count: usize, radius: Fp) -> Result<Poly> {
        if count < 3 {
            return Err(PhysicsError::TooFewVertices(count));
        }
        let step = TAU / count as Fp;
        let points = (0..count)
            .map(|i| {
                let (sin, cos) = (step * i as Fp).sin_cos();
                Vec2::new(cos, sin) * radius
            })
            .collect();
        Poly::new_from_wound(points)
    }

    #[inline]
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }
    #[inline]
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn face(&self, index: usize) -> (Vec2, Vec2) {
        //! Endpoints of edge `index`, in body space.
        (self.positions[index], self.positions[(index + 1) % self.positions.len()])
    }
}

fn check_vertices(points: &[Vec2]) -> Result<()> {
    if points.len() < 3 {
        return Err(PhysicsError::TooFewVertices(points.len()));
    }
    match points.iter().position(|p| !p.is_finite()) {
        Some(index) => Err(PhysicsError::NonFiniteVertex { index }),
        None => Ok(()),
    }
}

fn centroid(points: &[Vec2]) -> Option<Vec2> {
    //! Area weighted centroid of a simple polygon.
    let len = points.len();
    let mut area = 0.0;
    let mut sum = Vec2::ZERO;
    for i in 0..len {
        let a = points[i];
        let b = points[(i + 1) % len];
        let c = cross(a, b);
        area += c;
        sum += (a + b) * c;
    }
    if area == 0.0 { None } else { Some(sum / (3.0 * area)) }
}

/// The geometry a body collides with.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Poly(Poly),
}
impl Shape {
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Poly(_) => ShapeKind::Poly,
        }
    }
}
impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}
impl From<Poly> for Shape {
    fn from(poly: Poly) -> Self {
        Shape::Poly(poly)
    }
}

/// Shape discriminant, used to index the narrowphase dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle = 0,
    Poly = 1,
}
impl ShapeKind {
    pub const COUNT: usize = 2;
}

// ---------- Body ---------- //

/// Identifies a body within its `World`. Handles of removed bodies are never reissued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) u32);
impl BodyHandle {
    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    handle: BodyHandle,
    shape: Shape,
    mass: MassData,
    pub motion: Motion,
    pub material: Material,
    pub transform: Transform,
}
impl Body {
    pub(crate) fn new(handle: BodyHandle, shape: Shape, mass: MassData, transform: Transform, material: Material, motion: Motion) -> Body {
        Body { handle, shape, mass, motion, material, transform }
    }

    #[inline]
    pub fn handle(&self) -> BodyHandle {
        self.handle
    }
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }
    #[inline]
    pub fn mass(&self) -> MassData {
        self.mass
    }
    #[inline]
    pub fn is_static(&self) -> bool {
        self.mass.is_static()
    }

    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        //! Accumulates a force through the center of mass until the next step.
        self.motion.force += force;
    }
    #[inline]
    pub fn apply_torque(&mut self, torque: Fp) {
        self.motion.torque += torque;
    }
    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vec2, contact: Vec2) {
        //! Instantly changes velocity by `impulse` applied at `contact`, relative to the center of mass.
        self.motion.velocity += impulse * self.mass.inv_mass;
        self.motion.omega += cross(contact, impulse) * self.mass.inv_inertia;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mass::poly_mass;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn check_poly(poly: &Poly) {
        let len = poly.vertex_count();
        assert!(poly_area(poly.positions()) < 0.0, "not counter-clockwise");
        for i in 0..len {
            let (a, b) = poly.face(i);
            let n = poly.normals()[i];
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(n.dot(b - a), 0.0, epsilon = 1e-4);
            // every other vertex lies behind the face
            for &v in poly.positions() {
                assert!(n.dot(v - a) <= 1e-4);
            }
        }
    }

    #[test]
    fn hull() {
        let poly = Poly::new(&[
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.5, 0.5), // interior
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0), // duplicate
        ])
        .unwrap();
        assert_eq!(poly.vertex_count(), 4);
        check_poly(&poly);

        // recentered around the unit square's middle
        let sum = poly.positions().iter().fold(Vec2::ZERO, |acc, &v| acc + v);
        assert_abs_diff_eq!(sum, Vec2::ZERO, epsilon = 1e-5);
        assert!(poly.positions().contains(&Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn wound_either_way() {
        let cw = vec![Vec2::new(50.0, 50.0), Vec2::new(50.0, -50.0), Vec2::new(-50.0, -50.0), Vec2::new(-50.0, 50.0)];
        let poly = Poly::new_from_wound(cw).unwrap();
        check_poly(&poly);

        // triangle centroid, not vertex mean
        let tri = Poly::new_from_wound(vec![Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0), Vec2::new(0.0, 3.0)]).unwrap();
        check_poly(&tri);
        assert_abs_diff_eq!(tri.positions()[0], Vec2::new(-1.0, -1.0), epsilon = 1e-5);

        let hex = Poly::regular(6, 2.0).unwrap();
        assert_eq!(hex.vertex_count(), 6);
        check_poly(&hex);
    }

    #[test]
    fn rect() {
        let r = Poly::rect(2.0, 0.5);
        check_poly(&r);
        assert_eq!(Poly::from_raw(r.positions(), r.normals()), Ok(r.clone()));
        let m = poly_mass(r.positions(), 1.0).unwrap();
        assert_relative_eq!(m.mass, 4.0);
        // negative extents still wind counter-clockwise with outward normals
        let flipped = Poly::rect(-2.0, 0.5);
        check_poly(&flipped);
        assert_eq!(flipped, r);
        assert_eq!(Poly::rect(2.0, -0.5), r);
    }

    #[test]
    fn rejects_bad_geometry() {
        let r = Poly::rect(1.0, 1.0);
        assert_eq!(
            Poly::from_raw(r.positions(), &r.normals()[..3]),
            Err(PhysicsError::NormalCountMismatch { positions: 4, normals: 3 })
        );
        let mut normals = r.normals().to_vec();
        normals[2] *= 2.0;
        assert_eq!(Poly::from_raw(r.positions(), &normals), Err(PhysicsError::NonUnitNormal { index: 2 }));

        assert_eq!(Poly::new(&[Vec2::ZERO, Vec2::X]), Err(PhysicsError::TooFewVertices(2)));
        assert_eq!(
            Poly::new(&[Vec2::ZERO, Vec2::new(Fp::NAN, 0.0), Vec2::Y]),
            Err(PhysicsError::NonFiniteVertex { index: 1 })
        );
        assert_eq!(
            Poly::new_from_wound(vec![Vec2::ZERO, Vec2::X, Vec2::X * 2.0]),
            Err(PhysicsError::DegenerateArea)
        );
        assert_eq!(Poly::regular(2, 1.0), Err(PhysicsError::TooFewVertices(2)));
    }

    #[test]
    fn impulses() {
        let mass = MassData::new(2.0, 4.0);
        let mut body = Body::new(BodyHandle(0), Circle::new(1.0).into(), mass, Transform::default(), Material::default(), Motion::default());
        body.apply_impulse(Vec2::new(0.0, 2.0), Vec2::new(1.0, 0.0));
        assert_eq!(body.motion.velocity, Vec2::new(0.0, 1.0));
        assert_eq!(body.motion.omega, 0.5);

        body.apply_force(Vec2::X);
        body.apply_force(Vec2::X);
        body.apply_torque(-1.0);
        assert_eq!(body.motion.force, Vec2::new(2.0, 0.0));
        assert_eq!(body.motion.torque, -1.0);
        assert!(!body.is_static());
        assert_eq!(body.kind(), ShapeKind::Circle);
    }
}
