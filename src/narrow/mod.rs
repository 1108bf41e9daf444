//! Narrowphase data and logic module.

pub mod sat;

use crate::{
    body::{Body, Circle, Poly, Shape, ShapeKind, Transform},
    config::NarrowConfig,
    math::{rotate, to_local, to_world},
    Fp, Vec2,
};

pub use sat::poly_poly;

/// Describes how two overlapping bodies touch. Only valid for the step that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manifold {
    /// Unit normal pointing from the first body toward the second.
    pub normal: Vec2,
    /// Overlap depth along `normal`, non-negative.
    pub penetration: Fp,
    pub contact_count: usize,
    /// World space contact points. Only the first `contact_count` are meaningful.
    pub contacts: [Vec2; 2],
}
impl Manifold {
    #[inline]
    pub fn single(normal: Vec2, penetration: Fp, contact: Vec2) -> Manifold {
        Manifold { normal, penetration, contact_count: 1, contacts: [contact, Vec2::ZERO] }
    }

    #[inline]
    pub fn contacts(&self) -> &[Vec2] {
        &self.contacts[..self.contact_count]
    }

    #[inline]
    pub fn flip(mut self) -> Manifold {
        //! Swaps the roles of the two bodies.
        self.normal = -self.normal;
        self
    }
}

// ---------- Shape-Shape manifolds ---------- //

pub fn circle_circle(pa: Vec2, a: &Circle, pb: Vec2, b: &Circle) -> Option<Manifold> {
    let ab = pb - pa;
    let radii = a.radius + b.radius;
    if ab.length_squared() > radii * radii {
        return None;
    }

    let distance = ab.length();
    let normal = if distance > 0.0 {
        ab / distance
    } else {
        Vec2::new(0.0, 1.0) // centers coincide, any direction will do
    };
    Some(Manifold::single(normal, radii - distance, pa + normal * a.radius))
}

pub fn circle_poly(pos: Vec2, circle: &Circle, tf: &Transform, poly: &Poly, config: &NarrowConfig) -> Option<Manifold> {
    //! Circle centered at `pos` against `poly` placed by `tf`. The normal points from the circle to the polygon.
    let rad = circle.radius;
    let rot = tf.orientation;
    let center = to_local(pos, tf.position, rot);

    // face of least penetration
    let mut separation = Fp::NEG_INFINITY;
    let mut face = 0;
    for (i, (&v, &n)) in poly.positions().iter().zip(poly.normals()).enumerate() {
        let s = n.dot(center - v);
        if s > rad {
            return None;
        }
        if s > separation {
            separation = s;
            face = i;
        }
    }

    let face_normal = poly.normals()[face];
    if separation < config.inside_epsilon {
        let normal = -rotate(face_normal, rot);
        return Some(Manifold::single(normal, rad, pos + normal * rad));
    }

    let (v1, v2) = poly.face(face);
    let v1c = center - v1;
    let v2c = center - v2;
    let penetration = rad - separation;
    if v1c.dot(v2 - v1) < 0.0 {
        // vertex region of v1
        if v1c.length_squared() > rad * rad {
            return None;
        }
        let normal = rotate(v1 - center, rot).normalize();
        Some(Manifold::single(normal, penetration, to_world(v1, tf.position, rot)))
    } else if v2c.dot(v1 - v2) < 0.0 {
        // vertex region of v2
        if v2c.length_squared() > rad * rad {
            return None;
        }
        let normal = rotate(v2 - center, rot).normalize();
        Some(Manifold::single(normal, penetration, to_world(v2, tf.position, rot)))
    } else {
        if v1c.dot(face_normal) > rad {
            return None;
        }
        let normal = -rotate(face_normal, rot);
        Some(Manifold::single(normal, penetration, pos + normal * rad))
    }
}

#[inline]
pub fn poly_circle(tf: &Transform, poly: &Poly, pos: Vec2, circle: &Circle, config: &NarrowConfig) -> Option<Manifold> {
    //! Delegates to `circle_poly`, flipping the normal back to point from the polygon to the circle.
    circle_poly(pos, circle, tf, poly, config).map(Manifold::flip)
}

// ---------- Dispatch ---------- //

pub fn collide(a: &Body, b: &Body, config: &NarrowConfig) -> Option<Manifold> {
    //! Returns the manifold of `a` against `b`, if they overlap. The normal points from `a` toward `b`.

    // jump table indexed by shape kind; each entry only receives its own pair of kinds
    fn circle_circle_inter(a: &Body, b: &Body, _: &NarrowConfig) -> Option<Manifold> {
        match (a.shape(), b.shape()) {
            (Shape::Circle(ca), Shape::Circle(cb)) => circle_circle(a.transform.position, ca, b.transform.position, cb),
            _ => unreachable!("dispatch table indexed by shape kind"),
        }
    }
    fn circle_poly_inter(a: &Body, b: &Body, config: &NarrowConfig) -> Option<Manifold> {
        match (a.shape(), b.shape()) {
            (Shape::Circle(c), Shape::Poly(p)) => circle_poly(a.transform.position, c, &b.transform, p, config),
            _ => unreachable!("dispatch table indexed by shape kind"),
        }
    }
    fn poly_circle_inter(a: &Body, b: &Body, config: &NarrowConfig) -> Option<Manifold> {
        match (a.shape(), b.shape()) {
            (Shape::Poly(p), Shape::Circle(c)) => poly_circle(&a.transform, p, b.transform.position, c, config),
            _ => unreachable!("dispatch table indexed by shape kind"),
        }
    }
    fn poly_poly_inter(a: &Body, b: &Body, config: &NarrowConfig) -> Option<Manifold> {
        match (a.shape(), b.shape()) {
            (Shape::Poly(pa), Shape::Poly(pb)) => poly_poly(&a.transform, pa, &b.transform, pb, config),
            _ => unreachable!("dispatch table indexed by shape kind"),
        }
    }

    type CollideHeader = fn(&Body, &Body, &NarrowConfig) -> Option<Manifold>;
    const COLLIDE_JUMP_TABLE: [[CollideHeader; ShapeKind::COUNT]; ShapeKind::COUNT] = [
        [circle_circle_inter, circle_poly_inter],
        [poly_circle_inter, poly_poly_inter],
    ];
    COLLIDE_JUMP_TABLE[a.kind() as usize][b.kind() as usize](a, b, config)
}
