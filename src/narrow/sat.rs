//! Polygon-polygon separating axis test with reference face clipping.

use super::Manifold;
use crate::{
    body::{Poly, Transform},
    config::NarrowConfig,
    math::{rotate, rotate_cw90, to_local, to_world, unrotate},
    Fp, Vec2,
};

#[inline]
fn support(positions: &[Vec2], dir: Vec2) -> Vec2 {
    //! Returns the vertex furthest along `dir`.
    let mut best = Fp::NEG_INFINITY;
    let mut point = positions[0];
    for &v in positions {
        let d = v.dot(dir);
        if d > best {
            best = d;
            point = v;
        }
    }
    point
}

fn max_separation(a_tf: &Transform, a: &Poly, b_tf: &Transform, b: &Poly) -> (Fp, usize) {
    //! Finds the face of `a` that `b` penetrates least. Returns its separation and index.
    //! A positive separation is a separating axis.
    let mut best = Fp::NEG_INFINITY;
    let mut index = 0;
    for (i, (&v, &n)) in a.positions().iter().zip(a.normals()).enumerate() {
        // into b's body space
        let n = unrotate(rotate(n, a_tf.orientation), b_tf.orientation);
        let v = to_local(to_world(v, a_tf.position, a_tf.orientation), b_tf.position, b_tf.orientation);

        let s = n.dot(support(b.positions(), -n) - v);
        if s > best {
            best = s;
            index = i;
        }
    }
    (best, index)
}

fn incident_face(ref_tf: &Transform, reference: &Poly, ref_index: usize, inc_tf: &Transform, incident: &Poly) -> [Vec2; 2] {
    //! Returns the world space face of `incident` most anti-parallel to the reference face.
    let ref_normal = unrotate(rotate(reference.normals()[ref_index], ref_tf.orientation), inc_tf.orientation);

    let mut min_dot = Fp::INFINITY;
    let mut face = 0;
    for (i, &n) in incident.normals().iter().enumerate() {
        let d = ref_normal.dot(n);
        if d < min_dot {
            min_dot = d;
            face = i;
        }
    }

    let (v1, v2) = incident.face(face);
    [to_world(v1, inc_tf.position, inc_tf.orientation), to_world(v2, inc_tf.position, inc_tf.orientation)]
}

fn clip(normal: Vec2, offset: Fp, face: &mut [Vec2; 2]) -> usize {
    //! Clips `face` to the half plane `normal·p <= offset`. Returns the number of points kept.
    let mut out = *face;
    let mut count = 0;

    let d1 = normal.dot(face[0]) - offset;
    let d2 = normal.dot(face[1]) - offset;
    if d1 <= 0.0 {
        out[count] = face[0];
        count += 1;
    }
    if d2 <= 0.0 {
        out[count] = face[1];
        count += 1;
    }
    // straddles the plane, so exactly one point was kept above
    if d1 * d2 < 0.0 {
        let alpha = d1 / (d1 - d2);
        out[count] = face[0] + (face[1] - face[0]) * alpha;
        count += 1;
    }

    *face = out;
    count
}

pub fn poly_poly(a_tf: &Transform, a: &Poly, b_tf: &Transform, b: &Poly, config: &NarrowConfig) -> Option<Manifold> {
    //! Returns the manifold of `a` against `b`, with up to two contacts. The normal points from `a` to `b`.
    let (pen_a, face_a) = max_separation(a_tf, a, b_tf, b);
    if pen_a > 0.0 {
        return None;
    }
    let (pen_b, face_b) = max_separation(b_tf, b, a_tf, a);
    if pen_b > 0.0 {
        return None;
    }

    // biased toward a, to keep the normal from flickering between near equal faces
    let flip = !(pen_a >= pen_b * config.bias_relative + pen_a * config.bias_absolute);
    let (ref_tf, reference, ref_index, inc_tf, incident) =
        if flip { (b_tf, b, face_b, a_tf, a) } else { (a_tf, a, face_a, b_tf, b) };

    let mut face = incident_face(ref_tf, reference, ref_index, inc_tf, incident);

    let (v1, v2) = reference.face(ref_index);
    let v1 = to_world(v1, ref_tf.position, ref_tf.orientation);
    let v2 = to_world(v2, ref_tf.position, ref_tf.orientation);

    let side = (v2 - v1).normalize();
    let ref_normal = rotate_cw90(side);
    let ref_offset = ref_normal.dot(v1);

    // side planes of the reference face
    if clip(-side, -side.dot(v1), &mut face) < 2 {
        return None;
    }
    if clip(side, side.dot(v2), &mut face) < 2 {
        return None;
    }

    let mut contacts = [Vec2::ZERO; 2];
    let mut contact_count = 0;
    let mut penetration: Fp = 0.0;
    for &p in face.iter() {
        let separation = ref_normal.dot(p) - ref_offset;
        if separation <= 0.0 {
            contacts[contact_count] = p;
            contact_count += 1;
            penetration = penetration.max(-separation);
        }
    }
    if contact_count == 0 {
        return None;
    }

    let normal = if flip { -ref_normal } else { ref_normal };
    Some(Manifold { normal, penetration, contact_count, contacts })
}
