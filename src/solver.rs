//! Impulse based contact resolution and positional correction.

use crate::{
    body::Body,
    config::SolverConfig,
    math::{cross, cross_sv},
    narrow::Manifold,
    Fp, Vec2,
};

#[inline]
fn relative_velocity(a: &Body, ra: Vec2, b: &Body, rb: Vec2) -> Vec2 {
    //! Velocity of `b`'s contact point relative to `a`'s.
    b.motion.velocity + cross_sv(b.motion.omega, rb) - a.motion.velocity - cross_sv(a.motion.omega, ra)
}

pub fn resolve(a: &mut Body, b: &mut Body, m: &Manifold, config: &SolverConfig) {
    //! Applies normal and friction impulses at every contact of `m`, in sequence.
    let (ma, mb) = (a.mass(), b.mass());
    let count = m.contact_count as Fp;

    for &contact in m.contacts() {
        let ra = contact - a.transform.position;
        let rb = contact - b.transform.position;

        let rv = relative_velocity(a, ra, b, rb);
        let speed = rv.dot(m.normal);
        // already separating
        if speed > 0.0 {
            continue;
        }

        let racn = cross(ra, m.normal);
        let rbcn = cross(rb, m.normal);
        let inv_mass_sum = ma.inv_mass + racn * racn * ma.inv_inertia + mb.inv_mass + rbcn * rbcn * mb.inv_inertia;
        if inv_mass_sum <= 0.0 {
            continue;
        }

        let e = Fp::min(a.material.restitution, b.material.restitution);
        let j = -(1.0 + e) * speed / inv_mass_sum / count;

        let impulse = m.normal * j;
        a.apply_impulse(-impulse, ra);
        b.apply_impulse(impulse, rb);

        // head-on, no tangential motion to resist
        if rv.length_squared() - speed * speed < config.head_on_epsilon {
            continue;
        }

        let rv = relative_velocity(a, ra, b, rb);
        let tangent = (rv - m.normal * rv.dot(m.normal)).normalize_or_zero();
        let jt = -rv.dot(tangent) / inv_mass_sum / count;

        let static_coef = (a.material.static_friction + b.material.static_friction) * config.friction_blend;
        let friction = if jt.abs() < j * static_coef {
            tangent * jt
        } else {
            let dynamic_coef = (a.material.dynamic_friction + b.material.dynamic_friction) * config.friction_blend;
            tangent * -j * dynamic_coef
        };

        a.apply_impulse(-friction, ra);
        b.apply_impulse(friction, rb);
    }
}

#[inline]
fn correction(m: &Manifold, config: &SolverConfig) -> Vec2 {
    m.normal * Fp::max(m.penetration - config.slop, 0.0) * config.correction_percent
}

pub fn correct_positions(a: &mut Body, b: &mut Body, m: &Manifold, config: &SolverConfig) {
    //! Pushes both bodies apart along the normal, split by their share of the inverse mass.
    let (ia, ib) = (a.mass().inv_mass, b.mass().inv_mass);
    let total = ia + ib;
    if total <= 0.0 {
        return;
    }

    let correction = correction(m, config);
    let share = ia / total;
    a.transform.position -= correction * share;
    b.transform.position += correction * (1.0 - share);
}

pub fn correct_positions_static(a: &mut Body, m: &Manifold, config: &SolverConfig) {
    //! Pushes `a` out of a static body along the normal.
    if a.is_static() {
        return;
    }
    a.transform.position -= correction(m, config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyHandle, Circle, MassData, Material, Motion, Transform};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn body(inv_mass: Fp, position: Vec2, velocity: Vec2, material: Material) -> Body {
        let mass = if inv_mass == 0.0 { MassData::new(Fp::INFINITY, Fp::INFINITY) } else { MassData::new(1.0 / inv_mass, 1.0) };
        Body::new(BodyHandle(0), Circle::new(1.0).into(), mass, Transform::at(position), material, Motion::with_velocity(velocity))
    }

    fn head_on(normal: Vec2, contact: Vec2, penetration: Fp) -> Manifold {
        Manifold::single(normal, penetration, contact)
    }

    #[test]
    fn elastic_exchange() {
        // equal masses, e = 1: velocities swap along the normal
        let bouncy = Material::new(1.0, 0.0, 0.0);
        let mut a = body(1.0, Vec2::new(-1.0, 0.0), Vec2::new(2.0, 0.0), bouncy);
        let mut b = body(1.0, Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0), bouncy);
        let m = head_on(Vec2::X, Vec2::ZERO, 0.0);

        resolve(&mut a, &mut b, &m, &SolverConfig::default());
        assert_abs_diff_eq!(a.motion.velocity, Vec2::new(-1.0, 0.0), epsilon = 1e-6);
        assert_abs_diff_eq!(b.motion.velocity, Vec2::new(2.0, 0.0), epsilon = 1e-6);
        assert_eq!(a.motion.omega, 0.0);
        assert_eq!(b.motion.omega, 0.0);
    }

    #[test]
    fn inelastic_against_static() {
        let dull = Material::new(0.0, 0.0, 0.0);
        let mut a = body(1.0, Vec2::new(0.0, 1.0), Vec2::new(0.0, -3.0), dull);
        let mut floor = body(0.0, Vec2::ZERO, Vec2::ZERO, dull);
        let m = head_on(Vec2::new(0.0, -1.0), Vec2::new(0.0, 0.0), 0.0);

        resolve(&mut a, &mut floor, &m, &SolverConfig::default());
        assert_abs_diff_eq!(a.motion.velocity, Vec2::ZERO, epsilon = 1e-6);
        assert_eq!(floor.motion.velocity, Vec2::ZERO);
        assert_eq!(floor.motion.omega, 0.0);
    }

    #[test]
    fn separating_contacts_are_skipped() {
        let mut a = body(1.0, Vec2::new(-1.0, 0.0), Vec2::new(-1.0, 0.0), Material::default());
        let mut b = body(1.0, Vec2::new(1.0, 0.0), Vec2::new(1.0, 0.0), Material::default());
        let m = head_on(Vec2::X, Vec2::ZERO, 0.5);

        resolve(&mut a, &mut b, &m, &SolverConfig::default());
        assert_eq!(a.motion.velocity, Vec2::new(-1.0, 0.0));
        assert_eq!(b.motion.velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn friction_opposes_sliding() {
        // sliding right while landing on a static floor
        let rough = Material::new(0.0, 0.5, 0.3);
        let mut a = body(1.0, Vec2::new(0.0, 1.0), Vec2::new(4.0, -1.0), rough);
        let mut floor = body(0.0, Vec2::ZERO, Vec2::ZERO, rough);
        let m = head_on(Vec2::new(0.0, -1.0), Vec2::new(0.0, 0.0), 0.0);

        resolve(&mut a, &mut floor, &m, &SolverConfig::default());
        let v = a.motion.velocity;
        assert_abs_diff_eq!(v.y, 0.0, epsilon = 1e-6);
        assert!(v.x < 4.0 && v.x > 0.0, "{:?}", v);
        // dynamic friction: capped at j * mu_d
        let mu_d = 0.6 * crate::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(v.x, 4.0 - mu_d, epsilon = 1e-5);
    }

    #[test]
    fn static_friction_holds() {
        // slow slide, high static friction: the tangential impulse is not capped
        let grippy = Material::new(0.0, 1.0, 0.8);
        let mut a = body(1.0, Vec2::new(0.0, 1.0), Vec2::new(0.1, -1.0), grippy);
        let mut floor = body(0.0, Vec2::ZERO, Vec2::ZERO, grippy);
        let m = head_on(Vec2::new(0.0, -1.0), Vec2::new(0.0, 0.0), 0.0);

        resolve(&mut a, &mut floor, &m, &SolverConfig::default());
        assert_abs_diff_eq!(a.motion.velocity, Vec2::ZERO, epsilon = 1e-6);
        assert_eq!(floor.motion.velocity, Vec2::ZERO);
    }

    #[test]
    fn positional_correction() {
        let config = SolverConfig { slop: 0.1, correction_percent: 1.0, ..Default::default() };
        let m = head_on(Vec2::X, Vec2::ZERO, 0.5);

        let mut a = body(1.0, Vec2::ZERO, Vec2::ZERO, Material::default());
        let mut b = body(3.0, Vec2::ZERO, Vec2::ZERO, Material::default());
        correct_positions(&mut a, &mut b, &m, &config);
        assert_abs_diff_eq!(a.transform.position, Vec2::new(-0.1, 0.0), epsilon = 1e-6);
        assert_abs_diff_eq!(b.transform.position, Vec2::new(0.3, 0.0), epsilon = 1e-6);

        let mut a = body(1.0, Vec2::ZERO, Vec2::ZERO, Material::default());
        let mut floor = body(0.0, Vec2::ZERO, Vec2::ZERO, Material::default());
        correct_positions(&mut a, &mut floor, &m, &config);
        assert_abs_diff_eq!(a.transform.position, Vec2::new(-0.4, 0.0), epsilon = 1e-6);
        assert_eq!(floor.transform.position, Vec2::ZERO);

        let mut a = body(1.0, Vec2::ZERO, Vec2::ZERO, Material::default());
        correct_positions_static(&mut a, &m, &config);
        assert_abs_diff_eq!(a.transform.position, Vec2::new(-0.4, 0.0), epsilon = 1e-6);

        // within slop
        let shallow = head_on(Vec2::X, Vec2::ZERO, 0.05);
        let mut a = body(1.0, Vec2::ZERO, Vec2::ZERO, Material::default());
        correct_positions_static(&mut a, &shallow, &config);
        assert_eq!(a.transform.position, Vec2::ZERO);
    }
}
