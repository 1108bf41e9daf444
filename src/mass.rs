//! Mass and moment of inertia of circles and convex polygons.

use crate::{
    body::MassData,
    consts::PI,
    error::PhysicsError,
    math::{cross, sign},
    Fp, Result, Vec2,
};

fn check_density(density: Fp) -> Result<()> {
    // zero and infinite densities both mark a static body
    if density.is_nan() || density < 0.0 {
        Err(PhysicsError::InvalidDensity(density))
    } else {
        Ok(())
    }
}

pub fn circle_mass(radius: Fp, density: Fp) -> Result<MassData> {
    //! `m = πr²ρ`, `I = ½πr⁴ρ`.
    if !(radius.is_finite() && radius > 0.0) {
        return Err(PhysicsError::InvalidRadius(radius));
    }
    check_density(density)?;

    let r2 = radius * radius;
    let mass = PI * r2 * density;
    let inertia = 0.5 * PI * r2 * r2 * density;
    Ok(MassData::new(mass, inertia))
}

pub fn poly_area(positions: &[Vec2]) -> Fp {
    //! Twice the signed area by the trapezoid formula. Negative for counter-clockwise winding.
    let len = positions.len();
    let mut area = 0.0;
    for i in 0..len {
        let a = positions[(i + len - 1) % len];
        let b = positions[i];
        area += (b.x - a.x) * (b.y + a.y);
    }
    area
}

pub(crate) fn is_degenerate(area: Fp, positions: &[Vec2]) -> bool {
    //! Whether `area`, as given by `poly_area`, is negligible next to the squared extent of `positions`.
    let origin = positions.first().copied().unwrap_or(Vec2::ZERO);
    let extent = positions.iter().fold(0.0, |max: Fp, &p| max.max((p - origin).length_squared()));
    !area.is_finite() || area.abs() <= Fp::EPSILON * extent
}

pub fn poly_mass(positions: &[Vec2], density: Fp) -> Result<MassData> {
    //! Integrates mass and inertia over the polygon's edges. Vertices must be relative to the center of mass.
    const K: Fp = 1.0 / 12.0;

    check_density(density)?;
    if positions.len() < 3 {
        return Err(PhysicsError::TooFewVertices(positions.len()));
    }

    let len = positions.len();
    let mut area = 0.0;
    let mut inertia = 0.0;
    for i in 0..len {
        let a = positions[(i + len - 1) % len];
        let b = positions[i];
        area += (b.x - a.x) * (b.y + a.y);
        inertia += K * cross(a, b) * (a.length_squared() + a.dot(b) + b.length_squared());
    }
    // inertia is nonzero whenever the area is
    if is_degenerate(area, positions) || !inertia.is_finite() {
        return Err(PhysicsError::DegenerateArea);
    }

    let mass = area * 0.5 * density * sign(area);
    let inertia = inertia * density * sign(inertia);
    Ok(MassData::new(mass, inertia))
}
