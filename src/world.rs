//! The simulation: body registry, pairwise contact resolution and integration.

use crate::{
    body::{Body, BodyHandle, Circle, Material, Motion, Poly, Transform},
    config::WorldConfig,
    mass::{circle_mass, poly_mass},
    narrow::collide,
    registry::Registry,
    solver::{correct_positions, correct_positions_static, resolve},
    Fp, Result, Vec2,
};

#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    registry: Registry,
    /// Unsimulated time carried between `advance` calls.
    accumulator: Fp,
}

impl World {
    pub fn new(config: WorldConfig) -> Result<World> {
        config.validate()?;
        Ok(World { registry: Registry::with_capacity(config.capacity), config, accumulator: 0.0 })
    }

    // ---------- Bodies ---------- //

    pub fn add_circle(&mut self, transform: Transform, material: Material, motion: Motion, density: Fp, radius: Fp) -> Result<BodyHandle> {
        //! Adds a circle. Zero or infinite `density` makes it static.
        let mass = circle_mass(radius, density)?;
        let handle = self.registry.insert(Circle::new(radius).into(), mass, transform, material, motion)?;
        tracing::debug!(handle = handle.id(), radius, is_static = mass.is_static(), "added circle");
        Ok(handle)
    }

    pub fn add_polygon(&mut self, transform: Transform, material: Material, motion: Motion, density: Fp, positions: &[Vec2], normals: &[Vec2]) -> Result<BodyHandle> {
        //! Adds a polygon from caller prepared geometry, which is copied.
        //!
        //! `positions` must be wound counter-clockwise around the center of mass, with `normals[i]` the
        //! outward unit normal of the edge `positions[i] -> positions[i + 1]`. Winding is not checked.
        let poly = Poly::from_raw(positions, normals)?;
        self.add_poly(transform, material, motion, density, poly)
    }

    pub fn add_poly(&mut self, transform: Transform, material: Material, motion: Motion, density: Fp, poly: Poly) -> Result<BodyHandle> {
        let mass = poly_mass(poly.positions(), density)?;
        let vertices = poly.vertex_count();
        let handle = self.registry.insert(poly.into(), mass, transform, material, motion)?;
        tracing::debug!(handle = handle.id(), vertices, is_static = mass.is_static(), "added polygon");
        Ok(handle)
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        //! Removes a body. Its handle is invalidated; other handles remain valid.
        let body = self.registry.remove(handle);
        if body.is_some() {
            tracing::debug!(handle = handle.id(), "removed body");
        }
        body
    }

    #[inline]
    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.registry.get(handle)
    }
    #[inline]
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.registry.get_mut(handle)
    }
    #[inline]
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.registry.contains(handle)
    }

    pub fn for_each_body<F: FnMut(&Body)>(&self, f: F) {
        //! Visits dynamic bodies, then static bodies.
        self.registry.iter().for_each(f)
    }
    pub fn for_each_body_mut<F: FnMut(&mut Body)>(&mut self, f: F) {
        //! Visits dynamic bodies, then static bodies.
        self.registry.iter_mut().for_each(f)
    }
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.registry.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.registry.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
    #[inline]
    pub fn capacity(&self) -> usize {
        self.registry.capacity()
    }

    // ---------- Settings ---------- //

    #[inline]
    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }
    #[inline]
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
    }
    #[inline]
    pub fn interval(&self) -> Fp {
        //! The fixed timestep of `step`.
        self.config.timestep
    }
    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ---------- Simulation ---------- //

    pub fn step(&mut self) {
        //! Advances the simulation by exactly one timestep.
        let WorldConfig { timestep, gravity, solver, narrow, .. } = self.config;
        let half_timestep = self.config.half_timestep();
        let (dynamic, statics) = self.registry.partitions_mut();

        let mut contacts = 0usize;
        for i in 0..dynamic.len() {
            // upper triangle of the dynamic pairs
            for j in (i + 1)..dynamic.len() {
                let (head, tail) = dynamic.split_at_mut(j);
                let (a, b) = (&mut head[i], &mut tail[0]);
                if let Some(m) = collide(a, b, &narrow) {
                    resolve(a, b, &m, &solver);
                    correct_positions(a, b, &m, &solver);
                    contacts += m.contact_count;
                }
            }

            let a = &mut dynamic[i];
            for b in statics.iter_mut() {
                if let Some(m) = collide(a, b, &narrow) {
                    resolve(a, b, &m, &solver);
                    correct_positions_static(a, &m, &solver);
                    contacts += m.contact_count;
                }
            }

            integrate(a, gravity, timestep, half_timestep);
            if !(a.transform.position.is_finite() && a.transform.orientation.is_finite()) {
                tracing::warn!(handle = a.handle().id(), "body left the step with a non-finite transform");
            }
        }

        tracing::trace!(bodies = dynamic.len() + statics.len(), contacts, "stepped");
    }

    pub fn advance(&mut self, elapsed: Fp) -> u32 {
        //! Accumulates `elapsed` real time and steps while a full timestep is available. Returns the steps taken.
        //!
        //! At most `max_steps_per_advance` steps are taken; any further backlog is dropped.
        if !(elapsed.is_finite() && elapsed > 0.0) {
            return 0;
        }

        let timestep = self.config.timestep;
        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= timestep {
            if steps == self.config.max_steps_per_advance {
                tracing::warn!(dropped = self.accumulator, "simulation fell behind, dropping time");
                self.accumulator = 0.0;
                break;
            }
            self.step();
            self.accumulator -= timestep;
            steps += 1;
        }
        steps
    }
}

impl Default for World {
    fn default() -> Self {
        World { config: WorldConfig::default(), registry: Registry::with_capacity(WorldConfig::default().capacity), accumulator: 0.0 }
    }
}

#[inline]
fn integrate(body: &mut Body, gravity: Vec2, timestep: Fp, half_timestep: Fp) {
    //! Half-step semi-implicit Euler. Clears the accumulated force and torque.
    let mass = body.mass();
    let motion = &mut body.motion;
    let transform = &mut body.transform;

    motion.velocity += (motion.force * mass.inv_mass + gravity) * half_timestep;
    transform.position += motion.velocity * timestep;
    motion.force = Vec2::ZERO;

    motion.omega += motion.torque * mass.inv_inertia * half_timestep;
    transform.orientation += motion.omega * timestep;
    motion.torque = 0.0;
}
