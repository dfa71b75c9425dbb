//! Ambient particle backdrop
//!
//! Particles drift, reflect off the surface edges and are pushed away from
//! the pointer. Any two particles closer than `LINK_DISTANCE` are joined by
//! a line that fades with distance.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::reflect_axis;
use crate::consts::*;

/// rgba(103, 232, 249, 0.5)
pub const PARTICLE_COLOR: [f32; 4] = [103.0 / 255.0, 232.0 / 255.0, 249.0 / 255.0, 0.5];

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub radius: f32,
}

/// Proximity edge between particles `a < b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    /// 1 at zero distance, 0 at `LINK_DISTANCE`
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    pub particles: Vec<Particle>,
    size: Vec2,
    pointer: Option<Vec2>,
    /// Pixels squared per particle
    area_per_particle: f32,
    max_particles: usize,
    rng: Pcg32,
}

impl ParticleField {
    pub fn new(seed: u64, max_particles: usize, area_per_particle: f32) -> Self {
        Self {
            particles: Vec::new(),
            size: Vec2::ZERO,
            pointer: None,
            area_per_particle: area_per_particle.max(1.0),
            max_particles,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Population for a surface of `size`
    pub fn population_for(&self, size: Vec2) -> usize {
        let n = (size.x.max(0.0) * size.y.max(0.0) / self.area_per_particle).floor() as usize;
        n.min(self.max_particles)
    }

    /// New surface size; throws away the old population
    pub fn resize(&mut self, size: Vec2) {
        self.size = size.max(Vec2::ZERO);
        let count = self.population_for(self.size);

        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let pos = Vec2::new(
                self.rng.random::<f32>() * self.size.x,
                self.rng.random::<f32>() * self.size.y,
            );
            let vel = Vec2::new(
                self.rng.random_range(-PARTICLE_MAX_SPEED..=PARTICLE_MAX_SPEED),
                self.rng.random_range(-PARTICLE_MAX_SPEED..=PARTICLE_MAX_SPEED),
            );
            let radius = PARTICLE_MIN_RADIUS + self.rng.random::<f32>() * PARTICLE_RADIUS_RANGE;
            self.particles.push(Particle { pos, vel, radius });
        }

        log::info!(
            "Background populated with {} particles ({}x{})",
            count,
            self.size.x,
            self.size.y
        );
    }

    /// Pointer in surface coordinates, or None when it left
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    pub fn tick(&mut self, dt: f32) {
        let size = self.size;
        for p in &mut self.particles {
            if let Some(pointer) = self.pointer {
                let away = p.pos - pointer;
                let d = away.length();
                if d > 0.0 && d < REPULSION_RADIUS {
                    let force = (REPULSION_RADIUS - d) / REPULSION_RADIUS;
                    p.vel += away / d * force * REPULSION_STRENGTH;
                }
            }

            p.pos += p.vel * dt;
            reflect_axis(&mut p.pos.x, &mut p.vel.x, 0.0, size.x);
            reflect_axis(&mut p.pos.y, &mut p.vel.y, 0.0, size.y);

            p.vel *= PARTICLE_DAMPING;
        }
    }

    /// Every pair closer than `LINK_DISTANCE`
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for (a, pa) in self.particles.iter().enumerate() {
            for (offset, pb) in self.particles[a + 1..].iter().enumerate() {
                let d = pa.pos.distance(pb.pos);
                if d < LINK_DISTANCE {
                    links.push(Link {
                        a,
                        b: a + 1 + offset,
                        alpha: 1.0 - d / LINK_DISTANCE,
                    });
                }
            }
        }
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field(size: Vec2) -> ParticleField {
        let mut field = ParticleField::new(3, 500, PARTICLE_AREA);
        field.resize(size);
        field
    }

    #[test]
    fn test_population() {
        let f = field(Vec2::new(1000.0, 500.0));
        assert_eq!(f.particles.len(), 25);
        for p in &f.particles {
            assert!(p.radius >= PARTICLE_MIN_RADIUS);
            assert!(p.radius < PARTICLE_MIN_RADIUS + PARTICLE_RADIUS_RANGE + 1e-4);
        }

        // Capped by quality
        let mut capped = ParticleField::new(3, 10, PARTICLE_AREA);
        capped.resize(Vec2::new(1000.0, 500.0));
        assert_eq!(capped.particles.len(), 10);

        // Degenerate surface
        let empty = field(Vec2::new(0.0, 300.0));
        assert!(empty.particles.is_empty());
    }

    #[test]
    fn test_pointer_repels() {
        let mut f = field(Vec2::new(400.0, 400.0));
        f.particles = vec![Particle {
            pos: Vec2::new(200.0, 200.0),
            vel: Vec2::ZERO,
            radius: 1.0,
        }];
        f.set_pointer(Some(Vec2::new(150.0, 200.0)));
        f.tick(SIM_DT);

        let p = &f.particles[0];
        let expected = 0.5 * REPULSION_STRENGTH * PARTICLE_DAMPING;
        assert!((p.vel.x - expected).abs() < 1e-4);
        assert_eq!(p.vel.y, 0.0);
        assert!(p.pos.x > 200.0);
    }

    #[test]
    fn test_pointer_absent_or_far() {
        let mut f = field(Vec2::new(400.0, 400.0));
        f.particles = vec![Particle {
            pos: Vec2::new(200.0, 200.0),
            vel: Vec2::new(10.0, 0.0),
            radius: 1.0,
        }];
        f.set_pointer(Some(Vec2::new(50.0, 50.0)));
        f.tick(SIM_DT);
        assert!((f.particles[0].vel.x - 10.0 * PARTICLE_DAMPING).abs() < 1e-4);

        f.set_pointer(None);
        f.tick(SIM_DT);
        let v = 10.0 * PARTICLE_DAMPING * PARTICLE_DAMPING;
        assert!((f.particles[0].vel.x - v).abs() < 1e-4);
    }

    #[test]
    fn test_links() {
        let mut f = field(Vec2::new(400.0, 400.0));
        let at = |x: f32, y: f32| Particle {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            radius: 1.0,
        };
        f.particles = vec![at(0.0, 0.0), at(60.0, 0.0), at(300.0, 300.0)];

        let links = f.links();
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].a, links[0].b), (0, 1));
        assert!((links[0].alpha - 0.5).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_particles_stay_on_surface(
            seed in any::<u64>(),
            w in 50.0f32..1500.0,
            h in 50.0f32..1000.0,
            px in -200.0f32..1700.0,
            py in -200.0f32..1200.0,
            ticks in 1usize..200,
        ) {
            let mut f = ParticleField::new(seed, 200, PARTICLE_AREA);
            f.resize(Vec2::new(w, h));
            f.set_pointer(Some(Vec2::new(px, py)));
            for _ in 0..ticks {
                f.tick(SIM_DT);
            }
            for p in &f.particles {
                prop_assert!(p.pos.x >= 0.0 && p.pos.x <= w);
                prop_assert!(p.pos.y >= 0.0 && p.pos.y <= h);
            }
        }
    }
}
