// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::catalog::SNIPPETS;
use crate::particle::Particle;
use crate::surface::Surface;

pub const POOL_SIZE: usize = 20;

/// The fixed pool of drifting fragments. Particles are only ever recycled
/// in place; nothing adds to or removes from the pool.
#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: [Particle; POOL_SIZE],
    catalog: &'static [&'static str],
}

impl ParticleField {
    pub fn seed<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> Self {
        Self::seed_with(width, height, &SNIPPETS, rng)
    }

    pub fn seed_with<R: Rng + ?Sized>(
        width: u32,
        height: u32,
        catalog: &'static [&'static str],
        rng: &mut R,
    ) -> Self {
        Self {
            particles: std::array::from_fn(|_| Particle::spawn(width, height, catalog, rng)),
            catalog,
        }
    }

    #[cfg(test)]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Test hook for placing a particle at a known state.
    #[cfg(test)]
    pub fn particle_mut(&mut self, i: usize) -> &mut Particle {
        &mut self.particles[i]
    }

    /// One animation frame: wipe the surface, then move and draw each
    /// particle in pool order. Returns how many particles respawned.
    pub fn frame<S, R>(&mut self, surface: &mut S, rng: &mut R) -> usize
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        let (width, height) = (surface.width(), surface.height());
        surface.clear();

        let mut respawned = 0;
        for p in &mut self.particles {
            if p.advance(width, height, self.catalog, rng) {
                respawned += 1;
            }
            surface.fill_text(p.content, p.x, p.y, &p.style());
        }
        respawned
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::particle::{ALPHA_SCALE, FILL, FONT_FAMILY};
    use crate::surface::testing::RecordingSurface;

    #[test]
    fn pool_size_holds_over_many_frames() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut surface = RecordingSurface::new(200, 100);
        let mut field = ParticleField::seed(200, 100, &mut rng);
        let mut respawns = 0;
        for _ in 0..2000 {
            respawns += field.frame(&mut surface, &mut rng);
            assert_eq!(field.len(), POOL_SIZE);
        }
        assert!(respawns > 0);
        assert_eq!(surface.clears, 2000);
        assert_eq!(surface.draws.len(), 2000 * POOL_SIZE);
    }

    #[test]
    fn look_is_stable_across_respawns() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut surface = RecordingSurface::new(120, 80);
        let mut field = ParticleField::seed(120, 80, &mut rng);
        let before: Vec<(u64, u64, u64)> = field
            .particles()
            .iter()
            .map(|p| (p.opacity.to_bits(), p.speed.to_bits(), p.size.to_bits()))
            .collect();
        for _ in 0..3000 {
            field.frame(&mut surface, &mut rng);
        }
        let after: Vec<(u64, u64, u64)> = field
            .particles()
            .iter()
            .map(|p| (p.opacity.to_bits(), p.speed.to_bits(), p.size.to_bits()))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn frame_draws_each_particle_where_it_landed() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut surface = RecordingSurface::new(640, 480);
        let mut field = ParticleField::seed(640, 480, &mut rng);
        field.frame(&mut surface, &mut rng);

        assert_eq!(surface.clears, 1);
        for (call, p) in surface.draws.iter().zip(field.particles()) {
            assert_eq!(call.text, p.content);
            assert_eq!((call.x, call.y), (p.x, p.y));
            assert_eq!(call.style.fill.rgb, FILL);
            assert_eq!(call.style.fill.alpha, p.opacity * ALPHA_SCALE);
            assert_eq!(call.style.font_px, p.size);
            assert_eq!(call.style.font_family, FONT_FAMILY);
        }
    }

    #[test]
    fn respawn_scenario_on_800_by_600() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut surface = RecordingSurface::new(800, 600);
        let mut field = ParticleField::seed(800, 600, &mut rng);
        *field.particle_mut(0) = Particle {
            x: 400.0,
            y: -60.0,
            content: "A",
            opacity: 0.5,
            speed: 1.0,
            size: 12.0,
        };

        field.frame(&mut surface, &mut rng);

        let p = field.particles()[0];
        assert_eq!(p.y, 650.0);
        assert!((0.0..800.0).contains(&p.x));
        assert!(SNIPPETS.contains(&p.content));
        assert_eq!(surface.draws[0].text, p.content);
        assert_eq!(surface.draws[0].y, 650.0);
    }

    #[test]
    fn frame_uses_current_surface_size() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut surface = RecordingSurface::new(800, 600);
        let mut field = ParticleField::seed(800, 600, &mut rng);
        surface.resize(100, 50);
        field.particle_mut(3).y = -100.0;
        field.frame(&mut surface, &mut rng);
        let p = field.particles()[3];
        assert_eq!(p.y, 100.0);
        assert!(p.x < 100.0);
    }
}
