// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::catalog::pick_random;
use crate::palette::{Rgb, Rgba};
use crate::surface::TextStyle;

/// Distance past either edge at which particles leave and re-enter.
pub const RESPAWN_MARGIN: f64 = 50.0;
pub const FILL: Rgb = Rgb::new(59, 130, 246);
pub const ALPHA_SCALE: f64 = 0.8;
pub const FONT_FAMILY: &str = "'Fira Code', monospace";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub content: &'static str,
    pub opacity: f64,
    pub speed: f64,
    pub size: f64,
}

fn random_below<R: Rng + ?Sized>(rng: &mut R, limit: f64) -> f64 {
    if limit > 0.0 {
        rng.random_range(0.0..limit)
    } else {
        0.0
    }
}

impl Particle {
    pub fn spawn<R: Rng + ?Sized>(
        width: u32,
        height: u32,
        catalog: &[&'static str],
        rng: &mut R,
    ) -> Self {
        Self {
            x: random_below(rng, width as f64),
            y: random_below(rng, height as f64),
            content: pick_random(catalog, rng),
            opacity: rng.random_range(0.2..0.6),
            speed: rng.random_range(0.2..0.7),
            size: rng.random_range(10.0..14.0),
        }
    }

    /// Moves one frame up. Past the top margin the particle re-enters below
    /// the bottom edge with new `x` and `content`; its look (opacity, speed,
    /// size) is kept for the whole mount.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        width: u32,
        height: u32,
        catalog: &[&'static str],
        rng: &mut R,
    ) -> bool {
        self.y -= self.speed;
        if self.y >= -RESPAWN_MARGIN {
            return false;
        }
        self.y = height as f64 + RESPAWN_MARGIN;
        self.x = random_below(rng, width as f64);
        self.content = pick_random(catalog, rng);
        true
    }

    pub fn style(&self) -> TextStyle {
        TextStyle {
            font_px: self.size,
            font_family: FONT_FAMILY,
            fill: Rgba::new(FILL, self.opacity * ALPHA_SCALE),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::catalog::SNIPPETS;

    fn fixed(y: f64, speed: f64) -> Particle {
        Particle {
            x: 400.0,
            y,
            content: "A",
            opacity: 0.5,
            speed,
            size: 12.0,
        }
    }

    #[test]
    fn spawn_rolls_inside_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let p = Particle::spawn(800, 600, &SNIPPETS, &mut rng);
            assert!((0.0..800.0).contains(&p.x));
            assert!((0.0..600.0).contains(&p.y));
            assert!((0.2..0.6).contains(&p.opacity));
            assert!((0.2..0.7).contains(&p.speed));
            assert!((10.0..14.0).contains(&p.size));
            assert!(SNIPPETS.contains(&p.content));
        }
    }

    #[test]
    fn spawn_on_empty_surface_pins_to_origin() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = Particle::spawn(0, 0, &SNIPPETS, &mut rng);
        assert_eq!((p.x, p.y), (0.0, 0.0));
    }

    #[test]
    fn advance_moves_up_by_speed() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = fixed(100.0, 0.5);
        assert!(!p.advance(800, 600, &SNIPPETS, &mut rng));
        assert_eq!(p.y, 99.5);
        assert_eq!(p.x, 400.0);
        assert_eq!(p.content, "A");
    }

    #[test]
    fn landing_exactly_on_margin_does_not_respawn() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = fixed(-49.0, 1.0);
        assert!(!p.advance(800, 600, &SNIPPETS, &mut rng));
        assert_eq!(p.y, -50.0);
    }

    #[test]
    fn crossing_margin_respawns_below_bottom() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut p = fixed(-60.0, 1.0);
        assert!(p.advance(800, 600, &SNIPPETS, &mut rng));
        assert_eq!(p.y, 650.0);
        assert!((0.0..800.0).contains(&p.x));
        assert!(SNIPPETS.contains(&p.content));
    }

    #[test]
    fn respawn_keeps_look() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut p = fixed(-49.9, 0.3);
        let (o, s, z) = (p.opacity, p.speed, p.size);
        assert!(p.advance(320, 240, &SNIPPETS, &mut rng));
        assert_eq!(p.opacity.to_bits(), o.to_bits());
        assert_eq!(p.speed.to_bits(), s.to_bits());
        assert_eq!(p.size.to_bits(), z.to_bits());
    }

    #[test]
    fn style_scales_alpha() {
        let p = fixed(0.0, 1.0);
        let st = p.style();
        assert_eq!(st.font_px, 12.0);
        assert_eq!(st.font_family, FONT_FAMILY);
        assert_eq!(st.fill.rgb, FILL);
        assert!((st.fill.alpha - 0.4).abs() < 1e-12);
    }
}
