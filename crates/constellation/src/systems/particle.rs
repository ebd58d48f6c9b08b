//! Drifting, breathing background particles.

use glam::Vec2;

use crate::api::config::FieldConfig;
use crate::core::rng::RandomSource;

/// A single drifting point with a breathing radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Drift the particle relaxes back to after being pushed.
    pub base_velocity: Vec2,
    pub velocity: Vec2,
    pub base_radius: f32,
    pub radius: f32,
    /// Breathing phase offset in radians.
    pub phase: f32,
}

impl Particle {
    /// Create a particle with uniformly random position, drift, size and phase.
    pub fn random(rng: &mut impl RandomSource, bounds: Vec2, config: &FieldConfig) -> Self {
        let position = Vec2::new(rng.range(0.0, bounds.x), rng.range(0.0, bounds.y));
        let base_velocity = Vec2::new(
            rng.range(-config.max_speed, config.max_speed),
            rng.range(-config.max_speed, config.max_speed),
        );
        let base_radius = rng.range(config.radius_range[0], config.radius_range[1]);
        let phase = rng.range(0.0, std::f32::consts::TAU);
        Particle {
            position,
            base_velocity,
            velocity: base_velocity,
            base_radius,
            radius: base_radius,
            phase,
        }
    }

    /// Advance one frame: breathe, get pushed by the pointer, relax, move, stay inside `bounds`.
    pub fn tick(&mut self, frame: u64, pointer: Option<Vec2>, bounds: Vec2, config: &FieldConfig) {
        // f64 keeps the phase accurate long after the frame count outgrows an f32 mantissa.
        let angle = frame as f64 * config.pulse_speed as f64 + self.phase as f64;
        self.radius = self.base_radius + config.pulse_amplitude * angle.sin() as f32;

        if let Some(pointer) = pointer {
            let away = self.position - pointer;
            let dist = away.length();
            if dist > 0.0 && dist < config.repel_radius {
                let force = (1.0 - dist / config.repel_radius) * config.repel_strength;
                self.velocity += away / dist * force;
            }
        }

        self.velocity += (self.base_velocity - self.velocity) * config.relax_rate;
        self.position += self.velocity;
        self.contain(bounds);
    }

    /// Clamp to the surface and point the velocity back inward on every crossed edge.
    /// The base drift is left alone.
    fn contain(&mut self, bounds: Vec2) {
        if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.velocity.x = self.velocity.x.abs();
        } else if self.position.x > bounds.x {
            self.position.x = bounds.x;
            self.velocity.x = -self.velocity.x.abs();
        }

        if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.velocity.y = self.velocity.y.abs();
        } else if self.position.y > bounds.y {
            self.position.y = bounds.y;
            self.velocity.y = -self.velocity.y.abs();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;

    fn particle_at(position: Vec2, velocity: Vec2) -> Particle {
        Particle {
            position,
            base_velocity: velocity,
            velocity,
            base_radius: 2.0,
            radius: 2.0,
            phase: 0.0,
        }
    }

    #[test]
    fn random_particle_within_ranges() {
        let config = FieldConfig::default();
        let mut rng = Rng::new(42);
        let bounds = Vec2::new(800.0, 600.0);
        for _ in 0..200 {
            let p = Particle::random(&mut rng, bounds, &config);
            assert!(p.position.x >= 0.0 && p.position.x <= bounds.x);
            assert!(p.position.y >= 0.0 && p.position.y <= bounds.y);
            assert!(p.base_velocity.x.abs() <= config.max_speed);
            assert!(p.base_velocity.y.abs() <= config.max_speed);
            assert!(p.base_radius >= config.radius_range[0] && p.base_radius <= config.radius_range[1]);
            assert_eq!(p.velocity, p.base_velocity);
        }
    }

    #[test]
    fn breathing_radius_stays_positive_and_bounded() {
        let config = FieldConfig::default();
        let mut p = particle_at(Vec2::new(50.0, 50.0), Vec2::ZERO);
        p.base_radius = config.radius_range[0];
        for frame in 0..1000 {
            p.tick(frame, None, Vec2::new(100.0, 100.0), &config);
            assert!(p.radius > 0.0);
            assert!((p.radius - p.base_radius).abs() <= config.pulse_amplitude + 1e-5);
        }
    }

    #[test]
    fn pointer_pushes_particle_away() {
        let config = FieldConfig::default();
        let mut p = particle_at(Vec2::new(110.0, 100.0), Vec2::ZERO);
        p.tick(0, Some(Vec2::new(100.0, 100.0)), Vec2::new(800.0, 600.0), &config);
        assert!(p.velocity.x > 0.0, "velocity should point away from the pointer");
        assert!(p.position.x > 110.0);
        assert!(p.velocity.y.abs() < 1e-6);
    }

    #[test]
    fn pointer_outside_repel_radius_has_no_effect() {
        let config = FieldConfig::default();
        let mut pushed = particle_at(Vec2::new(400.0, 300.0), Vec2::new(0.1, 0.0));
        let mut free = pushed.clone();
        pushed.tick(5, Some(Vec2::new(0.0, 0.0)), Vec2::new(800.0, 600.0), &config);
        free.tick(5, None, Vec2::new(800.0, 600.0), &config);
        assert_eq!(pushed, free);
    }

    #[test]
    fn velocity_relaxes_monotonically_toward_base() {
        let config = FieldConfig::default();
        let mut p = particle_at(Vec2::new(400.0, 300.0), Vec2::new(0.1, -0.1));
        p.velocity = Vec2::new(3.0, 2.0);
        let bounds = Vec2::new(800.0, 600.0);
        let mut gap = (p.velocity - p.base_velocity).length();
        for frame in 0..100 {
            p.tick(frame, None, bounds, &config);
            let next = (p.velocity - p.base_velocity).length();
            assert!(next < gap, "gap grew at frame {}: {} -> {}", frame, gap, next);
            gap = next;
        }
        assert!(gap < 0.05);
    }

    #[test]
    fn crossing_left_edge_clamps_and_turns_inward() {
        let config = FieldConfig::default();
        let mut p = particle_at(Vec2::new(0.1, 50.0), Vec2::new(-0.5, 0.0));
        p.tick(0, None, Vec2::new(100.0, 100.0), &config);
        assert_eq!(p.position.x, 0.0);
        assert!(p.velocity.x > 0.0);
        assert_eq!(p.base_velocity, Vec2::new(-0.5, 0.0));
    }

    #[test]
    fn crossing_bottom_right_corner_clamps_both_axes() {
        let config = FieldConfig::default();
        let mut p = particle_at(Vec2::new(99.9, 99.9), Vec2::new(0.5, 0.5));
        p.tick(0, None, Vec2::new(100.0, 100.0), &config);
        assert_eq!(p.position, Vec2::new(100.0, 100.0));
        assert!(p.velocity.x < 0.0);
        assert!(p.velocity.y < 0.0);
    }
}
