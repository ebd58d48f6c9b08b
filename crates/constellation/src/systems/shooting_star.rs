//! Short-lived streaks that cross the field now and then.

use glam::Vec2;

use crate::api::config::FieldConfig;
use crate::core::rng::RandomSource;

/// A fading streak with a fixed heading.
#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    /// Head of the streak.
    pub position: Vec2,
    pub velocity: Vec2,
    /// Length of the tail behind the head.
    pub trail: f32,
    /// 1.0 at spawn, dead at 0.0.
    pub life: f32,
    /// Life lost per frame.
    pub decay: f32,
}

impl ShootingStar {
    /// Spawn a star entering from the top edge or from the side it travels away from,
    /// heading downward at an angle inside `config.star_angle_deg`.
    pub fn spawn(rng: &mut impl RandomSource, bounds: Vec2, config: &FieldConfig) -> Self {
        let rightward = rng.chance(0.5);
        let angle = rng
            .range(config.star_angle_deg[0], config.star_angle_deg[1])
            .to_radians();
        let speed = rng.range(config.star_speed[0], config.star_speed[1]);
        let dir_x = if rightward { angle.cos() } else { -angle.cos() };
        let velocity = Vec2::new(dir_x, angle.sin()) * speed;

        let position = if rng.chance(0.5) {
            Vec2::new(rng.range(0.0, bounds.x), 0.0)
        } else {
            let x = if rightward { 0.0 } else { bounds.x };
            Vec2::new(x, rng.range(0.0, bounds.y * 0.5))
        };

        ShootingStar {
            position,
            velocity,
            trail: rng.range(config.star_trail[0], config.star_trail[1]),
            life: 1.0,
            decay: rng.range(config.star_decay[0], config.star_decay[1]),
        }
    }

    /// Advance one frame. Returns false once the star is dead.
    pub fn tick(&mut self, bounds: Vec2, margin: f32) -> bool {
        self.position += self.velocity;
        self.life -= self.decay;
        self.is_alive(bounds, margin)
    }

    pub fn is_alive(&self, bounds: Vec2, margin: f32) -> bool {
        self.life > 0.0
            && self.position.x >= -margin
            && self.position.x <= bounds.x + margin
            && self.position.y >= -margin
            && self.position.y <= bounds.y + margin
    }

    /// End of the tail, `trail` pixels behind the head.
    pub fn tail(&self) -> Vec2 {
        self.position - self.velocity.normalize_or_zero() * self.trail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;

    fn star(position: Vec2, velocity: Vec2, decay: f32) -> ShootingStar {
        ShootingStar { position, velocity, trail: 100.0, life: 1.0, decay }
    }

    #[test]
    fn spawned_star_heads_downward_within_angle_range() {
        let config = FieldConfig::default();
        let mut rng = Rng::new(42);
        let bounds = Vec2::new(800.0, 600.0);
        for _ in 0..200 {
            let s = ShootingStar::spawn(&mut rng, bounds, &config);
            assert!(s.velocity.y > 0.0, "star should move downward");
            let angle = (s.velocity.y / s.velocity.x.abs()).atan().to_degrees();
            assert!(angle >= config.star_angle_deg[0] - 1e-3 && angle <= config.star_angle_deg[1] + 1e-3);
            assert!(s.decay >= config.star_decay[0] && s.decay <= config.star_decay[1]);
            assert!(s.trail >= config.star_trail[0] && s.trail <= config.star_trail[1]);
            assert_eq!(s.life, 1.0);
            assert!(s.is_alive(bounds, 0.0), "spawn position should be on an edge");
        }
    }

    #[test]
    fn life_strictly_decreases() {
        let mut s = star(Vec2::new(100.0, 100.0), Vec2::new(1.0, 1.0), 0.01);
        let bounds = Vec2::new(10_000.0, 10_000.0);
        let mut last = s.life;
        while s.tick(bounds, 100.0) {
            assert!(s.life < last);
            last = s.life;
        }
        assert!(s.life <= 0.0);
    }

    #[test]
    fn dies_when_leaving_bounds_plus_margin() {
        let mut s = star(Vec2::new(795.0, 300.0), Vec2::new(10.0, 0.0), 0.001);
        let bounds = Vec2::new(800.0, 600.0);
        assert!(s.tick(bounds, 20.0)); // x = 805, inside the margin
        assert!(s.tick(bounds, 20.0)); // x = 815
        assert!(!s.tick(bounds, 20.0)); // x = 825
        assert!(s.life > 0.0);
    }

    #[test]
    fn tail_trails_behind_head() {
        let s = star(Vec2::new(200.0, 100.0), Vec2::new(3.0, 4.0), 0.01);
        let tail = s.tail();
        assert!((tail - Vec2::new(140.0, 20.0)).length() < 1e-3);
    }
}
