//! The particle field: owns every particle and shooting star, advances them
//! once per display frame and issues the frame's draw calls.

use glam::Vec2;

use crate::api::config::FieldConfig;
use crate::api::types::FrameStats;
use crate::core::rng::{RandomSource, Rng};
use crate::input::pointer::PointerState;
use crate::input::queue::InputEvent;
use crate::renderer::traits::Surface;
use crate::systems::particle::Particle;
use crate::systems::shooting_star::ShootingStar;
use crate::systems::spatial::SpatialGrid;
use crate::theme::{ThemeCache, ThemeSource};

const LINK_WIDTH: f32 = 0.6;
const POINTER_LINE_WIDTH: f32 = 0.5;
const STAR_WIDTH: f32 = 1.5;
const STAR_HEAD_RADIUS: f32 = 3.0;
const STAR_RGB: [u8; 3] = [255, 255, 255];

/// Number of particles for a surface: floor(area / density). Zero for an empty surface.
pub fn particle_count(width: f32, height: f32, density: f32) -> usize {
    let area = width.max(0.0) * height.max(0.0);
    if area <= 0.0 || density <= 0.0 {
        return 0;
    }
    (area / density).floor() as usize
}

/// Constellation background state.
///
/// Randomness comes from an injectable [`RandomSource`]; use [`ParticleField::new`]
/// for the default seeded [`Rng`].
pub struct ParticleField<R: RandomSource = Rng> {
    config: FieldConfig,
    bounds: Vec2,
    particles: Vec<Particle>,
    stars: Vec<ShootingStar>,
    pointer: PointerState,
    frame: u64,
    grid: SpatialGrid,
    /// Per-frame scratch copy of particle positions for the grid.
    positions: Vec<Vec2>,
    theme: ThemeCache,
    rng: R,
}

impl ParticleField<Rng> {
    pub fn new(config: FieldConfig, width: f32, height: f32, seed: u64) -> Self {
        Self::with_rng(config, width, height, Rng::new(seed))
    }
}

impl<R: RandomSource> ParticleField<R> {
    pub fn with_rng(config: FieldConfig, width: f32, height: f32, rng: R) -> Self {
        let mut field = ParticleField {
            grid: SpatialGrid::new(config.connection_distance),
            theme: ThemeCache::new(config.theme_refresh_frames),
            config,
            bounds: Vec2::ZERO,
            particles: Vec::new(),
            stars: Vec::new(),
            pointer: PointerState::default(),
            frame: 0,
            positions: Vec::new(),
            rng,
        };
        field.populate(width, height);
        field
    }

    /// Discard every particle and recreate the set for the new surface size.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.populate(width, height);
    }

    fn populate(&mut self, width: f32, height: f32) {
        self.bounds = Vec2::new(width.max(0.0), height.max(0.0));
        let density = self.config.density_for_width(self.bounds.x);
        let count = particle_count(self.bounds.x, self.bounds.y, density);

        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = Particle::random(&mut self.rng, self.bounds, &self.config);
            self.particles.push(particle);
        }
        log::info!(
            "constellation: {} particles for {}x{} (density {})",
            count, self.bounds.x, self.bounds.y, density
        );
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer.move_to(Vec2::new(x, y));
    }

    pub fn pointer_leave(&mut self) {
        self.pointer.leave();
    }

    /// Apply one host signal.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, y } => self.pointer_move(x, y),
            InputEvent::PointerLeave => self.pointer_leave(),
            InputEvent::Resize { width, height } => self.resize(width, height),
        }
    }

    /// Spawn-timer tick: adds a shooting star with probability `star_probability`.
    /// Returns whether a star was spawned.
    pub fn spawn_tick(&mut self) -> bool {
        if !self.rng.chance(self.config.star_probability) {
            return false;
        }
        self.spawn_star();
        true
    }

    /// Unconditionally add a shooting star.
    pub fn spawn_star(&mut self) {
        let star = ShootingStar::spawn(&mut self.rng, self.bounds, &self.config);
        log::debug!("constellation: shooting star at ({:.0}, {:.0})", star.position.x, star.position.y);
        self.stars.push(star);
    }

    /// Advance every entity by one frame and draw the result onto `surface`.
    pub fn frame(&mut self, surface: &mut dyn Surface, themes: &mut dyn ThemeSource) -> FrameStats {
        self.frame += 1;
        let frame = self.frame;
        let mut stats = FrameStats { particles: self.particles.len(), ..FrameStats::default() };

        let pointer = self.pointer.active_position();
        for p in &mut self.particles {
            p.tick(frame, pointer, self.bounds, &self.config);
        }

        let theme = self.theme.current(frame, themes);
        surface.clear(self.bounds.x, self.bounds.y);

        // Links between nearby particles.
        self.positions.clear();
        self.positions.extend(self.particles.iter().map(|p| p.position));
        self.grid.rebuild(&self.positions);
        let threshold = self.config.connection_distance;
        let line_alpha = self.config.line_alpha;
        let positions = &self.positions;
        self.grid.for_each_pair(positions, threshold, |i, j, dist| {
            let opacity = 1.0 - dist / threshold;
            surface.stroke_line(positions[i], positions[j], LINK_WIDTH, theme.line_rgb, opacity * line_alpha);
            stats.connections += 1;
        });

        // Glow lines from the pointer.
        if let Some(pointer) = pointer {
            let radius = self.config.pointer_radius;
            for p in &self.particles {
                let dist = p.position.distance(pointer);
                if dist < radius {
                    let opacity = 1.0 - dist / radius;
                    surface.stroke_line(
                        pointer,
                        p.position,
                        POINTER_LINE_WIDTH,
                        theme.line_rgb,
                        opacity * self.config.pointer_line_alpha,
                    );
                    stats.pointer_lines += 1;
                }
            }
        }

        for p in &self.particles {
            surface.fill_circle(p.position, p.radius, &theme.particle_color);
        }

        let bounds = self.bounds;
        let margin = self.config.star_margin;
        self.stars.retain_mut(|star| {
            if !star.tick(bounds, margin) {
                return false;
            }
            surface.stroke_fading_line(star.tail(), star.position, STAR_WIDTH, STAR_RGB, star.life);
            surface.fill_glow(star.position, STAR_HEAD_RADIUS, STAR_RGB, star.life);
            true
        });
        stats.stars = self.stars.len();

        log::trace!("constellation frame {}: {:?}", frame, stats);
        stats
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for callers that place particles by hand.
    pub fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    pub fn stars(&self) -> &[ShootingStar] {
        &self.stars
    }

    pub fn stars_mut(&mut self) -> &mut Vec<ShootingStar> {
        &mut self.stars
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Frames advanced so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}
