pub mod api;
pub mod core;
pub mod field;
pub mod input;
pub mod renderer;
pub mod runner;
pub mod systems;
pub mod theme;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, FieldConfig};
pub use api::types::FrameStats;
pub use crate::core::rng::{RandomSource, Rng};
pub use field::{particle_count, ParticleField};
pub use input::pointer::PointerState;
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::commands::{CommandBuffer, DrawCommand};
pub use renderer::traits::{css_rgba, Surface};
pub use runner::FieldRunner;
pub use systems::particle::Particle;
pub use systems::shooting_star::ShootingStar;
pub use systems::spatial::SpatialGrid;
pub use theme::{FixedTheme, Theme, ThemeCache, ThemeError, ThemeSource};

pub use glam::Vec2;
