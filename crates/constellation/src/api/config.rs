use std::fmt;

use serde::{Deserialize, Serialize};

/// Tuning constants for a particle field.
/// Loaded from JSON at runtime; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Surface area (px²) per particle.
    pub density: f32,
    /// Sparser area-per-particle used below `narrow_width`.
    pub narrow_density: f32,
    /// Viewport width below which `narrow_density` applies.
    pub narrow_width: f32,
    /// Maximum distance at which two particles are linked. Also the grid cell size.
    pub connection_distance: f32,
    /// Radius around the pointer inside which glow lines are drawn.
    pub pointer_radius: f32,
    /// Radius around the pointer inside which particles are pushed away.
    pub repel_radius: f32,
    pub repel_strength: f32,
    /// Fraction of the gap to base velocity closed each frame.
    pub relax_rate: f32,
    /// Base velocity components are drawn from [-max_speed, max_speed).
    pub max_speed: f32,
    pub radius_range: [f32; 2],
    pub pulse_amplitude: f32,
    /// Breathing phase advance per frame, in radians.
    pub pulse_speed: f32,
    /// Opacity multiplier for particle links.
    pub line_alpha: f32,
    /// Opacity multiplier for pointer glow lines.
    pub pointer_line_alpha: f32,
    /// Frames between theme lookups.
    pub theme_refresh_frames: u32,
    pub resize_debounce_ms: u32,
    pub star_interval_ms: u32,
    /// Chance that a spawn tick actually produces a shooting star.
    pub star_probability: f32,
    pub star_speed: [f32; 2],
    /// Angle below the horizontal, in degrees.
    pub star_angle_deg: [f32; 2],
    pub star_trail: [f32; 2],
    /// Life lost per frame.
    pub star_decay: [f32; 2],
    /// Distance outside the surface a star may travel before it is dropped.
    pub star_margin: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density: 15000.0,
            narrow_density: 25000.0,
            narrow_width: 768.0,
            connection_distance: 120.0,
            pointer_radius: 180.0,
            repel_radius: 100.0,
            repel_strength: 0.6,
            relax_rate: 0.05,
            max_speed: 0.25,
            radius_range: [1.0, 2.5],
            pulse_amplitude: 0.5,
            pulse_speed: 0.02,
            line_alpha: 0.35,
            pointer_line_alpha: 0.25,
            theme_refresh_frames: 60,
            resize_debounce_ms: 250,
            star_interval_ms: 3000,
            star_probability: 0.3,
            star_speed: [6.0, 10.0],
            star_angle_deg: [20.0, 50.0],
            star_trail: [80.0, 150.0],
            star_decay: [0.008, 0.018],
            star_margin: 100.0,
        }
    }
}

impl FieldConfig {
    /// Parse a config from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Area-per-particle for a surface of the given width.
    pub fn density_for_width(&self, width: f32) -> f32 {
        if width < self.narrow_width {
            self.narrow_density
        } else {
            self.density
        }
    }

    /// Check every value the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("density", self.density)?;
        positive("narrow_density", self.narrow_density)?;
        positive("connection_distance", self.connection_distance)?;
        positive("pointer_radius", self.pointer_radius)?;
        positive("repel_radius", self.repel_radius)?;
        unit("relax_rate", self.relax_rate)?;
        unit("star_probability", self.star_probability)?;
        unit("line_alpha", self.line_alpha)?;
        unit("pointer_line_alpha", self.pointer_line_alpha)?;
        ordered("radius_range", self.radius_range)?;
        ordered("star_speed", self.star_speed)?;
        ordered("star_angle_deg", self.star_angle_deg)?;
        ordered("star_trail", self.star_trail)?;
        ordered("star_decay", self.star_decay)?;
        positive("star_decay", self.star_decay[0])?;

        // Breathing must never shrink a particle to zero.
        if self.pulse_amplitude < 0.0 || self.radius_range[0] <= self.pulse_amplitude {
            return Err(ConfigError::Invalid {
                field: "pulse_amplitude",
                reason: "must be non-negative and smaller than the minimum radius",
            });
        }
        if self.theme_refresh_frames == 0 {
            return Err(ConfigError::Invalid { field: "theme_refresh_frames", reason: "must be at least 1" });
        }
        if self.star_interval_ms == 0 {
            return Err(ConfigError::Invalid { field: "star_interval_ms", reason: "must be at least 1" });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: "must be a positive number" })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: "must be within [0, 1]" })
    }
}

fn ordered(field: &'static str, range: [f32; 2]) -> Result<(), ConfigError> {
    if range[0].is_finite() && range[1].is_finite() && range[0] <= range[1] {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: "range must be finite and ordered [min, max]" })
    }
}

/// Errors produced while loading a [`FieldConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    Parse(serde_json::Error),
    /// A value is outside the range the simulation supports.
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Failed to parse field config: {}", e),
            ConfigError::Invalid { field, reason } => write!(f, "Invalid field config `{}`: {}", field, reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
