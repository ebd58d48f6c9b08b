//! Theme colours and the frame-throttled lookup cache.

use std::fmt;

/// Colours the field draws with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Particle fill, any CSS colour.
    pub particle_color: String,
    /// RGB of link and pointer lines; opacity is applied per line.
    pub line_rgb: [u8; 3],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            particle_color: "rgba(100, 255, 218, 0.8)".to_string(),
            line_rgb: [100, 255, 218],
        }
    }
}

impl Theme {
    /// Build a theme from raw property values: a CSS colour and an `"r, g, b"` triple.
    pub fn parse(particle_color: &str, line_rgb: &str) -> Result<Self, ThemeError> {
        let particle_color = particle_color.trim();
        if particle_color.is_empty() {
            return Err(ThemeError::Missing("particle color"));
        }
        Ok(Theme {
            particle_color: particle_color.to_string(),
            line_rgb: parse_rgb_triple(line_rgb)?,
        })
    }
}

/// Parse `"r, g, b"` (commas and/or whitespace) into three channels.
pub fn parse_rgb_triple(value: &str) -> Result<[u8; 3], ThemeError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ThemeError::Missing("line rgb"));
    }
    let parts: Vec<&str> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() != 3 {
        return Err(ThemeError::Malformed(value.to_string()));
    }
    let mut rgb = [0u8; 3];
    for (channel, part) in rgb.iter_mut().zip(&parts) {
        *channel = part
            .parse::<u8>()
            .map_err(|_| ThemeError::Malformed(value.to_string()))?;
    }
    Ok(rgb)
}

/// Errors from reading the host's theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// A required value is absent or empty.
    Missing(&'static str),
    /// An RGB triple could not be parsed.
    Malformed(String),
    /// The host could not be queried at all.
    Unavailable(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::Missing(what) => write!(f, "Theme value missing: {}", what),
            ThemeError::Malformed(value) => write!(f, "Malformed RGB triple: {:?}", value),
            ThemeError::Unavailable(msg) => write!(f, "Theme unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ThemeError {}

/// Where the current theme comes from (CSS custom properties in the browser).
pub trait ThemeSource {
    fn read_theme(&mut self) -> Result<Theme, ThemeError>;
}

/// A theme that never changes.
#[derive(Debug, Clone, Default)]
pub struct FixedTheme(pub Theme);

impl ThemeSource for FixedTheme {
    fn read_theme(&mut self) -> Result<Theme, ThemeError> {
        Ok(self.0.clone())
    }
}

/// Caches the theme and only queries the source every `refresh_frames` frames.
/// On a failed query the previous theme stays in use.
#[derive(Debug, Clone)]
pub struct ThemeCache {
    theme: Theme,
    refresh_frames: u32,
    last_refresh: Option<u64>,
    failing: bool,
}

impl ThemeCache {
    pub fn new(refresh_frames: u32) -> Self {
        Self {
            theme: Theme::default(),
            refresh_frames: refresh_frames.max(1),
            last_refresh: None,
            failing: false,
        }
    }

    /// The theme to draw `frame` with, refreshing from `source` when due.
    pub fn current(&mut self, frame: u64, source: &mut dyn ThemeSource) -> &Theme {
        let due = match self.last_refresh {
            None => true,
            Some(last) => frame.saturating_sub(last) >= self.refresh_frames as u64,
        };
        if due {
            self.last_refresh = Some(frame);
            match source.read_theme() {
                Ok(theme) => {
                    self.theme = theme;
                    self.failing = false;
                }
                Err(e) => {
                    // Log once per failure streak, not once per refresh.
                    if !self.failing {
                        log::warn!("{}; keeping previous colours", e);
                    }
                    self.failing = true;
                }
            }
        }
        &self.theme
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Force a lookup on the next frame.
    pub fn invalidate(&mut self) {
        self.last_refresh = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts lookups and replays a scripted sequence of results.
    struct Scripted {
        results: Vec<Result<Theme, ThemeError>>,
        reads: usize,
    }

    impl ThemeSource for Scripted {
        fn read_theme(&mut self) -> Result<Theme, ThemeError> {
            let i = self.reads.min(self.results.len() - 1);
            self.reads += 1;
            self.results[i].clone()
        }
    }

    fn theme(rgb: [u8; 3]) -> Theme {
        Theme { particle_color: "#fff".to_string(), line_rgb: rgb }
    }

    #[test]
    fn parse_triple_variants() {
        assert_eq!(parse_rgb_triple("100, 255, 218").unwrap(), [100, 255, 218]);
        assert_eq!(parse_rgb_triple(" 1 2 3 ").unwrap(), [1, 2, 3]);
        assert_eq!(parse_rgb_triple("0,0,0").unwrap(), [0, 0, 0]);
    }

    #[test]
    fn parse_triple_rejects_garbage() {
        assert!(matches!(parse_rgb_triple("1, 2"), Err(ThemeError::Malformed(_))));
        assert!(matches!(parse_rgb_triple("1, 2, 300"), Err(ThemeError::Malformed(_))));
        assert!(matches!(parse_rgb_triple("red"), Err(ThemeError::Malformed(_))));
        assert!(matches!(parse_rgb_triple("  "), Err(ThemeError::Missing(_))));
    }

    #[test]
    fn parse_theme_requires_particle_color() {
        assert!(matches!(Theme::parse("", "1,2,3"), Err(ThemeError::Missing(_))));
        let t = Theme::parse(" #abcdef ", "1,2,3").unwrap();
        assert_eq!(t.particle_color, "#abcdef");
    }

    #[test]
    fn refreshes_only_every_n_frames() {
        let mut source = Scripted { results: vec![Ok(theme([1, 1, 1]))], reads: 0 };
        let mut cache = ThemeCache::new(60);
        for frame in 1..=180 {
            cache.current(frame, &mut source);
        }
        // Frames 1, 61 and 121.
        assert_eq!(source.reads, 3);
    }

    #[test]
    fn picks_up_change_on_next_refresh() {
        let mut source = Scripted {
            results: vec![Ok(theme([1, 1, 1])), Ok(theme([9, 9, 9]))],
            reads: 0,
        };
        let mut cache = ThemeCache::new(60);
        assert_eq!(cache.current(1, &mut source).line_rgb, [1, 1, 1]);
        assert_eq!(cache.current(60, &mut source).line_rgb, [1, 1, 1]);
        assert_eq!(cache.current(61, &mut source).line_rgb, [9, 9, 9]);
    }

    #[test]
    fn failure_keeps_previous_theme() {
        let mut source = Scripted {
            results: vec![
                Ok(theme([5, 5, 5])),
                Err(ThemeError::Unavailable("no style".to_string())),
            ],
            reads: 0,
        };
        let mut cache = ThemeCache::new(1);
        assert_eq!(cache.current(1, &mut source).line_rgb, [5, 5, 5]);
        assert_eq!(cache.current(2, &mut source).line_rgb, [5, 5, 5]);
        assert_eq!(cache.current(3, &mut source).line_rgb, [5, 5, 5]);
    }

    #[test]
    fn failure_before_any_success_uses_default() {
        let mut source = Scripted { results: vec![Err(ThemeError::Missing("line rgb"))], reads: 0 };
        let mut cache = ThemeCache::new(60);
        assert_eq!(cache.current(1, &mut source), &Theme::default());
    }

    #[test]
    fn invalidate_forces_lookup() {
        let mut source = Scripted { results: vec![Ok(theme([1, 1, 1]))], reads: 0 };
        let mut cache = ThemeCache::new(60);
        cache.current(1, &mut source);
        cache.invalidate();
        cache.current(2, &mut source);
        assert_eq!(source.reads, 2);
    }
}
