//! Drawing surface contract.
//!
//! The engine never touches a canvas directly. Each frame it issues
//! immediate-mode calls against a `Surface`; the web bridge implements the
//! trait on `CanvasRenderingContext2d`, and [`CommandBuffer`](super::commands::CommandBuffer)
//! records the calls for tests and headless callers.

use glam::Vec2;

/// Immediate-mode 2D drawing primitives, in surface (CSS pixel) coordinates.
pub trait Surface {
    /// Erase the region [0, width] x [0, height].
    fn clear(&mut self, width: f32, height: f32);

    /// Fill a circle with a CSS colour string.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);

    /// Stroke a straight line in a single colour.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, rgb: [u8; 3], alpha: f32);

    /// Stroke a line with a linear gradient: transparent at `tail`, `alpha` at `head`.
    fn stroke_fading_line(&mut self, tail: Vec2, head: Vec2, width: f32, rgb: [u8; 3], alpha: f32);

    /// Fill a disc with a radial gradient: `alpha` at the centre, transparent at `radius`.
    fn fill_glow(&mut self, center: Vec2, radius: f32, rgb: [u8; 3], alpha: f32);
}

/// Format an `rgba(...)` CSS colour. Alpha is clamped to [0, 1].
pub fn css_rgba(rgb: [u8; 3], alpha: f32) -> String {
    format!("rgba({}, {}, {}, {:.3})", rgb[0], rgb[1], rgb[2], alpha.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_rgba_formats_triple() {
        assert_eq!(css_rgba([100, 255, 218], 0.5), "rgba(100, 255, 218, 0.500)");
    }

    #[test]
    fn css_rgba_clamps_alpha() {
        assert_eq!(css_rgba([0, 0, 0], 1.7), "rgba(0, 0, 0, 1.000)");
        assert_eq!(css_rgba([0, 0, 0], -0.2), "rgba(0, 0, 0, 0.000)");
    }
}
