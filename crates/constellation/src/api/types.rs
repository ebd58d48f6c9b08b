/// Counts of what one frame drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles: usize,
    /// Particle-to-particle links.
    pub connections: usize,
    /// Pointer-to-particle glow lines.
    pub pointer_lines: usize,
    /// Shooting stars still alive after this frame.
    pub stars: usize,
}
