use glam::Vec2;

use super::traits::Surface;

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f32, height: f32 },
    Circle { center: Vec2, radius: f32, color: String },
    Line { from: Vec2, to: Vec2, width: f32, rgb: [u8; 3], alpha: f32 },
    FadingLine { tail: Vec2, head: Vec2, width: f32, rgb: [u8; 3], alpha: f32 },
    Glow { center: Vec2, radius: f32, rgb: [u8; 3], alpha: f32 },
}

/// A `Surface` that records every call instead of rasterizing.
pub struct CommandBuffer {
    pub commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(512),
        }
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All recorded single-colour lines.
    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn circle_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Circle { .. })).count()
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for CommandBuffer {
    fn clear(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.commands.push(DrawCommand::Circle { center, radius, color: color.to_string() });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, rgb: [u8; 3], alpha: f32) {
        self.commands.push(DrawCommand::Line { from, to, width, rgb, alpha });
    }

    fn stroke_fading_line(&mut self, tail: Vec2, head: Vec2, width: f32, rgb: [u8; 3], alpha: f32) {
        self.commands.push(DrawCommand::FadingLine { tail, head, width, rgb, alpha });
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, rgb: [u8; 3], alpha: f32) {
        self.commands.push(DrawCommand::Glow { center, radius, rgb, alpha });
    }
}
