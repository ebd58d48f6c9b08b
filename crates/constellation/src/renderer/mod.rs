pub mod commands;
pub mod traits;

// Re-export key types for convenient access
pub use commands::{CommandBuffer, DrawCommand};
pub use traits::{css_rgba, Surface};
