use crate::api::types::FrameStats;
use crate::core::rng::{RandomSource, Rng};
use crate::field::ParticleField;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::traits::Surface;
use crate::theme::ThemeSource;

/// Drives a [`ParticleField`] from host callbacks.
///
/// The host calls [`tick`](Self::tick) from every animation frame and
/// [`spawn_tick`](Self::spawn_tick) from its repeating timer, passing the
/// current page visibility. Input is queued by event listeners and applied
/// at the start of the next tick, hidden or not; only the simulation and
/// drawing are skipped while the page is hidden.
pub struct FieldRunner<R: RandomSource = Rng> {
    field: ParticleField<R>,
    input: InputQueue,
}

impl<R: RandomSource> FieldRunner<R> {
    pub fn new(field: ParticleField<R>) -> Self {
        Self {
            field,
            input: InputQueue::new(),
        }
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one animation frame. Returns `None` when the page is hidden.
    pub fn tick(&mut self, hidden: bool, surface: &mut dyn Surface, themes: &mut dyn ThemeSource) -> Option<FrameStats> {
        for event in self.input.drain() {
            self.field.apply(event);
        }
        if hidden {
            return None;
        }
        Some(self.field.frame(surface, themes))
    }

    /// Run one spawn-timer tick. Never spawns while the page is hidden.
    pub fn spawn_tick(&mut self, hidden: bool) -> bool {
        !hidden && self.field.spawn_tick()
    }

    pub fn field(&self) -> &ParticleField<R> {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField<R> {
        &mut self.field
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }
}
