use glam::Vec2;

/// Last known pointer position and whether it is over the page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub active: bool,
}

impl PointerState {
    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
        self.active = true;
    }

    /// Deactivate. The last position is kept but no longer exerts force.
    pub fn leave(&mut self) {
        self.active = false;
    }

    /// The pointer position, if it is currently over the page.
    pub fn active_position(&self) -> Option<Vec2> {
        self.active.then_some(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive() {
        assert_eq!(PointerState::default().active_position(), None);
    }

    #[test]
    fn move_then_leave() {
        let mut p = PointerState::default();
        p.move_to(Vec2::new(5.0, 6.0));
        assert_eq!(p.active_position(), Some(Vec2::new(5.0, 6.0)));
        p.leave();
        assert_eq!(p.active_position(), None);
        assert_eq!(p.position, Vec2::new(5.0, 6.0));
    }
}
