//! Sprite sink
//!
//! Renderer components push one [`Sprite`] per draw into a shared
//! [`SpriteBatch`]. The host clears the batch before the draw pass and
//! presents it afterwards. Presenting only counts and traces; nothing is
//! rasterized.

use sprig_core::math::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

pub type SharedBatch = Rc<RefCell<SpriteBatch>>;

/// A textured rectangle centred on `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub texture: &'static str,
    pub position: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Default)]
pub struct SpriteBatch {
    sprites: Vec<Sprite>,
    presented: u64,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedBatch {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    pub fn push(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Finish the frame. Returns the number of sprites it held.
    pub fn present(&mut self) -> usize {
        self.presented += 1;
        tracing::trace!(frame = self.presented, sprites = self.sprites.len(), "presented frame");
        self.sprites.len()
    }

    /// Number of frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.presented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_keeps_presented_count() {
        let mut batch = SpriteBatch::new();
        batch.push(Sprite {
            texture: "ship",
            position: Vec2::ZERO,
            size: Vec2::ONE,
        });
        assert_eq!(batch.present(), 1);

        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.present(), 0);
        assert_eq!(batch.frames_presented(), 2);
    }
}
