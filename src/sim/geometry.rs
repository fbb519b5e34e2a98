//! Axis-aligned rectangles and overlap tests
//!
//! Playfield coordinates grow right (x) and down (y), matching the page layout.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Horizontal centre
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// Check whether two rectangles overlap
///
/// Rectangles that only share an edge do not collide.
pub fn is_colliding(a: &Rect, b: &Rect) -> bool {
    !(a.bottom() <= b.top()
        || a.top() >= b.bottom()
        || a.left() >= b.right()
        || a.right() <= b.left())
}

/// Size of the bounded area all entities move in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Clamp a top-left position so a box of `size` stays inside the playfield
    pub fn clamp_box(&self, pos: Vec2, size: Vec2) -> Vec2 {
        let max_x = (self.width - size.x).max(0.0);
        let max_y = (self.height - size.y).max(0.0);
        Vec2::new(pos.x.clamp(0.0, max_x), pos.y.clamp(0.0, max_y))
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
