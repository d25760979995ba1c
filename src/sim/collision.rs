//! Axis-aligned collision testing
//!
//! The overlap test shrinks both boxes by a fixed inset on their
//! trailing/bottom edges before comparing, so grazing near-misses don't
//! end the run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::HIT_INSET;

/// An axis-aligned box in canvas coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(pos: Vec2, width: f32, height: f32) -> Self {
        Self { pos, width, height }
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }
}

/// Inset-forgiving overlap test. Symmetric in its arguments.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.pos.x < b.right() - HIT_INSET
        && a.right() - HIT_INSET > b.pos.x
        && a.pos.y < b.bottom() - HIT_INSET
        && a.bottom() - HIT_INSET > b.pos.y
}
