//! Axis-aligned rectangle tests
//!
//! The catch test is deliberately one-sided: only the catcher's top edge is
//! checked vertically, since items are removed before they can fall past it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Screen-space rectangle, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Strict horizontal overlap; touching edges do not count
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        other.left() < self.right() && self.left() < other.right()
    }
}

/// Whether `catcher` (already shifted by its top offset) catches `item`
///
/// True when `catcher.top < item.bottom` and the two overlap horizontally,
/// all comparisons strict so an exact edge touch never triggers.
pub fn catches(catcher: &Rect, item: &Rect) -> bool {
    catcher.top() < item.bottom() && catcher.overlaps_x(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_rect_edges() {
        let r = rect(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
    }

    #[test]
    fn test_catch_overlap() {
        let catcher = rect(100.0, 500.0, 100.0, 100.0);
        let item = rect(150.0, 450.0, 60.0, 60.0);
        assert!(catches(&catcher, &item));
    }

    #[test]
    fn test_catch_above_catcher_misses() {
        let catcher = rect(100.0, 500.0, 100.0, 100.0);
        let item = rect(150.0, 300.0, 60.0, 60.0);
        assert!(!catches(&catcher, &item));
    }

    #[test]
    fn test_exact_touch_does_not_catch() {
        let catcher = rect(100.0, 500.0, 100.0, 100.0);

        // Bottom edge exactly on the catcher's top
        let item = rect(150.0, 440.0, 60.0, 60.0);
        assert!(!catches(&catcher, &item));

        // Right edge exactly on the catcher's left
        let item = rect(40.0, 480.0, 60.0, 60.0);
        assert!(!catches(&catcher, &item));

        // Left edge exactly on the catcher's right
        let item = rect(200.0, 480.0, 60.0, 60.0);
        assert!(!catches(&catcher, &item));
    }

    #[test]
    fn test_side_miss() {
        let catcher = rect(100.0, 500.0, 100.0, 100.0);
        let item = rect(400.0, 520.0, 60.0, 60.0);
        assert!(!catches(&catcher, &item));
    }
}
