//! Geometry primitives shared by the positioning engine and hosts.
//!
//! All values are CSS pixels. Element rectangles are viewport-relative, the
//! same space `getBoundingClientRect` reports in; the [`Viewport`] carries the
//! scroll offsets needed to turn them into document coordinates.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// An element bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rectangle of the given size placed at the origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Inclusive hit test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Shift the rectangle by a delta.
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }
}

/// Window scroll offsets and inner dimensions, sampled once per reposition.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub inner_width: f64,
    pub inner_height: f64,
}

impl Viewport {
    pub fn new(scroll_left: f64, scroll_top: f64, inner_width: f64, inner_height: f64) -> Self {
        Self {
            scroll_left,
            scroll_top,
            inner_width,
            inner_height,
        }
    }

    /// An unscrolled viewport of the given size.
    pub fn sized(inner_width: f64, inner_height: f64) -> Self {
        Self::new(0.0, 0.0, inner_width, inner_height)
    }

    /// Right edge of the visible area in document coordinates.
    pub fn right(&self) -> f64 {
        self.scroll_left + self.inner_width
    }

    /// Bottom edge of the visible area in document coordinates.
    pub fn bottom(&self) -> f64 {
        self.scroll_top + self.inner_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
    }

    #[test]
    fn test_rect_contains_is_inclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(!r.contains(Point::new(10.5, 5.0)));
    }

    #[test]
    fn test_viewport_edges_include_scroll() {
        let v = Viewport::new(100.0, 50.0, 800.0, 600.0);
        assert_eq!(v.right(), 900.0);
        assert_eq!(v.bottom(), 650.0);
    }
}
