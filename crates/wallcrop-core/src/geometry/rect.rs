//! Float and integer rectangles.
//!
//! Both types use edge coordinates (`left`, `top`, `right`, `bottom`) rather
//! than origin + size, which keeps outward rounding and edge rescaling simple.

use serde::{Deserialize, Serialize};

/// A rectangle with floating point edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RectF {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from its top-left corner and size.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Translate all four edges.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    /// Divide all four edges by an integer sample size.
    ///
    /// Used to express a source-space rectangle in the coordinate space of an
    /// image that was decoded at `1 / factor` resolution.
    pub fn scale_down(&self, factor: u32) -> Self {
        let f = f64::from(factor.max(1));
        Self::new(
            self.left / f,
            self.top / f,
            self.right / f,
            self.bottom / f,
        )
    }

    /// Round outward to integer pixel bounds: floor left/top, ceil right/bottom.
    pub fn round_out(&self) -> Rect {
        Rect::new(
            self.left.floor() as i32,
            self.top.floor() as i32,
            self.right.ceil() as i32,
            self.bottom.ceil() as i32,
        )
    }
}

/// A rectangle with integer pixel edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle covering a full image of the given size.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// True if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Overlap of two rectangles, or `None` if they do not share a pixel.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (!r.is_empty()).then_some(r)
    }

    pub fn to_rect_f(&self) -> RectF {
        RectF::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_out_expands_fractional_edges() {
        let r = RectF::new(1.2, 3.7, 10.1, 20.0).round_out();
        assert_eq!(r, Rect::new(1, 3, 11, 20));
    }

    #[test]
    fn test_round_out_negative_edges() {
        let r = RectF::new(-0.5, -2.0, 3.5, 0.25).round_out();
        assert_eq!(r, Rect::new(-1, -2, 4, 1));
    }

    #[test]
    fn test_round_out_integral_is_identity() {
        let r = Rect::new(4, 5, 40, 50);
        assert_eq!(r.to_rect_f().round_out(), r);
    }

    #[test]
    fn test_offset() {
        let r = RectF::from_xywh(10.0, 20.0, 30.0, 40.0).offset(-25.0, -40.0);
        assert_eq!(r, RectF::new(-15.0, -20.0, 15.0, 20.0));
    }

    #[test]
    fn test_extreme_edges_saturate() {
        let r = RectF::new(-3e9, 0.0, 3e9, f64::NAN).round_out();
        assert_eq!(r, Rect::new(i32::MIN, 0, i32::MAX, 0));
        assert_eq!(r.width(), i32::MAX);
        assert!(r.is_empty());
    }

    #[test]
    fn test_scale_down_divides_every_edge() {
        let r = RectF::new(10.0, 6.0, 31.0, 22.0).scale_down(4);
        assert_eq!(r, RectF::new(2.5, 1.5, 7.75, 5.5));
        assert_eq!(r.round_out(), Rect::new(2, 1, 8, 6));
    }

    #[test]
    fn test_scale_down_by_zero_is_identity() {
        let r = RectF::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.scale_down(0), r);
    }

    #[test]
    fn test_empty_rects() {
        assert!(Rect::new(5, 5, 5, 10).is_empty());
        assert!(Rect::new(5, 5, 10, 4).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn test_intersect() {
        let image = Rect::from_size(100, 50);
        assert_eq!(
            Rect::new(-10, 10, 40, 80).intersect(&image),
            Some(Rect::new(0, 10, 40, 50))
        );
        assert_eq!(Rect::new(100, 0, 120, 10).intersect(&image), None);
    }
}
