//! Rectangles and 2D affine transforms used by the crop pipeline.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, x grows right, y grows down
//! - Positive rotation angles turn the image clockwise on screen
//! - Pixel `(x, y)` covers the unit square starting at `(x, y)`; its center
//!   sits at `(x + 0.5, y + 0.5)`

mod affine;
mod rect;

pub use affine::Affine;
pub use rect::{Rect, RectF};
