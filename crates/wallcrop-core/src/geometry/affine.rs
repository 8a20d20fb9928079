//! 2D affine matrices.
//!
//! A matrix maps a point as:
//! ```text
//! x' = a * x + b * y + c
//! y' = d * x + e * y + f
//! ```
//!
//! `m.concat(n)` is the product `m * n`, so `n` is applied first. The
//! [`Affine::then`] helper reads left to right instead, which is how the
//! compositor builds its translate/rotate/translate/scale chain.

use super::RectF;

/// A 2D affine transform in row-major form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 1.0,
        f: 0.0,
    };

    pub fn translate(dx: f64, dy: f64) -> Self {
        Self {
            c: dx,
            f: dy,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            e: sy,
            ..Self::IDENTITY
        }
    }

    /// Rotation about the origin, clockwise on screen for positive angles.
    ///
    /// Quarter turns use exact sine/cosine values so that rotating integer
    /// rectangles by multiples of 90 degrees keeps integer edges.
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = quarter_turn_sin_cos(degrees).unwrap_or_else(|| {
            let rad = degrees.to_radians();
            (rad.sin(), rad.cos())
        });
        Self {
            a: cos,
            b: -sin,
            c: 0.0,
            d: sin,
            e: cos,
            f: 0.0,
        }
    }

    /// Map `src` onto `dst` by independent X/Y scaling (no aspect
    /// preservation). Returns `None` when `src` has no area.
    pub fn rect_to_rect_fill(src: RectF, dst: RectF) -> Option<Self> {
        if src.width() == 0.0 || src.height() == 0.0 {
            return None;
        }
        let sx = dst.width() / src.width();
        let sy = dst.height() / src.height();
        Some(Self {
            a: sx,
            b: 0.0,
            c: dst.left - src.left * sx,
            d: 0.0,
            e: sy,
            f: dst.top - src.top * sy,
        })
    }

    /// Matrix product `self * other`: `other` is applied first.
    pub fn concat(&self, other: &Affine) -> Self {
        Self {
            a: self.a * other.a + self.b * other.d,
            b: self.a * other.b + self.b * other.e,
            c: self.a * other.c + self.b * other.f + self.c,
            d: self.d * other.a + self.e * other.d,
            e: self.d * other.b + self.e * other.e,
            f: self.d * other.c + self.e * other.f + self.f,
        }
    }

    /// Apply `self`, then `next`.
    pub fn then(&self, next: &Affine) -> Self {
        next.concat(self)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }

    /// Inverse transform, or `None` if the matrix is singular.
    pub fn invert(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Self {
            a: self.e * inv,
            b: -self.b * inv,
            c: (self.b * self.f - self.e * self.c) * inv,
            d: -self.d * inv,
            e: self.a * inv,
            f: (self.d * self.c - self.a * self.f) * inv,
        })
    }

    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.c,
            self.d * x + self.e * y + self.f,
        )
    }

    /// Map a vector (ignores translation).
    pub fn map_vector(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.b * y, self.d * x + self.e * y)
    }

    /// Bounding box of the four mapped corners of `rect`.
    pub fn map_rect(&self, rect: &RectF) -> RectF {
        let corners = [
            self.map_point(rect.left, rect.top),
            self.map_point(rect.right, rect.top),
            self.map_point(rect.right, rect.bottom),
            self.map_point(rect.left, rect.bottom),
        ];
        let mut out = RectF::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for (x, y) in corners {
            out.left = out.left.min(x);
            out.top = out.top.min(y);
            out.right = out.right.max(x);
            out.bottom = out.bottom.max(y);
        }
        out
    }
}

fn quarter_turn_sin_cos(degrees: f64) -> Option<(f64, f64)> {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        Some((0.0, 1.0))
    } else if normalized == 90.0 {
        Some((1.0, 0.0))
    } else if normalized == 180.0 {
        Some((0.0, -1.0))
    } else if normalized == 270.0 {
        Some((-1.0, 0.0))
    } else {
        None
    }
}
