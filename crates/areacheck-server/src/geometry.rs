//! Hit-test predicates.
//!
//! The target shape is the union of three regions scaled by `r`:
//!
//! - a rectangle in the fourth quadrant, `0 ≤ x ≤ r`, `-r/2 ≤ y ≤ 0`
//! - the "triangle" in the second quadrant, `-r/2 ≤ x ≤ 0`, `0 ≤ y ≤ r/2`,
//!   `y ≥ -x - r/2`
//! - a quarter circle of radius `r` in the first quadrant
//!
//! All boundaries are inclusive. The predicates accept any finite input; range
//! checks belong to the request handler.

/// Rectangle region.
pub fn in_rect(x: f64, y: f64, r: f64) -> bool {
    x >= 0.0 && y <= 0.0 && x <= r && y >= -r / 2.0
}

/// Triangle region.
pub fn in_triangle(x: f64, y: f64, r: f64) -> bool {
    x <= 0.0 && y >= 0.0 && x >= -r / 2.0 && y <= r / 2.0 && y >= -x - r / 2.0
}

/// Quarter-circle region.
pub fn in_circle(x: f64, y: f64, r: f64) -> bool {
    x >= 0.0 && y >= 0.0 && x <= r && y <= r && (x * x + y * y) <= r * r
}

/// Union of the three regions.
pub fn hit_test(x: f64, y: f64, r: f64) -> bool {
    RegionHits::evaluate(x, y, r).hit()
}

/// Per-region results for one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionHits {
    pub rect: bool,
    pub triangle: bool,
    pub circle: bool,
}

impl RegionHits {
    /// Evaluates every region once, without short-circuiting.
    pub fn evaluate(x: f64, y: f64, r: f64) -> Self {
        Self {
            rect: in_rect(x, y, r),
            triangle: in_triangle(x, y, r),
            circle: in_circle(x, y, r),
        }
    }

    pub fn hit(&self) -> bool {
        self.rect || self.triangle || self.circle
    }
}
