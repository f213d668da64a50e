// Copyright 2026 the Shapewrap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding box primitive used throughout the tree.

/// Axis-aligned bounding box in 2D, f64 coordinates.
///
/// A point is represented by a degenerate box (`min_x == max_x`,
/// `min_y == max_y`); a segment by the min/max of its endpoints.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum x (left)
    pub min_x: f64,
    /// Minimum y
    pub min_y: f64,
    /// Maximum x (right)
    pub max_x: f64,
    /// Maximum y
    pub max_y: f64,
}

impl Aabb {
    /// The empty box: the identity element of [`extend`][Self::extend].
    pub const EMPTY: Self = Self {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    /// Create a new box from min/max corners.
    #[inline(always)]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// A degenerate box covering a single point.
    #[inline]
    pub const fn point(x: f64, y: f64) -> Self {
        Self::new(x, y, x, y)
    }

    /// The tight box of a segment given its endpoints.
    #[inline]
    pub fn segment(ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        Self::new(ax.min(bx), ay.min(by), ax.max(bx), ay.max(by))
    }

    /// Whether this box fully contains `other` (edges included).
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Whether this box overlaps `other` in any way.
    ///
    /// The edge of a box is considered part of it, so two boxes that share
    /// only an edge still overlap.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Grow this box in place to also cover `other`.
    #[inline]
    pub fn extend(&mut self, other: &Self) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// The smallest box enclosing both boxes.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        out.extend(other);
        out
    }

    /// Area of the box. The empty box has no meaningful area.
    #[inline]
    pub fn area(&self) -> f64 {
        (self.max_x - self.min_x) * (self.max_y - self.min_y)
    }

    /// Half-perimeter metric used by the split axis heuristic.
    #[inline]
    pub fn margin(&self) -> f64 {
        (self.max_x - self.min_x) + (self.max_y - self.min_y)
    }

    /// Area of the smallest box enclosing both boxes.
    #[inline]
    pub fn enlarged_area(&self, other: &Self) -> f64 {
        (self.max_x.max(other.max_x) - self.min_x.min(other.min_x))
            * (self.max_y.max(other.max_y) - self.min_y.min(other.min_y))
    }

    /// Area shared between two boxes; zero when they do not overlap.
    #[inline]
    pub fn intersection_area(&self, other: &Self) -> f64 {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x.min(other.max_x);
        let max_y = self.max_y.min(other.max_y);
        (max_x - min_x).max(0.0) * (max_y - min_y).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb;

    #[test]
    fn extend_from_empty() {
        let mut b = Aabb::EMPTY;
        b.extend(&Aabb::point(3.0, 4.0));
        b.extend(&Aabb::point(-1.0, 7.0));
        assert_eq!(b, Aabb::new(-1.0, 3.0, 3.0, 7.0));
    }

    #[test]
    fn overlap_includes_shared_edges() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Aabb::new(10.0, 0.0, 20.0, 10.0)));
        assert!(!a.overlaps(&Aabb::new(10.1, 0.0, 20.0, 10.0)));
        assert!(a.overlaps(&Aabb::point(5.0, 10.0)));
    }

    #[test]
    fn containment_and_metrics() {
        let a = Aabb::new(0.0, 0.0, 10.0, 4.0);
        assert!(a.contains(&Aabb::new(2.0, 1.0, 3.0, 2.0)));
        assert!(!a.contains(&Aabb::new(2.0, 1.0, 3.0, 5.0)));
        assert_eq!(a.area(), 40.0);
        assert_eq!(a.margin(), 14.0);
        assert_eq!(a.enlarged_area(&Aabb::point(10.0, 8.0)), 80.0);
        assert_eq!(
            a.intersection_area(&Aabb::new(5.0, 2.0, 15.0, 6.0)),
            10.0
        );
        assert_eq!(a.intersection_area(&Aabb::new(11.0, 0.0, 12.0, 1.0)), 0.0);
    }

    #[test]
    fn empty_box_contains_nothing() {
        assert!(!Aabb::EMPTY.contains(&Aabb::point(0.0, 0.0)));
        assert!(!Aabb::EMPTY.overlaps(&Aabb::point(0.0, 0.0)));
    }
}
