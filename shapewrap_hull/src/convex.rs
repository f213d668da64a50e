// Copyright 2026 the Shapewrap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Convex hull seed for the carving engine.

use alloc::vec::Vec;

use kurbo::Point;

use crate::orient::orient2d;

/// Indices of the convex hull vertices of `points`, as a counterclockwise
/// ring without the closing repeat. Collinear boundary points are dropped.
///
/// Runs a quadrilateral pre-filter first: points strictly inside the quad of
/// the four axis extremes cannot be hull vertices and are culled before the
/// monotone chain, which makes the sort cheap on blob-like clouds.
pub(crate) fn convex_hull_indices(points: &[Point]) -> Vec<u32> {
    debug_assert!(points.len() < u32::MAX as usize, "index type too small");

    let mut left = 0_usize;
    let mut right = 0;
    let mut top = 0;
    let mut bottom = 0;
    for (i, p) in points.iter().enumerate() {
        if p.x < points[left].x {
            left = i;
        }
        if p.x > points[right].x {
            right = i;
        }
        if p.y < points[bottom].y {
            bottom = i;
        }
        if p.y > points[top].y {
            top = i;
        }
    }

    let quad = [points[left], points[bottom], points[right], points[top]];
    let extremes = [left, bottom, right, top];
    let mut filtered: Vec<u32> = Vec::new();
    for &e in &extremes {
        #[allow(clippy::cast_possible_truncation, reason = "checked above")]
        let e32 = e as u32;
        if !filtered.contains(&e32) {
            filtered.push(e32);
        }
    }
    for (i, p) in points.iter().enumerate() {
        if !extremes.contains(&i) && !point_in_quad(*p, &quad) {
            #[allow(clippy::cast_possible_truncation, reason = "checked above")]
            filtered.push(i as u32);
        }
    }

    monotone_chain(points, filtered)
}

/// Ray-cast point-in-polygon test against the extreme quadrilateral.
/// Boundary points may land on either side; the chain tolerates both.
fn point_in_quad(p: Point, quad: &[Point; 4]) -> bool {
    let mut inside = false;
    let mut j = quad.len() - 1;
    for i in 0..quad.len() {
        let (pi, pj) = (quad[i], quad[j]);
        if (pi.y > p.y) != (pj.y > p.y)
            && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Andrew's monotone chain over the candidate indices.
fn monotone_chain(points: &[Point], mut candidates: Vec<u32>) -> Vec<u32> {
    candidates.sort_by(|&a, &b| {
        let (pa, pb) = (points[a as usize], points[b as usize]);
        pa.x.total_cmp(&pb.x).then(pa.y.total_cmp(&pb.y))
    });

    let turn = |i: u32, j: u32, k: u32| {
        orient2d(points[i as usize], points[j as usize], points[k as usize])
    };

    let mut lower: Vec<u32> = Vec::new();
    for &i in &candidates {
        while lower.len() >= 2 && turn(lower[lower.len() - 2], lower[lower.len() - 1], i) <= 0.0 {
            let _ = lower.pop();
        }
        lower.push(i);
    }
    let mut upper: Vec<u32> = Vec::new();
    for &i in candidates.iter().rev() {
        while upper.len() >= 2 && turn(upper[upper.len() - 2], upper[upper.len() - 1], i) <= 0.0 {
            let _ = upper.pop();
        }
        upper.push(i);
    }

    let _ = lower.pop();
    let _ = upper.pop();
    lower.extend_from_slice(&upper);
    lower
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn square_with_interior_point() {
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (5.0, 5.0)]);
        let hull = convex_hull_indices(&points);
        assert_eq!(hull, vec![0, 1, 2, 3], "counterclockwise from the min corner");
    }

    #[test]
    fn collinear_boundary_points_are_dropped() {
        let points = pts(&[
            (0.0, 0.0),
            (5.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
        ]);
        let hull = convex_hull_indices(&points);
        assert_eq!(hull, vec![0, 2, 3, 4]);
    }

    #[test]
    fn collinear_input_yields_degenerate_chain() {
        let points = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let hull = convex_hull_indices(&points);
        assert_eq!(hull.len(), 2, "a line has no polygonal hull");
    }

    #[test]
    fn quad_filter_preserves_the_hull() {
        // a dense diamond cloud: the quad culls almost everything, yet the
        // hull must still contain all extreme points
        let mut coords = Vec::new();
        for i in -10_i32..=10 {
            for j in -10_i32..=10 {
                if i.abs() + j.abs() <= 10 {
                    coords.push((f64::from(i), f64::from(j)));
                }
            }
        }
        let points = pts(&coords);
        let hull = convex_hull_indices(&points);
        assert_eq!(hull.len(), 4, "diamond hull has exactly the four tips");
        for &i in &hull {
            let p = points[i as usize];
            assert_eq!(p.x.abs() + p.y.abs(), 10.0, "hull vertices are the tips");
        }
    }

    #[test]
    fn hull_is_counterclockwise() {
        let points = pts(&[(2.0, 1.0), (7.0, 2.0), (9.0, 6.0), (4.0, 9.0), (1.0, 5.0), (5.0, 5.0)]);
        let hull = convex_hull_indices(&points);
        assert!(hull.len() >= 3, "non-degenerate input");
        let mut area2 = 0.0;
        for k in 0..hull.len() {
            let p = points[hull[k] as usize];
            let q = points[hull[(k + 1) % hull.len()] as usize];
            area2 += p.x * q.y - q.x * p.y;
        }
        assert!(area2 > 0.0, "positive signed area means counterclockwise");
    }
}
