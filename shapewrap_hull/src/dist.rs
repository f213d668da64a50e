// Copyright 2026 the Shapewrap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Squared-distance helpers for the candidate search.
//!
//! Everything here stays in squared space; the engine compares squared
//! lengths throughout and never needs a square root.

use kurbo::Point;
use shapewrap_index::Aabb;

/// Squared distance between two points.
#[inline]
pub(crate) fn sq_dist(a: Point, b: Point) -> f64 {
    (b - a).hypot2()
}

/// Squared distance from `p` to the segment `ab`.
pub(crate) fn sq_seg_dist(p: Point, a: Point, b: Point) -> f64 {
    let mut x = a.x;
    let mut y = a.y;
    let mut dx = b.x - x;
    let mut dy = b.y - y;

    if dx != 0.0 || dy != 0.0 {
        let t = ((p.x - x) * dx + (p.y - y) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            x = b.x;
            y = b.y;
        } else if t > 0.0 {
            x += dx * t;
            y += dy * t;
        }
    }
    dx = p.x - x;
    dy = p.y - y;
    dx * dx + dy * dy
}

/// Squared distance between segments `p0 p1` and `p2 p3`.
///
/// Clamped closest-point parameterization; parallel and degenerate segments
/// fall out of the `d == 0` branch.
pub(crate) fn sq_seg_seg_dist(p0: Point, p1: Point, p2: Point, p3: Point) -> f64 {
    let ux = p1.x - p0.x;
    let uy = p1.y - p0.y;
    let vx = p3.x - p2.x;
    let vy = p3.y - p2.y;
    let wx = p0.x - p2.x;
    let wy = p0.y - p2.y;
    let a = ux * ux + uy * uy;
    let b = ux * vx + uy * vy;
    let c = vx * vx + vy * vy;
    let d = ux * wx + uy * wy;
    let e = vx * wx + vy * wy;
    let det = a * c - b * b;

    let mut s_num;
    let mut s_den = det;
    let mut t_num;
    let t_den;

    if det == 0.0 {
        s_num = 0.0;
        s_den = 1.0;
        t_num = e;
        t_den = c;
    } else {
        s_num = b * e - c * d;
        t_num = a * e - b * d;
        if s_num < 0.0 {
            s_num = 0.0;
            t_num = e;
            t_den = c;
        } else if s_num > s_den {
            s_num = s_den;
            t_num = e + b;
            t_den = c;
        } else {
            t_den = det;
        }
    }

    if t_num < 0.0 {
        t_num = 0.0;
        if -d < 0.0 {
            s_num = 0.0;
        } else if -d > a {
            s_num = s_den;
        } else {
            s_num = -d;
            s_den = a;
        }
    } else if t_num > t_den {
        t_num = t_den;
        if -d + b < 0.0 {
            s_num = 0.0;
        } else if -d + b > a {
            s_num = s_den;
        } else {
            s_num = -d + b;
            s_den = a;
        }
    }

    let s = if s_num == 0.0 { 0.0 } else { s_num / s_den };
    let t = if t_num == 0.0 { 0.0 } else { t_num / t_den };

    let cx = (1.0 - s) * p0.x + s * p1.x;
    let cy = (1.0 - s) * p0.y + s * p1.y;
    let cx2 = (1.0 - t) * p2.x + t * p3.x;
    let cy2 = (1.0 - t) * p2.y + t * p3.y;
    let dx = cx2 - cx;
    let dy = cy2 - cy;
    dx * dx + dy * dy
}

/// Squared distance from the segment `ab` to a bounding box.
///
/// Zero when either endpoint is inside the box or the segment touches any
/// of the four box edges.
pub(crate) fn sq_seg_box_dist(a: Point, b: Point, aabb: &Aabb) -> f64 {
    if point_in_aabb(a, aabb) || point_in_aabb(b, aabb) {
        return 0.0;
    }
    let corners = [
        (
            Point::new(aabb.min_x, aabb.min_y),
            Point::new(aabb.max_x, aabb.min_y),
        ),
        (
            Point::new(aabb.min_x, aabb.min_y),
            Point::new(aabb.min_x, aabb.max_y),
        ),
        (
            Point::new(aabb.max_x, aabb.min_y),
            Point::new(aabb.max_x, aabb.max_y),
        ),
        (
            Point::new(aabb.min_x, aabb.max_y),
            Point::new(aabb.max_x, aabb.max_y),
        ),
    ];
    let mut min = f64::INFINITY;
    for (p, q) in corners {
        let d = sq_seg_seg_dist(a, b, p, q);
        if d == 0.0 {
            return 0.0;
        }
        min = min.min(d);
    }
    min
}

#[inline]
fn point_in_aabb(p: Point, aabb: &Aabb) -> bool {
    p.x >= aabb.min_x && p.x <= aabb.max_x && p.y >= aabb.min_y && p.y <= aabb.max_y
}
