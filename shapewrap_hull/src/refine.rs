// Copyright 2026 the Shapewrap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The carving engine: refines a convex hull into a concave one.
//!
//! Every boundary edge goes through a FIFO work queue. For each edge the
//! engine looks for the nearest interior point it could flex inward to,
//! using a best-first search over the point index ordered by squared
//! distance to the edge. A candidate is accepted when it is closer to this
//! edge than to either neighboring edge (so adjacent edges do not fight
//! over the same point) and when neither new edge would cross the existing
//! boundary. Splicing the point in replaces one edge with two shorter ones,
//! both re-enqueued, so carving continues recursively until no edge can dig
//! further.
//!
//! The reach of an edge is bounded by `sq_len / concavity²`. A concavity of
//! zero makes the bound infinite and carving maximally aggressive; a huge
//! `length_threshold` retires every edge immediately and returns the convex
//! hull unchanged.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use kurbo::Point;
use shapewrap_index::{Aabb, BoxTree, NodeId};

use crate::boundary::{Ring, VertexId};
use crate::dist::{sq_dist, sq_seg_box_dist, sq_seg_dist};
use crate::orient::orient2d;
use crate::queue::MinQueue;

/// Refine the convex `hull` of `points` into a concave ring.
///
/// `hull` holds point indices in counterclockwise order; the result is the
/// concave ring in the same order, starting at `hull[0]`, with the first
/// index repeated at the end to close it.
pub(crate) fn carve(
    points: &[Point],
    hull: &[u32],
    concavity: f64,
    length_threshold: f64,
) -> Vec<u32> {
    let concavity = concavity.max(0.0);

    let mut point_tree: BoxTree<u32> = BoxTree::new();
    let items: Vec<(Aabb, u32)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            #[allow(clippy::cast_possible_truncation, reason = "checked by the caller")]
            let i = i as u32;
            (Aabb::point(p.x, p.y), i)
        })
        .collect();
    point_tree.bulk_load(&items);

    // hull vertices leave the point index and seed the boundary ring
    let Some((&first, rest)) = hull.split_first() else {
        return Vec::new();
    };
    let mut ring = Ring::with_capacity(points.len());
    let mut queue: VecDeque<VertexId> = VecDeque::with_capacity(hull.len());
    let p = points[first as usize];
    let _ = point_tree.remove(&Aabb::point(p.x, p.y), &first);
    let start = ring.insert_first(first);
    queue.push_back(start);
    let mut last = start;
    for &h in rest {
        let p = points[h as usize];
        let _ = point_tree.remove(&Aabb::point(p.x, p.y), &h);
        last = ring.insert_after(last, h);
        queue.push_back(last);
    }

    // boundary edges get their own index for the crossing checks
    let mut edge_tree: BoxTree<VertexId> = BoxTree::new();
    for &v in &queue {
        let aabb = refresh_edge(&mut ring, points, v);
        edge_tree.insert(aabb, v);
    }

    let sq_concavity = concavity * concavity;
    let sq_len_threshold = length_threshold * length_threshold;

    while let Some(v) = queue.pop_front() {
        let b = ring.point(v);
        let c = ring.point(ring.next(v));
        let pb = points[b as usize];
        let pc = points[c as usize];

        // short edges are final
        let sq_len = sq_dist(pb, pc);
        if sq_len < sq_len_threshold {
            continue;
        }

        // IEEE division: a zero concavity gives an unbounded reach
        let max_sq_dist = sq_len / sq_concavity;

        let a = ring.point(ring.prev(v));
        let d = ring.point(ring.next(ring.next(v)));
        let Some(p) = find_candidate(
            &point_tree,
            points,
            a,
            b,
            c,
            d,
            max_sq_dist,
            &edge_tree,
            &ring,
        ) else {
            continue;
        };
        let pp = points[p as usize];
        if sq_dist(pp, pb).min(sq_dist(pp, pc)) > max_sq_dist {
            continue;
        }

        // flex the edge inward through p: both halves go back to work
        queue.push_back(v);
        let w = ring.insert_after(v, p);
        queue.push_back(w);

        let _ = point_tree.remove(&Aabb::point(pp.x, pp.y), &p);
        // the edge must be removed under the box it was indexed with
        let stale = ring.edge(v);
        let _ = edge_tree.remove(&stale, &v);
        let aabb = refresh_edge(&mut ring, points, v);
        edge_tree.insert(aabb, v);
        let aabb = refresh_edge(&mut ring, points, w);
        edge_tree.insert(aabb, w);
    }

    let mut out = Vec::with_capacity(points.len() + 1);
    let mut v = start;
    loop {
        out.push(ring.point(v));
        v = ring.next(v);
        if v == start {
            break;
        }
    }
    out.push(ring.point(start));
    out
}

fn refresh_edge(ring: &mut Ring, points: &[Point], v: VertexId) -> Aabb {
    let p = points[ring.point(v) as usize];
    let q = points[ring.point(ring.next(v)) as usize];
    let aabb = Aabb::segment(p.x, p.y, q.x, q.y);
    ring.set_edge(v, aabb);
    aabb
}

#[derive(Copy, Clone, Debug)]
enum Candidate {
    Node(NodeId),
    Point(u32),
}

/// Best-first search for the point the edge `bc` should flex inward to.
///
/// `a` and `d` are the far endpoints of the neighboring edges. Tree nodes
/// and points share one priority queue keyed by squared distance to `bc`;
/// subtrees farther than `max_sq_dist` are pruned outright. Points are
/// accepted only if strictly closer to `bc` than to both neighboring edges
/// and if connecting them crosses no existing boundary edge.
fn find_candidate(
    point_tree: &BoxTree<u32>,
    points: &[Point],
    a: u32,
    b: u32,
    c: u32,
    d: u32,
    max_sq_dist: f64,
    edge_tree: &BoxTree<VertexId>,
    ring: &Ring,
) -> Option<u32> {
    let pa = points[a as usize];
    let pb = points[b as usize];
    let pc = points[c as usize];
    let pd = points[d as usize];

    let mut queue: MinQueue<Candidate> = MinQueue::new();
    let mut node = Some(point_tree.root_id());
    while let Some(id) = node {
        if point_tree.is_leaf(id) {
            for e in point_tree.entries(id) {
                let dist = sq_seg_dist(points[e.payload as usize], pb, pc);
                if dist <= max_sq_dist {
                    queue.push(dist, Candidate::Point(e.payload));
                }
            }
        } else {
            for &child in point_tree.children(id) {
                let dist = sq_seg_box_dist(pb, pc, &point_tree.node_aabb(child));
                if dist <= max_sq_dist {
                    queue.push(dist, Candidate::Node(child));
                }
            }
        }

        // drain all points at the head of the queue before descending
        // further; they are closer than every unexplored subtree
        while let Some(&(dist, Candidate::Point(p))) = queue.peek() {
            let _ = queue.pop();
            let pp = points[p as usize];
            // ties go to the neighboring edge, which sees the point later
            // from a shorter edge of its own
            let d0 = sq_seg_dist(pp, pa, pb);
            let d1 = sq_seg_dist(pp, pc, pd);
            if dist < d0
                && dist < d1
                && no_crossings(points, ring, edge_tree, b, p)
                && no_crossings(points, ring, edge_tree, c, p)
            {
                return Some(p);
            }
        }

        node = match queue.pop() {
            Some((_, Candidate::Node(n))) => Some(n),
            _ => None,
        };
    }
    None
}

/// Whether the open segment from point `a` to point `b` avoids every edge
/// currently on the boundary.
fn no_crossings(
    points: &[Point],
    ring: &Ring,
    edge_tree: &BoxTree<VertexId>,
    a: u32,
    b: u32,
) -> bool {
    let pa = points[a as usize];
    let pb = points[b as usize];
    let query = Aabb::segment(pa.x, pa.y, pb.x, pb.y);
    let mut clear = true;
    edge_tree.visit(&query, |e| {
        let v = e.payload;
        let p = ring.point(v);
        let q = ring.point(ring.next(v));
        if segments_cross(points, p, q, a, b) {
            clear = false;
        }
    });
    clear
}

/// Proper crossing test between segments `p1 q1` and `p2 q2`, given as
/// point indices. Segments sharing an endpoint index never cross; touching
/// at interior points does not count either, only sign-alternating
/// orientations on both sides do.
fn segments_cross(points: &[Point], p1: u32, q1: u32, p2: u32, q2: u32) -> bool {
    if p1 == q2 || q1 == p2 {
        return false;
    }
    let a = points[p1 as usize];
    let b = points[q1 as usize];
    let c = points[p2 as usize];
    let d = points[q2 as usize];
    (orient2d(a, b, c) > 0.0) != (orient2d(a, b, d) > 0.0)
        && (orient2d(c, d, a) > 0.0) != (orient2d(c, d, b) > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convex::convex_hull_indices;
    use alloc::vec;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn crossing_respects_shared_indices() {
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (5.0, -5.0), (5.0, 5.0)]);
        assert!(segments_cross(&points, 0, 1, 2, 3));
        // sharing an endpoint index disables the test
        assert!(!segments_cross(&points, 0, 1, 1, 3));
        assert!(!segments_cross(&points, 0, 1, 2, 0));
        // parallel disjoint segments never cross
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (0.0, 1.0), (10.0, 1.0)]);
        assert!(!segments_cross(&points, 0, 1, 2, 3));
    }

    #[test]
    fn equidistant_center_survives_aggressive_carving() {
        // (5,5) is exactly as close to every edge of the square, so no edge
        // may claim it even with an unbounded reach
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (5.0, 5.0)]);
        let hull = convex_hull_indices(&points);
        let ring = carve(&points, &hull, 0.0, 0.0);
        assert_eq!(ring, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn off_center_point_is_carved_by_the_nearest_edge() {
        // (5,2) is closest to the bottom edge alone
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (5.0, 2.0)]);
        let hull = convex_hull_indices(&points);
        let ring = carve(&points, &hull, 0.0, 0.0);
        assert_eq!(ring, vec![0, 4, 1, 2, 3, 0]);
    }

    #[test]
    fn length_threshold_freezes_all_edges() {
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (5.0, 2.0)]);
        let hull = convex_hull_indices(&points);
        let ring = carve(&points, &hull, 0.0, 1000.0);
        assert_eq!(ring, vec![0, 1, 2, 3, 0], "every edge is below the threshold");
    }

    #[test]
    fn empty_hull_yields_empty_ring() {
        let points = pts(&[(0.0, 0.0)]);
        assert!(carve(&points, &[], 2.0, 0.0).is_empty());
    }
}
