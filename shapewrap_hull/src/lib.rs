// Copyright 2026 the Shapewrap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shapewrap Hull: concave hulls of 2D point sets by convex hull carving.
//!
//! The hull starts as the convex hull of the input and is refined edge by
//! edge: each boundary edge flexes inward to the nearest interior point
//! that does not introduce a self-intersection, recursively, until every
//! edge is either short enough or has nothing left to reach. Two knobs
//! control the result:
//!
//! - `concavity`: relative measure of how far an edge may dig, as a ratio
//!   of edge length. `2.0` is a reasonable default; `0.0` carves as deep as
//!   the input allows; very large values leave the convex hull untouched.
//! - `length_threshold`: edges shorter than this are kept as they are,
//!   which bounds the level of detail in dense clouds.
//!
//! Candidate lookups run against a [`shapewrap_index::BoxTree`] of the
//! interior points, and orientation questions go through an
//! adaptive-precision predicate, so the result is a simple (non
//! self-intersecting) polygon even on near-degenerate input.
//!
//! # Example
//!
//! ```rust
//! use shapewrap_hull::{concave_hull, Point};
//!
//! // a square with a point at its center
//! let points = [
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(10.0, 10.0),
//!     Point::new(0.0, 10.0),
//!     Point::new(5.0, 5.0),
//! ];
//! let ring = concave_hull(&points, 2.0, 0.0).unwrap();
//! // closed ring: the first point is repeated at the end
//! assert_eq!(ring.first(), ring.last());
//! ```
//!
//! ### Float semantics
//!
//! Coordinates must be finite; NaN or infinite coordinates are rejected
//! with [`Error::NonFiniteCoordinate`]. Exact duplicate points are merged
//! before hulling, keeping the first occurrence.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashSet;

pub use kurbo::Point;

mod boundary;
mod convex;
mod dist;
mod orient;
mod queue;
mod refine;

pub use orient::orient2d;

/// Reasons a hull cannot be computed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Fewer than three distinct points after merging duplicates.
    TooFewPoints {
        /// Number of distinct points that were available.
        got: usize,
    },
    /// A coordinate was NaN or infinite.
    NonFiniteCoordinate {
        /// Index of the offending point in the input slice.
        index: usize,
    },
    /// All distinct points lie on a single line.
    Collinear,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints { got } => {
                write!(f, "need at least 3 distinct points, got {got}")
            }
            Self::NonFiniteCoordinate { index } => {
                write!(f, "point {index} has a non-finite coordinate")
            }
            Self::Collinear => write!(f, "all points are collinear"),
        }
    }
}

impl core::error::Error for Error {}

/// Concave hull of `points` as a closed counterclockwise ring.
///
/// The ring starts at the hull vertex that is lowest in `(x, y)` order and
/// repeats its first point at the end. Every vertex of the ring is one of
/// the input points.
///
/// See the crate docs for what `concavity` and `length_threshold` mean.
/// Both are clamped only as far as the algorithm needs: a negative
/// `concavity` behaves like zero, and a `length_threshold` of zero disables
/// the edge length cutoff.
pub fn concave_hull(
    points: &[Point],
    concavity: f64,
    length_threshold: f64,
) -> Result<Vec<Point>, Error> {
    for (index, p) in points.iter().enumerate() {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(Error::NonFiniteCoordinate { index });
        }
    }
    if points.len() < 3 {
        return Err(Error::TooFewPoints { got: points.len() });
    }

    // merge exact duplicates, keeping first occurrences in input order
    let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(points.len());
    let mut distinct: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if seen.insert((p.x.to_bits(), p.y.to_bits())) {
            distinct.push(*p);
        }
    }
    if distinct.len() < 3 {
        return Err(Error::TooFewPoints {
            got: distinct.len(),
        });
    }

    let hull = convex::convex_hull_indices(&distinct);
    if hull.len() < 3 {
        return Err(Error::Collinear);
    }

    let ring = refine::carve(&distinct, &hull, concavity, length_threshold);
    Ok(ring.into_iter().map(|i| distinct[i as usize]).collect())
}

/// [`concave_hull`] with a concavity of `2.0` and no length threshold.
pub fn concave_hull_default(points: &[Point]) -> Result<Vec<Point>, Error> {
    concave_hull(points, 2.0, 0.0)
}
