// Copyright 2026 the Shapewrap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adaptive-precision orientation predicate.
//!
//! [`orient2d`] returns a value whose sign is the exact orientation of the
//! point triple, never a rounded one. It starts with a plain floating-point
//! determinant and escalates through progressively more exact expansion
//! arithmetic only when the rounded result could have the wrong sign, so the
//! common case costs a handful of flops.
//!
//! The expansion machinery follows Shewchuk's arbitrary precision floating
//! point technique: every product and sum is split into a head and an exact
//! roundoff tail, and multi-component expansions are merged with zero
//! elimination.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

/// Rounding unit of f64: half the distance from 1.0 to the next float.
const EPSILON: f64 = 1.110_223_024_625_156_5e-16;
/// 2^27 + 1, splits a 53-bit mantissa into two 26-bit halves.
const SPLITTER: f64 = 134_217_729.0;
const RESULTERRBOUND: f64 = (3.0 + 8.0 * EPSILON) * EPSILON;
const CCWERRBOUND_A: f64 = (3.0 + 16.0 * EPSILON) * EPSILON;
const CCWERRBOUND_B: f64 = (2.0 + 12.0 * EPSILON) * EPSILON;
const CCWERRBOUND_C: f64 = (9.0 + 64.0 * EPSILON) * EPSILON * EPSILON;

/// Head and exact roundoff tail of `a + b`.
#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let x = a + b;
    let bvirt = x - a;
    let y = (a - (x - bvirt)) + (b - bvirt);
    (x, y)
}

/// Head and exact roundoff tail of `a - b`.
#[inline]
fn two_diff(a: f64, b: f64) -> (f64, f64) {
    let x = a - b;
    let bvirt = a - x;
    let y = (a - (x + bvirt)) + (bvirt - b);
    (x, y)
}

/// Roundoff tail of an already computed difference `x = a - b`.
#[inline]
fn two_diff_tail(a: f64, b: f64, x: f64) -> f64 {
    let bvirt = a - x;
    (a - (x + bvirt)) + (bvirt - b)
}

/// Split into two non-overlapping halves whose sum is exactly `a`.
#[inline]
fn split(a: f64) -> (f64, f64) {
    let c = SPLITTER * a;
    let hi = c - (c - a);
    (hi, a - hi)
}

/// Head and exact roundoff tail of `a * b`.
#[inline]
fn two_product(a: f64, b: f64) -> (f64, f64) {
    let x = a * b;
    let (ahi, alo) = split(a);
    let (bhi, blo) = split(b);
    let y = alo * blo - (x - ahi * bhi - alo * bhi - ahi * blo);
    (x, y)
}

/// Four-component expansion of `(a1, a0) - (b1, b0)`, least significant
/// first.
#[inline]
fn two_two_diff(a1: f64, a0: f64, b1: f64, b0: f64) -> [f64; 4] {
    let (i, x0) = two_diff(a0, b0);
    let (j, o) = two_sum(a1, i);
    let (i2, x1) = two_diff(o, b1);
    let (x3, x2) = two_sum(j, i2);
    [x0, x1, x2, x3]
}

/// Merge two sorted expansions into `h`, dropping zero components.
/// Returns the number of components written; `h[len - 1]` is the most
/// significant one.
fn fast_expansion_sum_zeroelim(e: &[f64], f: &[f64], h: &mut [f64]) -> usize {
    let mut eindex = 0;
    let mut findex = 0;
    let mut enow = e[0];
    let mut fnow = f[0];
    let mut q;
    if (fnow > enow) == (fnow > -enow) {
        q = enow;
        eindex += 1;
        enow = e.get(eindex).copied().unwrap_or(0.0);
    } else {
        q = fnow;
        findex += 1;
        fnow = f.get(findex).copied().unwrap_or(0.0);
    }
    let mut hindex = 0;
    if eindex < e.len() && findex < f.len() {
        let (qnew, hh) = if (fnow > enow) == (fnow > -enow) {
            let r = fast_two_sum(enow, q);
            eindex += 1;
            enow = e.get(eindex).copied().unwrap_or(0.0);
            r
        } else {
            let r = fast_two_sum(fnow, q);
            findex += 1;
            fnow = f.get(findex).copied().unwrap_or(0.0);
            r
        };
        q = qnew;
        if hh != 0.0 {
            h[hindex] = hh;
            hindex += 1;
        }
        while eindex < e.len() && findex < f.len() {
            let (qnew, hh) = if (fnow > enow) == (fnow > -enow) {
                let r = two_sum(q, enow);
                eindex += 1;
                enow = e.get(eindex).copied().unwrap_or(0.0);
                r
            } else {
                let r = two_sum(q, fnow);
                findex += 1;
                fnow = f.get(findex).copied().unwrap_or(0.0);
                r
            };
            q = qnew;
            if hh != 0.0 {
                h[hindex] = hh;
                hindex += 1;
            }
        }
    }
    while eindex < e.len() {
        let (qnew, hh) = two_sum(q, enow);
        eindex += 1;
        enow = e.get(eindex).copied().unwrap_or(0.0);
        q = qnew;
        if hh != 0.0 {
            h[hindex] = hh;
            hindex += 1;
        }
    }
    while findex < f.len() {
        let (qnew, hh) = two_sum(q, fnow);
        findex += 1;
        fnow = f.get(findex).copied().unwrap_or(0.0);
        q = qnew;
        if hh != 0.0 {
            h[hindex] = hh;
            hindex += 1;
        }
    }
    if q != 0.0 || hindex == 0 {
        h[hindex] = q;
        hindex += 1;
    }
    hindex
}

/// Like [`two_sum`] but assumes `|a| >= |b|`.
#[inline]
fn fast_two_sum(a: f64, b: f64) -> (f64, f64) {
    let x = a + b;
    (x, b - (x - a))
}

/// Approximate value of an expansion.
#[inline]
fn estimate(e: &[f64]) -> f64 {
    e.iter().sum()
}

/// Orientation of the triple `(a, b, c)`.
///
/// Positive when `c` lies to the left of the directed line from `a` to `b`
/// (counterclockwise turn), negative when it lies to the right, and exactly
/// `0.0` when the three points are collinear. The magnitude approximates
/// twice the signed triangle area but only the sign is guaranteed.
pub fn orient2d(a: Point, b: Point, c: Point) -> f64 {
    let detleft = (a.x - c.x) * (b.y - c.y);
    let detright = (a.y - c.y) * (b.x - c.x);
    let det = detleft - detright;

    // sign differs or a factor is exactly zero: no cancellation possible
    if detleft == 0.0 || detright == 0.0 || (detleft > 0.0) != (detright > 0.0) {
        return det;
    }
    let detsum = (detleft + detright).abs();
    if det.abs() >= CCWERRBOUND_A * detsum {
        return det;
    }
    orient2d_adapt(a, b, c, detsum)
}

/// Exact escalation path, entered only when the fast determinant is within
/// its error bound of zero.
fn orient2d_adapt(a: Point, b: Point, c: Point, detsum: f64) -> f64 {
    let acx = a.x - c.x;
    let bcx = b.x - c.x;
    let acy = a.y - c.y;
    let bcy = b.y - c.y;

    let (s1, s0) = two_product(acx, bcy);
    let (t1, t0) = two_product(acy, bcx);
    let bb = two_two_diff(s1, s0, t1, t0);

    let mut det = estimate(&bb);
    let errbound = CCWERRBOUND_B * detsum;
    if det >= errbound || -det >= errbound {
        return det;
    }

    let acxtail = two_diff_tail(a.x, c.x, acx);
    let bcxtail = two_diff_tail(b.x, c.x, bcx);
    let acytail = two_diff_tail(a.y, c.y, acy);
    let bcytail = two_diff_tail(b.y, c.y, bcy);

    if acxtail == 0.0 && acytail == 0.0 && bcxtail == 0.0 && bcytail == 0.0 {
        return det;
    }

    let errbound = CCWERRBOUND_C * detsum + RESULTERRBOUND * det.abs();
    det += (acx * bcytail + bcy * acxtail) - (acy * bcxtail + bcx * acytail);
    if det >= errbound || -det >= errbound {
        return det;
    }

    let mut c1 = [0.0_f64; 8];
    let mut c2 = [0.0_f64; 12];
    let mut d = [0.0_f64; 16];

    let (s1, s0) = two_product(acxtail, bcy);
    let (t1, t0) = two_product(acytail, bcx);
    let u = two_two_diff(s1, s0, t1, t0);
    let c1len = fast_expansion_sum_zeroelim(&bb, &u, &mut c1);

    let (s1, s0) = two_product(acx, bcytail);
    let (t1, t0) = two_product(acy, bcxtail);
    let u = two_two_diff(s1, s0, t1, t0);
    let c2len = fast_expansion_sum_zeroelim(&c1[..c1len], &u, &mut c2);

    let (s1, s0) = two_product(acxtail, bcytail);
    let (t1, t0) = two_product(acytail, bcxtail);
    let u = two_two_diff(s1, s0, t1, t0);
    let dlen = fast_expansion_sum_zeroelim(&c2[..c2len], &u, &mut d);

    d[dlen - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_turns() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!(orient2d(a, b, Point::new(5.0, 1.0)) > 0.0);
        assert!(orient2d(a, b, Point::new(5.0, -1.0)) < 0.0);
    }

    #[test]
    fn collinear_is_exactly_zero() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(orient2d(a, b, Point::new(5.0, 0.0)), 0.0);
        // collinear but with coordinates that stress the splitter
        let p = Point::new(1e30, 1e30);
        let q = Point::new(2e30, 2e30);
        let r = Point::new(3e30, 3e30);
        assert_eq!(orient2d(p, q, r), 0.0);
    }

    #[test]
    fn antisymmetry() {
        let a = Point::new(0.1, 0.1);
        let b = Point::new(7.3, 2.9);
        let c = Point::new(3.4, 8.8);
        let d1 = orient2d(a, b, c);
        let d2 = orient2d(b, a, c);
        assert!(d1 > 0.0 && d2 < 0.0, "swapping two points flips the sign");
    }

    #[test]
    fn near_degenerate_sign_is_exact() {
        // c sits one ulp off the line through a and b; the fast determinant
        // underflows into its error bound and the expansion path decides.
        let a = Point::new(12.0, 12.0);
        let b = Point::new(24.0, 24.0);
        let up = Point::new(0.5, 0.5 + f64::EPSILON);
        let down = Point::new(0.5, 0.5 - f64::EPSILON);
        let on = Point::new(0.5, 0.5);
        assert!(orient2d(a, b, up) > 0.0);
        assert!(orient2d(a, b, down) < 0.0);
        assert_eq!(orient2d(a, b, on), 0.0);
    }

    #[test]
    fn expansion_sum_handles_cancellation() {
        let mut h = [0.0_f64; 8];
        let len = fast_expansion_sum_zeroelim(&[1.0, 1e20], &[-1.0, -1e20], &mut h);
        assert_eq!(&h[..len], &[0.0]);

        // the tiny parts survive as their own component instead of being
        // absorbed into the 3.0 head
        let len = fast_expansion_sum_zeroelim(&[1e-30, 1.0], &[2e-30, 2.0], &mut h);
        assert_eq!(&h[..len], &[3e-30, 3.0]);
    }
}
