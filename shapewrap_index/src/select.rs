// Copyright 2026 the Shapewrap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Order-statistics partitioning used by the bulk loader.

use alloc::vec;

/// Partially sort `items` so that `items[k]` holds the element with rank `k`
/// by `key`, everything before it compares less-or-equal, and everything
/// after compares greater-or-equal.
///
/// Plain quickselect with a middle pivot; the bulk loader only ever calls it
/// on freshly shuffled tiles, so no Floyd-Rivest style narrowing is needed.
pub(crate) fn quickselect_by<T: Copy>(items: &mut [T], k: usize, key: impl Fn(&T) -> f64 + Copy) {
    debug_assert!(k < items.len(), "rank out of range");
    let mut left = 0;
    let mut right = items.len() - 1;
    while left < right {
        let pivot = items[left + (right - left) / 2];
        items.swap(left + (right - left) / 2, right);
        let mut store = left;
        for i in left..right {
            if key(&items[i]) < key(&pivot) {
                items.swap(i, store);
                store += 1;
            }
        }
        items.swap(store, right);
        if k == store {
            return;
        }
        if k < store {
            right = store - 1;
        } else {
            left = store + 1;
        }
    }
}

/// Rearrange `items` into groups of `n` unsorted elements, with the groups
/// themselves ordered by `key` relative to each other.
///
/// Combines quickselect with a binary divide-and-conquer over an explicit
/// stack; this is the multi-way generalization the bulk loader uses to cut
/// a level into near-equal tiles without fully sorting it.
pub(crate) fn multi_select_by<T: Copy>(items: &mut [T], n: usize, key: impl Fn(&T) -> f64 + Copy) {
    if items.is_empty() {
        return;
    }
    let mut stack = vec![(0_usize, items.len() - 1)];
    while let Some((left, right)) = stack.pop() {
        if right - left <= n {
            continue;
        }
        let mid = left + (right - left).div_ceil(2 * n) * n;
        quickselect_by(&mut items[left..=right], mid - left, key);
        stack.push((left, mid));
        stack.push((mid, right));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn quickselect_places_rank_k() {
        let mut v: Vec<f64> = [9.0, 1.0, 8.0, 2.0, 7.0, 3.0, 6.0, 4.0, 5.0].into();
        quickselect_by(&mut v, 4, |x| *x);
        assert_eq!(v[4], 5.0);
        assert!(v[..4].iter().all(|x| *x <= 5.0));
        assert!(v[5..].iter().all(|x| *x >= 5.0));
    }

    #[test]
    fn quickselect_handles_duplicates_and_extremes() {
        let mut v: Vec<f64> = [2.0, 2.0, 2.0, 1.0, 2.0, 3.0, 2.0].into();
        quickselect_by(&mut v, 0, |x| *x);
        assert_eq!(v[0], 1.0);
        quickselect_by(&mut v, 6, |x| *x);
        assert_eq!(v[6], 3.0);
    }

    #[test]
    fn multi_select_orders_groups() {
        let mut v: Vec<f64> = (0..64).rev().map(f64::from).collect();
        multi_select_by(&mut v, 8, |x| *x);
        // Every group of 8 must only contain values smaller than all values
        // in later groups.
        for g in 0..7 {
            let lo = &v[g * 8..(g + 1) * 8];
            let hi = &v[(g + 1) * 8..];
            let lo_max = lo.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let hi_min = hi.iter().cloned().fold(f64::INFINITY, f64::min);
            assert!(lo_max <= hi_min, "group {g} leaks past its successors");
        }
    }
}
