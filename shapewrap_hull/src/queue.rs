// Copyright 2026 the Shapewrap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small binary min-heap keyed by `f64` distances.
//!
//! `core::collections` has no binary heap and `BinaryHeap` is a max-heap
//! requiring `Ord` keys anyway; this one orders raw `f64` keys with
//! `total_cmp` and stays allocation-friendly for the short-lived queues the
//! candidate search creates per edge.

use alloc::vec::Vec;

/// Min-heap of `(key, value)` pairs, smallest key first.
#[derive(Clone, Debug, Default)]
pub(crate) struct MinQueue<T> {
    items: Vec<(f64, T)>,
}

impl<T> MinQueue<T> {
    pub(crate) const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The entry with the smallest key, if any.
    pub(crate) fn peek(&self) -> Option<&(f64, T)> {
        self.items.first()
    }

    pub(crate) fn push(&mut self, key: f64, value: T) {
        self.items.push((key, value));
        self.sift_up(self.items.len() - 1);
    }

    /// Remove and return the entry with the smallest key.
    pub(crate) fn pop(&mut self) -> Option<(f64, T)> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let out = self.items.pop();
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        out
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.items[i].0.total_cmp(&self.items[parent].0).is_lt() {
                self.items.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.items.len();
        loop {
            let mut smallest = i;
            for child in [2 * i + 1, 2 * i + 2] {
                if child < len
                    && self.items[child]
                        .0
                        .total_cmp(&self.items[smallest].0)
                        .is_lt()
                {
                    smallest = child;
                }
            }
            if smallest == i {
                return;
            }
            self.items.swap(i, smallest);
            i = smallest;
        }
    }
}
