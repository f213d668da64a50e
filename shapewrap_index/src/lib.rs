// Copyright 2026 the Shapewrap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shapewrap Index: a balanced 2D bounding-box tree with bulk loading.
//!
//! This is the spatial backbone of the Shapewrap hull crates, but it is a
//! self-contained index and can be used on its own.
//!
//! - Insert and remove axis-aligned bounding boxes ([`Aabb`]) with `Copy` payloads.
//! - [`BoxTree::bulk_load`] packs a point cloud into a balanced tree with
//!   sort-tile-recursive style tiling, much faster than one-by-one inserts.
//! - Query by overlapping rectangle with [`BoxTree::search`] / [`BoxTree::visit`],
//!   or ask for a boolean answer with [`BoxTree::collides`].
//! - Read-only node access ([`BoxTree::root_id`], [`BoxTree::children`],
//!   [`BoxTree::entries`]) lets callers run their own best-first traversals,
//!   e.g. nearest-neighbor searches with a distance priority queue.
//!
//! Incremental inserts choose the subtree needing the least area enlargement
//! and split overflowing nodes by the classic margin/overlap heuristics, so
//! the tree stays balanced under mixed load/insert/remove churn.
//!
//! # Example
//!
//! ```rust
//! use shapewrap_index::{Aabb, BoxTree};
//!
//! let mut tree: BoxTree<u32> = BoxTree::new();
//! tree.bulk_load(&[
//!     (Aabb::point(1.0, 1.0), 0),
//!     (Aabb::point(2.0, 9.0), 1),
//!     (Aabb::segment(4.0, 4.0, 8.0, 6.0), 2),
//! ]);
//!
//! let hits = tree.search(&Aabb::new(0.0, 0.0, 3.0, 3.0));
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].payload, 0);
//!
//! assert!(tree.remove(&Aabb::point(2.0, 9.0), &1));
//! assert_eq!(tree.len(), 2);
//! ```
//!
//! ### Float semantics
//!
//! Coordinates are `f64` and assumed finite; NaNs are not supported.

#![no_std]

extern crate alloc;

mod aabb;
mod select;
mod tree;
pub(crate) mod util;

pub use aabb::Aabb;
pub use tree::{BoxTree, DEFAULT_MAX_ENTRIES, Entry, NodeId};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn search_after_mixed_load_and_churn() {
        let mut tree: BoxTree<u32> = BoxTree::new();
        let grid: Vec<(Aabb, u32)> = (0..100)
            .map(|i| (Aabb::point(f64::from(i % 10), f64::from(i / 10)), i))
            .collect();
        tree.bulk_load(&grid);
        tree.insert(Aabb::point(4.5, 4.5), 100);
        assert!(tree.remove(&Aabb::point(4.0, 4.0), &44));

        let mut hits: Vec<u32> = tree
            .search(&Aabb::new(3.5, 3.5, 5.5, 5.5))
            .iter()
            .map(|e| e.payload)
            .collect();
        hits.sort_unstable();
        assert_eq!(hits, [45, 54, 55, 100]);
    }

    #[test]
    fn traversal_accessors_reach_every_entry() {
        let mut tree: BoxTree<u32> = BoxTree::with_max_entries(4);
        let items: Vec<(Aabb, u32)> = (0..40)
            .map(|i| (Aabb::point(f64::from(i), f64::from(i * 7 % 13)), i))
            .collect();
        tree.bulk_load(&items);

        let mut seen = Vec::new();
        let mut stack = alloc::vec![tree.root_id()];
        while let Some(id) = stack.pop() {
            assert!(
                tree.node_aabb(tree.root_id()).contains(&tree.node_aabb(id)),
                "root box must cover every node box"
            );
            if tree.is_leaf(id) {
                seen.extend(tree.entries(id).iter().map(|e| e.payload));
            } else {
                stack.extend_from_slice(tree.children(id));
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..40).collect::<Vec<u32>>());
    }
}
