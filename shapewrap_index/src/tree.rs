// Copyright 2026 the Shapewrap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The balanced bounding-box tree: bulk load, insert, remove, queries.

use alloc::vec::Vec;
use core::mem;

use smallvec::SmallVec;

use crate::aabb::Aabb;
use crate::select::multi_select_by;
use crate::util::isqrt_ceil;

/// Default maximum number of children per node.
///
/// Smaller values favor trees that see many incremental inserts; larger
/// values favor trees built once with [`BoxTree::bulk_load`] and then only
/// queried.
pub const DEFAULT_MAX_ENTRIES: usize = 16;

/// Handle to a node in the tree arena.
///
/// Handles are only meaningful for the tree that produced them and are
/// invalidated by any mutation; they exist so callers can run their own
/// best-first traversals over a quiescent tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A leaf record: bounding box plus caller payload.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Entry<P> {
    /// The indexed box.
    pub aabb: Aabb,
    /// Caller data carried alongside the box.
    pub payload: P,
}

#[derive(Clone, Debug)]
enum NodeKind<P> {
    Leaf(SmallVec<[Entry<P>; 4]>),
    Branch(SmallVec<[NodeId; 4]>),
}

#[derive(Clone, Debug)]
struct Node<P> {
    aabb: Aabb,
    /// 1 for leaves, parents one more than their children.
    height: u32,
    kind: NodeKind<P>,
}

impl<P> Node<P> {
    fn child_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(entries) => entries.len(),
            NodeKind::Branch(children) => children.len(),
        }
    }
}

/// What gets planted by the shared insertion path: a leaf entry during
/// normal inserts, or a whole subtree when merging a bulk-loaded tree.
enum Planted<P> {
    Entry(Entry<P>),
    Subtree(NodeId),
}

/// A balanced bounding-box tree over f64 boxes with `Copy` payloads.
///
/// Nodes live in an arena and reference each other by [`NodeId`]; removed
/// nodes go on a free list. Non-root nodes hold between `m` (40% of the
/// maximum, at least 2) and `max_entries` children except transiently
/// during a split.
///
/// Removal matches on exact box equality plus payload equality and is a
/// no-op when nothing matches.
///
/// # Example
///
/// ```rust
/// use shapewrap_index::{Aabb, BoxTree};
///
/// let mut tree: BoxTree<u32> = BoxTree::new();
/// tree.bulk_load(&[
///     (Aabb::point(0.0, 0.0), 0),
///     (Aabb::point(5.0, 5.0), 1),
///     (Aabb::point(9.0, 1.0), 2),
/// ]);
/// let hits = tree.search(&Aabb::new(4.0, 4.0, 6.0, 6.0));
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].payload, 1);
/// ```
#[derive(Clone, Debug)]
pub struct BoxTree<P> {
    nodes: Vec<Node<P>>,
    free: Vec<NodeId>,
    root: NodeId,
    max_entries: usize,
    min_entries: usize,
    len: usize,
}

impl<P: Copy> Default for BoxTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Copy> BoxTree<P> {
    /// Create an empty tree with [`DEFAULT_MAX_ENTRIES`] children per node.
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Create an empty tree with at most `max_entries` children per node
    /// (clamped to at least 4). The minimum fill is 40% of the maximum.
    pub fn with_max_entries(max_entries: usize) -> Self {
        let max_entries = max_entries.max(4);
        let min_entries = (max_entries * 2).div_ceil(5).max(2);
        let mut tree = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
            max_entries,
            min_entries,
            len: 0,
        };
        tree.root = tree.alloc(Node {
            aabb: Aabb::EMPTY,
            height: 1,
            kind: NodeKind::Leaf(SmallVec::new()),
        });
        tree
    }

    /// Number of entries currently indexed.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // --- queries ---

    /// Collect all entries whose box overlaps `query`.
    pub fn search(&self, query: &Aabb) -> Vec<Entry<P>> {
        let mut out = Vec::new();
        self.visit(query, |e| out.push(*e));
        out
    }

    /// Visit every entry whose box overlaps `query`.
    ///
    /// The traversal is iterative over an explicit stack; a child node fully
    /// contained in the query box is harvested wholesale without per-entry
    /// tests.
    pub fn visit<F: FnMut(&Entry<P>)>(&self, query: &Aabb, mut f: F) {
        if !query.overlaps(&self.node(self.root).aabb) {
            return;
        }
        let mut stack: Vec<NodeId> = Vec::new();
        let mut current = Some(self.root);
        while let Some(id) = current {
            match &self.node(id).kind {
                NodeKind::Leaf(entries) => {
                    for e in entries {
                        if query.overlaps(&e.aabb) {
                            f(e);
                        }
                    }
                }
                NodeKind::Branch(children) => {
                    for &c in children {
                        let child_box = self.node(c).aabb;
                        if query.overlaps(&child_box) {
                            if query.contains(&child_box) {
                                self.collect_all(c, &mut f);
                            } else {
                                stack.push(c);
                            }
                        }
                    }
                }
            }
            current = stack.pop();
        }
    }

    /// Whether any entry's box overlaps `query`.
    pub fn collides(&self, query: &Aabb) -> bool {
        if !query.overlaps(&self.node(self.root).aabb) {
            return false;
        }
        let mut stack: Vec<NodeId> = Vec::new();
        let mut current = Some(self.root);
        while let Some(id) = current {
            match &self.node(id).kind {
                NodeKind::Leaf(entries) => {
                    if entries.iter().any(|e| query.overlaps(&e.aabb)) {
                        return true;
                    }
                }
                NodeKind::Branch(children) => {
                    for &c in children {
                        let child_box = self.node(c).aabb;
                        if query.overlaps(&child_box) {
                            if query.contains(&child_box) {
                                return true;
                            }
                            stack.push(c);
                        }
                    }
                }
            }
            current = stack.pop();
        }
        false
    }

    fn collect_all<F: FnMut(&Entry<P>)>(&self, start: NodeId, f: &mut F) {
        let mut stack: Vec<NodeId> = Vec::new();
        let mut current = Some(start);
        while let Some(id) = current {
            match &self.node(id).kind {
                NodeKind::Leaf(entries) => {
                    for e in entries {
                        f(e);
                    }
                }
                NodeKind::Branch(children) => stack.extend_from_slice(children),
            }
            current = stack.pop();
        }
    }

    // --- read-only traversal for external best-first searches ---

    /// The root node handle.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The bounding box of a node.
    pub fn node_aabb(&self, id: NodeId) -> Aabb {
        self.node(id).aabb
    }

    /// Whether a node is a leaf.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Leaf(_))
    }

    /// Child node handles of a branch node; empty for leaves.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Branch(children) => children,
            NodeKind::Leaf(_) => &[],
        }
    }

    /// Entries of a leaf node; empty for branches.
    pub fn entries(&self, id: NodeId) -> &[Entry<P>] {
        match &self.node(id).kind {
            NodeKind::Leaf(entries) => entries,
            NodeKind::Branch(_) => &[],
        }
    }

    // --- mutation ---

    /// Insert one entry, splitting overflowing nodes on the way back up.
    pub fn insert(&mut self, aabb: Aabb, payload: P) {
        let depth = (self.node(self.root).height - 1) as usize;
        self.plant(Planted::Entry(Entry { aabb, payload }), depth);
        self.len += 1;
    }

    /// Bulk-load entries with recursive tile packing.
    ///
    /// Items are cut into near-equal column tiles by x and row tiles by y
    /// using order-statistics partitioning, recursing until a tile fits in
    /// one leaf. Loading into a non-empty tree merges the packed tree by
    /// height: equal heights split the root, otherwise the smaller tree is
    /// planted at the matching level of the larger one.
    pub fn bulk_load(&mut self, items: &[(Aabb, P)]) {
        if items.is_empty() {
            return;
        }
        if items.len() < self.min_entries {
            for &(aabb, payload) in items {
                self.insert(aabb, payload);
            }
            return;
        }
        let mut scratch: Vec<Entry<P>> = items
            .iter()
            .map(|&(aabb, payload)| Entry { aabb, payload })
            .collect();
        let loaded = self.build(&mut scratch, 0);
        self.len += items.len();

        if self.node(self.root).child_count() == 0 {
            // the tree was empty; adopt the packed tree as-is
            let old = mem::replace(&mut self.root, loaded);
            self.release(old);
        } else if self.node(self.root).height == self.node(loaded).height {
            self.split_root(loaded);
        } else if self.node(self.root).height < self.node(loaded).height {
            // the packed tree is taller; plant the old root inside it
            let old = mem::replace(&mut self.root, loaded);
            let depth = self.depth_for(self.node(old).height);
            self.plant(Planted::Subtree(old), depth);
        } else {
            let depth = self.depth_for(self.node(loaded).height);
            self.plant(Planted::Subtree(loaded), depth);
        }
    }

    /// Remove the entry matching `aabb` and `payload` exactly.
    ///
    /// The search only descends nodes whose box contains the target box.
    /// Emptied nodes are unlinked recursively and ancestor boxes recomputed.
    /// Returns `false` (a no-op) when nothing matches.
    pub fn remove(&mut self, aabb: &Aabb, payload: &P) -> bool
    where
        P: PartialEq,
    {
        let root = self.root;
        let removed = self.remove_from(root, aabb, payload);
        if removed {
            self.len -= 1;
            if self.node(root).child_count() == 0 {
                // tree emptied out entirely; reset to an empty leaf
                self.node_mut(root).height = 1;
                self.node_mut(root).kind = NodeKind::Leaf(SmallVec::new());
                self.node_mut(root).aabb = Aabb::EMPTY;
            }
        }
        removed
    }

    fn remove_from(&mut self, id: NodeId, aabb: &Aabb, payload: &P) -> bool
    where
        P: PartialEq,
    {
        if !self.node(id).aabb.contains(aabb) {
            return false;
        }
        let children: SmallVec<[NodeId; 4]> = match &mut self.node_mut(id).kind {
            NodeKind::Leaf(entries) => {
                let Some(pos) = entries
                    .iter()
                    .position(|e| e.aabb == *aabb && e.payload == *payload)
                else {
                    return false;
                };
                let _ = entries.remove(pos);
                self.recalc_aabb(id);
                return true;
            }
            NodeKind::Branch(children) => children.clone(),
        };
        for child in children {
            if !self.remove_from(child, aabb, payload) {
                continue;
            }
            if self.node(child).child_count() == 0 {
                if let NodeKind::Branch(kids) = &mut self.node_mut(id).kind {
                    kids.retain(|c| *c != child);
                }
                self.release(child);
            }
            self.recalc_aabb(id);
            return true;
        }
        false
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> &Node<P> {
        &self.nodes[id.idx()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<P> {
        &mut self.nodes[id.idx()]
    }

    fn alloc(&mut self, node: Node<P>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.idx()] = node;
            id
        } else {
            self.nodes.push(node);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Node handles are intentionally 32-bit."
            )]
            let id = (self.nodes.len() - 1) as u32;
            NodeId(id)
        }
    }

    fn release(&mut self, id: NodeId) {
        self.node_mut(id).kind = NodeKind::Leaf(SmallVec::new());
        self.free.push(id);
    }

    /// Path depth of a subtree root with the given height, measured from
    /// the current root of this tree.
    fn depth_for(&self, subtree_height: u32) -> usize {
        (self.node(self.root).height - subtree_height - 1) as usize
    }

    fn recalc_aabb(&mut self, id: NodeId) {
        let aabb = match &self.node(id).kind {
            NodeKind::Leaf(entries) => {
                let mut b = Aabb::EMPTY;
                for e in entries {
                    b.extend(&e.aabb);
                }
                b
            }
            NodeKind::Branch(children) => {
                let mut b = Aabb::EMPTY;
                for &c in children {
                    b.extend(&self.node(c).aabb);
                }
                b
            }
        };
        self.node_mut(id).aabb = aabb;
    }

    /// Descend `depth` levels choosing, per level, the child whose box needs
    /// the least area enlargement (ties broken by smaller area). Returns the
    /// visited path, root first.
    fn choose_path(&self, aabb: &Aabb, depth: usize) -> Vec<NodeId> {
        let mut path = Vec::with_capacity(depth + 1);
        let mut id = self.root;
        path.push(id);
        for _ in 0..depth {
            let NodeKind::Branch(children) = &self.node(id).kind else {
                break;
            };
            let mut best = children[0];
            let mut min_enlargement = f64::INFINITY;
            let mut min_area = f64::INFINITY;
            for &c in children {
                let b = &self.node(c).aabb;
                let area = b.area();
                let enlargement = b.enlarged_area(aabb) - area;
                if enlargement < min_enlargement {
                    min_enlargement = enlargement;
                    min_area = min_area.min(area);
                    best = c;
                } else if enlargement == min_enlargement && area < min_area {
                    min_area = area;
                    best = c;
                }
            }
            id = best;
            path.push(id);
        }
        path
    }

    /// Shared insertion path: put `item` into the node at `depth`, then
    /// split overflowing nodes bottom-up and re-extend ancestor boxes.
    fn plant(&mut self, item: Planted<P>, depth: usize) {
        let aabb = match &item {
            Planted::Entry(e) => e.aabb,
            Planted::Subtree(id) => self.node(*id).aabb,
        };
        let mut path = self.choose_path(&aabb, depth);
        // tile packing can leave a leaf above the nominal level; a subtree
        // has to go into that leaf's parent instead
        if matches!(item, Planted::Subtree(_))
            && path.len() > 1
            && self.is_leaf(path[path.len() - 1])
        {
            let _ = path.pop();
        }
        let target = path[path.len() - 1];
        match item {
            Planted::Entry(e) => {
                let NodeKind::Leaf(entries) = &mut self.node_mut(target).kind else {
                    unreachable!("entry insertion must land on a leaf");
                };
                entries.push(e);
            }
            Planted::Subtree(id) => {
                let NodeKind::Branch(children) = &mut self.node_mut(target).kind else {
                    unreachable!("subtree insertion must land on a branch");
                };
                children.push(id);
            }
        }
        self.node_mut(target).aabb.extend(&aabb);

        let mut level = path.len() as isize - 1;
        while level >= 0 {
            #[allow(clippy::cast_sign_loss, reason = "level is non-negative here")]
            let at = level as usize;
            if self.node(path[at]).child_count() > self.max_entries {
                self.split(&path, at);
                level -= 1;
            } else {
                break;
            }
        }
        for i in 0..=level {
            #[allow(clippy::cast_sign_loss, reason = "loop range is non-negative")]
            self.node_mut(path[i as usize]).aabb.extend(&aabb);
        }
    }

    /// Split the overflowing node at `path[level]` into two siblings.
    ///
    /// The split axis minimizes the total margin over all candidate
    /// distributions; the split index minimizes bounding-box overlap with
    /// total area as the tie-break. Each side keeps at least `min_entries`.
    fn split(&mut self, path: &[NodeId], level: usize) {
        let id = path[level];
        self.choose_split_axis(id);
        let split_index = self.choose_split_index(id);

        let (height, spill) = {
            let node = self.node_mut(id);
            let height = node.height;
            let spill = match &mut node.kind {
                NodeKind::Leaf(entries) => {
                    NodeKind::Leaf(entries.drain(split_index..).collect())
                }
                NodeKind::Branch(children) => {
                    NodeKind::Branch(children.drain(split_index..).collect())
                }
            };
            (height, spill)
        };
        let sibling = self.alloc(Node {
            aabb: Aabb::EMPTY,
            height,
            kind: spill,
        });
        self.recalc_aabb(id);
        self.recalc_aabb(sibling);

        if level > 0 {
            let parent = path[level - 1];
            let NodeKind::Branch(children) = &mut self.node_mut(parent).kind else {
                unreachable!("parent of a split node is a branch");
            };
            children.push(sibling);
        } else {
            self.split_root(sibling);
        }
    }

    /// Replace the root with a new branch holding the old root and `sibling`.
    fn split_root(&mut self, sibling: NodeId) {
        let old_root = self.root;
        let height = self.node(old_root).height + 1;
        let mut children = SmallVec::new();
        children.push(old_root);
        children.push(sibling);
        self.root = self.alloc(Node {
            aabb: Aabb::EMPTY,
            height,
            kind: NodeKind::Branch(children),
        });
        let root = self.root;
        self.recalc_aabb(root);
    }

    fn child_boxes(&self, id: NodeId) -> Vec<Aabb> {
        match &self.node(id).kind {
            NodeKind::Leaf(entries) => entries.iter().map(|e| e.aabb).collect(),
            NodeKind::Branch(children) => {
                children.iter().map(|&c| self.node(c).aabb).collect()
            }
        }
    }

    fn sort_children_by_axis(&mut self, id: NodeId, by_x: bool) {
        let key = |b: &Aabb| if by_x { b.min_x } else { b.min_y };
        let mut kind = mem::replace(&mut self.node_mut(id).kind, NodeKind::Branch(SmallVec::new()));
        match &mut kind {
            NodeKind::Leaf(entries) => {
                entries.sort_by(|a, b| key(&a.aabb).total_cmp(&key(&b.aabb)));
            }
            NodeKind::Branch(children) => {
                children.sort_by(|a, b| {
                    key(&self.node(*a).aabb).total_cmp(&key(&self.node(*b).aabb))
                });
            }
        }
        self.node_mut(id).kind = kind;
    }

    /// Sort the node's children along the axis whose distributions have the
    /// smaller total margin.
    fn choose_split_axis(&mut self, id: NodeId) {
        self.sort_children_by_axis(id, true);
        let margin_x = self.all_dist_margin(id);
        self.sort_children_by_axis(id, false);
        let margin_y = self.all_dist_margin(id);
        if margin_x < margin_y {
            self.sort_children_by_axis(id, true);
        }
    }

    /// Total margin of all split distributions leaving at least
    /// `min_entries` on each side, for the current child order.
    fn all_dist_margin(&self, id: NodeId) -> f64 {
        let boxes = self.child_boxes(id);
        let count = boxes.len();
        let m = self.min_entries;
        let union_of = |range: &[Aabb]| {
            let mut b = Aabb::EMPTY;
            for bb in range {
                b.extend(bb);
            }
            b
        };
        let mut left = union_of(&boxes[..m]);
        let mut right = union_of(&boxes[count - m..]);
        let mut margin = left.margin() + right.margin();
        for b in &boxes[m..count - m] {
            left.extend(b);
            margin += left.margin();
        }
        for b in boxes[m..count - m].iter().rev() {
            right.extend(b);
            margin += right.margin();
        }
        margin
    }

    /// Split index with minimal overlap between the two sides, ties broken
    /// by smaller total area.
    fn choose_split_index(&self, id: NodeId) -> usize {
        let boxes = self.child_boxes(id);
        let count = boxes.len();
        let m = self.min_entries;
        let mut best = count - m;
        let mut min_overlap = f64::INFINITY;
        let mut min_area = f64::INFINITY;
        for i in m..=count - m {
            let mut left = Aabb::EMPTY;
            for b in &boxes[..i] {
                left.extend(b);
            }
            let mut right = Aabb::EMPTY;
            for b in &boxes[i..] {
                right.extend(b);
            }
            let overlap = left.intersection_area(&right);
            let area = left.area() + right.area();
            if overlap < min_overlap {
                min_overlap = overlap;
                best = i;
                min_area = min_area.min(area);
            } else if overlap == min_overlap && area < min_area {
                min_area = area;
                best = i;
            }
        }
        best
    }

    /// Recursively pack `items` into a subtree and return its root.
    ///
    /// `height` is 0 on the outermost call, which computes the target height
    /// and the root fan-out needed to fill lower levels completely.
    fn build(&mut self, items: &mut [Entry<P>], height: u32) -> NodeId {
        let n = items.len();
        if n <= self.max_entries {
            let id = self.alloc(Node {
                aabb: Aabb::EMPTY,
                height: 1,
                kind: NodeKind::Leaf(items.iter().copied().collect()),
            });
            self.recalc_aabb(id);
            return id;
        }

        let (height, fanout) = if height == 0 {
            let mut h = 1_u32;
            let mut capacity = self.max_entries;
            while capacity < n {
                capacity = capacity.saturating_mul(self.max_entries);
                h += 1;
            }
            (h, n.div_ceil(self.max_entries.pow(h - 1)))
        } else {
            (height, self.max_entries)
        };

        // cut into roughly square tiles: columns by x, rows by y
        let tile = n.div_ceil(fanout);
        let column = tile * isqrt_ceil(fanout);
        multi_select_by(items, column, |e| e.aabb.min_x);

        let mut children: SmallVec<[NodeId; 4]> = SmallVec::new();
        for col in items.chunks_mut(column) {
            multi_select_by(col, tile, |e| e.aabb.min_y);
            for cell in col.chunks_mut(tile) {
                children.push(self.build(cell, height - 1));
            }
        }
        let id = self.alloc(Node {
            aabb: Aabb::EMPTY,
            height,
            kind: NodeKind::Branch(children),
        });
        self.recalc_aabb(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_points(rng: &mut StdRng, n: usize) -> Vec<(Aabb, u32)> {
        (0..n)
            .map(|i| {
                let x = rng.random_range(0.0..100.0);
                let y = rng.random_range(0.0..100.0);
                #[allow(clippy::cast_possible_truncation, reason = "test ids fit in u32")]
                let id = i as u32;
                (Aabb::point(x, y), id)
            })
            .collect()
    }

    fn sorted_hits(tree: &BoxTree<u32>, query: &Aabb) -> Vec<u32> {
        let mut ids: Vec<u32> = tree.search(query).iter().map(|e| e.payload).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn bulk_load_matches_incremental_inserts() {
        let mut rng = StdRng::seed_from_u64(7);
        let items = random_points(&mut rng, 300);

        let mut bulk: BoxTree<u32> = BoxTree::new();
        bulk.bulk_load(&items);
        let mut incremental: BoxTree<u32> = BoxTree::new();
        for &(aabb, id) in &items {
            incremental.insert(aabb, id);
        }
        assert_eq!(bulk.len(), 300);
        assert_eq!(incremental.len(), 300);

        for query in [
            Aabb::new(0.0, 0.0, 100.0, 100.0),
            Aabb::new(10.0, 10.0, 30.0, 30.0),
            Aabb::new(99.0, 99.0, 100.0, 100.0),
            Aabb::point(items[0].0.min_x, items[0].0.min_y),
        ] {
            assert_eq!(sorted_hits(&bulk, &query), sorted_hits(&incremental, &query));
        }
    }

    #[test]
    fn bulk_load_into_nonempty_tree_merges() {
        let mut rng = StdRng::seed_from_u64(11);
        let first = random_points(&mut rng, 120);
        let second: Vec<(Aabb, u32)> = random_points(&mut rng, 120)
            .into_iter()
            .map(|(b, i)| (b, i + 120))
            .collect();

        let mut tree: BoxTree<u32> = BoxTree::new();
        tree.bulk_load(&first);
        tree.bulk_load(&second);
        assert_eq!(tree.len(), 240);
        let all = sorted_hits(&tree, &Aabb::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(all, (0..240).collect::<Vec<u32>>());
    }

    #[test]
    fn remove_is_exact_and_total() {
        let items = vec![
            (Aabb::point(1.0, 1.0), 0_u32),
            (Aabb::point(2.0, 2.0), 1),
            (Aabb::point(2.0, 2.0), 2),
        ];
        let mut tree: BoxTree<u32> = BoxTree::new();
        tree.bulk_load(&items);

        // removing an absent entry is a no-op
        assert!(!tree.remove(&Aabb::point(9.0, 9.0), &0));
        assert!(!tree.remove(&Aabb::point(2.0, 2.0), &7));
        assert_eq!(tree.len(), 3);

        // same box, distinct payloads: only the matching one goes
        assert!(tree.remove(&Aabb::point(2.0, 2.0), &1));
        assert_eq!(sorted_hits(&tree, &Aabb::point(2.0, 2.0)), vec![2]);

        assert!(tree.remove(&Aabb::point(2.0, 2.0), &2));
        assert!(tree.remove(&Aabb::point(1.0, 1.0), &0));
        assert!(tree.is_empty());
        assert!(tree.search(&Aabb::new(0.0, 0.0, 10.0, 10.0)).is_empty());
    }

    #[test]
    fn remove_many_then_query() {
        let mut rng = StdRng::seed_from_u64(3);
        let items = random_points(&mut rng, 200);
        let mut tree: BoxTree<u32> = BoxTree::new();
        tree.bulk_load(&items);

        for &(aabb, id) in items.iter().step_by(2) {
            assert!(tree.remove(&aabb, &id), "indexed entry must be removable");
        }
        assert_eq!(tree.len(), 100);
        let left = sorted_hits(&tree, &Aabb::new(0.0, 0.0, 100.0, 100.0));
        let expected: Vec<u32> = (0..200).filter(|i| i % 2 == 1).collect();
        assert_eq!(left, expected);
    }

    #[test]
    fn contained_children_are_harvested() {
        let mut tree: BoxTree<u32> = BoxTree::with_max_entries(4);
        for i in 0..64_u32 {
            let x = f64::from(i % 8);
            let y = f64::from(i / 8);
            tree.insert(Aabb::point(x, y), i);
        }
        // query covering everything exercises the wholesale harvest path
        let all = sorted_hits(&tree, &Aabb::new(-1.0, -1.0, 9.0, 9.0));
        assert_eq!(all, (0..64).collect::<Vec<u32>>());
        // and a partial query still filters per entry
        let row = sorted_hits(&tree, &Aabb::new(-0.5, 2.0, 8.5, 2.0));
        assert_eq!(row, (16..24).collect::<Vec<u32>>());
    }

    #[test]
    fn collides_matches_search() {
        let mut tree: BoxTree<u32> = BoxTree::new();
        tree.bulk_load(&[
            (Aabb::segment(0.0, 0.0, 4.0, 4.0), 0),
            (Aabb::segment(10.0, 0.0, 14.0, 4.0), 1),
        ]);
        assert!(tree.collides(&Aabb::new(3.0, 3.0, 5.0, 5.0)));
        assert!(!tree.collides(&Aabb::new(5.0, 5.0, 9.0, 9.0)));
        assert!(tree.collides(&Aabb::point(12.0, 2.0)));
    }

    #[test]
    fn degenerate_point_boxes_are_searchable() {
        let mut tree: BoxTree<u32> = BoxTree::new();
        tree.insert(Aabb::point(5.0, 5.0), 42);
        assert_eq!(sorted_hits(&tree, &Aabb::point(5.0, 5.0)), vec![42]);
        assert!(sorted_hits(&tree, &Aabb::point(5.0, 5.000001)).is_empty());
    }

    #[test]
    fn parent_boxes_cover_children_after_churn() {
        let mut rng = StdRng::seed_from_u64(19);
        let items = random_points(&mut rng, 150);
        let mut tree: BoxTree<u32> = BoxTree::with_max_entries(6);
        tree.bulk_load(&items[..100]);
        for &(aabb, id) in &items[100..] {
            tree.insert(aabb, id);
        }
        for &(aabb, id) in &items[..40] {
            assert!(tree.remove(&aabb, &id), "indexed entry must be removable");
        }
        // every surviving entry must still be reachable through its own box
        for &(aabb, id) in &items[40..] {
            assert_eq!(sorted_hits(&tree, &aabb), vec![id]);
        }
    }
}
