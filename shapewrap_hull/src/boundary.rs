// Copyright 2026 the Shapewrap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circular doubly-linked boundary ring, arena-backed.
//!
//! Vertices are stored in a flat arena and addressed by [`VertexId`];
//! carving only ever splices vertices in, so there is no free list. Each
//! vertex caches the bounding box of its outgoing edge (to the `next`
//! vertex) so the edge can be removed from the spatial index by the exact
//! box it was inserted under, even after the ring around it has changed.

use alloc::vec::Vec;

use shapewrap_index::Aabb;

/// Handle to a vertex in the boundary ring.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct VertexId(u32);

#[derive(Clone, Debug)]
struct Vertex {
    point: u32,
    prev: VertexId,
    next: VertexId,
    edge: Aabb,
}

/// The boundary of the hull under refinement.
#[derive(Clone, Debug, Default)]
pub(crate) struct Ring {
    verts: Vec<Vertex>,
}

impl Ring {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            verts: Vec::with_capacity(capacity),
        }
    }

    fn alloc(&mut self, vertex: Vertex) -> VertexId {
        debug_assert!(self.verts.len() < u32::MAX as usize, "ring overflow");
        self.verts.push(vertex);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "vertex handles are intentionally 32-bit"
        )]
        let id = (self.verts.len() - 1) as u32;
        VertexId(id)
    }

    /// Start a new ring with a single self-linked vertex.
    pub(crate) fn insert_first(&mut self, point: u32) -> VertexId {
        let id = VertexId(0);
        debug_assert!(self.verts.is_empty(), "ring already started");
        self.alloc(Vertex {
            point,
            prev: id,
            next: id,
            edge: Aabb::EMPTY,
        })
    }

    /// Splice a new vertex between `after` and its successor.
    pub(crate) fn insert_after(&mut self, after: VertexId, point: u32) -> VertexId {
        let next = self.next(after);
        let id = self.alloc(Vertex {
            point,
            prev: after,
            next,
            edge: Aabb::EMPTY,
        });
        self.verts[after.0 as usize].next = id;
        self.verts[next.0 as usize].prev = id;
        id
    }

    pub(crate) fn point(&self, v: VertexId) -> u32 {
        self.verts[v.0 as usize].point
    }

    pub(crate) fn prev(&self, v: VertexId) -> VertexId {
        self.verts[v.0 as usize].prev
    }

    pub(crate) fn next(&self, v: VertexId) -> VertexId {
        self.verts[v.0 as usize].next
    }

    /// The cached box of the outgoing edge of `v`.
    pub(crate) fn edge(&self, v: VertexId) -> Aabb {
        self.verts[v.0 as usize].edge
    }

    pub(crate) fn set_edge(&mut self, v: VertexId, aabb: Aabb) {
        self.verts[v.0 as usize].edge = aabb;
    }
}
