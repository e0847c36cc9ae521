//! Mesh element records.
//!
//! Each record holds only connectivity: indices into the arenas of the owning
//! [`Mesh`](super::Mesh). Vertex positions are deliberately kept out of the
//! topology (they live in [`Geometry`](crate::geometry::Geometry)) so the same
//! connectivity can be paired with different embeddings.

use super::index::{BoundaryLoopId, CornerId, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};

/// A vertex in the half-edge mesh.
///
/// Stores one outgoing half-edge; the rest of the one-ring is reachable by
/// walking `twin`/`next` from there.
#[derive(Debug, Clone, Copy)]
pub struct Vertex<I: MeshIndex = u32> {
    /// One outgoing half-edge from this vertex.
    /// Invalid only for isolated vertices, which fail validation.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new vertex with no incident half-edge yet.
    pub fn new() -> Self {
        Self {
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

impl<I: MeshIndex> Default for Vertex<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A half-edge in the mesh.
///
/// Exactly one of `face` / `boundary_loop` is valid: interior half-edges
/// belong to a face, synthesized boundary half-edges belong to a boundary
/// loop.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The opposite half-edge (pointing in the reverse direction).
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face (counter-clockwise for interior
    /// half-edges, clockwise along boundary loops).
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId<I>,

    /// The full edge this half-edge belongs to.
    pub edge: EdgeId<I>,

    /// The interior face this half-edge belongs to.
    /// Invalid for boundary half-edges.
    pub face: FaceId<I>,

    /// The boundary loop this half-edge belongs to.
    /// Invalid for interior half-edges.
    pub boundary_loop: BoundaryLoopId<I>,

    /// The corner at this half-edge's origin, inside its face.
    /// Invalid for boundary half-edges.
    pub corner: CornerId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new uninitialized half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::invalid(),
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            edge: EdgeId::invalid(),
            face: FaceId::invalid(),
            boundary_loop: BoundaryLoopId::invalid(),
            corner: CornerId::invalid(),
        }
    }

    /// Check if this half-edge lies on a boundary loop.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A full (undirected) edge, shared by exactly two twin half-edges.
#[derive(Debug, Clone, Copy)]
pub struct Edge<I: MeshIndex = u32> {
    /// One of the two half-edges of this edge; the other is its twin.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Edge<I> {
    /// Create a new edge with the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

/// A face in the half-edge mesh.
///
/// The same record type describes interior triangles and synthesized
/// boundary-loop faces; the two kinds live in separate arenas.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

impl<I: MeshIndex> Default for Face<I> {
    fn default() -> Self {
        Self {
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A corner: one (face, vertex) incidence.
///
/// The corner's apex is the origin of its half-edge. Boundary half-edges
/// have no corners.
#[derive(Debug, Clone, Copy)]
pub struct Corner<I: MeshIndex = u32> {
    /// The interior half-edge whose origin is this corner's apex.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Corner<I> {
    /// Create a new corner attached to the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}
