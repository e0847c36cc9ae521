//! Half-edge mesh data structure.
//!
//! This module provides a half-edge (doubly-connected edge list) representation
//! for triangle meshes. This structure enables O(1) adjacency queries and is
//! the foundation for the operator assembly and the heat-method solve.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions
//! - Each half-edge knows its **twin**, **next**, **prev**, **origin vertex**,
//!   owning **edge**, incident **face** (or **boundary loop**), and **corner**
//! - Each vertex, edge, and face stores one incident half-edge
//!
//! # Boundary Handling
//!
//! Open edge cycles are closed during construction with synthetic boundary-loop
//! faces and matching boundary half-edges, so after a successful build every
//! half-edge has a twin and traversal never needs to special-case boundaries.
//! Boundary half-edges are linked clockwise, the reverse of the interior
//! counter-clockwise order.

use super::elements::{Corner, Edge, Face, HalfEdge, Vertex};
use super::index::{BoundaryLoopId, CornerId, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};

/// A half-edge mesh for triangulated surfaces.
///
/// The mesh owns flat arenas of vertices, half-edges, edges, faces, corners,
/// and boundary loops; every cross-reference is a dense index into one of
/// these arenas. A mesh is produced once by a build operation (see
/// [`build_from_triangles`](super::build_from_triangles)) and is immutable
/// afterward.
#[derive(Debug, Clone)]
pub struct Mesh<I: MeshIndex = u32> {
    /// All vertices in the mesh.
    pub(crate) vertices: Vec<Vertex<I>>,

    /// All half-edges, interior first, then the synthesized boundary chains.
    pub(crate) halfedges: Vec<HalfEdge<I>>,

    /// All full edges.
    pub(crate) edges: Vec<Edge<I>>,

    /// All interior faces.
    pub(crate) faces: Vec<Face<I>>,

    /// One corner per interior half-edge.
    pub(crate) corners: Vec<Corner<I>>,

    /// Boundary loops, stored as faces in their own arena.
    pub(crate) boundaries: Vec<Face<I>>,

    /// Homology generator paths. Not populated by the builder; retained so
    /// downstream topology code has a place to put them.
    pub(crate) generators: Vec<Vec<HalfEdgeId<I>>>,
}

impl<I: MeshIndex> Mesh<I> {
    /// Create a new empty mesh.
    pub(crate) fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            corners: Vec::new(),
            boundaries: Vec::new(),
            generators: Vec::new(),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges (interior and boundary).
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of full edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of interior faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of corners.
    #[inline]
    pub fn num_corners(&self) -> usize {
        self.corners.len()
    }

    /// Get the number of boundary loops.
    #[inline]
    pub fn num_boundary_loops(&self) -> usize {
        self.boundaries.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a full edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Get an interior face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get a corner by ID.
    #[inline]
    pub fn corner(&self, id: CornerId<I>) -> &Corner<I> {
        &self.corners[id.index()]
    }

    /// Get a boundary loop by ID.
    #[inline]
    pub fn boundary_loop(&self, id: BoundaryLoopId<I>) -> &Face<I> {
        &self.boundaries[id.index()]
    }

    /// Homology generator paths. Empty unless populated by external code.
    #[inline]
    pub fn generators(&self) -> &[Vec<HalfEdgeId<I>>] {
        &self.generators
    }

    pub(crate) fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    pub(crate) fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Get the full edge a half-edge belongs to.
    #[inline]
    pub fn edge_of(&self, he: HalfEdgeId<I>) -> EdgeId<I> {
        self.halfedge(he).edge
    }

    /// Get the interior face of a half-edge. Invalid for boundary half-edges.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Get the corner at a half-edge's origin. Invalid for boundary half-edges.
    #[inline]
    pub fn corner_of(&self, he: HalfEdgeId<I>) -> CornerId<I> {
        self.halfedge(he).corner
    }

    /// Check if a half-edge lies on a boundary loop.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if an edge (either of its half-edges) is on the boundary.
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId<I>) -> bool {
        let he = self.edge(e).halfedge;
        self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.twin(he))
    }

    /// Check if a vertex is on the boundary.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        self.vertex_halfedges(v)
            .any(|he| self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.twin(he)))
    }

    /// Compute the valence (number of incident edges) of a vertex.
    pub fn degree(&self, v: VertexId<I>) -> usize {
        self.vertex_halfedges(v).count()
    }

    /// Euler characteristic V - E + F (interior faces only).
    pub fn euler_characteristic(&self) -> isize {
        self.vertices.len() as isize - self.edges.len() as isize + self.faces.len() as isize
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all interior face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all corner IDs.
    pub fn corner_ids(&self) -> impl Iterator<Item = CornerId<I>> + '_ {
        (0..self.corners.len()).map(CornerId::new)
    }

    /// Iterate over all boundary-loop IDs.
    pub fn boundary_loop_ids(&self) -> impl Iterator<Item = BoundaryLoopId<I>> + '_ {
        (0..self.boundaries.len()).map(BoundaryLoopId::new)
    }

    /// Iterate over outgoing half-edges around a vertex.
    ///
    /// The walk is lazy and restartable: it follows `next(twin(·))` from the
    /// vertex's stored half-edge until it returns to the start. Boundary
    /// half-edges are included, so the walk covers the full one-ring on both
    /// closed and open meshes.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, self.vertex(v).halfedge)
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Iterate over interior faces adjacent to a vertex.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.vertex_halfedges(v).filter_map(|he| {
            let f = self.face_of(he);
            f.is_valid().then_some(f)
        })
    }

    /// Iterate over half-edges around an interior face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, self.face(f).halfedge)
    }

    /// Iterate over half-edges around a boundary loop (clockwise).
    pub fn boundary_halfedges(&self, b: BoundaryLoopId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, self.boundary_loop(b).halfedge)
    }

    /// Iterate over vertices of an interior face.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Get the three vertices of a triangular face.
    pub fn face_triangle(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [self.origin(he0), self.origin(he1), self.origin(he2)]
    }

    // ==================== Validation ====================

    /// Check that all connectivity is mutually consistent.
    ///
    /// Verifies `twin(twin(h)) == h`, `prev(next(h)) == h`, vertex/face
    /// incidences, and that every half-edge belongs to exactly one of an
    /// interior face or a boundary loop.
    pub fn is_valid(&self) -> bool {
        for (i, v) in self.vertices.iter().enumerate() {
            if !v.halfedge.is_valid() {
                return false;
            }
            if self.halfedge(v.halfedge).origin.index() != i {
                return false;
            }
        }

        for (i, he) in self.halfedges.iter().enumerate() {
            let heid = HalfEdgeId::new(i);
            if !he.twin.is_valid() || self.halfedge(he.twin).twin != heid {
                return false;
            }
            if !he.next.is_valid() || self.halfedge(he.next).prev != heid {
                return false;
            }
            if !he.prev.is_valid() || self.halfedge(he.prev).next != heid {
                return false;
            }
            if !he.edge.is_valid() {
                return false;
            }
            // Exactly one of face / boundary loop is set, and corners exist
            // exactly on interior half-edges.
            if he.face.is_valid() == he.boundary_loop.is_valid() {
                return false;
            }
            if he.face.is_valid() != he.corner.is_valid() {
                return false;
            }
        }

        for f in &self.faces {
            if !f.halfedge.is_valid() || self.halfedge(f.halfedge).is_boundary() {
                return false;
            }
        }

        for b in &self.boundaries {
            if !b.halfedge.is_valid() || !self.halfedge(b.halfedge).is_boundary() {
                return false;
            }
        }

        true
    }
}

/// Iterator over outgoing half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a Mesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a Mesh<I>, start: HalfEdgeId<I>) -> Self {
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<I: MeshIndex> Iterator for VertexHalfEdgeIter<'_, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // If he goes v -> w, twin(he) goes w -> v, and next(twin(he)) is the
        // next outgoing half-edge from v.
        self.current = self.mesh.next(self.mesh.twin(self.current));

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over half-edges around a face or boundary loop.
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a Mesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a Mesh<I>, start: HalfEdgeId<I>) -> Self {
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<I: MeshIndex> Iterator for FaceHalfEdgeIter<'_, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}
