//! Mesh construction.
//!
//! This module builds fully linked half-edge meshes from unstructured
//! triangle soups: index triples over a vertex set, or a pre-split position
//! buffer where faces are implicit consecutive triples.
//!
//! Construction is a single, terminal operation: if validation fails
//! (isolated vertex, isolated face, non-manifold vertex or edge) an error is
//! returned and no mesh exists. There is no partially built state.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use nalgebra::Point3;

use super::elements::{Corner, Edge, Face, HalfEdge, Vertex};
use super::halfedge::Mesh;
use super::index::{BoundaryLoopId, CornerId, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{Error, Result};

/// Build a half-edge mesh from triangle faces over `vertex_count` vertices.
///
/// Faces are triples of vertex indices with counter-clockwise winding.
/// Positions play no role in connectivity; pair the result with an embedding
/// via [`Geometry::new`](crate::geometry::Geometry::new).
///
/// Every open edge cycle is closed with a synthetic boundary loop, so all
/// half-edges of the result have twins. Three half-edges per (face, vertex)
/// incidence, one corner per interior half-edge, dense indices in arena
/// order.
///
/// # Errors
///
/// Fails on empty input, out-of-range or repeated vertex indices within a
/// face, edges shared by more than two faces, isolated vertices, isolated
/// faces (all three edges on the boundary), and non-manifold vertices.
///
/// # Example
/// ```
/// use geoheat::mesh::{build_from_triangles, Mesh};
///
/// // Two triangles sharing an edge.
/// let faces = vec![[0, 1, 2], [1, 0, 3]];
/// let mesh: Mesh = build_from_triangles(4, &faces).unwrap();
/// assert_eq!(mesh.num_faces(), 2);
/// assert_eq!(mesh.num_boundary_loops(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertex_count: usize,
    faces: &[[usize; 3]],
) -> Result<Mesh<I>> {
    if faces.is_empty() {
        return Err(Error::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertex_count {
                return Err(Error::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(Error::DegenerateFace { face: fi });
        }
    }

    let mut mesh = Mesh::new();
    mesh.vertices = vec![Vertex::new(); vertex_count];
    mesh.halfedges = vec![HalfEdge::new(); faces.len() * 3];
    mesh.faces.reserve(faces.len());

    // Order-independent vertex-pair key -> first-seen half-edge of that edge.
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId<I>> =
        HashMap::with_capacity(faces.len() * 3 / 2);

    for (fi, face) in faces.iter().enumerate() {
        let face_id = FaceId::new(fi);
        let base = 3 * fi;
        mesh.faces.push(Face::new(HalfEdgeId::new(base)));

        for j in 0..3 {
            let he_id = HalfEdgeId::<I>::new(base + j);
            let vi = face[j];
            let vj = face[(j + 1) % 3];

            {
                let he = mesh.halfedge_mut(he_id);
                he.origin = VertexId::new(vi);
                he.next = HalfEdgeId::new(base + (j + 1) % 3);
                he.prev = HalfEdgeId::new(base + (j + 2) % 3);
                he.face = face_id;
            }
            mesh.vertex_mut(VertexId::new(vi)).halfedge = he_id;

            let key = if vi < vj { (vi, vj) } else { (vj, vi) };
            match edge_map.entry(key) {
                Entry::Occupied(entry) => {
                    let first = *entry.get();
                    if mesh.halfedge(first).twin.is_valid() {
                        // A third half-edge over the same vertex pair.
                        return Err(Error::NonManifoldEdge { v0: key.0, v1: key.1 });
                    }
                    let edge = mesh.edge_of(first);
                    mesh.halfedge_mut(he_id).twin = first;
                    mesh.halfedge_mut(he_id).edge = edge;
                    mesh.halfedge_mut(first).twin = he_id;
                }
                Entry::Vacant(entry) => {
                    let edge_id = EdgeId::new(mesh.edges.len());
                    mesh.edges.push(Edge::new(he_id));
                    mesh.halfedge_mut(he_id).edge = edge_id;
                    entry.insert(he_id);
                }
            }
        }
    }

    close_boundary_loops(&mut mesh);
    attach_corners(&mut mesh);
    validate(&mesh)?;

    log::debug!(
        "built half-edge mesh: {} vertices, {} edges, {} faces, {} boundary loops",
        mesh.num_vertices(),
        mesh.num_edges(),
        mesh.num_faces(),
        mesh.num_boundary_loops()
    );

    Ok(mesh)
}

/// Build a half-edge mesh from a pre-split position buffer.
///
/// The buffer holds one position per (face, vertex) incidence; every three
/// consecutive positions form one triangle and no index list is involved.
/// Edge sharing is discovered by exact coordinate coincidence: bit-identical
/// positions are welded into a single shared vertex before the ordinary soup
/// build runs.
///
/// Returns the mesh together with the welded position array, whose order
/// matches the mesh's vertex order.
pub fn build_from_buffer<I: MeshIndex>(
    positions: &[Point3<f64>],
) -> Result<(Mesh<I>, Vec<Point3<f64>>)> {
    if positions.is_empty() {
        return Err(Error::EmptyMesh);
    }
    if positions.len() % 3 != 0 {
        return Err(Error::InvalidBufferLength {
            len: positions.len(),
        });
    }

    let mut lookup: HashMap<[u64; 3], usize> = HashMap::with_capacity(positions.len());
    let mut welded: Vec<Point3<f64>> = Vec::new();
    let mut faces = Vec::with_capacity(positions.len() / 3);

    let mut tri = [0usize; 3];
    for (i, p) in positions.iter().enumerate() {
        let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
        let idx = *lookup.entry(key).or_insert_with(|| {
            welded.push(*p);
            welded.len() - 1
        });
        tri[i % 3] = idx;
        if i % 3 == 2 {
            faces.push(tri);
        }
    }

    let mesh = build_from_triangles(welded.len(), &faces)?;
    Ok((mesh, welded))
}

/// Close every open edge cycle with a boundary-loop face and a clockwise
/// chain of boundary half-edges twinned against the interior chain.
fn close_boundary_loops<I: MeshIndex>(mesh: &mut Mesh<I>) {
    let interior_count = mesh.halfedges.len();

    for i in 0..interior_count {
        let start = HalfEdgeId::<I>::new(i);
        if mesh.halfedge(start).twin.is_valid() {
            continue;
        }

        let loop_id = BoundaryLoopId::new(mesh.boundaries.len());
        mesh.boundaries.push(Face::default());

        let mut cycle: Vec<HalfEdgeId<I>> = Vec::new();
        let mut he = start;
        loop {
            let bhe = HalfEdgeId::new(mesh.halfedges.len());
            mesh.halfedges.push(HalfEdge::new());
            cycle.push(bhe);

            // The next twinless interior half-edge around dest(he): walk the
            // fan, skipping edges paired during the interior face pass. A
            // twin synthesized for this cycle does not count as paired, or
            // the walk would run past the start once it wraps around.
            let mut next_he = mesh.next(he);
            loop {
                let twin = mesh.halfedge(next_he).twin;
                if !twin.is_valid() || mesh.halfedge(twin).is_boundary() {
                    break;
                }
                next_he = mesh.next(twin);
            }

            let origin = mesh.origin(next_he);
            let edge = mesh.edge_of(he);
            {
                let b = mesh.halfedge_mut(bhe);
                b.origin = origin;
                b.edge = edge;
                b.boundary_loop = loop_id;
                b.twin = he;
            }
            mesh.halfedge_mut(he).twin = bhe;
            mesh.boundaries[loop_id.index()].halfedge = bhe;

            he = next_he;
            if he == start {
                break;
            }
        }

        // Boundary half-edges run clockwise, the reverse of the interior
        // winding: each one's next is the previously created neighbor.
        let n = cycle.len();
        for j in 0..n {
            mesh.halfedge_mut(cycle[j]).next = cycle[(j + n - 1) % n];
            mesh.halfedge_mut(cycle[j]).prev = cycle[(j + 1) % n];
        }
    }
}

/// Create one corner per interior half-edge.
fn attach_corners<I: MeshIndex>(mesh: &mut Mesh<I>) {
    for i in 0..mesh.halfedges.len() {
        let he = HalfEdgeId::<I>::new(i);
        if mesh.halfedge(he).is_boundary() {
            continue;
        }
        let c = CornerId::new(mesh.corners.len());
        mesh.corners.push(Corner::new(he));
        mesh.halfedge_mut(he).corner = c;
    }
}

/// Reject isolated vertices, isolated faces, and non-manifold vertices.
fn validate<I: MeshIndex>(mesh: &Mesh<I>) -> Result<()> {
    for (i, v) in mesh.vertices.iter().enumerate() {
        if !v.halfedge.is_valid() {
            return Err(Error::IsolatedVertex { vertex: i });
        }
    }

    for f in mesh.face_ids() {
        let boundary_edges = mesh
            .face_halfedges(f)
            .filter(|&he| mesh.is_boundary_halfedge(mesh.twin(he)))
            .count();
        if boundary_edges == 3 {
            return Err(Error::IsolatedFace { face: f.index() });
        }
    }

    // A vertex is manifold iff its incident faces and boundary loops form a
    // single fan: the count over all faces must match the traversal degree.
    let mut incident = vec![0usize; mesh.num_vertices()];
    for f in mesh.face_ids() {
        for v in mesh.face_vertices(f) {
            incident[v.index()] += 1;
        }
    }
    for b in mesh.boundary_loop_ids() {
        for he in mesh.boundary_halfedges(b) {
            incident[mesh.origin(he).index()] += 1;
        }
    }
    for v in mesh.vertex_ids() {
        if incident[v.index()] != mesh.degree(v) {
            return Err(Error::NonManifoldVertex { vertex: v.index() });
        }
    }

    Ok(())
}
