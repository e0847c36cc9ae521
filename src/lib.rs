//! # Geoheat
//!
//! Geodesic distance on triangle meshes via the heat method.
//!
//! Geoheat builds a half-edge mesh from a triangle soup, assembles the
//! discrete geometry operators on top of it, and answers repeated geodesic
//! distance queries through a pair of prefactorized sparse systems.
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) adjacency queries with type-safe indices
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Boundary aware**: Open meshes get synthesized boundary loops
//! - **Validated construction**: Isolated and non-manifold input is rejected
//! - **Cached factorizations**: Distance queries after setup are backsubstitutions only
//!
//! ## Quick Start
//!
//! ```
//! use geoheat::prelude::*;
//! use nalgebra::Point3;
//!
//! // A tetrahedron.
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![
//!     [0, 2, 1], // bottom
//!     [0, 1, 3], // front
//!     [1, 2, 3], // right
//!     [2, 0, 3], // left
//! ];
//!
//! let geometry: Geometry = Geometry::from_triangles(positions, &faces).unwrap();
//! let heat = HeatMethod::new(&geometry).unwrap();
//!
//! // Distance from vertex 0 to every vertex.
//! let distance = heat.distance_from(&[VertexId::new(0)]).unwrap();
//! assert!(distance[0].abs() < 1e-6);
//! ```
//!
//! ## Mesh Traversal
//!
//! The half-edge structure enables efficient traversal of mesh elements:
//!
//! ```
//! use geoheat::prelude::*;
//!
//! # let faces = vec![[0, 1, 2], [1, 0, 3]];
//! # let mesh: Mesh = build_from_triangles(4, &faces).unwrap();
//! // Iterate over neighbors of a vertex
//! let v = VertexId::new(0);
//! for neighbor in mesh.vertex_neighbors(v) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//!
//! // Iterate over faces around a vertex
//! for face in mesh.vertex_faces(v) {
//!     println!("Adjacent face: {:?}", face);
//! }
//!
//! // Get vertices of a face
//! let f = FaceId::new(0);
//! let [v0, v1, v2] = mesh.face_triangle(f);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod geometry;
pub mod heat;
pub mod mesh;
pub mod solve;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use geoheat::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geometry::Geometry;
    pub use crate::heat::HeatMethod;
    pub use crate::mesh::{
        build_from_buffer, build_from_triangles, BoundaryLoopId, CornerId, EdgeId, FaceId,
        HalfEdgeId, Mesh, MeshIndex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_sphere_distance_pipeline() {
        // Octahedron with unit-length axes: every vertex is at distance 1
        // from the origin, opposite vertices are geodesic antipodes.
        let positions = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, -1.0),
        ];
        let faces = vec![
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ];

        let geometry: Geometry = Geometry::from_triangles(positions, &faces).unwrap();
        let mesh = geometry.mesh();
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 8);
        assert_eq!(mesh.num_boundary_loops(), 0);
        assert!(mesh.is_valid());

        let heat = HeatMethod::new(&geometry).unwrap();
        let distance = heat.distance_from(&[VertexId::new(0)]).unwrap();

        // Zero at the source, maximal at the antipode.
        assert!(distance[0].abs() < 1e-6);
        let farthest = mesh
            .vertex_ids()
            .max_by(|a, b| {
                distance[heat.vertex_index(*a)]
                    .partial_cmp(&distance[heat.vertex_index(*b)])
                    .unwrap()
            })
            .unwrap();
        assert_eq!(farthest, VertexId::new(1));

        // The four equatorial vertices are symmetric.
        let d2 = distance[2];
        for v in [3, 4, 5] {
            assert!((distance[v] - d2).abs() < 1e-6);
        }
    }

    #[test]
    fn test_open_mesh_pipeline() {
        // A fan of two triangles with a boundary loop.
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let geometry: Geometry =
            Geometry::from_triangles(positions, &[[0, 1, 2], [0, 2, 3]]).unwrap();
        assert_eq!(geometry.mesh().num_boundary_loops(), 1);

        let heat = HeatMethod::new(&geometry).unwrap();
        let distance = heat.distance_from(&[VertexId::new(0)]).unwrap();
        assert!(distance[0].abs() < 1e-6);
        // The far corner of the square is the farthest vertex.
        assert!(distance[2] > distance[1]);
        assert!(distance[2] > distance[3]);
    }
}
