//! Core mesh topology.
//!
//! This module provides the half-edge mesh representation: six element kinds
//! (vertices, half-edges, edges, faces, corners, boundary loops) stored in
//! flat arenas and cross-referenced by dense, type-safe indices.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`], [`HalfEdgeId`], [`EdgeId`], [`FaceId`], [`CornerId`],
//!   [`BoundaryLoopId`]
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`]
//! trait), allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! Meshes are built once, from a triangle soup or a pre-split position
//! buffer, and are immutable afterward:
//!
//! ```
//! use geoheat::mesh::{build_from_triangles, Mesh};
//!
//! let faces = vec![[0, 1, 2], [1, 0, 3]];
//! let mesh: Mesh = build_from_triangles(4, &faces).unwrap();
//! assert_eq!(mesh.num_faces(), 2);
//! ```
//!
//! Connectivity carries no positions; pair a mesh with an embedding through
//! [`Geometry`](crate::geometry::Geometry).

mod builder;
mod elements;
mod halfedge;
mod index;

pub use builder::{build_from_buffer, build_from_triangles};
pub use elements::{Corner, Edge, Face, HalfEdge, Vertex};
pub use halfedge::{FaceHalfEdgeIter, Mesh, VertexHalfEdgeIter};
pub use index::{
    BoundaryLoopId, CornerId, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId,
};
