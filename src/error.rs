//! Error types for geoheat.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a mesh or solving on it.
#[derive(Error, Debug)]
pub enum Error {
    /// The input has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A position buffer whose length is not a multiple of three cannot be
    /// interpreted as implicit triangles.
    #[error("position buffer of length {len} is not a whole number of triangles")]
    InvalidBufferLength {
        /// Number of positions in the buffer.
        len: usize,
    },

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A vertex is not referenced by any face.
    #[error("vertex {vertex} is isolated (not referenced by any face)")]
    IsolatedVertex {
        /// The isolated vertex index.
        vertex: usize,
    },

    /// A face shares no edge with any other face.
    #[error("face {face} is isolated (all three edges lie on the boundary)")]
    IsolatedFace {
        /// The isolated face index.
        face: usize,
    },

    /// A vertex is touched by more than one disjoint fan of faces.
    #[error("vertex {vertex} is non-manifold")]
    NonManifoldVertex {
        /// The offending vertex index.
        vertex: usize,
    },

    /// An edge has more than two incident faces.
    #[error("edge ({v0}, {v1}) has more than two incident faces")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The topology and the position array disagree in size.
    #[error("geometry has {positions} positions but mesh has {vertices} vertices")]
    PositionCountMismatch {
        /// Number of positions supplied.
        positions: usize,
        /// Number of vertices in the mesh.
        vertices: usize,
    },

    /// Sparse factorization of an operator failed.
    ///
    /// A degenerate embedding (near-zero-area triangles driving the
    /// cotangent weights to extremes) surfaces here. The failure is not
    /// retried; the mesh itself must be repaired.
    #[error("sparse factorization failed: {details}")]
    Factorization {
        /// Backend error description.
        details: String,
    },
}
