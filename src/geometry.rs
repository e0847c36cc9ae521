//! Geometry on top of mesh topology.
//!
//! A [`Geometry`] pairs a [`Mesh`] with one position per vertex. Connectivity
//! and embedding are kept separate so the same mesh can carry different
//! embeddings; all metric quantities (lengths, areas, angles, cotangents,
//! dual areas) and the two global operators the heat-method solver consumes
//! (cotangent Laplacian, lumped mass matrix) live here.
//!
//! Derived quantities are computed on demand. Only the sparse operators are
//! materialized, as triplet-assembled CSR matrices.

use nalgebra::{Point3, Vector3};
use sprs::{CsMat, TriMat};

use crate::error::{Error, Result};
use crate::mesh::{
    build_from_buffer, build_from_triangles, CornerId, EdgeId, FaceId, HalfEdgeId, Mesh,
    MeshIndex, VertexId,
};

/// Diagonal shift applied to the Laplacian so the positive semidefinite
/// operator (constant null space) admits a Cholesky-style factorization.
const LAPLACIAN_SHIFT: f64 = 1e-8;

/// A mesh embedded in 3-space.
#[derive(Debug, Clone)]
pub struct Geometry<I: MeshIndex = u32> {
    mesh: Mesh<I>,
    positions: Vec<Point3<f64>>,
}

impl<I: MeshIndex> Geometry<I> {
    /// Pair an already-built mesh with vertex positions, one per vertex in
    /// mesh vertex order.
    pub fn new(mesh: Mesh<I>, positions: Vec<Point3<f64>>) -> Result<Self> {
        if positions.len() != mesh.num_vertices() {
            return Err(Error::PositionCountMismatch {
                positions: positions.len(),
                vertices: mesh.num_vertices(),
            });
        }
        Ok(Self { mesh, positions })
    }

    /// Build topology and geometry from a triangle soup.
    ///
    /// # Example
    /// ```
    /// use geoheat::geometry::Geometry;
    /// use nalgebra::Point3;
    ///
    /// let positions = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(1.0, 1.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    /// let faces = vec![[0, 1, 2], [0, 2, 3]];
    /// let geometry: Geometry = Geometry::from_triangles(positions, &faces).unwrap();
    /// assert!((geometry.total_area() - 1.0).abs() < 1e-12);
    /// ```
    pub fn from_triangles(positions: Vec<Point3<f64>>, faces: &[[usize; 3]]) -> Result<Self> {
        let mesh = build_from_triangles(positions.len(), faces)?;
        Ok(Self { mesh, positions })
    }

    /// Build topology and geometry from a pre-split position buffer (three
    /// consecutive positions per triangle, edge sharing by coordinate
    /// coincidence). See [`build_from_buffer`].
    pub fn from_buffer(buffer: &[Point3<f64>]) -> Result<Self> {
        let (mesh, positions) = build_from_buffer(buffer)?;
        Ok(Self { mesh, positions })
    }

    /// The underlying topology.
    #[inline]
    pub fn mesh(&self) -> &Mesh<I> {
        &self.mesh
    }

    /// All vertex positions, in mesh vertex order.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// The position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.positions[v.index()]
    }

    // ==================== Per-element quantities ====================

    /// The vector along a half-edge, from origin to destination.
    #[inline]
    pub fn vector(&self, he: HalfEdgeId<I>) -> Vector3<f64> {
        self.position(self.mesh.dest(he)) - self.position(self.mesh.origin(he))
    }

    /// The length of an edge.
    pub fn edge_length(&self, e: EdgeId<I>) -> f64 {
        self.vector(self.mesh.edge(e).halfedge).norm()
    }

    /// The midpoint of an edge.
    pub fn edge_midpoint(&self, e: EdgeId<I>) -> Point3<f64> {
        let he = self.mesh.edge(e).halfedge;
        let p0 = self.position(self.mesh.origin(he));
        let p1 = self.position(self.mesh.dest(he));
        Point3::from((p0.coords + p1.coords) * 0.5)
    }

    /// Mean edge length over the whole mesh.
    pub fn mean_edge_length(&self) -> f64 {
        let n = self.mesh.num_edges();
        if n == 0 {
            return 0.0;
        }
        let sum: f64 = self.mesh.edge_ids().map(|e| self.edge_length(e)).sum();
        sum / n as f64
    }

    /// The positions of the three vertices of a face, in cyclic order.
    pub fn face_positions(&self, f: FaceId<I>) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.mesh.face_triangle(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// The area of a face.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        let [p0, p1, p2] = self.face_positions(f);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// The unit normal of a face, oriented by the half-edge cyclic order.
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0).cross(&(p2 - p0)).normalize()
    }

    /// Total surface area of the mesh.
    pub fn total_area(&self) -> f64 {
        self.mesh.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Area-weighted unit normal at a vertex.
    pub fn vertex_normal(&self, v: VertexId<I>) -> Vector3<f64> {
        let mut normal = Vector3::zeros();
        for f in self.mesh.vertex_faces(v) {
            let [p0, p1, p2] = self.face_positions(f);
            normal += (p1 - p0).cross(&(p2 - p0));
        }
        normal.normalize()
    }

    /// The interior angle at a corner, in radians.
    ///
    /// The corner's apex is the origin of its half-edge; the angle is spanned
    /// by the two face edges incident at the apex.
    pub fn angle(&self, c: CornerId<I>) -> f64 {
        let he = self.mesh.corner(c).halfedge;
        let u = self.vector(he).normalize();
        let w = (-self.vector(self.mesh.prev(he))).normalize();
        u.dot(&w).clamp(-1.0, 1.0).acos()
    }

    /// The cotangent of the angle opposite a half-edge, within its face.
    ///
    /// Zero for boundary half-edges (no incident face) and for degenerate
    /// triangles whose cross product vanishes.
    pub fn cotan(&self, he: HalfEdgeId<I>) -> f64 {
        if self.mesh.is_boundary_halfedge(he) {
            return 0.0;
        }
        let u = self.vector(self.mesh.prev(he));
        let v = -self.vector(self.mesh.next(he));
        let cross = u.cross(&v).norm();
        if cross < 1e-10 {
            0.0
        } else {
            u.dot(&v) / cross
        }
    }

    /// Barycentric dual area of a vertex: one third of the total area of its
    /// incident faces.
    pub fn barycentric_dual_area(&self, v: VertexId<I>) -> f64 {
        let sum: f64 = self.mesh.vertex_faces(v).map(|f| self.face_area(f)).sum();
        sum / 3.0
    }

    // ==================== Global operators ====================

    /// Assemble the cotangent Laplace–Beltrami operator (V x V, sparse,
    /// symmetric).
    ///
    /// Off-diagonal `(i, j)` is `-(cot a + cot b) / 2` over the two corners
    /// opposite the edge `ij` (boundary half-edges contribute zero); the
    /// diagonal negates the off-diagonal row sum, so rows sum to zero up to
    /// the small positive-definiteness shift on the diagonal.
    pub fn laplace_matrix(&self) -> CsMat<f64> {
        let n = self.mesh.num_vertices();
        let mut triplets = TriMat::new((n, n));

        for v in self.mesh.vertex_ids() {
            let i = v.index();
            let mut weight_sum = LAPLACIAN_SHIFT;

            for he in self.mesh.vertex_halfedges(v) {
                let w = 0.5 * (self.cotan(he) + self.cotan(self.mesh.twin(he)));
                triplets.add_triplet(i, self.mesh.dest(he).index(), -w);
                weight_sum += w;
            }
            triplets.add_triplet(i, i, weight_sum);
        }

        triplets.to_csr()
    }

    /// Assemble the lumped mass matrix (V x V, diagonal, sparse): barycentric
    /// dual area per vertex.
    pub fn mass_matrix(&self) -> CsMat<f64> {
        let n = self.mesh.num_vertices();
        let mut triplets = TriMat::new((n, n));

        for v in self.mesh.vertex_ids() {
            triplets.add_triplet(v.index(), v.index(), self.barycentric_dual_area(v));
        }

        triplets.to_csr()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Unit square split along the diagonal (0, 2).
    pub(crate) fn unit_square() -> Geometry {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3]];
        Geometry::from_triangles(positions, &faces).unwrap()
    }

    /// Icosahedron with unit-circumradius-scale coordinates.
    pub(crate) fn icosahedron() -> Geometry {
        let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
        let positions = vec![
            Point3::new(-1.0, t, 0.0),
            Point3::new(1.0, t, 0.0),
            Point3::new(-1.0, -t, 0.0),
            Point3::new(1.0, -t, 0.0),
            Point3::new(0.0, -1.0, t),
            Point3::new(0.0, 1.0, t),
            Point3::new(0.0, -1.0, -t),
            Point3::new(0.0, 1.0, -t),
            Point3::new(t, 0.0, -1.0),
            Point3::new(t, 0.0, 1.0),
            Point3::new(-t, 0.0, -1.0),
            Point3::new(-t, 0.0, 1.0),
        ];
        let faces = vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];
        Geometry::from_triangles(positions, &faces).unwrap()
    }

    #[test]
    fn test_face_quantities_on_square() {
        let g = unit_square();
        for f in g.mesh().face_ids() {
            assert!((g.face_area(f) - 0.5).abs() < 1e-12);
            let n = g.face_normal(f);
            assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
        }
        assert!((g.total_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_edge_length_on_square() {
        let g = unit_square();
        // Four sides of length 1 and one diagonal of length sqrt(2).
        let expected = (4.0 + 2.0_f64.sqrt()) / 5.0;
        assert!((g.mean_edge_length() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_corner_angles_sum_per_face() {
        let g = icosahedron();
        let mesh = g.mesh();
        for f in mesh.face_ids() {
            let sum: f64 = mesh
                .face_halfedges(f)
                .map(|he| g.angle(mesh.corner_of(he)))
                .sum();
            assert!((sum - std::f64::consts::PI).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cotan_on_right_triangles() {
        let g = unit_square();
        let mesh = g.mesh();
        // In face [0, 1, 2]: the angle at vertex 1 is the right angle, so the
        // half-edge opposite it (the diagonal 2 -> 0) has cotangent ~0; the
        // half-edges opposite the 45-degree corners have cotangent ~1.
        for he in mesh.face_halfedges(mesh.face_ids().next().unwrap()) {
            let apex = mesh.origin(mesh.prev(he));
            let expected = if apex.index() == 1 { 0.0 } else { 1.0 };
            assert!((g.cotan(he) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_dual_area() {
        let g = unit_square();
        // Vertex 0 touches both triangles: (0.5 + 0.5) / 3.
        assert!((g.barycentric_dual_area(VertexId::new(0)) - 1.0 / 3.0).abs() < 1e-12);
        // Vertex 1 touches one: 0.5 / 3.
        assert!((g.barycentric_dual_area(VertexId::new(1)) - 0.5 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_mass_matrix_sums_to_total_area() {
        let g = icosahedron();
        let m = g.mass_matrix();
        let mut diag_sum = 0.0;
        for (&value, (i, j)) in m.iter() {
            assert_eq!(i, j, "mass matrix must be diagonal");
            assert!(value > 0.0, "dual areas must be strictly positive");
            diag_sum += value;
        }
        assert!((diag_sum - g.total_area()).abs() < 1e-9);
    }

    #[test]
    fn test_laplacian_rows_sum_to_zero() {
        let g = icosahedron();
        let l = g.laplace_matrix();
        let n = g.mesh().num_vertices();

        let mut row_sums = vec![0.0; n];
        for (&value, (i, j)) in l.iter() {
            row_sums[i] += value;
            if i == j {
                assert!(value > 0.0);
            } else {
                assert!(value <= 0.0);
            }
        }
        for sum in row_sums {
            // Rows sum to the positive-definiteness shift, not exactly zero.
            assert!(sum.abs() < 1e-6);
        }
    }

    #[test]
    fn test_laplacian_is_symmetric() {
        let g = icosahedron();
        let l = g.laplace_matrix();
        for (&value, (i, j)) in l.iter() {
            let transposed = l.get(j, i).copied().unwrap_or(0.0);
            assert!((value - transposed).abs() < 1e-12);
        }
    }

    #[test]
    fn test_laplacian_boundary_edge_weight() {
        let g = unit_square();
        let l = g.laplace_matrix();
        // Edge (0, 1) is a boundary edge: only the 45-degree corner at vertex
        // 2 contributes, so the weight is -cot(45)/2 = -0.5.
        let w = l.get(0, 1).copied().unwrap();
        assert!((w + 0.5).abs() < 1e-12);
        // Edge (0, 2) is interior with two right angles opposite: weight ~0.
        let w = l.get(0, 2).copied().unwrap();
        assert!(w.abs() < 1e-12);
    }

    #[test]
    fn test_position_count_mismatch() {
        let g = unit_square();
        let mesh = g.mesh().clone();
        let result = Geometry::new(mesh, vec![Point3::origin(); 3]);
        assert!(matches!(
            result,
            Err(Error::PositionCountMismatch { positions: 3, vertices: 4 })
        ));
    }
}
