//! Geodesic distance via the heat method.
//!
//! The heat method (Crane, Weischedel, Wardetzky 2013) computes geodesic
//! distance from arbitrary source sets in three steps:
//!
//! 1. Diffuse a unit of heat from the sources for a short time `t` by
//!    solving `(M + t L) u = delta`.
//! 2. Normalize the negated gradient of `u` per face, giving a unit vector
//!    field `X` that points away from the sources.
//! 3. Recover the distance field by solving the Poisson problem
//!    `L phi = -div X` and shifting so the minimum is zero.
//!
//! Both linear systems depend only on the mesh, so [`HeatMethod::new`]
//! factorizes them once; every subsequent [`compute`](HeatMethod::compute)
//! is two backsubstitutions plus linear-time gradient and divergence
//! passes.

use nalgebra::{DVector, Vector3};

use crate::error::Result;
use crate::geometry::Geometry;
use crate::mesh::{MeshIndex, VertexId};
use crate::solve::CholeskyFactor;

/// A prepared heat-method solver over one geometry.
///
/// Borrows the geometry it was built from; the mesh must not change while
/// the solver is alive, which the borrow enforces.
///
/// # Example
/// ```
/// use geoheat::geometry::Geometry;
/// use geoheat::heat::HeatMethod;
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let geometry: Geometry = Geometry::from_triangles(positions, &[[0, 1, 2], [0, 2, 3]]).unwrap();
/// let heat = HeatMethod::new(&geometry).unwrap();
///
/// let distance = heat.distance_from(&[geoheat::mesh::VertexId::new(0)]).unwrap();
/// assert!(distance[0].abs() < 1e-6);
/// ```
pub struct HeatMethod<'a, I: MeshIndex = u32> {
    geometry: &'a Geometry<I>,
    t: f64,
    heat_flow: CholeskyFactor,
    potential: CholeskyFactor,
}

impl<'a, I: MeshIndex> HeatMethod<'a, I> {
    /// Prepare a solver with the standard time step, the squared mean edge
    /// length of the mesh.
    ///
    /// Assembles and factorizes both operators; this is the expensive call.
    pub fn new(geometry: &'a Geometry<I>) -> Result<Self> {
        let h = geometry.mean_edge_length();
        Self::with_time_step(geometry, h * h)
    }

    /// Prepare a solver with an explicit diffusion time step.
    ///
    /// Larger steps smooth the field (distances bleed around obstacles),
    /// smaller steps sharpen it at the cost of noise. The default in
    /// [`HeatMethod::new`] is the right choice for most meshes.
    pub fn with_time_step(geometry: &'a Geometry<I>, t: f64) -> Result<Self> {
        let laplacian = geometry.laplace_matrix();
        let mass = geometry.mass_matrix();
        let flow = &mass + &laplacian.map(|&x| x * t);

        let heat_flow = CholeskyFactor::new(&flow)?;
        let potential = CholeskyFactor::new(&laplacian)?;
        log::debug!(
            "heat method ready: {} vertices, t = {t:.3e}",
            geometry.mesh().num_vertices()
        );

        Ok(Self {
            geometry,
            t,
            heat_flow,
            potential,
        })
    }

    /// The diffusion time step in use.
    #[inline]
    pub fn time_step(&self) -> f64 {
        self.t
    }

    /// The row of the distance field that corresponds to a vertex.
    ///
    /// Rows follow mesh vertex order, so this is the vertex's dense index.
    #[inline]
    pub fn vertex_index(&self, v: VertexId<I>) -> usize {
        v.index()
    }

    /// Compute the geodesic distance field for a source density `delta`,
    /// one entry per vertex in mesh vertex order.
    ///
    /// Returns `None` when `delta` has no positive entry, since an empty
    /// source set has no distance field. The result is zero at the sources
    /// and nonnegative everywhere.
    ///
    /// # Panics
    ///
    /// Panics if `delta` does not have one entry per vertex.
    pub fn compute(&self, delta: &DVector<f64>) -> Option<DVector<f64>> {
        assert_eq!(
            delta.len(),
            self.geometry.mesh().num_vertices(),
            "source density must have one entry per vertex"
        );
        if !delta.iter().any(|&d| d > 0.0) {
            return None;
        }

        let u = self.heat_flow.solve(delta);
        let field = self.vector_field(&u);
        let div = self.divergence(&field);

        let mut phi = self.potential.solve(&-div);
        let min = phi.min();
        phi.add_scalar_mut(-min);
        Some(phi)
    }

    /// Compute the geodesic distance field from a set of source vertices.
    ///
    /// Places a unit of heat on each source and calls
    /// [`compute`](HeatMethod::compute); `None` when `sources` is empty.
    pub fn distance_from(&self, sources: &[VertexId<I>]) -> Option<DVector<f64>> {
        let mut delta = DVector::zeros(self.geometry.mesh().num_vertices());
        for &v in sources {
            delta[v.index()] = 1.0;
        }
        self.compute(&delta)
    }

    /// The normalized negated gradient of the diffused heat `u`, one unit
    /// vector per face. Zero on degenerate faces and where the gradient
    /// vanishes.
    fn vector_field(&self, u: &DVector<f64>) -> Vec<Vector3<f64>> {
        let mesh = self.geometry.mesh();
        let mut field = Vec::with_capacity(mesh.num_faces());

        for f in mesh.face_ids() {
            let area = self.geometry.face_area(f);
            if area < 1e-12 {
                field.push(Vector3::zeros());
                continue;
            }
            let normal = self.geometry.face_normal(f);

            // Each half-edge contributes the value at its opposite vertex
            // times the edge rotated 90 degrees in the face plane.
            let mut gradient = Vector3::zeros();
            for he in mesh.face_halfedges(f) {
                let opposite = u[mesh.origin(mesh.prev(he)).index()];
                gradient += opposite * normal.cross(&self.geometry.vector(he));
            }
            gradient /= 2.0 * area;

            let norm = gradient.norm();
            if norm < 1e-12 {
                field.push(Vector3::zeros());
            } else {
                field.push(-gradient / norm);
            }
        }

        field
    }

    /// The integrated divergence of a per-face vector field, one entry per
    /// vertex.
    fn divergence(&self, field: &[Vector3<f64>]) -> DVector<f64> {
        let mesh = self.geometry.mesh();
        let mut div = DVector::zeros(mesh.num_vertices());

        for v in mesh.vertex_ids() {
            let mut sum = 0.0;
            for he in mesh.vertex_halfedges(v) {
                if mesh.is_boundary_halfedge(he) {
                    continue;
                }
                let x = field[mesh.face_of(he).index()];

                // The two edges of the face leaving this vertex, weighted by
                // the cotangents of the angles opposite them.
                let e1 = self.geometry.vector(he);
                let e2 = self.geometry.vector(mesh.twin(mesh.prev(he)));
                sum += self.geometry.cotan(he) * e1.dot(&x)
                    + self.geometry.cotan(mesh.prev(he)) * e2.dot(&x);
            }
            div[v.index()] = 0.5 * sum;
        }

        div
    }
}

impl<I: MeshIndex> std::fmt::Debug for HeatMethod<'_, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeatMethod")
            .field("vertices", &self.geometry.mesh().num_vertices())
            .field("t", &self.t)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tests::{icosahedron, unit_square};
    use nalgebra::Point3;

    /// An n x n planar grid on the unit square, each quad split into two
    /// triangles.
    fn grid(n: usize) -> Geometry {
        let h = 1.0 / (n - 1) as f64;
        let mut positions = Vec::with_capacity(n * n);
        for j in 0..n {
            for i in 0..n {
                positions.push(Point3::new(i as f64 * h, j as f64 * h, 0.0));
            }
        }
        let mut faces = Vec::with_capacity(2 * (n - 1) * (n - 1));
        for j in 0..n - 1 {
            for i in 0..n - 1 {
                let a = j * n + i;
                let b = a + 1;
                let c = a + n;
                let d = c + 1;
                faces.push([a, b, d]);
                faces.push([a, d, c]);
            }
        }
        Geometry::from_triangles(positions, &faces).unwrap()
    }

    /// A flat ribbon: two rows of `m` vertices, one strip of quads split
    /// into triangles.
    fn ribbon(m: usize) -> Geometry {
        let mut positions = Vec::with_capacity(2 * m);
        for row in 0..2 {
            for i in 0..m {
                positions.push(Point3::new(i as f64, row as f64, 0.0));
            }
        }
        let mut faces = Vec::with_capacity(2 * (m - 1));
        for i in 0..m - 1 {
            let a = i;
            let b = i + 1;
            let c = m + i;
            let d = m + i + 1;
            faces.push([a, b, d]);
            faces.push([a, d, c]);
        }
        Geometry::from_triangles(positions, &faces).unwrap()
    }

    #[test]
    fn test_empty_source_set() {
        let g = unit_square();
        let heat = HeatMethod::new(&g).unwrap();
        let delta = DVector::zeros(g.mesh().num_vertices());
        assert!(heat.compute(&delta).is_none());
        assert!(heat.distance_from(&[]).is_none());
    }

    #[test]
    fn test_default_time_step() {
        let g = unit_square();
        let heat = HeatMethod::new(&g).unwrap();
        let h = g.mean_edge_length();
        assert!((heat.time_step() - h * h).abs() < 1e-12);

        let heat = HeatMethod::with_time_step(&g, 0.25).unwrap();
        assert!((heat.time_step() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_distance_is_zero_at_source_and_nonnegative() {
        let g = icosahedron();
        let heat = HeatMethod::new(&g).unwrap();
        let source = VertexId::new(0);

        let phi = heat.distance_from(&[source]).unwrap();
        assert_eq!(phi.len(), g.mesh().num_vertices());
        assert!(phi[heat.vertex_index(source)].abs() < 1e-6);
        for i in 0..phi.len() {
            assert!(phi[i] >= 0.0);
            assert!(phi[i].is_finite());
        }
    }

    #[test]
    fn test_icosahedron_symmetry() {
        let g = icosahedron();
        let heat = HeatMethod::new(&g).unwrap();
        let source = VertexId::new(0);

        let phi = heat.distance_from(&[source]).unwrap();

        // All five neighbors of the source are related by a rotational
        // symmetry, so their distances must agree.
        let neighbor_distances: Vec<f64> = g
            .mesh()
            .vertex_neighbors(source)
            .map(|v| phi[heat.vertex_index(v)])
            .collect();
        assert_eq!(neighbor_distances.len(), 5);
        for d in &neighbor_distances[1..] {
            assert!((d - neighbor_distances[0]).abs() < 1e-6);
        }

        // The farthest vertex is the antipode of the source.
        let farthest = g
            .mesh()
            .vertex_ids()
            .max_by(|a, b| phi[a.index()].partial_cmp(&phi[b.index()]).unwrap())
            .unwrap();
        assert_eq!(farthest.index(), 3);
    }

    #[test]
    fn test_grid_distance_grows_away_from_source() {
        let n = 9;
        let g = grid(n);
        let heat = HeatMethod::new(&g).unwrap();
        let source = VertexId::new(0);

        let phi = heat.distance_from(&[source]).unwrap();

        // Along the bottom row the distance increases monotonically with
        // Euclidean distance from the corner source.
        for i in 1..n {
            assert!(phi[i] > phi[i - 1]);
        }
        // The opposite corner is the farthest point of the square.
        let far = n * n - 1;
        for i in 0..n * n - 1 {
            assert!(phi[i] <= phi[far] + 1e-9);
        }
    }

    #[test]
    fn test_grid_near_field_accuracy() {
        let n = 17;
        let g = grid(n);
        let h = 1.0 / (n - 1) as f64;
        let heat = HeatMethod::new(&g).unwrap();
        let center = VertexId::new((n / 2) * n + n / 2);

        let phi = heat.distance_from(&[center]).unwrap();

        // In the flat interior the recovered distance tracks Euclidean
        // distance; check two grid steps out along an axis.
        let two_right = heat.vertex_index(center) + 2;
        let relative = (phi[two_right] - 2.0 * h).abs() / (2.0 * h);
        assert!(relative < 0.25, "relative error {relative}");
    }

    #[test]
    fn test_ribbon_distance_is_monotone() {
        let m = 12;
        let g = ribbon(m);
        let heat = HeatMethod::new(&g).unwrap();

        // Unit source at one end of the strip.
        let phi = heat.distance_from(&[VertexId::new(0)]).unwrap();

        // The field never decreases while walking down the ribbon, in
        // either row.
        for i in 1..m {
            assert!(phi[i] >= phi[i - 1]);
            assert!(phi[m + i] >= phi[m + i - 1]);
        }
        assert!(phi[m - 1] > phi[1]);
    }

    #[test]
    fn test_multiple_sources() {
        let n = 9;
        let g = grid(n);
        let heat = HeatMethod::new(&g).unwrap();
        let corner_a = VertexId::new(0);
        let corner_b = VertexId::new(n * n - 1);

        let phi = heat.distance_from(&[corner_a, corner_b]).unwrap();
        assert!(phi[heat.vertex_index(corner_a)] < 1e-3);
        assert!(phi[heat.vertex_index(corner_b)] < 1e-3);

        // The midpoint of the diagonal is the farthest point from both.
        let mid = heat.vertex_index(VertexId::new((n / 2) * n + n / 2));
        assert!(phi[mid] > phi[heat.vertex_index(corner_a)]);
        assert!(phi[mid] > phi[1]);
    }

    #[test]
    fn test_repeated_queries_are_independent() {
        let g = icosahedron();
        let heat = HeatMethod::new(&g).unwrap();

        let phi_a = heat.distance_from(&[VertexId::new(0)]).unwrap();
        let phi_b = heat.distance_from(&[VertexId::new(3)]).unwrap();
        let phi_a_again = heat.distance_from(&[VertexId::new(0)]).unwrap();

        assert_ne!(phi_a, phi_b);
        assert_eq!(phi_a, phi_a_again);
    }
}
