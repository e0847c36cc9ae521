//! Sparse linear solves.
//!
//! This module is the seam to the numerical backend: the heat-method solver
//! needs to factorize two symmetric positive definite operators once and
//! then solve against them repeatedly, one right-hand side per queried
//! source. [`CholeskyFactor`] wraps a sparse LDLT factorization (`sprs-ldl`)
//! behind that contract.

use nalgebra::DVector;
use sprs::CsMat;
use sprs_ldl::{Ldl, LdlNumeric};

use crate::error::{Error, Result};

/// A cached Cholesky-style (LDLT) factorization of a sparse symmetric
/// positive definite matrix.
///
/// Factorization happens once, in [`CholeskyFactor::new`]; each
/// [`solve`](CholeskyFactor::solve) is a pair of triangular substitutions
/// against the cached factor.
pub struct CholeskyFactor {
    factor: LdlNumeric<f64, usize>,
    n: usize,
}

impl CholeskyFactor {
    /// Factorize a sparse symmetric positive definite matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Factorization`] if the matrix is not symmetric or
    /// the factorization breaks down (an indefinite or numerically
    /// degenerate operator).
    pub fn new(matrix: &CsMat<f64>) -> Result<Self> {
        let n = matrix.rows();

        // The fill-in-reduction ordering asserts symmetry internally, so a
        // lopsided operator must be caught here to come back as an error.
        let symmetric = matrix.cols() == n
            && matrix
                .iter()
                .all(|(&value, (i, j))| matrix.get(j, i) == Some(&value));
        if !symmetric {
            return Err(Error::Factorization {
                details: "operator is not symmetric".to_string(),
            });
        }

        let factor = Ldl::new()
            .check_symmetry(sprs::SymmetryCheck::CheckSymmetry)
            .fill_in_reduction(sprs::FillInReduction::ReverseCuthillMcKee)
            .numeric(matrix.view())
            .map_err(|e| Error::Factorization {
                details: e.to_string(),
            })?;

        log::debug!("factorized {n} x {n} operator ({} non-zeros)", matrix.nnz());

        Ok(Self { factor, n })
    }

    /// The dimension of the factorized system.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Check if the system is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Solve `A x = rhs` against the cached factorization.
    pub fn solve(&self, rhs: &DVector<f64>) -> DVector<f64> {
        assert_eq!(rhs.len(), self.n, "right-hand side dimension mismatch");
        DVector::from_vec(self.factor.solve(rhs.as_slice()))
    }
}

impl std::fmt::Debug for CholeskyFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CholeskyFactor").field("n", &self.n).finish()
    }
}
