/////////////////////////////////////////////////////////////////////////////////////////////
//
// Adds helper dense linear algebra routines, including rank-revealing SVD least squares.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # linalg
//!
//! Helper linear algebra functionality shared by the 1-D and Smolyak solvers.

use faer::{linalg::solvers::Solve, Mat, MatRef};
use std::fmt;

/// Failure of a faer matrix decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecompositionError {
    /// The SVD iteration failed to converge.
    NoConvergence,
}

impl fmt::Display for DecompositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecompositionError::NoConvergence => {
                write!(f, "singular value decomposition did not converge")
            }
        }
    }
}

impl std::error::Error for DecompositionError {}

/// Result of a least-squares solve, with the numerical rank that was used.
#[derive(Debug)]
pub struct LeastSquaresSolution {
    /// Solution matrix, one column per right-hand side.
    pub solution: Mat<f64>,

    /// Number of singular values above the cutoff.
    pub rank: usize,

    /// Ratio of the largest to the smallest retained singular value.
    pub condition_number: f64,
}

/// Returns the singular values of `a` in non-increasing order.
pub fn singular_values(a: MatRef<f64>) -> Result<Vec<f64>, DecompositionError> {
    let svd = a.svd().map_err(|_| DecompositionError::NoConvergence)?;
    Ok(svd.S().column_vector().iter().cloned().collect())
}

/// Counts the singular values greater than `tolerance * sigma_max`.
pub fn numerical_rank(sigma: &[f64], tolerance: f64) -> usize {
    let sigma_max = sigma.iter().cloned().fold(0.0, f64::max);
    let cutoff = tolerance * sigma_max;
    sigma.iter().filter(|s| **s > cutoff && **s > 0.0).count()
}

/// Solves `min ||A X - B||` with a truncated SVD.
///
/// Singular values below `tolerance * sigma_max` are discarded, giving the
/// minimum-norm solution when `A` is rank deficient. The caller decides
/// whether the returned rank is acceptable.
pub fn svd_least_squares(
    a: MatRef<f64>,
    b: MatRef<f64>,
    tolerance: f64,
) -> Result<LeastSquaresSolution, DecompositionError> {
    let svd = a.svd().map_err(|_| DecompositionError::NoConvergence)?;
    let ur = svd.U();
    let vr = svd.V();
    let sigma: Vec<f64> = svd.S().column_vector().iter().cloned().collect();

    let rank = numerical_rank(&sigma, tolerance);

    if rank == 0 {
        return Ok(LeastSquaresSolution {
            solution: Mat::<f64>::zeros(a.ncols(), b.ncols()),
            rank,
            condition_number: f64::INFINITY,
        });
    }

    // X = V_r diag(1 / sigma_r) U_r^T B
    let mut projected = ur.subcols(0, rank).transpose() * b;

    projected
        .row_iter_mut()
        .zip(sigma.iter())
        .for_each(|(row, s)| {
            row.iter_mut().for_each(|element| *element /= s);
        });

    let solution = vr.subcols(0, rank) * projected.as_ref();

    Ok(LeastSquaresSolution {
        solution,
        rank,
        condition_number: sigma[0] / sigma[rank - 1],
    })
}

/// Solves the square system `A X = B` with a partially pivoted LU factorisation.
pub fn lu_solve(a: MatRef<f64>, b: MatRef<f64>) -> Mat<f64> {
    let lu = a.partial_piv_lu();
    lu.solve(b)
}

/// Largest absolute entry of `A X - B`.
pub fn max_residual(a: MatRef<f64>, x: MatRef<f64>, b: MatRef<f64>) -> f64 {
    let predicted = a * x;
    let mut max_abs = 0.0f64;

    for j in 0..b.ncols() {
        for i in 0..b.nrows() {
            max_abs = max_abs.max((predicted[(i, j)] - b[(i, j)]).abs());
        }
    }

    max_abs
}
