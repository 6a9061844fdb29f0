/////////////////////////////////////////////////////////////////////////////////////////////
//
// Evaluates the tensor-product Chebyshev basis of a Smolyak element set at arbitrary points.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    error::{SmolyakError, SmolyakResult},
    grid::resolve_index_set,
    index_set::SmolyakIndexSet,
};
use faer::{Mat, MatRef};
use ferreus_cheb::{evaluate_chebyshev_polynomials, ChebyshevKind};
use rayon::prelude::*;

/// Chebyshev tables for each dimension.
///
/// Table `k` has one row per point and one column per degree
/// `0..=max_positions[k]`, evaluated at column `k` of `points`.
fn dimension_tables(points: MatRef<f64>, max_positions: &[usize]) -> Vec<Mat<f64>> {
    max_positions
        .iter()
        .enumerate()
        .map(|(k, max_position)| {
            let coordinates: Vec<f64> = (0..points.nrows()).map(|i| points[(i, k)]).collect();
            evaluate_chebyshev_polynomials(ChebyshevKind::First, max_position + 1, &coordinates)
        })
        .collect()
}

/// Basis row for point `i`: the product over dimensions of `T_{element[k]}(x_k)`
/// for every element.
#[inline]
fn basis_row(i: usize, index_set: &SmolyakIndexSet, tables: &[Mat<f64>]) -> Vec<f64> {
    index_set
        .iter()
        .map(|element| {
            element
                .iter()
                .zip(tables.iter())
                .fold(1.0, |acc, (degree, table)| acc * table[(i, *degree)])
        })
        .collect()
}

/// Evaluates the Smolyak basis of `index_set` at every row of `points`.
///
/// Returns the `n × len` matrix whose column `j` is the basis function of
/// element `j`. Points are not required to lie in `[-1, 1]`; the polynomials
/// are evaluated by recurrence wherever they are requested.
///
/// When `n >= parallel_threshold` the rows are computed on the rayon thread
/// pool. The result does not depend on which path is taken.
pub fn evaluate_polynomial(
    points: MatRef<f64>,
    index_set: &SmolyakIndexSet,
    parallel_threshold: usize,
) -> SmolyakResult<Mat<f64>> {
    if points.ncols() != index_set.dimensions() {
        return Err(SmolyakError::InvalidDimension {
            expected: index_set.dimensions(),
            found: points.ncols(),
        });
    }

    let num_points = points.nrows();
    let num_basis = index_set.len();
    let tables = dimension_tables(points, &index_set.max_positions());

    let rows: Vec<Vec<f64>> = if num_points >= parallel_threshold {
        (0..num_points)
            .into_par_iter()
            .map(|i| basis_row(i, index_set, &tables))
            .collect()
    } else {
        (0..num_points)
            .map(|i| basis_row(i, index_set, &tables))
            .collect()
    };

    Ok(Mat::from_fn(num_points, num_basis, |i, j| rows[i][j]))
}

/// Evaluates the Smolyak basis for `d` dimensions and level `mu_max` at `points`,
/// optionally restricted to the anisotropic level vector `subset`.
///
/// Evaluating at [`smolyak_grid`](crate::smolyak_grid) with the same
/// arguments gives a square, invertible matrix.
pub fn smolyak_polynomial_basis(
    points: MatRef<f64>,
    d: usize,
    mu_max: usize,
    subset: Option<&[usize]>,
) -> SmolyakResult<Mat<f64>> {
    let index_set = resolve_index_set(d, mu_max, subset)?;
    evaluate_polynomial(points, &index_set, usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{build_grid, smolyak_grid};
    use equator::assert;
    use faer::{mat, utils::approx::*};
    use ferreus_cheb::{chebyshev_t_scalar, linalg::singular_values};

    #[test]
    fn first_columns_match_low_degree_products() {
        let points = mat![[0.3, -0.7], [-1.0, 0.5], [0.9, 0.1f64]];
        let basis = smolyak_polynomial_basis(points.as_ref(), 2, 1, None).unwrap();

        // Element order at level 1: (0,0), (0,1), (0,2), (1,0), (2,0).
        for i in 0..3 {
            let (x, y) = (points[(i, 0)], points[(i, 1)]);
            assert!(basis[(i, 0)] == 1.0);
            assert!((basis[(i, 1)] - y).abs() < 1e-15);
            assert!((basis[(i, 2)] - chebyshev_t_scalar(2, y)).abs() < 1e-15);
            assert!((basis[(i, 3)] - x).abs() < 1e-15);
            assert!((basis[(i, 4)] - chebyshev_t_scalar(2, x)).abs() < 1e-15);
        }
    }

    #[test]
    fn basis_at_grid_is_square_and_full_rank() {
        for (d, mu, subset) in [
            (2usize, 3usize, None),
            (3, 2, None),
            (2, 4, Some(vec![4, 2])),
        ] {
            let subset = subset.as_deref();
            let grid = smolyak_grid(d, mu, subset).unwrap();
            let basis = smolyak_polynomial_basis(grid.as_ref(), d, mu, subset).unwrap();

            assert!(basis.nrows() == basis.ncols());

            let sigma = singular_values(basis.as_ref()).unwrap();
            let smallest = sigma.iter().cloned().fold(f64::INFINITY, f64::min);
            assert!(smallest > 1e-8 * sigma[0]);
        }
    }

    #[test]
    fn evaluates_outside_canonical_domain() {
        let points = mat![[1.5, -2.0f64]];
        let basis = smolyak_polynomial_basis(points.as_ref(), 2, 2, None).unwrap();

        for j in 0..basis.ncols() {
            assert!(basis[(0, j)].is_finite());
        }
        // Elements 2 and 3 are (0, 2) and (1, 0).
        assert!(basis[(0, 2)] == 7.0);
        assert!(basis[(0, 3)] == 1.5);
    }

    #[test]
    fn parallel_and_serial_evaluation_agree() {
        let index_set = SmolyakIndexSet::isotropic(3, 3).unwrap();
        let grid = build_grid(&index_set);
        let points = Mat::from_fn(257, 3, |i, k| grid[(i % grid.nrows(), k)] * 0.9);

        let serial = evaluate_polynomial(points.as_ref(), &index_set, usize::MAX).unwrap();
        let parallel = evaluate_polynomial(points.as_ref(), &index_set, 1).unwrap();

        let approx_eq = CwiseMat(ApproxEq::eps());
        assert!(&serial ~ &parallel);
    }

    #[test]
    fn mismatched_point_dimensions_are_rejected() {
        let points = Mat::<f64>::zeros(4, 3);
        let index_set = SmolyakIndexSet::isotropic(2, 2).unwrap();

        assert_eq!(
            evaluate_polynomial(points.as_ref(), &index_set, 1024).unwrap_err(),
            SmolyakError::InvalidDimension {
                expected: 2,
                found: 3
            }
        );
    }
}
