/////////////////////////////////////////////////////////////////////////////////////////////
//
// Solves for Smolyak interpolation coefficients and evaluates the fitted expansion.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    config::{SmolyakParams, SolverType},
    error::{SmolyakError, SmolyakResult},
    grid::resolve_index_set,
    index_set::SmolyakIndexSet,
    polynomial::evaluate_polynomial,
};
use faer::{Mat, MatRef};
use ferreus_cheb::linalg;
use serde::{Deserialize, Serialize};

/// Diagnostics from a coefficient solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    /// Numerical rank of the basis matrix.
    pub rank: usize,

    /// Number of basis functions, i.e. the rank required.
    pub num_basis: usize,

    /// Ratio of the largest to the smallest singular value.
    pub condition_number: f64,

    /// Largest absolute residual of the solved system.
    pub max_residual: f64,
}

/// Solves `B(grid) · C = values` for the coefficients `C`.
///
/// `grid` is `n × d` in canonical coordinates and `values` is `n × k`, giving
/// one coefficient column per value column. The basis matrix must have full
/// column rank: singular values at or below `params.rank_tolerance * sigma_max`
/// are treated as zero, and any shortfall is returned as
/// [`SmolyakError::RankDeficientSystem`] rather than a degenerate fit.
///
/// Square systems are solved by LU and overdetermined ones by truncated SVD
/// least squares, subject to `params.solver_type`.
pub fn fit(
    grid: MatRef<f64>,
    index_set: &SmolyakIndexSet,
    values: MatRef<f64>,
    params: &SmolyakParams,
) -> SmolyakResult<(Mat<f64>, SolveReport)> {
    let num_points = grid.nrows();
    let num_basis = index_set.len();

    if values.nrows() != num_points {
        return Err(SmolyakError::ShapeMismatch {
            what: "function value rows",
            expected: num_points,
            found: values.nrows(),
        });
    }

    if num_points == 0 {
        return Err(SmolyakError::RankDeficientSystem {
            rank: 0,
            required: num_basis,
            tolerance: params.rank_tolerance,
        });
    }

    let basis = evaluate_polynomial(grid, index_set, params.parallel_threshold)?;
    let is_square = num_points == num_basis;

    let use_lu = match params.solver_type {
        SolverType::Exact => {
            if !is_square {
                return Err(SmolyakError::ShapeMismatch {
                    what: "grid points for an exact solve",
                    expected: num_basis,
                    found: num_points,
                });
            }
            true
        }
        SolverType::LeastSquares => false,
        SolverType::Auto => is_square,
    };

    let rank_deficient = |rank: usize| SmolyakError::RankDeficientSystem {
        rank,
        required: num_basis,
        tolerance: params.rank_tolerance,
    };

    let (coefficients, rank, condition_number) = if use_lu {
        let sigma = linalg::singular_values(basis.as_ref())?;
        let rank = linalg::numerical_rank(&sigma, params.rank_tolerance);
        if rank < num_basis {
            return Err(rank_deficient(rank));
        }

        let coefficients = linalg::lu_solve(basis.as_ref(), values);
        (coefficients, rank, sigma[0] / sigma[rank - 1])
    } else {
        let lstsq = linalg::svd_least_squares(basis.as_ref(), values, params.rank_tolerance)?;
        if lstsq.rank < num_basis {
            return Err(rank_deficient(lstsq.rank));
        }

        (lstsq.solution, lstsq.rank, lstsq.condition_number)
    };

    let max_residual = linalg::max_residual(basis.as_ref(), coefficients.as_ref(), values);

    Ok((
        coefficients,
        SolveReport {
            rank,
            num_basis,
            condition_number,
            max_residual,
        },
    ))
}

/// Evaluates the expansion with `coefficients` at every row of `query_points`.
///
/// Returns an `n × k` matrix, one column per coefficient column.
pub fn evaluate(
    query_points: MatRef<f64>,
    index_set: &SmolyakIndexSet,
    coefficients: MatRef<f64>,
    parallel_threshold: usize,
) -> SmolyakResult<Mat<f64>> {
    if coefficients.nrows() != index_set.len() {
        return Err(SmolyakError::ShapeMismatch {
            what: "coefficient rows",
            expected: index_set.len(),
            found: coefficients.nrows(),
        });
    }

    let basis = evaluate_polynomial(query_points, index_set, parallel_threshold)?;
    Ok(basis.as_ref() * coefficients)
}

/// Fits coefficients to `function_values` sampled at `grid`, where the grid was
/// built for `d`, `mu_max` and the optional level vector `subset`.
///
/// Uses [`SmolyakParams::default`].
///
/// # Examples
///
/// ```
/// use faer::Mat;
/// use ferreus_smolyak::{smolyak_evaluate, smolyak_fit, smolyak_grid};
///
/// let grid = smolyak_grid(2, 3, Some(&[3, 2])).unwrap();
/// let values = Mat::from_fn(grid.nrows(), 1, |i, _| {
///     let (x, y) = (grid[(i, 0)], grid[(i, 1)]);
///     1.0 + x * y - 0.5 * y * y
/// });
///
/// let coefficients = smolyak_fit(grid.as_ref(), 2, 3, Some(&[3, 2]), values.as_ref()).unwrap();
/// let fitted = smolyak_evaluate(grid.as_ref(), 2, 3, Some(&[3, 2]), coefficients.as_ref()).unwrap();
///
/// for i in 0..grid.nrows() {
///     assert!((fitted[(i, 0)] - values[(i, 0)]).abs() < 1e-10);
/// }
/// ```
pub fn smolyak_fit(
    grid: MatRef<f64>,
    d: usize,
    mu_max: usize,
    subset: Option<&[usize]>,
    function_values: MatRef<f64>,
) -> SmolyakResult<Mat<f64>> {
    let index_set = resolve_index_set(d, mu_max, subset)?;
    let (coefficients, _) = fit(grid, &index_set, function_values, &SmolyakParams::default())?;
    Ok(coefficients)
}

/// Evaluates coefficients from [`smolyak_fit`] at `query_points`.
pub fn smolyak_evaluate(
    query_points: MatRef<f64>,
    d: usize,
    mu_max: usize,
    subset: Option<&[usize]>,
    coefficients: MatRef<f64>,
) -> SmolyakResult<Mat<f64>> {
    let index_set = resolve_index_set(d, mu_max, subset)?;
    evaluate(
        query_points,
        &index_set,
        coefficients,
        SmolyakParams::default().parallel_threshold,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_grid;
    use equator::assert;

    fn gaussian_ridge(x1: f64, x2: f64) -> f64 {
        2.0 * x1 * (-4.0 * x1 * x1 - 16.0 * x2 * x2).exp()
    }

    fn sample(grid: &Mat<f64>, f: impl Fn(f64, f64) -> f64) -> Mat<f64> {
        Mat::from_fn(grid.nrows(), 1, |i, _| f(grid[(i, 0)], grid[(i, 1)]))
    }

    #[test]
    fn gaussian_ridge_round_trip_at_grid() {
        let index_set = SmolyakIndexSet::isotropic(2, 5)
            .unwrap()
            .anisotropic(&[5, 5])
            .unwrap();
        let grid = build_grid(&index_set);
        let values = sample(&grid, gaussian_ridge);

        let (coefficients, report) = fit(
            grid.as_ref(),
            &index_set,
            values.as_ref(),
            &SmolyakParams::default(),
        )
        .unwrap();

        assert!(report.rank == index_set.len());
        assert!(report.max_residual < 1e-8);

        let fitted = evaluate(grid.as_ref(), &index_set, coefficients.as_ref(), 1024).unwrap();
        for i in 0..grid.nrows() {
            assert!((fitted[(i, 0)] - values[(i, 0)]).abs() < 1e-8);
        }
    }

    #[test]
    fn smooth_function_is_accurate_off_grid() {
        let f = |x: f64, y: f64| (0.5 * x).exp() * y.cos();
        let grid = crate::grid::smolyak_grid(2, 4, None).unwrap();
        let values = sample(&grid, f);

        let coefficients = smolyak_fit(grid.as_ref(), 2, 4, None, values.as_ref()).unwrap();

        let query = Mat::from_fn(49, 2, |i, k| {
            let idx = if k == 0 { i / 7 } else { i % 7 };
            -0.9 + 0.3 * idx as f64
        });
        let predicted =
            smolyak_evaluate(query.as_ref(), 2, 4, None, coefficients.as_ref()).unwrap();

        for i in 0..query.nrows() {
            let exact = f(query[(i, 0)], query[(i, 1)]);
            assert!((predicted[(i, 0)] - exact).abs() < 1e-3);
        }
    }

    #[test]
    fn multiple_value_columns_are_solved_together() {
        let index_set = SmolyakIndexSet::isotropic(2, 2).unwrap();
        let grid = build_grid(&index_set);
        let values = Mat::from_fn(grid.nrows(), 2, |i, j| {
            let (x, y) = (grid[(i, 0)], grid[(i, 1)]);
            if j == 0 { x + y } else { x * y }
        });

        let (coefficients, _) = fit(
            grid.as_ref(),
            &index_set,
            values.as_ref(),
            &SmolyakParams::default(),
        )
        .unwrap();

        assert!(coefficients.ncols() == 2);

        // x * y is the single element (1, 1).
        let xy_idx = index_set.iter().position(|e| e == [1usize, 1]).unwrap();
        for j in 0..index_set.len() {
            let expected = if j == xy_idx { 1.0 } else { 0.0 };
            assert!((coefficients[(j, 1)] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn overdetermined_system_uses_least_squares() {
        let index_set = SmolyakIndexSet::isotropic(2, 2).unwrap();
        let grid = build_grid(&SmolyakIndexSet::isotropic(2, 3).unwrap());
        let values = sample(&grid, |x, y| x * x + x * y);

        let (coefficients, report) = fit(
            grid.as_ref(),
            &index_set,
            values.as_ref(),
            &SmolyakParams::default(),
        )
        .unwrap();

        assert!(grid.nrows() > index_set.len());
        assert!(report.rank == index_set.len());
        assert!(report.max_residual < 1e-10);
        assert!(coefficients.nrows() == index_set.len());

        let exact = SmolyakParams::builder()
            .solver_type(SolverType::Exact)
            .build();
        assert!(matches!(
            fit(grid.as_ref(), &index_set, values.as_ref(), &exact),
            Err(SmolyakError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn duplicated_points_are_rank_deficient() {
        let index_set = SmolyakIndexSet::isotropic(2, 1).unwrap();
        let mut grid = build_grid(&index_set);
        grid[(4, 0)] = grid[(3, 0)];
        grid[(4, 1)] = grid[(3, 1)];
        let values = sample(&grid, |x, y| x + y);

        for solver_type in [SolverType::Auto, SolverType::LeastSquares] {
            let params = SmolyakParams::builder().solver_type(solver_type).build();
            let result = fit(grid.as_ref(), &index_set, values.as_ref(), &params);

            assert!(matches!(
                result,
                Err(SmolyakError::RankDeficientSystem {
                    rank: 4,
                    required: 5,
                    ..
                })
            ));
        }
    }

    #[test]
    fn mismatched_inputs_are_rejected() {
        let index_set = SmolyakIndexSet::isotropic(2, 1).unwrap();
        let grid = build_grid(&index_set);
        let values = Mat::<f64>::zeros(3, 1);

        assert!(matches!(
            fit(grid.as_ref(), &index_set, values.as_ref(), &SmolyakParams::default()),
            Err(SmolyakError::ShapeMismatch { expected: 5, found: 3, .. })
        ));

        let coefficients = Mat::<f64>::zeros(4, 1);
        assert!(matches!(
            evaluate(grid.as_ref(), &index_set, coefficients.as_ref(), 1024),
            Err(SmolyakError::ShapeMismatch { expected: 5, found: 4, .. })
        ));
    }
}
