/////////////////////////////////////////////////////////////////////////////////////////////
//
// Fits one-dimensional Chebyshev expansions by least squares and evaluates them with Clenshaw.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    basis::{evaluate_chebyshev_polynomials, to_canonical, ChebyshevKind},
    linalg::{self, DecompositionError},
};
use faer::{Mat, MatRef};
use std::fmt;

/// Relative singular value cutoff used when solving for 1-D coefficients.
const RANK_TOLERANCE: f64 = 1e-13;

/// Errors raised while fitting a one-dimensional Chebyshev expansion.
#[derive(Debug, Clone, PartialEq)]
pub enum ChebyshevError {
    /// The sample grid contains no points.
    EmptyGrid,

    /// The abscissae and ordinates have different lengths.
    LengthMismatch { x: usize, y: usize },

    /// Fewer samples than coefficients were supplied.
    Underdetermined {
        num_points: usize,
        num_coefficients: usize,
    },

    /// The fitting interval `[a, b]` is empty or not finite.
    InvalidDomain { a: f64, b: f64 },

    /// The basis matrix does not have full column rank.
    SingularSystem { rank: usize, required: usize },

    /// The underlying matrix decomposition failed.
    Decomposition(DecompositionError),
}

impl fmt::Display for ChebyshevError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChebyshevError::EmptyGrid => write!(f, "cannot fit a Chebyshev expansion to an empty grid"),
            ChebyshevError::LengthMismatch { x, y } => write!(
                f,
                "grid has {} abscissae but {} ordinates",
                x, y
            ),
            ChebyshevError::Underdetermined {
                num_points,
                num_coefficients,
            } => write!(
                f,
                "{} samples cannot determine {} Chebyshev coefficients",
                num_points, num_coefficients
            ),
            ChebyshevError::InvalidDomain { a, b } => {
                write!(f, "invalid fitting interval [{}, {}]", a, b)
            }
            ChebyshevError::SingularSystem { rank, required } => write!(
                f,
                "Chebyshev basis matrix has rank {} but {} coefficients were requested",
                rank, required
            ),
            ChebyshevError::Decomposition(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ChebyshevError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChebyshevError::Decomposition(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DecompositionError> for ChebyshevError {
    fn from(value: DecompositionError) -> Self {
        ChebyshevError::Decomposition(value)
    }
}

/// A fitted one-dimensional Chebyshev expansion
/// `f(x) = sum_k c_k T_k(z)`, with `z` the image of `x` in `[-1, 1]`.
///
/// # Examples
///
/// ```
/// use ferreus_cheb::Chebyshev1D;
///
/// let x_grid: Vec<f64> = (0..21).map(|i| 3.0 * i as f64 / 20.0).collect();
/// let y_grid: Vec<f64> = x_grid.iter().map(|x| x.exp()).collect();
///
/// let expansion = Chebyshev1D::fit(&x_grid, &y_grid, 5).unwrap();
/// let fitted = expansion.evaluate(&x_grid);
///
/// let max_err = y_grid
///     .iter()
///     .zip(fitted.iter())
///     .fold(0.0f64, |acc, (a, b)| acc.max((a - b).abs()));
///
/// assert!(max_err < 1e-2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Chebyshev1D {
    /// Coefficients `c_0..=c_m`.
    pub coefficients: Vec<f64>,

    /// Lower bound of the fitting interval.
    pub a: f64,

    /// Upper bound of the fitting interval.
    pub b: f64,
}

impl Chebyshev1D {
    /// Wraps existing coefficients defined over `[a, b]`.
    pub fn new(coefficients: Vec<f64>, a: f64, b: f64) -> Result<Self, ChebyshevError> {
        check_domain(a, b)?;
        Ok(Self { coefficients, a, b })
    }

    /// Fits a degree `degree` expansion over the extent of `x_grid`.
    pub fn fit(x_grid: &[f64], y_grid: &[f64], degree: usize) -> Result<Self, ChebyshevError> {
        if x_grid.is_empty() {
            return Err(ChebyshevError::EmptyGrid);
        }

        let (a, b) = x_grid
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(*x), hi.max(*x))
            });

        Self::fit_on_interval(x_grid, y_grid, degree, a, b)
    }

    /// Fits a degree `degree` expansion over an explicit interval `[a, b]`.
    ///
    /// Solves exactly when `x_grid.len() == degree + 1` and by least squares
    /// when more samples are supplied.
    pub fn fit_on_interval(
        x_grid: &[f64],
        y_grid: &[f64],
        degree: usize,
        a: f64,
        b: f64,
    ) -> Result<Self, ChebyshevError> {
        if x_grid.is_empty() {
            return Err(ChebyshevError::EmptyGrid);
        }

        if x_grid.len() != y_grid.len() {
            return Err(ChebyshevError::LengthMismatch {
                x: x_grid.len(),
                y: y_grid.len(),
            });
        }

        let num_coefficients = degree + 1;

        if x_grid.len() < num_coefficients {
            return Err(ChebyshevError::Underdetermined {
                num_points: x_grid.len(),
                num_coefficients,
            });
        }

        // A degenerate interval can still carry a constant fit.
        let (a, b) = if degree == 0 && a == b { (a - 1.0, b + 1.0) } else { (a, b) };
        check_domain(a, b)?;

        let basis_matrix = basis_matrix(x_grid, degree, a, b);
        let rhs = MatRef::from_column_major_slice(y_grid, y_grid.len(), 1);

        let coefficients = solve_coefficients(basis_matrix.as_ref(), rhs)?;

        Ok(Self {
            coefficients: coefficients.col(0).iter().cloned().collect(),
            a,
            b,
        })
    }

    /// Polynomial degree `m` of the expansion.
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluates the expansion at a single point.
    #[inline]
    pub fn evaluate_scalar(&self, x: f64) -> f64 {
        clenshaw(&self.coefficients, to_canonical(x, self.a, self.b))
    }

    /// Evaluates the expansion at every point of `x_query`.
    pub fn evaluate(&self, x_query: &[f64]) -> Vec<f64> {
        x_query.iter().map(|x| self.evaluate_scalar(*x)).collect()
    }
}

fn check_domain(a: f64, b: f64) -> Result<(), ChebyshevError> {
    if !(a.is_finite() && b.is_finite()) || b <= a {
        return Err(ChebyshevError::InvalidDomain { a, b });
    }
    Ok(())
}

/// Builds the `n × (degree + 1)` matrix whose column `k` is `T_k` at the
/// grid mapped from `[a, b]` onto `[-1, 1]`.
pub fn basis_matrix(x_grid: &[f64], degree: usize, a: f64, b: f64) -> Mat<f64> {
    let nodes: Vec<f64> = x_grid.iter().map(|x| to_canonical(*x, a, b)).collect();
    evaluate_chebyshev_polynomials(ChebyshevKind::First, degree + 1, &nodes)
}

fn solve_coefficients(basis: MatRef<f64>, rhs: MatRef<f64>) -> Result<Mat<f64>, ChebyshevError> {
    let lstsq = linalg::svd_least_squares(basis, rhs, RANK_TOLERANCE)?;

    if lstsq.rank < basis.ncols() {
        return Err(ChebyshevError::SingularSystem {
            rank: lstsq.rank,
            required: basis.ncols(),
        });
    }

    if basis.nrows() == basis.ncols() {
        return Ok(linalg::lu_solve(basis, rhs));
    }

    Ok(lstsq.solution)
}

/// Evaluates `sum_j c_j T_j(x)` with the backward (Clenshaw) recurrence:
///
///  b_0 = c_j + 2x b_1 - b_2, for j = m down to 0 \n
///  f(x) = (c_0 + b_0 - b_2) / 2
pub fn clenshaw(coefficients: &[f64], x: f64) -> f64 {
    let Some(c0) = coefficients.first() else {
        return 0.0;
    };

    let two_x = 2.0 * x;
    let mut b0 = 0.0;
    let mut b1 = 0.0;
    let mut b2 = 0.0;

    for c in coefficients.iter().rev() {
        b2 = b1;
        b1 = b0;
        b0 = c + two_x * b1 - b2;
    }

    0.5 * (c0 + b0 - b2)
}

/// Fits `y_grid` with a degree `degree` Chebyshev expansion over the extent of `x_grid`.
///
/// The coefficients `c_0..=c_m` are defined in the canonical variable, so the
/// returned expansion carries the fitting interval alongside them.
pub fn fit_chebyshev_1d(
    x_grid: &[f64],
    y_grid: &[f64],
    degree: usize,
) -> Result<Chebyshev1D, ChebyshevError> {
    Chebyshev1D::fit(x_grid, y_grid, degree)
}

/// Evaluates a fitted expansion at every point of `x_query`, mapping each
/// point onto `[-1, 1]` through the expansion's interval.
pub fn eval_chebyshev_1d(expansion: &Chebyshev1D, x_query: &[f64]) -> Vec<f64> {
    expansion.evaluate(x_query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::chebyshev_t;

    fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect()
    }

    fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b.iter())
            .fold(0.0, |acc, (x, y)| acc.max((x - y).abs()))
    }

    #[test]
    fn exp_round_trip_on_21_points() {
        let x_grid = linspace(0.0, 3.0, 21);
        let y_grid: Vec<f64> = x_grid.iter().map(|x| x.exp()).collect();

        let mut previous_err = f64::INFINITY;

        for degree in [5, 7, 9] {
            let expansion = Chebyshev1D::fit(&x_grid, &y_grid, degree).unwrap();
            assert_eq!(expansion.degree(), degree);

            let err = max_abs_diff(&expansion.evaluate(&x_grid), &y_grid);
            assert!(err < 1e-2, "degree {} error {}", degree, err);
            assert!(err < previous_err);
            previous_err = err;
        }
    }

    #[test]
    fn clenshaw_matches_direct_sum() {
        let coefficients = [0.3, -1.2, 0.5, 2.0, -0.25, 0.125];
        let degrees: Vec<usize> = (0..coefficients.len()).collect();

        for x in linspace(-1.0, 1.0, 13) {
            let basis = chebyshev_t(&degrees, &[x]);
            let direct: f64 = (0..coefficients.len())
                .map(|k| coefficients[k] * basis[(0, k)])
                .sum();
            assert!((clenshaw(&coefficients, x) - direct).abs() < 1e-13);
        }
    }

    #[test]
    fn exact_solve_interpolates_samples() {
        let x_grid = linspace(-2.0, 2.0, 6);
        let y_grid: Vec<f64> = x_grid.iter().map(|x| (x * 1.3).sin()).collect();

        let expansion = Chebyshev1D::fit(&x_grid, &y_grid, 5).unwrap();
        assert!(max_abs_diff(&expansion.evaluate(&x_grid), &y_grid) < 1e-12);
    }

    #[test]
    fn polynomial_is_recovered_exactly() {
        // 4x^3 - 3x = T_3(x) on [-1, 1].
        let x_grid = linspace(-1.0, 1.0, 15);
        let y_grid: Vec<f64> = x_grid.iter().map(|x| 4.0 * x * x * x - 3.0 * x).collect();

        let expansion = fit_chebyshev_1d(&x_grid, &y_grid, 4).unwrap();
        let expected = [0.0, 0.0, 0.0, 1.0, 0.0];
        assert!(max_abs_diff(&expansion.coefficients, &expected) < 1e-12);

        let query = linspace(-1.0, 1.0, 7);
        let values = eval_chebyshev_1d(&expansion, &query);
        let truth: Vec<f64> = query.iter().map(|x| 4.0 * x * x * x - 3.0 * x).collect();
        assert!(max_abs_diff(&values, &truth) < 1e-12);
    }

    #[test]
    fn free_functions_round_trip_off_canonical_interval() {
        let x_grid = linspace(0.0, 3.0, 21);
        let y_grid: Vec<f64> = x_grid.iter().map(|x| x.exp()).collect();

        let expansion = fit_chebyshev_1d(&x_grid, &y_grid, 5).unwrap();
        assert_eq!((expansion.a, expansion.b), (0.0, 3.0));

        let err = max_abs_diff(&eval_chebyshev_1d(&expansion, &x_grid), &y_grid);
        assert!(err < 1e-2, "max error {}", err);

        // Off-grid points inside the interval.
        let query = linspace(0.05, 2.95, 30);
        let truth: Vec<f64> = query.iter().map(|x| x.exp()).collect();
        assert!(max_abs_diff(&eval_chebyshev_1d(&expansion, &query), &truth) < 1e-2);
    }

    #[test]
    fn degree_zero_is_constant_fit() {
        let x_grid = [0.0, 1.0, 2.0, 3.0];
        let y_grid = [1.0, 2.0, 3.0, 6.0];

        let expansion = Chebyshev1D::fit(&x_grid, &y_grid, 0).unwrap();
        assert!((expansion.coefficients[0] - 3.0).abs() < 1e-12);
        assert!((expansion.evaluate_scalar(10.0) - 3.0).abs() < 1e-12);

        let single = Chebyshev1D::fit(&[2.0], &[4.5], 0).unwrap();
        assert!((single.evaluate_scalar(2.0) - 4.5).abs() < 1e-12);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert_eq!(Chebyshev1D::fit(&[], &[], 2), Err(ChebyshevError::EmptyGrid));

        assert_eq!(
            Chebyshev1D::fit(&[0.0, 1.0], &[0.0], 1),
            Err(ChebyshevError::LengthMismatch { x: 2, y: 1 })
        );

        assert_eq!(
            Chebyshev1D::fit(&[0.0, 1.0], &[0.0, 1.0], 3),
            Err(ChebyshevError::Underdetermined {
                num_points: 2,
                num_coefficients: 4
            })
        );

        assert!(matches!(
            Chebyshev1D::fit_on_interval(&[0.0, 1.0], &[0.0, 1.0], 1, 2.0, 2.0),
            Err(ChebyshevError::InvalidDomain { .. })
        ));

        // Repeated abscissae cannot determine a line.
        assert!(matches!(
            Chebyshev1D::fit_on_interval(&[0.5, 0.5, 0.5], &[0.0, 1.0, 2.0], 1, 0.0, 1.0),
            Err(ChebyshevError::SingularSystem { rank: 1, required: 2 })
        ));
    }
}
