/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides benchmark test functions for validating and demonstrating Smolyak interpolation quality.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Benchmark functions on the canonical cube `[-1, 1]^d`.
//!
//! # References
//! 1. K. L. Judd, L. Maliar, S. Maliar, R. Valero (2014). Smolyak method for solving
//!    dynamic economic models. Journal of Economic Dynamics and Control 44, 92-123.
//! 2. R. Franke (1979). A critical comparison of some methods for interpolation of
//!    scattered data. Naval Postgraduate School, NPS-53-79-003.
use faer::{Mat, MatRef};

/// Struct that implements various test functions to generate values for testing
/// Smolyak interpolation.
pub struct SmolyakTestFunctions;

impl SmolyakTestFunctions {
    /// Anisotropic Gaussian ridge used in [1]:
    /// <div>
    /// $$
    /// F(x_1, x_2) = 2 x_1 \exp\left(-4 x_1^2 - 16 x_2^2\right)
    /// $$
    /// </div>
    ///
    /// The function varies four times faster along `x_2` than along `x_1`.
    pub fn gaussian_ridge_2d(points: MatRef<f64>) -> Mat<f64> {
        assert_eq!(points.ncols(), 2);

        Mat::from_fn(points.nrows(), 1, |i, _| {
            let x1 = points[(i, 0)];
            let x2 = points[(i, 1)];
            2.0 * x1 * (-4.0 * x1 * x1 - 16.0 * x2 * x2).exp()
        })
    }

    /// Smooth separable function in any dimension:
    /// <div>
    /// $$
    /// F(x) = \exp\left(\sum_k \frac{x_k}{k + 1}\right)
    /// $$
    /// </div>
    pub fn exponential_sum(points: MatRef<f64>) -> Mat<f64> {
        Mat::from_fn(points.nrows(), 1, |i, _| {
            points
                .row(i)
                .iter()
                .enumerate()
                .map(|(k, x)| x / (k as f64 + 1.0))
                .sum::<f64>()
                .exp()
        })
    }

    /// Franke's two-dimensional test function [2], with the canonical cube
    /// mapped onto its usual domain `[0, 1]^2`.
    pub fn franke_2d(points: MatRef<f64>) -> Mat<f64> {
        assert_eq!(points.ncols(), 2);

        Mat::from_fn(points.nrows(), 1, |i, _| {
            let nx = 4.5 * (points[(i, 0)] + 1.0);
            let ny = 4.5 * (points[(i, 1)] + 1.0);

            let term1 = 0.75 * (-((nx - 2.0).powi(2) + (ny - 2.0).powi(2)) / 4.0).exp();
            let term2 = 0.75 * (-(nx + 1.0).powi(2) / 49.0 - (ny + 1.0).powi(2) / 10.0).exp();
            let term3 = 0.5 * (-((nx - 7.0).powi(2) + (ny - 3.0).powi(2)) / 4.0).exp();
            let term4 = -0.2 * (-(nx - 4.0).powi(2) - (ny - 7.0).powi(2)).exp();

            term1 + term2 + term3 + term4
        })
    }

    /// Runge's function in one dimension, `1 / (1 + 25 x^2)`.
    ///
    /// Equispaced interpolation of this function diverges, while interpolation
    /// on Chebyshev extrema converges.
    pub fn runge_1d(points: MatRef<f64>) -> Mat<f64> {
        assert_eq!(points.ncols(), 1);

        Mat::from_fn(points.nrows(), 1, |i, _| {
            let x = points[(i, 0)];
            1.0 / (1.0 + 25.0 * x * x)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::mat;

    #[test]
    fn known_values() {
        let points = mat![[0.0, 0.0], [0.5, 0.0f64]];
        let ridge = SmolyakTestFunctions::gaussian_ridge_2d(points.as_ref());
        assert_eq!(ridge[(0, 0)], 0.0);
        assert!((ridge[(1, 0)] - (-1.0f64).exp()).abs() < 1e-15);

        let sum = SmolyakTestFunctions::exponential_sum(points.as_ref());
        assert!((sum[(1, 0)] - 0.5f64.exp()).abs() < 1e-15);

        let runge = SmolyakTestFunctions::runge_1d(mat![[0.2f64]].as_ref());
        assert!((runge[(0, 0)] - 0.5).abs() < 1e-15);
    }
}
