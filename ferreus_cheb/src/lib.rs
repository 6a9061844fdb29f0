/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API for Chebyshev bases and one-dimensional Chebyshev fitting.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Chebyshev polynomial bases
//!
//! Building blocks for polynomial approximation on `[-1, 1]` and the base case
//! of the `ferreus_smolyak` sparse-grid interpolator.
//!
//! # Features:
//! - First and second kind Chebyshev polynomials evaluated by three-term
//!   recurrence, for a single degree or a sequence of degrees at one or many points
//! - Affine maps between an interval `[a, b]` and the canonical interval
//! - Nested Chebyshev extrema, ordered by the level that introduces them
//! - One-dimensional least-squares fitting with Clenshaw evaluation
//!
//! # Example
//!
//! ```
//! use ferreus_cheb::{chebyshev_t, Chebyshev1D};
//!
//! // T_0..T_3 at two points
//! let values = chebyshev_t(&[0, 1, 2, 3], &[-0.5, 0.25]);
//! assert_eq!(values.nrows(), 2);
//! assert_eq!(values.ncols(), 4);
//!
//! // Fit sin(x) on [0, 2] with a degree 8 expansion
//! let x_grid: Vec<f64> = (0..17).map(|i| 2.0 * i as f64 / 16.0).collect();
//! let y_grid: Vec<f64> = x_grid.iter().map(|x| x.sin()).collect();
//!
//! let expansion = Chebyshev1D::fit(&x_grid, &y_grid, 8).unwrap();
//! assert!((expansion.evaluate_scalar(1.0) - 1.0f64.sin()).abs() < 1e-6);
//! ```
//!
//! # References
//!
//! 1. Mason, J. C., & Handscomb, D. C. (2003).
//!    *Chebyshev Polynomials.* Chapman & Hall/CRC.

mod basis;
mod fit;
pub mod linalg;

#[doc(inline)]
pub use {
    basis::{
        chebyshev_extrema, chebyshev_t, chebyshev_t_scalar, chebyshev_trigonometric,
        chebyshev_u, evaluate_chebyshev_polynomials, from_canonical, is_canonical,
        level_of_node, nested_extrema_sequence, num_nested_nodes, to_canonical, ChebyshevKind,
    },
    fit::{basis_matrix, clenshaw, eval_chebyshev_1d, fit_chebyshev_1d, Chebyshev1D, ChebyshevError},
};
