/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API and high-level documentation for anisotropic Smolyak interpolation.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Anisotropic Smolyak sparse-grid interpolation.
//!
//! A full tensor-product Chebyshev grid with `m` nodes per axis holds `m^d`
//! points, which is out of reach beyond a handful of dimensions. The Smolyak
//! construction keeps only the combinations of one-dimensional node sets whose
//! levels add up to at most `mu`, so the number of points grows polynomially
//! with the dimension instead of exponentially.
//!
//! This crate follows the disjoint-set formulation of `1`: every grid point is
//! paired with exactly one tensor-product Chebyshev polynomial, which makes the
//! interpolation system square and well conditioned. Each dimension can be
//! given its own level, concentrating points along the axes where the target
//! function varies most.
//!
//! # Features
//! - Isotropic and anisotropic element sets with a fixed, documented ordering
//! - Sparse grids on nested Chebyshev extrema
//! - Basis evaluation at arbitrary points, in parallel for large batches
//! - Exact (LU) and least-squares (SVD) solves with an explicit rank check
//! - Physical domains mapped onto `[-1, 1]^d`
//! - JSON model persistence and progress reporting
//! - Built on [`faer`](https://docs.rs/faer/latest/faer/) for linear algebra
//!
//! # Examples
//!
//! ```
//! use ferreus_smolyak::{
//!     generate_random_points, InterpolantSettings, SmolyakInterpolator, SmolyakTestFunctions,
//! };
//!
//! // exp(x1 + x2 / 2) varies faster along x1, so give x1 the higher level.
//! let settings = InterpolantSettings::builder(vec![5, 3]).build();
//! let mut interpolator = SmolyakInterpolator::builder(settings).build()?;
//!
//! // Sample the test function at the grid and solve for coefficients.
//! let values = SmolyakTestFunctions::exponential_sum(interpolator.grid_points().as_ref());
//! let report = interpolator.fit_values(&values)?;
//! assert_eq!(report.rank, interpolator.num_points());
//!
//! // Evaluate anywhere in the domain.
//! let targets = generate_random_points(200, 2, Some(42));
//! let predicted = interpolator.evaluate(&targets)?;
//! let exact = SmolyakTestFunctions::exponential_sum(targets.as_ref());
//!
//! let max_err = (0..targets.nrows())
//!     .map(|i| (predicted[(i, 0)] - exact[(i, 0)]).abs())
//!     .fold(0.0, f64::max);
//! assert!(max_err < 1e-4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The lower-level pipeline is also available as free functions:
//!
//! ```
//! use ferreus_smolyak::{
//!     smolyak_anisotropic_index_set, smolyak_isotropic_index_set, smolyak_polynomial_basis,
//!     smolyak_grid,
//! };
//!
//! let isotropic = smolyak_isotropic_index_set(2, 2)?;
//! let anisotropic = smolyak_anisotropic_index_set(&isotropic, &[2, 1])?;
//!
//! let grid = smolyak_grid(2, 2, Some(&[2, 1]))?;
//! let basis = smolyak_polynomial_basis(grid.as_ref(), 2, 2, Some(&[2, 1]))?;
//!
//! assert_eq!(isotropic.len(), 13);
//! assert_eq!(grid.nrows(), anisotropic.len());
//! assert_eq!(basis.ncols(), anisotropic.len());
//! # Ok::<(), ferreus_smolyak::SmolyakError>(())
//! ```
//!
//! # References
//! 1.  K. L. Judd, L. Maliar, S. Maliar, R. Valero. Smolyak method for solving dynamic
//!     economic models: Lagrange interpolation, anisotropic grid and adaptive domain.
//!     Journal of Economic Dynamics and Control 44 (2014) 92-123.
//! 2.  S. A. Smolyak. Quadrature and interpolation formulas for tensor products of
//!     certain classes of functions. Soviet Math. Dokl. 4 (1963) 240-243.
pub mod interpolant_config;

mod common;

mod error;

mod grid;

mod index_set;

mod interpolator;

pub mod polynomial;

pub mod progress;

pub mod config;

pub mod solver;

mod smolyak_test_functions;

pub use {
    common::{
        count_out_of_domain, create_evaluation_grid, generate_random_points,
        get_pointarray_extents, point_arrays_to_csv, points_from_canonical, points_to_canonical,
    },
    config::{SmolyakParams, SolverType, DEFAULT_MAX_LEVEL, LEVEL_LIMIT},
    error::{SmolyakError, SmolyakResult},
    grid::{build_grid, smolyak_grid},
    index_set::{smolyak_anisotropic_index_set, smolyak_isotropic_index_set, SmolyakIndexSet},
    interpolant_config::InterpolantSettings,
    interpolator::{ModelIOError, SmolyakInterpolator, SmolyakInterpolatorBuilder},
    polynomial::{evaluate_polynomial, smolyak_polynomial_basis},
    smolyak_test_functions::SmolyakTestFunctions,
    solver::{smolyak_evaluate, smolyak_fit, SolveReport},
};
