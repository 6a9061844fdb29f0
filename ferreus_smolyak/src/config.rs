/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares configuration types for level limits, linear solves, and parallel evaluation.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Declares configuration types for level limits, linear solves, and parallel evaluation.
use serde::{Deserialize, Serialize};

/// Default upper bound on any Smolyak level.
///
/// Level 10 already holds 1025 nodes per axis, and the index set grows
/// quickly with the level in more than one dimension.
pub const DEFAULT_MAX_LEVEL: usize = 10;

/// Hard upper bound on any Smolyak level, whatever `max_level` is set to.
///
/// Node positions at this level still fit in a 32-bit `usize`.
pub const LEVEL_LIMIT: usize = 30;

/// Strategy used to solve for the interpolation coefficients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum SolverType {
    /// LU factorisation. Requires a square basis matrix.
    Exact,

    /// Truncated SVD least squares. Accepts more points than basis functions.
    LeastSquares,

    /// `Exact` for square systems, `LeastSquares` otherwise.
    Auto,
}

impl Default for SolverType {
    fn default() -> Self {
        SolverType::Auto
    }
}

#[doc = include_str!("../docs/params.md")]
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct SmolyakParams {
    /// Largest level accepted in a level vector or as `mu_max`.
    /// Values above [`LEVEL_LIMIT`] are treated as [`LEVEL_LIMIT`].
    pub max_level: usize,

    /// Singular values below `rank_tolerance * sigma_max` count as zero
    /// when checking the basis matrix for full column rank.
    pub rank_tolerance: f64,

    /// Linear solver used when fitting.
    pub solver_type: SolverType,

    /// Number of points at or above which the basis matrix rows are
    /// evaluated in parallel.
    pub parallel_threshold: usize,

    /// Whether to report query points outside the interpolation domain.
    pub warn_out_of_domain: bool,
}

impl Default for SmolyakParams {
    fn default() -> Self {
        SmolyakParams {
            max_level: DEFAULT_MAX_LEVEL,
            rank_tolerance: 1E-10,
            solver_type: SolverType::Auto,
            parallel_threshold: 1024,
            warn_out_of_domain: true,
        }
    }
}

impl SmolyakParams {
    /// Returns a new [`SmolyakParamsBuilder`] populated with defaults.
    pub fn builder() -> SmolyakParamsBuilder {
        SmolyakParamsBuilder::new()
    }
}

/// A convenience builder for constructing a [`SmolyakParams`] instance.
///
/// The builder should be called via the [`SmolyakParams::builder`] method.
///
/// See [`SmolyakParams`] for details on each field.
#[derive(Debug, Clone, Copy)]
pub struct SmolyakParamsBuilder {
    params: SmolyakParams,
}

impl SmolyakParamsBuilder {
    fn new() -> Self {
        Self {
            params: SmolyakParams::default(),
        }
    }

    /// Sets the maximum accepted level, capped at [`LEVEL_LIMIT`].
    pub fn max_level(mut self, max_level: usize) -> Self {
        self.params.max_level = max_level.min(LEVEL_LIMIT);
        self
    }

    /// Sets the relative singular value cutoff for the rank check.
    pub fn rank_tolerance(mut self, rank_tolerance: f64) -> Self {
        self.params.rank_tolerance = rank_tolerance;
        self
    }

    /// Sets the solver type.
    pub fn solver_type(mut self, solver_type: SolverType) -> Self {
        self.params.solver_type = solver_type;
        self
    }

    /// Sets the point count above which basis evaluation runs in parallel.
    pub fn parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.params.parallel_threshold = parallel_threshold;
        self
    }

    /// Enables or disables out-of-domain reporting.
    pub fn warn_out_of_domain(mut self, warn_out_of_domain: bool) -> Self {
        self.params.warn_out_of_domain = warn_out_of_domain;
        self
    }

    /// Builds and returns a [`SmolyakParams`] instance.
    pub fn build(self) -> SmolyakParams {
        self.params
    }
}
