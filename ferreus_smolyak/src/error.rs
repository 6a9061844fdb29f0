/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the error type returned by index-set, grid, basis and solver operations.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use ferreus_cheb::linalg::DecompositionError;
use std::{error::Error, fmt};

pub type SmolyakResult<T> = std::result::Result<T, SmolyakError>;

/// Errors raised while building or solving a Smolyak interpolation problem.
///
/// Every failing call returns one of these and produces no partial output.
/// Points outside the canonical domain are not an error; they are reported
/// through [`ProgressMsg::DomainOutOfRange`](crate::progress::ProgressMsg).
#[derive(Debug, Clone, PartialEq)]
pub enum SmolyakError {
    /// Zero dimensions were requested, or an input's dimension count does
    /// not match the index set.
    InvalidDimension { expected: usize, found: usize },

    /// A level exceeds the configured maximum level.
    InvalidLevel {
        dimension: usize,
        level: usize,
        max_level: usize,
    },

    /// The basis matrix does not have full column rank at the requested tolerance.
    RankDeficientSystem {
        rank: usize,
        required: usize,
        tolerance: f64,
    },

    /// Two inputs disagree on a row or column count.
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// An axis of the physical domain is empty or not finite.
    InvalidDomain { dimension: usize, min: f64, max: f64 },

    /// Evaluation was requested before coefficients were solved.
    NotFitted,

    /// The underlying matrix decomposition failed.
    Decomposition(DecompositionError),
}

impl fmt::Display for SmolyakError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmolyakError::InvalidDimension { expected, found } => {
                if *expected == 0 {
                    write!(f, "at least one dimension is required, got {}", found)
                } else {
                    write!(f, "expected {} dimensions, got {}", expected, found)
                }
            }
            SmolyakError::InvalidLevel {
                dimension,
                level,
                max_level,
            } => write!(
                f,
                "level {} in dimension {} exceeds the maximum level {}",
                level, dimension, max_level
            ),
            SmolyakError::RankDeficientSystem {
                rank,
                required,
                tolerance,
            } => write!(
                f,
                "Smolyak basis matrix has rank {} but {} basis functions are required \
                 (relative tolerance {:e})",
                rank, required, tolerance
            ),
            SmolyakError::ShapeMismatch {
                what,
                expected,
                found,
            } => write!(f, "{}: expected {}, found {}", what, expected, found),
            SmolyakError::InvalidDomain {
                dimension,
                min,
                max,
            } => write!(
                f,
                "invalid extents [{}, {}] in dimension {}",
                min, max, dimension
            ),
            SmolyakError::NotFitted => {
                write!(f, "interpolant has no coefficients; call a fit method first")
            }
            SmolyakError::Decomposition(err) => write!(f, "{}", err),
        }
    }
}

impl Error for SmolyakError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SmolyakError::Decomposition(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DecompositionError> for SmolyakError {
    fn from(value: DecompositionError) -> Self {
        SmolyakError::Decomposition(value)
    }
}
