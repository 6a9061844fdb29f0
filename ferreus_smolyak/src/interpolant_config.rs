/////////////////////////////////////////////////////////////////////////////////////////////
//
// Specifies the anisotropic level vector and physical domain of a Smolyak interpolant.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Specifies the anisotropic level vector and physical domain of a Smolyak interpolant.
use crate::{
    error::{SmolyakError, SmolyakResult},
    index_set::validate_level_vector,
};
use serde::{Deserialize, Serialize};

/// A convenience builder for constructing an [`InterpolantSettings`] instance.
///
/// The builder should be called via the [`InterpolantSettings::builder`] method.
///
/// See [`InterpolantSettings`] for details on each field.
#[derive(Debug, Clone)]
pub struct InterpolantSettingsBuilder {
    pub level_vector: Vec<usize>,
    pub extents: Option<Vec<f64>>,
}

impl InterpolantSettingsBuilder {
    fn new(level_vector: Vec<usize>) -> Self {
        Self {
            level_vector,
            extents: None,
        }
    }

    /// Sets the physical domain `[min_0, .., min_{d-1}, max_0, .., max_{d-1}]`.
    pub fn extents(mut self, extents: Vec<f64>) -> Self {
        self.extents = Some(extents);
        self
    }

    /// Builds and returns an instance of [`InterpolantSettings`] from the values
    /// defined in the builder.
    pub fn build(self) -> InterpolantSettings {
        InterpolantSettings {
            level_vector: self.level_vector,
            extents: self.extents,
        }
    }
}

#[doc = include_str!("../docs/interpolant_settings.md")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolantSettings {
    /// Approximation level for each dimension. Its length is the number of
    /// dimensions and its maximum is the level of the isotropic set.
    pub level_vector: Vec<usize>,

    /// Physical hyper-rectangle mapped onto `[-1, 1]^d`, stored as all minimums
    /// followed by all maximums. `None` means the canonical cube itself.
    pub extents: Option<Vec<f64>>,
}

impl InterpolantSettings {
    /// Returns a new [`InterpolantSettingsBuilder`] for the given level vector.
    pub fn builder(level_vector: Vec<usize>) -> InterpolantSettingsBuilder {
        InterpolantSettingsBuilder::new(level_vector)
    }

    /// Number of dimensions.
    pub fn dimensions(&self) -> usize {
        self.level_vector.len()
    }

    /// Level of the isotropic set the anisotropic set is filtered from.
    pub fn mu_max(&self) -> usize {
        self.level_vector.iter().cloned().max().unwrap_or(0)
    }

    /// Physical extents, defaulting to `[-1, 1]^d`.
    pub fn resolved_extents(&self) -> Vec<f64> {
        match &self.extents {
            Some(extents) => extents.clone(),
            None => {
                let d = self.dimensions();
                let mut extents = vec![-1.0; d];
                extents.extend(std::iter::repeat(1.0).take(d));
                extents
            }
        }
    }

    /// Checks the level vector against `max_level` and, when present, that the
    /// extents hold a finite, non-empty interval for every dimension.
    pub fn validate(&self, max_level: usize) -> SmolyakResult<()> {
        let d = self.dimensions();
        validate_level_vector(&self.level_vector, d, max_level)?;

        if let Some(extents) = &self.extents {
            if extents.len() != 2 * d {
                return Err(SmolyakError::ShapeMismatch {
                    what: "extents length",
                    expected: 2 * d,
                    found: extents.len(),
                });
            }

            for dimension in 0..d {
                let (min, max) = (extents[dimension], extents[dimension + d]);
                if !min.is_finite() || !max.is_finite() || min >= max {
                    return Err(SmolyakError::InvalidDomain {
                        dimension,
                        min,
                        max,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_canonical_cube() {
        let settings = InterpolantSettings::builder(vec![3, 1, 2]).build();

        assert_eq!(settings.dimensions(), 3);
        assert_eq!(settings.mu_max(), 3);
        assert_eq!(
            settings.resolved_extents(),
            vec![-1.0, -1.0, -1.0, 1.0, 1.0, 1.0]
        );
        assert!(settings.validate(10).is_ok());
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let empty = InterpolantSettings::builder(vec![]).build();
        assert!(matches!(
            empty.validate(10),
            Err(SmolyakError::InvalidDimension { expected: 0, found: 0 })
        ));

        let too_high = InterpolantSettings::builder(vec![2, 7]).build();
        assert!(matches!(
            too_high.validate(6),
            Err(SmolyakError::InvalidLevel { dimension: 1, level: 7, max_level: 6 })
        ));

        let wrong_length = InterpolantSettings::builder(vec![2, 2])
            .extents(vec![0.0, 1.0, 2.0])
            .build();
        assert!(matches!(
            wrong_length.validate(10),
            Err(SmolyakError::ShapeMismatch { expected: 4, found: 3, .. })
        ));

        let inverted = InterpolantSettings::builder(vec![2, 2])
            .extents(vec![0.0, 5.0, 1.0, 4.0])
            .build();
        assert!(matches!(
            inverted.validate(10),
            Err(SmolyakError::InvalidDomain { dimension: 1, .. })
        ));
    }
}
