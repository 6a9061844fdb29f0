/////////////////////////////////////////////////////////////////////////////////////////////
//
// Generates isotropic Smolyak element sets and filters them to anisotropic subsets.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

// # References
// [1] K. L. Judd, L. Maliar, S. Maliar, R. Valero, Smolyak method for solving dynamic economic
//     models: Lagrange interpolation, anisotropic grid and adaptive domain, Journal of Economic
//     Dynamics and Control 44 (2014) 92-123.

use crate::{
    config::{DEFAULT_MAX_LEVEL, LEVEL_LIMIT},
    error::{SmolyakError, SmolyakResult},
};
use ferreus_cheb::level_of_node;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Range of positions in the nested node sequence introduced at `level`.
///
/// The ranges for successive levels are disjoint and together cover
/// `0..num_nested_nodes(level)`:
///  level 0: [0] \n
///  level 1: [1, 2] \n
///  level l: [2^(l-1) + 1, 2^l]
#[inline]
pub(crate) fn new_nodes_at_level(level: usize) -> std::ops::Range<usize> {
    match level {
        0 => 0..1,
        1 => 1..3,
        _ => ((1usize << (level - 1)) + 1)..((1usize << level) + 1),
    }
}

/// All level tuples of length `dimensions` whose entries sum to exactly `total`,
/// in lexicographic order.
fn level_tuples_with_sum(dimensions: usize, total: usize) -> Vec<Vec<usize>> {
    if dimensions == 1 {
        return vec![vec![total]];
    }

    (0..=total)
        .flat_map(|first| {
            level_tuples_with_sum(dimensions - 1, total - first)
                .into_iter()
                .map(move |mut rest| {
                    rest.insert(0, first);
                    rest
                })
        })
        .collect()
}

/// An ordered set of Smolyak elements.
///
/// Each element is a `d`-tuple of positions in the nested Chebyshev extrema
/// sequence (see [`ferreus_cheb::nested_extrema_sequence`]). Element `j`
/// identifies both the `j`-th grid point, whose `k`-th coordinate is the node
/// at position `element[k]`, and the `j`-th basis function, the product of
/// `T_{element[k]}(x_k)` over the dimensions.
///
/// ### Invariants
/// - Elements are distinct.
/// - The order is fixed when the isotropic set is generated. Anisotropic
///   subsets keep the relative order, and the grid rows and basis columns
///   follow it one-to-one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndexSetRecord")]
pub struct SmolyakIndexSet {
    dimensions: usize,
    mu_max: usize,
    /// Row-major `len × dimensions` node positions.
    elements: Vec<usize>,
}

/// Unchecked form of [`SmolyakIndexSet`] as read from a saved model.
#[derive(Deserialize)]
struct IndexSetRecord {
    dimensions: usize,
    mu_max: usize,
    elements: Vec<usize>,
}

impl TryFrom<IndexSetRecord> for SmolyakIndexSet {
    type Error = SmolyakError;

    fn try_from(record: IndexSetRecord) -> SmolyakResult<Self> {
        let IndexSetRecord {
            dimensions,
            mu_max,
            elements,
        } = record;

        if dimensions == 0 {
            return Err(SmolyakError::InvalidDimension {
                expected: 0,
                found: 0,
            });
        }

        if elements.len() % dimensions != 0 {
            return Err(SmolyakError::ShapeMismatch {
                what: "index set elements",
                expected: elements.len() - elements.len() % dimensions,
                found: elements.len(),
            });
        }

        if mu_max > LEVEL_LIMIT {
            return Err(SmolyakError::InvalidLevel {
                dimension: 0,
                level: mu_max,
                max_level: LEVEL_LIMIT,
            });
        }

        if let Some(position) = elements
            .iter()
            .position(|node| level_of_node(*node) > mu_max)
        {
            return Err(SmolyakError::InvalidLevel {
                dimension: position % dimensions,
                level: level_of_node(elements[position]),
                max_level: mu_max,
            });
        }

        Ok(Self {
            dimensions,
            mu_max,
            elements,
        })
    }
}

impl SmolyakIndexSet {
    /// Generates the isotropic element set for `dimensions` and level of
    /// approximation `mu_max`, accepting levels up to [`DEFAULT_MAX_LEVEL`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ferreus_smolyak::SmolyakIndexSet;
    ///
    /// assert_eq!(SmolyakIndexSet::isotropic(2, 0).unwrap().len(), 1);
    /// assert_eq!(SmolyakIndexSet::isotropic(2, 1).unwrap().len(), 5);
    /// assert_eq!(SmolyakIndexSet::isotropic(2, 2).unwrap().len(), 13);
    /// ```
    pub fn isotropic(dimensions: usize, mu_max: usize) -> SmolyakResult<Self> {
        Self::isotropic_with_max_level(dimensions, mu_max, DEFAULT_MAX_LEVEL)
    }

    /// Generates the isotropic element set, rejecting `mu_max > max_level`.
    ///
    /// Levels are 0-based: level 0 holds the single centre node and level
    /// `l >= 1` the `2^l + 1` extrema of `T_{2^l}`. The nodes new to each level
    /// form disjoint sets, and the admissible combinations are the level
    /// tuples `(l_1, ..., l_d)` with
    ///
    /// ```text
    ///   l_1 + l_2 + ... + l_d <= mu_max
    /// ```
    ///
    /// which is the rule `d <= |i| <= d + mu` of [1] with 1-based levels. Every
    /// admissible tuple contributes the cross-combination of its new-node
    /// ranges, so no element is produced twice.
    ///
    /// Elements are ordered by total level, then by level tuple in
    /// lexicographic order, then by node position with the last dimension
    /// varying fastest.
    pub fn isotropic_with_max_level(
        dimensions: usize,
        mu_max: usize,
        max_level: usize,
    ) -> SmolyakResult<Self> {
        if dimensions == 0 {
            return Err(SmolyakError::InvalidDimension {
                expected: 0,
                found: 0,
            });
        }

        let max_level = max_level.min(LEVEL_LIMIT);
        if mu_max > max_level {
            return Err(SmolyakError::InvalidLevel {
                dimension: 0,
                level: mu_max,
                max_level,
            });
        }

        let mut elements: Vec<usize> = Vec::new();

        for total in 0..=mu_max {
            for levels in level_tuples_with_sum(dimensions, total) {
                levels
                    .iter()
                    .map(|level| new_nodes_at_level(*level))
                    .multi_cartesian_product()
                    .for_each(|element| elements.extend(element));
            }
        }

        Ok(Self {
            dimensions,
            mu_max,
            elements,
        })
    }

    /// Keeps the elements whose level in every dimension `k` is at most
    /// `level_vector[k]`, preserving their relative order.
    ///
    /// The result depends only on `self` and `level_vector`. Filtering an
    /// already filtered set with the same level vector returns it unchanged.
    pub fn anisotropic(&self, level_vector: &[usize]) -> SmolyakResult<Self> {
        self.anisotropic_with_max_level(level_vector, DEFAULT_MAX_LEVEL)
    }

    /// [`SmolyakIndexSet::anisotropic`] with an explicit maximum level.
    pub fn anisotropic_with_max_level(
        &self,
        level_vector: &[usize],
        max_level: usize,
    ) -> SmolyakResult<Self> {
        validate_level_vector(level_vector, self.dimensions, max_level)?;

        let elements: Vec<usize> = self
            .iter()
            .filter(|element| {
                element
                    .iter()
                    .zip(level_vector.iter())
                    .all(|(node, cap)| level_of_node(*node) <= *cap)
            })
            .flat_map(|element| element.iter().cloned())
            .collect();

        Ok(Self {
            dimensions: self.dimensions,
            mu_max: self.mu_max,
            elements,
        })
    }

    /// Number of dimensions `d`.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Level of approximation the isotropic set was generated with.
    pub fn mu_max(&self) -> usize {
        self.mu_max
    }

    /// Number of elements, equal to both the grid size and the basis size.
    pub fn len(&self) -> usize {
        self.elements.len() / self.dimensions
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Node positions of element `idx`.
    pub fn element(&self, idx: usize) -> &[usize] {
        &self.elements[idx * self.dimensions..(idx + 1) * self.dimensions]
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.elements.chunks_exact(self.dimensions)
    }

    /// Per-dimension levels of element `idx`.
    pub fn levels(&self, idx: usize) -> Vec<usize> {
        self.element(idx).iter().map(|node| level_of_node(*node)).collect()
    }

    /// Largest node position used in each dimension. This is also the
    /// highest Chebyshev degree needed per dimension.
    pub fn max_positions(&self) -> Vec<usize> {
        let mut max_positions = vec![0; self.dimensions];
        self.iter().for_each(|element| {
            element
                .iter()
                .zip(max_positions.iter_mut())
                .for_each(|(node, max)| *max = (*max).max(*node));
        });
        max_positions
    }
}

/// Checks a level vector's length against `dimensions` and each entry
/// against `max_level`.
pub(crate) fn validate_level_vector(
    level_vector: &[usize],
    dimensions: usize,
    max_level: usize,
) -> SmolyakResult<()> {
    if level_vector.len() != dimensions || dimensions == 0 {
        return Err(SmolyakError::InvalidDimension {
            expected: dimensions,
            found: level_vector.len(),
        });
    }

    let max_level = max_level.min(LEVEL_LIMIT);
    if let Some((dimension, level)) = level_vector
        .iter()
        .enumerate()
        .find(|(_, level)| **level > max_level)
    {
        return Err(SmolyakError::InvalidLevel {
            dimension,
            level: *level,
            max_level,
        });
    }

    Ok(())
}

/// Generates the isotropic element set for `d` dimensions and level `mu_max`.
pub fn smolyak_isotropic_index_set(d: usize, mu_max: usize) -> SmolyakResult<SmolyakIndexSet> {
    SmolyakIndexSet::isotropic(d, mu_max)
}

/// Filters `index_set` to the elements allowed by `level_vector`.
pub fn smolyak_anisotropic_index_set(
    index_set: &SmolyakIndexSet,
    level_vector: &[usize],
) -> SmolyakResult<SmolyakIndexSet> {
    index_set.anisotropic(level_vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferreus_cheb::num_nested_nodes;
    use std::collections::HashSet;

    /// Closed form of the isotropic set size: sum over admissible level
    /// tuples of the product of new-node counts.
    fn expected_size(dimensions: usize, mu_max: usize) -> usize {
        (0..=mu_max)
            .flat_map(|total| level_tuples_with_sum(dimensions, total))
            .map(|levels| levels.iter().map(|l| new_nodes_at_level(*l).len()).product::<usize>())
            .sum()
    }

    #[test]
    fn known_two_dimensional_sizes() {
        assert_eq!(SmolyakIndexSet::isotropic(2, 0).unwrap().len(), 1);
        assert_eq!(SmolyakIndexSet::isotropic(2, 1).unwrap().len(), 5);
        assert_eq!(SmolyakIndexSet::isotropic(2, 2).unwrap().len(), 13);
        assert_eq!(SmolyakIndexSet::isotropic(2, 3).unwrap().len(), 29);
    }

    #[test]
    fn known_three_dimensional_sizes() {
        assert_eq!(SmolyakIndexSet::isotropic(3, 1).unwrap().len(), 7);
        assert_eq!(SmolyakIndexSet::isotropic(3, 2).unwrap().len(), 25);
    }

    #[test]
    fn one_dimension_is_the_nested_sequence() {
        for mu in 0..6 {
            let set = SmolyakIndexSet::isotropic(1, mu).unwrap();
            assert_eq!(set.len(), num_nested_nodes(mu));

            let positions: Vec<usize> = set.iter().map(|e| e[0]).collect();
            assert_eq!(positions, (0..num_nested_nodes(mu)).collect::<Vec<_>>());
        }
    }

    #[test]
    fn size_matches_closed_form_and_is_sparse() {
        for d in 1..=5 {
            for mu in 0..=3 {
                let set = SmolyakIndexSet::isotropic(d, mu).unwrap();
                assert_eq!(set.len(), expected_size(d, mu));

                if d >= 3 && mu >= 1 {
                    assert!(set.len() < (2 * mu + 1).pow(d as u32));
                }
            }
        }
    }

    #[test]
    fn ten_dimensions_stay_far_below_tensor_product() {
        let set = SmolyakIndexSet::isotropic(10, 3).unwrap();
        let tensor_product = 5usize.pow(10);

        assert_eq!(set.len(), 1581);
        assert!(set.len() * 100 < tensor_product);
    }

    #[test]
    fn elements_are_distinct_and_admissible() {
        let set = SmolyakIndexSet::isotropic(4, 3).unwrap();
        let unique: HashSet<&[usize]> = set.iter().collect();
        assert_eq!(unique.len(), set.len());

        for idx in 0..set.len() {
            assert!(set.levels(idx).iter().sum::<usize>() <= 3);
        }
    }

    #[test]
    fn isotropic_ordering_starts_at_the_centre() {
        let set = SmolyakIndexSet::isotropic(2, 1).unwrap();
        let elements: Vec<Vec<usize>> = set.iter().map(|e| e.to_vec()).collect();
        assert_eq!(
            elements,
            vec![vec![0, 0], vec![0, 1], vec![0, 2], vec![1, 0], vec![2, 0]]
        );
    }

    #[test]
    fn anisotropic_filter_caps_levels_and_preserves_order() {
        let iso = SmolyakIndexSet::isotropic(2, 3).unwrap();
        let aniso = iso.anisotropic(&[3, 1]).unwrap();

        assert!(aniso.len() < iso.len());
        assert_eq!(aniso.mu_max(), 3);

        for idx in 0..aniso.len() {
            let levels = aniso.levels(idx);
            assert!(levels[0] <= 3 && levels[1] <= 1);
        }

        // Relative order is a subsequence of the isotropic order.
        let iso_positions: Vec<usize> = aniso
            .iter()
            .map(|e| iso.iter().position(|f| f == e).unwrap())
            .collect();
        assert!(iso_positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn anisotropic_filter_is_idempotent() {
        let iso = SmolyakIndexSet::isotropic(3, 4).unwrap();
        let level_vector = [4, 2, 1];

        let once = iso.anisotropic(&level_vector).unwrap();
        let twice = once.anisotropic(&level_vector).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn full_level_vector_keeps_everything() {
        let iso = SmolyakIndexSet::isotropic(2, 5).unwrap();
        let aniso = iso.anisotropic(&[5, 5]).unwrap();
        assert_eq!(iso, aniso);
        assert_eq!(aniso.len(), 145);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(matches!(
            SmolyakIndexSet::isotropic(0, 2),
            Err(SmolyakError::InvalidDimension { .. })
        ));

        assert!(matches!(
            SmolyakIndexSet::isotropic(2, 11),
            Err(SmolyakError::InvalidLevel { level: 11, max_level: 10, .. })
        ));

        let iso = SmolyakIndexSet::isotropic(2, 2).unwrap();

        assert_eq!(
            iso.anisotropic(&[2, 2, 2]),
            Err(SmolyakError::InvalidDimension {
                expected: 2,
                found: 3
            })
        );

        assert_eq!(
            iso.anisotropic(&[2, 12]),
            Err(SmolyakError::InvalidLevel {
                dimension: 1,
                level: 12,
                max_level: 10
            })
        );
    }

    #[test]
    fn levels_beyond_the_hard_limit_are_rejected() {
        assert_eq!(
            SmolyakIndexSet::isotropic_with_max_level(1, 64, usize::MAX),
            Err(SmolyakError::InvalidLevel {
                dimension: 0,
                level: 64,
                max_level: LEVEL_LIMIT
            })
        );

        let iso = SmolyakIndexSet::isotropic(2, 1).unwrap();
        assert_eq!(
            iso.anisotropic_with_max_level(&[1, 70], usize::MAX),
            Err(SmolyakError::InvalidLevel {
                dimension: 1,
                level: 70,
                max_level: LEVEL_LIMIT
            })
        );
    }

    #[test]
    fn deserialization_checks_the_element_layout() {
        let set = SmolyakIndexSet::isotropic(2, 2).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        let restored: SmolyakIndexSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, set);

        for corrupted in [
            r#"{"dimensions":0,"mu_max":0,"elements":[]}"#,
            r#"{"dimensions":2,"mu_max":1,"elements":[0,0,1]}"#,
            r#"{"dimensions":1,"mu_max":1,"elements":[0,1,2,3]}"#,
            r#"{"dimensions":1,"mu_max":99,"elements":[0]}"#,
        ] {
            assert!(serde_json::from_str::<SmolyakIndexSet>(corrupted).is_err());
        }
    }
}
