/////////////////////////////////////////////////////////////////////////////////////////////
//
// Builds Smolyak sparse grids on the canonical hypercube from an element set.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    config::DEFAULT_MAX_LEVEL,
    error::SmolyakResult,
    index_set::{validate_level_vector, SmolyakIndexSet},
};
use faer::Mat;
use ferreus_cheb::nested_extrema_sequence;

/// Builds the `len × d` matrix of grid points for `index_set`.
///
/// Row `j` is the point of element `j`, so rows follow the element order and
/// line up with the basis columns produced by
/// [`evaluate_polynomial`](crate::polynomial::evaluate_polynomial).
pub fn build_grid(index_set: &SmolyakIndexSet) -> Mat<f64> {
    let nodes = nested_extrema_sequence(index_set.mu_max());

    Mat::from_fn(index_set.len(), index_set.dimensions(), |i, k| {
        nodes[index_set.element(i)[k]]
    })
}

/// Builds the Smolyak grid for `d` dimensions and level `mu_max`.
///
/// When `subset` is given, the isotropic set is first filtered with it as a
/// level vector, giving an anisotropic grid. Every coordinate is a Chebyshev
/// extremum in `[-1, 1]` and no point appears twice.
///
/// # Examples
///
/// ```
/// use ferreus_smolyak::smolyak_grid;
///
/// let grid = smolyak_grid(2, 1, None).unwrap();
/// assert_eq!(grid.nrows(), 5);
/// assert_eq!(grid.ncols(), 2);
/// ```
pub fn smolyak_grid(d: usize, mu_max: usize, subset: Option<&[usize]>) -> SmolyakResult<Mat<f64>> {
    let index_set = resolve_index_set(d, mu_max, subset)?;
    Ok(build_grid(&index_set))
}

/// Builds the isotropic set and applies the optional level vector.
pub(crate) fn resolve_index_set(
    d: usize,
    mu_max: usize,
    subset: Option<&[usize]>,
) -> SmolyakResult<SmolyakIndexSet> {
    let isotropic = SmolyakIndexSet::isotropic(d, mu_max)?;

    match subset {
        Some(level_vector) => {
            validate_level_vector(level_vector, d, DEFAULT_MAX_LEVEL)?;
            isotropic.anisotropic(level_vector)
        }
        None => Ok(isotropic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SmolyakError;
    use equator::assert;
    use std::collections::HashSet;

    fn row_keys(grid: &Mat<f64>) -> HashSet<Vec<u64>> {
        (0..grid.nrows())
            .map(|i| (0..grid.ncols()).map(|k| grid[(i, k)].to_bits()).collect())
            .collect()
    }

    #[test]
    fn two_dimensional_level_one_is_a_cross() {
        let grid = smolyak_grid(2, 1, None).unwrap();
        let points: Vec<(f64, f64)> = (0..grid.nrows())
            .map(|i| (grid[(i, 0)], grid[(i, 1)]))
            .collect();

        assert!(
            points == vec![(0.0, 0.0), (0.0, -1.0), (0.0, 1.0), (-1.0, 0.0), (1.0, 0.0)]
        );
    }

    #[test]
    fn grid_points_are_distinct_and_canonical() {
        for (d, mu) in [(1, 4), (2, 3), (3, 3), (4, 2)] {
            let grid = smolyak_grid(d, mu, None).unwrap();

            assert!(row_keys(&grid).len() == grid.nrows());
            for i in 0..grid.nrows() {
                for k in 0..d {
                    assert!(grid[(i, k)].abs() <= 1.0);
                }
            }
        }
    }

    #[test]
    fn grid_size_equals_index_set_size() {
        let index_set = SmolyakIndexSet::isotropic(3, 2)
            .unwrap()
            .anisotropic(&[2, 1, 2])
            .unwrap();
        let grid = build_grid(&index_set);

        assert!(grid.nrows() == index_set.len());
        assert!(grid.ncols() == 3);
    }

    #[test]
    fn anisotropic_grid_respects_level_vector() {
        // Dimension 1 capped at level 1 only uses {0, -1, 1}.
        let grid = smolyak_grid(2, 3, Some(&[3, 1])).unwrap();
        for i in 0..grid.nrows() {
            let y = grid[(i, 1)];
            assert!(y == 0.0 || y == -1.0 || y == 1.0);
        }

        let isotropic = smolyak_grid(2, 3, None).unwrap();
        assert!(grid.nrows() < isotropic.nrows());
    }

    #[test]
    fn invalid_subset_is_rejected() {
        assert_eq!(
            smolyak_grid(2, 2, Some(&[1])).unwrap_err(),
            SmolyakError::InvalidDimension {
                expected: 2,
                found: 1
            }
        );
    }
}
