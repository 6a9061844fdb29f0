/////////////////////////////////////////////////////////////////////////////////////////////
//
// Common point-array helpers: random and regular point sets, domain scaling, and CSV export.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::error::{SmolyakError, SmolyakResult};
use csv::Writer;
use faer::{Mat, MatRef};
use ferreus_cheb::{from_canonical, is_canonical, to_canonical};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::path::Path;

/// Generate a matrix of random points in the canonical hypercube.
///
/// # Parameters
/// - `n`: Number of points to generate (rows in the output matrix).
/// - `d`: Number of dimensions per point (columns in the output matrix).
/// - `seed`: Optional random seed.
///   - If `Some(seed)` is provided, the same points are generated on every run.
///   - If `None`, the generator is seeded from the operating system's randomness source.
///
/// # Returns
/// A `Mat<f64>` of shape `(n, d)` where each element lies in `[-1.0, 1.0)`.
///
/// # Example
/// ```
/// use ferreus_smolyak::generate_random_points;
///
/// let pts = generate_random_points(100, 4, Some(42));
/// assert_eq!(pts.ncols(), 4);
/// ```
pub fn generate_random_points(n: usize, d: usize, seed: Option<u64>) -> Mat<f64> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    Mat::from_fn(n, d, |_, _| rng.random_range(-1.0..1.0))
}

/// Create a regular evaluation grid from per-dimension ranges and sample counts.
///
/// The first dimension varies fastest. A dimension with a count of one is
/// sampled at the start of its range.
///
/// # Arguments
/// * `ranges` - Inclusive `(min, max)` range for each dimension.
/// * `counts` - Number of grid samples per range; must match `ranges.len()`.
///
/// # Returns
/// A `Mat<f64>` with one row per grid point and one column per dimension.
pub fn create_evaluation_grid(ranges: &[(f64, f64)], counts: &[usize]) -> SmolyakResult<Mat<f64>> {
    if ranges.len() != counts.len() {
        return Err(SmolyakError::ShapeMismatch {
            what: "sample counts",
            expected: ranges.len(),
            found: counts.len(),
        });
    }

    let total_points: usize = counts.iter().product();
    let num_dimensions = ranges.len();

    Ok(Mat::from_fn(total_points, num_dimensions, |row_idx, col_idx| {
        let dim_points = counts[col_idx];
        let (start, end) = ranges[col_idx];
        let step = match dim_points > 1 {
            true => (end - start) / (dim_points as f64 - 1.0),
            false => 0.0,
        };

        let stride: usize = counts[..col_idx].iter().product();
        let index_in_dim = (row_idx / stride) % dim_points;
        start + step * index_in_dim as f64
    }))
}

/// Write point coordinates and associated values to a CSV file.
///
/// Each row of `points` is written followed by every column of `values`, with
/// headers `X1..Xd` and `Value1..Valuek`.
///
/// # Errors
/// Returns an error if the shapes disagree or writing to disk fails.
pub fn point_arrays_to_csv<P: AsRef<Path>>(
    points: MatRef<f64>,
    values: MatRef<f64>,
    path: P,
) -> Result<(), Box<dyn Error>> {
    let num_points = points.nrows();
    if values.nrows() != num_points {
        return Err(SmolyakError::ShapeMismatch {
            what: "value rows",
            expected: num_points,
            found: values.nrows(),
        }
        .into());
    }

    let mut wtr = Writer::from_path(path)?;

    let headers: Vec<String> = (1..=points.ncols())
        .map(|k| format!("X{}", k))
        .chain((1..=values.ncols()).map(|j| format!("Value{}", j)))
        .collect();
    wtr.write_record(&headers)?;

    for i in 0..num_points {
        let record: Vec<String> = points
            .row(i)
            .iter()
            .chain(values.row(i).iter())
            .map(|c| c.to_string())
            .collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Per-column extents of a point array, all minimums followed by all maximums.
///
/// Returns an empty vector for an empty array.
pub fn get_pointarray_extents(points: MatRef<f64>) -> Vec<f64> {
    let ncols = points.ncols();
    if points.nrows() == 0 {
        return Vec::new();
    }

    let mut extents = vec![0.0; 2 * ncols];
    for col in 0..ncols {
        extents[col] = points[(0, col)];
        extents[col + ncols] = points[(0, col)];
    }

    for row in points.row_iter() {
        for (col, item) in row.iter().enumerate() {
            extents[col] = extents[col].min(*item);
            extents[col + ncols] = extents[col + ncols].max(*item);
        }
    }

    extents
}

/// Maps physical points inside `extents` onto `[-1, 1]^d`.
pub fn points_to_canonical(points: MatRef<f64>, extents: &[f64]) -> Mat<f64> {
    let d = points.ncols();
    Mat::from_fn(points.nrows(), d, |i, k| {
        to_canonical(points[(i, k)], extents[k], extents[k + d])
    })
}

/// Maps canonical points back into the physical `extents`.
pub fn points_from_canonical(points: MatRef<f64>, extents: &[f64]) -> Mat<f64> {
    let d = points.ncols();
    Mat::from_fn(points.nrows(), d, |i, k| {
        from_canonical(points[(i, k)], extents[k], extents[k + d])
    })
}

/// Number of canonical points with any coordinate outside `[-1, 1]`.
///
/// A small relative slack absorbs rounding from the affine map.
pub fn count_out_of_domain(canonical_points: MatRef<f64>) -> usize {
    const SLACK: f64 = 1.0 + 1e-12;

    canonical_points
        .row_iter()
        .filter(|row| row.iter().any(|x| !is_canonical(*x / SLACK)))
        .count()
}
