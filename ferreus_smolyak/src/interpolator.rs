/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the Smolyak interpolator model: grid construction, fitting, evaluation and persistence.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    common,
    config::SmolyakParams,
    error::{SmolyakError, SmolyakResult},
    grid::build_grid,
    index_set::SmolyakIndexSet,
    interpolant_config::InterpolantSettings,
    progress::{emit, ProgressMsg, ProgressSink},
    solver::{self, SolveReport},
};

use faer::{Mat, MatRef, RowRef};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    error::Error,
    fmt,
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

/// Convenience builder for constructing a [`SmolyakInterpolator`].
///
/// The builder should be called via the [`SmolyakInterpolator::builder`] method.
///
/// See [`SmolyakInterpolator`] for details on each field.
pub struct SmolyakInterpolatorBuilder {
    interpolant_settings: InterpolantSettings,
    params: SmolyakParams,
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl SmolyakInterpolatorBuilder {
    fn new(interpolant_settings: InterpolantSettings) -> Self {
        Self {
            interpolant_settings,
            params: SmolyakParams::default(),
            progress_callback: None,
        }
    }

    /// Sets custom solver and evaluation parameters.
    pub fn params(mut self, params: SmolyakParams) -> Self {
        self.params = params;
        self
    }

    /// Optional callback for reporting progress and diagnostics.
    ///
    /// Skipped during serialization.
    pub fn progress_callback(mut self, progress_callback: Arc<dyn ProgressSink>) -> Self {
        self.progress_callback = Some(progress_callback);
        self
    }

    /// Validates the settings, generates the element set and builds the grid.
    ///
    /// ### Errors
    /// - [`SmolyakError::InvalidDimension`] for an empty level vector.
    /// - [`SmolyakError::InvalidLevel`] when a level exceeds `params.max_level`.
    /// - [`SmolyakError::ShapeMismatch`] or [`SmolyakError::InvalidDomain`] for bad extents.
    pub fn build(self) -> SmolyakResult<SmolyakInterpolator> {
        SmolyakInterpolator::new(
            self.interpolant_settings,
            self.params,
            self.progress_callback,
        )
    }
}

#[doc = include_str!("../docs/smolyak_interpolator.md")]
#[derive(Serialize, Deserialize, Debug)]
pub struct SmolyakInterpolator {
    /// Level vector and physical domain.
    interpolant_settings: InterpolantSettings,

    /// Solver and evaluation parameters.
    pub params: SmolyakParams,

    /// Anisotropic element set shared by the grid and the basis.
    index_set: SmolyakIndexSet,

    /// Physical extents, all minimums followed by all maximums.
    extents: Vec<f64>,

    /// Grid points on `[-1, 1]^d`, one row per element.
    canonical_grid: Mat<f64>,

    /// Solved coefficients, one column per value column.
    coefficients: Option<Mat<f64>>,

    /// Diagnostics from the last solve.
    report: Option<SolveReport>,

    /// Optional callback for reporting progress.
    /// Skipped during serialization.
    #[serde(skip, default)]
    pub(crate) progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl SmolyakInterpolator {
    /// Creates a new [`SmolyakInterpolatorBuilder`] for the given settings.
    ///
    /// This is the way to construct an interpolator.
    pub fn builder(interpolant_settings: InterpolantSettings) -> SmolyakInterpolatorBuilder {
        SmolyakInterpolatorBuilder::new(interpolant_settings)
    }

    fn new(
        interpolant_settings: InterpolantSettings,
        params: SmolyakParams,
        progress_callback: Option<Arc<dyn ProgressSink>>,
    ) -> SmolyakResult<Self> {
        interpolant_settings.validate(params.max_level)?;

        let dimensions = interpolant_settings.dimensions();
        let mu_max = interpolant_settings.mu_max();

        let index_set =
            SmolyakIndexSet::isotropic_with_max_level(dimensions, mu_max, params.max_level)?
                .anisotropic_with_max_level(&interpolant_settings.level_vector, params.max_level)?;

        emit(
            &progress_callback,
            ProgressMsg::IndexSetBuilt {
                dimensions,
                mu_max,
                num_elements: index_set.len(),
            },
        );

        let canonical_grid = build_grid(&index_set);

        emit(
            &progress_callback,
            ProgressMsg::GridBuilt {
                num_points: canonical_grid.nrows(),
            },
        );

        let extents = interpolant_settings.resolved_extents();

        Ok(Self {
            interpolant_settings,
            params,
            index_set,
            extents,
            canonical_grid,
            coefficients: None,
            report: None,
            progress_callback,
        })
    }

    /// Checks that a deserialized model agrees with itself: one grid row and
    /// one coefficient row per element, and extents and level vector sized to
    /// the element set's dimensions.
    fn check_consistency(&self) -> SmolyakResult<()> {
        self.interpolant_settings.validate(self.params.max_level)?;

        let d = self.index_set.dimensions();
        let n = self.index_set.len();

        if self.interpolant_settings.dimensions() != d {
            return Err(SmolyakError::InvalidDimension {
                expected: d,
                found: self.interpolant_settings.dimensions(),
            });
        }

        let shapes = [
            ("extents length", 2 * d, self.extents.len()),
            ("grid rows", n, self.canonical_grid.nrows()),
            ("grid columns", d, self.canonical_grid.ncols()),
        ];
        let coefficient_rows = self
            .coefficients
            .as_ref()
            .map(|c| ("coefficient rows", n, c.nrows()));

        for (what, expected, found) in shapes.into_iter().chain(coefficient_rows) {
            if expected != found {
                return Err(SmolyakError::ShapeMismatch {
                    what,
                    expected,
                    found,
                });
            }
        }

        Ok(())
    }

    /// Number of dimensions.
    pub fn dimensions(&self) -> usize {
        self.index_set.dimensions()
    }

    /// Settings the interpolator was built with.
    pub fn interpolant_settings(&self) -> &InterpolantSettings {
        &self.interpolant_settings
    }

    /// The anisotropic element set.
    pub fn index_set(&self) -> &SmolyakIndexSet {
        &self.index_set
    }

    /// Physical extents, all minimums followed by all maximums.
    pub fn extents(&self) -> &[f64] {
        &self.extents
    }

    /// Number of grid points, which equals the number of basis functions.
    pub fn num_points(&self) -> usize {
        self.canonical_grid.nrows()
    }

    /// Grid points on the canonical cube.
    pub fn canonical_grid(&self) -> MatRef<'_, f64> {
        self.canonical_grid.as_ref()
    }

    /// Grid points in physical coordinates. Sample the target function here
    /// and pass the values to [`SmolyakInterpolator::fit_values`].
    pub fn grid_points(&self) -> Mat<f64> {
        common::points_from_canonical(self.canonical_grid.as_ref(), &self.extents)
    }

    /// Solved coefficients, if a fit has been run.
    pub fn coefficients(&self) -> Option<&Mat<f64>> {
        self.coefficients.as_ref()
    }

    /// Diagnostics from the last successful fit.
    pub fn report(&self) -> Option<&SolveReport> {
        self.report.as_ref()
    }

    /// Solves for coefficients from values sampled at [`SmolyakInterpolator::grid_points`].
    ///
    /// `values` has one row per grid point and one column per value channel.
    /// On failure the previous coefficients are kept.
    ///
    /// ### Example
    /// ```
    /// use faer::Mat;
    /// use ferreus_smolyak::{InterpolantSettings, SmolyakInterpolator};
    ///
    /// let settings = InterpolantSettings::builder(vec![3, 3]).build();
    /// let mut interpolator = SmolyakInterpolator::builder(settings).build()?;
    ///
    /// let grid = interpolator.grid_points();
    /// let values = Mat::from_fn(grid.nrows(), 1, |i, _| grid[(i, 0)] * grid[(i, 1)]);
    ///
    /// let report = interpolator.fit_values(&values)?;
    /// assert_eq!(report.rank, grid.nrows());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn fit_values(&mut self, values: &Mat<f64>) -> SmolyakResult<SolveReport> {
        let (coefficients, report) = solver::fit(
            self.canonical_grid.as_ref(),
            &self.index_set,
            values.as_ref(),
            &self.params,
        )?;

        emit(
            &self.progress_callback,
            ProgressMsg::SystemSolved {
                rank: report.rank,
                num_basis: report.num_basis,
                condition_number: report.condition_number,
                max_residual: report.max_residual,
            },
        );

        self.coefficients = Some(coefficients);
        self.report = Some(report);

        Ok(report)
    }

    /// Samples `f` at every physical grid point and fits the result.
    ///
    /// `f` receives one grid point per call and may be called from several
    /// threads at once when the grid holds at least `params.parallel_threshold`
    /// points.
    pub fn fit_function<F>(&mut self, f: F) -> SmolyakResult<SolveReport>
    where
        F: Fn(RowRef<f64>) -> f64 + Sync,
    {
        let grid = self.grid_points();
        let num_points = grid.nrows();

        let samples: Vec<f64> = if num_points >= self.params.parallel_threshold {
            (0..num_points)
                .into_par_iter()
                .map(|i| f(grid.row(i)))
                .collect()
        } else {
            (0..num_points).map(|i| f(grid.row(i))).collect()
        };

        let values = Mat::from_fn(num_points, 1, |i, _| samples[i]);
        self.fit_values(&values)
    }

    /// Evaluates the fitted interpolant at physical `target_points`.
    ///
    /// Points outside the extents are still evaluated. When
    /// `params.warn_out_of_domain` is set, their number is reported through the
    /// progress sink as [`ProgressMsg::DomainOutOfRange`].
    ///
    /// ### Returns
    /// A `(n_targets × n_value_channels)` matrix.
    ///
    /// ### Errors
    /// - [`SmolyakError::NotFitted`] before any fit.
    /// - [`SmolyakError::InvalidDimension`] when the column count is wrong.
    pub fn evaluate(&self, target_points: &Mat<f64>) -> SmolyakResult<Mat<f64>> {
        let coefficients = self.coefficients.as_ref().ok_or(SmolyakError::NotFitted)?;

        if target_points.ncols() != self.dimensions() {
            return Err(SmolyakError::InvalidDimension {
                expected: self.dimensions(),
                found: target_points.ncols(),
            });
        }

        let canonical = common::points_to_canonical(target_points.as_ref(), &self.extents);

        if self.params.warn_out_of_domain {
            let num_points = common::count_out_of_domain(canonical.as_ref());
            if num_points > 0 {
                emit(
                    &self.progress_callback,
                    ProgressMsg::DomainOutOfRange { num_points },
                );
            }
        }

        solver::evaluate(
            canonical.as_ref(),
            &self.index_set,
            coefficients.as_ref(),
            self.params.parallel_threshold,
        )
    }

    /// Evaluates the interpolant **at its own grid points**.
    ///
    /// The result should reproduce the fitted values to within the solver's
    /// residual, which makes it a convenient consistency check.
    pub fn evaluate_at_grid(&self) -> SmolyakResult<Mat<f64>> {
        let coefficients = self.coefficients.as_ref().ok_or(SmolyakError::NotFitted)?;

        solver::evaluate(
            self.canonical_grid.as_ref(),
            &self.index_set,
            coefficients.as_ref(),
            self.params.parallel_threshold,
        )
    }

    /// Save this interpolator to a **JSON envelope** `{ format, version, model }`.
    ///
    /// The on-disk format is versioned via `JSON_FORMAT_NAME` and `JSON_VERSION`.
    /// Files produced here are intended to be read back with [`SmolyakInterpolator::load_model`].
    ///
    /// ### Errors
    /// - Returns `ModelIOError::{Create, Serialize, Flush}` on I/O or serialization
    ///   failures.
    ///
    /// ### Example
    /// ```no_run
    /// # use ferreus_smolyak::SmolyakInterpolator;
    /// # let interpolator: SmolyakInterpolator = unimplemented!();
    /// interpolator.save_model("smolyak_model.json")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> ModelIOResult<()> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref).map_err(|e| ModelIOError::Create {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let mut w = BufWriter::new(file);

        let env = JsonEnvelopeRef {
            format: JSON_FORMAT_NAME,
            version: JSON_VERSION,
            model: self,
        };

        serde_json::to_writer_pretty(&mut w, &env).map_err(|e| ModelIOError::Serialize {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        w.flush().map_err(|e| ModelIOError::Flush {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Load an interpolator from a versioned **JSON envelope**, validating format & version.
    ///
    /// If `progress` is `Some`, the sink is attached to the returned model.
    ///
    /// ### Errors
    /// - Returns `ModelIOError::{Open, Parse, FormatMismatch, VersionMismatch}` as appropriate.
    /// - Returns `ModelIOError::InvalidModel` when the settings, element set, grid
    ///   and coefficients do not describe the same interpolant.
    pub fn load_model<P: AsRef<Path>>(
        path: P,
        progress: Option<Arc<dyn ProgressSink>>,
    ) -> ModelIOResult<Self> {
        let path_ref = path.as_ref();

        let file = File::open(path_ref).map_err(|e| ModelIOError::Open {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(file);

        let env: JsonEnvelopeOwned<Self> =
            serde_json::from_reader(reader).map_err(|e| ModelIOError::Parse {
                path: path_ref.to_path_buf(),
                source: e,
            })?;

        if env.format != JSON_FORMAT_NAME {
            return Err(ModelIOError::FormatMismatch {
                path: path_ref.to_path_buf(),
                found: env.format,
                expected: JSON_FORMAT_NAME,
            });
        }

        if env.version != JSON_VERSION {
            return Err(ModelIOError::VersionMismatch {
                path: path_ref.to_path_buf(),
                found: env.version,
                expected: JSON_VERSION,
            });
        }

        let mut model = env.model;
        model
            .check_consistency()
            .map_err(|e| ModelIOError::InvalidModel {
                path: path_ref.to_path_buf(),
                source: e,
            })?;

        if let Some(sink) = progress {
            model.progress_callback = Some(sink);
        }
        Ok(model)
    }
}

const JSON_FORMAT_NAME: &str = "ferreus_smolyak.json";
const JSON_VERSION: u32 = 1;

/// Borrowing envelope for SAVE (no clone of the model).
#[derive(Serialize)]
struct JsonEnvelopeRef<'a, T: ?Sized> {
    format: &'static str,
    version: u32,
    #[serde(flatten)]
    model: &'a T,
}

/// Owning envelope for LOAD.
#[derive(Serialize, Deserialize)]
struct JsonEnvelopeOwned<T> {
    format: String,
    version: u32,
    #[serde(flatten)]
    model: T,
}

type ModelIOResult<T> = std::result::Result<T, ModelIOError>;

/// Errors that can occur when saving or loading a [`SmolyakInterpolator`] model.
#[derive(Debug)]
pub enum ModelIOError {
    /// Failed to create the target file before writing a model.
    Create { path: PathBuf, source: io::Error },

    /// Failed to open an existing model file for reading.
    Open { path: PathBuf, source: io::Error },

    /// Failed to flush buffered output when finishing a write.
    Flush { path: PathBuf, source: io::Error },

    /// Error serializing the in-memory model to JSON.
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Error parsing JSON when reading a model from disk.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The JSON `format` field does not match the expected model format.
    FormatMismatch {
        path: PathBuf,
        found: String,
        expected: &'static str,
    },

    /// The JSON `version` field does not match the supported version.
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// The parsed model is internally inconsistent.
    InvalidModel { path: PathBuf, source: SmolyakError },
}

impl fmt::Display for ModelIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelIOError::Create { path, source } => {
                write!(f, "creating {}: {}", path.display(), source)
            }
            ModelIOError::Open { path, source } => {
                write!(f, "opening {}: {}", path.display(), source)
            }
            ModelIOError::Flush { path, source } => {
                write!(f, "flushing {}: {}", path.display(), source)
            }
            ModelIOError::Serialize { path, source } => {
                write!(f, "serializing JSON to {}: {}", path.display(), source)
            }
            ModelIOError::Parse { path, source } => {
                write!(f, "parsing JSON in {}: {}", path.display(), source)
            }
            ModelIOError::FormatMismatch {
                path,
                found,
                expected,
            } => write!(
                f,
                "unsupported format {:?} (expected {:?}) in {}",
                found,
                expected,
                path.display()
            ),
            ModelIOError::VersionMismatch {
                path,
                found,
                expected,
            } => write!(
                f,
                "unsupported version {} (expected {}) in {}",
                found,
                expected,
                path.display()
            ),
            ModelIOError::InvalidModel { path, source } => {
                write!(f, "invalid model in {}: {}", path.display(), source)
            }
        }
    }
}

impl Error for ModelIOError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ModelIOError::Create { source, .. }
            | ModelIOError::Open { source, .. }
            | ModelIOError::Flush { source, .. } => Some(source),
            ModelIOError::Serialize { source, .. } | ModelIOError::Parse { source, .. } => {
                Some(source)
            }
            ModelIOError::InvalidModel { source, .. } => Some(source),
            ModelIOError::FormatMismatch { .. } | ModelIOError::VersionMismatch { .. } => None,
        }
    }
}
