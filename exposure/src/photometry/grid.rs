//! Uniformly sampled spectral grid
//!
//! A [`SpectralGrid`] stores a function of wavelength sampled at
//! `x(i) = x0 + i * dx` for `i in 0..n`. Wavelengths are always Angstrom.
//! The flux unit of the samples is up to the caller, but grids that get
//! multiplied together must agree on it.
//!
//! Grids are plain owned values. Every evaluation works on its own copies,
//! so mutation through [`SpectralGrid::resample`] or [`SpectralGrid::scale`]
//! never leaks into another consumer.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use float_cmp::approx_eq;
use thiserror::Error;

use super::trapezoid::{trap_integrate_uniform, TrapezoidError};
use crate::algo::{bracket, validate_table};

/// Maximum number of points handed to a plot after display decimation
pub const DISPLAY_MAX_POINTS: usize = 1024;

/// First wavelength of the standard pipeline grid (Angstrom)
pub const PIPELINE_START_ANGSTROM: f64 = 3200.0;

/// Last wavelength of the standard pipeline grid (Angstrom)
pub const PIPELINE_END_ANGSTROM: f64 = 10000.0;

/// Sample spacing of the standard pipeline grid (Angstrom)
pub const PIPELINE_STEP_ANGSTROM: f64 = 1.0;

/// Relative tolerance used when deciding whether two grids share sampling
const SAMPLING_TOLERANCE: f64 = 1e-9;

/// Errors that can occur with spectral grid operations
#[derive(Debug, Error)]
pub enum GridError {
    #[error("Invalid sampling: {0}")]
    InvalidSampling(String),

    #[error("Expected {expected} samples, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Non-finite sample value at index {0}")]
    NonFinite(usize),

    #[error("Wavelength {x} is outside the grid domain [{min}, {max}]")]
    OutOfDomain { x: f64, min: f64, max: f64 },

    #[error("Grids do not share sampling: {0}")]
    SamplingMismatch(String),

    #[error("Invalid resampling factor {0}")]
    InvalidFactor(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Integration failed: {0}")]
    Integration(#[from] TrapezoidError),
}

/// Uniformly spaced 1-D function of wavelength
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralGrid {
    /// Wavelength of the first sample in Angstrom
    x0: f64,

    /// Sample spacing in Angstrom
    dx: f64,

    /// Sample values, `y[i]` lives at `x0 + i * dx`
    y: Vec<f64>,
}

impl SpectralGrid {
    /// Create a grid from its start, spacing and sample values
    ///
    /// # Errors
    ///
    /// Fails with `InvalidSampling` if `x0` is not finite, `dx` is not
    /// strictly positive or there are no samples, and with `NonFinite` if any
    /// sample is NaN or infinite.
    pub fn new(x0: f64, dx: f64, y: Vec<f64>) -> Result<Self, GridError> {
        if !x0.is_finite() {
            return Err(GridError::InvalidSampling(format!(
                "start wavelength must be finite, got {x0}"
            )));
        }
        if !(dx.is_finite() && dx > 0.0) {
            return Err(GridError::InvalidSampling(format!(
                "spacing must be positive, got {dx}"
            )));
        }
        if y.is_empty() {
            return Err(GridError::InvalidSampling(
                "grid needs at least one sample".to_string(),
            ));
        }
        if let Some(idx) = y.iter().position(|v| !v.is_finite()) {
            return Err(GridError::NonFinite(idx));
        }

        Ok(Self { x0, dx, y })
    }

    /// Grid with every sample set to `value`
    pub fn constant(x0: f64, dx: f64, n: usize, value: f64) -> Result<Self, GridError> {
        Self::new(x0, dx, vec![value; n])
    }

    /// Grid sampled from an analytic function of wavelength
    pub fn from_fn<F>(x0: f64, dx: f64, n: usize, f: F) -> Result<Self, GridError>
    where
        F: Fn(f64) -> f64,
    {
        Self::new(x0, dx, (0..n).map(|i| f(x0 + i as f64 * dx)).collect())
    }

    /// Grid sampled from an ascending `(xs, ys)` table by linear
    /// interpolation; samples outside the table are zero.
    pub fn from_table(
        x0: f64,
        dx: f64,
        n: usize,
        xs: &[f64],
        ys: &[f64],
    ) -> Result<Self, GridError> {
        validate_table(xs, ys)
            .map_err(|e| GridError::InvalidSampling(format!("bad table: {e}")))?;

        let y = (0..n)
            .map(|i| match bracket(xs, x0 + i as f64 * dx) {
                Some((lower, upper, weight)) => ys[lower] * weight + ys[upper] * (1.0 - weight),
                None => 0.0,
            })
            .collect();
        Self::new(x0, dx, y)
    }

    /// Grid on the same lattice as `self` with every sample set to `value`
    pub fn filled_like(&self, value: f64) -> Self {
        Self {
            x0: self.x0,
            dx: self.dx,
            y: vec![value; self.y.len()],
        }
    }

    /// Standard 3200-10000 Angstrom grid at 1 Angstrom filled with `value`
    pub fn pipeline(value: f64) -> Self {
        let n = pipeline_len();
        Self {
            x0: PIPELINE_START_ANGSTROM,
            dx: PIPELINE_STEP_ANGSTROM,
            y: vec![value; n],
        }
    }

    /// Start wavelength in Angstrom
    pub fn x0(&self) -> f64 {
        self.x0
    }

    /// Sample spacing in Angstrom
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Always false, a grid holds at least one sample
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Wavelength of sample `i`
    pub fn x(&self, i: usize) -> f64 {
        self.x0 + i as f64 * self.dx
    }

    /// Last sampled wavelength
    pub fn x_max(&self) -> f64 {
        self.x(self.y.len() - 1)
    }

    /// Sample values in wavelength order
    pub fn values(&self) -> &[f64] {
        &self.y
    }

    /// Iterator over `(wavelength, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.y.iter().enumerate().map(|(i, &v)| (self.x(i), v))
    }

    /// Smallest sample value
    pub fn ymin(&self) -> f64 {
        self.y.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest sample value
    pub fn ymax(&self) -> f64 {
        self.y.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Linear interpolation between the two bracketing samples
    ///
    /// Exact at sample points. Fails with `OutOfDomain` outside
    /// `[x0, x0 + (n-1) * dx]`.
    pub fn interp(&self, x: f64) -> Result<f64, GridError> {
        let max = self.x_max();
        if !(x >= self.x0 && x <= max) {
            return Err(GridError::OutOfDomain {
                x,
                min: self.x0,
                max,
            });
        }

        let pos = (x - self.x0) / self.dx;
        let nearest = pos.round();
        if (pos - nearest).abs() < SAMPLING_TOLERANCE {
            return Ok(self.y[(nearest as usize).min(self.y.len() - 1)]);
        }

        let lower = (pos.floor() as usize).min(self.y.len() - 2);
        let t = pos - lower as f64;
        Ok(self.y[lower] * (1.0 - t) + self.y[lower + 1] * t)
    }

    /// Average groups of `factor` consecutive samples in place.
    ///
    /// `dx` grows by `factor` and `x0` moves to the centre of the first bin.
    /// Samples beyond the last whole bin are dropped rather than averaged
    /// into a partial bin.
    pub fn resample(&mut self, factor: usize) -> Result<(), GridError> {
        if factor == 0 || factor > self.y.len() {
            return Err(GridError::InvalidFactor(factor));
        }
        if factor == 1 {
            return Ok(());
        }

        let binned: Vec<f64> = self
            .y
            .chunks_exact(factor)
            .map(|bin| bin.iter().sum::<f64>() / factor as f64)
            .collect();

        self.x0 += (factor - 1) as f64 * self.dx / 2.0;
        self.dx *= factor as f64;
        self.y = binned;
        Ok(())
    }

    /// Decimate in place for plotting.
    ///
    /// The bin size doubles until at most [`DISPLAY_MAX_POINTS`] samples
    /// remain. Returns the bin size that was applied.
    pub fn decimate_for_display(&mut self) -> Result<usize, GridError> {
        let kbin = display_bin_size(self.y.len());
        self.resample(kbin)?;
        Ok(kbin)
    }

    /// Decimated copy for display code holding a shared reference
    pub fn to_display(&self) -> Result<SpectralGrid, GridError> {
        let mut copy = self.clone();
        copy.decimate_for_display()?;
        Ok(copy)
    }

    /// True when `other` has the same spacing and its samples land on ours
    pub fn shares_sampling(&self, other: &SpectralGrid) -> bool {
        self.sample_offset(other).is_ok()
    }

    /// Index offset `k` such that `other.x(i + k) == self.x(i)`
    fn sample_offset(&self, other: &SpectralGrid) -> Result<isize, GridError> {
        if !approx_eq!(
            f64,
            self.dx,
            other.dx,
            epsilon = SAMPLING_TOLERANCE * self.dx
        ) {
            return Err(GridError::SamplingMismatch(format!(
                "spacing {} vs {}",
                self.dx, other.dx
            )));
        }

        let shift = (self.x0 - other.x0) / self.dx;
        let whole = shift.round();
        if (shift - whole).abs() > 1e-6 {
            return Err(GridError::SamplingMismatch(format!(
                "start {} is not on the sample lattice of {}",
                self.x0, other.x0
            )));
        }

        Ok(whole as isize)
    }

    /// Index ranges `(ours, theirs)` of the samples both grids cover
    fn overlap(
        &self,
        other: &SpectralGrid,
    ) -> Result<Option<(std::ops::Range<usize>, isize)>, GridError> {
        let offset = self.sample_offset(other)?;
        let start = (-offset).max(0);
        let end = (self.y.len() as isize).min(other.y.len() as isize - offset);
        if start >= end {
            return Ok(None);
        }
        Ok(Some((start as usize..end as usize, offset)))
    }

    /// Multiply every sample by a scalar
    pub fn scale(&mut self, factor: f64) -> Result<(), GridError> {
        if !factor.is_finite() {
            return Err(GridError::InvalidSampling(format!(
                "scale factor must be finite, got {factor}"
            )));
        }
        self.y.iter_mut().for_each(|v| *v *= factor);
        Ok(())
    }

    /// Multiply pointwise by `other` over the overlapping domain.
    ///
    /// Both grids must share sampling; samples outside the overlap keep
    /// their value.
    pub fn scale_by(&mut self, other: &SpectralGrid) -> Result<(), GridError> {
        if let Some((range, offset)) = self.overlap(other)? {
            for i in range {
                self.y[i] *= other.y[(i as isize + offset) as usize];
            }
        }
        Ok(())
    }

    /// Add `other` pointwise over the overlapping domain.
    pub fn add(&mut self, other: &SpectralGrid) -> Result<(), GridError> {
        if let Some((range, offset)) = self.overlap(other)? {
            for i in range {
                self.y[i] += other.y[(i as isize + offset) as usize];
            }
        }
        Ok(())
    }

    /// Copy of this function sampled on another uniform lattice
    ///
    /// Every requested wavelength must lie inside our domain.
    pub fn regrid(&self, x0: f64, dx: f64, n: usize) -> Result<SpectralGrid, GridError> {
        let max = self.x_max();
        let edge_slack = SAMPLING_TOLERANCE * self.dx;
        let mut y = Vec::with_capacity(n);
        for i in 0..n {
            let mut x = x0 + i as f64 * dx;
            if x < self.x0 && self.x0 - x < edge_slack {
                x = self.x0;
            } else if x > max && x - max < edge_slack {
                x = max;
            }
            y.push(self.interp(x)?);
        }
        SpectralGrid::new(x0, dx, y)
    }

    /// Copy of this function sampled like `template`
    pub fn regrid_like(&self, template: &SpectralGrid) -> Result<SpectralGrid, GridError> {
        self.regrid(template.x0, template.dx, template.len())
    }

    /// Trapezoidal integral over the whole grid
    pub fn integrate(&self) -> f64 {
        // A grid always has dx > 0 and at least one sample, the only inputs
        // the uniform rule rejects
        trap_integrate_uniform(self.dx, &self.y).unwrap_or(0.0)
    }

    /// Trapezoidal integral of `self * other` over the overlapping domain
    pub fn integrate_product(&self, other: &SpectralGrid) -> Result<f64, GridError> {
        let Some((range, offset)) = self.overlap(other)? else {
            return Ok(0.0);
        };

        let product: Vec<f64> = range
            .map(|i| self.y[i] * other.y[(i as isize + offset) as usize])
            .collect();
        Ok(trap_integrate_uniform(self.dx, &product)?)
    }

    /// Write `wavelength value` pairs, one sample per line, no header
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), GridError> {
        let mut out = BufWriter::new(File::create(path)?);
        for (x, y) in self.iter() {
            writeln!(out, "{x} {y}")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Read a two-column dump produced by [`SpectralGrid::write`].
    ///
    /// Blank lines and `#` comments are skipped. The wavelength column must
    /// be uniformly spaced.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<SpectralGrid, GridError> {
        let reader = BufReader::new(File::open(path)?);
        let mut xs = Vec::new();
        let mut ys = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut columns = trimmed.split_whitespace();
            let (Some(x), Some(y), None) = (columns.next(), columns.next(), columns.next()) else {
                return Err(GridError::Parse {
                    line: idx + 1,
                    message: "expected two columns".to_string(),
                });
            };

            let parse = |s: &str| {
                s.parse::<f64>().map_err(|e| GridError::Parse {
                    line: idx + 1,
                    message: format!("{s:?}: {e}"),
                })
            };
            xs.push(parse(x)?);
            ys.push(parse(y)?);
        }

        if xs.len() < 2 {
            return Err(GridError::InvalidSampling(
                "need at least two samples to recover the spacing".to_string(),
            ));
        }

        let n = xs.len();
        let x0 = xs[0];
        let dx = (xs[n - 1] - x0) / (n - 1) as f64;
        for (i, &x) in xs.iter().enumerate() {
            let expected = x0 + i as f64 * dx;
            if (x - expected).abs() > 1e-6 * dx.abs().max(f64::MIN_POSITIVE) {
                return Err(GridError::InvalidSampling(format!(
                    "wavelength {x} on sample {i} breaks uniform spacing {dx}"
                )));
            }
        }

        SpectralGrid::new(x0, dx, ys)
    }
}

/// Number of samples on the standard pipeline grid
pub fn pipeline_len() -> usize {
    ((PIPELINE_END_ANGSTROM - PIPELINE_START_ANGSTROM) / PIPELINE_STEP_ANGSTROM).round() as usize
        + 1
}

/// Power-of-two bin size that brings `n` samples down to at most
/// [`DISPLAY_MAX_POINTS`]
pub fn display_bin_size(n: usize) -> usize {
    let mut kbin = 1;
    while n / kbin > DISPLAY_MAX_POINTS {
        kbin *= 2;
    }
    kbin
}
