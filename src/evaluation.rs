//! Goodness-of-fit metrics for a fitted `(slope, intercept)` pair.
//!
//! Sums are reduced in parallel over fixed chunks of `REDUCE_CHUNK_LEN`
//! samples and the partials are added in chunk order, so the same input always
//! gives the same bits.
use rayon::prelude::*;

use crate::{
    error::{RegressionErr, Result, check_paired},
    model::{LinearModel, REDUCE_CHUNK_LEN},
};

/// Arithmetic mean of `values`.
///
/// # Errors
/// Returns `EmptyInput` if `values` is empty.
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(RegressionErr::EmptyInput("values"));
    }

    let sum = ordered_sum(
        values
            .par_chunks(REDUCE_CHUNK_LEN)
            .map(|chunk| chunk.iter().sum::<f64>()),
    );

    Ok(sum / values.len() as f64)
}

/// Dataset-wide mean squared error of `slope*x + intercept` against `ys`.
///
/// Empty input yields `0.0` rather than an error.
///
/// # Errors
/// Returns `DimensionMismatch` if `xs` and `ys` differ in length.
pub fn mean_squared_error(xs: &[f64], ys: &[f64], slope: f64, intercept: f64) -> Result<f64> {
    check_paired(xs, ys)?;

    if xs.is_empty() {
        return Ok(0.0);
    }

    let model = LinearModel::new(slope, intercept);
    let sum = ordered_sum(
        xs.par_chunks(REDUCE_CHUNK_LEN)
            .zip(ys.par_chunks(REDUCE_CHUNK_LEN))
            .map(|(xs, ys)| {
                xs.iter()
                    .zip(ys)
                    .map(|(&x, &y)| model.residual(x, y).powi(2))
                    .sum::<f64>()
            }),
    );

    Ok(sum / xs.len() as f64)
}

/// Coefficient of determination, `1 - RSS/TSS`.
///
/// When every `y` is the same, `TSS` is zero and the result is `-inf`
/// (non-zero residuals) or `NaN` (zero residuals); that case is not guarded.
///
/// # Errors
/// Returns `DimensionMismatch` if the lengths differ and `EmptyInput` if there
/// are no samples.
pub fn r_squared(xs: &[f64], ys: &[f64], slope: f64, intercept: f64) -> Result<f64> {
    check_paired(xs, ys)?;

    let y_mean = mean(ys)?;
    let tss = ordered_sum(ys.par_chunks(REDUCE_CHUNK_LEN).map(|chunk| {
        chunk.iter().map(|&y| (y - y_mean).powi(2)).sum::<f64>()
    }));

    let rss = mean_squared_error(xs, ys, slope, intercept)? * xs.len() as f64;

    Ok(1.0 - rss / tss)
}

/// The metrics reported after training.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub mse: f64,
    pub r_squared: f64,
}

impl Metrics {
    /// Evaluates the fitted parameters on `(xs, ys)`.
    ///
    /// # Errors
    /// Same as `r_squared`.
    pub fn evaluate(xs: &[f64], ys: &[f64], slope: f64, intercept: f64) -> Result<Self> {
        Ok(Self {
            mse: mean_squared_error(xs, ys, slope, intercept)?,
            r_squared: r_squared(xs, ys, slope, intercept)?,
        })
    }
}

fn ordered_sum<I>(partials: I) -> f64
where
    I: IndexedParallelIterator<Item = f64>,
{
    let partials: Vec<f64> = partials.collect();
    partials.into_iter().sum()
}
