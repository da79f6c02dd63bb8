//! Batch gradient kernel for the linear model under squared error.
use rayon::prelude::*;

use super::LinearModel;
use crate::data::BatchRef;

/// Samples reduced sequentially by one rayon task before partials are combined.
pub const REDUCE_CHUNK_LEN: usize = 1024;

/// Raw sums over one batch, computed with the parameters frozen at batch start:
///
/// - slope:     sum_i (pred_i - y_i) * x_i
/// - intercept: sum_i (pred_i - y_i)
/// - squared:   sum_i (pred_i - y_i)^2
///
/// Partials from disjoint chunks combine with `merge`. Chunks are merged in
/// chunk order, so the result does not depend on how rayon schedules them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchGradient {
    slope_sum: f64,
    intercept_sum: f64,
    squared_sum: f64,
    len: usize,
}

impl BatchGradient {
    /// Reduces a whole batch in parallel.
    pub fn compute(model: &LinearModel, batch: BatchRef<'_>) -> Self {
        debug_assert!(!batch.is_empty(), "batches are never empty");

        let partials: Vec<Self> = batch
            .xs
            .par_chunks(REDUCE_CHUNK_LEN)
            .zip(batch.ys.par_chunks(REDUCE_CHUNK_LEN))
            .map(|(xs, ys)| Self::accumulate(model, xs, ys))
            .collect();

        partials.into_iter().fold(Self::default(), Self::merge)
    }

    /// Sequential reduction of a single chunk.
    fn accumulate(model: &LinearModel, xs: &[f64], ys: &[f64]) -> Self {
        let mut acc = Self {
            len: xs.len(),
            ..Self::default()
        };

        for (&x, &y) in xs.iter().zip(ys) {
            let err = model.residual(x, y);
            acc.slope_sum += err * x;
            acc.intercept_sum += err;
            acc.squared_sum += err * err;
        }

        acc
    }

    /// Combines two partial reductions over disjoint samples.
    pub fn merge(self, other: Self) -> Self {
        Self {
            slope_sum: self.slope_sum + other.slope_sum,
            intercept_sum: self.intercept_sum + other.intercept_sum,
            squared_sum: self.squared_sum + other.squared_sum,
            len: self.len + other.len,
        }
    }

    /// Number of samples reduced.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slope gradient scaled by the actual batch length.
    #[inline]
    pub fn slope_grad(&self) -> f64 {
        self.slope_sum / self.len as f64
    }

    /// Intercept gradient scaled by the actual batch length.
    #[inline]
    pub fn intercept_grad(&self) -> f64 {
        self.intercept_sum / self.len as f64
    }

    /// Mean squared error of the batch at the frozen parameters.
    #[inline]
    pub fn mse(&self) -> f64 {
        self.squared_sum / self.len as f64
    }
}
