use log::{debug, info, trace};
use rand::{SeedableRng, rngs::StdRng};

use super::{EarlyStopping, FitStats, GradientDescent};
use crate::{
    config::TrainerConfig,
    data::{BatchBuffer, Permutation},
    error::{RegressionErr, Result, check_paired},
    model::{BatchGradient, LinearModel},
};

/// Mini-batch SGD trainer for `y = slope*x + intercept`.
///
/// Owns the model parameters and the hyperparameters. Parameters start at
/// zero and are only ever changed by `fit`.
#[derive(Debug)]
pub struct Trainer {
    model: LinearModel,
    config: TrainerConfig,
    rng: StdRng,
    last_fit: Option<FitStats>,
}

impl Trainer {
    /// Returns a new `Trainer` with an OS-seeded shuffle generator.
    ///
    /// # Arguments
    /// * `learning_rate` - Step length of every parameter update.
    /// * `max_epochs` - Upper bound on the passes over the dataset.
    /// * `batch_size` - Samples per parameter update.
    pub fn new(learning_rate: f64, max_epochs: usize, batch_size: usize) -> Self {
        Self::from_config(&TrainerConfig {
            learning_rate,
            max_epochs,
            batch_size,
            seed: None,
        })
    }

    /// Returns a new `Trainer` following `config`.
    ///
    /// Hyperparameters are not validated here; `fit` rejects invalid ones.
    pub fn from_config(config: &TrainerConfig) -> Self {
        Self {
            model: LinearModel::default(),
            config: *config,
            rng: generate_rng(config.seed),
            last_fit: None,
        }
    }

    #[inline]
    pub fn slope(&self) -> f64 {
        self.model.slope
    }

    #[inline]
    pub fn intercept(&self) -> f64 {
        self.model.intercept
    }

    #[inline]
    pub fn model(&self) -> LinearModel {
        self.model
    }

    #[inline]
    pub fn predict(&self, x: f64) -> f64 {
        self.model.predict(x)
    }

    pub fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    pub fn max_epochs(&self) -> usize {
        self.config.max_epochs
    }

    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    /// Summary of the last successful `fit`, if any.
    pub fn last_fit(&self) -> Option<&FitStats> {
        self.last_fit.as_ref()
    }

    /// Fits the model to the samples `(xs[i], ys[i])`.
    ///
    /// Runs up to `max_epochs` epochs. Every epoch reshuffles the samples,
    /// splits them into batches of `batch_size` (the last one may be shorter)
    /// and takes one gradient step per batch. Training ends early once the
    /// epoch MSE fails to improve for `PATIENCE` epochs in a row.
    ///
    /// Parameters are not reset first, so calling `fit` again continues from
    /// the current slope and intercept.
    ///
    /// # Errors
    /// * `DimensionMismatch` if `xs` and `ys` have different lengths.
    /// * `EmptyInput` if there are no samples.
    /// * `InvalidConfig` if a hyperparameter is out of range.
    ///
    /// Nothing is modified when an error is returned. Non-finite values that
    /// arise during training (e.g. from a diverging learning rate) are not
    /// trapped and end up in the parameters.
    pub fn fit(&mut self, xs: &[f64], ys: &[f64]) -> Result<()> {
        check_paired(xs, ys)?;

        if xs.is_empty() {
            return Err(RegressionErr::EmptyInput("xs"));
        }

        self.config.validate()?;

        let TrainerConfig {
            learning_rate,
            max_epochs,
            batch_size,
            ..
        } = self.config;

        let samples = xs.len();
        info!(
            samples = samples,
            batch_size = batch_size,
            max_epochs = max_epochs,
            learning_rate = learning_rate;
            "fitting linear model"
        );

        let optimizer = GradientDescent::new(learning_rate);
        let mut permutation = Permutation::new(samples);
        let mut buffer = BatchBuffer::with_capacity(batch_size.min(samples));
        let mut early_stopping = EarlyStopping::default();
        let mut stats = FitStats::default();

        for epoch in 0..max_epochs {
            permutation.shuffle(&mut self.rng);

            let epoch_mse = self.run_epoch(&optimizer, &permutation, &mut buffer, xs, ys);
            let stop = early_stopping.should_stop(epoch_mse);
            stats.record_epoch(epoch_mse, early_stopping.best_mse());

            trace!(
                epoch = epoch,
                mse = epoch_mse,
                stalls = early_stopping.stall_count();
                "epoch finished"
            );

            if stop {
                info!(
                    epoch = epoch,
                    best_mse = early_stopping.best_mse();
                    "mse plateaued, stopping early"
                );
                stats.mark_early_stop();
                break;
            }
        }

        debug!(
            epochs = stats.epochs(),
            slope = self.model.slope,
            intercept = self.model.intercept;
            "fit finished"
        );

        self.last_fit = Some(stats);
        Ok(())
    }

    /// Runs one pass over the permuted samples.
    ///
    /// # Returns
    /// The mean of the per-batch MSEs.
    fn run_epoch(
        &mut self,
        optimizer: &GradientDescent,
        permutation: &Permutation,
        buffer: &mut BatchBuffer,
        xs: &[f64],
        ys: &[f64],
    ) -> f64 {
        let mut mse_total = 0.0;
        let mut batches = 0;

        for indices in permutation.batches(self.config.batch_size) {
            let batch = buffer.gather(xs, ys, indices);

            // Every partial sum has joined before the update below.
            let grad = BatchGradient::compute(&self.model, batch);
            optimizer.update_params(&mut self.model, &grad);

            mse_total += grad.mse();
            batches += 1;
        }

        mse_total / batches as f64
    }
}

fn generate_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
