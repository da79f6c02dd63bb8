/// Summary of the last `fit` call.
///
/// The epoch MSE reported here is the mean of the per-batch MSEs of an
/// epoch, computed with the parameters each batch started from. It is what
/// early stopping looks at, and it is not the dataset-wide value returned by
/// `evaluation::mean_squared_error`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitStats {
    epochs: usize,
    last_epoch_mse: f64,
    best_epoch_mse: f64,
    early_stopped: bool,
}

impl Default for FitStats {
    fn default() -> Self {
        Self {
            epochs: 0,
            last_epoch_mse: f64::NAN,
            best_epoch_mse: f64::INFINITY,
            early_stopped: false,
        }
    }
}

impl FitStats {
    /// Records a finished epoch.
    ///
    /// # Args
    /// * `epoch_mse` - Mean of the batch MSEs of the epoch.
    /// * `best_mse` - Best epoch MSE so far according to early stopping.
    pub(crate) fn record_epoch(&mut self, epoch_mse: f64, best_mse: f64) {
        self.epochs += 1;
        self.last_epoch_mse = epoch_mse;
        self.best_epoch_mse = best_mse;
    }

    pub(crate) fn mark_early_stop(&mut self) {
        self.early_stopped = true;
    }

    /// Returns the number of epochs that ran.
    ///
    /// # Returns
    /// A value in `1..=max_epochs` for any successful `fit`.
    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Returns the MSE of the final epoch.
    pub fn last_epoch_mse(&self) -> f64 {
        self.last_epoch_mse
    }

    /// Returns the lowest epoch MSE that counted as an improvement.
    ///
    /// # Returns
    /// `+inf` if no epoch ever improved (e.g. the MSE was `NaN` throughout).
    pub fn best_epoch_mse(&self) -> f64 {
        self.best_epoch_mse
    }

    /// Returns whether the MSE plateau ended training before `max_epochs`.
    pub fn early_stopped(&self) -> bool {
        self.early_stopped
    }
}
