/// Minimum drop in epoch MSE that counts as an improvement.
pub const TOLERANCE: f64 = 1e-6;

/// Consecutive non-improving epochs after which training stops.
pub const PATIENCE: usize = 5;

/// Plateau detector over the epoch MSE.
///
/// An epoch improves when its MSE is below `best - tolerance`; anything else
/// counts as a stall. Training should stop once `patience` stalls happen in a
/// row. The state lives for a single `fit` call.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    tolerance: f64,
    patience: usize,
    best_mse: f64,
    stall_count: usize,
}

impl Default for EarlyStopping {
    fn default() -> Self {
        Self::new(TOLERANCE, PATIENCE)
    }
}

impl EarlyStopping {
    /// Creates a new detector.
    ///
    /// # Arguments
    /// * `tolerance` - Minimum MSE drop that resets the stall counter.
    /// * `patience` - Number of stalls in a row that ends training.
    pub fn new(tolerance: f64, patience: usize) -> Self {
        Self {
            tolerance,
            patience,
            best_mse: f64::INFINITY,
            stall_count: 0,
        }
    }

    /// Records an epoch MSE.
    ///
    /// # Returns
    /// `true` if training should stop after this epoch.
    pub fn should_stop(&mut self, epoch_mse: f64) -> bool {
        if epoch_mse < self.best_mse - self.tolerance {
            self.best_mse = epoch_mse;
            self.stall_count = 0;
            return false;
        }

        self.stall_count += 1;
        self.stall_count >= self.patience
    }

    /// Best epoch MSE seen so far, `+inf` before the first improvement.
    #[inline]
    pub fn best_mse(&self) -> f64 {
        self.best_mse
    }

    #[inline]
    pub fn stall_count(&self) -> usize {
        self.stall_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn improving_sequence_never_stops() {
        let mut es = EarlyStopping::default();

        for mse in [10.0, 5.0, 2.0, 1.0, 0.5, 0.25, 0.1] {
            assert!(!es.should_stop(mse));
        }

        assert_eq!(es.best_mse(), 0.1);
        assert_eq!(es.stall_count(), 0);
    }

    #[test]
    fn stops_after_exactly_patience_stalls() {
        let mut es = EarlyStopping::new(TOLERANCE, 5);

        assert!(!es.should_stop(1.0));
        for _ in 0..4 {
            assert!(!es.should_stop(1.0));
        }
        assert!(es.should_stop(1.0));
        assert_eq!(es.stall_count(), 5);
    }

    #[test]
    fn drop_within_tolerance_is_a_stall() {
        let mut es = EarlyStopping::new(1e-6, 2);

        assert!(!es.should_stop(1.0));
        assert!(!es.should_stop(1.0 - 5e-7));
        assert!(es.should_stop(1.0 - 9e-7));
        assert_eq!(es.best_mse(), 1.0);
    }

    #[test]
    fn improvement_resets_the_counter() {
        let mut es = EarlyStopping::new(1e-6, 3);

        assert!(!es.should_stop(1.0));
        assert!(!es.should_stop(1.2));
        assert!(!es.should_stop(1.1));
        assert_eq!(es.stall_count(), 2);

        assert!(!es.should_stop(0.5));
        assert_eq!(es.stall_count(), 0);

        assert!(!es.should_stop(0.6));
        assert!(!es.should_stop(0.7));
        assert!(es.should_stop(0.8));
        assert_eq!(es.best_mse(), 0.5);
    }

    #[test]
    fn nan_never_improves() {
        let mut es = EarlyStopping::new(1e-6, 2);

        assert!(!es.should_stop(f64::NAN));
        assert!(es.should_stop(f64::NAN));
        assert!(es.best_mse().is_infinite());
    }
}
