mod ops;

pub use ops::{BatchGradient, REDUCE_CHUNK_LEN};

/// y = slope*x + intercept
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearModel {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    #[inline]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Signed residual `prediction - y` for a single sample.
    #[inline]
    pub fn residual(&self, x: f64, y: f64) -> f64 {
        self.predict(x) - y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_predicts_zero() {
        let model = LinearModel::default();
        assert_eq!(model.predict(123.0), 0.0);
    }

    #[test]
    fn predict_and_residual() {
        let model = LinearModel::new(2.0, 1.0);
        assert_eq!(model.predict(3.0), 7.0);
        assert_eq!(model.residual(3.0, 5.0), 2.0);
    }
}
