//! `key=value` reports with floats printed at full round-trip precision.
use std::{
    fmt,
    time::{Duration, Instant},
};

use log::info;

use crate::{config::TrainerConfig, error::Result, evaluation::Metrics, training::Trainer};

/// Significant decimal digits needed to reconstruct any `f64` exactly.
pub const SIGNIFICANT_DIGITS: usize = 17;

/// Formats `value` with 17 significant digits, shaped like C's `%.17g`.
///
/// Fixed notation is used for decimal exponents in `[-4, 17)`, scientific
/// notation otherwise; trailing zeros are dropped in both.
///
/// ```
/// use linreg_sgd::report::format_full_precision;
///
/// assert_eq!(format_full_precision(0.6), "0.59999999999999998");
/// assert_eq!(format_full_precision(1e20), "1e+20");
/// ```
pub fn format_full_precision(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    if (-4..SIGNIFICANT_DIGITS as i32).contains(&exp) {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exp) as usize;
        let fixed = format!("{value:.decimals$}");
        return strip_trailing_zeros(&fixed).to_string();
    }

    let sign = if exp < 0 { '-' } else { '+' };
    format!(
        "{}e{sign}{:02}",
        strip_trailing_zeros(mantissa),
        exp.unsigned_abs()
    )
}

fn strip_trailing_zeros(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }

    s.trim_end_matches('0').trim_end_matches('.')
}

/// Output of a `train` run.
#[derive(Debug, Clone, Copy)]
pub struct TrainingReport {
    pub slope: f64,
    pub intercept: f64,
    pub training_time: Duration,
    pub metrics: Metrics,
}

impl TrainingReport {
    /// Fits a fresh trainer built from `config` and evaluates it on the
    /// training data. Only the fit itself is timed.
    pub fn run(xs: &[f64], ys: &[f64], config: &TrainerConfig) -> Result<Self> {
        let start = Instant::now();
        let mut trainer = Trainer::from_config(config);
        trainer.fit(xs, ys)?;
        let training_time = start.elapsed();

        if let Some(stats) = trainer.last_fit() {
            info!(
                epochs = stats.epochs(),
                early_stopped = stats.early_stopped();
                "training done"
            );
        }

        let metrics = Metrics::evaluate(xs, ys, trainer.slope(), trainer.intercept())?;

        Ok(Self {
            slope: trainer.slope(),
            intercept: trainer.intercept(),
            training_time,
            metrics,
        })
    }

    /// Whole milliseconds spent in `fit`.
    pub fn training_time_ms(&self) -> u64 {
        u64::try_from(self.training_time.as_millis()).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "slope={}", format_full_precision(self.slope))?;
        writeln!(f, "intercept={}", format_full_precision(self.intercept))?;
        writeln!(f, "training_time_ms={}", self.training_time_ms())?;
        writeln!(f, "mse={}", format_full_precision(self.metrics.mse))?;
        writeln!(f, "r_squared={}", format_full_precision(self.metrics.r_squared))
    }
}

/// Output of a `predict` run.
#[derive(Debug, Clone, Copy)]
pub struct PredictionReport {
    pub prediction: f64,
}

impl fmt::Display for PredictionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "prediction={}", format_full_precision(self.prediction))
    }
}
