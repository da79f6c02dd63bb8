//! Univariate linear regression fitted with mini-batch SGD.
//!
//! ```
//! use linreg_sgd::{Trainer, evaluation};
//!
//! let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let ys = [3.0, 5.0, 7.0, 9.0, 11.0];
//!
//! let mut trainer = Trainer::new(0.05, 2000, 32);
//! trainer.fit(&xs, &ys)?;
//!
//! let mse = evaluation::mean_squared_error(&xs, &ys, trainer.slope(), trainer.intercept())?;
//! assert!(mse < 1e-2);
//! # Ok::<(), linreg_sgd::RegressionErr>(())
//! ```
pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod model;
pub mod report;
pub mod server;
pub mod training;

pub use config::TrainerConfig;
pub use error::{RegressionErr, Result};
pub use evaluation::Metrics;
pub use model::LinearModel;
pub use training::{FitStats, Trainer};
