mod early_stopping;
mod gradient_descent;
mod stats;
mod trainer;

pub use early_stopping::{EarlyStopping, PATIENCE, TOLERANCE};
pub use gradient_descent::GradientDescent;
pub use stats::FitStats;
pub use trainer::Trainer;
