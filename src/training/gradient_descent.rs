use crate::model::{BatchGradient, LinearModel};

/// Gradient descent update rule.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    learning_rate: f64,
}

impl GradientDescent {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    /// Takes a step in the opposite direction of the batch gradient.
    ///
    /// # Arguments
    /// * `model` - The parameters that are going to be modified.
    /// * `grad` - The fully reduced gradient of the last batch.
    pub fn update_params(&self, model: &mut LinearModel, grad: &BatchGradient) {
        let lr = self.learning_rate;

        model.slope -= lr * grad.slope_grad();
        model.intercept -= lr * grad.intercept_grad();
    }
}
