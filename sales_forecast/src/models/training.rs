//! Mini-batch gradient descent loop shared by the trainable regressors

use crate::error::{ForecastError, Result};
use crate::models::optimizer::Adam;
use crate::models::{CancelFlag, TrainingSettings};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sales_math::Window;
use tracing::{debug, trace};

/// A model whose MSE gradient can be computed one window at a time
pub(crate) trait Differentiable {
    fn parameters(&self) -> &[f64];

    fn parameters_mut(&mut self) -> &mut [f64];

    /// Add the gradient of `(prediction - target)^2 / batch_len` into `grad`
    ///
    /// Returns the prediction made before the update.
    fn accumulate_gradient(
        &self,
        inputs: &[f64],
        target: f64,
        batch_len: usize,
        grad: &mut [f64],
    ) -> f64;
}

/// Rescale `grad` so its L2 norm does not exceed `max_norm`
pub(crate) fn clip_global_norm(grad: &mut [f64], max_norm: f64) {
    if max_norm <= 0.0 {
        return;
    }

    let norm = grad.iter().map(|g| g * g).sum::<f64>().sqrt();
    if norm > max_norm {
        let scale = max_norm / norm;
        grad.iter_mut().for_each(|g| *g *= scale);
    }
}

/// Fit `model` on `windows` and return the mean loss of every epoch
pub(crate) fn train<M: Differentiable>(
    model: &mut M,
    windows: &[Window],
    settings: &TrainingSettings,
    rng: &mut StdRng,
    cancel: &CancelFlag,
) -> Result<Vec<f64>> {
    if windows.is_empty() {
        return Err(ForecastError::EmptyTrainSet);
    }

    let n_params = model.parameters().len();
    let mut optimizer = Adam::new(settings.learning_rate, n_params);
    let mut grad = vec![0.0; n_params];
    let mut order: Vec<usize> = (0..windows.len()).collect();
    let mut history = Vec::with_capacity(settings.epochs);

    for epoch in 0..settings.epochs {
        if cancel.is_cancelled() {
            return Err(ForecastError::Cancelled { epoch });
        }

        if settings.shuffle {
            order.shuffle(rng);
        }

        let mut squared_error = 0.0;
        for batch in order.chunks(settings.batch_size) {
            grad.iter_mut().for_each(|g| *g = 0.0);

            for &index in batch {
                let window = &windows[index];
                let prediction =
                    model.accumulate_gradient(&window.inputs, window.target, batch.len(), &mut grad);
                squared_error += (prediction - window.target).powi(2);
            }

            clip_global_norm(&mut grad, settings.gradient_clip);
            optimizer.step(model.parameters_mut(), &grad);
        }

        let loss = squared_error / windows.len() as f64;
        if !loss.is_finite() {
            return Err(ForecastError::TrainingFailed(format!(
                "loss became non-finite at epoch {}",
                epoch + 1
            )));
        }

        trace!(epoch = epoch + 1, loss, "completed training epoch");
        history.push(loss);
    }

    if model.parameters().iter().any(|p| !p.is_finite()) {
        return Err(ForecastError::TrainingFailed(
            "model weights became non-finite".to_string(),
        ));
    }

    debug!(
        epochs = history.len(),
        windows = windows.len(),
        final_loss = history.last().copied().unwrap_or(f64::NAN),
        "training finished"
    );

    Ok(history)
}
