//! Linear autoregressive regressor
//!
//! Predicts the next scaled value as a weighted sum of the window plus a
//! bias. Trained with the same loop as the recurrent model; useful as a
//! cheap baseline and as a drop-in replacement behind `SequenceRegressor`.

use crate::config::ForecastConfig;
use crate::error::Result;
use crate::models::training::{self, Differentiable};
use crate::models::{
    check_input_width, common_width, CancelFlag, FittedRegressor, SequenceRegressor,
    TrainingSettings,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use sales_math::Window;

/// Linear autoregression model
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    /// Name of the model
    name: String,
    settings: TrainingSettings,
}

/// Trained linear autoregression model
#[derive(Debug, Clone)]
pub struct TrainedLinear {
    name: String,
    /// Lag weights followed by the bias
    params: Vec<f64>,
    loss_history: Vec<f64>,
}

#[derive(Debug)]
struct LinearNetwork {
    params: Vec<f64>,
}

impl LinearNetwork {
    fn forward(params: &[f64], inputs: &[f64]) -> f64 {
        let (weights, bias) = params.split_at(params.len() - 1);
        weights.iter().zip(inputs).map(|(w, x)| w * x).sum::<f64>() + bias[0]
    }
}

impl Differentiable for LinearNetwork {
    fn parameters(&self) -> &[f64] {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut [f64] {
        &mut self.params
    }

    fn accumulate_gradient(
        &self,
        inputs: &[f64],
        target: f64,
        batch_len: usize,
        grad: &mut [f64],
    ) -> f64 {
        let prediction = Self::forward(&self.params, inputs);
        let d_output = 2.0 * (prediction - target) / batch_len as f64;

        let bias = grad.len() - 1;
        for (g, x) in grad[..bias].iter_mut().zip(inputs) {
            *g += d_output * x;
        }
        grad[bias] += d_output;

        prediction
    }
}

impl LinearRegressor {
    /// Create a new linear regressor
    pub fn new(settings: TrainingSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            name: "Linear Autoregression".to_string(),
            settings,
        })
    }

    /// Create a regressor from forecast configuration
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        Self::new(TrainingSettings::from(config))
    }
}

impl SequenceRegressor for LinearRegressor {
    type Fitted = TrainedLinear;

    fn fit(&self, windows: &[Window], cancel: &CancelFlag) -> Result<Self::Fitted> {
        let width = common_width(windows)?;

        let mut rng = StdRng::seed_from_u64(self.settings.seed);
        let limit = 1.0 / width as f64;
        let dist = Uniform::new_inclusive(-limit, limit);
        let mut params: Vec<f64> = (0..width).map(|_| dist.sample(&mut rng)).collect();
        params.push(0.0);

        let mut network = LinearNetwork { params };
        let loss_history =
            training::train(&mut network, windows, &self.settings, &mut rng, cancel)?;

        Ok(TrainedLinear {
            name: self.name.clone(),
            params: network.params,
            loss_history,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedLinear {
    /// Lag weights, oldest input first
    pub fn weights(&self) -> &[f64] {
        &self.params[..self.params.len() - 1]
    }

    pub fn bias(&self) -> f64 {
        self.params[self.params.len() - 1]
    }
}

impl FittedRegressor for TrainedLinear {
    fn predict(&self, inputs: &[f64]) -> Result<f64> {
        check_input_width(self.params.len() - 1, inputs)?;
        Ok(LinearNetwork::forward(&self.params, inputs))
    }

    fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    fn name(&self) -> &str {
        &self.name
    }
}
