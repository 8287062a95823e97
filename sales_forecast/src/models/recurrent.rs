//! Single-layer recurrent regressor
//!
//! A ReLU recurrent layer reads the window one step at a time; its final
//! hidden state feeds a single linear output unit. Gradients are computed by
//! backpropagation through time and applied with Adam.

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::models::training::{self, Differentiable};
use crate::models::{
    check_input_width, common_width, CancelFlag, FittedRegressor, SequenceRegressor,
    TrainingSettings,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};
use sales_math::Window;

/// Recurrent regressor configuration
#[derive(Debug, Clone)]
pub struct RecurrentRegressor {
    /// Name of the model
    name: String,
    /// Width of the hidden state
    hidden_units: usize,
    /// Gradient descent settings
    settings: TrainingSettings,
}

/// Trained recurrent regressor
#[derive(Debug, Clone)]
pub struct TrainedRecurrent {
    /// Name of the model
    name: String,
    /// Number of input steps the network was trained on
    input_width: usize,
    network: RecurrentNetwork,
    loss_history: Vec<f64>,
}

/// Flat parameter layout: input weights, recurrent weights, hidden bias,
/// output weights, output bias.
#[derive(Debug, Clone)]
struct RecurrentNetwork {
    hidden: usize,
    params: Vec<f64>,
}

impl RecurrentNetwork {
    fn parameter_count(hidden: usize) -> usize {
        hidden + hidden * hidden + hidden + hidden + 1
    }

    fn initialise(hidden: usize, rng: &mut StdRng) -> Result<Self> {
        // Glorot-uniform input and output weights, small recurrent weights
        let input_limit = (6.0 / (1.0 + hidden as f64)).sqrt();
        let input_dist = Uniform::new_inclusive(-input_limit, input_limit);
        let recurrent_dist = Normal::new(0.0, 0.5 / (hidden as f64).sqrt())
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;

        let mut params = Vec::with_capacity(Self::parameter_count(hidden));
        params.extend((0..hidden).map(|_| input_dist.sample(rng)));
        params.extend((0..hidden * hidden).map(|_| recurrent_dist.sample(rng)));
        params.extend(std::iter::repeat(0.0).take(hidden));
        params.extend((0..hidden).map(|_| input_dist.sample(rng)));
        params.push(0.0);

        Ok(Self { hidden, params })
    }

    fn input_weights(&self) -> &[f64] {
        &self.params[..self.hidden]
    }

    fn recurrent_weights(&self) -> &[f64] {
        let start = self.hidden;
        &self.params[start..start + self.hidden * self.hidden]
    }

    fn hidden_bias(&self) -> &[f64] {
        let start = self.hidden + self.hidden * self.hidden;
        &self.params[start..start + self.hidden]
    }

    fn output_weights(&self) -> &[f64] {
        let start = 2 * self.hidden + self.hidden * self.hidden;
        &self.params[start..start + self.hidden]
    }

    fn output_bias(&self) -> f64 {
        self.params[self.params.len() - 1]
    }

    /// Run the sequence and return every hidden state, starting with the zero state
    fn hidden_states(&self, inputs: &[f64]) -> Vec<Vec<f64>> {
        let h = self.hidden;
        let w_in = self.input_weights();
        let w_rec = self.recurrent_weights();
        let bias = self.hidden_bias();

        let mut states = Vec::with_capacity(inputs.len() + 1);
        states.push(vec![0.0; h]);

        for &x in inputs {
            let prev = &states[states.len() - 1];
            let next: Vec<f64> = (0..h)
                .map(|i| {
                    let row = &w_rec[i * h..(i + 1) * h];
                    let recurrent: f64 = row.iter().zip(prev).map(|(w, s)| w * s).sum();
                    (w_in[i] * x + recurrent + bias[i]).max(0.0)
                })
                .collect();
            states.push(next);
        }

        states
    }

    fn output(&self, last_state: &[f64]) -> f64 {
        self.output_weights()
            .iter()
            .zip(last_state)
            .map(|(w, s)| w * s)
            .sum::<f64>()
            + self.output_bias()
    }

    fn forward(&self, inputs: &[f64]) -> f64 {
        let states = self.hidden_states(inputs);
        self.output(&states[states.len() - 1])
    }
}

impl Differentiable for RecurrentNetwork {
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
        let h = self.hidden;
        let w_rec_start = h;
        let bias_start = h + h * h;
        let out_start = 2 * h + h * h;
        let out_bias = grad.len() - 1;

        let states = self.hidden_states(inputs);
        let last = &states[states.len() - 1];
        let prediction = self.output(last);
        let d_output = 2.0 * (prediction - target) / batch_len as f64;

        grad[out_bias] += d_output;
        let w_out = self.output_weights();
        let mut d_hidden: Vec<f64> = (0..h)
            .map(|i| {
                grad[out_start + i] += d_output * last[i];
                d_output * w_out[i]
            })
            .collect();

        let w_rec = self.recurrent_weights();
        for t in (0..inputs.len()).rev() {
            let prev = &states[t];
            let current = &states[t + 1];

            // ReLU passes gradient only where the unit was active
            let d_pre: Vec<f64> = (0..h)
                .map(|i| if current[i] > 0.0 { d_hidden[i] } else { 0.0 })
                .collect();

            for i in 0..h {
                if d_pre[i] == 0.0 {
                    continue;
                }
                grad[i] += d_pre[i] * inputs[t];
                grad[bias_start + i] += d_pre[i];
                let row = w_rec_start + i * h;
                for j in 0..h {
                    grad[row + j] += d_pre[i] * prev[j];
                }
            }

            d_hidden = (0..h)
                .map(|j| (0..h).map(|i| w_rec[i * h + j] * d_pre[i]).sum::<f64>())
                .collect();
        }

        prediction
    }
}

impl RecurrentRegressor {
    /// Create a new recurrent regressor
    pub fn new(hidden_units: usize, settings: TrainingSettings) -> Result<Self> {
        if hidden_units == 0 {
            return Err(ForecastError::InvalidParameter(
                "Hidden units must be positive".to_string(),
            ));
        }
        settings.validate()?;

        Ok(Self {
            name: format!("Recurrent ReLU (hidden={})", hidden_units),
            hidden_units,
            settings,
        })
    }

    /// Create a regressor from forecast configuration
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        Self::new(config.hidden_units, TrainingSettings::from(config))
    }

    /// Width of the hidden state
    pub fn hidden_units(&self) -> usize {
        self.hidden_units
    }

    /// Gradient descent settings
    pub fn settings(&self) -> &TrainingSettings {
        &self.settings
    }
}

impl SequenceRegressor for RecurrentRegressor {
    type Fitted = TrainedRecurrent;

    fn fit(&self, windows: &[Window], cancel: &CancelFlag) -> Result<Self::Fitted> {
        let input_width = common_width(windows)?;

        let mut rng = StdRng::seed_from_u64(self.settings.seed);
        let mut network = RecurrentNetwork::initialise(self.hidden_units, &mut rng)?;
        let loss_history =
            training::train(&mut network, windows, &self.settings, &mut rng, cancel)?;

        Ok(TrainedRecurrent {
            name: self.name.clone(),
            input_width,
            network,
            loss_history,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedRecurrent {
    /// Number of input steps expected by `predict`
    pub fn input_width(&self) -> usize {
        self.input_width
    }
}

impl FittedRegressor for TrainedRecurrent {
    fn predict(&self, inputs: &[f64]) -> Result<f64> {
        check_input_width(self.input_width, inputs)?;
        Ok(self.network.forward(inputs))
    }

    fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    fn name(&self) -> &str {
        &self.name
    }
}
