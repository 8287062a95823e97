//! Adam optimizer over a flat parameter vector

/// Adaptive moment estimation with bias correction
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    first_moment: Vec<f64>,
    second_moment: Vec<f64>,
    steps: i32,
}

impl Adam {
    /// Create an optimizer for `n_params` parameters with the usual moment decay rates
    pub fn new(learning_rate: f64, n_params: usize) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            first_moment: vec![0.0; n_params],
            second_moment: vec![0.0; n_params],
            steps: 0,
        }
    }

    /// Number of updates applied so far
    pub fn steps(&self) -> i32 {
        self.steps
    }

    /// Apply one update to `params` using `grads`
    pub fn step(&mut self, params: &mut [f64], grads: &[f64]) {
        debug_assert_eq!(params.len(), grads.len());
        debug_assert_eq!(params.len(), self.first_moment.len());

        self.steps = self.steps.saturating_add(1);
        let correction1 = 1.0 - self.beta1.powi(self.steps);
        let correction2 = 1.0 - self.beta2.powi(self.steps);
        let step_size = self.learning_rate * correction2.sqrt() / correction1;

        for (((p, &g), m), v) in params
            .iter_mut()
            .zip(grads)
            .zip(self.first_moment.iter_mut())
            .zip(self.second_moment.iter_mut())
        {
            *m = self.beta1 * *m + (1.0 - self.beta1) * g;
            *v = self.beta2 * *v + (1.0 - self.beta2) * g * g;
            *p -= step_size * *m / (v.sqrt() + self.epsilon);
        }
    }
}
