//! Generalized simulated annealing on a single trajectory in `[0, 1]^n`.

use super::{minimization_target, require_features};
use super::{OptimizerResult, StopSignal, SubsetObjective, SubsetOptimizer, TracePoint};
use crate::encoding::decode_continuous;
use crate::error::{FeatselError, Result};
use crate::primitives::randn;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// SA parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaConfig {
    /// Total objective calls, including the starting point.
    pub max_call: usize,
    /// Starting temperature `T0`.
    pub initial_temp: f64,
    /// Visiting parameter `qv` of the cooling schedule, in (1, 3).
    pub visit: f64,
    /// Acceptance parameter `qa`; 1 gives the classic Metropolis rule.
    pub accept: f64,
    /// Gaussian step size at `T0`.
    pub step_scale: f64,
    /// Random seed.
    pub seed: u64,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            max_call: 150,
            initial_temp: 5230.0,
            visit: 2.62,
            accept: -5.0,
            step_scale: 0.25,
            seed: 42,
        }
    }
}

impl SaConfig {
    #[must_use]
    pub fn with_max_call(mut self, max_call: usize) -> Self {
        self.max_call = max_call;
        self
    }

    #[must_use]
    pub fn with_initial_temp(mut self, temp: f64) -> Self {
        self.initial_temp = temp;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks ranges.
    ///
    /// # Errors
    ///
    /// Returns [`FeatselError::ConfigurationError`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.max_call == 0 {
            return Err(FeatselError::config("sa.max_call", self.max_call, ">= 1"));
        }
        if !(self.initial_temp > 0.0 && self.initial_temp.is_finite()) {
            return Err(FeatselError::config(
                "sa.initial_temp",
                self.initial_temp,
                "finite and > 0",
            ));
        }
        if !(self.visit > 1.0 && self.visit < 3.0) {
            return Err(FeatselError::config("sa.visit", self.visit, "in (1, 3)"));
        }
        if !(self.accept.is_finite() && self.accept <= 1.0) {
            return Err(FeatselError::config("sa.accept", self.accept, "finite and <= 1"));
        }
        if !(self.step_scale > 0.0 && self.step_scale <= 1.0) {
            return Err(FeatselError::config("sa.step_scale", self.step_scale, "in (0, 1]"));
        }
        Ok(())
    }

    /// Temperature at step `k >= 1`:
    /// `T0 * (2^(qv-1) - 1) / ((1 + k)^(qv-1) - 1)`.
    #[must_use]
    pub fn temperature(&self, k: usize) -> f64 {
        let e = self.visit - 1.0;
        let k = k.max(1) as f64;
        self.initial_temp * (2f64.powf(e) - 1.0) / ((1.0 + k).powf(e) - 1.0)
    }

    /// Probability of moving uphill by `delta > 0` at step `k`.
    ///
    /// Tsallis acceptance at temperature `T(k) / (k + 1)`; reduces to
    /// `exp(-delta / T)` when `qa = 1`.
    #[must_use]
    pub fn acceptance(&self, delta: f64, k: usize) -> f64 {
        if delta <= 0.0 {
            return 1.0;
        }
        let t = self.temperature(k) / (k as f64 + 1.0);
        let one_minus_qa = 1.0 - self.accept;
        if one_minus_qa.abs() < 1e-12 {
            return (-delta / t).exp();
        }
        let base = 1.0 - one_minus_qa * delta / t;
        if base <= 0.0 {
            0.0
        } else {
            (base.ln() / one_minus_qa).exp().min(1.0)
        }
    }
}

/// Single-trajectory annealer.
///
/// Each proposal adds Gaussian noise of scale
/// `step_scale * sqrt(T(k) / T0)` to every coordinate and redraws one
/// random coordinate uniformly, then clamps to the box. The trajectory
/// keeps the best point it ever visited.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    config: SaConfig,
}

impl SimulatedAnnealing {
    #[must_use]
    pub fn new(config: SaConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    fn propose(&self, current: &[f64], k: usize, rng: &mut impl Rng) -> Vec<f64> {
        let sigma =
            self.config.step_scale * (self.config.temperature(k) / self.config.initial_temp).sqrt();
        let mut next: Vec<f64> = current
            .iter()
            .map(|&x| (x + sigma * randn(rng)).clamp(0.0, 1.0))
            .collect();
        let d = rng.gen_range(0..next.len());
        next[d] = rng.gen();
        next
    }
}

impl SubsetOptimizer for SimulatedAnnealing {
    fn name(&self) -> &'static str {
        "SA"
    }

    fn optimize(
        &mut self,
        objective: &dyn SubsetObjective,
        stop: &StopSignal,
    ) -> Result<OptimizerResult> {
        self.config.validate()?;
        let dim = require_features(objective)?;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        tracing::info!(
            max_call = self.config.max_call,
            features = dim,
            "SA started"
        );

        stop.check()?;
        let mut current: Vec<f64> = (0..dim).map(|_| rng.gen()).collect();
        let mut current_value = minimization_target(objective, &current)?;
        let mut best = current.clone();
        let mut best_value = current_value;
        let mut trace = vec![TracePoint {
            iteration: 0,
            mean: -current_value,
            best: -best_value,
        }];

        let mut accepted = 0usize;
        for k in 1..self.config.max_call {
            stop.check()?;
            let candidate = self.propose(&current, k, &mut rng);
            let value = minimization_target(objective, &candidate)?;

            let delta = value - current_value;
            if delta <= 0.0 || rng.gen::<f64>() < self.config.acceptance(delta, k) {
                current = candidate;
                current_value = value;
                accepted += 1;
                if current_value < best_value {
                    best_value = current_value;
                    best.clone_from(&current);
                }
            }

            trace.push(TracePoint {
                iteration: k,
                mean: -current_value,
                best: -best_value,
            });
            tracing::trace!(
                step = k,
                temperature = self.config.temperature(k),
                current = -current_value,
                best = -best_value,
                "SA step"
            );
        }

        let mask = decode_continuous(&best);
        let score = -best_value;
        tracing::debug!(accepted, "SA acceptance count");
        tracing::info!(
            score,
            selected = mask.count(),
            evaluations = self.config.max_call,
            "SA finished"
        );
        Ok(OptimizerResult {
            optimizer: self.name().to_string(),
            mask,
            score,
            evaluations: self.config.max_call,
            iterations: self.config.max_call,
            trace,
            population: Vec::new(),
        })
    }
}
