//! Core traits shared by the subset optimizers.

use super::StopSignal;
use crate::encoding::{decode_continuous, FeatureMask};
use crate::error::Result;
use serde::Serialize;

/// A fitness landscape over feature masks. Higher is better.
pub trait SubsetObjective: Sync {
    /// Mask length every call must use.
    fn n_features(&self) -> usize;

    /// Score a mask.
    ///
    /// # Errors
    ///
    /// Implementations fail on structurally invalid masks; optimizers abort
    /// on the first error.
    fn fitness(&self, mask: &FeatureMask) -> Result<f64>;
}

/// Adapts a closure into a [`SubsetObjective`].
///
/// # Example
///
/// ```
/// use featsel::encoding::FeatureMask;
/// use featsel::metaheuristics::{FnObjective, SubsetObjective};
///
/// let ones = FnObjective::new(4, |m: &FeatureMask| Ok(m.count() as f64 / 4.0));
/// assert_eq!(ones.fitness(&FeatureMask::all(4)).expect("valid"), 1.0);
/// ```
pub struct FnObjective<F> {
    n_features: usize,
    f: F,
}

impl<F> FnObjective<F>
where
    F: Fn(&FeatureMask) -> Result<f64> + Sync,
{
    pub fn new(n_features: usize, f: F) -> Self {
        Self { n_features, f }
    }
}

impl<F> SubsetObjective for FnObjective<F>
where
    F: Fn(&FeatureMask) -> Result<f64> + Sync,
{
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn fitness(&self, mask: &FeatureMask) -> Result<f64> {
        (self.f)(mask)
    }
}

/// Value a minimizing search sees at `params`: the decoded mask's fitness,
/// negated.
///
/// # Errors
///
/// Propagates the objective's error.
pub fn minimization_target(objective: &dyn SubsetObjective, params: &[f64]) -> Result<f64> {
    let mask = decode_continuous(params);
    Ok(-objective.fitness(&mask)?)
}

/// Per-iteration convergence record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TracePoint {
    /// Generation / iteration, starting at 0 for the initial population.
    pub iteration: usize,
    /// Mean fitness of the population (GA, PSO) or current fitness (SA).
    pub mean: f64,
    /// Best fitness seen so far.
    pub best: f64,
}

/// Outcome of one optimizer run.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizerResult {
    /// Optimizer name (`"GA"`, `"PSO"`, `"SA"`).
    pub optimizer: String,
    /// Best mask observed.
    pub mask: FeatureMask,
    /// Its fitness, on the maximized scale.
    pub score: f64,
    /// Fitness calls consumed.
    pub evaluations: usize,
    /// Generations / iterations completed.
    pub iterations: usize,
    /// Convergence trace.
    pub trace: Vec<TracePoint>,
    /// Final population snapshot (GA only).
    pub population: Vec<FeatureMask>,
}

impl OptimizerResult {
    /// How many masks in the final population select each column.
    ///
    /// Empty when the optimizer keeps no population.
    #[must_use]
    pub fn selection_frequency(&self) -> Vec<usize> {
        if self.population.is_empty() {
            return Vec::new();
        }
        let mut counts = vec![0usize; self.mask.len()];
        for member in &self.population {
            for i in member.selected() {
                if let Some(c) = counts.get_mut(i) {
                    *c += 1;
                }
            }
        }
        counts
    }
}

/// A search strategy over feature masks.
pub trait SubsetOptimizer: Send {
    /// Display name used in reports.
    fn name(&self) -> &'static str;

    /// Maximize `objective`, checking `stop` between evaluations.
    ///
    /// # Errors
    ///
    /// Returns the first objective error, or
    /// [`FeatselError::Aborted`](crate::error::FeatselError::Aborted) when `stop`
    /// fires.
    fn optimize(
        &mut self,
        objective: &dyn SubsetObjective,
        stop: &StopSignal,
    ) -> Result<OptimizerResult>;
}
