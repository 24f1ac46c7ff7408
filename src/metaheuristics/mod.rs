//! Derivative-free searches over feature subsets.
//!
//! Three strategies share one objective, [`SubsetObjective`], and one
//! result type, [`OptimizerResult`]:
//!
//! - [`GeneticAlgorithm`]: roulette selection, single-point crossover and
//!   bit-flip mutation over bit strings
//! - [`ParticleSwarm`]: SPSO 2011 style swarm in the box `[0, 1]^n`
//! - [`SimulatedAnnealing`]: generalized annealing on a single trajectory
//!   in `[0, 1]^n`
//!
//! The continuous searches minimize; they reach the objective through
//! [`minimization_target`], which decodes a point and negates its fitness.
//! Reported scores are always on the maximized scale.
//!
//! # Example
//!
//! ```
//! use featsel::encoding::FeatureMask;
//! use featsel::metaheuristics::{
//!     FnObjective, GaConfig, GeneticAlgorithm, StopSignal, SubsetOptimizer,
//! };
//!
//! // fraction of columns selected
//! let objective = FnObjective::new(8, |m: &FeatureMask| Ok(m.count() as f64 / 8.0));
//! let mut ga = GeneticAlgorithm::new(GaConfig::default().with_seed(7));
//! let result = ga.optimize(&objective, &StopSignal::never()).expect("search");
//! assert!(result.score >= 0.75);
//! ```
//!
//! # References
//!
//! - Holland (1975): Adaptation in Natural and Artificial Systems
//! - Clerc (2012): Standard Particle Swarm Optimisation (SPSO 2011)
//! - Tsallis & Stariolo (1996): Generalized Simulated Annealing

mod ga;
mod pso;
mod sa;
mod stop;
mod traits;

pub use ga::{GaConfig, GeneticAlgorithm};
pub use pso::{ParticleSwarm, PsoConfig};
pub use sa::{SaConfig, SimulatedAnnealing};
pub use stop::StopSignal;
pub use traits::{
    minimization_target, FnObjective, OptimizerResult, SubsetObjective, SubsetOptimizer,
    TracePoint,
};

use crate::encoding::FeatureMask;
use crate::error::{FeatselError, Result};
use rayon::prelude::*;

/// Score masks in parallel, each slot written by its own task.
fn evaluate_masks(
    objective: &dyn SubsetObjective,
    stop: &StopSignal,
    masks: &[FeatureMask],
) -> Result<Vec<f64>> {
    masks
        .par_iter()
        .map(|mask| {
            stop.check()?;
            objective.fitness(mask)
        })
        .collect()
}

/// Minimization values of points in parallel.
fn evaluate_points(
    objective: &dyn SubsetObjective,
    stop: &StopSignal,
    points: &[Vec<f64>],
) -> Result<Vec<f64>> {
    points
        .par_iter()
        .map(|x| {
            stop.check()?;
            minimization_target(objective, x)
        })
        .collect()
}

fn require_features(objective: &dyn SubsetObjective) -> Result<usize> {
    match objective.n_features() {
        0 => Err(FeatselError::config("n_features", 0, ">= 1")),
        n => Ok(n),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Index of the largest value; ties go to the lowest index.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}
