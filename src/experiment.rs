//! End-to-end run: split, search with every optimizer concurrently,
//! re-score, compare.
//!
//! # Example
//!
//! ```
//! use featsel::classifier::StubClassifier;
//! use featsel::config::ExperimentConfig;
//! use featsel::data::synthetic::MajorityVote;
//! use featsel::data::DatasetProvider;
//! use featsel::experiment::{Experiment, OptimizerKind};
//! use featsel::metaheuristics::StopSignal;
//!
//! let ds = MajorityVote::new(150).with_seed(1).load_dataset().expect("dataset");
//! let experiment = Experiment::new(ExperimentConfig::default(), StubClassifier::new());
//! let outcome = experiment
//!     .run(&ds, &OptimizerKind::ALL, &StopSignal::never())
//!     .expect("valid configuration");
//! assert_eq!(outcome.report.rows.len(), 3);
//! ```

use crate::classifier::{ForestClassifier, ProbabilisticClassifier};
use crate::config::ExperimentConfig;
use crate::data::Dataset;
use crate::error::{FeatselError, Result};
use crate::fitness::FitnessEvaluator;
use crate::metaheuristics::{
    GeneticAlgorithm, OptimizerResult, ParticleSwarm, SimulatedAnnealing, StopSignal,
    SubsetOptimizer,
};
use crate::model_selection::{stratified_split, Split};
use crate::report::{ComparisonReport, ResultAggregator};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// The available search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OptimizerKind {
    /// Genetic algorithm
    Ga,
    /// Particle swarm
    Pso,
    /// Simulated annealing
    Sa,
}

impl OptimizerKind {
    /// Every strategy, in report order.
    pub const ALL: [Self; 3] = [Self::Ga, Self::Pso, Self::Sa];

    /// Name used in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ga => "GA",
            Self::Pso => "PSO",
            Self::Sa => "SA",
        }
    }

    /// Build the optimizer from its section of `config`.
    #[must_use]
    pub fn build(self, config: &ExperimentConfig) -> Box<dyn SubsetOptimizer> {
        match self {
            Self::Ga => Box::new(GeneticAlgorithm::new(config.ga.clone())),
            Self::Pso => Box::new(ParticleSwarm::new(config.pso.clone())),
            Self::Sa => Box::new(SimulatedAnnealing::new(config.sa.clone())),
        }
    }
}

impl FromStr for OptimizerKind {
    type Err = FeatselError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ga" | "genetic" => Ok(Self::Ga),
            "pso" | "swarm" => Ok(Self::Pso),
            "sa" | "annealing" => Ok(Self::Sa),
            other => Err(FeatselError::config("optimizer", other, "one of ga, pso, sa")),
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentOutcome {
    /// Final comparison table.
    pub report: ComparisonReport,
    /// Search results of the optimizers that finished, with traces.
    pub results: Vec<OptimizerResult>,
    /// Fitness calls across all optimizers, final evaluations included.
    pub evaluations: usize,
    /// Wall-clock duration of the run in seconds.
    pub elapsed_secs: f64,
}

/// A configured experiment around one classifier.
#[derive(Debug)]
pub struct Experiment<C> {
    config: ExperimentConfig,
    evaluator: FitnessEvaluator<C>,
}

impl Experiment<ForestClassifier> {
    /// Experiment backed by the random forest, sized by `config.n_threads`.
    ///
    /// # Errors
    ///
    /// Returns an error if the training pool cannot be built.
    pub fn with_forest(config: ExperimentConfig) -> Result<Self> {
        let forest = ForestClassifier::new(config.n_threads)?;
        Ok(Self::new(config, forest))
    }
}

impl<C: ProbabilisticClassifier> Experiment<C> {
    #[must_use]
    pub fn new(config: ExperimentConfig, classifier: C) -> Self {
        let evaluator = FitnessEvaluator::new(classifier).with_seed(config.search_seed);
        Self { config, evaluator }
    }

    #[must_use]
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    #[must_use]
    pub fn evaluator(&self) -> &FitnessEvaluator<C> {
        &self.evaluator
    }

    /// Split `dataset` and run `kinds`.
    ///
    /// # Errors
    ///
    /// Configuration and split errors abort the whole run. Optimizer
    /// failures do not: they appear as failed rows of the report.
    pub fn run(
        &self,
        dataset: &Dataset,
        kinds: &[OptimizerKind],
        stop: &StopSignal,
    ) -> Result<ExperimentOutcome> {
        self.config.validate()?;
        if kinds.is_empty() {
            return Err(FeatselError::config("optimizers", "[]", "at least one"));
        }
        let split = stratified_split(dataset, self.config.train_ratio, self.config.split_seed)?;
        self.run_on_split(&split, kinds, stop)
    }

    /// Run `kinds` concurrently on a fixed split.
    ///
    /// # Errors
    ///
    /// Returns a configuration error before any optimizer starts.
    pub fn run_on_split(
        &self,
        split: &Split,
        kinds: &[OptimizerKind],
        stop: &StopSignal,
    ) -> Result<ExperimentOutcome> {
        self.config.validate()?;
        let started = Instant::now();
        let objective = self.evaluator.bind(split, self.config.search_trees);

        tracing::info!(
            optimizers = ?kinds,
            features = split.n_features(),
            train_rows = split.train_y.len(),
            test_rows = split.test_y.len(),
            "starting search"
        );

        let outcomes: Vec<(OptimizerKind, Result<OptimizerResult>)> = std::thread::scope(|scope| {
            let handles: Vec<_> = kinds
                .iter()
                .map(|&kind| {
                    let mut optimizer = kind.build(&self.config);
                    let objective = &objective;
                    let handle = scope.spawn(move || optimizer.optimize(objective, stop));
                    (kind, handle)
                })
                .collect();
            handles
                .into_iter()
                .map(|(kind, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(FeatselError::Aborted {
                            reason: format!("{kind} worker panicked"),
                        })
                    });
                    (kind, result)
                })
                .collect()
        });

        let mut aggregator = ResultAggregator::new(&self.evaluator, split, self.config.final_trees);
        let mut results = Vec::new();
        for (kind, outcome) in outcomes {
            if let Ok(result) = &outcome {
                results.push(result.clone());
            }
            aggregator.record(outcome, kind.as_str());
        }
        let report = aggregator.finish();

        let elapsed_secs = started.elapsed().as_secs_f64();
        tracing::info!(
            failed = report.n_failed(),
            evaluations = self.evaluator.evaluations(),
            elapsed_secs,
            "search complete"
        );
        Ok(ExperimentOutcome {
            report,
            results,
            evaluations: self.evaluator.evaluations(),
            elapsed_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::StubClassifier;
    use crate::data::synthetic::MajorityVote;
    use crate::data::DatasetProvider;
    use crate::report::ComparisonRow;

    fn dataset() -> Dataset {
        MajorityVote::new(120).with_seed(8).load_dataset().expect("dataset")
    }

    #[test]
    fn test_optimizer_kind_parse() {
        assert_eq!("GA".parse::<OptimizerKind>().expect("ga"), OptimizerKind::Ga);
        assert_eq!(" pso ".parse::<OptimizerKind>().expect("pso"), OptimizerKind::Pso);
        assert_eq!("annealing".parse::<OptimizerKind>().expect("sa"), OptimizerKind::Sa);
        assert!("tabu".parse::<OptimizerKind>().is_err());
    }

    #[test]
    fn test_rows_follow_requested_order() {
        let experiment = Experiment::new(ExperimentConfig::default(), StubClassifier::new());
        let kinds = [OptimizerKind::Sa, OptimizerKind::Ga];
        let outcome = experiment
            .run(&dataset(), &kinds, &StopSignal::never())
            .expect("run");
        let names: Vec<&str> = outcome.report.rows.iter().map(ComparisonRow::optimizer).collect();
        assert_eq!(names, vec!["SA", "GA"]);
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(
            outcome.evaluations,
            outcome.results.iter().map(|r| r.evaluations).sum::<usize>() + 2
        );
    }

    #[test]
    fn test_invalid_config_aborts_before_search() {
        let mut config = ExperimentConfig::default();
        config.ga.population_size = 0;
        let experiment = Experiment::new(config, StubClassifier::new());
        let err = experiment
            .run(&dataset(), &OptimizerKind::ALL, &StopSignal::never())
            .expect_err("invalid");
        assert!(err.is_configuration());
        assert_eq!(experiment.evaluator().evaluations(), 0);
    }

    #[test]
    fn test_cancelled_run_reports_every_optimizer_failed() {
        let experiment = Experiment::new(ExperimentConfig::default(), StubClassifier::new());
        let stop = StopSignal::never();
        stop.cancel();
        let outcome = experiment
            .run(&dataset(), &OptimizerKind::ALL, &stop)
            .expect("optimizer failures are rows");
        assert_eq!(outcome.report.n_failed(), 3);
        assert!(outcome.results.is_empty());
    }
}
