//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use featsel::prelude::*;
//! ```

pub use crate::classifier::{ClassModel, ForestClassifier, ProbabilisticClassifier, StubClassifier};
pub use crate::config::ExperimentConfig;
pub use crate::data::synthetic::MajorityVote;
pub use crate::data::{CsvProvider, Dataset, DatasetProvider};
pub use crate::encoding::{decode_continuous, encode_ga, FeatureMask};
pub use crate::error::{FeatselError, Result};
pub use crate::experiment::{Experiment, ExperimentOutcome, OptimizerKind};
pub use crate::fitness::FitnessEvaluator;
pub use crate::metaheuristics::{
    GaConfig, GeneticAlgorithm, OptimizerResult, ParticleSwarm, PsoConfig, SaConfig,
    SimulatedAnnealing, StopSignal, SubsetObjective, SubsetOptimizer,
};
pub use crate::metrics::macro_f1;
pub use crate::model_selection::{stratified_split, Split};
pub use crate::primitives::Matrix;
pub use crate::report::{ComparisonReport, ComparisonRow};
