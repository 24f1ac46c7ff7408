//! featsel: metaheuristic feature-subset search in pure Rust.
//!
//! Finds a small, high-scoring subset of input columns for a multi-class
//! classification task. Three interchangeable searches (genetic algorithm,
//! particle swarm, simulated annealing) share one fitness evaluator that
//! trains a random forest on the selected columns and scores macro-F1 on a
//! held-out fold.
//!
//! # Quick Start
//!
//! ```
//! use featsel::prelude::*;
//!
//! let dataset = MajorityVote::new(150).with_seed(4).load_dataset().expect("dataset");
//! let split = stratified_split(&dataset, 0.7, 123).expect("split");
//!
//! let evaluator = FitnessEvaluator::new(StubClassifier::new());
//! let objective = evaluator.bind(&split, 25);
//!
//! let mut ga = GeneticAlgorithm::new(GaConfig::default());
//! let result = ga.optimize(&objective, &StopSignal::never()).expect("search");
//! assert!((0.0..=1.0).contains(&result.score));
//! assert_eq!(result.mask.len(), 10);
//! ```
//!
//! # Modules
//!
//! - [`data`]: datasets and providers (CSV, synthetic majority vote)
//! - [`model_selection`]: stratified train/test split
//! - [`classifier`]: probabilistic classifier capability (forest, stub)
//! - [`tree`]: CART decision tree and bagged random forest
//! - [`metrics`]: accuracy, confusion matrix, macro-F1
//! - [`encoding`]: feature masks and continuous decoding
//! - [`fitness`]: the subset fitness evaluator
//! - [`metaheuristics`]: GA, PSO and SA over feature masks
//! - [`report`]: final re-scoring and comparison table
//! - [`experiment`]: concurrent end-to-end runs
//! - [`config`]: TOML experiment configuration

pub mod classifier;
pub mod config;
pub mod data;
pub mod encoding;
pub mod error;
pub mod experiment;
pub mod fitness;
pub mod metaheuristics;
pub mod metrics;
pub mod model_selection;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod report;
pub mod tree;

pub use error::{FeatselError, Result};
pub use primitives::Matrix;
