//! Final comparison of the optimizers' best subsets.
//!
//! The search budget is deliberately small and noisy, so every winning mask
//! is retrained once at a larger final budget before it is compared. A run
//! that failed, during search or during this final pass, still gets a row
//! naming the optimizer and the error.

use crate::classifier::ProbabilisticClassifier;
use crate::error::{FeatselError, Result};
use crate::fitness::FitnessEvaluator;
use crate::metaheuristics::OptimizerResult;
use crate::model_selection::Split;
use serde::Serialize;
use std::fmt;

/// One line of the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonRow {
    /// The optimizer finished and its subset was re-scored.
    Completed {
        /// Optimizer name.
        optimizer: String,
        /// Macro-F1 at the final budget.
        macro_f1: f64,
        /// Score the optimizer reported during search.
        search_score: f64,
        /// Number of selected columns.
        n_features: usize,
        /// Names of the selected columns.
        features: Vec<String>,
        /// Fitness calls the search consumed.
        evaluations: usize,
    },
    /// The optimizer or its final evaluation failed.
    Failed {
        /// Optimizer name.
        optimizer: String,
        /// Error message.
        error: String,
    },
}

impl ComparisonRow {
    /// Optimizer this row belongs to.
    #[must_use]
    pub fn optimizer(&self) -> &str {
        match self {
            Self::Completed { optimizer, .. } | Self::Failed { optimizer, .. } => optimizer,
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Table of final scores, one row per optimizer in recording order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Tree budget of the final models.
    pub final_budget: usize,
    /// Rows in recording order.
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonReport {
    /// Row for `optimizer`, if recorded.
    #[must_use]
    pub fn row(&self, optimizer: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.optimizer() == optimizer)
    }

    /// Number of failed rows.
    #[must_use]
    pub fn n_failed(&self) -> usize {
        self.rows.iter().filter(|r| r.is_failed()).count()
    }

    /// Completed row with the highest final macro-F1; fewer features wins
    /// a tie.
    #[must_use]
    pub fn best(&self) -> Option<&ComparisonRow> {
        self.rows
            .iter()
            .filter_map(|r| match r {
                ComparisonRow::Completed {
                    macro_f1,
                    n_features,
                    ..
                } => Some((r, *macro_f1, *n_features)),
                ComparisonRow::Failed { .. } => None,
            })
            .fold(None::<(&ComparisonRow, f64, usize)>, |best, cur| match best {
                Some(b) if b.1 > cur.1 || (b.1 == cur.1 && b.2 <= cur.2) => Some(b),
                _ => Some(cur),
            })
            .map(|(r, _, _)| r)
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:>10} {:>10} {:>10}  {}",
            "Optimizer", "Macro-F1", "Search", "Features", "Selected"
        )?;
        writeln!(f, "{}", "-".repeat(64))?;
        for row in &self.rows {
            match row {
                ComparisonRow::Completed {
                    optimizer,
                    macro_f1,
                    search_score,
                    n_features,
                    features,
                    ..
                } => writeln!(
                    f,
                    "{optimizer:<10} {macro_f1:>10.4} {search_score:>10.4} {n_features:>10}  {}",
                    features.join(", ")
                )?,
                ComparisonRow::Failed { optimizer, error } => {
                    writeln!(f, "{optimizer:<10} {:>10} {:>10} {:>10}  {error}", "FAILED", "-", "-")?;
                }
            }
        }
        write!(f, "(final models: {} trees)", self.final_budget)
    }
}

/// Collects optimizer outcomes and re-scores each winning mask.
pub struct ResultAggregator<'a, C> {
    evaluator: &'a FitnessEvaluator<C>,
    split: &'a Split,
    final_budget: usize,
    rows: Vec<ComparisonRow>,
}

impl<'a, C: ProbabilisticClassifier> ResultAggregator<'a, C> {
    #[must_use]
    pub fn new(evaluator: &'a FitnessEvaluator<C>, split: &'a Split, final_budget: usize) -> Self {
        Self {
            evaluator,
            split,
            final_budget,
            rows: Vec::new(),
        }
    }

    /// Record one optimizer's outcome.
    ///
    /// A successful search is retrained at the final budget. Any error
    /// becomes a `Failed` row; nothing is retried.
    pub fn record(&mut self, result: Result<OptimizerResult>, optimizer: &str) -> &ComparisonRow {
        let row = match result.and_then(|r| self.rescore(&r)) {
            Ok(row) => row,
            Err(err) => {
                tracing::warn!(optimizer, error = %err, "optimizer failed");
                ComparisonRow::Failed {
                    optimizer: optimizer.to_string(),
                    error: err.to_string(),
                }
            }
        };
        self.rows.push(row);
        &self.rows[self.rows.len() - 1]
    }

    fn rescore(&self, result: &OptimizerResult) -> Result<ComparisonRow> {
        if self.final_budget == 0 {
            return Err(FeatselError::config("final_trees", 0, ">= 1"));
        }
        let macro_f1 = self
            .evaluator
            .evaluate(&result.mask, self.split, self.final_budget)?;
        let selected = result.mask.selected();
        tracing::info!(
            optimizer = %result.optimizer,
            macro_f1,
            search_score = result.score,
            n_features = selected.len(),
            "final evaluation"
        );
        Ok(ComparisonRow::Completed {
            optimizer: result.optimizer.clone(),
            macro_f1,
            search_score: result.score,
            n_features: selected.len(),
            features: self.split.selected_names(&selected),
            evaluations: result.evaluations,
        })
    }

    /// Seal the report.
    #[must_use]
    pub fn finish(self) -> ComparisonReport {
        ComparisonReport {
            final_budget: self.final_budget,
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::StubClassifier;
    use crate::encoding::FeatureMask;
    use crate::primitives::Matrix;

    fn split() -> Split {
        Split {
            train_x: Matrix::from_vec(4, 2, vec![0.0, 5.0, 0.1, 3.0, 1.0, 4.0, 1.1, 2.0])
                .expect("4x2"),
            train_y: vec![0, 0, 1, 1],
            test_x: Matrix::from_vec(2, 2, vec![0.05, 1.0, 1.05, 9.0]).expect("2x2"),
            test_y: vec![0, 1],
            n_classes: 2,
            feature_names: vec!["good".into(), "bad".into()],
        }
    }

    fn result(name: &str, mask: FeatureMask) -> OptimizerResult {
        OptimizerResult {
            optimizer: name.into(),
            mask,
            score: 0.75,
            evaluations: 10,
            iterations: 1,
            trace: Vec::new(),
            population: Vec::new(),
        }
    }

    #[test]
    fn test_completed_row_rescored_at_final_budget() {
        let split = split();
        let evaluator = FitnessEvaluator::new(StubClassifier::new());
        let mut agg = ResultAggregator::new(&evaluator, &split, 50);
        agg.record(Ok(result("GA", FeatureMask::from_indices(2, &[0]))), "GA");
        let report = agg.finish();

        match report.row("GA").expect("GA row") {
            ComparisonRow::Completed {
                macro_f1,
                search_score,
                n_features,
                features,
                ..
            } => {
                assert!((macro_f1 - 1.0).abs() < 1e-12);
                assert!((search_score - 0.75).abs() < 1e-12);
                assert_eq!(*n_features, 1);
                assert_eq!(features, &vec!["good".to_string()]);
            }
            ComparisonRow::Failed { error, .. } => panic!("unexpected failure: {error}"),
        }
        assert_eq!(evaluator.classifier().train_calls(), 1);
    }

    #[test]
    fn test_failures_are_attributed() {
        let split = split();
        let evaluator = FitnessEvaluator::new(StubClassifier::new());
        let mut agg = ResultAggregator::new(&evaluator, &split, 50);
        agg.record(
            Err(FeatselError::Aborted {
                reason: "deadline exceeded".into(),
            }),
            "PSO",
        );
        // final evaluation fails on a mask of the wrong length
        agg.record(Ok(result("SA", FeatureMask::all(3))), "SA");
        let report = agg.finish();

        assert_eq!(report.n_failed(), 2);
        assert_eq!(report.rows[0].optimizer(), "PSO");
        assert!(report.to_string().contains("FAILED"));
        assert!(report.to_string().contains("deadline exceeded"));
        assert!(report.best().is_none());
    }

    #[test]
    fn test_best_prefers_fewer_features_on_tie() {
        let report = ComparisonReport {
            final_budget: 50,
            rows: vec![
                ComparisonRow::Completed {
                    optimizer: "GA".into(),
                    macro_f1: 0.9,
                    search_score: 0.9,
                    n_features: 4,
                    features: Vec::new(),
                    evaluations: 1,
                },
                ComparisonRow::Completed {
                    optimizer: "SA".into(),
                    macro_f1: 0.9,
                    search_score: 0.8,
                    n_features: 3,
                    features: Vec::new(),
                    evaluations: 1,
                },
            ],
        };
        assert_eq!(report.best().map(ComparisonRow::optimizer), Some("SA"));
    }

    #[test]
    fn test_report_serializes_with_status_tag() {
        let report = ComparisonReport {
            final_budget: 50,
            rows: vec![ComparisonRow::Failed {
                optimizer: "GA".into(),
                error: "boom".into(),
            }],
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["rows"][0]["status"], "failed");
        assert_eq!(json["final_budget"], 50);
    }
}
