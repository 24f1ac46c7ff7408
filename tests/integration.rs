//! Integration tests for featsel.
//!
//! End-to-end workflows: load or generate a dataset, split it, search with
//! every optimizer and re-score the winners.

use featsel::prelude::*;
use std::io::Write;

const INFORMATIVE: [usize; 3] = [2, 5, 7];

fn majority_vote() -> Dataset {
    MajorityVote::new(300)
        .with_seed(11)
        .load_dataset()
        .expect("synthetic dataset")
}

#[test]
fn test_forest_search_recovers_informative_features() {
    let dataset = majority_vote();
    let config = ExperimentConfig {
        n_threads: 2,
        ..ExperimentConfig::default()
    };
    let experiment = Experiment::with_forest(config).expect("thread pool");
    let outcome = experiment
        .run(&dataset, &OptimizerKind::ALL, &StopSignal::never())
        .expect("valid run");

    assert_eq!(outcome.report.n_failed(), 0, "{}", outcome.report);
    assert_eq!(outcome.results.len(), 3);

    for result in &outcome.results {
        let hits = INFORMATIVE
            .iter()
            .filter(|&&i| result.mask.is_selected(i))
            .count();
        assert!(
            hits >= 2,
            "{} selected {} ({hits} informative)",
            result.optimizer,
            result.mask
        );
        assert!(result.mask.count() < 10, "{} kept every feature", result.optimizer);
        assert!((0.0..=1.0).contains(&result.score));
    }

    for row in &outcome.report.rows {
        match row {
            ComparisonRow::Completed {
                macro_f1,
                n_features,
                features,
                ..
            } => {
                assert!((0.0..=1.0).contains(macro_f1));
                assert_eq!(*n_features, features.len());
            }
            ComparisonRow::Failed { .. } => unreachable!("no failures expected"),
        }
    }
}

#[test]
fn test_wrong_length_mask_is_an_error() {
    let dataset = majority_vote();
    let split = stratified_split(&dataset, 0.7, 123).expect("split");
    let evaluator = FitnessEvaluator::new(ForestClassifier::new(1).expect("pool"));

    let err = evaluator
        .evaluate(&FeatureMask::all(8), &split, 5)
        .expect_err("8 of 10 columns");
    assert!(matches!(
        err,
        FeatselError::InvalidMaskLength {
            expected: 10,
            actual: 8
        }
    ));
    assert_eq!(evaluator.evaluations(), 1);
}

#[test]
fn test_empty_mask_never_trains() {
    let dataset = majority_vote();
    let split = stratified_split(&dataset, 0.7, 123).expect("split");
    let evaluator = FitnessEvaluator::new(StubClassifier::new());

    let score = evaluator
        .evaluate(&FeatureMask::none(10), &split, 25)
        .expect("empty mask");
    assert_eq!(score, 0.0);
    assert_eq!(evaluator.classifier().train_calls(), 0);
}

#[test]
fn test_csv_pipeline_with_dropped_identifier() {
    let dataset = majority_vote();
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    let header: Vec<String> = std::iter::once("id".to_string())
        .chain(dataset.names().iter().cloned())
        .chain(std::iter::once("label".to_string()))
        .collect();
    writeln!(file, "{}", header.join(",")).expect("write header");
    for (row, &label) in dataset.y().iter().enumerate() {
        let values: Vec<String> = dataset.x().row(row).iter().map(f32::to_string).collect();
        writeln!(
            file,
            "r{row},{},{}",
            values.join(","),
            dataset.class_names()[label]
        )
        .expect("write row");
    }
    file.flush().expect("flush");

    let loaded = CsvProvider::new(file.path(), "label")
        .with_drop(["id"])
        .load_dataset()
        .expect("csv dataset");
    assert_eq!(loaded.n_features(), 10);
    assert_eq!(loaded.n_samples(), 300);
    assert_eq!(loaded.y(), dataset.y());

    let experiment = Experiment::new(ExperimentConfig::default(), StubClassifier::new());
    let outcome = experiment
        .run(&loaded, &[OptimizerKind::Ga], &StopSignal::never())
        .expect("valid run");
    assert_eq!(outcome.report.rows.len(), 1);
    assert!(!outcome.report.rows[0].is_failed());

    let json = serde_json::to_value(&outcome).expect("serializable");
    assert_eq!(json["report"]["rows"][0]["status"], "completed");
    assert_eq!(json["report"]["rows"][0]["optimizer"], "GA");
}

#[test]
fn test_expired_deadline_fails_every_row() {
    let dataset = majority_vote();
    let experiment = Experiment::new(ExperimentConfig::default(), StubClassifier::new());
    let stop = StopSignal::with_timeout(std::time::Duration::ZERO);
    let outcome = experiment
        .run(&dataset, &OptimizerKind::ALL, &stop)
        .expect("failures become rows");
    assert_eq!(outcome.report.n_failed(), 3);
    assert!(outcome.report.best().is_none());
}
