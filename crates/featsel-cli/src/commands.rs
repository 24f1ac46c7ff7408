//! Command implementations.

use crate::error::{CliError, Result};
use crate::output;
use crate::SearchArgs;
use featsel::config::ExperimentConfig;
use featsel::data::synthetic::MajorityVote;
use featsel::data::{CsvProvider, Dataset, DatasetProvider};
use featsel::experiment::Experiment;
use featsel::metaheuristics::StopSignal;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// `featsel run`
pub(crate) fn run(
    data: &Path,
    label: &str,
    drop: &[String],
    standardize: bool,
    search: &SearchArgs,
) -> Result<()> {
    if !data.is_file() {
        return Err(CliError::FileNotFound(data.to_path_buf()));
    }
    let dataset = CsvProvider::new(data, label)
        .with_drop(drop)
        .with_standardize(standardize)
        .load_dataset()?;
    search_dataset(&dataset, search)
}

/// `featsel synthetic`
pub(crate) fn synthetic(
    rows: usize,
    features: usize,
    noise: f64,
    seed: u64,
    search: &SearchArgs,
) -> Result<()> {
    let generator = MajorityVote::new(rows)
        .with_n_features(features)
        .with_label_noise(noise)
        .with_seed(seed);
    output::kv("informative", format!("{:?}", generator.informative()));
    let dataset = generator.load_dataset()?;
    search_dataset(&dataset, search)
}

/// `featsel config`
pub(crate) fn config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::default(),
    };
    print!("{}", config.to_toml_string()?);
    Ok(())
}

/// File configuration (or defaults) with the flags applied on top.
pub(crate) fn effective_config(search: &SearchArgs) -> Result<ExperimentConfig> {
    let mut config = match &search.config {
        Some(path) if !path.is_file() => return Err(CliError::FileNotFound(path.clone())),
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::default(),
    };
    if let Some(ratio) = search.train_ratio {
        config.train_ratio = ratio;
    }
    if let Some(trees) = search.search_trees {
        config.search_trees = trees;
    }
    if let Some(trees) = search.final_trees {
        config.final_trees = trees;
    }
    if let Some(threads) = search.threads {
        config.n_threads = threads;
    }
    if search.timeout_secs.is_some() {
        config.timeout_secs = search.timeout_secs;
    }
    config.validate()?;
    Ok(config)
}

fn search_dataset(dataset: &Dataset, search: &SearchArgs) -> Result<()> {
    let config = effective_config(search)?;
    let stop = config
        .timeout()
        .map_or_else(StopSignal::never, StopSignal::with_timeout);

    output::section("Dataset");
    output::kv("rows", dataset.n_samples());
    output::kv("features", dataset.n_features());
    output::kv("classes", dataset.class_names().join(", "));

    let experiment = Experiment::with_forest(config)?;
    let outcome = experiment.run(dataset, &search.optimizers, &stop)?;

    output::section("Comparison");
    println!("{}", outcome.report);
    output::summary(&outcome);

    if let Some(path) = &search.output {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &outcome)?;
        output::kv("written", path.display());
    }

    if outcome.report.n_failed() == outcome.report.rows.len() {
        return Err(CliError::AllFailed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use featsel::experiment::OptimizerKind;

    fn args() -> SearchArgs {
        SearchArgs {
            config: None,
            optimizers: OptimizerKind::ALL.to_vec(),
            output: None,
            timeout_secs: None,
            train_ratio: None,
            search_trees: None,
            final_trees: None,
            threads: None,
        }
    }

    #[test]
    fn test_defaults_without_file_or_flags() {
        let config = effective_config(&args()).expect("defaults");
        assert_eq!(config, ExperimentConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("exp.toml");
        std::fs::write(&path, "search_trees = 10\nfinal_trees = 20\n").expect("write");

        let mut search = args();
        search.config = Some(path);
        search.final_trees = Some(70);
        search.timeout_secs = Some(5);

        let config = effective_config(&search).expect("valid");
        assert_eq!(config.search_trees, 10);
        assert_eq!(config.final_trees, 70);
        assert_eq!(config.timeout_secs, Some(5));
    }

    #[test]
    fn test_invalid_override_is_config_error() {
        let mut search = args();
        search.train_ratio = Some(1.5);
        let err = effective_config(&search).expect_err("out of range");
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let mut search = args();
        search.config = Some("/nonexistent/featsel.toml".into());
        let err = effective_config(&search).expect_err("missing");
        assert!(matches!(err, CliError::FileNotFound(_)));
    }
}
