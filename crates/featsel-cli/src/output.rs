//! Terminal output helpers.

use crate::error::CliError;
use colored::Colorize;
use featsel::experiment::ExperimentOutcome;
use featsel::report::ComparisonRow;

const HISTOGRAM_WIDTH: usize = 30;

/// Print a section header
pub(crate) fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").cyan().bold());
}

/// Print a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

pub(crate) fn error(e: &CliError) {
    eprintln!("{} {e}", "error:".red().bold());
}

/// Winner line plus the GA selection-frequency histogram.
pub(crate) fn summary(outcome: &ExperimentOutcome) {
    if let Some(ComparisonRow::Completed {
        optimizer,
        macro_f1,
        features,
        ..
    }) = outcome.report.best()
    {
        println!(
            "{} {} (macro-F1 {:.4}, {} features: {})",
            "best:".green().bold(),
            optimizer,
            macro_f1,
            features.len(),
            features.join(", ")
        );
    }
    for row in outcome.report.rows.iter().filter(|r| r.is_failed()) {
        println!("{} {}", "failed:".yellow().bold(), row.optimizer());
    }
    kv("evaluations", outcome.evaluations);
    kv("elapsed", format!("{:.2}s", outcome.elapsed_secs));

    for result in &outcome.results {
        let counts = result.selection_frequency();
        if counts.is_empty() {
            continue;
        }
        section(&format!("{} final population", result.optimizer));
        let size = result.population.len();
        for (i, count) in counts.iter().enumerate() {
            let filled = count * HISTOGRAM_WIDTH / size.max(1);
            println!(
                "  {:>4} {:<width$} {count}/{size}",
                i,
                "#".repeat(filled),
                width = HISTOGRAM_WIDTH
            );
        }
    }
}
