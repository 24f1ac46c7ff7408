//! featsel - feature-subset search from the command line
//!
//! Usage:
//!   featsel run --data iris.csv --label species        # GA, PSO and SA on a CSV file
//!   featsel run --data d.csv --label y --drop id -o out.json
//!   featsel synthetic --rows 300 --seed 7              # majority-vote toy problem
//!   featsel config --config exp.toml                   # print effective configuration

use clap::{Args, Parser, Subcommand};
use featsel::experiment::OptimizerKind;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(name = "featsel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a CSV dataset
    Run {
        /// CSV file with a header row
        #[arg(long, value_name = "FILE")]
        data: PathBuf,

        /// Label column
        #[arg(long)]
        label: String,

        /// Identifier columns to ignore
        #[arg(long, value_delimiter = ',')]
        drop: Vec<String>,

        /// Keep raw feature values instead of z-scores
        #[arg(long)]
        no_standardize: bool,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Search the synthetic majority-vote dataset
    Synthetic {
        /// Number of rows
        #[arg(long, default_value = "300")]
        rows: usize,

        /// Number of feature columns
        #[arg(long, default_value = "10")]
        features: usize,

        /// Fraction of flipped labels
        #[arg(long, default_value = "0.0")]
        noise: f64,

        /// Dataset seed
        #[arg(long, default_value = "0")]
        seed: u64,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// Flags shared by every search command. Set flags override the file.
#[derive(Args, Debug, Clone)]
pub(crate) struct SearchArgs {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Optimizers to run
    #[arg(long, value_delimiter = ',', default_value = "ga,pso,sa")]
    pub optimizers: Vec<OptimizerKind>,

    /// Write the report and traces as JSON
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Wall-clock limit for the search
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Fraction of each class used for training
    #[arg(long)]
    pub train_ratio: Option<f64>,

    /// Trees per fitness evaluation
    #[arg(long)]
    pub search_trees: Option<usize>,

    /// Trees per final model
    #[arg(long)]
    pub final_trees: Option<usize>,

    /// Forest training threads (0 = one per core)
    #[arg(long)]
    pub threads: Option<usize>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            data,
            label,
            drop,
            no_standardize,
            search,
        } => commands::run(&data, &label, &drop, !no_standardize, &search),
        Commands::Synthetic {
            rows,
            features,
            noise,
            seed,
            search,
        } => commands::synthetic(rows, features, noise, seed, &search),
        Commands::Config { config } => commands::config(config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e);
            e.exit_code()
        }
    }
}
