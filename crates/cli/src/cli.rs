use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Reference integrity validator.
///
/// Classifies every reference in a dataset by the current identity state
/// of its target entity.
#[derive(Parser, Debug)]
#[command(name = "refguard", version, about = "Reference integrity validator")]
pub struct CliArgs {
    /// Maximum number of classification tasks in flight.
    /// Overrides REFGUARD_MAX_CONCURRENCY.
    #[arg(long, global = true)]
    pub max_concurrency: Option<String>,

    /// Report format
    #[arg(long, value_enum, global = true, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the references in a JSON dataset file
    Validate {
        /// Dataset with `entities`, `split_map` and `references`
        dataset: PathBuf,
    },
    /// Run the built-in split scenario and show results before and after
    Demo,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}
