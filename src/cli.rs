//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Salesbot - offline chatbot for sales data analysis
///
/// Ask questions about total sales, top products, regional sales,
/// monthly trends or year comparisons. Answers come with a chart and
/// can be exported as a PDF report.
///
/// Examples:
///   salesbot
///   salesbot --ask "Top 3 products in 2023"
///   salesbot --ask "Compare 2022 vs 2023" --format json
///   salesbot --regenerate --rows 2000 --seed 7
///   salesbot --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset CSV file
    ///
    /// Generated on first run if missing. Default: from config or data/sales_data.csv.
    #[arg(long, value_name = "FILE", env = "SALESBOT_DATA")]
    pub data: Option<PathBuf>,

    /// Directory for charts and PDF reports
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Regenerate the synthetic dataset even if the CSV exists
    #[arg(long)]
    pub regenerate: bool,

    /// Number of rows to generate
    #[arg(long, value_name = "COUNT")]
    pub rows: Option<usize>,

    /// Seed for synthetic data generation
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Default N for "top products" questions
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Answer a single question and exit
    #[arg(long, value_name = "QUESTION")]
    pub ask: Option<String>,

    /// Output format for --ask (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Do not render charts
    #[arg(long)]
    pub no_chart: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salesbot.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .salesbot.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for one-shot answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Summary sentence and table (default)
    #[default]
    Text,
    /// JSON document
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.rows == Some(0) {
            return Err("Rows must be at least 1".to_string());
        }

        if self.top == Some(0) {
            return Err("Top N must be at least 1".to_string());
        }

        if let Some(ref question) = self.ask {
            if question.trim().is_empty() {
                return Err("Question passed to --ask must not be empty".to_string());
            }
        }

        if self.format == OutputFormat::Json && self.ask.is_none() {
            return Err("--format json is only supported together with --ask".to_string());
        }

        Ok(())
    }

    /// Flags that only take effect when the dataset is (re)generated.
    pub fn generation_overrides(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.rows.is_some() {
            flags.push("--rows");
        }
        if self.seed.is_some() {
            flags.push("--seed");
        }
        flags
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
