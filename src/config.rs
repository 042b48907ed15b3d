//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.salesbot.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".salesbot.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Query answering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// N used for "top products" questions that do not name one.
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
        }
    }
}

fn default_top_n() -> usize {
    crate::analysis::DEFAULT_TOP_N
}

/// Chart and report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for charts and PDF reports.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Render a chart for each answer.
    #[serde(default = "default_true")]
    pub charts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            charts: true,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_true() -> bool {
    true
}

/// A product the synthetic generator can sell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    pub name: String,
    pub category: String,
    /// Price before random noise is applied.
    pub base_price: f64,
}

impl ProductSpec {
    fn new(name: &str, category: &str, base_price: f64) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            base_price,
        }
    }
}

/// Dataset location and synthetic generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file the dataset is cached in.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// First generated year.
    #[serde(default = "default_start_year")]
    pub start_year: i32,

    /// Last generated year.
    #[serde(default = "default_end_year")]
    pub end_year: i32,

    /// Number of generated rows.
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Generator seed.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Regions orders are spread across.
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,

    /// Product catalogue.
    #[serde(default = "default_products")]
    pub products: Vec<ProductSpec>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            start_year: default_start_year(),
            end_year: default_end_year(),
            rows: default_rows(),
            seed: default_seed(),
            regions: default_regions(),
            products: default_products(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data").join("sales_data.csv")
}

fn default_start_year() -> i32 {
    2021
}

fn default_end_year() -> i32 {
    2024
}

fn default_rows() -> usize {
    800
}

fn default_seed() -> u64 {
    42
}

fn default_regions() -> Vec<String> {
    vec!["North", "South", "East", "West"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_products() -> Vec<ProductSpec> {
    vec![
        ProductSpec::new("Laptop", "Computers", 800.0),
        ProductSpec::new("Desktop", "Computers", 700.0),
        ProductSpec::new("Tablet", "Computers", 300.0),
        ProductSpec::new("Printer", "Accessories", 200.0),
        ProductSpec::new("Monitor", "Accessories", 250.0),
    ]
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only explicitly provided CLI values override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref path) = args.data {
            self.data.path = path.clone();
        }
        if let Some(rows) = args.rows {
            self.data.rows = rows;
        }
        if let Some(seed) = args.seed {
            self.data.seed = seed;
        }

        if let Some(ref dir) = args.output_dir {
            self.output.dir = dir.clone();
        }
        if args.no_chart {
            self.output.charts = false;
        }

        if let Some(top) = args.top {
            self.analysis.default_top_n = top;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Log level after merging: `--quiet` wins, then `--verbose` or
    /// `[general] verbose`.
    pub fn log_level(&self, args: &crate::cli::Args) -> tracing::Level {
        if args.quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            args.log_level()
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
