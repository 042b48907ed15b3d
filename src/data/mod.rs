//! Sales dataset loading and synthetic generation.
//!
//! The dataset is generated once from a fixed seed, cached as CSV and
//! treated as read-only for the rest of the process.

pub mod generator;
pub mod loader;

pub use generator::*;
pub use loader::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while producing or reading the dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid generator settings: {0}")]
    InvalidSettings(String),
}
