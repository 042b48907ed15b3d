//! CSV cache for the sales dataset.

use super::{generate_synthetic_data, DataError, GeneratorConfig};
use crate::models::SalesRecord;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Load the sales data from disk, generating it on first run.
///
/// With `force_regenerate` any existing CSV is ignored and overwritten.
pub fn load_sales_data(
    path: &Path,
    config: &GeneratorConfig,
    force_regenerate: bool,
) -> Result<Vec<SalesRecord>, DataError> {
    if path.exists() && !force_regenerate {
        let records = read_csv(path)?;
        info!("Loaded {} rows from {}", records.len(), path.display());
        return Ok(records);
    }

    info!("Generating synthetic dataset at {}", path.display());
    let records = generate_synthetic_data(config)?;
    write_csv(path, &records)?;
    Ok(records)
}

/// Read dataset rows from a CSV file with a header row.
pub fn read_csv(path: &Path) -> Result<Vec<SalesRecord>, DataError> {
    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let records = reader
        .deserialize()
        .collect::<Result<Vec<SalesRecord>, _>>()
        .map_err(csv_err)?;

    Ok(records)
}

/// Write dataset rows to a CSV file, creating parent directories.
pub fn write_csv(path: &Path, records: &[SalesRecord]) -> Result<(), DataError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| DataError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
