//! Seeded synthetic sales data.

use super::DataError;
use crate::config::{DataConfig, ProductSpec};
use crate::models::{round2, SalesRecord};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::debug;

/// Relative standard deviation of the unit price noise.
const PRICE_NOISE: f64 = 0.1;

/// Settings for synthetic data generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// First year (inclusive).
    pub start_year: i32,
    /// Last year (inclusive).
    pub end_year: i32,
    pub regions: Vec<String>,
    pub products: Vec<ProductSpec>,
    /// Number of rows to generate.
    pub rows: usize,
    /// RNG seed; the same seed always yields the same dataset.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::from(&DataConfig::default())
    }
}

impl From<&DataConfig> for GeneratorConfig {
    fn from(config: &DataConfig) -> Self {
        Self {
            start_year: config.start_year,
            end_year: config.end_year,
            regions: config.regions.clone(),
            products: config.products.clone(),
            rows: config.rows,
            seed: config.seed,
        }
    }
}

impl GeneratorConfig {
    fn validate(&self) -> Result<(), DataError> {
        if self.start_year > self.end_year {
            return Err(DataError::InvalidSettings(format!(
                "start_year {} is after end_year {}",
                self.start_year, self.end_year
            )));
        }
        if self.regions.is_empty() {
            return Err(DataError::InvalidSettings(
                "at least one region is required".to_string(),
            ));
        }
        if self.products.is_empty() {
            return Err(DataError::InvalidSettings(
                "at least one product is required".to_string(),
            ));
        }
        if let Some(p) = self.products.iter().find(|p| p.base_price < 0.0) {
            return Err(DataError::InvalidSettings(format!(
                "product {} has a negative base price",
                p.name
            )));
        }
        Ok(())
    }
}

/// Generate a simple, realistic synthetic sales dataset.
pub fn generate_synthetic_data(config: &GeneratorConfig) -> Result<Vec<SalesRecord>, DataError> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let price_factor = Normal::new(1.0, PRICE_NOISE)
        .map_err(|e| DataError::InvalidSettings(format!("price noise: {}", e)))?;
    let mut records = Vec::with_capacity(config.rows);

    for _ in 0..config.rows {
        let year = rng.gen_range(config.start_year..=config.end_year);
        let month = rng.gen_range(1..=12u32);
        // Day 27 at most so every month yields a valid date.
        let day = rng.gen_range(1..28u32);
        let order_date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            DataError::InvalidSettings(format!("year {} is out of range", year))
        })?;

        let region = &config.regions[rng.gen_range(0..config.regions.len())];
        let product = &config.products[rng.gen_range(0..config.products.len())];
        let quantity = rng.gen_range(1..20u32);

        let unit_price = (product.base_price * price_factor.sample(&mut rng)).max(0.0);
        let total_sales = quantity as f64 * unit_price;

        records.push(SalesRecord {
            order_date,
            year,
            month,
            region: region.clone(),
            product: product.name.clone(),
            category: product.category.clone(),
            quantity,
            unit_price: round2(unit_price),
            total_sales: round2(total_sales),
        });
    }

    debug!(
        "Generated {} synthetic rows (seed {})",
        records.len(),
        config.seed
    );

    Ok(records)
}
