//! Data models for the sales chatbot.
//!
//! This module contains the dataset row, the parsed query and the
//! aggregation result types shared by the interpreter, the analytics
//! engine and the report renderers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Round a currency amount to 2 decimals.
///
/// Rounds on the exact binary value with ties to even, so `225.125`
/// becomes `225.12`.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// A single row of the sales dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Date the order was placed.
    pub order_date: NaiveDate,
    /// Calendar year of the order.
    pub year: i32,
    /// Calendar month of the order (1-12).
    pub month: u32,
    /// Sales region (e.g. "North").
    pub region: String,
    /// Product name.
    pub product: String,
    /// Product category.
    pub category: String,
    /// Units sold (at least 1).
    pub quantity: u32,
    /// Price per unit.
    pub unit_price: f64,
    /// quantity × unit_price.
    pub total_sales: f64,
}

/// The classified purpose of a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    TotalSales,
    TopProducts,
    SalesByRegion,
    MonthlyTrend,
    YearComparison,
    Unknown,
}

impl Intent {
    /// Returns the snake_case name used in file names and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::TotalSales => "total_sales",
            Intent::TopProducts => "top_products",
            Intent::SalesByRegion => "sales_by_region",
            Intent::MonthlyTrend => "monthly_trend",
            Intent::YearComparison => "year_comparison",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intent plus the entities extracted from a user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub intent: Intent,
    /// Years mentioned in the message, ascending and de-duplicated.
    pub years: Vec<i32>,
    /// Regions mentioned in the message, title-cased and de-duplicated.
    pub regions: Vec<String>,
    /// Requested N for "top N" questions.
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub product: String,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSales {
    pub region: String,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSales {
    pub month: u32,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSales {
    pub year: i32,
    pub total_sales: f64,
}

/// Aggregated table produced by an aggregator.
///
/// Each variant carries the fixed columns of one intent, so a table can
/// never mix columns from different queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "rows", rename_all = "snake_case")]
pub enum ResultTable {
    /// Single row, single `total_sales` column.
    Total(f64),
    Products(Vec<ProductSales>),
    Regions(Vec<RegionSales>),
    Monthly(Vec<MonthSales>),
    Yearly(Vec<YearSales>),
}

impl ResultTable {
    /// Column names of this table, in order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ResultTable::Total(_) => &["total_sales"],
            ResultTable::Products(_) => &["product", "total_sales"],
            ResultTable::Regions(_) => &["region", "total_sales"],
            ResultTable::Monthly(_) => &["month", "total_sales"],
            ResultTable::Yearly(_) => &["year", "total_sales"],
        }
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        match self {
            ResultTable::Total(_) => 1,
            ResultTable::Products(rows) => rows.len(),
            ResultTable::Regions(rows) => rows.len(),
            ResultTable::Monthly(rows) => rows.len(),
            ResultTable::Yearly(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows as (label, value) pairs, for charts and plain-text rendering.
    pub fn points(&self) -> Vec<(String, f64)> {
        match self {
            ResultTable::Total(total) => vec![("total_sales".to_string(), *total)],
            ResultTable::Products(rows) => rows
                .iter()
                .map(|r| (r.product.clone(), r.total_sales))
                .collect(),
            ResultTable::Regions(rows) => rows
                .iter()
                .map(|r| (r.region.clone(), r.total_sales))
                .collect(),
            ResultTable::Monthly(rows) => rows
                .iter()
                .map(|r| (r.month.to_string(), r.total_sales))
                .collect(),
            ResultTable::Yearly(rows) => rows
                .iter()
                .map(|r| (r.year.to_string(), r.total_sales))
                .collect(),
        }
    }
}

/// Tabular result plus the metadata needed by the summarizer and renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub intent: Intent,
    pub table: ResultTable,
    /// Year filters actually applied.
    pub years: Vec<i32>,
    /// Regions actually covered.
    pub regions: Vec<String>,
    /// Human-readable label of the query.
    pub description: String,
}

/// A complete answer to a single question, as emitted by one-shot mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerReport {
    /// The question as typed by the user.
    pub question: String,
    /// When the answer was produced.
    pub generated_at: DateTime<Utc>,
    /// Insight sentence for the result.
    pub summary: String,
    /// Chart image, if one was rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_path: Option<String>,
    pub result: AnalysisResult,
}
