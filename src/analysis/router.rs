//! Dispatch from a parsed query to an aggregator.

use super::aggregator::{
    monthly_trend, sales_by_region, top_n_products, total_sales, year_comparison,
};
use crate::models::{AnalysisResult, Intent, ParsedQuery, SalesRecord};
use tracing::debug;

/// N used for "top products" questions that do not name one.
pub const DEFAULT_TOP_N: usize = 5;

/// Route a parsed query to the matching aggregator.
///
/// Returns `None` for [`Intent::Unknown`].
pub fn route(
    data: &[SalesRecord],
    parsed: &ParsedQuery,
    default_top_n: usize,
) -> Option<AnalysisResult> {
    let years = parsed.years.as_slice();
    let regions = parsed.regions.as_slice();
    let first_region = regions.first().map(String::as_str);

    debug!("Routing intent {}", parsed.intent);

    let result = match parsed.intent {
        Intent::TotalSales => total_sales(data, years, regions),
        Intent::TopProducts => {
            let n = parsed.top_n.unwrap_or(default_top_n);
            top_n_products(data, n, years, regions)
        }
        Intent::SalesByRegion => sales_by_region(data, years),
        Intent::MonthlyTrend => monthly_trend(data, years.first().copied(), first_region),
        Intent::YearComparison => year_comparison(data, years, first_region),
        Intent::Unknown => return None,
    };

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{generate_synthetic_data, GeneratorConfig};
    use crate::models::ResultTable;
    use crate::query::parse_user_message;

    fn dataset() -> Vec<SalesRecord> {
        generate_synthetic_data(&GeneratorConfig::default()).unwrap()
    }

    fn query(intent: Intent, years: &[i32], regions: &[&str], top_n: Option<usize>) -> ParsedQuery {
        ParsedQuery {
            intent,
            years: years.to_vec(),
            regions: regions.iter().map(|s| s.to_string()).collect(),
            top_n,
        }
    }

    #[test]
    fn test_unknown_has_no_result() {
        let data = dataset();
        assert!(route(&data, &query(Intent::Unknown, &[2023], &[], None), DEFAULT_TOP_N).is_none());
    }

    #[test]
    fn test_top_products_default_n() {
        let data = dataset();
        let result = route(&data, &query(Intent::TopProducts, &[], &[], None), 2).unwrap();
        assert_eq!(result.description, "Top 2 products by sales");
        assert_eq!(result.table.len(), 2);

        let result = route(&data, &query(Intent::TopProducts, &[], &[], Some(3)), 2).unwrap();
        assert_eq!(result.table.len(), 3);
    }

    #[test]
    fn test_top_products_fewer_groups_than_n() {
        let data: Vec<SalesRecord> = dataset()
            .into_iter()
            .filter(|r| ["Laptop", "Tablet", "Monitor"].contains(&r.product.as_str()))
            .collect();
        let result = route(&data, &query(Intent::TopProducts, &[], &[], Some(5)), DEFAULT_TOP_N)
            .unwrap();
        assert_eq!(result.table.len(), 3);
    }

    #[test]
    fn test_sales_by_region_ignores_regions() {
        let data = dataset();
        let result = route(
            &data,
            &query(Intent::SalesByRegion, &[2022], &["North"], None),
            DEFAULT_TOP_N,
        )
        .unwrap();
        assert_eq!(result.table.len(), 4);
        assert_eq!(result.regions.len(), 4);
    }

    #[test]
    fn test_monthly_trend_uses_first_year_and_region() {
        let data = dataset();
        let result = route(
            &data,
            &query(Intent::MonthlyTrend, &[2022, 2024], &["South", "West"], None),
            DEFAULT_TOP_N,
        )
        .unwrap();
        assert_eq!(result.years, vec![2022]);
        assert_eq!(result.regions, vec!["South".to_string()]);
        assert_eq!(result.description, "Monthly sales trend for 2022 in South");
    }

    #[test]
    fn test_year_comparison_single_year_falls_back() {
        let data = dataset();
        let parsed = parse_user_message("compare 2023 sales");
        assert_eq!(parsed.intent, Intent::YearComparison);

        let result = route(&data, &parsed, DEFAULT_TOP_N).unwrap();
        assert_eq!(result.years, vec![2021, 2022, 2023, 2024]);
    }

    #[test]
    fn test_total_sales_for_message() {
        let data = dataset();
        let parsed = parse_user_message("total revenue in 2023");
        let result = route(&data, &parsed, DEFAULT_TOP_N).unwrap();

        let expected: f64 = data
            .iter()
            .filter(|r| r.year == 2023)
            .map(|r| r.total_sales)
            .sum();
        match result.table {
            ResultTable::Total(total) => assert!((total - expected).abs() < 0.01),
            other => panic!("unexpected table: {:?}", other),
        }
    }

    #[test]
    fn test_route_is_deterministic() {
        let data = dataset();
        let parsed = parse_user_message("Monthly trend for 2024 in South");
        assert_eq!(
            route(&data, &parsed, DEFAULT_TOP_N),
            route(&data, &parsed, DEFAULT_TOP_N)
        );
    }
}
