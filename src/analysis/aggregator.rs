//! Sales aggregation queries.
//!
//! Each aggregator filters the dataset, groups by a single column, sums
//! `total_sales` and returns an intent-specific [`ResultTable`].

use crate::models::{
    round2, AnalysisResult, Intent, MonthSales, ProductSales, RegionSales, ResultTable,
    SalesRecord, YearSales,
};
use std::collections::HashMap;
use std::hash::Hash;

/// Apply optional year and region filters. Empty slices mean no restriction.
pub fn filter_records<'a>(
    data: &'a [SalesRecord],
    years: &[i32],
    regions: &[String],
) -> Vec<&'a SalesRecord> {
    data.iter()
        .filter(|r| years.is_empty() || years.contains(&r.year))
        .filter(|r| regions.is_empty() || regions.contains(&r.region))
        .collect()
}

/// Sum `total_sales` per key, keeping groups in first-encountered order.
fn group_sum<K, F>(rows: &[&SalesRecord], key: F) -> Vec<(K, f64)>
where
    K: Eq + Hash + Clone,
    F: Fn(&SalesRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, f64)> = Vec::new();

    for row in rows {
        let k = key(*row);
        match index.get(&k) {
            Some(&i) => groups[i].1 += row.total_sales,
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, row.total_sales));
            }
        }
    }

    groups
}

/// Stable sort by total, highest first.
fn sort_descending<K>(groups: &mut [(K, f64)]) {
    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Total sales over the filtered rows, rounded to 2 decimals.
pub fn total_sales(data: &[SalesRecord], years: &[i32], regions: &[String]) -> AnalysisResult {
    let rows = filter_records(data, years, regions);
    let total = if rows.is_empty() {
        0.0
    } else {
        rows.iter().map(|r| r.total_sales).sum()
    };

    let mut description = "Total sales".to_string();
    if !years.is_empty() {
        description.push_str(&format!(" for years {}", join(years)));
    }
    if !regions.is_empty() {
        description.push_str(&format!(" in regions {}", join(regions)));
    }

    AnalysisResult {
        intent: Intent::TotalSales,
        table: ResultTable::Total(round2(total)),
        years: years.to_vec(),
        regions: regions.to_vec(),
        description,
    }
}

/// The `n` best-selling products over the filtered rows.
pub fn top_n_products(
    data: &[SalesRecord],
    n: usize,
    years: &[i32],
    regions: &[String],
) -> AnalysisResult {
    let n = n.max(1);
    let rows = filter_records(data, years, regions);
    let mut groups = group_sum(&rows, |r| r.product.clone());
    sort_descending(&mut groups);
    groups.truncate(n);

    let mut description = format!("Top {} products by sales", n);
    if !years.is_empty() {
        description.push_str(&format!(" in years {}", join(years)));
    }
    if !regions.is_empty() {
        description.push_str(&format!(" for regions {}", join(regions)));
    }

    AnalysisResult {
        intent: Intent::TopProducts,
        table: ResultTable::Products(
            groups
                .into_iter()
                .map(|(product, total_sales)| ProductSales {
                    product,
                    total_sales,
                })
                .collect(),
        ),
        years: years.to_vec(),
        regions: regions.to_vec(),
        description,
    }
}

/// Sales per region, highest first. Region filters are not applied.
pub fn sales_by_region(data: &[SalesRecord], years: &[i32]) -> AnalysisResult {
    let rows = filter_records(data, years, &[]);
    let mut groups = group_sum(&rows, |r| r.region.clone());
    sort_descending(&mut groups);

    let mut description = "Sales by region".to_string();
    if !years.is_empty() {
        description.push_str(&format!(" for years {}", join(years)));
    }

    let regions = groups.iter().map(|(region, _)| region.clone()).collect();

    AnalysisResult {
        intent: Intent::SalesByRegion,
        table: ResultTable::Regions(
            groups
                .into_iter()
                .map(|(region, total_sales)| RegionSales {
                    region,
                    total_sales,
                })
                .collect(),
        ),
        years: years.to_vec(),
        regions,
        description,
    }
}

/// Sales per calendar month, January first.
pub fn monthly_trend(
    data: &[SalesRecord],
    year: Option<i32>,
    region: Option<&str>,
) -> AnalysisResult {
    let years: Vec<i32> = year.into_iter().collect();
    let regions: Vec<String> = region.map(str::to_string).into_iter().collect();

    let rows = filter_records(data, &years, &regions);
    let mut groups = group_sum(&rows, |r| r.month);
    groups.sort_by_key(|(month, _)| *month);

    let mut description = "Monthly sales trend".to_string();
    if let Some(year) = year {
        description.push_str(&format!(" for {}", year));
    }
    if let Some(region) = region {
        description.push_str(&format!(" in {}", region));
    }

    AnalysisResult {
        intent: Intent::MonthlyTrend,
        table: ResultTable::Monthly(
            groups
                .into_iter()
                .map(|(month, total_sales)| MonthSales { month, total_sales })
                .collect(),
        ),
        years,
        regions,
        description,
    }
}

/// Year-on-year sales.
///
/// With fewer than two requested years every year in the dataset is
/// compared instead.
pub fn year_comparison(
    data: &[SalesRecord],
    years: &[i32],
    region: Option<&str>,
) -> AnalysisResult {
    let years: Vec<i32> = if years.len() < 2 {
        distinct_years(data)
    } else {
        years.to_vec()
    };
    let regions: Vec<String> = region.map(str::to_string).into_iter().collect();

    let rows = filter_records(data, &years, &regions);
    let mut groups = group_sum(&rows, |r| r.year);
    groups.sort_by_key(|(year, _)| *year);

    let mut description = "Year-on-year sales comparison".to_string();
    if let Some(region) = region {
        description.push_str(&format!(" for region {}", region));
    }

    AnalysisResult {
        intent: Intent::YearComparison,
        table: ResultTable::Yearly(
            groups
                .into_iter()
                .map(|(year, total_sales)| YearSales { year, total_sales })
                .collect(),
        ),
        years,
        regions,
        description,
    }
}

/// All years present in the dataset, ascending.
pub fn distinct_years(data: &[SalesRecord]) -> Vec<i32> {
    let mut years: Vec<i32> = data.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();
    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{generate_synthetic_data, GeneratorConfig};
    use chrono::NaiveDate;

    fn create_test_record(year: i32, month: u32, region: &str, product: &str, total: f64) -> SalesRecord {
        SalesRecord {
            order_date: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            year,
            month,
            region: region.to_string(),
            product: product.to_string(),
            category: "Computers".to_string(),
            quantity: 1,
            unit_price: total,
            total_sales: total,
        }
    }

    fn sample_data() -> Vec<SalesRecord> {
        vec![
            create_test_record(2022, 3, "North", "Laptop", 100.0),
            create_test_record(2022, 1, "South", "Tablet", 50.0),
            create_test_record(2023, 3, "North", "Printer", 30.0),
            create_test_record(2023, 2, "East", "Laptop", 20.0),
            create_test_record(2024, 1, "North", "Tablet", 25.125),
        ]
    }

    fn regions(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_records() {
        let data = sample_data();
        assert_eq!(filter_records(&data, &[], &[]).len(), 5);
        assert_eq!(filter_records(&data, &[2022], &[]).len(), 2);
        assert_eq!(filter_records(&data, &[], &regions(&["North"])).len(), 3);
        assert_eq!(
            filter_records(&data, &[2023, 2024], &regions(&["North"])).len(),
            2
        );
    }

    #[test]
    fn test_total_sales() {
        let data = sample_data();

        let result = total_sales(&data, &[], &[]);
        assert_eq!(result.table, ResultTable::Total(225.12));
        assert_eq!(result.description, "Total sales");

        let result = total_sales(&data, &[2022, 2023], &regions(&["North", "East"]));
        assert_eq!(result.table, ResultTable::Total(150.0));
        assert_eq!(
            result.description,
            "Total sales for years 2022, 2023 in regions North, East"
        );
        assert_eq!(result.years, vec![2022, 2023]);
    }

    #[test]
    fn test_absent_region_yields_zero_or_empty() {
        let data = sample_data();
        let central = regions(&["Central"]);

        assert_eq!(total_sales(&data, &[], &central).table, ResultTable::Total(0.0));
        assert!(top_n_products(&data, 5, &[], &central).table.is_empty());
        assert!(monthly_trend(&data, None, Some("Central")).table.is_empty());
        assert!(year_comparison(&data, &[], Some("Central")).table.is_empty());
    }

    #[test]
    fn test_top_n_products() {
        let data = sample_data();
        let result = top_n_products(&data, 2, &[], &[]);

        assert_eq!(result.description, "Top 2 products by sales");
        assert_eq!(
            result.table,
            ResultTable::Products(vec![
                ProductSales {
                    product: "Laptop".to_string(),
                    total_sales: 120.0
                },
                ProductSales {
                    product: "Tablet".to_string(),
                    total_sales: 75.125
                },
            ])
        );
    }

    #[test]
    fn test_top_n_not_padded() {
        let data = sample_data();
        let result = top_n_products(&data, 5, &[], &[]);
        assert_eq!(result.table.len(), 3);
    }

    #[test]
    fn test_top_n_ties_keep_first_seen_order() {
        let data = vec![
            create_test_record(2022, 1, "North", "Monitor", 10.0),
            create_test_record(2022, 1, "North", "Desktop", 10.0),
            create_test_record(2022, 1, "North", "Laptop", 10.0),
        ];
        let result = top_n_products(&data, 2, &[], &[]);
        let names: Vec<String> = result.table.points().into_iter().map(|(p, _)| p).collect();
        assert_eq!(names, vec!["Monitor".to_string(), "Desktop".to_string()]);
    }

    #[test]
    fn test_sales_by_region_ignores_region_filter() {
        let data = sample_data();
        let result = sales_by_region(&data, &[]);

        assert_eq!(result.regions, regions(&["North", "South", "East"]));
        assert_eq!(
            result.table.points(),
            vec![
                ("North".to_string(), 155.125),
                ("South".to_string(), 50.0),
                ("East".to_string(), 20.0),
            ]
        );

        let result = sales_by_region(&data, &[2023]);
        assert_eq!(result.description, "Sales by region for years 2023");
        assert_eq!(result.regions, regions(&["North", "East"]));
    }

    #[test]
    fn test_monthly_trend_sorted_by_month() {
        let data = sample_data();
        let result = monthly_trend(&data, None, None);
        assert_eq!(
            result.table,
            ResultTable::Monthly(vec![
                MonthSales {
                    month: 1,
                    total_sales: 75.125
                },
                MonthSales {
                    month: 2,
                    total_sales: 20.0
                },
                MonthSales {
                    month: 3,
                    total_sales: 130.0
                },
            ])
        );

        let result = monthly_trend(&data, Some(2022), Some("North"));
        assert_eq!(result.description, "Monthly sales trend for 2022 in North");
        assert_eq!(result.years, vec![2022]);
        assert_eq!(result.regions, regions(&["North"]));
        assert_eq!(result.table.len(), 1);
    }

    #[test]
    fn test_year_comparison_falls_back_to_all_years() {
        let data = generate_synthetic_data(&GeneratorConfig::default()).unwrap();
        let result = year_comparison(&data, &[2023], None);

        assert_eq!(result.years, vec![2021, 2022, 2023, 2024]);
        let years: Vec<String> = result.table.points().into_iter().map(|(y, _)| y).collect();
        assert_eq!(years, vec!["2021", "2022", "2023", "2024"]);
    }

    #[test]
    fn test_year_comparison_with_region() {
        let data = sample_data();
        let result = year_comparison(&data, &[2022, 2024], Some("North"));

        assert_eq!(result.description, "Year-on-year sales comparison for region North");
        assert_eq!(
            result.table,
            ResultTable::Yearly(vec![
                YearSales {
                    year: 2022,
                    total_sales: 100.0
                },
                YearSales {
                    year: 2024,
                    total_sales: 25.125
                },
            ])
        );
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let data = generate_synthetic_data(&GeneratorConfig::default()).unwrap();
        let first = top_n_products(&data, 3, &[2022], &regions(&["West"]));
        let second = top_n_products(&data, 3, &[2022], &regions(&["West"]));
        assert_eq!(first, second);
    }
}
