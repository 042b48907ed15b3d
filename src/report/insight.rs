//! Business-style insight sentences for analysis results.

use crate::models::{AnalysisResult, ResultTable};

/// Format an amount as whole dollars with thousands separators.
pub fn format_currency(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && digits != "0" { "-" } else { "" };
    format!("${}{}", sign, grouped)
}

/// Turn an analysis result into a human-readable insight.
pub fn summarize(result: &AnalysisResult) -> String {
    if result.table.is_empty() {
        return format!("{}. No sales matched this query.", result.description);
    }

    match &result.table {
        ResultTable::Total(total) => format!(
            "Total sales amount to {}. {}.",
            format_currency(*total),
            result.description
        ),
        ResultTable::Products(rows) => {
            let joined = rows
                .iter()
                .map(|r| format!("{} ({})", r.product, format_currency(r.total_sales)))
                .collect::<Vec<_>>()
                .join("; ");
            format!("{}: {}.", result.description, joined)
        }
        ResultTable::Regions(rows) => {
            let (best, worst) = (&rows[0], &rows[rows.len() - 1]);
            format!(
                "{}. Best performing region is {} with {}, while the lowest is {} at {}.",
                result.description,
                best.region,
                format_currency(best.total_sales),
                worst.region,
                format_currency(worst.total_sales)
            )
        }
        ResultTable::Monthly(rows) => {
            let (first, last) = (&rows[0], &rows[rows.len() - 1]);
            let direction = if last.total_sales >= first.total_sales {
                "increased"
            } else {
                "decreased"
            };
            format!(
                "{}. Sales {} from {} in month {} to {} in month {}.",
                result.description,
                direction,
                format_currency(first.total_sales),
                first.month,
                format_currency(last.total_sales),
                last.month
            )
        }
        ResultTable::Yearly(rows) => {
            // First occurrence wins on ties.
            let mut best = &rows[0];
            let mut worst = &rows[0];
            for row in &rows[1..] {
                if row.total_sales > best.total_sales {
                    best = row;
                }
                if row.total_sales < worst.total_sales {
                    worst = row;
                }
            }
            format!(
                "{}. Highest sales were in {} at {}, compared with {} in {}.",
                result.description,
                best.year,
                format_currency(best.total_sales),
                format_currency(worst.total_sales),
                worst.year
            )
        }
    }
}
