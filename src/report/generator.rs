//! Plain-text and JSON rendering of answers.

use crate::models::{AnalysisResult, AnswerReport, ResultTable};
use crate::report::format_currency;
use anyhow::Result;

/// Render the result table as aligned plain-text rows.
pub fn generate_table_text(result: &AnalysisResult) -> String {
    let columns = result.table.columns();

    if let ResultTable::Total(total) = result.table {
        return format!("{}\n{}\n", columns[0], format_currency(total));
    }

    let points = result.table.points();
    if points.is_empty() {
        return String::new();
    }

    let label_width = points
        .iter()
        .map(|(label, _)| label.len())
        .chain(std::iter::once(columns[0].len()))
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<width$}  {}\n",
        columns[0],
        columns[1],
        width = label_width
    ));
    for (label, value) in points {
        output.push_str(&format!(
            "{:<width$}  {}\n",
            label,
            format_currency(value),
            width = label_width
        ));
    }

    output
}

/// Generate the text answer printed by one-shot mode.
pub fn generate_text_report(report: &AnswerReport) -> String {
    let mut output = String::new();

    output.push_str(&report.summary);
    output.push_str("\n\n");
    output.push_str(&generate_table_text(&report.result));

    if let Some(ref chart) = report.chart_path {
        output.push_str(&format!("\nChart: {}\n", chart));
    }

    output
}

/// Generate a JSON answer.
pub fn generate_json_report(report: &AnswerReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
