//! One-page PDF export of the latest insight.

use crate::models::AnalysisResult;
use crate::report::format_currency;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the exported report inside the output directory.
pub const PDF_FILE_NAME: &str = "latest_report.pdf";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const LINE_HEIGHT: f32 = 5.0;

/// Writes text lines top to bottom on a single page.
struct PageWriter {
    layer: PdfLayerReference,
    y: f32,
}

impl PageWriter {
    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        // Built-in fonts only cover ASCII.
        let safe: String = text
            .chars()
            .map(|c| if c.is_ascii() { c } else { '?' })
            .collect();
        self.layer
            .use_text(safe, size, Mm(MARGIN), Mm(self.y), font);
        self.y -= LINE_HEIGHT;
    }

    fn gap(&mut self, lines: f32) {
        self.y -= LINE_HEIGHT * lines;
    }

    /// Whether another line still fits above the footer.
    fn has_room(&self) -> bool {
        self.y > MARGIN + 2.0 * LINE_HEIGHT
    }
}

/// Create a PDF report with the summary, the result rows and the chart path.
pub fn export_pdf(
    summary: &str,
    result: &AnalysisResult,
    chart_path: Option<&Path>,
    output_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;
    let pdf_path = output_dir.join(PDF_FILE_NAME);

    let (doc, page, layer) = PdfDocument::new(
        "Sales Insight Report",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = |builtin| {
        doc.add_builtin_font(builtin)
            .map_err(|e| anyhow!("Failed to load PDF font: {:?}", e))
    };
    let bold = font(BuiltinFont::HelveticaBold)?;
    let regular = font(BuiltinFont::Helvetica)?;
    let italic = font(BuiltinFont::HelveticaOblique)?;

    let mut writer = PageWriter {
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT - MARGIN,
    };

    writer.line("Sales Insight Report", 14.0, &bold);
    writer.gap(1.0);
    writer.line(
        &format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
        9.0,
        &italic,
    );
    writer.line(&format!("Description: {}", result.description), 10.0, &regular);
    writer.gap(1.0);

    for sentence in summary.split(". ") {
        writer.line(sentence.trim(), 10.0, &regular);
    }

    let points = result.table.points();
    if !points.is_empty() {
        writer.gap(1.0);
        let columns = result.table.columns();
        writer.line(&columns.join(" | "), 10.0, &bold);
        for (label, value) in points {
            if !writer.has_room() {
                break;
            }
            writer.line(&format!("{} | {}", label, format_currency(value)), 10.0, &regular);
        }
    }

    if let Some(chart) = chart_path {
        writer.y = MARGIN;
        writer.line(&format!("Chart image: {}", chart.display()), 9.0, &italic);
    }

    let file = fs::File::create(&pdf_path)
        .with_context(|| format!("Failed to create {}", pdf_path.display()))?;
    let mut out = BufWriter::new(file);
    doc.save(&mut out)
        .map_err(|e| anyhow!("Failed to write PDF {}: {:?}", pdf_path.display(), e))?;

    info!("Exported PDF report to {}", pdf_path.display());
    Ok(pdf_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Intent, ResultTable, YearSales};
    use tempfile::TempDir;

    fn yearly_result() -> AnalysisResult {
        AnalysisResult {
            intent: Intent::YearComparison,
            table: ResultTable::Yearly(vec![
                YearSales {
                    year: 2022,
                    total_sales: 1000.0,
                },
                YearSales {
                    year: 2023,
                    total_sales: 1500.0,
                },
            ]),
            years: vec![2022, 2023],
            regions: Vec::new(),
            description: "Year-on-year sales comparison".to_string(),
        }
    }

    #[test]
    fn test_export_pdf_writes_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("output");
        let chart = out.join("year_comparison_line.png");

        let path = export_pdf(
            "Year-on-year sales comparison. Highest sales were in 2023 at $1,500.",
            &yearly_result(),
            Some(&chart),
            &out,
        )
        .unwrap();

        assert_eq!(path, out.join(PDF_FILE_NAME));
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_export_overwrites_previous_report() {
        let dir = TempDir::new().unwrap();
        let first = export_pdf("First.", &yearly_result(), None, dir.path()).unwrap();
        let second = export_pdf("Second.", &yearly_result(), None, dir.path()).unwrap();
        assert_eq!(first, second);
        assert!(second.exists());
    }
}
