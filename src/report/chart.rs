//! PNG charts for analysis results.
//!
//! Rankings (top products, regions) become bar charts and time series
//! (months, years) become line charts. Total sales have no chart.

use crate::models::{AnalysisResult, Intent};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const WIDTH: u32 = 720;
const HEIGHT: u32 = 480;
const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 20;
const MARGIN_BOTTOM: u32 = 50;
const GRID_LINES: u32 = 5;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([55, 65, 81]);
const GRID: Rgb<u8> = Rgb([229, 231, 235]);
const BAR: Rgb<u8> = Rgb([37, 99, 235]);
const LINE: Rgb<u8> = Rgb([16, 185, 129]);

/// Chart style used for an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

impl ChartKind {
    /// Pick the chart style for an intent, if it has one.
    pub fn for_intent(intent: Intent) -> Option<Self> {
        match intent {
            Intent::TopProducts | Intent::SalesByRegion => Some(ChartKind::Bar),
            Intent::MonthlyTrend | Intent::YearComparison => Some(ChartKind::Line),
            Intent::TotalSales | Intent::Unknown => None,
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
        }
    }
}

/// Render a chart for the result into `output_dir`.
///
/// Returns the image path, or `None` when no chart applies.
pub fn visualize_result(result: &AnalysisResult, output_dir: &Path) -> Result<Option<PathBuf>> {
    let Some(kind) = ChartKind::for_intent(result.intent) else {
        return Ok(None);
    };

    let values: Vec<f64> = result.table.points().into_iter().map(|(_, v)| v).collect();
    if values.is_empty() {
        debug!("Skipping chart for empty {} result", result.intent);
        return Ok(None);
    }

    let image = match kind {
        ChartKind::Bar => render_bar_chart(&values),
        ChartKind::Line => render_line_chart(&values),
    };

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let path = output_dir.join(format!("{}_{}.png", result.intent, kind.suffix()));
    image
        .save(&path)
        .with_context(|| format!("Failed to save chart to {}", path.display()))?;

    debug!("Saved {} chart to {}", kind.suffix(), path.display());
    Ok(Some(path))
}

/// Bar chart with one bar per value.
pub fn render_bar_chart(values: &[f64]) -> RgbImage {
    let mut img = blank_canvas();
    let scale = Scale::new(values);
    let slot = plot_width() as f64 / values.len() as f64;
    let bar_width = (slot * 0.6).max(1.0);

    for (i, value) in values.iter().enumerate() {
        let x0 = MARGIN_LEFT as f64 + slot * i as f64 + (slot - bar_width) / 2.0;
        let top = scale.y(*value);
        fill_rect(
            &mut img,
            x0 as i64,
            top,
            (x0 + bar_width) as i64,
            baseline(),
            BAR,
        );
    }

    draw_axes(&mut img);
    img
}

/// Line chart with a marker at every value.
pub fn render_line_chart(values: &[f64]) -> RgbImage {
    let mut img = blank_canvas();
    let scale = Scale::new(values);
    let slot = plot_width() as f64 / values.len() as f64;

    let points: Vec<(i64, i64)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = MARGIN_LEFT as f64 + slot * (i as f64 + 0.5);
            (x as i64, scale.y(*v))
        })
        .collect();

    for pair in points.windows(2) {
        draw_line(&mut img, pair[0], pair[1], LINE);
    }
    for &(x, y) in &points {
        fill_rect(&mut img, x - 3, y - 3, x + 4, y + 4, LINE);
    }

    draw_axes(&mut img);
    img
}

/// Maps sales values onto the vertical pixel range of the plot area.
struct Scale {
    max: f64,
}

impl Scale {
    fn new(values: &[f64]) -> Self {
        let max = values.iter().cloned().fold(0.0_f64, f64::max);
        Self {
            max: if max > 0.0 { max * 1.1 } else { 1.0 },
        }
    }

    fn y(&self, value: f64) -> i64 {
        let ratio = (value.max(0.0) / self.max).min(1.0);
        baseline() - (ratio * plot_height() as f64).round() as i64
    }
}

fn plot_width() -> u32 {
    WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> u32 {
    HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn baseline() -> i64 {
    (HEIGHT - MARGIN_BOTTOM) as i64
}

fn blank_canvas() -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);

    for i in 1..=GRID_LINES {
        let y = baseline() - (plot_height() * i / GRID_LINES) as i64;
        draw_line(
            &mut img,
            (MARGIN_LEFT as i64, y),
            ((WIDTH - MARGIN_RIGHT) as i64, y),
            GRID,
        );
    }

    img
}

fn draw_axes(img: &mut RgbImage) {
    let left = MARGIN_LEFT as i64;
    draw_line(img, (left, MARGIN_TOP as i64), (left, baseline()), AXIS);
    draw_line(
        img,
        (left, baseline()),
        ((WIDTH - MARGIN_RIGHT) as i64, baseline()),
        AXIS,
    );
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Fill the half-open rectangle [x0, x1) × [y0, y1), clipped to the image.
fn fill_rect(img: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    for y in y0..y1 {
        for x in x0..x1 {
            put(img, x, y, color);
        }
    }
}

/// Bresenham line, two pixels thick.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(img, x, y, color);
        put(img, x, y + 1, color);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductSales, ResultTable, YearSales};
    use image::GenericImageView;
    use tempfile::TempDir;

    fn products_result() -> AnalysisResult {
        AnalysisResult {
            intent: Intent::TopProducts,
            table: ResultTable::Products(vec![
                ProductSales {
                    product: "Laptop".to_string(),
                    total_sales: 900.0,
                },
                ProductSales {
                    product: "Tablet".to_string(),
                    total_sales: 300.0,
                },
            ]),
            years: Vec::new(),
            regions: Vec::new(),
            description: "Top 2 products by sales".to_string(),
        }
    }

    #[test]
    fn test_chart_kind_for_intent() {
        assert_eq!(ChartKind::for_intent(Intent::TopProducts), Some(ChartKind::Bar));
        assert_eq!(ChartKind::for_intent(Intent::SalesByRegion), Some(ChartKind::Bar));
        assert_eq!(ChartKind::for_intent(Intent::MonthlyTrend), Some(ChartKind::Line));
        assert_eq!(ChartKind::for_intent(Intent::YearComparison), Some(ChartKind::Line));
        assert_eq!(ChartKind::for_intent(Intent::TotalSales), None);
    }

    #[test]
    fn test_bar_chart_saved() {
        let dir = TempDir::new().unwrap();
        let path = visualize_result(&products_result(), dir.path())
            .unwrap()
            .unwrap();

        assert_eq!(path, dir.path().join("top_products_bar.png"));
        let img = image::open(&path).unwrap();
        assert_eq!(img.dimensions(), (WIDTH, HEIGHT));
    }

    #[test]
    fn test_line_chart_name() {
        let dir = TempDir::new().unwrap();
        let result = AnalysisResult {
            intent: Intent::YearComparison,
            table: ResultTable::Yearly(vec![
                YearSales {
                    year: 2022,
                    total_sales: 10.0,
                },
                YearSales {
                    year: 2023,
                    total_sales: 20.0,
                },
            ]),
            years: vec![2022, 2023],
            regions: Vec::new(),
            description: "Year-on-year sales comparison".to_string(),
        };

        let path = visualize_result(&result, dir.path()).unwrap().unwrap();
        assert!(path.ends_with("year_comparison_line.png"));
    }

    #[test]
    fn test_no_chart_for_total_or_empty() {
        let dir = TempDir::new().unwrap();
        let total = AnalysisResult {
            intent: Intent::TotalSales,
            table: ResultTable::Total(10.0),
            years: Vec::new(),
            regions: Vec::new(),
            description: "Total sales".to_string(),
        };
        assert!(visualize_result(&total, dir.path()).unwrap().is_none());

        let empty = AnalysisResult {
            table: ResultTable::Products(Vec::new()),
            ..products_result()
        };
        assert!(visualize_result(&empty, dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_bar_heights_follow_values() {
        let img = render_bar_chart(&[100.0, 50.0]);
        let slot = plot_width() / 2;
        let first_x = MARGIN_LEFT + slot / 2;
        let second_x = MARGIN_LEFT + slot + slot / 2;

        let top_of = |x: u32| {
            (0..HEIGHT)
                .find(|&y| *img.get_pixel(x, y) == BAR)
                .unwrap()
        };
        assert!(top_of(first_x) < top_of(second_x));
    }
}
