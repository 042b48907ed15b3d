//! Rendering of analysis results.
//!
//! Insight sentences, plain-text/JSON answers, PNG charts and the PDF
//! export all live here.

pub mod chart;
pub mod generator;
pub mod insight;
pub mod pdf;

pub use chart::visualize_result;
pub use generator::{generate_json_report, generate_text_report};
pub use insight::{format_currency, summarize};
pub use pdf::export_pdf;
