//! Conversation handling.
//!
//! A [`Session`] answers one message at a time against the loaded
//! dataset and remembers the last successful insight for `export pdf`.

use crate::analysis::route;
use crate::models::{AnalysisResult, Intent, SalesRecord};
use crate::query::parse_user_message;
use crate::report::{export_pdf, summarize, visualize_result};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Example questions shown by `help`.
pub const HELP_TEXT: &str = "Example queries:
  - Total sales in 2023
  - Top 5 products in 2022
  - Sales by region for 2022
  - Monthly trend for 2024 in South
  - Compare 2022 vs 2023
  - export pdf (export last insight as PDF)";

const NOT_UNDERSTOOD: &str = "I couldn't understand that. Try asking about total sales, \
top products, regional sales, monthly trends, or year comparisons.";

/// Settings that shape how answers are produced.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub default_top_n: usize,
    pub output_dir: PathBuf,
    pub charts: bool,
}

/// An answered question: result, summary and optional chart.
#[derive(Debug, Clone)]
pub struct Insight {
    pub result: AnalysisResult,
    pub summary: String,
    pub chart_path: Option<PathBuf>,
}

/// Outcome of asking a single question.
#[derive(Debug, Clone)]
pub enum Answer {
    NotUnderstood,
    NoResult,
    Insight(Insight),
}

/// Bot reply to a line of user input.
#[derive(Debug, Clone)]
pub enum Reply {
    Goodbye,
    Help,
    Exported(PathBuf),
    NothingToExport,
    NotUnderstood,
    NoResult,
    Answered(Insight),
}

impl Reply {
    /// Whether the conversation should end.
    pub fn is_exit(&self) -> bool {
        matches!(self, Reply::Goodbye)
    }

    /// Lines to print, without the "Bot: " prefix.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Reply::Goodbye => vec!["Goodbye!".to_string()],
            Reply::Help => vec![HELP_TEXT.to_string()],
            Reply::Exported(path) => vec![format!("PDF report saved to {}", path.display())],
            Reply::NothingToExport => {
                vec!["There is no previous insight to export yet.".to_string()]
            }
            Reply::NotUnderstood => vec![NOT_UNDERSTOOD.to_string()],
            Reply::NoResult => vec!["I wasn't able to compute that request.".to_string()],
            Reply::Answered(insight) => {
                let mut lines = vec![insight.summary.clone()];
                if let Some(ref chart) = insight.chart_path {
                    lines.push(format!("I also saved a chart to: {}", chart.display()));
                }
                lines
            }
        }
    }
}

/// Interactive chat session over a read-only dataset.
pub struct Session {
    data: Vec<SalesRecord>,
    settings: SessionSettings,
    last: Option<Insight>,
}

impl Session {
    /// Create a new session.
    pub fn new(data: Vec<SalesRecord>, settings: SessionSettings) -> Self {
        Self {
            data,
            settings,
            last: None,
        }
    }

    /// The last successful insight, if any.
    pub fn last_insight(&self) -> Option<&Insight> {
        self.last.as_ref()
    }

    /// Handle one line of user input.
    pub fn respond(&mut self, message: &str) -> Result<Reply> {
        let message = message.trim();
        let command = message.to_lowercase();

        if matches!(command.as_str(), "exit" | "quit" | "q") {
            return Ok(Reply::Goodbye);
        }

        if matches!(command.as_str(), "help" | "examples") {
            return Ok(Reply::Help);
        }

        if command.starts_with("export pdf") {
            return self.export_last();
        }

        let reply = match self.ask(message) {
            Answer::NotUnderstood => Reply::NotUnderstood,
            Answer::NoResult => Reply::NoResult,
            Answer::Insight(insight) => {
                self.last = Some(insight.clone());
                Reply::Answered(insight)
            }
        };

        Ok(reply)
    }

    /// Answer a question without touching the session memory.
    pub fn ask(&self, message: &str) -> Answer {
        let parsed = parse_user_message(message);
        if parsed.intent == Intent::Unknown {
            return Answer::NotUnderstood;
        }

        let Some(result) = route(&self.data, &parsed, self.settings.default_top_n) else {
            return Answer::NoResult;
        };

        let summary = summarize(&result);
        let chart_path = if self.settings.charts {
            match visualize_result(&result, &self.settings.output_dir) {
                Ok(path) => path,
                Err(e) => {
                    warn!("Chart rendering failed: {:#}", e);
                    None
                }
            }
        } else {
            None
        };

        Answer::Insight(Insight {
            result,
            summary,
            chart_path,
        })
    }

    fn export_last(&self) -> Result<Reply> {
        let Some(ref insight) = self.last else {
            debug!("Export requested before any insight");
            return Ok(Reply::NothingToExport);
        };

        let path = export_pdf(
            &insight.summary,
            &insight.result,
            insight.chart_path.as_deref(),
            &self.settings.output_dir,
        )?;

        Ok(Reply::Exported(path))
    }
}
