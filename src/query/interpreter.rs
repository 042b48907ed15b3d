//! Keyword-based intent classification and entity extraction.
//!
//! Intent detection is an ordered rule table evaluated against the
//! lower-cased message; the first matching rule wins. Entity extraction
//! runs independently of the detected intent.

use crate::models::{Intent, ParsedQuery};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Regions the interpreter recognizes, in scan order.
pub const REGIONS: [&str; 4] = ["north", "south", "east", "west"];

// Digits are ASCII-only: the captured text must parse with `str::parse`.
static YEAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(20[0-9]{2})\b").expect("year pattern is valid"));

static TOP_N_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"top\s+([0-9]+)").expect("top-n pattern is valid"));

/// A single (predicate, intent) entry of the classification cascade.
struct IntentRule {
    intent: Intent,
    matches: fn(&str) -> bool,
}

/// Rules in priority order. Predicates receive lower-cased text.
const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::YearComparison,
        matches: is_comparison,
    },
    IntentRule {
        intent: Intent::MonthlyTrend,
        matches: is_trend,
    },
    IntentRule {
        intent: Intent::SalesByRegion,
        matches: is_regional,
    },
    IntentRule {
        intent: Intent::TopProducts,
        matches: is_ranking,
    },
    IntentRule {
        intent: Intent::TotalSales,
        matches: is_total,
    },
];

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

fn is_comparison(text: &str) -> bool {
    contains_any(text, &["compare", "vs", "versus"]) && YEAR_PATTERN.is_match(text)
}

fn is_trend(text: &str) -> bool {
    contains_any(text, &["trend", "over time", "monthly"])
}

fn is_regional(text: &str) -> bool {
    text.contains("region") || contains_any(text, &REGIONS)
}

fn is_ranking(text: &str) -> bool {
    contains_any(text, &["top", "best", "highest"])
}

fn is_total(text: &str) -> bool {
    contains_any(text, &["total", "overall", "revenue"])
}

/// Infer the user's intent using the keyword rule table.
pub fn detect_intent(message: &str) -> Intent {
    let text = message.to_lowercase();

    INTENT_RULES
        .iter()
        .find(|rule| (rule.matches)(&text))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Unknown)
}

/// Extract 4-digit years like 2021, 2022 from the text.
pub fn extract_years(message: &str) -> Vec<i32> {
    let mut years: Vec<i32> = YEAR_PATTERN
        .captures_iter(message)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect();

    years.sort_unstable();
    years.dedup();
    years
}

/// Extract region names using case-insensitive substring matching.
///
/// Regions come back in [`REGIONS`] order, not in order of appearance.
pub fn extract_regions(message: &str) -> Vec<String> {
    let text = message.to_lowercase();
    let mut found: Vec<String> = Vec::new();

    for region in REGIONS {
        if !text.contains(region) {
            continue;
        }
        let name = title_case(region);
        if !found.contains(&name) {
            found.push(name);
        }
    }

    found
}

/// Detect "top N" from phrases like "top 5 products".
pub fn extract_top_n(message: &str) -> Option<usize> {
    let text = message.to_lowercase();
    let caps = TOP_N_PATTERN.captures(&text)?;
    let n: usize = caps.get(1)?.as_str().parse().ok()?;
    Some(n.max(1))
}

/// Get intent and entities in one call.
pub fn parse_user_message(message: &str) -> ParsedQuery {
    let parsed = ParsedQuery {
        intent: detect_intent(message),
        years: extract_years(message),
        regions: extract_regions(message),
        top_n: extract_top_n(message),
    };

    debug!(
        "Parsed message: intent={} years={:?} regions={:?} top_n={:?}",
        parsed.intent, parsed.years, parsed.regions, parsed.top_n
    );

    parsed
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
