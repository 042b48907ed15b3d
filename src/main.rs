//! Salesbot - offline chatbot for sales data analysis
//!
//! Answers canned analytical questions about a synthetic sales dataset
//! using keyword-based intent detection, with charts and PDF export.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, dataset, rendering, etc.)
//!   2 - The --ask question was not understood or produced no result

mod analysis;
mod cli;
mod config;
mod data;
mod models;
mod query;
mod report;
mod session;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use models::{AnswerReport, SalesRecord};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use session::{Answer, Session, SessionSettings, HELP_TEXT};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Config is read before logging so `[general] verbose` can set the level
    let (mut loaded, source) = match load_config(&args) {
        Ok(found) => found,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    loaded.merge_with_args(&args);

    init_logging(loaded.log_level(&args));

    info!("Salesbot v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    match run(&args, loaded) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Salesbot failed: {:#}", e);
            eprintln!("\nError: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .salesbot.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE))?;

    println!("Created {} with default settings.", config::CONFIG_FILE);
    println!("   Edit it to customize the dataset, output directory and defaults.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Load config and data, then answer one question or start the chat loop.
fn run(args: &Args, config: Config) -> Result<i32> {
    let overrides = args.generation_overrides();
    if !args.regenerate && !overrides.is_empty() && config.data.path.exists() {
        warn!(
            "{} ignored: reusing cached dataset {} (pass --regenerate to rebuild it)",
            overrides.join(" and "),
            config.data.path.display()
        );
    }

    let data = load_data(&config, args.regenerate)?;

    let settings = SessionSettings {
        default_top_n: config.analysis.default_top_n,
        output_dir: config.output.dir.clone(),
        charts: config.output.charts,
    };
    let mut session = Session::new(data, settings);

    match args.ask {
        Some(ref question) => answer_once(&session, question, args.format),
        None => {
            run_chat(&mut session)?;
            Ok(0)
        }
    }
}

/// Load the dataset, generating it on first run.
fn load_data(config: &Config, regenerate: bool) -> Result<Vec<SalesRecord>> {
    let generator = data::GeneratorConfig::from(&config.data);
    let records = data::load_sales_data(&config.data.path, &generator, regenerate)
        .with_context(|| format!("Failed to load dataset {}", config.data.path.display()))?;

    if records.is_empty() {
        warn!("Dataset {} has no rows", config.data.path.display());
    }

    Ok(records)
}

/// Handle --ask: print one answer and return the exit code.
fn answer_once(session: &Session, question: &str, format: OutputFormat) -> Result<i32> {
    let insight = match session.ask(question) {
        Answer::Insight(insight) => insight,
        Answer::NotUnderstood => {
            eprintln!("Could not understand: {}", question);
            eprintln!("{}", HELP_TEXT);
            return Ok(2);
        }
        Answer::NoResult => {
            eprintln!("Unable to compute: {}", question);
            return Ok(2);
        }
    };

    let answer = AnswerReport {
        question: question.to_string(),
        generated_at: Utc::now(),
        summary: insight.summary,
        chart_path: insight.chart_path.map(|p| p.display().to_string()),
        result: insight.result,
    };

    let output = match format {
        OutputFormat::Text => report::generate_text_report(&answer),
        OutputFormat::Json => report::generate_json_report(&answer)?,
    };
    println!("{}", output.trim_end());

    Ok(0)
}

/// Interactive console loop.
fn run_chat(session: &mut Session) -> Result<()> {
    let mut rl = DefaultEditor::new().context("Failed to initialize line editor")?;

    println!("=== Sales Chatbot ===");
    println!("Ask a question about sales (type 'exit' to quit, 'help' for examples).");

    loop {
        let line = match rl.readline("\nYou: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Bot: Goodbye!");
                break;
            }
            Err(e) => return Err(e).context("Failed to read input"),
        };

        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = rl.add_history_entry(line.as_str()) {
            debug!("Failed to record history: {}", e);
        }

        let reply = match session.respond(&line) {
            Ok(reply) => reply,
            Err(e) => {
                error!("Request failed: {:#}", e);
                println!("Bot: Something went wrong: {:#}", e);
                continue;
            }
        };

        for text in reply.lines() {
            println!("Bot: {}", text);
        }

        if reply.is_exit() {
            break;
        }
    }

    if let Some(insight) = session.last_insight() {
        debug!("Session ended after: {}", insight.result.description);
    }

    Ok(())
}

/// Where the configuration came from, reported once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    BuiltIn,
    Fallback(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => {
                info!("Loaded default config from {}", config::CONFIG_FILE)
            }
            ConfigSource::BuiltIn => debug!("No config file found, using defaults"),
            ConfigSource::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    if let Some(ref config_path) = args.config {
        let loaded = Config::load(config_path)?;
        return Ok((loaded, ConfigSource::Explicit(config_path.clone())));
    }

    match Config::load_default() {
        Ok(Some(loaded)) => Ok((loaded, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::BuiltIn)),
        Err(e) => Ok((Config::default(), ConfigSource::Fallback(e))),
    }
}
