//! `jfront`: command-line driver for the Java front end

use clap::{Parser, Subcommand};
use java_frontend::file_processor;
use java_frontend::tokens::SourceMap;
use java_frontend::utils::Span;
use java_frontend::{
    check_round_trip, classify_parenthesized, lexical, log_error, log_info, logging, parse,
    pipeline, Node, ParseMode, PipelineError,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "jfront")]
#[command(version, about = "Lossless Java lexer and parser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Dump the token stream with attached whitespace and comments
    Tokens {
        path: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Parse a file and print the regenerated source
    Parse {
        path: PathBuf,

        /// compilation-unit, statement, expression or type
        #[arg(long, default_value = "compilation-unit")]
        mode: ParseMode,

        /// Print the AST as JSON instead of source
        #[arg(long)]
        json: bool,
    },

    /// Verify lossless tokenization and idempotent generation
    Check {
        path: PathBuf,

        #[arg(long, default_value = "compilation-unit")]
        mode: ParseMode,
    },

    /// Classify the parenthesized prefix of an expression
    Classify { text: String },
}

fn main() -> ExitCode {
    if let Err(e) = logging::init_global_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }
    if let Err(e) = pipeline::validate_pipeline() {
        eprintln!("Pipeline validation failed: {}", e);
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    log_info!("jfront starting", "command" => format!("{:?}", cli.command));

    let result = match cli.command {
        Command::Tokens { path, json } => dump_tokens(&path, json),
        Command::Parse { path, mode, json } => parse_path(&path, mode, json),
        Command::Check { path, mode } => check_path(&path, mode),
        Command::Classify { text } => classify(&text),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn read_source(path: &Path) -> Result<String, String> {
    file_processor::process_file(path)
        .map(|file| file.source)
        .map_err(|e| format!("error[{}]: {}", e.error_code(), e))
}

/// Render a failure against the source it came from
fn report(error: &PipelineError, path: &Path, source: &str) -> String {
    log_error!(error.error_code(), &error.to_string(), "file" => path.display());

    let header = format!("error[{}]: {}", error.error_code(), error);
    match error.offset() {
        Some(offset) => {
            let map = SourceMap::new(source.to_string());
            let at = Span::at(map.position_at(offset));
            format!(
                "{}\n --> {}:{}:{}\n{}\nhelp: {}",
                header,
                path.display(),
                at.start.line,
                at.start.column,
                map.format_error(&at, &error.to_string()),
                error.recommended_action()
            )
        }
        None => header,
    }
}

fn dump_tokens(path: &Path, json: bool) -> Result<bool, String> {
    let source = read_source(path)?;
    let tokens = lexical::tokenize(&source)
        .map_err(|e| report(&PipelineError::from(e), path, &source))?;

    if json {
        let text = serde_json::to_string_pretty(&tokens).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(true);
    }

    for token in &tokens {
        for affiliation in &token.affiliations {
            println!(
                "{:>6}  {:<14} {:?}",
                affiliation.span.start.offset,
                format!("{:?}", affiliation.style),
                affiliation.text
            );
        }
        let value = token
            .value
            .as_ref()
            .map(|v| format!("  = {:?}", v))
            .unwrap_or_default();
        println!(
            "{:>6}  {:<14} {:?}{}",
            token.offset(),
            token.kind.describe(),
            token.source,
            value
        );
    }
    Ok(true)
}

fn parse_path(path: &Path, mode: ParseMode, json: bool) -> Result<bool, String> {
    let source = read_source(path)?;
    let tree = logging::with_file_context(path, || parse(&source, mode))
        .map_err(|e| report(&e, path, &source))?;

    if json {
        let text = serde_json::to_string_pretty(&tree).map_err(|e| e.to_string())?;
        println!("{}", text);
    } else {
        println!("{}", tree.generate());
    }
    Ok(true)
}

fn check_path(path: &Path, mode: ParseMode) -> Result<bool, String> {
    let source = read_source(path)?;
    let summary = logging::with_file_context(path, || check_round_trip(&source, mode))
        .map_err(|e| report(&e, path, &source))?;

    println!(
        "{}: {} tokens, lossless: {}, idempotent: {}",
        path.display(),
        summary.token_count,
        summary.lossless,
        summary.idempotent
    );
    Ok(summary.passed())
}

fn classify(text: &str) -> Result<bool, String> {
    let kind = classify_parenthesized(text)
        .map_err(|e| report(&e, Path::new("<input>"), text))?;
    println!("{}", kind);
    Ok(true)
}
