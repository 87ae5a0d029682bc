//! ES|QL CLI - Command line interface for the ES|QL parser

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use esql_ast::{Diagnostic, DiagnosticKind};
use esql_lexer::tokenize;
use esql_parser::{parse_with_diagnostics, ParseOptions, DEFAULT_MAX_DEPTH};

#[derive(Parser)]
#[command(name = "esql")]
#[command(about = "ES|QL query parser", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query and output the AST as JSON
    Parse {
        #[command(flatten)]
        input: Input,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Check that query files parse
    Check {
        /// Input file(s)
        files: Vec<PathBuf>,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Dump the token stream with the lexer mode of each token
    Tokens {
        #[command(flatten)]
        input: Input,
        /// Output JSON instead of one token per line
        #[arg(long)]
        json: bool,
    },
}

/// Where the query text comes from; stdin when neither is given
#[derive(Args)]
struct Input {
    /// Input file
    file: Option<PathBuf>,
    /// Query text given inline
    #[arg(short, long, conflicts_with = "file")]
    query: Option<String>,
}

#[derive(Args)]
struct OptionArgs {
    /// Maximum nesting of sub-queries and expressions
    #[arg(long, env = "ESQL_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Keep parsing after a malformed command and report every error
    #[arg(short, long)]
    tolerant: bool,
}

impl OptionArgs {
    fn to_options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_max_depth(self.max_depth)
            .tolerant(self.tolerant)
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error setting up logging: {}", e);
    }

    match cli.command {
        Commands::Parse {
            input,
            pretty,
            options,
        } => cmd_parse(&input, pretty, &options.to_options()),
        Commands::Check { files, options } => cmd_check(&files, &options.to_options()),
        Commands::Tokens { input, json } => cmd_tokens(&input, json),
    }
}

fn read_input(input: &Input) -> (String, String) {
    let result = match (&input.query, &input.file) {
        (Some(query), _) => Ok(("<query>".to_string(), query.clone())),
        (None, Some(file)) => {
            fs::read_to_string(file).map(|source| (file.display().to_string(), source))
        }
        (None, None) => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map(|_| ("<stdin>".to_string(), source))
        }
    };
    match result {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_parse(input: &Input, pretty: bool, options: &ParseOptions) {
    let (name, source) = read_input(input);
    debug!(input = %name, ?options, "parsing");

    let output = parse_with_diagnostics(&source, options);
    for diagnostic in &output.diagnostics {
        report_diagnostic(&source, &name, diagnostic);
    }

    // Tolerant parses still print the partial tree
    if let Some(query) = &output.query {
        let json = if pretty {
            serde_json::to_string_pretty(query)
        } else {
            serde_json::to_string(query)
        };
        match json {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing AST: {}", e);
                std::process::exit(1);
            }
        }
    }

    if !output.diagnostics.is_empty() {
        std::process::exit(1);
    }
}

fn cmd_check(files: &[PathBuf], options: &ParseOptions) {
    let mut all_ok = true;

    for file in files {
        let source = match fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error reading {}: {}", file.display(), e);
                all_ok = false;
                continue;
            }
        };

        let output = parse_with_diagnostics(&source, options);
        match (&output.query, output.diagnostics.is_empty()) {
            (Some(query), true) => {
                println!("✓ {} - {} commands", file.display(), query.len());
            }
            _ => {
                eprintln!(
                    "✗ {} - {} errors:",
                    file.display(),
                    output.diagnostics.len()
                );
                for diagnostic in &output.diagnostics {
                    report_diagnostic(&source, &file.display().to_string(), diagnostic);
                }
                all_ok = false;
            }
        }
    }

    if !all_ok {
        std::process::exit(1);
    }
}

fn cmd_tokens(input: &Input, json: bool) {
    let (_, source) = read_input(input);
    let tokens = tokenize(&source);

    if json {
        match serde_json::to_string_pretty(&tokens) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing tokens: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for token in &tokens {
        println!(
            "{:>4}..{:<4} {:<12} {:<18} {:?}",
            token.span.start,
            token.span.end,
            format!("{:?}", token.mode),
            format!("{:?}", token.kind),
            token.lexeme
        );
    }
}

fn report_diagnostic(source: &str, name: &str, diagnostic: &Diagnostic) {
    // ariadne counts characters, spans count bytes
    let start = char_offset(source, diagnostic.span.start);
    let end = char_offset(source, diagnostic.span.end).max(start + 1);
    let (kind, color) = match diagnostic.kind {
        DiagnosticKind::RecursionLimit => (ReportKind::Error, Color::Magenta),
        DiagnosticKind::Lexical => (ReportKind::Error, Color::Yellow),
        DiagnosticKind::Syntax => (ReportKind::Error, Color::Red),
    };
    let label = match diagnostic.expected.as_slice() {
        [] => format!("found {}", diagnostic.found),
        expected => format!("expected {}", expected.join(", ")),
    };

    let result = Report::build(kind, name.to_string(), start)
        .with_message(&diagnostic.message)
        .with_label(
            Label::new((name.to_string(), start..end))
                .with_message(label)
                .with_color(color),
        )
        .finish()
        .eprint((name.to_string(), Source::from(source)));
    if result.is_err() {
        eprintln!("{}", diagnostic);
    }
}

fn char_offset(source: &str, byte: usize) -> usize {
    source.get(..byte).map_or(source.chars().count(), |s| s.chars().count())
}
