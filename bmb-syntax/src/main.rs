//! BMB syntax CLI

use bmb_syntax::ast::LineIndex;
use bmb_syntax::error::report_error;
use bmb_syntax::{CompileError, Diagnostics, ParseOptions, Program};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bmb-syntax", version, about = "BMB lexer and parser driver")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
    /// Parse and dump AST as JSON (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
        /// Keep parsing after an item fails and report every error
        #[arg(long)]
        collect_errors: bool,
        /// Stop after this many errors with --collect-errors
        #[arg(long, default_value_t = 20)]
        max_errors: usize,
    },
    /// Check that a source file parses
    Check {
        /// Source file to check
        file: PathBuf,
    },
    /// Parse and print the source back from the tree
    Print {
        /// Source file to print
        file: PathBuf,
    },
}

/// Failure of one command; diagnostics have already been rendered
struct Reported;

type CmdResult = std::result::Result<(), Reported>;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Command::Tokens { file } => tokenize_file(&file),
        Command::Parse {
            file,
            collect_errors,
            max_errors,
        } => {
            let options = if collect_errors {
                ParseOptions::collect_errors().with_max_errors(max_errors)
            } else {
                ParseOptions::default()
            };
            parse_file(&file, &options)
        }
        Command::Check { file } => check_file(&file),
        Command::Print { file } => print_file(&file),
    };

    if result.is_err() {
        std::process::exit(1);
    }
}

fn read_source(path: &Path) -> std::result::Result<(String, String), Reported> {
    let filename = path.display().to_string();
    match std::fs::read_to_string(path) {
        Ok(source) => Ok((filename, source)),
        Err(e) => {
            eprintln!("Error: {}", CompileError::from(e));
            Err(Reported)
        }
    }
}

fn report(filename: &str, source: &str, error: &CompileError) -> Reported {
    if report_error(filename, source, error).is_err() {
        eprintln!("Error: {error}");
    }
    Reported
}

fn report_all(filename: &str, source: &str, diagnostics: &Diagnostics) -> Reported {
    for error in diagnostics.iter() {
        report(filename, source, error);
    }
    eprintln!("{} syntax error(s) in {filename}", diagnostics.len());
    Reported
}

fn parse_program(
    filename: &str,
    source: &str,
    options: &ParseOptions,
) -> std::result::Result<Program, Reported> {
    let tokens = bmb_syntax::lexer::tokenize(source).map_err(|e| report(filename, source, &e))?;
    bmb_syntax::parser::parse_with_options(filename, source, tokens, options)
        .map_err(|d| report_all(filename, source, &d))
}

fn tokenize_file(path: &Path) -> CmdResult {
    let (filename, source) = read_source(path)?;
    let tokens = bmb_syntax::lexer::tokenize(&source).map_err(|e| report(&filename, &source, &e))?;

    let index = LineIndex::new(&source);
    for (tok, span) in &tokens {
        let kind = tok.kind().to_string();
        println!("{kind:<12} {:<16} @ {} ({span})", tok.to_string(), index.position(span.start));
    }
    Ok(())
}

fn parse_file(path: &Path, options: &ParseOptions) -> CmdResult {
    let (filename, source) = read_source(path)?;
    let ast = parse_program(&filename, &source, options)?;

    match serde_json::to_string_pretty(&ast) {
        Ok(json) => {
            println!("{json}");
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Err(Reported)
        }
    }
}

fn check_file(path: &Path) -> CmdResult {
    let (filename, source) = read_source(path)?;
    let ast = parse_program(&filename, &source, &ParseOptions::collect_errors())?;

    println!("✓ {filename} parses successfully ({} items)", ast.items.len());
    Ok(())
}

fn print_file(path: &Path) -> CmdResult {
    let (filename, source) = read_source(path)?;
    let ast = parse_program(&filename, &source, &ParseOptions::default())?;

    print!("{ast}");
    Ok(())
}
