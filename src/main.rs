//! Bhagwad Compiler
//!
//! Translates Bhagwad source (.bhagwad) into Python and runs it with the
//! system interpreter. The pipeline lives in `frontend` and `backend`;
//! this file is the command-line glue around it.

mod backend;
mod frontend;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use frontend::ast::Program;
use frontend::{lexer, parser};

/// Bhagwad Compiler
#[derive(Parser, Debug)]
#[command(name = "bhagwadc")]
#[command(version = "0.1.0")]
#[command(about = "Bhagwad compiler - translates .bhagwad programs to Python")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input source file (.bhagwad); compiled and executed when no
    /// subcommand is given
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Print the token stream as JSON and stop
    #[arg(long)]
    emit_tokens: bool,

    /// Print the AST as JSON and stop
    #[arg(long)]
    emit_ast: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a source file to Python
    Build {
        /// Input source file
        input: PathBuf,

        /// Output file (defaults to the input with a .py extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compile and execute a source file
    Run {
        /// Input source file
        input: PathBuf,
    },
    /// Check a source file for errors
    Check {
        /// Input source file
        input: PathBuf,
    },
    /// Compile and execute every demo program
    Demos {
        /// Directory of .bhagwad programs
        #[arg(default_value = "demos")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match &cli.command {
        Some(Commands::Build { input, output }) => build_file(input, output.clone(), &cli),
        Some(Commands::Run { input }) => run_file(input, &cli),
        Some(Commands::Check { input }) => check_file(input, &cli),
        Some(Commands::Demos { dir }) => run_demos(dir, &cli),
        None => {
            if let Some(input) = cli.input.clone() {
                run_file(&input, &cli)
            } else {
                eprintln!("Error: No input file specified");
                eprintln!("Usage: bhagwadc <FILE> or bhagwadc run <FILE>");
                process::exit(1)
            }
        }
    }
}

/// Run the front end on one file, exiting on the first compile error.
/// Honors the --emit-tokens / --emit-ast debug dumps.
fn parse_file(input: &Path, cli: &Cli) -> Result<Program> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;

    let tokens = match lexer::tokenize(&source) {
        Ok(t) => t,
        Err(e) => report(input, &e),
    };
    debug!("tokenized {} tokens", tokens.len());

    if cli.emit_tokens {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        process::exit(0);
    }

    let program = match parser::parse(tokens) {
        Ok(p) => p,
        Err(e) => report(input, &e),
    };
    debug!("parsed {} top-level items", program.items.len());

    if cli.emit_ast {
        println!("{}", serde_json::to_string_pretty(&program)?);
        process::exit(0);
    }

    Ok(program)
}

fn compile(input: &Path, cli: &Cli) -> Result<String> {
    let program = parse_file(input, cli)?;
    Ok(backend::generate(&program))
}

fn report(input: &Path, err: &utils::Error) -> ! {
    eprintln!(
        "{}: {} error: {} ({})",
        input.display(),
        err.stage(),
        err,
        err.span()
    );
    process::exit(1);
}

fn build_file(input: &Path, output: Option<PathBuf>, cli: &Cli) -> Result<()> {
    let generated = compile(input, cli)?;

    let out_path = output.unwrap_or_else(|| input.with_extension("py"));
    fs::write(&out_path, &generated)
        .with_context(|| format!("writing {}", out_path.display()))?;
    println!("Generated Python: {}", out_path.display());
    Ok(())
}

fn run_file(input: &Path, cli: &Cli) -> Result<()> {
    let generated = compile(input, cli)?;

    // Write next to the input, hand it to the interpreter, clean up after
    let py_path = input.with_extension("py");
    fs::write(&py_path, &generated)
        .with_context(|| format!("writing {}", py_path.display()))?;

    let interpreters = ["python3", "python"];
    let mut status = None;
    for interpreter in &interpreters {
        match process::Command::new(interpreter).arg(&py_path).status() {
            Ok(s) => {
                status = Some(s);
                break;
            }
            Err(_) => continue,
        }
    }

    let _ = fs::remove_file(&py_path);

    let Some(status) = status else {
        anyhow::bail!("could not find a Python interpreter (python3/python)");
    };
    if !status.success() {
        process::exit(status.code().unwrap_or(1));
    }
    Ok(())
}

fn check_file(input: &Path, cli: &Cli) -> Result<()> {
    let program = parse_file(input, cli)?;
    println!(
        "{}: OK ({} top-level items)",
        input.display(),
        program.items.len()
    );
    Ok(())
}

/// The "run all examples" driver from the original distribution
fn run_demos(dir: &Path, cli: &Cli) -> Result<()> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map(|e| e == "bhagwad").unwrap_or(false))
        .collect();
    files.sort();

    if files.is_empty() {
        println!("No .bhagwad programs under {}", dir.display());
        return Ok(());
    }

    for file in &files {
        println!("{}", "=".repeat(60));
        println!("Running: {}", file.display());
        println!("{}", "=".repeat(60));
        run_file(file, cli)?;
        println!();
    }
    Ok(())
}
