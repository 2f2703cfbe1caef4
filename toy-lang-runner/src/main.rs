mod repl;
mod runner;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, ValueEnum)]
pub enum Mode {
    /// Evaluate the program
    Run,
    /// Print the tokens the lexer produces
    Tokens,
    /// Print the parsed program
    Ast,
}

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, value_enum, default_value_t=Mode::Run)]
    mode: Mode,
    /// Source file to run. Starts a REPL when omitted.
    path: Option<PathBuf>,
}

/// Logs go to stderr and are only enabled when `RUST_LOG` is set,
/// e.g. `RUST_LOG=toy_lang_interpreter=debug`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.path {
        None => repl::start(cli.mode).map_err(runner::RunError::from),
        Some(path) => runner::run_file(&path, cli.mode),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
