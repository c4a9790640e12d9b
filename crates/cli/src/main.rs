// rollcall CLI - find source contacts missing from a reference list

mod exit_codes;
mod recon;

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Report source contacts that are missing from a reference list")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a source spreadsheet against a reference spreadsheet
    #[command(after_help = "\
Examples:
  rollcall run
  rollcall run --source ai.xls --reference Kitap1.xlsx --output fark.xlsx
  rollcall run --config rollcall.toml --json
  rollcall run --source contacts.csv --reference-sheet Members -q")]
    Run(recon::RunArgs),

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  rollcall validate rollcall.toml")]
    Validate {
        /// Path to the TOML config file
        config: std::path::PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("ROLLCALL_GIT_HASH"), ")",
        "\nengine:  rollcall-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("ROLLCALL_TARGET"),
    )
}

/// Install the stderr log subscriber. `log` records from the library crates
/// are forwarded through the subscriber's `tracing-log` bridge.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();

    if let Err(e) = installed {
        eprintln!("warning: logging disabled: {e}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => recon::cmd_run(args),
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<rollcall_io::IoError> for CliError {
    fn from(err: rollcall_io::IoError) -> Self {
        let hint = match &err {
            rollcall_io::IoError::UnsupportedFormat { .. } => {
                Some("supported: .xlsx .xlsm .xls .xlsb .ods .csv .tsv".to_string())
            }
            _ => None,
        };
        Self { code: EXIT_ERROR, message: err.to_string(), hint }
    }
}

impl From<rollcall_recon::ReconError> for CliError {
    fn from(err: rollcall_recon::ReconError) -> Self {
        Self::new(err.to_string())
    }
}
