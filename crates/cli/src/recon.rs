//! `rollcall run` / `rollcall validate`: compare a source list against a reference list.

use std::path::{Path, PathBuf};

use clap::Args;
use rollcall_recon::{Dataset, ReconConfig, ReconError, ReconResult, Table};

use crate::CliError;

#[derive(Args)]
pub struct RunArgs {
    /// Source spreadsheet whose rows are checked [default: ai.xls]
    #[arg(long, short = 's')]
    pub source: Option<PathBuf>,

    /// Reference spreadsheet of known contacts [default: Kitap1.xlsx]
    #[arg(long, short = 'r')]
    pub reference: Option<PathBuf>,

    /// Where to write the unmatched source rows [default: fark.xlsx]
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Sheet to read from the source workbook (first sheet if omitted)
    #[arg(long)]
    pub source_sheet: Option<String>,

    /// Sheet to read from the reference workbook (first sheet if omitted)
    #[arg(long)]
    pub reference_sheet: Option<String>,

    /// TOML config file; flags override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Print the result as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Suppress the human summary on stderr
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Human progress lines on stderr, silenced by `--quiet`.
struct Progress {
    quiet: bool,
}

impl Progress {
    fn say(&self, line: impl std::fmt::Display) {
        if !self.quiet {
            eprintln!("{line}");
        }
    }
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let config = resolve_config(&args)?;
    let progress = Progress { quiet: args.quiet };

    // Both inputs are read and checked before any matching happens.
    let source = read_input(&config.source.file, config.source.sheet.as_deref())?;
    progress.say(format_args!(
        "source:    {} ({} rows)",
        config.source.file.display(),
        source.row_count()
    ));
    let reference = read_input(&config.reference.file, config.reference.sheet.as_deref())?;
    progress.say(format_args!(
        "reference: {} ({} rows)",
        config.reference.file.display(),
        reference.row_count()
    ));

    let result = rollcall_recon::run(&config.schema(), &source, &reference)
        .map_err(|e| schema_err(e, &source, &reference))?;

    if args.json {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::new(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    print_summary(&progress, &result);

    if !result.has_differences() {
        progress.say("no differences: every source contact is in the reference");
        return Ok(());
    }

    let diff_table = result.project(&source);
    rollcall_io::write_table(&diff_table, &config.output.file)?;
    progress.say(format_args!(
        "wrote {} row(s) to {}",
        diff_table.row_count(),
        config.output.file.display()
    ));

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    config.validate()?;
    let src = &config.source.columns;
    let reference = &config.reference.columns;
    eprintln!(
        "valid: source '{}' [{}, {}], reference '{}' [{}, {}, {}], output '{}'",
        config.source.file.display(),
        src.full_name,
        src.phone_number,
        config.reference.file.display(),
        reference.first_name,
        reference.last_name,
        reference.phone,
        config.output.file.display(),
    );
    Ok(())
}

/// Config file (if any) with relative paths resolved against its directory,
/// then command-line overrides. Validation runs once, on the merged result.
fn resolve_config(args: &RunArgs) -> Result<ReconConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ReconConfig::default(),
    };

    if let Some(path) = &args.source {
        config.source.file = path.clone();
    }
    if let Some(path) = &args.reference {
        config.reference.file = path.clone();
    }
    if let Some(path) = &args.output {
        config.output.file = path.clone();
    }
    if let Some(sheet) = &args.source_sheet {
        config.source.sheet = Some(sheet.clone());
    }
    if let Some(sheet) = &args.reference_sheet {
        config.reference.sheet = Some(sheet.clone());
    }

    config.validate()?;
    log::debug!(
        "config: source={} reference={} output={}",
        config.source.file.display(),
        config.reference.file.display(),
        config.output.file.display()
    );
    Ok(config)
}

fn load_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        CliError::new(format!("cannot read config {}: {e}", config_path.display()))
    })?;

    let mut config = ReconConfig::parse(&config_str)?;

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    config.resolve_paths(base_dir);
    Ok(config)
}

fn read_input(path: &Path, sheet: Option<&str>) -> Result<Table, CliError> {
    if !path.exists() {
        return Err(CliError::new(format!("cannot read {}: file not found", path.display()))
            .with_hint("pass --source / --reference or set the file in a --config"));
    }
    Ok(rollcall_io::read_table(path, sheet)?)
}

/// Missing-column errors carry the columns the offending file does have.
fn schema_err(err: ReconError, source: &Table, reference: &Table) -> CliError {
    let table = match &err {
        ReconError::MissingColumns { dataset: Dataset::Source, .. } => source,
        ReconError::MissingColumns { dataset: Dataset::Reference, .. } => reference,
        _ => return CliError::from(err),
    };
    let available = if table.headers.is_empty() {
        "(none)".to_string()
    } else {
        table.headers.join(", ")
    };
    CliError::from(err).with_hint(format!("available columns: {available}"))
}

fn print_summary(progress: &Progress, result: &ReconResult) {
    let s = &result.summary;
    progress.say(format_args!(
        "records:   {} of {} source rows, {} of {} reference rows ({} index keys)",
        s.source_records, s.source_rows, s.reference_records, s.reference_rows, s.index_keys,
    ));
    progress.say(format_args!(
        "matched:   {} ({} exact, {} name only, {} phone only), {} differences",
        s.matched(),
        s.matched_exact,
        s.matched_name_only,
        s.matched_phone_only,
        s.differences,
    ));
}
