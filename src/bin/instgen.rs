//! Instruction table generator binary.
//!
//! Reads the JSON instruction database, regenerates every table and writes
//! the updated sources back below `--root`.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use instgen::arm::ArmGenerator;
use instgen::database::MemoryDatabase;
use instgen::pipeline::{self, GeneratorConfig, WriteMode};

#[derive(Parser, Debug)]
#[command(name = "instgen")]
#[command(version, about = "Regenerate instruction tables inside assembler sources")]
struct Cli {
    /// Instruction database (JSON)
    #[arg(short, long)]
    database: PathBuf,

    /// Directory the target sources are relative to
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Generate and report without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Fail if any target would change; writes nothing
    #[arg(long, conflicts_with = "dry_run")]
    check: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mode = if cli.check {
        WriteMode::Check
    } else if cli.dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::Write
    };

    let db = MemoryDatabase::load(&cli.database)?;
    let config = GeneratorConfig::new(cli.root).with_mode(mode);
    let summary = pipeline::run(&ArmGenerator::new(), &db, &config)?;

    println!("{}", summary.report);
    for warning in summary.diagnostics.warnings() {
        println!("warning: {warning}");
    }

    if mode == WriteMode::Check && !summary.changed.is_empty() {
        for path in &summary.changed {
            eprintln!("Out of date: {}", path.display());
        }
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
