// This module wires the pieces of a generation run together. An ArchGenerator supplies the
// architecture-specific parts: how records are parsed from the instruction database, which
// table steps run in which order, and which target files own which marker regions. The shared
// driver parses, validates the step list, runs the steps, injects every region into the loaded
// targets, logs the table size report, and only then writes the changed files back (unless the
// run is a dry run or a check). Any fatal error stops the run before a single file is written.

//! Generation pipeline shared by all architectures.

use std::path::{Path, PathBuf};

use crate::core::{
    Diagnostics, GenResult, GeneratedRegion, RecordSet, SizeReport, SourceInjector, Step,
    TableGenerator, TargetFile, TargetSet,
};
use crate::database::InstructionDatabase;

/// Architecture-specific part of the generator.
pub trait ArchGenerator {
    /// Display name of the architecture.
    fn name(&self) -> &'static str;

    /// Build the record set from the database.
    fn parse(&self, db: &dyn InstructionDatabase, diagnostics: &mut Diagnostics)
        -> GenResult<RecordSet>;

    /// Table steps in execution order.
    fn steps(&self) -> Vec<Step>;

    /// Target files and the markers each owns.
    fn targets(&self) -> &[TargetFile];
}

/// What a run does with its results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Write changed targets back.
    #[default]
    Write,
    /// Compute and report, write nothing.
    DryRun,
    /// Like `DryRun`; callers treat any changed target as a failure.
    Check,
}

/// Settings for a generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory target paths are relative to.
    pub root: PathBuf,
    pub mode: WriteMode,
}

impl GeneratorConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: WriteMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct RunSummary {
    pub record_count: usize,
    pub report: SizeReport,
    pub diagnostics: Diagnostics,
    /// Targets whose text changed, relative to the root.
    pub changed: Vec<PathBuf>,
    /// Number of files actually written.
    pub written: usize,
}

/// Parse and build every table. Touches no files.
pub fn generate<G: ArchGenerator + ?Sized>(
    arch: &G,
    db: &dyn InstructionDatabase,
) -> GenResult<(RecordSet, Vec<GeneratedRegion>, Diagnostics)> {
    // Validate the step order before doing any work.
    let generator = TableGenerator::new(arch.steps())?;

    let mut diagnostics = Diagnostics::new();
    let mut records = arch.parse(db, &mut diagnostics)?;
    let regions = generator.run(&mut records)?;
    Ok((records, regions, diagnostics))
}

/// Generate and inject into already loaded targets. Returns the size report.
pub fn regenerate<G: ArchGenerator + ?Sized>(
    arch: &G,
    db: &dyn InstructionDatabase,
    targets: &mut TargetSet,
) -> GenResult<(RecordSet, SizeReport, Diagnostics)> {
    let (records, regions, diagnostics) = generate(arch, db)?;
    let mut injector = SourceInjector::new();
    targets.apply(&mut injector, &regions)?;
    Ok((records, injector.into_report(), diagnostics))
}

/// Full run: generate, inject into the targets below `config.root`, write back.
pub fn run<G: ArchGenerator + ?Sized>(
    arch: &G,
    db: &dyn InstructionDatabase,
    config: &GeneratorConfig,
) -> GenResult<RunSummary> {
    log::info!("Generating {} tables in {}", arch.name(), config.root.display());

    let (records, regions, diagnostics) = generate(arch, db)?;

    let mut targets = TargetSet::load(&config.root, arch.targets())?;
    let mut injector = SourceInjector::new();
    targets.apply(&mut injector, &regions)?;
    let report = injector.into_report();
    report.log();

    let changed = targets.changed();
    let written = match config.mode {
        WriteMode::Write => targets.save()?,
        WriteMode::DryRun | WriteMode::Check => {
            for path in &changed {
                log::info!("Would update {}", path.display());
            }
            0
        }
    };

    if !diagnostics.is_empty() {
        log::warn!("{} instruction(s) fell back to defaults", diagnostics.warnings().len());
    }

    Ok(RunSummary {
        record_count: records.len(),
        report,
        diagnostics,
        changed,
        written,
    })
}

/// Convenience wrapper: run with default settings below `root`.
pub fn run_in<G: ArchGenerator + ?Sized>(
    arch: &G,
    db: &dyn InstructionDatabase,
    root: &Path,
) -> GenResult<RunSummary> {
    run(arch, db, &GeneratorConfig::new(root))
}
