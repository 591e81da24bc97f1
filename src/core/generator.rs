// This module runs the table-building steps of an architecture. Steps are declared as a single
// ordered list; each step names the steps whose resolved indices it reads. TableGenerator::new
// validates that list up front (unique names, known dependencies, every dependency scheduled
// before its dependent) so an ordering mistake fails at startup instead of rendering tables
// full of unresolved indices. Running the generator executes the steps in declared order over
// the exclusively borrowed RecordSet and collects the GeneratedRegion each step returns.
// Diagnostics collects the non-fatal fallbacks of a run so they are reported, never swallowed.

//! Ordered table generation steps.

use hashbrown::HashSet;
use std::fmt;

use super::error::{GenError, GenResult};
use super::record::RecordSet;

/// Rendered text destined for one marker region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRegion {
    pub marker: String,
    pub text: String,
    /// Size estimate in bytes, for reporting only.
    pub size: usize,
}

impl GeneratedRegion {
    pub fn new(marker: impl Into<String>, text: impl Into<String>, size: usize) -> Self {
        Self {
            marker: marker.into(),
            text: text.into(),
            size,
        }
    }
}

/// Function building one table.
pub type StepFn = fn(&mut RecordSet) -> GenResult<GeneratedRegion>;

/// A named table-building step.
#[derive(Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    /// Steps whose results this step reads.
    pub depends_on: &'static [&'static str],
    pub run: StepFn,
}

impl Step {
    pub const fn new(name: &'static str, run: StepFn) -> Self {
        Self {
            name,
            depends_on: &[],
            run,
        }
    }

    pub const fn after(self, depends_on: &'static [&'static str]) -> Self {
        Self { depends_on, ..self }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .finish()
    }
}

/// Validated, ordered list of steps.
#[derive(Debug)]
pub struct TableGenerator {
    steps: Vec<Step>,
}

impl TableGenerator {
    /// Validate the declared order. Fails fast on duplicate names, unknown
    /// dependencies and dependencies scheduled after their dependents.
    pub fn new(steps: Vec<Step>) -> GenResult<Self> {
        let declared: HashSet<&str> = steps.iter().map(|s| s.name).collect();
        let mut done: HashSet<&str> = HashSet::new();

        for step in &steps {
            for &dependency in step.depends_on {
                if done.contains(dependency) {
                    continue;
                }
                return Err(if declared.contains(dependency) {
                    GenError::StepOrder {
                        step: step.name,
                        dependency,
                    }
                } else {
                    GenError::UnknownStep {
                        step: step.name,
                        dependency,
                    }
                });
            }
            if !done.insert(step.name) {
                return Err(GenError::DuplicateStep { step: step.name });
            }
        }

        Ok(Self { steps })
    }

    pub fn step_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|s| s.name)
    }

    /// Run every step in order. The first failing step aborts the run.
    pub fn run(&self, records: &mut RecordSet) -> GenResult<Vec<GeneratedRegion>> {
        let mut regions = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            log::debug!("Generating {}", step.name);
            let region = (step.run)(records)?;
            log::debug!("  {} -> ${{{}}} ({} bytes)", step.name, region.marker, region.size);
            regions.push(region);
        }
        Ok(regions)
    }
}

/// Non-fatal condition that degraded to a documented default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The database has no encoding group for the instruction; it gets no
    /// architecture comment and no architecture mask.
    EmptyGroup { name: String },
    /// The name sorts before the one preceding it, so the alphabetical
    /// lookup range of its letter is not contiguous.
    UnsortedName { name: String, previous: String },
    /// The name does not start with a lower-case letter and is not reachable
    /// through the alphabetical lookup ranges.
    NotIndexed { name: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::EmptyGroup { name } => {
                write!(f, "instruction '{name}' has no encoding group, using defaults")
            }
            Warning::UnsortedName { name, previous } => {
                write!(f, "instruction '{name}' sorts before '{previous}', name lookup ranges overlap")
            }
            Warning::NotIndexed { name } => {
                write!(f, "instruction '{name}' does not start with a-z, name lookup cannot find it")
            }
        }
    }
}

/// Fallbacks taken during a run.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn warn(&mut self, warning: Warning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}
