//! instgen - instruction table generator.
//!
//! instgen reads an architecture's instruction database and regenerates the
//! lookup tables an assembler is built from: the instruction id enum, the
//! packed name data, the deduplicated common data and the per-instruction
//! table. Rendered tables are spliced into `${name:Begin}` / `${name:End}`
//! regions of existing sources; everything outside the regions is left as is.
//!
//! # Primary Usage
//!
//! ```no_run
//! use instgen::arm::ArmGenerator;
//! use instgen::database::MemoryDatabase;
//! use instgen::pipeline::{self, GeneratorConfig};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), instgen::GenError> {
//! let db = MemoryDatabase::load(Path::new("arm.json"))?;
//! let summary = pipeline::run(&ArmGenerator::new(), &db, &GeneratorConfig::new("."))?;
//! println!("{}", summary.report);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`core`](crate::core) - Records, tables, formatting, step ordering and injection
//! - [`database`] - Instruction database interface
//! - [`arm`] - ARM record classification and table steps
//! - [`pipeline`] - The run driver shared by all architectures

pub mod arm;
pub mod core;
pub mod database;
pub mod pipeline;

pub use crate::core::{
    // Records
    Family, InstructionRecord, RecordBuilder, RecordSet,
    // Tables
    IndexedTable, NameTable,
    // Generation
    Diagnostics, GeneratedRegion, Step, TableGenerator, Warning,
    // Injection
    SizeReport, SourceInjector, TargetFile, TargetSet,
    // Errors
    GenError, GenResult,
};
pub use database::{Encoding, EncodingSet, EncodingVariant, InstructionDatabase, MemoryDatabase};
pub use pipeline::{ArchGenerator, GeneratorConfig, RunSummary, WriteMode};
