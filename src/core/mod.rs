// This module is the architecture-independent part of instgen: everything needed to turn a
// record set into rendered tables and to splice those tables into target sources. It exports
// the record model (InstructionRecord, RecordSet, RecordBuilder), the content-addressed
// IndexedTable and the suffix-merged NameTable, the text layout helpers, the validated step
// list (TableGenerator), the marker-region injector with its size report, and the target file
// set that defers every write until a run has fully succeeded. Architectures only supply record
// construction and per-row rendering on top of these pieces.

//! Shared table generation infrastructure.
//!
//! # Key Components
//!
//! ## Records (`record`)
//! - Sentinel "no instruction" record first, unique names after it
//! - Cross-table indices start unresolved and fail loudly if read that way
//!
//! ## Tables (`indexed_table`, `name_table`)
//! - Content-addressed rows with stable indices
//! - NUL-separated name data with suffix sharing
//!
//! ## Generation (`generator`, `format`)
//! - Declared step order, validated before anything runs
//! - Two-pass column alignment
//!
//! ## Injection (`injector`, `target`)
//! - `${name:Begin}` / `${name:End}` regions, everything else untouched
//! - All-or-nothing write-back

pub mod error;
pub mod format;
pub mod generator;
pub mod indexed_table;
pub mod injector;
pub mod name_table;
pub mod record;
pub mod target;

pub use error::{
    GenError,
    GenResult,
};

pub use record::{
    Family,
    InstructionRecord,
    RecordBuilder,
    RecordSet,
};

pub use indexed_table::IndexedTable;
pub use name_table::NameTable;

pub use generator::{
    Diagnostics,
    GeneratedRegion,
    Step,
    TableGenerator,
    Warning,
};

pub use injector::{
    SizeReport,
    SourceInjector,
};

pub use target::{
    TargetFile,
    TargetSet,
};
