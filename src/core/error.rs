// This module defines the error type for instgen using the thiserror crate. GenError covers
// every fatal condition of a generation run: duplicate or malformed instruction names coming
// from the database, a table step rendering an index that no earlier step resolved, step lists
// declared in an order that violates their dependencies, and marker regions that are missing,
// duplicated or malformed in a target file. I/O and database parse failures carry the path they
// happened on. GenResult<T> is the convenience alias used throughout the crate. All of these
// abort the run before any target file is written.

//! Error types for instgen.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for a generation run.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("Duplicate instruction name: {name}")]
    DuplicateName {
        name: String,
    },

    #[error("Instruction names {name} and {existing} both map to symbol {symbol}")]
    DuplicateSymbol {
        name: String,
        existing: String,
        symbol: String,
    },

    #[error("Malformed instruction name {name:?}: {reason}")]
    MalformedName {
        name: String,
        reason: &'static str,
    },

    #[error("Table {table} reads unresolved {field} of {symbol}")]
    UnresolvedReference {
        table: &'static str,
        symbol: String,
        field: &'static str,
    },

    #[error("Step {step} is scheduled before its dependency {dependency}")]
    StepOrder {
        step: &'static str,
        dependency: &'static str,
    },

    #[error("Step {step} depends on unknown step {dependency}")]
    UnknownStep {
        step: &'static str,
        dependency: &'static str,
    },

    #[error("Step {step} is declared more than once")]
    DuplicateStep {
        step: &'static str,
    },

    #[error("Marker {marker} not found in {file}")]
    MarkerNotFound {
        marker: String,
        file: String,
    },

    #[error("Marker {marker} appears more than once in {file}")]
    DuplicateMarker {
        marker: String,
        file: String,
    },

    #[error("Marker {marker} in {file} ends before it begins")]
    MalformedRegion {
        marker: String,
        file: String,
    },

    #[error("No target file owns marker {marker}")]
    UnknownMarker {
        marker: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid instruction database {}: {source}", path.display())]
    Database {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Result type alias for generation operations.
pub type GenResult<T> = Result<T, GenError>;
