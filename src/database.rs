// This module is the boundary to the instruction database. The generator only reads through
// the InstructionDatabase trait: the ordered list of instruction names and, per name, the group
// of encoding variants the database knows about (or None when the name has no group). Each
// variant carries its Encoding tag (T16, T32, A32 or A64) and optional flag names. EncodingSet
// is the compact presence mask built from a group. MemoryDatabase is the one concrete
// implementation; it is filled either programmatically (tests, embedding) or from the JSON
// database file via serde_json.

//! Instruction database interface and the JSON-backed implementation.

use hashbrown::HashMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::core::{GenError, GenResult};

/// Instruction encoding form of a single variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Encoding {
    T16,
    T32,
    A32,
    A64,
}

impl Encoding {
    pub const ALL: [Encoding; 4] = [Encoding::T16, Encoding::T32, Encoding::A32, Encoding::A64];

    fn bit(self) -> u8 {
        match self {
            Encoding::T16 => 0x1,
            Encoding::T32 => 0x2,
            Encoding::A32 => 0x4,
            Encoding::A64 => 0x8,
        }
    }
}

/// One encoding variant of an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EncodingVariant {
    pub encoding: Encoding,
    #[serde(default)]
    pub flags: Vec<String>,
}

impl EncodingVariant {
    pub fn new(encoding: Encoding) -> Self {
        Self { encoding, flags: Vec::new() }
    }

    pub fn with_flags(encoding: Encoding, flags: &[&str]) -> Self {
        Self {
            encoding,
            flags: flags.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Set of encodings present in a group. The tags are not mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodingSet(u8);

impl EncodingSet {
    pub fn from_group(group: &[EncodingVariant]) -> Self {
        let mut set = Self::default();
        for variant in group {
            set.insert(variant.encoding);
        }
        set
    }

    pub fn insert(&mut self, encoding: Encoding) {
        self.0 |= encoding.bit();
    }

    pub fn contains(self, encoding: Encoding) -> bool {
        self.0 & encoding.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Encoding> {
        Encoding::ALL.into_iter().filter(move |e| self.contains(*e))
    }
}

/// Read-only view of an architecture's instruction database.
pub trait InstructionDatabase {
    /// Instruction names in enumeration order.
    fn instruction_names(&self) -> Vec<String>;

    /// Encoding variants sharing `name`, or `None` if the name has no group.
    fn group(&self, name: &str) -> Option<&[EncodingVariant]>;
}

#[derive(Debug, Deserialize)]
struct DatabaseFile {
    instructions: Vec<InstructionEntry>,
}

#[derive(Debug, Deserialize)]
struct InstructionEntry {
    name: String,
    #[serde(default)]
    variants: Option<Vec<EncodingVariant>>,
}

/// In-memory instruction database.
///
/// Names are kept exactly as supplied, duplicates included; rejecting them
/// is the record builder's job.
#[derive(Debug, Default, Clone)]
pub struct MemoryDatabase {
    names: Vec<String>,
    groups: HashMap<String, Vec<EncodingVariant>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name that has no encoding group.
    pub fn with_name(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    /// Add a name with one variant per encoding.
    pub fn with_instruction(self, name: &str, encodings: &[Encoding]) -> Self {
        let variants = encodings.iter().copied().map(EncodingVariant::new).collect();
        self.with_variants(name, variants)
    }

    pub fn with_variants(mut self, name: &str, variants: Vec<EncodingVariant>) -> Self {
        self.names.push(name.to_string());
        self.groups
            .entry(name.to_string())
            .or_default()
            .extend(variants);
        self
    }

    /// Parse a database from JSON text. `path` is only used for error reporting.
    pub fn from_json_str(text: &str, path: &Path) -> GenResult<Self> {
        let file: DatabaseFile = serde_json::from_str(text).map_err(|source| GenError::Database {
            path: path.to_path_buf(),
            source,
        })?;

        let mut db = Self::new();
        for entry in file.instructions {
            db = match entry.variants {
                Some(variants) => db.with_variants(&entry.name, variants),
                None => db.with_name(&entry.name),
            };
        }
        log::debug!("Loaded {} instruction names from {}", db.names.len(), path.display());
        Ok(db)
    }

    /// Load the JSON database at `path`.
    pub fn load(path: &Path) -> GenResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| GenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text, path)
    }
}

impl InstructionDatabase for MemoryDatabase {
    fn instruction_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn group(&self, name: &str) -> Option<&[EncodingVariant]> {
        self.groups.get(name).map(Vec::as_slice)
    }
}
