// This module holds the normalized instruction records every generated table is rendered from.
// RecordBuilder turns the database's ordered name list into a RecordSet: the reserved sentinel
// record (id 0, empty name, symbol "None") comes first, followed by one InstructionRecord per
// name in database order. Names are validated (no empty, control, quote or backslash characters)
// and must be unique, since later tables rely on name -> record being a bijection. Distinct
// names must also yield distinct symbols ("add" and "Add" would both become kIdAdd). Cross
// references into other tables (name data offset, common data index) start unresolved and are
// filled in by the generation steps that own those tables; reading one that is still unresolved
// is a GenError::UnresolvedReference rather than a silent zero.

//! Instruction records and the record builder.

use hashbrown::HashMap;

use super::error::{GenError, GenResult};
use crate::database::EncodingSet;

/// Symbol of the sentinel "no instruction" record.
pub const SENTINEL_SYMBOL: &str = "None";

/// Instruction family classification.
///
/// The ARM tables do not assign families yet, every record stays `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Family {
    #[default]
    None,
}

impl Family {
    /// Name of the family constant in the generated source.
    pub fn constant(self) -> &'static str {
        match self {
            Family::None => "kFamilyNone",
        }
    }
}

/// One instruction plus the metadata the generator attaches to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionRecord {
    /// Numeric id, equal to the record's position in its set.
    pub id: u32,
    pub name: String,
    /// Enum symbol without the `kId` prefix.
    pub symbol: String,
    pub family: Family,
    /// Index into family-specific data.
    pub family_index: u32,
    /// Encodings of the instruction's group, `None` if the database has no group for it.
    pub encodings: Option<EncodingSet>,
    /// Union of the flags of all variants, sorted.
    pub flags: Vec<String>,
    name_index: Option<u32>,
    common_index: Option<u32>,
}

impl InstructionRecord {
    fn new(id: u32, name: &str, symbol: String) -> Self {
        Self {
            id,
            name: name.to_string(),
            symbol,
            family: Family::None,
            family_index: 0,
            encodings: None,
            flags: Vec::new(),
            name_index: None,
            common_index: None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.id == 0
    }

    /// Offset of the name in the name data table.
    pub fn name_index(&self, table: &'static str) -> GenResult<u32> {
        self.name_index.ok_or_else(|| self.unresolved(table, "name index"))
    }

    /// Index of the row in the common data table.
    pub fn common_index(&self, table: &'static str) -> GenResult<u32> {
        self.common_index.ok_or_else(|| self.unresolved(table, "common index"))
    }

    pub fn set_name_index(&mut self, index: u32) {
        self.name_index = Some(index);
    }

    pub fn set_common_index(&mut self, index: u32) {
        self.common_index = Some(index);
    }

    pub fn is_resolved(&self) -> bool {
        self.name_index.is_some() && self.common_index.is_some()
    }

    fn unresolved(&self, table: &'static str, field: &'static str) -> GenError {
        GenError::UnresolvedReference {
            table,
            symbol: self.symbol.clone(),
            field,
        }
    }
}

/// Upper-case the first character of `name`, leaving the rest unchanged.
pub fn up_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ordered set of instruction records, sentinel first.
#[derive(Debug, Clone)]
pub struct RecordSet {
    records: Vec<InstructionRecord>,
    by_name: HashMap<String, u32>,
    by_symbol: HashMap<String, u32>,
}

impl RecordSet {
    /// A set holding only the sentinel record.
    pub fn new() -> Self {
        let sentinel = InstructionRecord::new(0, "", SENTINEL_SYMBOL.to_string());
        let mut by_name = HashMap::new();
        by_name.insert(String::new(), 0);
        let mut by_symbol = HashMap::new();
        by_symbol.insert(SENTINEL_SYMBOL.to_string(), 0);
        Self {
            records: vec![sentinel],
            by_name,
            by_symbol,
        }
    }

    /// Append a record for `name`, failing on duplicate names or symbols.
    pub fn push(&mut self, name: &str) -> GenResult<&mut InstructionRecord> {
        validate_name(name)?;
        if self.by_name.contains_key(name) {
            return Err(GenError::DuplicateName {
                name: name.to_string(),
            });
        }

        let symbol = up_first(name);
        if let Some(&other) = self.by_symbol.get(&symbol) {
            let existing = &self.records[other as usize];
            return Err(GenError::DuplicateSymbol {
                name: name.to_string(),
                existing: if existing.is_sentinel() {
                    "the sentinel".to_string()
                } else {
                    existing.name.clone()
                },
                symbol,
            });
        }

        let id = self.records.len() as u32;
        self.by_name.insert(name.to_string(), id);
        self.by_symbol.insert(symbol.clone(), id);
        self.records.push(InstructionRecord::new(id, name, symbol));
        let last = self.records.len() - 1;
        Ok(&mut self.records[last])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false, the sentinel is never removed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sentinel(&self) -> &InstructionRecord {
        &self.records[0]
    }

    pub fn get(&self, id: u32) -> Option<&InstructionRecord> {
        self.records.get(id as usize)
    }

    pub fn find(&self, name: &str) -> Option<&InstructionRecord> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut InstructionRecord> {
        let id = *self.by_name.get(name)?;
        self.records.get_mut(id as usize)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InstructionRecord> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, InstructionRecord> {
        self.records.iter_mut()
    }

    pub fn as_slice(&self) -> &[InstructionRecord] {
        &self.records
    }

    /// Records without the sentinel.
    pub fn instructions(&self) -> &[InstructionRecord] {
        &self.records[1..]
    }
}

impl Default for RecordSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a InstructionRecord;
    type IntoIter = std::slice::Iter<'a, InstructionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn validate_name(name: &str) -> GenResult<()> {
    let reason = if name.is_empty() {
        "empty name is reserved for the sentinel"
    } else if !name.chars().all(|c| c.is_ascii_graphic()) {
        "names must be printable ASCII without spaces"
    } else if name.contains(['"', '\\']) {
        "quotes and backslashes cannot appear in a name literal"
    } else {
        return Ok(());
    };

    Err(GenError::MalformedName {
        name: name.to_string(),
        reason,
    })
}

/// Builds the record set from the database's name list.
#[derive(Debug, Default)]
pub struct RecordBuilder;

impl RecordBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Sentinel first, then one record per name in enumeration order.
    pub fn build<I, S>(&self, names: I) -> GenResult<RecordSet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut records = RecordSet::new();
        for name in names {
            let record = records.push(name.as_ref())?;
            log::trace!("Record #{} {} -> {}", record.id, record.name, record.symbol);
        }
        Ok(records)
    }
}
