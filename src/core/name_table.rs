// This module packs instruction names into a single NUL-separated string table. A name that is
// a suffix of a longer name does not get its own bytes: it points into the longer name, so "add"
// can share the tail of "qdadd". Offsets are what the generated instruction table stores as its
// name index. The empty sentinel name always lives at offset 0. Rendering produces a sequence of
// C string literal pieces wrapped to a fixed width; the final piece drops its explicit "\0"
// because the literal itself is NUL terminated.

//! Suffix-merged name data.

use hashbrown::HashMap;

use super::format::wrap_tokens;

/// Names packed into a NUL-separated byte string.
#[derive(Debug, Default, Clone)]
pub struct NameTable {
    /// Names that own bytes, in layout order, sentinel first.
    stored: Vec<String>,
    offsets: HashMap<String, u32>,
    size: usize,
}

impl NameTable {
    /// Pack `names`. Input order decides layout order; duplicates are ignored.
    pub fn build<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut unique: Vec<&str> = Vec::new();
        let mut seen: HashMap<&str, ()> = HashMap::new();
        for name in names {
            if !name.is_empty() && seen.insert(name, ()).is_none() {
                unique.push(name);
            }
        }

        // Longest names first, so the first host recorded for a suffix is the
        // longest name containing it and is therefore stored itself.
        let mut by_length = unique.clone();
        by_length.sort_by(|a, b| b.len().cmp(&a.len()));

        let mut host_of: HashMap<&str, &str> = HashMap::new();
        let mut suffixes: HashMap<&str, &str> = HashMap::new();
        for &name in &by_length {
            if let Some(&host) = suffixes.get(name) {
                host_of.insert(name, host);
                continue;
            }
            for (start, _) in name.char_indices().skip(1) {
                suffixes.entry(&name[start..]).or_insert(name);
            }
        }

        let mut table = Self::default();
        table.offsets.insert(String::new(), 0);
        table.stored.push(String::new());
        table.size = 1;

        for &name in &unique {
            if host_of.contains_key(name) {
                continue;
            }
            table.offsets.insert(name.to_string(), table.size as u32);
            table.stored.push(name.to_string());
            table.size += name.len() + 1;
        }

        for (&name, &host) in &host_of {
            let offset = table.offsets[host] + (host.len() - name.len()) as u32;
            table.offsets.insert(name.to_string(), offset);
        }

        table
    }

    /// Byte offset of `name`, if it was part of the input.
    pub fn offset_of(&self, name: &str) -> Option<u32> {
        self.offsets.get(name).copied()
    }

    /// Total size in bytes, including every terminating NUL.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Names that own their bytes, in layout order (sentinel first).
    pub fn stored(&self) -> &[String] {
        &self.stored
    }

    /// Render the table as adjacent string literal pieces wrapped at `width`.
    pub fn render(&self, indent: &str, width: usize) -> String {
        let last = self.stored.len() - 1;
        let tokens: Vec<String> = self
            .stored
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if i == last {
                    format!("\"{name}\"")
                } else {
                    format!("\"{name}\\0\"")
                }
            })
            .collect();
        wrap_tokens(&tokens, indent, width)
    }
}
