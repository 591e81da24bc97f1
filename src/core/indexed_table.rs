//! Content-addressed, append-only table.
//!
//! Most instructions share identical rows in tables such as the common data
//! table, so every row goes through [`IndexedTable::append_or_reuse`]: an
//! already-seen row returns its original index, a new row is appended. The
//! table size therefore tracks distinct behavior, not instruction count.

use hashbrown::HashMap;

/// Deduplicated table of serialized rows in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct IndexedTable {
    rows: Vec<String>,
    index: HashMap<String, u32>,
    refs: Vec<u32>,
}

impl IndexedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `row`, appending it if it has not been seen.
    ///
    /// Indices are stable: a returned index never changes meaning.
    pub fn append_or_reuse(&mut self, row: impl Into<String>) -> u32 {
        let row = row.into();
        if let Some(&existing) = self.index.get(&row) {
            self.refs[existing as usize] += 1;
            return existing;
        }

        let index = self.rows.len() as u32;
        self.index.insert(row.clone(), index);
        self.rows.push(row);
        self.refs.push(1);
        index
    }

    /// Number of unique rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.rows.get(index as usize).map(String::as_str)
    }

    pub fn index_of(&self, row: &str) -> Option<u32> {
        self.index.get(row).copied()
    }

    /// How many appends resolved to the row at `index`.
    pub fn ref_count(&self, index: u32) -> u32 {
        self.refs.get(index as usize).copied().unwrap_or(0)
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Render one row per line, each followed by its index and reference count.
    ///
    /// Rows are separated by `,`; `complete` adds the separator after the
    /// last row as well.
    pub fn render(&self, indent: &str, complete: bool) -> String {
        let last = self.rows.len().saturating_sub(1);
        let lines: Vec<String> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let sep = if i != last || complete { "," } else { " " };
                format!("{indent}{row}{sep} // #{i} [ref={}x]", self.refs[i])
            })
            .collect();
        lines.join("\n")
    }
}
