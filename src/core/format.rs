//! Text layout helpers for generated tables.
//!
//! Everything here is cosmetic: padding aligns columns so the generated
//! source is readable, it never changes what a row means.

/// Width of the banner lines around generated blocks.
pub const LINE_WIDTH: usize = 79;

/// Pad `value` with trailing spaces to `width`. Never truncates.
pub fn pad_end(value: &str, width: usize) -> String {
    format!("{value:<width$}")
}

/// Pad `value` with leading spaces to `width`. Never truncates.
pub fn pad_start(value: &str, width: usize) -> String {
    format!("{value:>width$}")
}

/// Column widths measured over a whole table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Columns {
    widths: Vec<usize>,
}

impl Columns {
    /// Measure every column as the widest cell in it.
    pub fn measure<R: AsRef<[String]>>(rows: &[R]) -> Self {
        let mut widths = Vec::new();
        for row in rows {
            for (i, cell) in row.as_ref().iter().enumerate() {
                if widths.len() <= i {
                    widths.push(0);
                }
                widths[i] = widths[i].max(cell.len());
            }
        }
        Self { widths }
    }

    /// Raise columns to at least the given widths.
    pub fn at_least(mut self, minimums: &[usize]) -> Self {
        for (i, &min) in minimums.iter().enumerate() {
            if self.widths.len() <= i {
                self.widths.push(0);
            }
            self.widths[i] = self.widths[i].max(min);
        }
        self
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Pad every cell to its column and join them with `sep`.
    pub fn align(&self, cells: &[String], sep: &str) -> String {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| pad_end(cell, self.widths.get(i).copied().unwrap_or(0)))
            .collect();
        padded.join(sep)
    }
}

/// Render one item per line, lines separated by `,`.
///
/// `complete` adds the separator after the last line too. An empty slice
/// renders as an empty string.
pub fn format_lines<T>(
    items: &[T],
    indent: &str,
    complete: bool,
    mut render: impl FnMut(&T) -> String,
) -> String {
    let last = items.len().saturating_sub(1);
    let lines: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let sep = if i != last || complete { "," } else { "" };
            format!("{indent}{}{sep}", render(item))
        })
        .collect();
    lines.join("\n")
}

/// Render items as `open cell, cell, ... close`, one per line, with every
/// column aligned across the table.
///
/// Cells are rendered once, then measured, then emitted. A fallible cell
/// renderer aborts the whole table.
pub fn format_aligned<T, E>(
    items: &[T],
    indent: &str,
    complete: bool,
    (open, close): (&str, &str),
    mut cells: impl FnMut(&T) -> Result<Vec<String>, E>,
) -> Result<String, E> {
    let rows = items.iter().map(&mut cells).collect::<Result<Vec<_>, E>>()?;
    let columns = Columns::measure(&rows);
    Ok(format_lines(&rows, indent, complete, |row| {
        format!("{open}{}{close}", columns.align(row, ", "))
    }))
}

/// Pack space separated tokens into lines no wider than `width`.
///
/// A token wider than the line still gets a line of its own.
pub fn wrap_tokens(tokens: &[String], indent: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for token in tokens {
        if !line.is_empty() && line.len() + 1 + token.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if line.is_empty() {
            line.push_str(indent);
        } else {
            line.push(' ');
        }
        line.push_str(token);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.join("\n")
}

/// Surround `text` with the "do not edit" banner.
pub fn disclaimer(text: &str) -> String {
    let title = " Automatically generated, do not edit ";
    let dashes = (LINE_WIDTH - 3 - title.len()) / 2;
    let head = format!(
        "// {}{title}{}",
        "-".repeat(dashes),
        "-".repeat(LINE_WIDTH - 3 - title.len() - dashes)
    );
    let foot = format!("// {}", "-".repeat(LINE_WIDTH - 3));
    format!("{head}\n{}\n{foot}\n", text.trim_end_matches('\n'))
}
