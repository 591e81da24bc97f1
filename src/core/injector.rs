// This module splices generated text into target sources. A region is delimited by a begin
// line containing ${name:Begin} and an end line containing ${name:End}; the text strictly
// between the two lines is replaced, and the delimiter lines themselves, their indentation and
// everything outside the region are left byte-for-byte untouched. A marker that is missing,
// appears more than once, or ends before it begins is a hard error, since a silently skipped
// region would leave stale generated code behind. SourceInjector also keeps the per-marker
// size report (in injection order) printed after a run.

//! Marker region replacement and size accounting.

use std::fmt;
use std::ops::Range;

use super::error::{GenError, GenResult};
use super::generator::GeneratedRegion;

/// Begin tag of `marker`, e.g. `${instData:Begin}`.
pub fn begin_tag(marker: &str) -> String {
    format!("${{{marker}:Begin}}")
}

/// End tag of `marker`, e.g. `${instData:End}`.
pub fn end_tag(marker: &str) -> String {
    format!("${{{marker}:End}}")
}

/// Whether `text` contains a begin tag for `marker`.
pub fn has_marker(text: &str, marker: &str) -> bool {
    text.contains(&begin_tag(marker))
}

fn find_unique(text: &str, tag: &str, marker: &str, file: &str) -> GenResult<usize> {
    let mut found = text.match_indices(tag).map(|(pos, _)| pos);
    let first = found.next().ok_or_else(|| GenError::MarkerNotFound {
        marker: marker.to_string(),
        file: file.to_string(),
    })?;
    if found.next().is_some() {
        return Err(GenError::DuplicateMarker {
            marker: marker.to_string(),
            file: file.to_string(),
        });
    }
    Ok(first)
}

/// Byte range of the region body: from the line after the begin tag up to
/// the start of the line holding the end tag.
pub fn locate(text: &str, marker: &str, file: &str) -> GenResult<Range<usize>> {
    let begin = find_unique(text, &begin_tag(marker), marker, file)?;
    let end = find_unique(text, &end_tag(marker), marker, file)?;

    let malformed = || GenError::MalformedRegion {
        marker: marker.to_string(),
        file: file.to_string(),
    };

    let start = text[begin..].find('\n').map(|i| begin + i + 1).ok_or_else(malformed)?;
    let stop = text[..end].rfind('\n').map_or(0, |i| i + 1);
    if stop < start {
        return Err(malformed());
    }
    Ok(start..stop)
}

/// Replace the body of `marker` in `text` with `body`.
///
/// A non-empty body always ends with exactly one newline so the end line
/// stays on its own line.
pub fn replace_region(text: &str, marker: &str, file: &str, body: &str) -> GenResult<String> {
    let range = locate(text, marker, file)?;
    let body = body.trim_end_matches('\n');

    let mut out = String::with_capacity(text.len() - range.len() + body.len() + 1);
    out.push_str(&text[..range.start]);
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    out.push_str(&text[range.end..]);
    Ok(out)
}

/// Table sizes in injection order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SizeReport {
    entries: Vec<(String, usize)>,
}

impl SizeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, size: usize) {
        self.entries.push((name.to_string(), size));
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, size)| size).sum()
    }

    /// Log every entry and the total at info level.
    pub fn log(&self) {
        for line in self.to_string().lines() {
            log::info!("{line}");
        }
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PAD: usize = 24;
        for (name, size) in &self.entries {
            writeln!(f, "{:<PAD$}: {size}", format!("Size of {name}"))?;
        }
        write!(f, "{:<PAD$}: {}", "Size of all tables", self.total())
    }
}

/// Applies generated regions to target texts.
#[derive(Debug, Default)]
pub struct SourceInjector {
    report: SizeReport,
}

impl SourceInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `region` inside `text` (the contents of `file`) and record its size.
    pub fn inject(&mut self, file: &str, text: &str, region: &GeneratedRegion) -> GenResult<String> {
        let updated = replace_region(text, &region.marker, file, &region.text)?;
        log::trace!("Injected ${{{}}} into {file}", region.marker);
        self.report.record(&region.marker, region.size);
        Ok(updated)
    }

    pub fn report(&self) -> &SizeReport {
        &self.report
    }

    pub fn into_report(self) -> SizeReport {
        self.report
    }
}
