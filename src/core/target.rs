//! Target files and their write-back.
//!
//! Every target file is read once before injection, all regions are applied
//! in memory, and files are written only after every region of the run has
//! been applied. A failing run therefore leaves every file untouched.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{GenError, GenResult};
use super::generator::GeneratedRegion;
use super::injector::SourceInjector;

/// A target file and the markers it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFile {
    /// Path relative to the source root.
    pub path: PathBuf,
    pub markers: Vec<String>,
}

impl TargetFile {
    pub fn new(path: impl Into<PathBuf>, markers: &[&str]) -> Self {
        Self {
            path: path.into(),
            markers: markers.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn owns(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| m == marker)
    }
}

#[derive(Debug)]
struct LoadedFile {
    target: TargetFile,
    /// Location on disk.
    location: PathBuf,
    original: String,
    current: String,
}

impl LoadedFile {
    fn label(&self) -> String {
        self.target.path.display().to_string()
    }
}

/// Target file contents for one run.
#[derive(Debug, Default)]
pub struct TargetSet {
    files: Vec<LoadedFile>,
}

impl TargetSet {
    /// Read every target below `root`.
    pub fn load(root: &Path, targets: &[TargetFile]) -> GenResult<Self> {
        let mut set = Self::default();
        for target in targets {
            let location = root.join(&target.path);
            let text = fs::read_to_string(&location).map_err(|source| GenError::Io {
                path: location.clone(),
                source,
            })?;
            log::debug!("Loaded {} ({} bytes)", location.display(), text.len());
            set.push(target.clone(), location, text);
        }
        Ok(set)
    }

    /// Build a set from in-memory texts, located below `root`.
    pub fn from_texts<'a>(
        root: &Path,
        texts: impl IntoIterator<Item = (TargetFile, &'a str)>,
    ) -> Self {
        let mut set = Self::default();
        for (target, text) in texts {
            let location = root.join(&target.path);
            set.push(target, location, text.to_string());
        }
        set
    }

    fn push(&mut self, target: TargetFile, location: PathBuf, text: String) {
        self.files.push(LoadedFile {
            target,
            location,
            current: text.clone(),
            original: text,
        });
    }

    /// Apply every region to the file owning its marker.
    pub fn apply(&mut self, injector: &mut SourceInjector, regions: &[GeneratedRegion]) -> GenResult<()> {
        for region in regions {
            let file = self
                .files
                .iter_mut()
                .find(|f| f.target.owns(&region.marker))
                .ok_or_else(|| GenError::UnknownMarker {
                    marker: region.marker.clone(),
                })?;
            let label = file.label();
            file.current = injector.inject(&label, &file.current, region)?;
        }
        Ok(())
    }

    /// Current text of the target at `path` (relative to the root).
    pub fn text(&self, path: &Path) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.target.path == path)
            .map(|f| f.current.as_str())
    }

    /// Targets whose text differs from what was loaded.
    pub fn changed(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter(|f| f.current != f.original)
            .map(|f| f.target.path.clone())
            .collect()
    }

    /// Write changed files back. Each file is written to a temporary
    /// sibling and renamed over the original. Returns the number written.
    pub fn save(&self) -> GenResult<usize> {
        let mut written = 0;
        for file in self.files.iter().filter(|f| f.current != f.original) {
            write_atomic(&file.location, &file.current)?;
            log::info!("Updated {}", file.location.display());
            written += 1;
        }
        Ok(written)
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> GenError {
    let path = path.to_path_buf();
    move |source| GenError::Io { path, source }
}

fn write_atomic(path: &Path, text: &str) -> GenResult<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = path.with_file_name(format!(".{file_name}.instgen.tmp"));

    fs::write(&temp, text).map_err(io_error(&temp))?;
    fs::rename(&temp, path).map_err(|source| {
        // Leave no stray temporary behind in the source tree.
        let _ = fs::remove_file(&temp);
        GenError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}
