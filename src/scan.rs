//! # Ingestion Module
//!
//! Finds audio files in a source directory and loads them into a
//! [`LibraryIndex`].
//!
//! ## Failure Policy
//!
//! A file whose trailing tag cannot be read stops ingestion by default
//! ([`FailurePolicy::Abort`]): the run either loads everything or nothing.
//! [`FailurePolicy::Skip`] logs the file, records it in
//! [`LoadReport::failures`] and moves on.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::library::{LibraryIndex, Song};
use crate::tag::{Id3v1Tag, TagError};

/// Which files to pick up from the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Extension to match, without the dot. Case-insensitive.
    pub extension: String,
    /// Descend into subdirectories.
    pub recursive: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: "mp3".to_string(),
            recursive: false,
        }
    }
}

/// What to do with a file whose tag block cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first unreadable file.
    #[default]
    Abort,
    /// Report the file and keep going.
    Skip,
}

/// Outcome of [`load_library`].
#[derive(Debug, Default)]
pub struct LoadReport {
    pub library: LibraryIndex,
    /// Files left out under [`FailurePolicy::Skip`].
    pub failures: Vec<TagError>,
}

fn matches_extension(path: &Path, wanted: &str) -> bool {
    let wanted = wanted.trim().trim_start_matches('.');
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// List the matching files in `dir`, sorted by path.
///
/// # Errors
///
/// Fails if `dir` is not an existing directory.
pub fn find_audio_files(dir: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Source directory {} does not exist or is not a directory", dir.display());
    }

    let mut walker = WalkDir::new(dir).follow_links(true);
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    let mut paths: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && matches_extension(e.path(), &options.extension))
        .map(walkdir::DirEntry::into_path)
        .collect();
    paths.sort();

    debug!("Found {} .{} files in {}", paths.len(), options.extension, dir.display());
    Ok(paths)
}

/// Read one file into a [`Song`]. A file without a tag gets empty metadata.
///
/// # Errors
///
/// Returns the [`TagError`] if the trailing block cannot be read.
pub fn load_song(path: &Path) -> Result<Song, TagError> {
    let tag = Id3v1Tag::read(path)?;
    let size = fs::metadata(path)
        .map_err(|source| TagError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    let fields = tag.parse();
    if fields.is_none() {
        debug!("No tag in {}, using empty metadata", path.display());
    }
    Ok(Song::from_tag(fields, path.to_path_buf(), size))
}

/// Load every path into a fresh [`LibraryIndex`].
///
/// # Errors
///
/// Under [`FailurePolicy::Abort`] the first unreadable file is returned as the
/// error and nothing is loaded. Under [`FailurePolicy::Skip`] this never fails.
pub fn load_library<I, P>(paths: I, policy: FailurePolicy) -> Result<LoadReport, TagError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut report = LoadReport::default();

    for path in paths {
        match load_song(path.as_ref()) {
            Ok(song) => report.library.add_song(song),
            Err(err) if policy == FailurePolicy::Skip => {
                warn!("Skipping {}: {err}", err.path().display());
                report.failures.push(err);
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        "Loaded {} songs, {} unreadable",
        report.library.len(),
        report.failures.len()
    );
    Ok(report)
}
