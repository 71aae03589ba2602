//! # Export Module
//!
//! Splits a play order into numbered folders that each fit a byte budget,
//! then copies the songs into them.
//!
//! ```text
//! DEST/01/001 - First Song.mp3
//! DEST/01/002 - Second Song.mp3
//! DEST/02/001 - Third Song.mp3
//! ```
//!
//! Files are renamed with their position inside the folder; any leading track
//! number in the original file name is dropped.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::library::Song;

/// 600 MiB, sized for a CD.
pub const DEFAULT_FOLDER_CAPACITY: u64 = 629_145_600;

/// One destination folder and the songs it receives, in play order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Folder {
    /// 1-based folder number.
    pub number: usize,
    pub songs: Vec<Song>,
    /// Sum of the song sizes in bytes.
    pub size: u64,
}

/// Bucket `songs` into folders of at most `capacity` bytes, keeping order.
///
/// A new folder is started when the next song would push the current one over
/// `capacity`. A song larger than `capacity` gets a folder to itself.
/// Folders are numbered from 1 and no folder is ever empty; an empty play
/// order gives an empty plan.
///
/// # Examples
///
/// ```
/// use songpicker::export::plan_folders;
/// use songpicker::library::Song;
///
/// let songs: Vec<Song> = [40, 50, 30, 200]
///     .iter()
///     .map(|&size| Song { size, ..Song::default() })
///     .collect();
///
/// let plan = plan_folders(songs, 100);
/// let sizes: Vec<u64> = plan.iter().map(|folder| folder.size).collect();
/// assert_eq!(sizes, [90, 30, 200]);
/// assert_eq!(plan[2].number, 3);
/// ```
///
/// # Design Notes
///
/// Sizes are summed with saturation. [`copy_plan`] takes the plan as is,
/// with or without `--dry-run`.
#[must_use]
pub fn plan_folders(songs: Vec<Song>, capacity: u64) -> Vec<Folder> {
    let mut folders: Vec<Folder> = Vec::new();

    for song in songs {
        let full = folders
            .last()
            .map_or(true, |folder| folder.size.saturating_add(song.size) > capacity);
        if full {
            folders.push(Folder {
                number: folders.len() + 1,
                ..Folder::default()
            });
        }

        if let Some(folder) = folders.last_mut() {
            folder.size += song.size;
            folder.songs.push(song);
        }
    }

    folders
}

/// Drop a leading track number and the separators after it.
///
/// Digits are skipped until the first space; spaces and dashes are skipped
/// until the first other character, from which the name is kept verbatim.
/// A name that would be stripped to nothing is kept whole.
#[must_use]
pub fn strip_track_prefix(file_name: &str) -> &str {
    let mut seen_space = false;
    for (idx, c) in file_name.char_indices() {
        if !seen_space && c.is_ascii_digit() {
            continue;
        }
        if c == ' ' {
            seen_space = true;
            continue;
        }
        if c == '-' {
            continue;
        }
        return &file_name[idx..];
    }
    file_name
}

/// File name for the `index`-th song (1-based) of a folder.
#[must_use]
pub fn destination_name(index: usize, file_name: &str) -> String {
    format!("{index:03} - {}", strip_track_prefix(file_name))
}

/// Directory name for folder `number`: two digits, zero padded.
#[must_use]
pub fn folder_dir_name(number: usize) -> String {
    format!("{number:02}")
}

/// Copy every planned song below `dest`, returning the destination paths.
///
/// With `dry_run` the paths are computed but nothing is created or copied.
///
/// # Errors
///
/// Fails on the first folder that cannot be created or file that cannot be
/// copied.
pub fn copy_plan(plan: &[Folder], dest: &Path, dry_run: bool) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(plan.iter().map(|folder| folder.songs.len()).sum());

    for folder in plan {
        let dir = dest.join(folder_dir_name(folder.number));
        if !dry_run {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create folder {}", dir.display()))?;
        }
        debug!(
            "Folder {}: {} songs, {} bytes",
            dir.display(),
            folder.songs.len(),
            folder.size
        );

        for (idx, song) in folder.songs.iter().enumerate() {
            let file_name = song
                .path
                .file_name()
                .with_context(|| format!("{} has no file name", song.path.display()))?
                .to_string_lossy();
            let target = dir.join(destination_name(idx + 1, &file_name));

            if !dry_run {
                fs::copy(&song.path, &target).with_context(|| {
                    format!(
                        "Failed to copy {} to {}",
                        song.path.display(),
                        target.display()
                    )
                })?;
            }
            written.push(target);
        }
    }

    info!("Exported {} songs into {} folders", written.len(), plan.len());
    Ok(written)
}
