//! # Trailing Tag Module
//!
//! Reads the fixed 128-byte metadata block found at the end of mp3 files and
//! decodes it into [`TagFields`].
//!
//! ## Layout
//!
//! ```text
//! [0,3)     "TAG" marker
//! [3,33)    title
//! [33,63)   artist
//! [63,93)   album
//! [93,97)   year
//! [97,126)  comment
//! 126       track number in some variants (not decoded)
//! 127       genre code
//! ```
//!
//! A block without the marker is not an error: [`Id3v1Tag::parse`] returns
//! `None` and callers fall back to empty metadata. Only I/O problems while
//! reading the block are reported as [`TagError`].

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::trace;
use thiserror::Error;

/// Size of the trailing tag block in bytes.
pub const TAG_SIZE: usize = 128;

const MARKER: &[u8; 3] = b"TAG";

/// Failure to obtain the trailing bytes of a file.
#[derive(Debug, Error)]
pub enum TagError {
    /// The file could not be opened, or a seek/read failed.
    #[error("cannot read tag from `{}`: {source}", .path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is smaller than the trailing window.
    #[error("`{}` is only {len} bytes, too short for a trailing tag", .path.display())]
    TooShort { path: PathBuf, len: u64 },
}

impl TagError {
    /// The file that could not be read.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::UnreadableFile { path, .. } | Self::TooShort { path, .. } => path,
        }
    }
}

fn unreadable(path: &Path) -> impl Fn(io::Error) -> TagError + '_ {
    move |source| TagError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    }
}

/// Open `path` and read exactly its last `N` bytes.
///
/// # Errors
///
/// Returns [`TagError::TooShort`] when the file holds fewer than `N` bytes and
/// [`TagError::UnreadableFile`] when opening, seeking or reading fails.
pub fn read_trailing_bytes<const N: usize>(path: &Path) -> Result<[u8; N], TagError> {
    let mut file = File::open(path).map_err(unreadable(path))?;
    let len = file.metadata().map_err(unreadable(path))?.len();
    if len < N as u64 {
        return Err(TagError::TooShort {
            path: path.to_path_buf(),
            len,
        });
    }

    #[allow(clippy::cast_possible_wrap)]
    let offset = -(N as i64);
    file.seek(SeekFrom::End(offset)).map_err(unreadable(path))?;

    let mut buf = [0u8; N];
    file.read_exact(&mut buf).map_err(unreadable(path))?;
    Ok(buf)
}

/// Decoded contents of a trailing tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFields {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    pub genre: u8,
}

impl fmt::Display for TagFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&default_format(self))
    }
}

/// Render `fields` as `key=value` lines in the order
/// album, artist, title, genre, year, comment.
#[must_use]
pub fn default_format(fields: &TagFields) -> String {
    format!(
        "album={}\nartist={}\ntitle={}\ngenre={}\nyear={}\ncomment={}\n",
        fields.album, fields.artist, fields.title, fields.genre, fields.year, fields.comment
    )
}

/// A raw 128-byte trailing tag block.
#[derive(Clone, PartialEq, Eq)]
pub struct Id3v1Tag {
    bytes: [u8; TAG_SIZE],
}

impl From<[u8; TAG_SIZE]> for Id3v1Tag {
    fn from(bytes: [u8; TAG_SIZE]) -> Self {
        Self { bytes }
    }
}

impl fmt::Debug for Id3v1Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Id3v1Tag")
            .field("has_marker", &self.has_marker())
            .finish_non_exhaustive()
    }
}

impl Id3v1Tag {
    /// Read the tag block at the end of `path`.
    ///
    /// # Errors
    ///
    /// Propagates [`read_trailing_bytes`] failures. A missing marker is not an
    /// error.
    pub fn read(path: &Path) -> Result<Self, TagError> {
        let bytes = read_trailing_bytes::<TAG_SIZE>(path)?;
        trace!("Read trailing tag block of `{}'", path.display());
        Ok(Self::from(bytes))
    }

    /// Whether the block starts with the `TAG` marker.
    #[must_use]
    pub fn has_marker(&self) -> bool {
        &self.bytes[..3] == MARKER
    }

    /// Decode the block, or `None` if it does not start with `TAG`.
    ///
    /// Text fields are decoded byte-for-byte as ISO-8859-1, then trimmed of
    /// whitespace and NUL padding. Any byte sequence is accepted; there is no
    /// validation, so two tags differing in a single byte always decode to
    /// different strings. Byte 126 (the track number of some variants) is
    /// skipped and byte 127 is returned as the raw genre code.
    ///
    /// # Examples
    ///
    /// ```
    /// use songpicker::tag::{Id3v1Tag, TAG_SIZE};
    ///
    /// let mut block = [0u8; TAG_SIZE];
    /// block[..3].copy_from_slice(b"TAG");
    /// block[33..40].copy_from_slice(b"Beyonc\xE9");
    /// block[127] = 7;
    ///
    /// let fields = Id3v1Tag::from(block).parse().unwrap();
    /// assert_eq!(fields.artist, "Beyonc\u{e9}");
    /// assert_eq!(fields.genre, 7);
    ///
    /// assert!(Id3v1Tag::from([0u8; TAG_SIZE]).parse().is_none());
    /// ```
    #[must_use]
    pub fn parse(&self) -> Option<TagFields> {
        if !self.has_marker() {
            return None;
        }

        Some(TagFields {
            title: text_field(&self.bytes[3..33]),
            artist: text_field(&self.bytes[33..63]),
            album: text_field(&self.bytes[63..93]),
            year: text_field(&self.bytes[93..97]),
            comment: text_field(&self.bytes[97..126]),
            genre: self.bytes[127],
        })
    }
}

impl fmt::Display for Id3v1Tag {
    /// Renders the parsed fields, or nothing when the marker is missing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parse() {
            Some(fields) => fmt::Display::fmt(&fields, f),
            None => Ok(()),
        }
    }
}

/// Fields are ISO-8859-1: every byte maps to the code point of the same value,
/// so no input is lost or merged.
fn text_field(bytes: &[u8]) -> String {
    let text: String = bytes.iter().map(|&b| char::from(b)).collect();
    text.trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}
