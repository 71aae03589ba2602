//! # Library Index Module
//!
//! In-memory grouping of songs: artist → album → songs in ingestion order.
//!
//! The index is built once per run and then only read. Both levels are kept in
//! `BTreeMap`s so that walking the index is a pure function of its contents;
//! a fixed shuffle seed therefore always produces the same order.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::tag::TagFields;

/// One audio file and the metadata read from its tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Song {
    pub artist: String,
    pub album: String,
    pub title: String,
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
}

impl Song {
    /// Build a song from decoded tag fields. `None` gives empty metadata.
    #[must_use]
    pub fn from_tag(fields: Option<TagFields>, path: PathBuf, size: u64) -> Self {
        let fields = fields.unwrap_or_default();
        Self {
            artist: fields.artist,
            album: fields.album,
            title: fields.title,
            path,
            size,
        }
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

/// Songs sharing an artist and album name.
#[derive(Debug, Clone, Default)]
pub struct Album {
    pub name: String,
    pub songs: Vec<Song>,
}

/// All albums of one artist, keyed by album name.
#[derive(Debug, Clone, Default)]
pub struct Artist {
    pub name: String,
    pub albums: BTreeMap<String, Album>,
}

impl Artist {
    /// An artist with no albums yet.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            albums: BTreeMap::new(),
        }
    }

    pub fn get_or_create_album(&mut self, name: &str) -> &mut Album {
        self.albums
            .entry(name.to_string())
            .or_insert_with(|| Album {
                name: name.to_string(),
                songs: Vec::new(),
            })
    }

    /// Append `song` to the album named by `song.album`.
    pub fn add_song(&mut self, song: Song) {
        let album = self.get_or_create_album(&song.album);
        album.songs.push(song);
    }

    /// Total number of songs across all albums.
    #[must_use]
    pub fn song_count(&self) -> usize {
        self.albums.values().map(|album| album.songs.len()).sum()
    }
}

/// Artist name → [`Artist`] for a single run.
#[derive(Debug, Clone, Default)]
pub struct LibraryIndex {
    artists: BTreeMap<String, Artist>,
}

impl LibraryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create_artist(&mut self, name: &str) -> &mut Artist {
        self.artists
            .entry(name.to_string())
            .or_insert_with(|| Artist::new(name))
    }

    /// File `song` under its artist and album, creating both as needed.
    pub fn add_song(&mut self, song: Song) {
        let artist = self.get_or_create_artist(&song.artist);
        artist.add_song(song);
    }

    #[must_use]
    pub fn artist(&self, name: &str) -> Option<&Artist> {
        self.artists.get(name)
    }

    /// Artists in name order; each artist's albums are also in name order.
    pub fn list_all_sorted(&self) -> impl Iterator<Item = &Artist> {
        self.artists.values()
    }

    /// Total number of songs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artists.values().map(Artist::song_count).sum()
    }

    /// True when no songs have been added, even if artists were created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Consumes the index, yielding artists in name order.
impl IntoIterator for LibraryIndex {
    type Item = Artist;
    type IntoIter = std::collections::btree_map::IntoValues<String, Artist>;

    fn into_iter(self) -> Self::IntoIter {
        self.artists.into_values()
    }
}

impl Extend<Song> for LibraryIndex {
    fn extend<I: IntoIterator<Item = Song>>(&mut self, iter: I) {
        for song in iter {
            self.add_song(song);
        }
    }
}

impl FromIterator<Song> for LibraryIndex {
    fn from_iter<I: IntoIterator<Item = Song>>(iter: I) -> Self {
        let mut library = Self::new();
        library.extend(iter);
        library
    }
}

impl fmt::Display for LibraryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for artist in self.list_all_sorted() {
            writeln!(f, "Artist: {}", artist.name)?;
            for album in artist.albums.values() {
                writeln!(f, "  {}", album.name)?;
                for song in &album.songs {
                    writeln!(f, "    {}", song.title)?;
                }
            }
        }
        Ok(())
    }
}
