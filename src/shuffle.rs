//! Weighted shuffle: turns the library into a play order where songs of the
//! same album or artist are spread apart.
//!
//! Every group (an album, then an artist) gets its members placed on roughly
//! evenly spaced, jittered slots of the unit interval. Sorting the merged
//! pools by slot position interleaves the groups.
//!
//! ```text
//! album  : shuffle songs, weight = Σ (distribution + U·variability)
//! artist : sort album pools together by weight, re-weight with n = |artist|
//! global : sort all artist pools by weight, drop the weights
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::library::{Album, Artist, LibraryIndex, Song};

/// Slot geometry for a group of `n` items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotSpacing {
    /// Fixed advance per item.
    pub distribution: f64,
    /// Width of the random advance added on top of `distribution`.
    pub variability: f64,
}

impl SlotSpacing {
    /// Spacing for a group of `n` items.
    ///
    /// Each slot nominally spans `1/(n+1)`; half of it is fixed and the other
    /// half is drawn uniformly from a window twice as wide.
    ///
    /// ```
    /// use songpicker::shuffle::SlotSpacing;
    ///
    /// let spacing = SlotSpacing::for_group(1);
    /// assert_eq!(spacing.distribution, 0.25);
    /// assert_eq!(spacing.variability, 0.5);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn for_group(n: usize) -> Self {
        let mut distribution = 1.0 / (n as f64 + 1.0);
        let mut variability = distribution / 2.0;
        distribution -= variability;
        variability *= 2.0;
        Self {
            distribution,
            variability,
        }
    }

    /// Produce `count` strictly increasing, positive weights.
    pub fn assign<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<f64> {
        let mut current = 0.0;
        (0..count)
            .map(|_| {
                current += self.distribution;
                current += rng.gen::<f64>() * self.variability;
                current
            })
            .collect()
    }
}

/// A song paired with its position during the shuffle.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSong {
    pub song: Song,
    pub weight: f64,
}

/// Build the run's random source.
///
/// A `seed` makes the run reproducible; without one the seed is taken from
/// the system clock. The seed actually used is returned alongside the rng.
#[must_use]
pub fn shuffle_rng(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(clock_seed);
    (StdRng::seed_from_u64(seed), seed)
}

#[allow(clippy::cast_possible_truncation)]
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Weigh one album: a random permutation of its songs, visited in order, gets
/// increasing jittered weights sized for the album.
///
/// Every song of the album appears exactly once in the result, ordered by
/// weight.
pub fn weigh_album<R: Rng + ?Sized>(album: Album, rng: &mut R) -> Vec<WeightedSong> {
    let mut songs = album.songs;
    songs.shuffle(rng);

    let weights = SlotSpacing::for_group(songs.len()).assign(songs.len(), rng);
    songs
        .into_iter()
        .zip(weights)
        .map(|(song, weight)| WeightedSong { song, weight })
        .collect()
}

/// Weigh one artist: merge its album pools by album weight, then re-weight
/// the merged sequence with slots sized for the whole artist.
///
/// Each album is weighed on its own with [`weigh_album`], so songs of one
/// album land on slots spread over the whole unit interval. Sorting the
/// album pools together therefore alternates between albums. The merged
/// order is then given fresh weights for `n = song_count()`, which is what
/// the global pass compares against other artists.
///
/// # Examples
///
/// ```
/// use songpicker::library::{Artist, Song};
/// use songpicker::shuffle::{shuffle_rng, weigh_artist};
///
/// let mut artist = Artist::new("Artist");
/// for (album, title) in [("A", "a1"), ("A", "a2"), ("B", "b1")] {
///     artist.add_song(Song {
///         artist: "Artist".into(),
///         album: album.into(),
///         title: title.into(),
///         ..Song::default()
///     });
/// }
///
/// let (mut rng, _) = shuffle_rng(Some(3));
/// let pool = weigh_artist(artist, &mut rng);
/// assert_eq!(pool.len(), 3);
/// assert!(pool.windows(2).all(|pair| pair[0].weight < pair[1].weight));
/// ```
///
/// # Design Notes
///
/// Albums are walked in name order, and ties between album weights keep
/// that order. The rng is the only source of variation, so a fixed seed
/// gives a fixed pool.
pub fn weigh_artist<R: Rng + ?Sized>(artist: Artist, rng: &mut R) -> Vec<WeightedSong> {
    let mut pool = Vec::with_capacity(artist.song_count());
    for album in artist.albums.into_values() {
        pool.extend(weigh_album(album, rng));
    }
    sort_by_weight(&mut pool);

    let weights = SlotSpacing::for_group(pool.len()).assign(pool.len(), rng);
    for (weighted, weight) in pool.iter_mut().zip(weights) {
        weighted.weight = weight;
    }

    trace!("Weighed {} songs for artist `{}'", pool.len(), artist.name);
    pool
}

/// Weigh every artist and merge them into one pool sorted by artist weight.
///
/// The result holds every song of `library` exactly once, in ascending
/// weight order. An empty library gives an empty pool.
///
/// # Examples
///
/// ```
/// use songpicker::library::{LibraryIndex, Song};
/// use songpicker::shuffle::{distribute, shuffle_rng};
///
/// let library: LibraryIndex = [("X", "x1"), ("X", "x2"), ("Y", "y1")]
///     .iter()
///     .map(|(artist, title)| Song {
///         artist: artist.to_string(),
///         title: title.to_string(),
///         ..Song::default()
///     })
///     .collect();
///
/// let (mut rng, _) = shuffle_rng(Some(11));
/// let pool = distribute(library, &mut rng);
/// assert_eq!(pool.len(), 3);
/// assert!(pool.windows(2).all(|pair| pair[0].weight <= pair[1].weight));
/// ```
///
/// # Design Notes
///
/// Weights from different artists are compared directly. An artist with
/// many songs gets narrow slots, so its songs are spread between those of
/// smaller artists instead of clustering.
pub fn distribute<R: Rng + ?Sized>(library: LibraryIndex, rng: &mut R) -> Vec<WeightedSong> {
    let mut pool = Vec::with_capacity(library.len());
    for artist in library {
        pool.extend(weigh_artist(artist, rng));
    }
    sort_by_weight(&mut pool);
    pool
}

/// Drop the weights, keeping the order.
#[must_use]
pub fn into_play_order(weighted: Vec<WeightedSong>) -> Vec<Song> {
    weighted.into_iter().map(|weighted| weighted.song).collect()
}

/// Shuffle the whole library into a play order.
///
/// ```
/// use songpicker::library::{LibraryIndex, Song};
/// use songpicker::shuffle::{shuffle_rng, weighted_shuffle};
///
/// let library: LibraryIndex = ["a", "b", "c"]
///     .iter()
///     .map(|title| Song { artist: "Artist".into(), title: title.to_string(), ..Song::default() })
///     .collect();
///
/// let (mut rng, _) = shuffle_rng(Some(7));
/// let order = weighted_shuffle(library, &mut rng);
/// assert_eq!(order.len(), 3);
/// ```
pub fn weighted_shuffle<R: Rng + ?Sized>(library: LibraryIndex, rng: &mut R) -> Vec<Song> {
    let total = library.len();
    let order = into_play_order(distribute(library, rng));
    debug!("Distributed {total} songs");
    order
}

/// Stable ascending sort; equal weights keep their previous order.
fn sort_by_weight(pool: &mut [WeightedSong]) {
    pool.sort_by(|a, b| a.weight.total_cmp(&b.weight));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::tests::song;
    use std::collections::HashSet;

    fn album_of(n: usize) -> Album {
        Album {
            name: "Album".to_string(),
            songs: (0..n).map(|i| song("Artist", "Album", &format!("t{i}"))).collect(),
        }
    }

    fn scenario() -> LibraryIndex {
        vec![
            song("A", "X", "s1"),
            song("A", "X", "s2"),
            song("A", "Y", "s3"),
            song("B", "Z", "s4"),
        ]
        .into_iter()
        .collect()
    }

    fn big_library() -> LibraryIndex {
        (0..60)
            .map(|i| song(&format!("artist{}", i % 4), &format!("album{}", i % 7), &format!("t{i}")))
            .collect()
    }

    fn titles(songs: &[Song]) -> Vec<String> {
        songs.iter().map(|s| s.title.clone()).collect()
    }

    #[test]
    fn test_single_item_spacing_is_finite() {
        let spacing = SlotSpacing::for_group(1);
        assert_eq!(spacing.distribution + spacing.variability / 2.0, 0.5);

        let (mut rng, _) = shuffle_rng(Some(1));
        let weights = spacing.assign(1, &mut rng);
        assert_eq!(weights.len(), 1);
        assert!(weights[0].is_finite());
        assert!(weights[0] >= 0.25 && weights[0] < 0.75);
    }

    #[test]
    fn test_spacing_stays_finite_for_large_groups() {
        let spacing = SlotSpacing::for_group(100_000);
        assert!(spacing.distribution.is_finite() && spacing.distribution > 0.0);
        assert!(spacing.variability.is_finite() && spacing.variability > 0.0);
    }

    #[test]
    fn test_album_weights_strictly_increasing() {
        for seed in 0..50 {
            let (mut rng, _) = shuffle_rng(Some(seed));
            let weighted = weigh_album(album_of(12), &mut rng);

            assert_eq!(weighted.len(), 12);
            assert!(weighted[0].weight > 0.0);
            for pair in weighted.windows(2) {
                assert!(pair[0].weight < pair[1].weight, "seed {seed}: weights must increase");
            }
            // Upper bound of n * (distribution + variability).
            assert!(weighted[11].weight < 1.5);
        }
    }

    #[test]
    fn test_album_weighing_preserves_songs() {
        for n in [1, 2, 5, 12] {
            let expected: HashSet<_> = album_of(n).songs.into_iter().collect();
            for seed in 0..20 {
                let (mut rng, _) = shuffle_rng(Some(seed));
                let weighted = weigh_album(album_of(n), &mut rng);

                assert_eq!(weighted.len(), n);
                let actual: HashSet<_> = weighted.into_iter().map(|w| w.song).collect();
                assert_eq!(actual, expected, "n = {n}, seed {seed}");
            }
        }
    }

    #[test]
    fn test_small_album_weights_in_unit_interval() {
        for n in 1..=2 {
            for seed in 0..100 {
                let (mut rng, _) = shuffle_rng(Some(seed));
                for weighted in weigh_album(album_of(n), &mut rng) {
                    assert!(weighted.weight > 0.0 && weighted.weight < 1.0);
                }
            }
        }
    }

    #[test]
    fn test_album_weighing_permutes_songs() {
        let original: Vec<String> = titles(&album_of(8).songs);
        let reordered = (0..20).any(|seed| {
            let (mut rng, _) = shuffle_rng(Some(seed));
            let weighted = weigh_album(album_of(8), &mut rng);
            weighted.iter().map(|w| w.song.title.clone()).collect::<Vec<_>>() != original
        });
        assert!(reordered, "album order should be permuted for some seed");
    }

    #[test]
    fn test_artist_weighing_preserves_songs() {
        let artist = scenario().artist("A").unwrap().clone();
        let (mut rng, _) = shuffle_rng(Some(3));
        let weighted = weigh_artist(artist, &mut rng);

        assert_eq!(weighted.len(), 3);
        let set: HashSet<_> = weighted.iter().map(|w| w.song.title.as_str()).collect();
        assert_eq!(set, HashSet::from(["s1", "s2", "s3"]));
        for pair in weighted.windows(2) {
            assert!(pair[0].weight < pair[1].weight);
        }
    }

    #[test]
    fn test_distribute_is_sorted_by_weight() {
        let (mut rng, _) = shuffle_rng(Some(11));
        let pool = distribute(big_library(), &mut rng);
        assert!(pool.windows(2).all(|pair| pair[0].weight <= pair[1].weight));
    }

    #[test]
    fn test_shuffle_preserves_every_song_once() {
        let library = big_library();
        let expected: HashSet<_> = library
            .list_all_sorted()
            .flat_map(|artist| artist.albums.values())
            .flat_map(|album| album.songs.iter().cloned())
            .collect();

        let (mut rng, _) = shuffle_rng(Some(5));
        let order = weighted_shuffle(library, &mut rng);

        assert_eq!(order.len(), expected.len());
        let actual: HashSet<_> = order.into_iter().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_same_seed_same_order() {
        let (mut first_rng, seed) = shuffle_rng(Some(42));
        let (mut second_rng, _) = shuffle_rng(Some(seed));

        let first = weighted_shuffle(big_library(), &mut first_rng);
        let second = weighted_shuffle(big_library(), &mut second_rng);
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_usually_differ() {
        let (mut rng, _) = shuffle_rng(Some(0));
        let baseline = titles(&weighted_shuffle(big_library(), &mut rng));

        let differs = (1..10).any(|seed| {
            let (mut rng, _) = shuffle_rng(Some(seed));
            titles(&weighted_shuffle(big_library(), &mut rng)) != baseline
        });
        assert!(differs);
    }

    #[test]
    fn test_scenario_album_songs_not_forced_together() {
        let mut separated = false;
        for seed in 0..200 {
            let (mut rng, _) = shuffle_rng(Some(seed));
            let order = titles(&weighted_shuffle(scenario(), &mut rng));

            let mut sorted = order.clone();
            sorted.sort();
            assert_eq!(sorted, ["s1", "s2", "s3", "s4"]);

            let s1 = order.iter().position(|t| t == "s1").unwrap();
            let s2 = order.iter().position(|t| t == "s2").unwrap();
            if s1.abs_diff(s2) > 1 {
                separated = true;
            }
        }
        assert!(separated, "songs of album X should be separable");
    }

    #[test]
    fn test_single_song_library() {
        let library: LibraryIndex = vec![song("Solo", "One", "only")].into_iter().collect();
        let (mut rng, _) = shuffle_rng(None);
        let order = weighted_shuffle(library, &mut rng);
        assert_eq!(titles(&order), ["only"]);
    }

    #[test]
    fn test_empty_library_gives_empty_order() {
        let (mut rng, _) = shuffle_rng(Some(0));
        assert!(weighted_shuffle(LibraryIndex::new(), &mut rng).is_empty());
    }

    #[test]
    fn test_equal_weights_keep_prior_order() {
        let mut pool: Vec<WeightedSong> = ["a", "b", "c"]
            .iter()
            .map(|t| WeightedSong {
                song: song("A", "X", t),
                weight: 0.5,
            })
            .collect();
        sort_by_weight(&mut pool);
        let order: Vec<_> = pool.iter().map(|w| w.song.title.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }
}
