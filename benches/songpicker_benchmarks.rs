//! # Songpicker Performance Benchmarks
//!
//! ## Benchmark Categories
//!
//! - **Shuffle**: Weighted shuffle over libraries of increasing size
//! - **Tag Decoding**: Parsing a trailing tag block
//! - **Folder Planning**: Bucketing a play order into folders
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench shuffle
//! ```

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::hint::black_box;
use std::path::PathBuf;

use songpicker::export;
use songpicker::library::{LibraryIndex, Song};
use songpicker::shuffle;
use songpicker::tag::{Id3v1Tag, TAG_SIZE};

/// Helper function to create a library: 10 songs per album, 5 albums per artist
fn create_test_library(count: usize) -> LibraryIndex {
    (1..=count)
        .map(|i| Song {
            artist: format!("Artist {}", (i - 1) / 50 + 1),
            album: format!("Album {}", (i - 1) / 10 + 1),
            title: format!("Song {i:04}"),
            path: PathBuf::from(format!("/music/song{i:04}.mp3")),
            size: 4_000_000 + (i as u64 % 7) * 250_000,
        })
        .collect()
}

fn benchmark_shuffle(c: &mut Criterion) {
    let mut group = c.benchmark_group("shuffle");

    for size in [10, 100, 1000, 10_000].iter() {
        let library = create_test_library(*size);

        group.bench_with_input(BenchmarkId::new("weighted_shuffle", size), &library, |b, library| {
            b.iter_batched(
                || (library.clone(), shuffle::shuffle_rng(Some(1)).0),
                |(library, mut rng)| shuffle::weighted_shuffle(black_box(library), &mut rng),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn benchmark_tag_decoding(c: &mut Criterion) {
    let mut block = [b' '; TAG_SIZE];
    block[..3].copy_from_slice(b"TAG");
    block[3..13].copy_from_slice(b"Some Title");
    let tag = Id3v1Tag::from(block);

    c.bench_function("tag_parse", |b| b.iter(|| black_box(&tag).parse()));
}

fn benchmark_folder_planning(c: &mut Criterion) {
    let (mut rng, _) = shuffle::shuffle_rng(Some(1));
    let order = shuffle::weighted_shuffle(create_test_library(1000), &mut rng);

    c.bench_function("plan_1000_songs", |b| {
        b.iter_batched(
            || order.clone(),
            |songs| export::plan_folders(black_box(songs), export::DEFAULT_FOLDER_CAPACITY),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    benchmark_shuffle,
    benchmark_tag_decoding,
    benchmark_folder_planning,
);

criterion_main!(benches);
