//! Reorders a folder of mp3 files so that neighbouring tracks rarely share an
//! artist or album, then copies them into folders sized for burning.
//!
//! Core modules:
//! - [`tag`] - Trailing 128-byte tag decoding
//! - [`library`] - Artist → album → songs index
//! - [`shuffle`] - Weighted two-level shuffle
//! - [`scan`] - Source directory enumeration and ingestion
//! - [`export`] - Folder bucketing and copying
//!
//! ### Supporting Modules
//!
//! - [`config`] - Optional JSON defaults
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use songpicker::{export, scan, shuffle};
//! use std::path::Path;
//!
//! let paths = scan::find_audio_files(Path::new("/music"), &scan::ScanOptions::default())?;
//! let report = scan::load_library(&paths, scan::FailurePolicy::Abort)?;
//!
//! let (mut rng, seed) = shuffle::shuffle_rng(None);
//! let order = shuffle::weighted_shuffle(report.library, &mut rng);
//! println!("Seed {seed} gave {} songs", order.len());
//!
//! let plan = export::plan_folders(order, export::DEFAULT_FOLDER_CAPACITY);
//! export::copy_plan(&plan, Path::new("/media/burn"), false)?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Algorithm Details
//!
//! Each album gets its songs shuffled and placed on jittered, evenly spaced
//! positions in the unit interval. An artist's albums are merged by those
//! positions and the merged sequence is re-spaced over the artist's song
//! count. Finally all artists are merged by position. Because every group is
//! spread over the whole interval before merging, members of one group rarely
//! end up next to each other.
//!
//! ## Error Handling
//!
//! Application-level functions return `anyhow::Result`. Reading a tag fails
//! with the typed [`tag::TagError`] so ingestion can either abort or collect
//! failures, see [`scan::FailurePolicy`]. A file without a tag is not an
//! error; its song simply carries empty metadata.

pub mod cli;
pub mod completion;
pub mod config;
pub mod export;
pub mod library;
pub mod scan;
pub mod shuffle;
pub mod tag;
