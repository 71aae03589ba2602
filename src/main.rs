//! # Songpicker
//!
//! Reads the trailing tags of a folder of mp3 files, interleaves artists and
//! albums into a play order, and copies the result into numbered folders that
//! each fit on one disc.
//!
//! ## Usage
//!
//! ```bash
//! # Shuffle and copy into 600 MiB folders
//! songpicker shuffle ~/Music/mp3 /media/burn
//!
//! # Just print the order, reproducibly
//! songpicker order ~/Music/mp3 --seed 42
//!
//! # Inspect the library or one tag
//! songpicker list ~/Music/mp3
//! songpicker tag ~/Music/mp3/song.mp3
//! ```

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::info;
use path_absolutize::Absolutize;

use songpicker::cli::{self, SourceArgs};
use songpicker::config::Settings;
use songpicker::library::{LibraryIndex, Song};
use songpicker::tag::Id3v1Tag;
use songpicker::{completion, export, scan, shuffle};

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(path
        .absolutize()
        .with_context(|| format!("Failed to resolve path {}", path.display()))?
        .into_owned())
}

/// Scan and load the source directory described by `source`.
fn load(source: &SourceArgs, settings: &Settings) -> Result<LibraryIndex> {
    let src = absolute(&source.src)?;
    info!("Loading songs from: {}", src.display());

    let paths = scan::find_audio_files(&src, &settings.scan_options())?;
    let report = scan::load_library(&paths, settings.failure_policy())
        .context("Aborting: a song could not be read (use --keep-going to skip it)")?;

    for failure in &report.failures {
        eprintln!("Skipped: {failure}");
    }
    Ok(report.library)
}

fn shuffled(library: LibraryIndex, seed: Option<u64>) -> Vec<Song> {
    let (mut rng, seed) = shuffle::shuffle_rng(seed);
    info!("Shuffling with seed {seed}");
    shuffle::weighted_shuffle(library, &mut rng)
}

/// Main entry point.
///
/// Logging is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug songpicker order ~/Music` - Enable debug logging
/// - `RUST_LOG=songpicker::shuffle=trace songpicker order ~/Music` - Module-specific logging
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Shuffle {
            source,
            dest,
            seed,
            folder_size,
            dry_run,
        } => {
            let settings = source.resolve(&Settings::load()?);
            let songs = shuffled(load(&source, &settings)?, seed);

            let dest = absolute(&dest)?;
            info!("Writing to: {}", dest.display());

            let capacity = folder_size.unwrap_or(settings.folder_capacity);
            let plan = export::plan_folders(songs, capacity);
            let written = export::copy_plan(&plan, &dest, dry_run)?;

            for (song, target) in plan.iter().flat_map(|f| &f.songs).zip(&written) {
                println!("{song}  ->  {}", target.display());
            }
        }
        cli::Command::Order { source, seed } => {
            let settings = source.resolve(&Settings::load()?);
            for song in shuffled(load(&source, &settings)?, seed) {
                println!("{song}");
            }
        }
        cli::Command::List { source } => {
            let settings = source.resolve(&Settings::load()?);
            print!("{}", load(&source, &settings)?);
        }
        cli::Command::Tag { file } => {
            let tag = Id3v1Tag::read(&file)?;
            match tag.parse() {
                Some(fields) => print!("{fields}"),
                None => eprintln!("No tag found in {}", file.display()),
            }
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(
                completion::shell_to_completion_shell(shell),
                &mut cmd,
                &mut io::stdout(),
            );
        }
    }

    Ok(())
}
