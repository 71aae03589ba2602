//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `songpicker` binary.
//!
//! ## Commands
//!
//! - `shuffle`: Interleave the source songs and copy them into sized folders
//! - `order`: Print the interleaved play order without copying
//! - `list`: Print the library grouped by artist and album
//! - `tag`: Print the trailing tag of a single file
//! - `completion`: Generate shell completions
//!
//! ## Examples
//!
//! ```bash
//! songpicker shuffle ~/Music/mp3 /media/burn --folder-size 734003200
//! songpicker order ~/Music/mp3 --seed 42
//! songpicker tag "~/Music/mp3/01 - Intro.mp3"
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Settings;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "songpicker")]
#[command(about = "Songpicker: interleave artists and albums, then fill fixed-size folders")]
#[command(version)]
pub struct Args {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Where to find songs and how to treat them. Flags left unset fall back to
/// the config file.
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory holding the songs
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub src: PathBuf,

    /// File extension to pick up (default: mp3)
    #[arg(long)]
    pub extension: Option<String>,

    /// Descend into subdirectories of the source
    #[arg(long, overrides_with = "no_recursive")]
    pub recursive: bool,

    /// Only scan the top level of the source, even if the config says otherwise
    #[arg(long, overrides_with = "recursive")]
    pub no_recursive: bool,

    /// Skip files whose tag cannot be read instead of aborting
    ///
    /// Skipped files are listed on stderr once loading is done.
    #[arg(long, overrides_with = "no_keep_going")]
    pub keep_going: bool,

    /// Abort on the first unreadable file, even if the config says otherwise
    #[arg(long, overrides_with = "keep_going")]
    pub no_keep_going: bool,
}

/// `--flag` wins, then `--no-flag`, then the configured value.
fn flag_or(on: bool, off: bool, configured: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        configured
    }
}

impl SourceArgs {
    /// Apply these flags on top of `settings`.
    #[must_use]
    pub fn resolve(&self, settings: &Settings) -> Settings {
        Settings {
            extension: self
                .extension
                .clone()
                .unwrap_or_else(|| settings.extension.clone()),
            recursive: flag_or(self.recursive, self.no_recursive, settings.recursive),
            keep_going: flag_or(self.keep_going, self.no_keep_going, settings.keep_going),
            ..settings.clone()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Shuffle songs and copy them into numbered, size-bounded folders
    ///
    /// Songs from the same artist or album are spread apart. Each folder
    /// (01, 02, ...) holds at most --folder-size bytes, and files are
    /// renamed "NNN - title.mp3" in play order.
    Shuffle {
        #[command(flatten)]
        source: SourceArgs,

        /// Directory that receives the numbered folders
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dest: PathBuf,

        /// Seed for a reproducible order
        #[arg(long, env = "SONGPICKER_SEED")]
        seed: Option<u64>,

        /// Maximum bytes per folder (default: 629145600, 600 MiB)
        #[arg(long)]
        folder_size: Option<u64>,

        /// Print the destination paths without copying anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the shuffled play order without copying
    Order {
        #[command(flatten)]
        source: SourceArgs,

        /// Seed for a reproducible order
        #[arg(long, env = "SONGPICKER_SEED")]
        seed: Option<u64>,
    },

    /// List the library sorted by artist
    List {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the trailing tag of one file as key=value lines
    Tag {
        /// The file to inspect
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Generate shell completions
    ///
    /// Usage: songpicker completion bash > ~/.local/share/bash-completion/completions/songpicker
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
