//! CLI module for dylt
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ConfigOverrides;
use crate::domain::model::{ClipSpec, DownloadRequest};

pub mod args;
pub mod commands;

/// Download a video, optionally trimmed to the parts you want
///
/// Without --url the link is taken from the clipboard.
#[derive(Parser, Debug)]
#[command(name = "dylt")]
#[command(about = "Download online videos, optionally trimmed to the parts you want")]
#[command(version)]
pub struct Cli {
    /// Video URL (default: clipboard contents)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Ranges to keep, e.g. "0:08-5:01,6:00-6:30"
    #[arg(short, long, value_name = "SPEC", value_parser = args::parse_clip_spec)]
    pub clip: Option<ClipSpec>,

    /// Output base name (default: video title)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Tags appended to the file name
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Keep only the audio track
    #[arg(short, long)]
    pub audio_only: bool,

    /// Maximum video height, e.g. 1080p
    #[arg(short, long, value_name = "N[p]", value_parser = args::parse_resolution)]
    pub resolution: Option<u32>,

    /// Output directory (default: from config, else Downloads)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write a markdown source note with this comment
    #[arg(long, value_name = "TEXT")]
    pub note: Option<String>,

    /// Replace an existing output file
    #[arg(long)]
    pub overwrite: bool,

    /// Configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Debug logging mirrored to stderr
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// Flags that take precedence over the config file
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output_dir: self.output_dir.clone(),
            resolution: self.resolution,
        }
    }

    /// Build the download request
    pub fn to_request(&self) -> DownloadRequest {
        DownloadRequest {
            url: self.url.clone(),
            name: self.name.clone(),
            tags: self
                .tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            audio_only: self.audio_only,
            clip: self.clip.clone().unwrap_or_default(),
            resolution: self.resolution,
            note: self.note.clone(),
            overwrite: self.overwrite,
        }
    }
}
