//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use feedpaper_core::Config;

#[derive(Debug, Parser)]
#[command(name = "feedpaper", version)]
#[command(about = "Set the desktop wallpaper from a random image in an RSS feed", long_about = None)]
pub struct Cli {
    /// RSS feed to read (defaults to the configured feed).
    pub feed_url: Option<String>,

    /// Config file (TOML).
    #[arg(short, long, env = "FEEDPAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory to stage downloads in.
    #[arg(short = 'd', long)]
    pub scratch_dir: Option<PathBuf>,

    /// Keep previous downloads.
    #[arg(short, long)]
    pub keep_files: bool,

    /// Log progress (-vv for details).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Layer command-line overrides on top of the loaded config.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(url) = &self.feed_url {
            cfg.feed_url.clone_from(url);
        }
        if let Some(dir) = &self.scratch_dir {
            cfg.scratch_dir.clone_from(dir);
        }
        if self.keep_files {
            cfg.keep_files = true;
        }
        if self.verbose > 0 {
            cfg.quiet = false;
        }
    }
}
