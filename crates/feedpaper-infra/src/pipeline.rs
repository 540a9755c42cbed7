//! One wallpaper update: fetch feed, pick image, download, set, clean.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use reqwest::blocking::Client;

use feedpaper_core::Config;
use feedpaper_core::feed::{self, ParseOptions};
use feedpaper_core::select;

use crate::download;
use crate::scratch;
use crate::wallpaper::WallpaperSetter;

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub image_uri: String,
    /// Absolute path of the new wallpaper inside the scratch directory.
    pub artifact: PathBuf,
    /// Files removed from the scratch directory (0 with `keep_files`).
    pub removed: usize,
}

pub fn run(cfg: &Config, setter: &dyn WallpaperSetter) -> anyhow::Result<Outcome> {
    let client = download::client(&cfg.http).context("build HTTP client")?;
    run_with_client(cfg, &client, setter)
}

pub fn run_with_client(
    cfg: &Config,
    client: &Client,
    setter: &dyn WallpaperSetter,
) -> anyhow::Result<Outcome> {
    let dir = scratch::ensure_dir(&cfg.scratch_dir)
        .with_context(|| format!("create scratch dir {}", cfg.scratch_dir.display()))?;

    let candidates = load_candidates(cfg, client, &dir)?;
    let image_uri = select::choose_random(&candidates)?.to_string();
    tracing::info!(uri = %image_uri, of = candidates.len(), "picked image");

    let artifact =
        download::fetch_to_dir(client, &image_uri, &dir).context("fetch wallpaper image")?;

    setter.set_wallpaper(&artifact).context("set wallpaper")?;

    let removed = if cfg.keep_files {
        0
    } else {
        scratch::clean(&dir, std::slice::from_ref(&artifact))
            .with_context(|| format!("clean scratch dir {}", dir.display()))?
            .removed
    };

    tracing::info!(path = %artifact.display(), removed, "wallpaper updated");
    Ok(Outcome {
        image_uri,
        artifact,
        removed,
    })
}

fn load_candidates(cfg: &Config, client: &Client, dir: &Path) -> anyhow::Result<Vec<String>> {
    let feed_path = download::fetch_to_dir(client, &cfg.feed_url, dir).context("fetch feed")?;

    let opts = ParseOptions {
        media_content_fallback: cfg.media_content_fallback,
    };
    let parsed = feed::parse_file(&feed_path, opts);

    // The feed document never outlives parsing, even a failed one.
    fs::remove_file(&feed_path)
        .with_context(|| format!("remove feed document {}", feed_path.display()))?;

    parsed.with_context(|| format!("parse feed {}", cfg.feed_url))
}
