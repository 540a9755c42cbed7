//! Desktop wallpaper backends.

use std::path::Path;
use std::process::ExitStatus;

use thiserror::Error;

mod gnome;

pub use gnome::{GSETTINGS_BIN_ENV, GnomeBackend};

#[derive(Debug, Error)]
pub enum SetterError {
    #[error("{program} exited with {status}")]
    CommandFailed { program: String, status: ExitStatus },
}

/// Anything that can point the desktop background at a local image.
pub trait WallpaperSetter {
    fn set_wallpaper(&self, image_abs: &Path) -> anyhow::Result<()>;
}
