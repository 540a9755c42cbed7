//! feedpaper-infra: OS adapters (HTTP download, desktop session, gsettings, scratch dir).

pub mod config_file;
pub mod download;
pub mod pipeline;
pub mod scratch;
pub mod session;
pub mod wallpaper;
