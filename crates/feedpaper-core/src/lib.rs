//! feedpaper-core: configuration, feed parsing and image selection.

pub mod config;
pub mod feed;
pub mod select;
pub mod uri;

pub use config::Config;
