//! Runtime configuration.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! yields a working setup: NASA's image of the day, a scratch directory under
//! the system temp dir, and GNOME's `gsettings`.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_FEED_URL: &str = "https://www.nasa.gov/rss/dyn/image_of_the_day.rss";

/// Name of the scratch directory created under the system temp dir.
pub const SCRATCH_DIR_NAME: &str = "feedpaper";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// RSS feed to pick the wallpaper from.
    pub feed_url: String,
    /// Where the feed document and downloaded images are staged.
    pub scratch_dir: PathBuf,
    /// Keep previous downloads instead of deleting everything but the new wallpaper.
    pub keep_files: bool,
    /// Suppress progress logging.
    pub quiet: bool,
    /// Consult Media RSS `media:content` elements when no image enclosure is present.
    pub media_content_fallback: bool,
    pub http: HttpConfig,
    pub session: SessionConfig,
    pub gsettings: GSettingsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            scratch_dir: std::env::temp_dir().join(SCRATCH_DIR_NAME),
            keep_files: false,
            quiet: true,
            media_content_fallback: false,
            http: HttpConfig::default(),
            session: SessionConfig::default(),
            gsettings: GSettingsConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Whole-request timeout. Unset means block until the server answers.
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("feedpaper/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// How `gsettings` gets hold of the session bus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPolicy {
    /// Read the bus address out of a running desktop session process.
    #[default]
    Discover,
    /// Trust the inherited environment.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub policy: SessionPolicy,
    /// Session manager process names, tried in order.
    pub processes: Vec<String>,
    pub bus_variable: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            policy: SessionPolicy::Discover,
            // Unity runs gnome-session too.
            processes: vec!["gnome-session".into(), "gnome-session-binary".into()],
            bus_variable: "DBUS_SESSION_BUS_ADDRESS".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GSettingsConfig {
    pub bin: PathBuf,
    pub schema: String,
    pub key: String,
    /// Set on a best-effort basis after `key`. Empty disables it.
    pub dark_key: String,
}

impl Default for GSettingsConfig {
    fn default() -> Self {
        Self {
            bin: PathBuf::from("gsettings"),
            schema: "org.gnome.desktop.background".into(),
            key: "picture-uri".into(),
            dark_key: "picture-uri-dark".into(),
        }
    }
}
