//! Config file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use feedpaper_core::Config;

fn config_home() -> Option<PathBuf> {
    if let Some(v) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(v));
    }
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config"))
}

/// `$XDG_CONFIG_HOME/feedpaper/config.toml`, falling back to `~/.config`.
pub fn default_path() -> Option<PathBuf> {
    config_home().map(|dir| dir.join("feedpaper").join("config.toml"))
}

/// Load `explicit` (which must exist), else the default file if present,
/// else built-in defaults.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return read(path);
    }

    match default_path() {
        Some(path) if path.is_file() => read(&path),
        _ => Ok(Config::default()),
    }
}

pub fn read(path: &Path) -> anyhow::Result<Config> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg = Config::from_toml_str(&text)
        .with_context(|| format!("parse config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedpaper.toml");
        fs::write(&path, "feed_url = \"https://ex.com/f.rss\"\nquiet = false\n").unwrap();

        let cfg = load(Some(path.as_path())).unwrap();
        assert_eq!(cfg.feed_url, "https://ex.com/f.rss");
        assert!(!cfg.quiet);
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert!(format!("{err:#}").contains("read config"));
    }

    #[test]
    fn bad_toml_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "keep_files = \"yes\"\n").unwrap();

        let err = load(Some(path.as_path())).unwrap_err();
        assert!(format!("{err:#}").contains("parse config"));
        assert!(format!("{err:#}").contains("bad.toml"));
    }

    #[test]
    fn xdg_config_home_is_used_when_present() {
        let _g = ENV_LOCK.lock().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let old = std::env::var_os("XDG_CONFIG_HOME");
        unsafe { std::env::set_var("XDG_CONFIG_HOME", dir.path()) };

        assert_eq!(
            default_path().unwrap(),
            dir.path().join("feedpaper/config.toml")
        );
        let defaults = load(None).unwrap();

        fs::create_dir_all(dir.path().join("feedpaper")).unwrap();
        fs::write(dir.path().join("feedpaper/config.toml"), "keep_files = true\n").unwrap();
        let from_file = load(None).unwrap();

        unsafe {
            match old {
                Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        assert_eq!(defaults, Config::default());
        assert!(from_file.keep_files);
    }
}
