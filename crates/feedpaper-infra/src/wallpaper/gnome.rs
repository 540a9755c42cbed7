use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, anyhow};

use feedpaper_core::config::{GSettingsConfig, SessionConfig, SessionPolicy};
use feedpaper_core::uri::file_uri;

use super::{SetterError, WallpaperSetter};
use crate::session::{self, SessionProbe};

/// Overrides the configured `gsettings` binary.
pub const GSETTINGS_BIN_ENV: &str = "FEEDPAPER_GSETTINGS_BIN";

pub struct GnomeBackend {
    bin: OsString,
    gsettings: GSettingsConfig,
    session: SessionConfig,
    probe: Box<dyn SessionProbe>,
}

impl GnomeBackend {
    pub fn new(gsettings: &GSettingsConfig, session: &SessionConfig) -> Self {
        let bin = std::env::var_os(GSETTINGS_BIN_ENV)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| gsettings.bin.clone().into_os_string());

        Self {
            bin,
            gsettings: gsettings.clone(),
            session: session.clone(),
            probe: session::default_probe(),
        }
    }

    pub fn with_probe(mut self, probe: Box<dyn SessionProbe>) -> Self {
        self.probe = probe;
        self
    }

    fn session_bus(&self) -> anyhow::Result<Option<String>> {
        match self.session.policy {
            SessionPolicy::Direct => Ok(None),
            SessionPolicy::Discover => {
                let addr = session::bus_address(
                    self.probe.as_ref(),
                    &self.session.processes,
                    &self.session.bus_variable,
                )
                .context("locate desktop session")?;
                Ok(Some(addr))
            }
        }
    }

    fn gsettings_set(
        &self,
        key: &str,
        value: &str,
        bus: Option<&str>,
    ) -> anyhow::Result<ExitStatus> {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("set")
            .arg(&self.gsettings.schema)
            .arg(key)
            .arg(value)
            .stdin(Stdio::null());

        // Inherited environment, with only the bus address replaced.
        if let Some(addr) = bus {
            cmd.env(&self.session.bus_variable, addr);
        }

        cmd.status()
            .with_context(|| format!("run {} ({key})", self.bin.to_string_lossy()))
    }
}

impl WallpaperSetter for GnomeBackend {
    fn set_wallpaper(&self, image_abs: &Path) -> anyhow::Result<()> {
        if !image_abs.is_absolute() {
            return Err(anyhow!("wallpaper path must be absolute"))
                .with_context(|| format!("{image_abs:?}"));
        }
        let uri = file_uri(image_abs)?;
        tracing::info!(%uri, "updating background");

        let bus = self.session_bus()?;

        let status = self.gsettings_set(&self.gsettings.key, &uri, bus.as_deref())?;
        if !status.success() {
            return Err(SetterError::CommandFailed {
                program: format!("gsettings set {}", self.gsettings.key),
                status,
            }
            .into());
        }

        // Best-effort: GNOME 42+ reads a separate key in dark mode.
        let dark_key = self.gsettings.dark_key.as_str();
        if !dark_key.is_empty() {
            match self.gsettings_set(dark_key, &uri, bus.as_deref()) {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    tracing::debug!(key = dark_key, %status, "dark variant not set");
                }
                Err(err) => {
                    tracing::debug!(key = dark_key, error = %format!("{err:#}"), "dark variant not set");
                }
            }
        }

        Ok(())
    }
}
