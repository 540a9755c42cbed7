//! Desktop session detection (session bus address of a running session manager).
//!
//! Scheduled runs (cron) start without `DBUS_SESSION_BUS_ADDRESS`, so it is
//! read out of the session manager's own environment instead.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const DEFAULT_PROC_ROOT: &str = "/proc";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no running desktop session found (looked for {})", .names.join(", "))]
    NotFound { names: Vec<String> },
    #[error("{variable} not set in environment of pid {pid}")]
    MissingVariable { pid: u32, variable: String },
    #[error("desktop session discovery is not supported on this platform")]
    Unsupported,
    #[error("read {path:?}")]
    Probe {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Process table access.
pub trait SessionProbe {
    /// Pids of processes called `name`, lowest first.
    fn find_pids(&self, name: &str) -> Result<Vec<u32>, SessionError>;
    fn read_environ(&self, pid: u32) -> Result<Vec<(String, String)>, SessionError>;
}

/// Linux `/proc` (or a directory laid out like it).
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::at(DEFAULT_PROC_ROOT)
    }
}

impl ProcFs {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn pid_dir(&self, pid: u32) -> PathBuf {
        self.root.join(pid.to_string())
    }

    fn matches(&self, pid: u32, name: &str) -> bool {
        let dir = self.pid_dir(pid);

        // Processes may exit mid-scan; unreadable entries just don't match.
        if let Ok(comm) = fs::read_to_string(dir.join("comm")) {
            if comm.trim_end_matches('\n') == name {
                return true;
            }
        }

        // comm is truncated to 15 bytes, argv[0] is not.
        fs::read(dir.join("cmdline"))
            .ok()
            .and_then(|raw| {
                let argv0 = raw.split(|b| *b == 0).next()?;
                let argv0 = std::str::from_utf8(argv0).ok()?;
                Some(Path::new(argv0).file_name()? == name)
            })
            .unwrap_or(false)
    }
}

impl SessionProbe for ProcFs {
    fn find_pids(&self, name: &str) -> Result<Vec<u32>, SessionError> {
        let entries = fs::read_dir(&self.root).map_err(|source| SessionError::Probe {
            path: self.root.clone(),
            source,
        })?;

        let mut pids: Vec<u32> = entries
            .filter_map(Result::ok)
            .filter_map(|e| e.file_name().to_str()?.parse().ok())
            .collect();
        pids.sort_unstable();

        pids.retain(|pid| self.matches(*pid, name));
        Ok(pids)
    }

    fn read_environ(&self, pid: u32) -> Result<Vec<(String, String)>, SessionError> {
        let path = self.pid_dir(pid).join("environ");
        let raw = fs::read(&path).map_err(|source| SessionError::Probe { path, source })?;
        Ok(parse_environ(&raw))
    }
}

/// Stand-in for platforms without a `/proc` filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl SessionProbe for Unsupported {
    fn find_pids(&self, _name: &str) -> Result<Vec<u32>, SessionError> {
        Err(SessionError::Unsupported)
    }

    fn read_environ(&self, _pid: u32) -> Result<Vec<(String, String)>, SessionError> {
        Err(SessionError::Unsupported)
    }
}

pub fn default_probe() -> Box<dyn SessionProbe> {
    if cfg!(target_os = "linux") {
        Box::new(ProcFs::default())
    } else {
        Box::new(Unsupported)
    }
}

/// Parse a NUL-separated `KEY=VALUE` block.
pub fn parse_environ(raw: &[u8]) -> Vec<(String, String)> {
    raw.split(|b| *b == 0)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let entry = String::from_utf8_lossy(entry);
            let (key, value) = entry.split_once('=')?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Session bus address of the first running process in `names` whose
/// environment can be read and carries `variable`.
///
/// Other users' sessions (the GDM greeter) usually come first and have an
/// unreadable environment; they are skipped. When every candidate fails, the
/// first failure is returned.
pub fn bus_address(
    probe: &dyn SessionProbe,
    names: &[String],
    variable: &str,
) -> Result<String, SessionError> {
    let mut first_err = None;

    for name in names {
        for pid in probe.find_pids(name)? {
            let env = match probe.read_environ(pid) {
                Ok(env) => env,
                Err(err) => {
                    tracing::debug!(process = %name, pid, error = %err, "skipping session");
                    first_err.get_or_insert(err);
                    continue;
                }
            };

            match env.into_iter().find(|(key, _)| key == variable) {
                Some((_, address)) => {
                    tracing::info!(process = %name, pid, "found desktop session");
                    tracing::debug!(%variable, %address, "using session bus");
                    return Ok(address);
                }
                None => {
                    tracing::debug!(process = %name, pid, %variable, "variable not set");
                    first_err.get_or_insert(SessionError::MissingVariable {
                        pid,
                        variable: variable.to_string(),
                    });
                }
            }
        }
    }

    Err(first_err.unwrap_or_else(|| SessionError::NotFound {
        names: names.to_vec(),
    }))
}
