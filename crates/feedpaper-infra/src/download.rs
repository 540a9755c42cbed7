//! HTTP download primitive shared by the feed and image fetchers.
//!
//! Gzip is negotiated by hand: the request always advertises it and the body
//! is decoded here, block by block, when the server says it used it.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT_ENCODING, CONTENT_ENCODING};
use thiserror::Error;

use feedpaper_core::config::HttpConfig;
use feedpaper_core::uri;

/// Bytes read from the response per iteration.
pub const READ_BLOCK_SIZE: usize = 8 * 1024;

const FILE_PREFIX: &str = "feedpaper-";

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request {uri} failed")]
    Transport {
        uri: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{uri} returned HTTP {status}")]
    Status { uri: String, status: StatusCode },
    #[error("read body of {uri}")]
    Body {
        uri: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid gzip body from {uri}")]
    Decompress {
        uri: String,
        #[source]
        source: io::Error,
    },
    #[error("write {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub fn client(cfg: &HttpConfig) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(cfg.user_agent.as_str())
        .timeout(cfg.timeout())
        .build()
}

/// GET `uri` into a new uniquely named file in `dir`.
///
/// The file is named `feedpaper-XXXXXX.<ext>` with `<ext>` taken from the
/// URI's last path segment. Returns the absolute path. The file is left in
/// place whatever happens after it was created.
pub fn fetch_to_dir(client: &Client, uri: &str, dir: &Path) -> Result<PathBuf, DownloadError> {
    tracing::info!(uri, "loading");

    let resp = client
        .get(uri)
        .header(ACCEPT_ENCODING, "gzip")
        .send()
        .map_err(|source| DownloadError::Transport {
            uri: uri.to_string(),
            source,
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(DownloadError::Status {
            uri: uri.to_string(),
            status,
        });
    }

    let gzipped = is_gzip(&resp);
    let (mut file, path) = create_target(uri, dir)?;

    let copied = if gzipped {
        copy_blocks(MultiGzDecoder::new(resp), &mut file)
    } else {
        copy_blocks(resp, &mut file)
    };

    let bytes = copied.map_err(|err| match err {
        CopyError::Write(source) => DownloadError::Io {
            path: path.clone(),
            source,
        },
        CopyError::Read(source) if gzipped && is_corrupt_stream(&source) => {
            DownloadError::Decompress {
                uri: uri.to_string(),
                source,
            }
        }
        CopyError::Read(source) => DownloadError::Body {
            uri: uri.to_string(),
            source,
        },
    })?;

    tracing::debug!(path = %path.display(), bytes, gzipped, "saved");
    Ok(path)
}

fn is_gzip(resp: &Response) -> bool {
    resp.headers()
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains("gzip"))
}

// A truncated stream (`UnexpectedEof`) is a dropped connection, not bad framing.
fn is_corrupt_stream(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput
    )
}

fn create_target(uri: &str, dir: &Path) -> Result<(File, PathBuf), DownloadError> {
    let ext = uri::file_extension(uri);
    let suffix = if ext.is_empty() {
        String::new()
    } else {
        format!(".{ext}")
    };

    let dir = std::path::absolute(dir).map_err(|source| DownloadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let tmp = tempfile::Builder::new()
        .prefix(FILE_PREFIX)
        .suffix(&suffix)
        .tempfile_in(&dir)
        .map_err(|source| DownloadError::Io {
            path: dir.clone(),
            source,
        })?;

    tmp.keep().map_err(|err| DownloadError::Io {
        path: dir,
        source: err.error,
    })
}

#[derive(Debug)]
enum CopyError {
    Read(io::Error),
    Write(io::Error),
}

fn copy_blocks<R: Read, W: Write>(mut reader: R, writer: &mut W) -> Result<u64, CopyError> {
    let mut buf = [0u8; READ_BLOCK_SIZE];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };
        writer.write_all(&buf[..n]).map_err(CopyError::Write)?;
        total += n as u64;
    }

    writer.flush().map_err(CopyError::Write)?;
    Ok(total)
}
