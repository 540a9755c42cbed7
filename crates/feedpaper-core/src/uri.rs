//! URI string helpers.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("path is not valid UTF-8: {0:?}")]
pub struct NonUtf8Path(pub PathBuf);

/// Last path segment with fragment and query removed.
pub fn last_segment(uri: &str) -> &str {
    let uri = uri.split_once('#').map_or(uri, |(head, _)| head);
    let uri = uri.split_once('?').map_or(uri, |(head, _)| head);
    uri.rsplit_once('/').map_or(uri, |(_, seg)| seg)
}

/// Text after the last `.` of the last segment.
///
/// A segment without a `.` is returned whole; callers use the result as a
/// filename suffix and tolerate odd values.
pub fn file_extension(uri: &str) -> &str {
    let seg = last_segment(uri);
    seg.rsplit_once('.').map_or(seg, |(_, ext)| ext)
}

/// `file://` form of an absolute path, as GNOME expects.
pub fn file_uri(path: &Path) -> Result<String, NonUtf8Path> {
    let s = path
        .to_str()
        .ok_or_else(|| NonUtf8Path(path.to_path_buf()))?;
    Ok(format!("file://{s}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_strips_query_and_fragment() {
        let uri = "https://example.com/path/image.JPG?x=1#frag";
        assert_eq!(last_segment(uri), "image.JPG");
        assert_eq!(file_extension(uri), "JPG");
    }

    #[test]
    fn fragment_before_query_marker() {
        assert_eq!(file_extension("https://ex.com/a.png#x?y=1.gif"), "png");
    }

    #[test]
    fn query_with_slashes_does_not_leak() {
        assert_eq!(
            file_extension("https://ex.com/img/pic.webp?next=/other/page.html"),
            "webp"
        );
    }

    #[test]
    fn segment_without_dot_is_returned_whole() {
        assert_eq!(file_extension("https://ex.com/rss/feed"), "feed");
        assert_eq!(file_extension("https://ex.com/dir/"), "");
    }

    #[test]
    fn last_dot_wins() {
        assert_eq!(file_extension("https://ex.com/archive.tar.gz"), "gz");
    }

    #[test]
    fn file_uri_prefixes_path() {
        let uri = file_uri(Path::new("/tmp/feedpaper/feedpaper-ab12.jpg")).unwrap();
        assert_eq!(uri, "file:///tmp/feedpaper/feedpaper-ab12.jpg");
    }

    #[cfg(unix)]
    #[test]
    fn file_uri_rejects_non_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let p = Path::new(OsStr::from_bytes(b"/tmp/\xff.jpg"));
        assert!(file_uri(p).is_err());
    }
}
