//! CLI output: logging setup and error formatting.

use tracing_subscriber::EnvFilter;

pub fn debug_enabled() -> bool {
    std::env::var_os("FEEDPAPER_DEBUG").is_some_and(|v| !v.is_empty())
}

pub fn print_error(err: &anyhow::Error) {
    eprintln!("error: {}", error_line(err, debug_enabled()));
}

/// One line naming the failed step and what actually went wrong.
///
/// The outer context says which step failed ("parse feed ...", "set
/// wallpaper"); the root cause tells an empty feed from broken XML, or a
/// missing session from a failing `gsettings`. `full` renders every link.
pub fn error_line(err: &anyhow::Error, full: bool) -> String {
    if full {
        return format!("{err:#}");
    }
    if err.chain().count() == 1 {
        err.to_string()
    } else {
        format!("{err}: {}", err.root_cause())
    }
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(quiet: bool, verbose: u8) -> &'static str {
    match (quiet, verbose) {
        (_, v) if v >= 2 => "debug",
        (false, _) | (_, 1) => "info",
        (true, _) => "off",
    }
}

pub fn init_logging(quiet: bool, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet, verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;

    use feedpaper_core::feed::{self, FeedError, ParseOptions};
    use feedpaper_infra::session::SessionError;

    const URL: &str = "https://ex.com/feed.rss";

    fn parse_failure(xml: &str) -> anyhow::Error {
        let err = feed::image_enclosures(xml, ParseOptions::default()).unwrap_err();
        anyhow::Error::new(err).context(format!("parse feed {URL}"))
    }

    #[test]
    fn empty_feed_names_the_missing_images() {
        let line = error_line(
            &parse_failure("<rss><channel><item/></channel></rss>"),
            false,
        );
        assert_eq!(line, format!("parse feed {URL}: no images found in feed"));
    }

    #[test]
    fn broken_xml_reads_differently_from_an_empty_feed() {
        let broken = error_line(&parse_failure("<rss><channel>"), false);
        let empty = error_line(
            &parse_failure("<rss><channel><item/></channel></rss>"),
            false,
        );
        assert!(broken.starts_with("parse feed "), "{broken}");
        assert!(!broken.contains("no images"), "{broken}");
        assert_ne!(broken, empty);
    }

    #[test]
    fn session_errors_surface_under_set_wallpaper() {
        let err = Err::<(), _>(SessionError::NotFound {
            names: vec!["gnome-session".into()],
        })
        .context("locate desktop session")
        .context("set wallpaper")
        .unwrap_err();

        let line = error_line(&err, false);
        assert!(line.starts_with("set wallpaper: "), "{line}");
        assert!(line.contains("no running desktop session found"), "{line}");
        assert!(!line.contains("locate desktop session"), "{line}");
    }

    #[test]
    fn bare_error_is_printed_once() {
        let err = anyhow::Error::new(FeedError::NoCandidates);
        assert_eq!(error_line(&err, false), "no images found in feed");
    }

    #[test]
    fn full_form_lists_every_step() {
        let err = Err::<(), _>(FeedError::NoCandidates)
            .context("parse feed")
            .context("update wallpaper")
            .unwrap_err();
        assert_eq!(
            error_line(&err, true),
            "update wallpaper: parse feed: no images found in feed"
        );
    }

    #[test]
    fn quiet_by_default() {
        assert_eq!(default_directive(true, 0), "off");
        assert_eq!(default_directive(false, 0), "info");
        assert_eq!(default_directive(true, 1), "info");
        assert_eq!(default_directive(true, 2), "debug");
        assert_eq!(default_directive(false, 3), "debug");
    }
}
