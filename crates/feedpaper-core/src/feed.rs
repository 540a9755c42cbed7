//! Image candidates from RSS documents.
//!
//! Only `<enclosure type="image/..." url="..."/>` elements are interpreted, at
//! any depth. With [`ParseOptions::media_content_fallback`] set, Media RSS
//! `content` elements are used when the feed carries no image enclosure at all,
//! so an image announced both ways is never counted twice.

use std::path::{Path, PathBuf};

use roxmltree::{Document, Node, ParsingOptions};
use thiserror::Error;

/// Media RSS namespace, whatever prefix the feed binds it to.
pub const MEDIA_RSS_NS: &str = "http://search.yahoo.com/mrss/";

const IMAGE_MIME_PREFIX: &str = "image/";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub media_content_fallback: bool,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("read feed {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed feed XML")]
    Parse(#[from] roxmltree::Error),
    #[error("no images found in feed")]
    NoCandidates,
}

pub fn parse_file(path: &Path, opts: ParseOptions) -> Result<Vec<String>, FeedError> {
    let xml = std::fs::read_to_string(path).map_err(|source| FeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    image_enclosures(&xml, opts)
}

/// Image URLs in document order, duplicates kept.
pub fn image_enclosures(xml: &str, opts: ParseOptions) -> Result<Vec<String>, FeedError> {
    // Old RSS 0.91 feeds still ship a DOCTYPE.
    let mut parsing = ParsingOptions::default();
    parsing.allow_dtd = true;
    let doc = Document::parse_with_options(xml, parsing)?;

    let mut urls = image_urls(&doc, is_enclosure);
    if urls.is_empty() && opts.media_content_fallback {
        urls = image_urls(&doc, is_media_content);
        if !urls.is_empty() {
            tracing::debug!(count = urls.len(), "using media:content fallback");
        }
    }

    tracing::info!(count = urls.len(), "found images in feed");

    if urls.is_empty() {
        return Err(FeedError::NoCandidates);
    }
    Ok(urls)
}

fn is_enclosure(node: &Node) -> bool {
    let name = node.tag_name();
    name.name() == "enclosure" && name.namespace().is_none()
}

fn is_media_content(node: &Node) -> bool {
    node.has_tag_name((MEDIA_RSS_NS, "content"))
}

fn image_urls(doc: &Document, matches: fn(&Node) -> bool) -> Vec<String> {
    doc.descendants()
        .filter(|n| n.is_element() && matches(n))
        .filter(|n| {
            n.attribute("type")
                .is_some_and(|t| t.starts_with(IMAGE_MIME_PREFIX))
        })
        .filter_map(|n| match n.attribute("url") {
            Some(url) => Some(url.to_string()),
            None => {
                tracing::warn!(
                    element = n.tag_name().name(),
                    "image element without url attribute, skipping"
                );
                None
            }
        })
        .collect()
}
