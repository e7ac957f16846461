use crate::error::{Result, ScanError};
use crate::result::LinkSet;
use scraper::{Html, Selector};
use tracing::{debug, error};
use url::Url;

/// Extract every `<a href>` from `html` and resolve it against `base_url`.
///
/// Extraction never fails from the caller's point of view: a document that
/// cannot be parsed yields an empty set and an error log line.
pub fn fetch_links(html: &[u8], base_url: &str) -> LinkSet {
    match parse_links(html, base_url) {
        Ok(links) => links,
        Err(e) => {
            error!("Error extracting links from {}: {}", base_url, e);
            LinkSet::new()
        }
    }
}

/// Fallible core of [`fetch_links`]
pub fn parse_links(html: &[u8], base_url: &str) -> Result<LinkSet> {
    let base = Url::parse(base_url)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;

    let text = String::from_utf8_lossy(html);
    if text.trim().is_empty() {
        return Err(ScanError::ParseError("document is empty".to_string()));
    }

    let document = Html::parse_document(&text);
    let link_selector = Selector::parse("a[href]")
        .map_err(|e| ScanError::ParseError(format!("{:?}", e)))?;

    let mut links = LinkSet::new();
    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        match base.join(href) {
            Ok(absolute) => {
                links.insert(absolute.to_string());
            }
            Err(e) => debug!("Skipping href {:?} on {}: {}", href, base_url, e),
        }
    }

    Ok(links)
}
