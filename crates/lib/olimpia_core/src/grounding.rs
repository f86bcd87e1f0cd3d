//! Grounding document loader.
//!
//! Fetches the configured page(s) once at startup and keeps their visible
//! text as a single immutable string. The document is never refreshed; the
//! server builds it before the router and hands it to the responder.

use std::fmt;
use std::sync::Arc;

use reqwest::Client;
use scraper::{Html, Node};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Errors that can occur while loading the grounding document.
#[derive(Debug, Error)]
pub enum GroundingError {
    #[error("No grounding URL configured")]
    NoSources,

    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Fetch failed for {url}: HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Immutable grounding text shared by every request.
#[derive(Clone, PartialEq, Eq)]
pub struct GroundingDocument(Arc<str>);

impl GroundingDocument {
    /// Wraps already-extracted text.
    pub fn from_text(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, as reported by the health endpoint.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for GroundingDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroundingDocument")
            .field("chars", &self.char_count())
            .finish()
    }
}

impl AsRef<str> for GroundingDocument {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Fetch every URL in order and concatenate their visible text.
///
/// Pages are joined with no separator. Any transport error or non-success
/// status aborts the load.
pub async fn load(client: &Client, urls: &[Url]) -> Result<GroundingDocument, GroundingError> {
    if urls.is_empty() {
        return Err(GroundingError::NoSources);
    }

    let mut document = String::new();
    for url in urls {
        let page = fetch_page(client, url).await?;
        let text = extract_text(&page);
        debug!(url = %url, html_bytes = page.len(), text_chars = text.chars().count(), "page loaded");
        document.push_str(&text);
    }

    let document = GroundingDocument::from_text(document);
    info!(pages = urls.len(), chars = document.char_count(), "grounding document loaded");
    Ok(document)
}

async fn fetch_page(client: &Client, url: &Url) -> Result<String, GroundingError> {
    let resp = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| GroundingError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(GroundingError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    resp.text().await.map_err(|e| GroundingError::Fetch {
        url: url.to_string(),
        reason: format!("body read error: {e}"),
    })
}

/// Concatenate the text nodes of an HTML page in document order.
///
/// Text inside `script`, `style`, `noscript` and `template` is dropped;
/// whitespace is kept as-is.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            out.push_str(text);
        }
    }

    out
}
