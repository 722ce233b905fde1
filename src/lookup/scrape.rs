//! Conversion lookup by scraping a search results page.

use std::time::Duration;

use regex::Regex;

use crate::error::LookupError;
use crate::types::ConversionRequest;

#[cfg(feature = "remote")]
use async_trait::async_trait;

#[cfg(feature = "remote")]
use super::Lookup;

/// Search endpoint queried for conversions.
pub const DEFAULT_BASE_URL: &str = "https://www.google.com";

/// Class of the element holding the converted amount.
pub const DEFAULT_AMOUNT_MARKER: &str = "iBp4i";

/// Default timeout for HTTP requests (10 seconds).
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

// Opening tag with a class attribute; tag name and attribute value are captured.
const CLASS_TAG_PATTERN: &str =
    r#"<([a-zA-Z][a-zA-Z0-9]*)[^>]*?\sclass\s*=\s*["']([^"']*)["'][^>]*>"#;

// Any opening or closing tag; the slash and tag name are captured.
const ANY_TAG_PATTERN: &str = r#"<(/?)([a-zA-Z][a-zA-Z0-9]*)[^>]*>"#;

/// Settings for [`ScrapeLookup`](super::ScrapeLookup).
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub marker: String,
    pub timeout: Option<Duration>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            marker: DEFAULT_AMOUNT_MARKER.to_string(),
            timeout: Some(HTTP_TIMEOUT),
        }
    }
}

impl ScrapeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search endpoint. A trailing slash is ignored.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Set the request timeout; `None` waits indefinitely.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Search URL for one conversion.
    pub fn request_url(&self, request: &ConversionRequest) -> String {
        format!(
            "{}/search?q={}+{}+to+{}+&hl=en",
            self.base_url, request.amount, request.from, request.to
        )
    }
}

/// Locates the converted amount in a results page.
///
/// The amount is the first whitespace-delimited token of the text content,
/// nested elements included, of the first element whose class list contains
/// the marker.
#[derive(Debug, Clone)]
pub struct AmountMarker {
    class: String,
    tag: Regex,
    any_tag: Regex,
}

impl AmountMarker {
    /// # Errors
    ///
    /// Returns `LookupError::InvalidMarker` if `class` is empty or contains
    /// whitespace.
    pub fn new(class: &str) -> Result<Self, LookupError> {
        let invalid = |message: String| LookupError::InvalidMarker {
            marker: class.to_string(),
            message,
        };

        if class.is_empty() || class.chars().any(char::is_whitespace) {
            return Err(invalid("expected a single class name".to_string()));
        }
        let tag = Regex::new(CLASS_TAG_PATTERN).map_err(|e| invalid(e.to_string()))?;
        let any_tag = Regex::new(ANY_TAG_PATTERN).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            class: class.to_string(),
            tag,
            any_tag,
        })
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// Extract the amount, or `None` if the marker is missing or the element
    /// text does not start with a numeric token.
    pub fn extract(&self, html: &str) -> Option<String> {
        let open = self
            .tag
            .captures_iter(html)
            .find(|caps| caps[2].split_whitespace().any(|c| c == self.class))?;
        let name = open.get(1)?.as_str();
        let start = open.get(0)?.end();

        let inner = &html[start..self.closing_tag(html, start, name)];
        let text = self.any_tag.replace_all(inner, "");
        let text = text.replace("&nbsp;", " ").replace("&#160;", " ");

        let token = text.split_whitespace().next()?;
        token
            .chars()
            .any(|c| c.is_ascii_digit())
            .then(|| token.to_string())
    }

    /// Offset of the tag closing a `name` element whose content starts at
    /// `start`, or the end of the document if it is never closed.
    fn closing_tag(&self, html: &str, start: usize, name: &str) -> usize {
        let mut depth = 0usize;
        for caps in self.any_tag.captures_iter(&html[start..]) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if !caps[2].eq_ignore_ascii_case(name) {
                continue;
            }
            if &caps[1] == "/" {
                if depth == 0 {
                    return start + whole.start();
                }
                depth -= 1;
            } else if !whole.as_str().ends_with("/>") {
                depth += 1;
            }
        }
        html.len()
    }
}

/// [`Lookup`] that queries a search page over HTTP and scrapes the result.
///
/// Requires the `remote` feature (enabled by default).
#[cfg(feature = "remote")]
#[derive(Debug, Clone)]
pub struct ScrapeLookup {
    client: reqwest::Client,
    config: ScrapeConfig,
    marker: AmountMarker,
}

#[cfg(feature = "remote")]
impl ScrapeLookup {
    /// # Errors
    ///
    /// Returns `LookupError::InvalidMarker` for a bad marker, or
    /// `LookupError::Client` if the HTTP client cannot be built.
    pub fn new(config: ScrapeConfig) -> Result<Self, LookupError> {
        let marker = AmountMarker::new(&config.marker)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|source| LookupError::Client { source })?;

        Ok(Self {
            client,
            config,
            marker,
        })
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }
}

#[cfg(feature = "remote")]
#[async_trait]
impl Lookup for ScrapeLookup {
    async fn convert(&self, request: &ConversionRequest) -> Result<String, LookupError> {
        let url = self.config.request_url(request);
        tracing::debug!(%url, "fetching currency conversion");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| LookupError::Request {
                url: url.clone(),
                source,
            })?;

        // Check for HTTP errors before reading the body
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|source| LookupError::Request {
                url: url.clone(),
                source,
            })?;

        self.marker
            .extract(&html)
            .ok_or(LookupError::MissingAmount { url })
    }
}
