//! Mock lookup for deterministic testing.
//!
//! Records every request it receives so tests can assert how often, and with
//! which amount and codes, the conversion source was consulted.
//!
//! # Example
//!
//! ```
//! use currency_directive::lookup::{mock::MockLookup, Lookup};
//! use currency_directive::{ConversionRequest, CurrencyCode};
//!
//! # tokio_test::block_on(async {
//! let lookup = MockLookup::with_rate(1.25);
//! let request = ConversionRequest::new(
//!     100.0,
//!     CurrencyCode::parse("GBP").unwrap(),
//!     CurrencyCode::parse("USD").unwrap(),
//! );
//!
//! assert_eq!(lookup.convert(&request).await.unwrap(), "125.00");
//! assert_eq!(lookup.call_count(), 1);
//! # });
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::Lookup;
use crate::error::LookupError;
use crate::types::ConversionRequest;

/// How the mock answers a request.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Multiply the amount and format with two decimals.
    Rate(f64),
    /// Always return this text.
    Fixed(String),
    /// Always fail with `LookupError::Unavailable`.
    Fail(String),
}

/// In-memory [`Lookup`]. Clones share recorded calls.
#[derive(Debug, Clone)]
pub struct MockLookup {
    inner: Arc<Mutex<MockLookupInner>>,
}

#[derive(Debug)]
struct MockLookupInner {
    reply: MockReply,
    /// Target codes that fail regardless of `reply`.
    failing_targets: Vec<(String, String)>,
    calls: Vec<ConversionRequest>,
}

impl Default for MockLookup {
    fn default() -> Self {
        Self::with_rate(1.0)
    }
}

impl MockLookup {
    pub fn new(reply: MockReply) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockLookupInner {
                reply,
                failing_targets: Vec::new(),
                calls: Vec::new(),
            })),
        }
    }

    pub fn with_rate(rate: f64) -> Self {
        Self::new(MockReply::Rate(rate))
    }

    pub fn with_reply(text: impl Into<String>) -> Self {
        Self::new(MockReply::Fixed(text.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockReply::Fail(message.into()))
    }

    /// Fail every conversion into `code` with `message`.
    pub fn fail_target(self, code: &str, message: impl Into<String>) -> Self {
        self.inner
            .lock()
            .unwrap()
            .failing_targets
            .push((code.to_string(), message.into()));
        self
    }

    /// All requests received so far, in order.
    pub fn calls(&self) -> Vec<ConversionRequest> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }
}

#[async_trait]
impl Lookup for MockLookup {
    async fn convert(&self, request: &ConversionRequest) -> Result<String, LookupError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(*request);

        if let Some((_, message)) = inner
            .failing_targets
            .iter()
            .find(|(code, _)| code == request.to.as_str())
        {
            return Err(LookupError::Unavailable {
                message: message.clone(),
            });
        }

        match &inner.reply {
            MockReply::Rate(rate) => Ok(format!("{:.2}", request.amount * rate)),
            MockReply::Fixed(text) => Ok(text.clone()),
            MockReply::Fail(message) => Err(LookupError::Unavailable {
                message: message.clone(),
            }),
        }
    }
}
