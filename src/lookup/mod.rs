//! External currency conversion lookups.
//!
//! The [`Lookup`] trait is the only thing the directive engine knows about
//! the conversion source. [`ScrapeLookup`] fetches a search results page and
//! reads the converted amount out of its markup; [`mock::MockLookup`] is a
//! deterministic in-memory implementation for tests.

use async_trait::async_trait;

use crate::error::LookupError;
use crate::types::ConversionRequest;

pub mod mock;
mod scrape;

pub use scrape::{AmountMarker, ScrapeConfig, DEFAULT_AMOUNT_MARKER, DEFAULT_BASE_URL};

#[cfg(feature = "remote")]
pub use scrape::ScrapeLookup;

/// Source of converted amounts.
///
/// Returns the converted amount as text, exactly as the source reports it.
#[async_trait]
pub trait Lookup: Send + Sync {
    async fn convert(&self, request: &ConversionRequest) -> Result<String, LookupError>;
}
