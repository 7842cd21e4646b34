//! Page fetching
//!
//! `PageFetcher` is the seam between the extraction walk and the transport:
//! one call, one page. Implementations return the raw response envelope;
//! validating and unpacking it is the walk's job, so test doubles can hand
//! back arbitrary shapes.

mod http_fetcher;

pub use http_fetcher::HttpPageFetcher;

use crate::error::Result;
use crate::types::{JsonValue, PageToken};
use async_trait::async_trait;

/// One page request against the chart-data service.
///
/// `cursor` is `None` for the first page and thereafter the token taken from
/// the previous page's trailing cursor-carrier, passed through opaquely.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page, returning the raw response envelope
    async fn fetch_page(&self, device_id: &str, cursor: Option<&PageToken>)
        -> Result<JsonValue>;
}
