//! Date-filtered extraction walk
//!
//! The core of the crate: walk a cursor-paginated record stream one page at
//! a time, test every record against a target calendar date, and stop on the
//! first of three conditions: an empty record portion, a missing next
//! cursor, or the configured page ceiling.
//!
//! The service gives no ordering guarantee on `createdAt`, so matching
//! records need not be contiguous and no early-stop or date-range heuristic
//! is sound: every record on every visited page is tested individually.
//! Pages are fetched strictly sequentially because each cursor comes out of
//! the fetch it follows.

pub mod timestamp;

use crate::error::{Error, Result};
use crate::fetch::PageFetcher;
use crate::types::{Extraction, JsonValue, PageToken, StopReason, WalkStats};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Default page ceiling for one walk
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Response-body field on the trailing cursor-carrier holding the next token
const PAGE_TOKEN_FIELD: &str = "page_token";

/// Options for a date-extraction walk
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Hard ceiling on pages fetched (the walk never exceeds this even if
    /// the service keeps handing out cursors)
    pub max_pages: usize,
    /// Record field holding the creation timestamp
    pub timestamp_field: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            timestamp_field: "createdAt".to_string(),
        }
    }
}

impl ExtractOptions {
    /// Set the page ceiling
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the timestamp field name
    #[must_use]
    pub fn with_timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.timestamp_field = field.into();
        self
    }
}

/// Walks a paginated record stream and keeps the records whose timestamp
/// falls on one calendar date.
///
/// The walk is all-or-nothing: any fetch failure or malformed page aborts
/// the whole operation and discards partial matches. Per-record timestamp
/// problems are not failures; those records are skipped.
pub struct DateExtractor<F> {
    fetcher: F,
    options: ExtractOptions,
}

impl<F: PageFetcher> DateExtractor<F> {
    /// Create an extractor with default options
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            options: ExtractOptions::default(),
        }
    }

    /// Set walk options
    #[must_use]
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Get the walk options
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract all records for `device_id` whose timestamp falls on
    /// `target_date`.
    ///
    /// Zero matches is a normal, successful outcome. The returned
    /// [`Extraction`] carries the matches in discovery order plus walk
    /// statistics including the stop reason.
    pub async fn extract(&self, device_id: &str, target_date: NaiveDate) -> Result<Extraction> {
        let mut cursor: Option<PageToken> = None;
        let mut matched: Vec<JsonValue> = Vec::new();
        let mut stats = WalkStats::default();

        // Counted loop: the page ceiling is the only defense against a
        // service that never signals end-of-stream.
        for page_no in 1..=self.options.max_pages {
            let envelope = self.fetcher.fetch_page(device_id, cursor.as_ref()).await?;
            stats.add_page();

            let payload = unpack_payload(&envelope)?;
            debug!(page_no, payload_len = payload.len(), "fetched page");

            // Record portion excludes the trailing cursor-carrier. An empty
            // portion is the natural end of the stream.
            if payload.len() <= 1 {
                stats.stop_reason = Some(StopReason::EmptyPage);
                break;
            }
            let records = &payload[..payload.len() - 1];
            let carrier = &payload[payload.len() - 1];

            stats.add_scanned(records.len());
            for record in records {
                if self.matches_target(record, target_date) {
                    matched.push(record.clone());
                    stats.add_match();
                }
            }

            match carrier.get(PAGE_TOKEN_FIELD) {
                Some(token) if !token.is_null() => {
                    cursor = Some(PageToken::new(token.clone()));
                }
                _ => {
                    stats.stop_reason = Some(StopReason::CursorExhausted);
                    break;
                }
            }
        }

        if stats.stop_reason.is_none() {
            stats.stop_reason = Some(StopReason::PageLimit);
        }

        debug!(
            pages = stats.pages_fetched,
            scanned = stats.records_scanned,
            matched = stats.records_matched,
            stop_reason = ?stats.stop_reason,
            "walk complete"
        );

        Ok(Extraction::success(matched, stats))
    }

    /// Test one record's timestamp against the target date.
    ///
    /// Missing or unparseable timestamps are skipped, never fatal.
    fn matches_target(&self, record: &JsonValue, target_date: NaiveDate) -> bool {
        let Some(raw) = record
            .get(&self.options.timestamp_field)
            .and_then(JsonValue::as_str)
        else {
            return false;
        };

        match timestamp::parse_record_date(raw) {
            Some(date) => date == target_date,
            None => {
                warn!(timestamp = raw, "skipping record with unparseable timestamp");
                false
            }
        }
    }
}

/// Parse a caller-supplied ISO calendar date (`YYYY-MM-DD`).
pub fn parse_target_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| Error::config(format!("invalid target date '{input}': {e}")))
}

/// Validate the response envelope and borrow its record container.
///
/// The expected shape is `{"response": {"Payload": [...]}}`; anything else
/// is a malformed response and fatal to the walk.
fn unpack_payload(envelope: &JsonValue) -> Result<&[JsonValue]> {
    envelope
        .get("response")
        .and_then(|r| r.get("Payload"))
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::malformed("missing response.Payload array"))
}

#[cfg(test)]
mod tests;
