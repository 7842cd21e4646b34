//! Tests for the extraction walk
//!
//! Uses scripted fetchers so every page sequence and failure mode of the
//! collaborator can be exercised without a network.

use super::*;
use crate::error::Error;
use crate::fetch::PageFetcher;
use async_trait::async_trait;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Hands out a pre-scripted sequence of fetch outcomes and records every
/// cursor it was called with.
struct ScriptedFetcher {
    pages: Mutex<VecDeque<Result<Value>>>,
    calls: AtomicUsize,
    cursors: Mutex<Vec<Option<Value>>>,
}

impl ScriptedFetcher {
    fn new(pages: Vec<Result<Value>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            calls: AtomicUsize::new(0),
            cursors: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn cursors(&self) -> Vec<Option<Value>> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for &ScriptedFetcher {
    async fn fetch_page(&self, _device_id: &str, cursor: Option<&PageToken>) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.cursors
            .lock()
            .unwrap()
            .push(cursor.map(|t| t.as_value().clone()));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::unexpected("script exhausted")))
    }
}

/// Always returns the same non-empty page with a valid next cursor.
struct EndlessFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl PageFetcher for &EndlessFetcher {
    async fn fetch_page(&self, _device_id: &str, _cursor: Option<&PageToken>) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(page(
            vec![record("r", "2024-03-01T10:00:00+00:00")],
            Some(json!({"next": "token"})),
        ))
    }
}

fn record(id: &str, created_at: &str) -> Value {
    json!({"id": id, "createdAt": created_at, "value": 42.0})
}

/// Build a response envelope: records plus a trailing cursor-carrier.
fn page(records: Vec<Value>, next_token: Option<Value>) -> Value {
    let mut payload = records;
    let carrier = match next_token {
        Some(token) => json!({"page_token": token}),
        None => json!({}),
    };
    payload.push(carrier);
    json!({"response": {"Payload": payload}})
}

fn target() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

#[tokio::test]
async fn test_single_page_date_filter() {
    // End-to-end example from the service contract: two records, one match.
    let fetcher = ScriptedFetcher::new(vec![Ok(page(
        vec![
            record("a", "2024-03-01T10:00:00+00:00"),
            record("b", "2024-03-02T10:00:00+00:00"),
        ],
        None,
    ))]);

    let extractor = DateExtractor::new(&fetcher);
    let result = extractor.extract("X1", target()).await.unwrap();

    assert_eq!(result.data.len(), 1);
    assert_eq!(result.data[0]["id"], "a");
    assert_eq!(result.stats.stop_reason, Some(StopReason::CursorExhausted));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_serialized_result_shape() {
    let fetcher = ScriptedFetcher::new(vec![Ok(page(
        vec![record("a", "2024-03-01T10:00:00+00:00")],
        None,
    ))]);

    let result = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap();

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"][0]["id"], "a");
}

#[tokio::test]
async fn test_matches_accumulate_across_pages_in_order() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(page(
            vec![
                record("a", "2024-03-01T01:00:00+00:00"),
                record("x", "2024-02-28T01:00:00+00:00"),
            ],
            Some(json!({"p": 2})),
        )),
        Ok(page(
            vec![
                record("y", "2024-03-05T01:00:00+00:00"),
                record("b", "2024-03-01T23:00:00+00:00"),
            ],
            None,
        )),
    ]);

    let result = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap();

    let ids: Vec<_> = result.data.iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!("a"), json!("b")]);
    assert_eq!(result.stats.pages_fetched, 2);
    assert_eq!(result.stats.records_scanned, 4);
    assert_eq!(result.stats.records_matched, 2);
}

#[tokio::test]
async fn test_no_duplicate_matches() {
    // Each scanned record lands in the result at most once; nothing is
    // double-processed across pages.
    let fetcher = ScriptedFetcher::new(vec![
        Ok(page(
            vec![record("a", "2024-03-01T10:00:00+00:00")],
            Some(json!("t2")),
        )),
        Ok(page(vec![record("b", "2024-03-01T11:00:00+00:00")], None)),
    ]);

    let result = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap();

    assert_eq!(result.data.len(), 2);
    let ids: Vec<_> = result.data.iter().map(|r| &r["id"]).collect();
    assert_eq!(ids, vec![&json!("a"), &json!("b")]);
}

#[tokio::test]
async fn test_cursor_round_trip() {
    // The opaque token from page 1's carrier must come back verbatim on the
    // page 2 fetch.
    let token = json!({"blob": "opaque", "n": 7});
    let fetcher = ScriptedFetcher::new(vec![
        Ok(page(
            vec![record("a", "2024-03-01T10:00:00+00:00")],
            Some(token.clone()),
        )),
        Ok(page(vec![record("b", "2024-03-02T10:00:00+00:00")], None)),
    ]);

    DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap();

    assert_eq!(fetcher.cursors(), vec![None, Some(token)]);
}

#[tokio::test]
async fn test_truncated_offset_matches_like_corrected() {
    let fetcher = ScriptedFetcher::new(vec![Ok(page(
        vec![
            record("trunc", "2024-03-01T10:00:00+00:0"),
            record("full", "2024-03-01T10:00:00+00:00"),
        ],
        None,
    ))]);

    let result = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap();

    assert_eq!(result.data.len(), 2);
}

#[tokio::test]
async fn test_unparseable_timestamp_is_skipped_not_fatal() {
    let fetcher = ScriptedFetcher::new(vec![Ok(page(
        vec![
            record("bad", "not-a-timestamp"),
            record("good", "2024-03-01T10:00:00+00:00"),
        ],
        None,
    ))]);

    let result = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap();

    assert_eq!(result.data.len(), 1);
    assert_eq!(result.data[0]["id"], "good");
    assert_eq!(result.status, crate::types::ExtractStatus::Success);
}

#[tokio::test]
async fn test_missing_timestamp_field_is_skipped() {
    let fetcher = ScriptedFetcher::new(vec![Ok(page(
        vec![
            json!({"id": "no-ts", "value": 1}),
            record("good", "2024-03-01T10:00:00+00:00"),
        ],
        None,
    ))]);

    let result = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap();

    assert_eq!(result.data.len(), 1);
    assert_eq!(result.data[0]["id"], "good");
}

#[tokio::test]
async fn test_stops_on_empty_payload() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(page(
            vec![record("a", "2024-03-01T10:00:00+00:00")],
            Some(json!("t2")),
        )),
        Ok(json!({"response": {"Payload": []}})),
        // Never reached
        Ok(page(vec![record("c", "2024-03-01T12:00:00+00:00")], None)),
    ]);

    let result = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap();

    // Whatever was accumulated before the empty page is kept.
    assert_eq!(result.data.len(), 1);
    assert_eq!(result.stats.stop_reason, Some(StopReason::EmptyPage));
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_lone_carrier_counts_as_empty_record_portion() {
    // A one-element page has no records, only the carrier; the walk stops
    // without reading its token.
    let fetcher = ScriptedFetcher::new(vec![Ok(json!({
        "response": {"Payload": [{"page_token": {"p": 2}}]}
    }))]);

    let result = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.stats.stop_reason, Some(StopReason::EmptyPage));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_stops_when_carrier_has_no_token() {
    let fetcher = ScriptedFetcher::new(vec![Ok(page(
        vec![record("a", "2024-03-01T10:00:00+00:00")],
        None,
    ))]);

    let result = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap();

    // The page's records were still processed before stopping.
    assert_eq!(result.data.len(), 1);
    assert_eq!(result.stats.stop_reason, Some(StopReason::CursorExhausted));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_null_token_stops_like_missing_token() {
    let fetcher = ScriptedFetcher::new(vec![Ok(page(
        vec![record("a", "2024-03-01T10:00:00+00:00")],
        Some(Value::Null),
    ))]);

    let result = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap();

    assert_eq!(result.stats.stop_reason, Some(StopReason::CursorExhausted));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_page_ceiling_bounds_the_walk() {
    let fetcher = EndlessFetcher {
        calls: AtomicUsize::new(0),
    };

    let extractor =
        DateExtractor::new(&fetcher).with_options(ExtractOptions::default().with_max_pages(3));
    let result = extractor.extract("X1", target()).await.unwrap();

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    assert_eq!(result.stats.pages_fetched, 3);
    assert_eq!(result.stats.stop_reason, Some(StopReason::PageLimit));
    assert_eq!(result.data.len(), 3);
}

#[tokio::test]
async fn test_fetch_failure_mid_walk_discards_partial_matches() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(page(
            vec![record("a", "2024-03-01T10:00:00+00:00")],
            Some(json!("t2")),
        )),
        Err(Error::transport(502, "bad gateway")),
        Ok(page(vec![record("c", "2024-03-01T12:00:00+00:00")], None)),
    ]);

    let err = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap_err();

    // Page 1's match is gone: the operation is all-or-nothing.
    assert!(matches!(err, Error::Transport { status: 502, .. }));
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_malformed_envelope_is_fatal() {
    let fetcher = ScriptedFetcher::new(vec![Ok(json!({"unexpected": "shape"}))]);

    let err = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_payload_not_an_array_is_fatal() {
    let fetcher = ScriptedFetcher::new(vec![Ok(json!({
        "response": {"Payload": "oops"}
    }))]);

    let err = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_zero_matches_is_success() {
    let fetcher = ScriptedFetcher::new(vec![Ok(page(
        vec![record("a", "2023-01-01T00:00:00+00:00")],
        None,
    ))]);

    let result = DateExtractor::new(&fetcher)
        .extract("X1", target())
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.status, crate::types::ExtractStatus::Success);
}

#[tokio::test]
async fn test_custom_timestamp_field() {
    let fetcher = ScriptedFetcher::new(vec![Ok(page(
        vec![json!({"id": "a", "created_at": "2024-03-01T10:00:00+00:00"})],
        None,
    ))]);

    let extractor = DateExtractor::new(&fetcher)
        .with_options(ExtractOptions::default().with_timestamp_field("created_at"));
    let result = extractor.extract("X1", target()).await.unwrap();

    assert_eq!(result.data.len(), 1);
}

#[test]
fn test_parse_target_date() {
    assert_eq!(parse_target_date("2024-03-01").unwrap(), target());
    assert!(parse_target_date("03/01/2024").is_err());
    assert!(parse_target_date("").is_err());
}

#[test]
fn test_extract_options_defaults() {
    let options = ExtractOptions::default();
    assert_eq!(options.max_pages, DEFAULT_MAX_PAGES);
    assert_eq!(options.timestamp_field, "createdAt");
}
