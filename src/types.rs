//! Common types used throughout meterscan
//!
//! Telemetry records are opaque JSON values: the crate filters them by
//! timestamp but otherwise passes them through unmodified.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Page Token
// ============================================================================

/// Opaque continuation token returned by the paginated service.
///
/// The token's internal shape is the service's business. meterscan never
/// inspects or constructs one; it only round-trips the value from the
/// trailing element of one page into the body of the next request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(Value);

impl PageToken {
    /// Wrap a raw token value as received from the service
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The raw value, for embedding into the next request body
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwrap into the raw value
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for PageToken {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// ============================================================================
// Extraction Result
// ============================================================================

/// Terminal status of a completed walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractStatus {
    /// The walk reached a stop state (zero matches is still a success)
    #[default]
    Success,
}

/// Result of a date-extraction walk
///
/// Serializes as `{"status": "success", "data": [...]}`. `data` holds the
/// matching records in discovery order across pages.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Terminal status (always success; failures are `Err`)
    pub status: ExtractStatus,
    /// Matching records, discovery order preserved
    pub data: Vec<JsonValue>,
    /// Walk statistics (diagnostics, not part of the wire shape)
    #[serde(skip)]
    pub stats: WalkStats,
}

impl Extraction {
    /// Build a successful extraction from accumulated matches
    pub fn success(data: Vec<JsonValue>, stats: WalkStats) -> Self {
        Self {
            status: ExtractStatus::Success,
            data,
            stats,
        }
    }

    /// Number of matching records
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when no record matched the target date
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ============================================================================
// Walk Diagnostics
// ============================================================================

/// Why the walk stopped
///
/// Reason codes are diagnostics only: all three produce the same successful
/// result shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A page's record portion was empty (natural end of stream)
    EmptyPage,
    /// The trailing cursor-carrier held no next token
    CursorExhausted,
    /// The configured page ceiling was reached
    PageLimit,
}

/// Statistics collected during one walk
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WalkStats {
    /// Pages fetched from the service
    pub pages_fetched: usize,
    /// Records individually tested against the target date
    pub records_scanned: usize,
    /// Records that matched and were accumulated
    pub records_matched: usize,
    /// Why the walk stopped (`None` only while in flight)
    pub stop_reason: Option<StopReason>,
}

impl WalkStats {
    /// Record one fetched page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Record scanned records
    pub fn add_scanned(&mut self, count: usize) {
        self.records_scanned += count;
    }

    /// Record one matched record
    pub fn add_match(&mut self) {
        self.records_matched += 1;
    }
}
