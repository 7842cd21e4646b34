//! # meterscan
//!
//! Client library for extracting device telemetry by calendar date from a
//! cursor-paginated chart-data service.
//!
//! The service hands out records in pages, each page ending in a trailing
//! cursor-carrier element whose `page_token` continues the stream. meterscan
//! walks those pages sequentially, tests every record's `createdAt` against
//! a target calendar date, and returns the matches in discovery order.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chrono::NaiveDate;
//! use meterscan::{DateExtractor, HttpPageFetcher, Result, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ServiceConfig::from_file("service.yaml")?;
//!     let fetcher = HttpPageFetcher::new(&config)?;
//!     let extractor = DateExtractor::new(fetcher);
//!
//!     let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//!     let extraction = extractor.extract("device-serial", date).await?;
//!     println!("{} matching records", extraction.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Behavior notes
//!
//! - The cursor is opaque: taken from one page's carrier and round-tripped
//!   into the next request, never inspected.
//! - Records are unordered with respect to `createdAt`, so every record on
//!   every visited page is tested individually.
//! - The walk is bounded by a page ceiling (default 50) and otherwise stops
//!   on an empty record portion or a missing next cursor.
//! - A fetch failure or malformed page is fatal and discards partial
//!   matches; a bad record timestamp only skips that record.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Service configuration
pub mod config;

/// HTTP client
pub mod http;

/// Page fetching (the collaborator seam)
pub mod fetch;

/// The date-filtered extraction walk
pub mod extract;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use extract::{parse_target_date, DateExtractor, ExtractOptions, DEFAULT_MAX_PAGES};
pub use fetch::{HttpPageFetcher, PageFetcher};
pub use types::{Extraction, ExtractStatus, JsonValue, PageToken, StopReason, WalkStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
