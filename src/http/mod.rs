//! HTTP client module
//!
//! A deliberately thin JSON-over-POST client. There is no retry, backoff,
//! or rate limiting here: a failed fetch is fatal to the extraction walk it
//! belongs to, and callers needing resilience re-invoke the whole walk.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
