//! HTTP implementation of `PageFetcher`

use super::PageFetcher;
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::types::{JsonValue, PageToken};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Fetches chart-data pages over HTTP.
///
/// Request body shape:
///
/// ```json
/// {"deviceId": "...", "type": "modon", "pageSize": 1000, "cursor": {...}}
/// ```
///
/// The `cursor` key is omitted entirely on the first page.
#[derive(Debug)]
pub struct HttpPageFetcher {
    client: HttpClient,
    path: String,
    data_type: String,
    page_size: u32,
}

impl HttpPageFetcher {
    /// Create a fetcher from a validated service config
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let mut client_config = HttpClientConfig::builder()
            .base_url(config.base_url.as_str())
            .timeout(Duration::from_secs(config.timeout_secs));
        for (key, value) in &config.headers {
            client_config = client_config.header(key.as_str(), value.as_str());
        }

        Ok(Self {
            client: HttpClient::with_config(client_config.build()),
            path: config.chart_data_path.clone(),
            data_type: config.data_type.clone(),
            page_size: config.page_size,
        })
    }

    /// Build the request body for one page
    fn request_body(&self, device_id: &str, cursor: Option<&PageToken>) -> JsonValue {
        let mut body = json!({
            "deviceId": device_id,
            "type": self.data_type,
            "pageSize": self.page_size,
        });
        if let Some(token) = cursor {
            body["cursor"] = token.as_value().clone();
        }
        body
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(
        &self,
        device_id: &str,
        cursor: Option<&PageToken>,
    ) -> Result<JsonValue> {
        let body = self.request_body(device_id, cursor);
        debug!(
            device_id,
            has_cursor = cursor.is_some(),
            "fetching chart-data page"
        );
        self.client.post_json(&self.path, &body).await
    }
}
