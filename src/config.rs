//! Service configuration
//!
//! Describes one chart-data service endpoint in YAML, e.g.:
//!
//! ```yaml
//! base_url: https://device-services.example.com/api/device-service/v2/tenant-id
//! data_type: modon
//! page_size: 1000
//! max_pages: 50
//! ```

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// Configuration for one chart-data service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the device service (required)
    pub base_url: String,

    /// Path of the chart-data endpoint, appended to `base_url`
    #[serde(default = "default_chart_data_path")]
    pub chart_data_path: String,

    /// Value of the `type` discriminator in the request body
    #[serde(default = "default_data_type")]
    pub data_type: String,

    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Hard ceiling on pages fetched in one walk
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Record field holding the creation timestamp
    #[serde(default = "default_timestamp_field")]
    pub timestamp_field: String,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_chart_data_path() -> String {
    "/device_management/fetch_chart_data".to_string()
}

fn default_data_type() -> String {
    "modon".to_string()
}

fn default_page_size() -> u32 {
    1000
}

fn default_max_pages() -> usize {
    50
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_timestamp_field() -> String {
    "createdAt".to_string()
}

impl ServiceConfig {
    /// Create a config for a base URL with all defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            chart_data_path: default_chart_data_path(),
            data_type: default_data_type(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            timeout_secs: default_timeout_secs(),
            timestamp_field: default_timestamp_field(),
            headers: HashMap::new(),
        }
    }

    /// Load a config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&contents)
    }

    /// Validate field values
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::invalid_config("base_url", "must not be empty"));
        }
        Url::parse(&self.base_url)?;
        if self.page_size == 0 {
            return Err(Error::invalid_config("page_size", "must be positive"));
        }
        if self.max_pages == 0 {
            return Err(Error::invalid_config("max_pages", "must be positive"));
        }
        if self.timestamp_field.is_empty() {
            return Err(Error::invalid_config("timestamp_field", "must not be empty"));
        }
        Ok(())
    }
}
