//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::domain::session::AuthScheme;
use crate::repository::DEFAULT_PAGE_SIZE;

fn default_api_base_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    /// Cookie domain. Host-only cookies when unset.
    #[serde(default)]
    pub domain: Option<String>,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    /// Backend origin; `/api/v1` is appended by the client.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub auth_scheme: AuthScheme,
    /// Re-apply search and filter to the fetched page.
    #[serde(default)]
    pub local_filter: bool,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub secure_cookies: bool,
}
