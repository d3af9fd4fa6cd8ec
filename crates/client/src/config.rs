//! Client configuration, read from the environment at startup.

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
/// Path the backend is mounted under when served next to the frontend.
pub const API_PATH: &str = "/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_BASE_URL_VAR: &str = "GSTBILL_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "GSTBILL_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to, e.g. `https://host/api`.
    pub api_base_url: String,
    /// Fixed per-request timeout (ignored on wasm32, where the browser owns it).
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset or unparsable values
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(API_BASE_URL_VAR).filter(|u| !u.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "ignoring invalid {TIMEOUT_VAR}"),
            }
        }

        config
    }

    /// The API mounted under [`API_PATH`] on the page's own origin.
    pub fn same_origin(origin: &str) -> Self {
        Self::default().with_base_url(format!("{}{API_PATH}", origin.trim().trim_end_matches('/')))
    }

    /// Browser build: a non-empty build-time override wins, then the page
    /// origin. Opaque origins (`"null"`) and a missing window fall back to
    /// the local development default.
    pub fn for_browser(origin: Option<&str>, build_override: Option<&str>) -> Self {
        if let Some(url) = build_override.map(str::trim).filter(|u| !u.is_empty()) {
            return Self::default().with_base_url(url);
        }
        match origin.map(str::trim).filter(|o| !o.is_empty() && *o != "null") {
            Some(origin) => Self::same_origin(origin),
            None => Self::default(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}
