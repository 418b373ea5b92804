//! Configuration for the API endpoint, resolved from a build-time environment
//! value with a runtime override. `SESAME_API_BASE_URL` may be baked in at
//! compile time and replaced at startup by the same variable in the process
//! environment (or the CLI flag). Values are public; do not store secrets here.

use super::errors::ApiError;
use std::env;
use url::Url;

/// Per-request deadline applied by the transport.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

const BASE_URL_VAR: &str = "SESAME_API_BASE_URL";
const TIMEOUT_VAR: &str = "SESAME_TIMEOUT_MS";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub timeout_ms: u64,
}

impl AppConfig {
    /// Loads build-time defaults and applies runtime environment overrides.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::build_time();
        apply_runtime_overrides(&mut config, runtime_config());
        config
    }

    /// Config with an explicit base URL and the default timeout.
    #[must_use]
    pub fn with_base_url(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    fn build_time() -> Self {
        Self::with_base_url(option_env!("SESAME_API_BASE_URL").unwrap_or(""))
    }

    /// Validated base URL without a trailing slash.
    /// # Errors
    /// Returns `ApiError::Config` when the URL is unset, unparsable, or not http(s).
    pub fn base_url(&self) -> Result<String, ApiError> {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ApiError::Config(format!(
                "{BASE_URL_VAR} is not defined; set it in the environment or pass --api-base-url"
            )));
        }

        let url = Url::parse(trimmed)
            .map_err(|err| ApiError::Config(format!("Invalid API base URL {trimmed}: {err}")))?;
        match url.scheme() {
            "http" | "https" => Ok(trimmed.to_string()),
            scheme => Err(ApiError::Config(format!(
                "Invalid API base URL {trimmed}: unsupported scheme {scheme}"
            ))),
        }
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
    timeout_ms: Option<u64>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.timeout_ms {
        config.timeout_ms = value;
    }
}

fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        api_base_url: env::var(BASE_URL_VAR)
            .ok()
            .and_then(|value| normalize_runtime_value(&value)),
        timeout_ms: env::var(TIMEOUT_VAR)
            .ok()
            .and_then(|value| normalize_runtime_value(&value))
            .and_then(|value| value.parse().ok()),
    }
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
