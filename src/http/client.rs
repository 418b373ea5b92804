//! The shared transport. Every feature client goes through [`HttpClient`] so the
//! base URL, the 15 second deadline, the `Accept: application/json` default,
//! and error mapping stay consistent. There is no retry and no token refresh;
//! failures are mapped once and handed back to the caller.

use super::{
    config::AppConfig,
    errors::{ApiError, ErrorModel},
};
use crate::{
    validation::{parse, Validate},
    APP_USER_AGENT,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info_span, Instrument};

/// Status and decoded body of a successful call.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `None` when the body is empty or JSON `null`.
    pub data: Option<Value>,
}

impl ApiResponse {
    /// True for 204 or a response without a body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status == 204 || self.data.is_none()
    }

    /// Decodes and validates the body as `T`.
    /// # Errors
    /// Returns `ApiError::Contract` when the body is missing or does not match `T`.
    pub fn decode<T>(self) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Validate,
    {
        let raw = self
            .data
            .ok_or_else(|| ApiError::Contract("expected a response body".to_string()))?;
        parse(raw).map_err(|errors| ApiError::Contract(errors.to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Builds the transport; fails fast when the base URL is missing or invalid.
    /// # Errors
    /// Returns `ApiError::Config` for a bad base URL or client construction failure.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        debug!(base_url = %base_url, timeout_ms = config.timeout_ms, "HTTP client ready");

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// # Errors
    /// Returns transport, HTTP status, or body decoding errors.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        let url = self.url(path);
        self.send("GET", &url, self.client.get(&url)).await
    }

    /// Posts a JSON body.
    /// # Errors
    /// Returns encoding, transport, HTTP status, or body decoding errors.
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let payload = encode_json(body)?;
        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        self.send("POST", &url, request).await
    }

    /// Posts an `application/x-www-form-urlencoded` body.
    /// # Errors
    /// Returns transport, HTTP status, or body decoding errors.
    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, String)],
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url(path);
        let request = self.client.post(&url).form(fields);
        self.send("POST", &url, request).await
    }

    /// Posts without a body.
    /// # Errors
    /// Returns transport, HTTP status, or body decoding errors.
    pub async fn post_empty(&self, path: &str) -> Result<ApiResponse, ApiError> {
        let url = self.url(path);
        let request = self.client.post(&url).body("");
        self.send("POST", &url, request).await
    }

    /// # Errors
    /// Returns encoding, transport, HTTP status, or body decoding errors.
    pub async fn patch_json<B>(&self, path: &str, body: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let payload = encode_json(body)?;
        let request = self
            .client
            .patch(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        self.send("PATCH", &url, request).await
    }

    /// # Errors
    /// Returns transport, HTTP status, or body decoding errors.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        let url = self.url(path);
        self.send("DELETE", &url, self.client.delete(&url)).await
    }

    fn url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }

    async fn send(
        &self,
        method: &'static str,
        url: &str,
        request: RequestBuilder,
    ) -> Result<ApiResponse, ApiError> {
        let span = info_span!("http.request", http.method = method, url = %url);
        let response = request
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        debug!(status = response.status().as_u16(), "{method} {url}");

        handle_response(response).await
    }
}

/// Joins the base URL and a path with exactly one slash between them.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn encode_json<B>(body: &B) -> Result<Vec<u8>, ApiError>
where
    B: Serialize + ?Sized,
{
    serde_json::to_vec(body)
        .map_err(|err| ApiError::Serialization(format!("Failed to encode request: {err}")))
}

/// Maps transport failures into timeout or network errors.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Reads the body once; non-2xx becomes `ApiError::Http` with the parsed detail.
async fn handle_response(response: Response) -> Result<ApiResponse, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_request_error)?;

    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            detail: ErrorModel::from_body(&body).map(|model| model.detail),
        });
    }

    let data = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<Value>(&body)
            .map(|value| Some(value).filter(|value| !value.is_null()))
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))?
    };

    Ok(ApiResponse {
        status: status.as_u16(),
        data,
    })
}
