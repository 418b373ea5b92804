use crate::validation::ValidationErrors;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Fallback shown when neither the body nor the status line explains a failure.
const GENERIC_FAILURE: &str = "Request failed.";

/// The `detail` member of a failed-request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(BTreeMap<String, String>),
    Other(Value),
}

impl ErrorDetail {
    /// Human-readable text: the string itself, a mapping's `reason` or `code`,
    /// or the serialized detail. Empty strings yield `None`.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Message(message) if message.is_empty() => None,
            Self::Message(message) => Some(message.clone()),
            Self::Fields(fields) => fields
                .get("reason")
                .or_else(|| fields.get("code"))
                .cloned()
                .or_else(|| serde_json::to_string(fields).ok()),
            Self::Other(Value::Null) => None,
            Self::Other(value) => {
                let keyed = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
                keyed("reason")
                    .or_else(|| keyed("code"))
                    .or_else(|| serde_json::to_string(value).ok())
            }
        }
    }
}

/// Normalized error body returned by the API for non-2xx responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorModel {
    pub detail: ErrorDetail,
}

impl ErrorModel {
    /// Parses an error body; anything without a `detail` member yields `None`.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ApiError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {status_text}")]
    Http {
        status: u16,
        status_text: String,
        detail: Option<ErrorDetail>,
    },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Unexpected response: {0}")]
    Contract(String),
    #[error("Request error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status of a failed response, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Field messages for locally rejected payloads.
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Single message suitable for showing to a user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http {
                status_text,
                detail,
                ..
            } => detail
                .as_ref()
                .and_then(ErrorDetail::message)
                .unwrap_or_else(|| {
                    if status_text.is_empty() {
                        GENERIC_FAILURE.to_string()
                    } else {
                        status_text.clone()
                    }
                }),
            Self::Validation(errors) => errors
                .errors()
                .iter()
                .map(|error| error.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}
