//! User representations shared by the auth and users features.

use crate::{
    features::{null_as_default, nullable},
    validation::{email, password_length, Validate, ValidationErrors},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 64;

/// User as returned by the API. Server-owned: change it only through update
/// calls, which return a fresh copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRead {
    pub id: i64,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_superuser: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_verified: bool,
    #[serde(default)]
    pub tg_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Validate for UserRead {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        email(&mut errors, "email", &self.email);
        errors.into_result()
    }
}

/// Partial update; absent fields are left untouched by the server.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdatePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    /// `Some(None)` sends `null`, which unlinks the Telegram account.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub tg_id: Option<Option<i64>>,
}

impl UserUpdatePayload {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Validate for UserUpdatePayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(value) = &self.email {
            email(&mut errors, "email", value);
        }
        if let Some(value) = &self.password {
            password_length(
                &mut errors,
                "password",
                value,
                PASSWORD_MIN_CHARS,
                Some(PASSWORD_MAX_CHARS),
            );
        }
        errors.into_result()
    }
}

impl fmt::Debug for UserUpdatePayload {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("UserUpdatePayload")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("is_active", &self.is_active)
            .field("is_superuser", &self.is_superuser)
            .field("is_verified", &self.is_verified)
            .field("tg_id", &self.tg_id)
            .finish()
    }
}

/// Path identifier for `/users/{id}`. The format is left to the server to judge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(formatter, "{id}"),
            Self::Text(id) => write!(formatter, "{}", id.trim()),
        }
    }
}
