//! Request payloads for auth calls. These carry passwords and one-time tokens,
//! so their `Debug` output is redacted and they must never be logged.

use crate::{
    features::{
        null_as_default,
        users::types::{PASSWORD_MAX_CHARS, PASSWORD_MIN_CHARS},
    },
    validation::{email, password_length, require, Validate, ValidationErrors},
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const RESET_PASSWORD_MIN_CHARS: usize = 3;

const REDACTED: &str = "[redacted]";

/// OAuth2 password grant; the only grant the login endpoint accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    #[default]
    Password,
}

impl GrantType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Password => "password",
        }
    }
}

/// Login form. Sent form-urlencoded, not as JSON.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub grant_type: GrantType,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl LoginPayload {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            scope: String::new(),
            grant_type: GrantType::Password,
            client_id: None,
            client_secret: None,
        }
    }

    /// Form fields in submission order; unset client credentials are omitted.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("username", self.username.clone()),
            ("password", self.password.clone()),
            ("scope", self.scope.clone()),
            ("grant_type", self.grant_type.as_str().to_string()),
        ];
        if let Some(client_id) = &self.client_id {
            fields.push(("client_id", client_id.clone()));
        }
        if let Some(client_secret) = &self.client_secret {
            fields.push(("client_secret", client_secret.clone()));
        }
        fields
    }
}

impl Validate for LoginPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "username", &self.username, "Username is required");
        require(&mut errors, "password", &self.password, "Password is required");
        errors.into_result()
    }
}

impl fmt::Debug for LoginPayload {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LoginPayload")
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("scope", &self.scope)
            .field("grant_type", &self.grant_type)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// Registration body. Flags default to `false` when absent.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_superuser: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_verified: bool,
    #[serde(default)]
    pub tg_id: Option<i64>,
}

impl RegisterPayload {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            is_active: false,
            is_superuser: false,
            is_verified: false,
            tg_id: None,
        }
    }
}

impl Validate for RegisterPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        email(&mut errors, "email", &self.email);
        password_length(
            &mut errors,
            "password",
            &self.password,
            PASSWORD_MIN_CHARS,
            Some(PASSWORD_MAX_CHARS),
        );
        errors.into_result()
    }
}

impl fmt::Debug for RegisterPayload {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RegisterPayload")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .field("is_active", &self.is_active)
            .field("is_superuser", &self.is_superuser)
            .field("is_verified", &self.is_verified)
            .field("tg_id", &self.tg_id)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyTokenPayload {
    pub token: String,
}

impl Validate for VerifyTokenPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "token", &self.token, "Token is required");
        errors.into_result()
    }
}

impl fmt::Debug for VerifyTokenPayload {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("VerifyTokenPayload")
            .field("token", &REDACTED)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPasswordPayload {
    pub token: String,
    pub password: String,
}

impl Validate for ResetPasswordPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "token", &self.token, "Token is required");
        password_length(
            &mut errors,
            "password",
            &self.password,
            RESET_PASSWORD_MIN_CHARS,
            None,
        );
        errors.into_result()
    }
}

impl fmt::Debug for ResetPasswordPayload {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ResetPasswordPayload")
            .field("token", &REDACTED)
            .field("password", &REDACTED)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordPayload {
    pub email: String,
}

impl Validate for ForgotPasswordPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        email(&mut errors, "email", &self.email);
        errors.into_result()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestVerifyTokenPayload {
    pub email: String,
}

impl Validate for RequestVerifyTokenPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        email(&mut errors, "email", &self.email);
        errors.into_result()
    }
}
