//! Client wrappers for auth endpoints. Every call validates its payload before
//! touching the network, and errors are returned unchanged so callers decide
//! how to present them. Payloads are never logged.

use crate::{
    features::{
        auth::types::{
            ForgotPasswordPayload, LoginPayload, RegisterPayload, RequestVerifyTokenPayload,
            ResetPasswordPayload, VerifyTokenPayload,
        },
        routes,
        users::types::UserRead,
    },
    http::{ApiError, HttpClient},
    validation::Validate,
};
use tracing::{debug, instrument};

#[derive(Clone, Debug)]
pub struct AuthClient {
    http: HttpClient,
}

impl AuthClient {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Logs in with the password grant. The server sets the session cookie and
    /// may answer without a body, in which case the current user is fetched.
    /// # Errors
    /// Returns a validation error before any request, or transport/contract errors.
    #[instrument(skip_all)]
    pub async fn login(&self, payload: &LoginPayload) -> Result<UserRead, ApiError> {
        payload.validate()?;

        let response = self
            .http
            .post_form(routes::auth::LOGIN, &payload.form_fields())
            .await?;

        if response.is_empty() {
            debug!(status = response.status, "login returned no user; fetching current user");
            return self.http.get(routes::users::CURRENT_USER).await?.decode();
        }

        response.decode()
    }

    /// Clears the session on the server.
    /// # Errors
    /// Returns transport errors.
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.http.post_empty(routes::auth::LOGOUT).await?;
        Ok(())
    }

    /// # Errors
    /// Returns a validation error before any request, or transport/contract errors.
    #[instrument(skip_all)]
    pub async fn register(&self, payload: &RegisterPayload) -> Result<UserRead, ApiError> {
        payload.validate()?;
        self.http
            .post_json(routes::auth::REGISTER, payload)
            .await?
            .decode()
    }

    /// Asks the server to email a verification token. Succeeds without a payload.
    /// # Errors
    /// Returns a validation error before any request, or transport errors.
    #[instrument(skip_all)]
    pub async fn request_verify_token(
        &self,
        payload: &RequestVerifyTokenPayload,
    ) -> Result<(), ApiError> {
        payload.validate()?;
        self.http
            .post_json(routes::auth::REQUEST_VERIFY_TOKEN, payload)
            .await?;
        Ok(())
    }

    /// Consumes a verification token and returns the verified user.
    /// # Errors
    /// Returns a validation error before any request, or transport/contract errors.
    #[instrument(skip_all)]
    pub async fn verify(&self, payload: &VerifyTokenPayload) -> Result<UserRead, ApiError> {
        payload.validate()?;
        self.http
            .post_json(routes::auth::VERIFY, payload)
            .await?
            .decode()
    }

    /// # Errors
    /// Returns a validation error before any request, or transport errors.
    #[instrument(skip_all)]
    pub async fn forgot_password(&self, payload: &ForgotPasswordPayload) -> Result<(), ApiError> {
        payload.validate()?;
        self.http
            .post_json(routes::auth::FORGOT_PASSWORD, payload)
            .await?;
        Ok(())
    }

    /// # Errors
    /// Returns a validation error before any request, or transport errors.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, payload: &ResetPasswordPayload) -> Result<(), ApiError> {
        payload.validate()?;
        self.http
            .post_json(routes::auth::RESET_PASSWORD, payload)
            .await?;
        Ok(())
    }
}
