//! Client helpers for user endpoints. Paths are centralized in
//! [`crate::features::routes`]; the server decides whether an id is valid.

use crate::{
    features::{
        routes,
        users::types::{UserId, UserRead, UserUpdatePayload},
    },
    http::{ApiError, HttpClient},
    validation::Validate,
};
use tracing::instrument;

#[derive(Clone, Debug)]
pub struct UsersClient {
    http: HttpClient,
}

impl UsersClient {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Fetches the user behind the session cookie.
    /// # Errors
    /// Returns transport errors or a contract error for an unexpected body.
    #[instrument(skip(self))]
    pub async fn get_current_user(&self) -> Result<UserRead, ApiError> {
        self.http.get(routes::users::CURRENT_USER).await?.decode()
    }

    /// # Errors
    /// Returns a validation error before any request when the payload is invalid.
    #[instrument(skip_all)]
    pub async fn update_current_user(
        &self,
        payload: &UserUpdatePayload,
    ) -> Result<UserRead, ApiError> {
        payload.validate()?;
        self.http
            .patch_json(routes::users::CURRENT_USER, payload)
            .await?
            .decode()
    }

    /// # Errors
    /// Returns transport errors (404/422 for unknown or malformed ids).
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn get_user_by_id(&self, id: &UserId) -> Result<UserRead, ApiError> {
        self.http.get(&routes::users::user_by_id(id)).await?.decode()
    }

    /// # Errors
    /// Returns a validation error before any request when the payload is invalid.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn update_user_by_id(
        &self,
        id: &UserId,
        payload: &UserUpdatePayload,
    ) -> Result<UserRead, ApiError> {
        payload.validate()?;
        self.http
            .patch_json(&routes::users::user_by_id(id), payload)
            .await?
            .decode()
    }

    /// # Errors
    /// Returns transport errors.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn delete_user_by_id(&self, id: &UserId) -> Result<(), ApiError> {
        self.http.delete(&routes::users::user_by_id(id)).await?;
        Ok(())
    }
}
