//! Session state for the client. The store is created once at startup, owns the
//! auth and users clients, and is the only writer of `{ user, is_loading,
//! error }`. Readers take snapshots or subscribe to a `watch` channel that is
//! notified on every change.
//!
//! Every action follows the same lifecycle: clear `error` and raise
//! `is_loading`, run the call, then lower `is_loading` and record the error on
//! failure. `is_loading` is also lowered when the call is dropped before it
//! settles. The error is also returned so the caller can react to it. Actions
//! are not serialized: two concurrent actions interleave and the last write
//! wins, so callers should not submit while `is_loading` is set.

use crate::{
    features::{
        action::LoadingGuard,
        auth::{
            client::AuthClient,
            types::{
                ForgotPasswordPayload, LoginPayload, RegisterPayload, RequestVerifyTokenPayload,
                ResetPasswordPayload, VerifyTokenPayload,
            },
        },
        users::{
            client::UsersClient,
            types::{UserRead, UserUpdatePayload},
        },
    },
    http::{ApiError, HttpClient},
};
use std::future::Future;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub user: Option<UserRead>,
    pub is_loading: bool,
    pub error: Option<ApiError>,
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

fn loading_flag(state: &mut SessionState) -> &mut bool {
    &mut state.is_loading
}

#[derive(Debug)]
pub struct SessionStore {
    auth: AuthClient,
    users: UsersClient,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Builds an empty, signed-out store around the shared transport.
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            auth: AuthClient::new(http.clone()),
            users: UsersClient::new(http),
            state,
        }
    }

    /// Users client sharing this store's transport and session cookie, for
    /// calls whose results do not belong in the session.
    #[must_use]
    pub fn users(&self) -> &UsersClient {
        &self.users
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Reads a projection of the state without cloning all of it.
    pub fn select<R>(&self, selector: impl FnOnce(&SessionState) -> R) -> R {
        selector(&self.state.borrow())
    }

    #[must_use]
    pub fn user(&self) -> Option<UserRead> {
        self.select(|state| state.user.clone())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.select(|state| state.is_loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<ApiError> {
        self.select(|state| state.error.clone())
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// # Errors
    /// Returns the login failure after recording it; `user` is unchanged.
    #[instrument(skip_all)]
    pub async fn login(&self, payload: &LoginPayload) -> Result<UserRead, ApiError> {
        self.run_with_loading(async {
            let user = self.auth.login(payload).await?;
            self.set_user(Some(user.clone()));
            Ok(user)
        })
        .await
    }

    /// # Errors
    /// Returns the registration failure after recording it.
    #[instrument(skip_all)]
    pub async fn register(&self, payload: &RegisterPayload) -> Result<UserRead, ApiError> {
        self.run_with_loading(async {
            let user = self.auth.register(payload).await?;
            self.set_user(Some(user.clone()));
            Ok(user)
        })
        .await
    }

    /// # Errors
    /// Returns the request failure after recording it.
    #[instrument(skip_all)]
    pub async fn request_verify_token(
        &self,
        payload: &RequestVerifyTokenPayload,
    ) -> Result<(), ApiError> {
        self.run_with_loading(self.auth.request_verify_token(payload))
            .await
    }

    /// # Errors
    /// Returns the verification failure after recording it.
    #[instrument(skip_all)]
    pub async fn verify_token(&self, payload: &VerifyTokenPayload) -> Result<UserRead, ApiError> {
        self.run_with_loading(async {
            let user = self.auth.verify(payload).await?;
            self.set_user(Some(user.clone()));
            Ok(user)
        })
        .await
    }

    /// # Errors
    /// Returns the request failure after recording it.
    #[instrument(skip_all)]
    pub async fn forgot_password(&self, payload: &ForgotPasswordPayload) -> Result<(), ApiError> {
        self.run_with_loading(self.auth.forgot_password(payload))
            .await
    }

    /// # Errors
    /// Returns the reset failure after recording it.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, payload: &ResetPasswordPayload) -> Result<(), ApiError> {
        self.run_with_loading(self.auth.reset_password(payload))
            .await
    }

    /// Refreshes `user` from the session cookie.
    /// # Errors
    /// Returns the fetch failure after recording it; `user` is unchanged.
    #[instrument(skip_all)]
    pub async fn fetch_current_user(&self) -> Result<UserRead, ApiError> {
        self.run_with_loading(async {
            let user = self.users.get_current_user().await?;
            self.set_user(Some(user.clone()));
            Ok(user)
        })
        .await
    }

    /// # Errors
    /// Returns the update failure after recording it; `user` is unchanged.
    #[instrument(skip_all)]
    pub async fn update_current_user(
        &self,
        payload: &UserUpdatePayload,
    ) -> Result<UserRead, ApiError> {
        self.run_with_loading(async {
            let user = self.users.update_current_user(payload).await?;
            self.set_user(Some(user.clone()));
            Ok(user)
        })
        .await
    }

    /// Ends the server session and clears `user`.
    /// # Errors
    /// Returns the logout failure after recording it; `user` is kept.
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.run_with_loading(async {
            self.auth.logout().await?;
            self.set_user(None);
            Ok(())
        })
        .await
    }

    /// Replaces `user` directly, e.g. when restoring a known session.
    pub fn set_user(&self, user: Option<UserRead>) {
        self.state.send_modify(|state| state.user = user);
    }

    /// Clears a stale error without touching `user` or `is_loading`.
    pub fn reset_error(&self) {
        self.state.send_modify(|state| state.error = None);
    }

    async fn run_with_loading<T, F>(&self, action: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.state.send_modify(|state| state.error = None);
        let _loading = LoadingGuard::raise(&self.state, loading_flag);

        match action.await {
            Ok(value) => {
                self.state.send_modify(|state| state.is_loading = false);
                debug!("session action completed");
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "session action failed");
                self.state.send_modify(|state| {
                    state.is_loading = false;
                    state.error = Some(err.clone());
                });
                Err(err)
            }
        }
    }
}
