pub mod auth;
pub mod users;

use crate::{
    cli::globals::GlobalArgs,
    features::{
        auth::{LoginPayload, SessionStore},
        users::types::{UserId, UserRead, UserUpdatePayload},
    },
    http::{ApiError, HttpClient},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

#[derive(Debug)]
pub enum Action {
    Login,
    Logout,
    Register {
        email: String,
        send_verification: bool,
    },
    RequestVerifyToken {
        email: String,
    },
    Verify {
        token: String,
    },
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        token: String,
        password: SecretString,
    },
    Me,
    UpdateMe {
        update: UserUpdatePayload,
    },
    GetUser {
        id: UserId,
    },
    UpdateUser {
        id: UserId,
        update: UserUpdatePayload,
    },
    DeleteUser {
        id: UserId,
    },
}

impl Action {
    /// Actions that act on behalf of a signed-in user.
    #[must_use]
    pub fn needs_session(&self) -> bool {
        matches!(
            self,
            Self::Logout
                | Self::Me
                | Self::UpdateMe { .. }
                | Self::GetUser { .. }
                | Self::UpdateUser { .. }
                | Self::DeleteUser { .. }
        )
    }
}

/// Builds the session store and runs the action, signing in first when the
/// action needs a session and credentials were provided.
/// # Errors
/// Returns configuration errors and API failures with a user-facing message.
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    let http = HttpClient::new(&globals.config()).map_err(failure)?;
    let store = SessionStore::new(http);

    if action.needs_session() && globals.username.is_some() {
        sign_in(&store, globals).await?;
    }

    match action {
        Action::Login => {
            let user = sign_in(&store, globals).await?;
            print_user(&user)
        }
        Action::Logout
        | Action::Register { .. }
        | Action::RequestVerifyToken { .. }
        | Action::Verify { .. }
        | Action::ForgotPassword { .. }
        | Action::ResetPassword { .. } => auth::handle(action, &store, globals).await,
        Action::Me
        | Action::UpdateMe { .. }
        | Action::GetUser { .. }
        | Action::UpdateUser { .. }
        | Action::DeleteUser { .. } => users::handle(action, &store).await,
    }
}

/// Logs in with the global credentials.
async fn sign_in(store: &SessionStore, globals: &GlobalArgs) -> Result<UserRead> {
    let username = globals
        .username
        .clone()
        .context("missing required argument: --username")?;
    let password = globals
        .password
        .as_ref()
        .context("missing required argument: --password")?;

    let payload = LoginPayload::new(username, password.expose_secret());
    let user = store.login(&payload).await.map_err(failure)?;
    info!(user_id = user.id, "signed in");

    Ok(user)
}

/// Wraps an API error so the user-facing message is what gets reported.
pub(crate) fn failure(err: ApiError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

pub(crate) fn print_user(user: &UserRead) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(user)?);
    Ok(())
}
