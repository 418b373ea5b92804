use super::{failure, print_user, Action};
use crate::{
    cli::globals::GlobalArgs,
    features::auth::{
        ForgotPasswordPayload, RegisterPayload, RequestVerifyTokenPayload, ResetPasswordPayload,
        SessionStore, VerifyTokenPayload,
    },
};
use anyhow::{anyhow, Context, Result};
use secrecy::ExposeSecret;
use tracing::{info, warn};

/// Handle account actions that do not require a prior session.
/// # Errors
/// Returns API failures with their user-facing message.
pub async fn handle(action: Action, store: &SessionStore, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Logout => {
            store.logout().await.map_err(failure)?;
            println!("Signed out.");
        }
        Action::Register {
            email,
            send_verification,
        } => {
            let password = globals
                .password
                .as_ref()
                .context("missing required argument: --password")?;
            let payload = RegisterPayload::new(email.trim(), password.expose_secret());
            let user = store.register(&payload).await.map_err(failure)?;
            info!(user_id = user.id, "registered");
            print_user(&user)?;

            if send_verification {
                let request = RequestVerifyTokenPayload {
                    email: user.email.clone(),
                };
                match store.request_verify_token(&request).await {
                    Ok(()) => println!("Verification email sent to {}.", user.email),
                    Err(err) => {
                        // The account exists; only the email failed.
                        warn!(error = %err, "verification request failed after registration");
                        return Err(failure(err));
                    }
                }
            }
        }
        Action::RequestVerifyToken { email } => {
            let payload = RequestVerifyTokenPayload {
                email: email.trim().to_string(),
            };
            store
                .request_verify_token(&payload)
                .await
                .map_err(failure)?;
            println!("Verification email requested.");
        }
        Action::Verify { token } => {
            let payload = VerifyTokenPayload {
                token: token.trim().to_string(),
            };
            let user = store.verify_token(&payload).await.map_err(failure)?;
            print_user(&user)?;
        }
        Action::ForgotPassword { email } => {
            let payload = ForgotPasswordPayload {
                email: email.trim().to_string(),
            };
            store.forgot_password(&payload).await.map_err(failure)?;
            println!("Password reset email requested.");
        }
        Action::ResetPassword { token, password } => {
            let payload = ResetPasswordPayload {
                token: token.trim().to_string(),
                password: password.expose_secret().to_string(),
            };
            store.reset_password(&payload).await.map_err(failure)?;
            println!("Password updated.");
        }
        other => return Err(anyhow!("not an account action: {other:?}")),
    }

    Ok(())
}
