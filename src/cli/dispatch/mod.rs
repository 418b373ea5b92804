use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::features::users::types::{UserId, UserUpdatePayload};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;

/// Builds connection and credential settings from the global arguments.
#[must_use]
pub fn globals(matches: &clap::ArgMatches) -> GlobalArgs {
    let mut globals = GlobalArgs::new(
        matches
            .get_one::<u64>("timeout-ms")
            .copied()
            .unwrap_or(crate::http::config::DEFAULT_TIMEOUT_MS),
    );
    globals.api_base_url = matches.get_one::<String>("api-base-url").cloned();
    globals.username = matches.get_one::<String>("username").cloned();
    globals.password = matches
        .get_one::<String>("password")
        .map(|password| SecretString::from(password.clone()));
    globals
}

/// Maps the selected subcommand to an action.
/// # Errors
/// Returns an error when no known subcommand was selected.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let (name, sub_m) = matches
        .subcommand()
        .context("missing subcommand, see --help")?;

    let string = |key: &str| sub_m.get_one::<String>(key).cloned().unwrap_or_default();

    let action = match name {
        "login" => Action::Login,
        "logout" => Action::Logout,
        "register" => Action::Register {
            email: string("email"),
            send_verification: sub_m.get_flag("send-verification"),
        },
        "request-verify-token" => Action::RequestVerifyToken {
            email: string("email"),
        },
        "verify" => Action::Verify {
            token: string("token"),
        },
        "forgot-password" => Action::ForgotPassword {
            email: string("email"),
        },
        "reset-password" => Action::ResetPassword {
            token: string("token"),
            password: SecretString::from(string("new-password")),
        },
        "me" => Action::Me,
        "update-me" => Action::UpdateMe {
            update: update_payload(sub_m),
        },
        "user" => user_action(sub_m)?,
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok(action)
}

fn user_action(matches: &clap::ArgMatches) -> Result<Action> {
    let (name, sub_m) = matches
        .subcommand()
        .context("missing user subcommand, see --help")?;

    let id = sub_m
        .get_one::<String>("id")
        .map(|id| UserId::from(id.as_str()))
        .context("missing required argument: <id>")?;

    match name {
        "get" => Ok(Action::GetUser { id }),
        "update" => Ok(Action::UpdateUser {
            id,
            update: update_payload(sub_m),
        }),
        "delete" => Ok(Action::DeleteUser { id }),
        other => Err(anyhow!("unknown user subcommand: {other}")),
    }
}

fn update_payload(matches: &clap::ArgMatches) -> UserUpdatePayload {
    // account flags only exist on `user update`
    let account_flag = |id: &str| matches.try_get_one::<bool>(id).ok().flatten().copied();

    let tg_id = if matches.get_flag("clear-tg-id") {
        Some(None)
    } else {
        matches.get_one::<i64>("tg-id").copied().map(Some)
    };

    UserUpdatePayload {
        email: matches.get_one::<String>("email").cloned(),
        password: matches.get_one::<String>("new-password").cloned(),
        is_active: account_flag("active"),
        is_superuser: account_flag("superuser"),
        is_verified: account_flag("verified"),
        tg_id,
    }
}
