//! Client core for a cookie-session authentication and user profile API.
//!
//! ## Layout
//!
//! - [`validation`]: the `Validate` trait, per-field error lists, and rule helpers.
//! - [`http`]: configuration, the shared transport, and the error taxonomy.
//! - [`features::auth`]: login/registration/verification/reset calls and the
//!   session store that wraps them.
//! - [`features::users`]: current-user and user-by-id calls.
//! - [`cli`]: the `sesame` command line front end.
//!
//! ## Request Flow
//!
//! 1. **Validate:** outbound payloads are checked locally; invalid input never
//!    reaches the network.
//! 2. **Send:** the shared [`http::HttpClient`] applies the base URL, timeout,
//!    default headers, and the session cookie jar.
//! 3. **Decode:** response bodies are decoded and validated; a mismatch is a
//!    contract error rather than a user-facing one.
//! 4. **Record:** [`features::auth::SessionStore`] tracks `user`, `is_loading`
//!    and `error` around every action and hands the error back to the caller.
//!
//! Payloads carry passwords and one-time tokens. They are redacted from `Debug`
//! output and must never be logged.

pub mod cli;
pub mod features;
pub mod http;
pub mod validation;

pub const GIT_COMMIT_HASH: &str = match option_env!("SESAME_GIT_SHA") {
    Some(hash) => hash,
    None => "unknown",
};

/// User agent sent with every request.
pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
