//! Auth feature module: login, logout, registration, email verification, and
//! password reset, plus the session store that tracks the signed-in user.
//!
//! Flow Overview: Registration posts JSON and returns the new, unverified user;
//! the caller then requests a verification token, which the user submits back
//! through `verify`. Login posts a form-urlencoded password grant; the server
//! sets an `HttpOnly` session cookie that the transport's jar replays on later
//! calls. Forgot/reset password follow the same token pattern without touching
//! the session.

pub mod client;
pub mod state;
pub mod types;

pub use client::AuthClient;
pub use state::{SessionState, SessionStore};
pub use types::{
    ForgotPasswordPayload, GrantType, LoginPayload, RegisterPayload, RequestVerifyTokenPayload,
    ResetPasswordPayload, VerifyTokenPayload,
};
