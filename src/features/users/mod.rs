//! Current-user and user-by-id calls. Authorization is enforced by the server;
//! these helpers only validate payloads and decode responses.

pub mod client;
pub mod types;

pub use client::UsersClient;
pub use types::{UserId, UserRead, UserUpdatePayload};
