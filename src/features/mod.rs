//! Domain-level client features (auth, users) and their shared pieces. The CLI
//! imports these modules so command handlers stay focused on input and output
//! while payload validation and API handling live in dedicated feature areas.

pub mod action;
pub mod auth;
pub mod routes;
pub mod users;

use serde::{Deserialize, Deserializer};

/// Keeps an explicit JSON `null` as `Some(None)`; pair with `default` so an
/// absent field stays `None`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Treats an explicit JSON `null` the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
