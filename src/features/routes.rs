//! Endpoint paths relative to the API base URL.

pub mod auth {
    pub const LOGIN: &str = "/auth/cookie/login";
    pub const LOGOUT: &str = "/auth/cookie/logout";
    pub const REGISTER: &str = "/auth/register";
    pub const REQUEST_VERIFY_TOKEN: &str = "/auth/request-verify-token";
    pub const VERIFY: &str = "/auth/verify";
    pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
    pub const RESET_PASSWORD: &str = "/auth/reset-password";
}

pub mod users {
    use crate::features::users::types::UserId;

    pub const CURRENT_USER: &str = "/users/me";

    #[must_use]
    pub fn user_by_id(id: &UserId) -> String {
        format!("/users/{id}")
    }
}
