//! Common constants used across route handlers

/// Body of the response to any method other than POST on `/register`
pub const ERROR_INVALID_METHOD: &str = "Invalid method";

/// The only path the registration form posts to
pub const REGISTER_PATH: &str = "/register";
