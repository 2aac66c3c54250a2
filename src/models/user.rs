// src/models/user.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account as returned by the auth and users endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username. Also used as the display name when taking tests.
    pub username: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub is_admin: bool,

    #[serde(default)]
    pub is_banned: bool,

    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// DTO for user login.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 80, message = "Username is required."))]
    pub username: String,
    #[validate(length(min = 1, max = 128, message = "Password is required."))]
    pub password: String,
}

/// DTO for creating a new user (Registration).
/// `confirm_password` is checked locally and never sent.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(
        min = 3,
        max = 80,
        message = "Username length must be between 3 and 80 characters."
    ))]
    pub username: String,
    #[validate(email(message = "Email address is not valid."))]
    pub email: String,
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password must contain at least 6 characters."
    ))]
    pub password: String,
    #[serde(skip)]
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub confirm_password: String,
}

/// Moderation actions exposed by `POST /users/{id}/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Promote,
    Demote,
    Ban,
    Unban,
}

impl UserAction {
    pub fn as_path(&self) -> &'static str {
        match self {
            UserAction::Promote => "promote",
            UserAction::Demote => "demote",
            UserAction::Ban => "ban",
            UserAction::Unban => "unban",
        }
    }
}
