// src/models/lecture.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A course lecture. `content` is Markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecture {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Position in the course.
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub order: i64,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// DTO for creating a lecture (admin).
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateLectureRequest {
    #[validate(custom(function = crate::models::validate_not_blank))]
    pub title: String,
    pub description: String,
    #[validate(custom(function = crate::models::validate_not_blank))]
    pub content: String,
    pub order: i64,
}
