// src/views/lectures.rs

use std::fmt::Write;

use crate::{api::ApiClient, error::ClientError, models::lecture::Lecture};

/// A lecture together with its neighbours in course order.
#[derive(Debug, Clone)]
pub struct LectureDetail {
    pub lecture: Lecture,
    /// Position in the course list, when the list could be loaded.
    pub position: Option<usize>,
    pub previous: Option<Lecture>,
    pub next: Option<Lecture>,
    pub total: usize,
}

impl LectureDetail {
    pub fn new(lecture: Lecture, all: &[Lecture]) -> Self {
        let position = all.iter().position(|l| l.id == lecture.id);
        let previous = position
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| all.get(i))
            .cloned();
        let next = position.and_then(|i| all.get(i + 1)).cloned();

        Self {
            lecture,
            position,
            previous,
            next,
            total: all.len(),
        }
    }
}

/// Loads a lecture and the course list side by side.
///
/// The lecture itself is required. The list only feeds previous/next links, so
/// its failure is logged and the page is shown without them.
pub async fn load_detail(api: &ApiClient, id: i64) -> Result<LectureDetail, ClientError> {
    let (lecture, all) = tokio::join!(api.get_lecture(id), api.list_lectures());
    let lecture = lecture?;

    let all = all.unwrap_or_else(|e| {
        tracing::warn!("Lecture list unavailable, navigation disabled: {}", e);
        Vec::new()
    });

    Ok(LectureDetail::new(lecture, &all))
}

pub fn render_list(lectures: &[Lecture]) -> String {
    if lectures.is_empty() {
        return "No lectures yet.\n".to_string();
    }

    let mut out = format!("Lectures ({})\n", lectures.len());
    for (i, lecture) in lectures.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. [{}] {}", i + 1, lecture.id, lecture.title);
        if let Some(desc) = lecture.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "       {}", desc);
        }
    }
    out
}

pub fn render_detail(detail: &LectureDetail) -> String {
    let lecture = &detail.lecture;
    let mut out = String::new();

    let _ = writeln!(out, "# {}", lecture.title);
    if let Some(position) = detail.position {
        let _ = writeln!(out, "Lecture {} of {}", position + 1, detail.total);
    }
    if let Some(desc) = lecture.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "{}", desc);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", lecture.content.trim_end());
    let _ = writeln!(out);

    if let Some(prev) = &detail.previous {
        let _ = writeln!(out, "[p] previous: {}", prev.title);
    }
    if let Some(next) = &detail.next {
        let _ = writeln!(out, "[n] next: {}", next.title);
    }
    out
}
