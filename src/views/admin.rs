// src/views/admin.rs

use std::fmt::Write;

use crate::{
    api::ApiClient,
    models::{lecture::Lecture, stats::AdminStats, test::Test, user::User},
    utils::format::format_percent,
};

/// Everything the dashboard shows. Each part is loaded on its own; a part that
/// failed is left empty and its error recorded.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub stats: Option<AdminStats>,
    pub lectures: Vec<Lecture>,
    pub tests: Vec<Test>,
    pub users: Vec<User>,
    pub errors: Vec<String>,
}

pub async fn load_dashboard(api: &ApiClient) -> Dashboard {
    let (stats, lectures, tests, users) = tokio::join!(
        api.admin_stats(),
        api.list_lectures(),
        api.list_tests(),
        api.list_users()
    );

    let mut dashboard = Dashboard::default();

    match stats {
        Ok(stats) => dashboard.stats = Some(stats),
        Err(e) => dashboard.errors.push(format!("stats: {}", e)),
    }
    match lectures {
        Ok(lectures) => dashboard.lectures = lectures,
        Err(e) => dashboard.errors.push(format!("lectures: {}", e)),
    }
    match tests {
        Ok(tests) => dashboard.tests = tests,
        Err(e) => dashboard.errors.push(format!("tests: {}", e)),
    }
    match users {
        Ok(users) => dashboard.users = users,
        Err(e) => dashboard.errors.push(format!("users: {}", e)),
    }

    if !dashboard.errors.is_empty() {
        tracing::warn!("Dashboard loaded with {} failed part(s)", dashboard.errors.len());
    }
    dashboard
}

pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::from("Admin dashboard\n");

    if let Some(stats) = &dashboard.stats {
        let _ = writeln!(
            out,
            "Lectures: {}  Tests: {}  Questions: {}  Results: {}",
            stats.total_lectures, stats.total_tests, stats.total_questions, stats.total_results
        );
        for t in &stats.test_statistics {
            let _ = writeln!(
                out,
                "  [{}] {}: {} attempts, avg {}, pass rate {}",
                t.test_id,
                t.test_title,
                t.attempts,
                format_percent(t.average_score),
                format_percent(t.passing_rate)
            );
        }
    }

    let _ = writeln!(out, "\nLectures ({})", dashboard.lectures.len());
    for l in &dashboard.lectures {
        let _ = writeln!(out, "  [{}] {}", l.id, l.title);
    }

    let _ = writeln!(out, "\nTests ({})", dashboard.tests.len());
    for t in &dashboard.tests {
        let _ = writeln!(out, "  [{}] {} ({} questions)", t.id, t.title, t.questions_count);
    }

    let _ = writeln!(out, "\nUsers ({})", dashboard.users.len());
    for u in &dashboard.users {
        let mut flags = Vec::new();
        if u.is_admin {
            flags.push("admin");
        }
        if u.is_banned {
            flags.push("banned");
        }
        let _ = writeln!(out, "  [{}] {} {}", u.id, u.username, flags.join(","));
    }

    for error in &dashboard.errors {
        let _ = writeln!(out, "! {}", error);
    }
    out
}
