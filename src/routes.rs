// src/routes.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::identity::IdentityProvider;

static LECTURE_DETAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/lectures/(\d+)$").expect("valid regex"));
static TEST_DETAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/tests/(\d+)$").expect("valid regex"));
static TEST_RESULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/tests/(\d+)/result$").expect("valid regex"));

/// Every screen of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Lectures,
    LectureDetail(i64),
    Tests,
    TestDetail(i64),
    TestResult(i64),
    Compiler,
    Login,
    Register,
    Admin,
    NotFound(String),
}

impl Route {
    /// Maps a path to its screen. Query strings, fragments and a trailing
    /// slash are ignored.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default().trim();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match path {
            "/" => return Route::Home,
            "/lectures" => return Route::Lectures,
            "/tests" => return Route::Tests,
            "/compiler" => return Route::Compiler,
            "/login" => return Route::Login,
            "/register" => return Route::Register,
            "/admin" => return Route::Admin,
            _ => {}
        }

        let id = |re: &Regex| {
            re.captures(path)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<i64>().ok())
        };

        if let Some(id) = id(&LECTURE_DETAIL) {
            Route::LectureDetail(id)
        } else if let Some(id) = id(&TEST_DETAIL) {
            Route::TestDetail(id)
        } else if let Some(id) = id(&TEST_RESULT) {
            Route::TestResult(id)
        } else {
            Route::NotFound(path.to_string())
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Lectures => "/lectures".to_string(),
            Route::LectureDetail(id) => format!("/lectures/{}", id),
            Route::Tests => "/tests".to_string(),
            Route::TestDetail(id) => format!("/tests/{}", id),
            Route::TestResult(id) => format!("/tests/{}/result", id),
            Route::Compiler => "/compiler".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::Admin)
    }
}

/// Resolves a requested path to the screen that is actually shown.
///
/// * Admin screens redirect anonymous visitors to `/login` and non-admins to `/`.
/// * A result page can only be shown right after a submission, which hands the
///   result over in memory; opening it by path lands on the test list instead.
pub fn resolve(path: &str, identity: &dyn IdentityProvider) -> Route {
    let route = Route::parse(path);

    if route.requires_admin() {
        match identity.current_user() {
            None => {
                tracing::debug!("{} requires sign-in, redirecting to /login", path);
                return Route::Login;
            }
            Some(user) if !user.is_admin => {
                tracing::debug!("{} is not an admin, redirecting to /", user.username);
                return Route::Home;
            }
            Some(_) => {}
        }
    }

    if let Route::TestResult(_) = route {
        return Route::Tests;
    }

    route
}
