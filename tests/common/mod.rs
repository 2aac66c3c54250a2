// tests/common/mod.rs

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use course_client::{
    ApiClient,
    models::{
        lecture::Lecture,
        question::Question,
        result::SubmitAttemptRequest,
        test::Test,
        user::User,
    },
};
use serde::Serialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

/// In-memory course backend.
#[derive(Debug, Default)]
pub struct Backend {
    pub tests: Vec<Test>,
    pub lectures: Vec<Lecture>,
    pub users: Vec<(User, String)>,
    pub submissions: Vec<(i64, SubmitAttemptRequest)>,
    /// Session token to username.
    pub sessions: HashMap<String, String>,
    /// Number of upcoming submissions answered with a server error.
    pub failing_submits: usize,
    next_id: i64,
}

impl Backend {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_by_name(&self, username: &str) -> Option<&User> {
        self.users
            .iter()
            .map(|(u, _)| u)
            .find(|u| u.username == username)
    }

    fn open_session(&mut self, username: &str) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), username.to_string());
        token
    }
}

pub type SharedBackend = Arc<Mutex<Backend>>;

pub struct MockServer {
    pub address: String,
    pub backend: SharedBackend,
}

impl MockServer {
    /// Client pointed at this server for both the course API and the execution service.
    pub fn client(&self) -> ApiClient {
        ApiClient::build(
            &format!("{}/api", self.address),
            &self.address,
            Duration::from_secs(5),
        )
        .expect("Failed to build client")
    }

    pub fn submissions(&self) -> Vec<(i64, SubmitAttemptRequest)> {
        self.backend.lock().unwrap().submissions.clone()
    }
}

pub fn question(id: i64, order: i64, text: &str, correct: &str) -> Question {
    Question {
        id,
        test_id: Some(1),
        question_text: text.to_string(),
        option_a: Some("first".to_string()),
        option_b: Some("second".to_string()),
        option_c: Some("third".to_string()),
        option_d: None,
        correct_answer: correct.to_string(),
        explanation: Some(format!("Because {} is right", correct)),
        order,
    }
}

/// One-minute test with three questions, served out of display order.
pub fn sample_test() -> Test {
    Test {
        id: 1,
        title: "Python basics".to_string(),
        description: Some("Variables and types".to_string()),
        time_limit: 1,
        passing_score: 70,
        is_active: true,
        questions_count: 3,
        questions: vec![
            question(12, 2, "What does len('abc') return?", "C"),
            question(11, 1, "Which keyword defines a function?", "A"),
            question(13, 3, "Which type is immutable?", "B"),
        ],
        created_at: None,
    }
}

fn user(id: i64, username: &str, is_admin: bool) -> User {
    User {
        id,
        username: username.to_string(),
        email: Some(format!("{}@example.com", username)),
        is_admin,
        is_banned: false,
        created_at: None,
    }
}

/// Seed data shared by most tests.
pub fn sample_backend() -> Backend {
    let mut retired = sample_test();
    retired.id = 2;
    retired.title = "Retired".to_string();
    retired.is_active = false;
    retired.questions.clear();
    retired.questions_count = 0;

    Backend {
        tests: vec![sample_test(), retired],
        lectures: vec![
            Lecture {
                id: 5,
                title: "Loops".to_string(),
                description: None,
                content: "for x in range(3):\n    print(x)".to_string(),
                order: 2,
                created_at: None,
                updated_at: None,
            },
            Lecture {
                id: 4,
                title: "Introduction".to_string(),
                description: Some("Getting started".to_string()),
                content: "# Hello\nprint('hi')".to_string(),
                order: 1,
                created_at: None,
                updated_at: None,
            },
        ],
        users: vec![
            (user(1, "admin", true), "adminpass".to_string()),
            (user(2, "student", false), "secret123".to_string()),
        ],
        next_id: 100,
        ..Backend::default()
    }
}

/// Spawns the mock backend on a random port.
pub async fn spawn_backend(backend: Backend) -> MockServer {
    let backend = Arc::new(Mutex::new(backend));

    let app = Router::new()
        .route("/api/tests/", get(list_tests))
        .route("/api/tests", post(create_test))
        .route("/api/tests/{id}", get(get_test))
        .route("/api/tests/{id}/submit", post(submit_test))
        .route(
            "/api/admin/questions/{id}",
            post(add_question).delete(delete_question),
        )
        .route("/api/admin/stats", get(admin_stats))
        .route("/api/lectures/", get(list_lectures))
        .route("/api/lectures", post(create_lecture))
        .route("/api/lectures/{id}", get(get_lecture).delete(delete_lecture))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/logout", post(logout))
        .route("/api/users", get(list_users))
        .route("/api/users/{id}/{action}", post(moderate_user))
        .route("/compiler/execute", post(execute))
        .route("/compiler/check", get(check))
        .layer(TraceLayer::new_for_http())
        .with_state(backend.clone());

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer {
        address: format!("http://127.0.0.1:{}", port),
        backend,
    }
}

/// Address on which nothing listens.
pub async fn closed_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn ok(status: StatusCode, data: impl Serialize) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

fn fail(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "success": false, "error": error }))).into_response()
}

fn session_user(headers: &HeaderMap, backend: &Backend) -> Option<User> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    let token = cookies
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))?;
    let name = backend.sessions.get(token)?;
    backend.user_by_name(name).cloned()
}

fn require_admin(headers: &HeaderMap, backend: &Backend) -> Result<(), Response> {
    match session_user(headers, backend) {
        Some(u) if u.is_admin => Ok(()),
        Some(_) => Err(fail(StatusCode::FORBIDDEN, "Admin access required")),
        None => Err(fail(StatusCode::UNAUTHORIZED, "Authentication required")),
    }
}

fn text(body: &Value, key: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

async fn list_tests(State(state): State<SharedBackend>) -> Response {
    let backend = state.lock().unwrap();
    let list: Vec<Test> = backend
        .tests
        .iter()
        .map(|t| Test {
            questions_count: t.questions.len(),
            questions: Vec::new(),
            ..t.clone()
        })
        .collect();
    ok(StatusCode::OK, list)
}

async fn get_test(State(state): State<SharedBackend>, Path(id): Path<i64>) -> Response {
    let backend = state.lock().unwrap();
    match backend.tests.iter().find(|t| t.id == id) {
        Some(test) => ok(StatusCode::OK, test),
        None => fail(StatusCode::NOT_FOUND, "Test not found"),
    }
}

async fn submit_test(
    State(state): State<SharedBackend>,
    Path(id): Path<i64>,
    Json(body): Json<SubmitAttemptRequest>,
) -> Response {
    let mut backend = state.lock().unwrap();
    backend.submissions.push((id, body.clone()));

    if backend.failing_submits > 0 {
        backend.failing_submits -= 1;
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }

    let Some(test) = backend.tests.iter().find(|t| t.id == id) else {
        return fail(StatusCode::NOT_FOUND, "Test not found");
    };
    if test.questions.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "Test has no questions");
    }

    let details: Vec<Value> = test
        .questions
        .iter()
        .map(|q| {
            let user_answer = body.answers.get(&q.id).map(|l| l.to_string());
            json!({
                "question_id": q.id,
                "question_text": q.question_text,
                "user_answer": user_answer,
                "correct_answer": q.correct_answer,
                "is_correct": user_answer.as_deref() == Some(q.correct_answer.as_str()),
                "explanation": q.explanation,
            })
        })
        .collect();

    let score = details.iter().filter(|d| d["is_correct"] == json!(true)).count();
    let total = test.questions.len();
    let percentage = score as f64 / total as f64 * 100.0;

    ok(
        StatusCode::OK,
        json!({
            "test_id": id,
            "student_name": body.student_name,
            "score": score,
            "total_questions": total,
            "percentage": percentage,
            "time_taken": body.time_taken,
            "passed": percentage >= test.passing_score as f64,
            "passing_score": test.passing_score,
            "detailed_results": details,
            "completed_at": "2026-10-19T10:00:00",
        }),
    )
}

async fn create_test(
    State(state): State<SharedBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    if let Err(denied) = require_admin(&headers, &backend) {
        return denied;
    }

    let test = Test {
        id: backend.next_id(),
        title: text(&body, "title"),
        description: Some(text(&body, "description")),
        time_limit: body["time_limit"].as_u64().unwrap_or(30) as u32,
        passing_score: body["passing_score"].as_u64().unwrap_or(70) as u32,
        is_active: true,
        questions_count: 0,
        questions: Vec::new(),
        created_at: None,
    };
    backend.tests.push(test.clone());
    ok(StatusCode::CREATED, test)
}

async fn add_question(
    State(state): State<SharedBackend>,
    headers: HeaderMap,
    Path(test_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    if let Err(denied) = require_admin(&headers, &backend) {
        return denied;
    }

    let id = backend.next_id();
    let option = |key: &str| Some(text(&body, key)).filter(|s| !s.is_empty());
    let question = Question {
        id,
        test_id: Some(test_id),
        question_text: text(&body, "question_text"),
        option_a: option("option_a"),
        option_b: option("option_b"),
        option_c: option("option_c"),
        option_d: option("option_d"),
        correct_answer: text(&body, "correct_answer"),
        explanation: option("explanation"),
        order: body["order"].as_i64().unwrap_or(0),
    };

    match backend.tests.iter_mut().find(|t| t.id == test_id) {
        Some(test) => {
            test.questions.push(question.clone());
            test.questions_count = test.questions.len();
            ok(StatusCode::CREATED, question)
        }
        None => fail(StatusCode::NOT_FOUND, "Test not found"),
    }
}

async fn delete_question(
    State(state): State<SharedBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut backend = state.lock().unwrap();
    if let Err(denied) = require_admin(&headers, &backend) {
        return denied;
    }

    for test in backend.tests.iter_mut() {
        if let Some(pos) = test.questions.iter().position(|q| q.id == id) {
            test.questions.remove(pos);
            test.questions_count = test.questions.len();
            return Json(json!({ "success": true, "message": "Question deleted" })).into_response();
        }
    }
    fail(StatusCode::NOT_FOUND, "Question not found")
}

async fn admin_stats(State(state): State<SharedBackend>, headers: HeaderMap) -> Response {
    let backend = state.lock().unwrap();
    if let Err(denied) = require_admin(&headers, &backend) {
        return denied;
    }

    let statistics: Vec<Value> = backend
        .tests
        .iter()
        .map(|t| {
            let attempts = backend.submissions.iter().filter(|(id, _)| *id == t.id).count();
            json!({
                "test_id": t.id,
                "test_title": t.title,
                "attempts": attempts,
                "average_score": 0.0,
                "passing_rate": 0.0,
            })
        })
        .collect();

    ok(
        StatusCode::OK,
        json!({
            "total_lectures": backend.lectures.len(),
            "total_tests": backend.tests.len(),
            "total_questions": backend.tests.iter().map(|t| t.questions.len()).sum::<usize>(),
            "total_results": backend.submissions.len(),
            "test_statistics": statistics,
        }),
    )
}

async fn list_lectures(State(state): State<SharedBackend>) -> Response {
    ok(StatusCode::OK, &state.lock().unwrap().lectures)
}

async fn get_lecture(State(state): State<SharedBackend>, Path(id): Path<i64>) -> Response {
    let backend = state.lock().unwrap();
    match backend.lectures.iter().find(|l| l.id == id) {
        Some(lecture) => ok(StatusCode::OK, lecture),
        None => fail(StatusCode::NOT_FOUND, "Lecture not found"),
    }
}

async fn create_lecture(
    State(state): State<SharedBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    if let Err(denied) = require_admin(&headers, &backend) {
        return denied;
    }

    let lecture = Lecture {
        id: backend.next_id(),
        title: text(&body, "title"),
        description: Some(text(&body, "description")),
        content: text(&body, "content"),
        order: body["order"].as_i64().unwrap_or(0),
        created_at: None,
        updated_at: None,
    };
    backend.lectures.push(lecture.clone());
    ok(StatusCode::CREATED, lecture)
}

async fn delete_lecture(
    State(state): State<SharedBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut backend = state.lock().unwrap();
    if let Err(denied) = require_admin(&headers, &backend) {
        return denied;
    }

    let before = backend.lectures.len();
    backend.lectures.retain(|l| l.id != id);
    if backend.lectures.len() == before {
        return fail(StatusCode::NOT_FOUND, "Lecture not found");
    }
    Json(json!({ "success": true, "message": "Lecture deleted" })).into_response()
}

fn with_session(backend: &mut Backend, user: &User, status: StatusCode) -> Response {
    let token = backend.open_session(&user.username);
    (
        status,
        [(header::SET_COOKIE, format!("session={}; Path=/", token))],
        Json(json!({ "success": true, "data": user })),
    )
        .into_response()
}

async fn login(State(state): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let mut backend = state.lock().unwrap();
    let username = text(&body, "username");
    let password = text(&body, "password");

    let found = backend
        .users
        .iter()
        .find(|(u, p)| u.username == username && *p == password)
        .map(|(u, _)| u.clone());

    match found {
        Some(user) if user.is_banned => fail(StatusCode::FORBIDDEN, "Account is banned"),
        Some(user) => with_session(&mut backend, &user, StatusCode::OK),
        None => fail(StatusCode::UNAUTHORIZED, "Invalid username or password"),
    }
}

async fn register(State(state): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let mut backend = state.lock().unwrap();
    let username = text(&body, "username");

    if backend.user_by_name(&username).is_some() {
        return fail(StatusCode::BAD_REQUEST, "Username already taken");
    }

    let id = backend.next_id();
    let new_user = User {
        email: Some(text(&body, "email")),
        ..user(id, &username, false)
    };
    backend.users.push((new_user.clone(), text(&body, "password")));
    with_session(&mut backend, &new_user, StatusCode::CREATED)
}

async fn logout(State(state): State<SharedBackend>, headers: HeaderMap) -> Response {
    if let Some(token) = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|c| c.split(';').find_map(|c| c.trim().strip_prefix("session=")))
    {
        state.lock().unwrap().sessions.remove(token);
    }
    (
        [(header::SET_COOKIE, "session=; Path=/; Max-Age=0".to_string())],
        Json(json!({ "success": true, "message": "Logged out" })),
    )
        .into_response()
}

async fn list_users(State(state): State<SharedBackend>, headers: HeaderMap) -> Response {
    let backend = state.lock().unwrap();
    if let Err(denied) = require_admin(&headers, &backend) {
        return denied;
    }
    let users: Vec<&User> = backend.users.iter().map(|(u, _)| u).collect();
    ok(StatusCode::OK, users)
}

async fn moderate_user(
    State(state): State<SharedBackend>,
    headers: HeaderMap,
    Path((id, action)): Path<(i64, String)>,
) -> Response {
    let mut backend = state.lock().unwrap();
    if let Err(denied) = require_admin(&headers, &backend) {
        return denied;
    }

    let Some((user, _)) = backend.users.iter_mut().find(|(u, _)| u.id == id) else {
        return fail(StatusCode::NOT_FOUND, "User not found");
    };
    match action.as_str() {
        "promote" => user.is_admin = true,
        "demote" => user.is_admin = false,
        "ban" => user.is_banned = true,
        "unban" => user.is_banned = false,
        _ => return fail(StatusCode::NOT_FOUND, "Unknown action"),
    }
    ok(StatusCode::OK, user.clone())
}

/// Understands `print("...")` lines and `raise`, nothing else.
async fn execute(Json(body): Json<Value>) -> Json<Value> {
    let code = text(&body, "code");

    if code.contains("raise") {
        return Json(json!({
            "success": false,
            "error": "Traceback (most recent call last):\nException",
        }));
    }

    let output: String = code
        .lines()
        .filter_map(|line| {
            line.trim()
                .strip_prefix("print(")?
                .strip_suffix(')')
                .map(|arg| format!("{}\n", arg.trim_matches(['"', '\''])))
        })
        .collect();

    Json(json!({ "success": true, "output": output }))
}

async fn check() -> Json<Value> {
    Json(json!({
        "success": true,
        "version": "Python 3.11.4",
        "message": "Compiler is available",
    }))
}
