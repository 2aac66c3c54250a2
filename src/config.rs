// src/config.rs

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;

/// Countdown value (seconds) under which the timer is shown as a warning.
pub const TIME_WARNING_SECONDS: u32 = 300;

/// Longest display name a test-taker may enter.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 100;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the course REST API (e.g. `http://localhost:5000/api`).
    pub api_url: String,
    /// Base URL of the code execution service.
    pub compiler_url: String,
    pub request_timeout: Duration,
    /// Where the signed-in identity is persisted between runs.
    pub session_file: PathBuf,
    pub log_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let api_url = env::var("COURSE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let compiler_url = env::var("COURSE_COMPILER_URL").unwrap_or_else(|_| api_url.clone());

        let request_timeout = env::var("COURSE_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let session_file = env::var("COURSE_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".course-session.json"));

        let log_dir = env::var("COURSE_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("logs"));

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            api_url,
            compiler_url,
            request_timeout: Duration::from_secs(request_timeout),
            session_file,
            log_dir,
            rust_log,
        }
    }

    /// Configuration pointing both services at one base URL, with no session file.
    pub fn for_base_url(api_url: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            compiler_url: api_url.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            session_file: PathBuf::from(".course-session.json"),
            log_dir: PathBuf::from("logs"),
            rust_log: "error".to_string(),
        }
    }
}
