// src/models/compiler.rs

use serde::{Deserialize, Serialize};

/// Body of `POST /compiler/execute`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest {
    pub code: String,
}

/// Reply of the execution service. Unlike the course API it carries its
/// payload at the top level: `output` on success, `error` otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecuteResponse {
    pub success: bool,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply of `GET /compiler/check`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompilerStatus {
    pub success: bool,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
