// src/models/stats.rs

use serde::{Deserialize, Serialize};

/// Course-wide numbers shown on the admin dashboard (`GET /admin/stats`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_lectures: u64,
    pub total_tests: u64,
    pub total_questions: u64,
    pub total_results: u64,
    #[serde(default)]
    pub test_statistics: Vec<TestStatistics>,
}

/// Attempt statistics for a single test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestStatistics {
    pub test_id: i64,
    pub test_title: String,
    pub attempts: u64,
    pub average_score: f64,
    pub passing_rate: f64,
}
