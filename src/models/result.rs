// src/models/result.rs

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::question::OptionLabel;

/// Answer Map: question id to the selected option.
/// Serialized with the ids as string keys, which is what the API reads.
pub type AnswerMap = BTreeMap<i64, OptionLabel>;

/// DTO for submitting a test attempt (`POST /tests/{id}/submit`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitAttemptRequest {
    pub student_name: String,
    pub answers: AnswerMap,
    /// Elapsed wall-clock seconds since the attempt started.
    pub time_taken: u64,
}

/// Scored attempt returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test_id: i64,
    pub student_name: String,

    /// Number of correct answers.
    pub score: u32,
    pub total_questions: u32,
    pub percentage: f64,
    pub time_taken: u64,
    pub passed: bool,
    pub passing_score: u32,

    #[serde(default)]
    pub detailed_results: Vec<QuestionOutcome>,

    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
}

/// Per-question line of a scored attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: i64,
    pub question_text: String,
    #[serde(default)]
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_use_string_keys_on_the_wire() {
        let mut answers = AnswerMap::new();
        answers.insert(12, OptionLabel::A);
        answers.insert(3, OptionLabel::C);

        let body = serde_json::to_value(SubmitAttemptRequest {
            student_name: "ann".to_string(),
            answers,
            time_taken: 42,
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "student_name": "ann",
                "answers": { "3": "C", "12": "A" },
                "time_taken": 42
            })
        );
    }

    #[test]
    fn result_decodes_unanswered_questions() {
        let result: TestResult = serde_json::from_value(serde_json::json!({
            "test_id": 1,
            "student_name": "ann",
            "score": 1,
            "total_questions": 2,
            "percentage": 50.0,
            "time_taken": 60,
            "passed": false,
            "passing_score": 70,
            "detailed_results": [
                { "question_id": 1, "question_text": "q1", "user_answer": "A",
                  "correct_answer": "A", "is_correct": true, "explanation": null },
                { "question_id": 2, "question_text": "q2", "user_answer": null,
                  "correct_answer": "B", "is_correct": false }
            ],
            "completed_at": "2024-03-01T09:30:00"
        }))
        .unwrap();

        assert_eq!(result.detailed_results[1].user_answer, None);
        assert!(!result.passed);
    }
}
