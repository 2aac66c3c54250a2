// src/views/results.rs

use std::fmt::Write;

use crate::{
    models::{result::TestResult, test::Test},
    utils::format::{format_percent, format_time},
};

/// Band used to pick the headline of the result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Average,
    Poor,
}

impl ScoreBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            ScoreBand::Excellent
        } else if percentage >= 70.0 {
            ScoreBand::Good
        } else if percentage >= 50.0 {
            ScoreBand::Average
        } else {
            ScoreBand::Poor
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent work!",
            ScoreBand::Good => "Good result!",
            ScoreBand::Average => "Not bad, but there is room to grow!",
            ScoreBand::Poor => "Try again!",
        }
    }
}

/// Result page: summary, per-question review and the next steps.
pub fn render_result(result: &TestResult, test: &Test) -> String {
    let band = ScoreBand::from_percentage(result.percentage);
    let mut out = String::new();

    let _ = writeln!(out, "{}", band.message());
    let _ = writeln!(
        out,
        "{}",
        if result.passed {
            "You passed the test!"
        } else {
            "Test not passed, don't give up!"
        }
    );
    let _ = writeln!(
        out,
        "Score: {} ({}/{} correct, passing {}%)",
        format_percent(result.percentage),
        result.score,
        result.total_questions,
        result.passing_score
    );
    let _ = writeln!(out, "Time: {}", format_time(result.time_taken));
    let _ = writeln!(out);
    let _ = writeln!(out, "{} - {} min limit", test.title, test.time_limit);
    let _ = writeln!(out);

    for (i, detail) in result.detailed_results.iter().enumerate() {
        let verdict = if detail.is_correct { "correct" } else { "wrong" };
        let _ = writeln!(out, "Question {} ({})", i + 1, verdict);
        let _ = writeln!(out, "  {}", detail.question_text);
        let _ = writeln!(
            out,
            "  Your answer: {}",
            detail.user_answer.as_deref().unwrap_or("Not answered")
        );
        if !detail.is_correct {
            let _ = writeln!(out, "  Correct answer: {}", detail.correct_answer);
        }
        if let Some(explanation) = detail.explanation.as_deref().filter(|e| !e.is_empty()) {
            let _ = writeln!(out, "  Explanation: {}", explanation);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Retake: /tests/{}   All tests: /tests   Home: /",
        test.id
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::result::QuestionOutcome;

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(ScoreBand::from_percentage(95.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_percentage(90.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_percentage(70.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_percentage(69.99), ScoreBand::Average);
        assert_eq!(ScoreBand::from_percentage(49.0), ScoreBand::Poor);
    }

    #[test]
    fn review_shows_missing_answers_and_corrections() {
        let test = Test {
            id: 5,
            title: "Lists".to_string(),
            description: None,
            time_limit: 1,
            passing_score: 70,
            is_active: true,
            questions_count: 2,
            questions: Vec::new(),
            created_at: None,
        };
        let result = TestResult {
            test_id: 5,
            student_name: "ann".to_string(),
            score: 1,
            total_questions: 2,
            percentage: 50.0,
            time_taken: 75,
            passed: false,
            passing_score: 70,
            detailed_results: vec![
                QuestionOutcome {
                    question_id: 1,
                    question_text: "q1".to_string(),
                    user_answer: Some("A".to_string()),
                    correct_answer: "A".to_string(),
                    is_correct: true,
                    explanation: None,
                },
                QuestionOutcome {
                    question_id: 2,
                    question_text: "q2".to_string(),
                    user_answer: None,
                    correct_answer: "C".to_string(),
                    is_correct: false,
                    explanation: Some("lists are mutable".to_string()),
                },
            ],
            completed_at: None,
        };

        let out = render_result(&result, &test);
        assert!(out.starts_with("Not bad"));
        assert!(out.contains("Time: 1:15"));
        assert!(out.contains("Your answer: Not answered"));
        assert_eq!(out.matches("Correct answer:").count(), 1);
        assert!(out.contains("Explanation: lists are mutable"));
        assert!(out.contains("Retake: /tests/5"));
    }
}
