// src/models/question.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::ClientError;

/// Label of one of the (at most four) options of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
            OptionLabel::D => "D",
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `a`..`d` in either case, surrounding whitespace ignored.
impl FromStr for OptionLabel {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(OptionLabel::A),
            "B" => Ok(OptionLabel::B),
            "C" => Ok(OptionLabel::C),
            "D" => Ok(OptionLabel::D),
            other => Err(ClientError::Validation(format!(
                "'{}' is not an option label (expected A-D)",
                other
            ))),
        }
    }
}

/// A test question as served by `GET /tests/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    #[serde(default)]
    pub test_id: Option<i64>,

    /// The prompt shown to the test-taker.
    pub question_text: String,

    /// Option texts. The API sends `null` or `""` for an option that does not exist.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub option_a: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub option_b: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub option_c: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub option_d: Option<String>,

    /// Correct option label ('A'..'D').
    #[serde(default)]
    pub correct_answer: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub explanation: Option<String>,

    /// Display order inside the test.
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub order: i64,
}

impl Question {
    pub fn option(&self, label: OptionLabel) -> Option<&str> {
        match label {
            OptionLabel::A => self.option_a.as_deref(),
            OptionLabel::B => self.option_b.as_deref(),
            OptionLabel::C => self.option_c.as_deref(),
            OptionLabel::D => self.option_d.as_deref(),
        }
    }

    /// Present options in label order.
    pub fn options(&self) -> impl Iterator<Item = (OptionLabel, &str)> {
        OptionLabel::ALL
            .into_iter()
            .filter_map(move |label| self.option(label).map(|text| (label, text)))
    }

    pub fn has_option(&self, label: OptionLabel) -> bool {
        self.option(label).is_some()
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// DTO for adding a question to a test (`POST /admin/questions/{test_id}`).
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewQuestion {
    #[validate(custom(function = crate::models::validate_not_blank))]
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: OptionLabel,
    pub explanation: String,
    pub order: i64,
}

impl NewQuestion {
    /// A question with only the prompt and correct label set.
    pub fn new(question_text: impl Into<String>, correct_answer: OptionLabel) -> Self {
        Self {
            question_text: question_text.into(),
            option_a: String::new(),
            option_b: String::new(),
            option_c: String::new(),
            option_d: String::new(),
            correct_answer,
            explanation: String::new(),
            order: 0,
        }
    }

    pub fn with_options(mut self, a: &str, b: &str, c: &str, d: &str) -> Self {
        self.option_a = a.to_string();
        self.option_b = b.to_string();
        self.option_c = c.to_string();
        self.option_d = d.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!(" b ".parse::<OptionLabel>().unwrap(), OptionLabel::B);
        assert_eq!("D".parse::<OptionLabel>().unwrap(), OptionLabel::D);
        assert!("e".parse::<OptionLabel>().is_err());
        assert!("".parse::<OptionLabel>().is_err());
    }

    #[test]
    fn blank_options_are_absent() {
        let q: Question = serde_json::from_value(serde_json::json!({
            "id": 7,
            "test_id": 1,
            "question_text": "What does len([1, 2]) return?",
            "option_a": "1",
            "option_b": "2",
            "option_c": "",
            "option_d": null,
            "correct_answer": "B",
            "explanation": "",
            "order": 2
        }))
        .unwrap();

        let labels: Vec<OptionLabel> = q.options().map(|(l, _)| l).collect();
        assert_eq!(labels, vec![OptionLabel::A, OptionLabel::B]);
        assert!(!q.has_option(OptionLabel::C));
        assert_eq!(q.explanation, None);
    }

    #[test]
    fn null_order_reads_as_zero() {
        let q: Question = serde_json::from_value(serde_json::json!({
            "id": 8,
            "test_id": 1,
            "question_text": "Which keyword defines a function?",
            "option_a": "def",
            "option_b": "fn",
            "correct_answer": "A",
            "order": null
        }))
        .unwrap();
        assert_eq!(q.order, 0);
    }

    #[test]
    fn new_question_requires_text() {
        let q = NewQuestion::new("   ", OptionLabel::A);
        assert!(q.validate().is_err());

        let q = NewQuestion::new("print type", OptionLabel::A).with_options("int", "str", "", "");
        assert!(q.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&q).unwrap()["correct_answer"],
            serde_json::json!("A")
        );
    }
}
