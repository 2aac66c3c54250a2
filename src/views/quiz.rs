// src/views/quiz.rs

use std::fmt::Write;

use crate::{
    controller::{Phase, TestSession},
    models::{question::OptionLabel, test::Test},
    utils::format::format_time,
};

/// One line typed on the question screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCommand {
    Answer(OptionLabel),
    Next,
    Previous,
    /// Zero-based question index.
    Jump(usize),
    Finish,
    Leave,
}

impl QuizCommand {
    /// `a`-`d`, `n`, `p`, `f`, `q`, or a 1-based question number.
    /// Anything else, including `0` and negative numbers, is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        match input {
            "n" => return Some(QuizCommand::Next),
            "p" => return Some(QuizCommand::Previous),
            "f" => return Some(QuizCommand::Finish),
            "q" => return Some(QuizCommand::Leave),
            _ => {}
        }

        if let Ok(label) = input.parse::<OptionLabel>() {
            return Some(QuizCommand::Answer(label));
        }

        input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .map(QuizCommand::Jump)
    }
}

/// Rough difficulty derived from the number of questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_question_count(count: usize) -> Self {
        match count {
            0..=5 => Difficulty::Easy,
            6..=10 => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

pub fn render_catalogue(tests: &[Test]) -> String {
    let active: Vec<&Test> = tests.iter().filter(|t| t.is_active).collect();
    if active.is_empty() {
        return "No tests available.\n".to_string();
    }

    let total_questions: usize = active.iter().map(|t| t.questions_count).sum();
    let mut out = format!(
        "Tests: {}  Questions: {}\n",
        active.len(),
        total_questions
    );
    for test in active {
        let _ = writeln!(
            out,
            "  [{}] {} ({} questions, {} min, pass {}%, {})",
            test.id,
            test.title,
            test.questions_count,
            test.time_limit,
            test.passing_score,
            Difficulty::from_question_count(test.questions_count).label()
        );
    }
    out
}

/// Start page shown before the countdown is armed.
pub fn render_intro(test: &Test, account_name: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", test.title);
    if let Some(desc) = test.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "{}", desc);
    }
    let _ = writeln!(out, "Time: {} min", test.time_limit);
    let _ = writeln!(out, "Questions: {}", test.question_count());
    let _ = writeln!(out, "Passing score: {}%", test.passing_score);
    match account_name {
        Some(name) => {
            let _ = writeln!(out, "Taking the test as {} (from your account).", name);
        }
        None => {
            let _ = writeln!(out, "Enter your name to begin.");
        }
    }
    out
}

/// The question screen: header, progress dots, current question and options.
pub fn render_question(session: &TestSession) -> String {
    let mut out = String::new();
    let test = session.test();
    let total = test.question_count();

    let Some(question) = session.current_question() else {
        return "This test has no questions.\n".to_string();
    };

    let timer = format_time(session.remaining_secs() as u64);
    let warning = if session.is_low_on_time() { " !" } else { "" };
    let _ = writeln!(
        out,
        "{} | Question {} of {} | Answered {}/{} | {}{}",
        test.title,
        session.current_index() + 1,
        total,
        session.answered_count(),
        total,
        timer,
        warning
    );

    let dots: Vec<String> = test
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let mark = if session.is_answered(q.id) { "*" } else { "" };
            if i == session.current_index() {
                format!("[{}{}]", i + 1, mark)
            } else {
                format!("{}{}", i + 1, mark)
            }
        })
        .collect();
    let _ = writeln!(out, "{}", dots.join(" "));
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", question.question_text);
    let selected = session.answer_for(question.id);
    for (label, text) in question.options() {
        let marker = if selected == Some(label) { "(x)" } else { "( )" };
        let _ = writeln!(out, "  {} {}. {}", marker, label, text);
    }

    if let Phase::Submitting { failed: true } = session.phase() {
        let _ = writeln!(
            out,
            "Submission failed: {}. Type 'f' to retry.",
            session.last_error().unwrap_or("unknown error")
        );
    }
    out
}
