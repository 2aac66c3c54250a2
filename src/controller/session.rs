// src/controller/session.rs

use tokio::time::Instant;

use crate::{
    config::{MAX_DISPLAY_NAME_LENGTH, TIME_WARNING_SECONDS},
    error::ClientError,
    models::{
        question::{OptionLabel, Question},
        result::{AnswerMap, SubmitAttemptRequest, TestResult},
        test::Test,
    },
};

/// Lifecycle of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Loaded, waiting for the display name to be confirmed.
    NotStarted,
    /// Countdown armed; answers and navigation accepted.
    Running,
    /// Answers frozen. `failed` is set when the last request did not go through
    /// and a new `submit()` may be issued.
    Submitting { failed: bool },
    /// Scored. Terminal.
    Submitted,
}

/// What a single countdown tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed.
    Ignored,
    /// Still running with this many seconds left.
    Counting(u32),
    /// Time ran out; submission must start now.
    Expired,
}

/// Snapshot published to observers after every state change.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub phase: Phase,
    pub current_index: usize,
    pub remaining_secs: u32,
    pub answered: usize,
    pub total: usize,
    pub last_error: Option<String>,
    pub result: Option<TestResult>,
}

/// State of one test attempt. Synchronous; time is passed in by the caller.
#[derive(Debug, Clone)]
pub struct TestSession {
    test: Test,
    answers: AnswerMap,
    current: usize,
    remaining: u32,
    phase: Phase,
    student_name: String,
    started_at: Option<Instant>,
    /// Elapsed seconds fixed when submission first begins; retries reuse it.
    time_taken: Option<u64>,
    last_error: Option<String>,
    result: Option<TestResult>,
}

impl TestSession {
    pub fn new(test: Test) -> Self {
        let remaining = test.time_limit_secs();
        Self {
            test,
            answers: AnswerMap::new(),
            current: 0,
            remaining,
            phase: Phase::NotStarted,
            student_name: String::new(),
            started_at: None,
            time_taken: None,
            last_error: None,
            result: None,
        }
    }

    /// Confirms the display name and starts the attempt at `now`.
    pub fn start(&mut self, student_name: &str, now: Instant) -> Result<(), ClientError> {
        if self.phase != Phase::NotStarted {
            return Err(ClientError::InvalidState("attempt already started".to_string()));
        }

        let name = student_name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation("Please enter your name".to_string()));
        }
        if name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
            return Err(ClientError::Validation(format!(
                "Name must be at most {} characters",
                MAX_DISPLAY_NAME_LENGTH
            )));
        }
        if self.test.questions.is_empty() {
            return Err(ClientError::InvalidState("this test has no questions".to_string()));
        }

        self.student_name = name.to_string();
        self.started_at = Some(now);
        self.phase = Phase::Running;
        Ok(())
    }

    /// Records `label` for `question_id`, replacing any earlier choice.
    /// Ignored unless running, or when the question or option does not exist.
    pub fn select_answer(&mut self, question_id: i64, label: OptionLabel) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        match self.test.question(question_id) {
            Some(q) if q.has_option(label) => {
                self.answers.insert(question_id, label);
                true
            }
            _ => false,
        }
    }

    /// Selects an answer for the question currently displayed.
    pub fn answer_current(&mut self, label: OptionLabel) -> bool {
        match self.current_question().map(|q| q.id) {
            Some(id) => self.select_answer(id, label),
            None => false,
        }
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        if self.phase != Phase::Running || index >= self.test.questions.len() {
            return false;
        }
        self.current = index;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Counting(self.remaining)
        }
    }

    /// Moves to `Submitting` and returns the request to send.
    ///
    /// Returns `None` while a request is in flight and after the attempt was
    /// scored, so at most one request is ever outstanding.
    pub fn begin_submit(&mut self, now: Instant) -> Option<SubmitAttemptRequest> {
        match self.phase {
            Phase::Running | Phase::Submitting { failed: true } => {}
            Phase::NotStarted | Phase::Submitting { failed: false } | Phase::Submitted => {
                return None;
            }
        }

        let time_taken = *self.time_taken.get_or_insert_with(|| {
            self.started_at
                .map(|start| now.saturating_duration_since(start).as_secs())
                .unwrap_or(0)
        });

        self.phase = Phase::Submitting { failed: false };
        self.last_error = None;

        Some(SubmitAttemptRequest {
            student_name: self.student_name.clone(),
            answers: self.answers.clone(),
            time_taken,
        })
    }

    /// Stores the scored result. Late or duplicate responses are ignored.
    pub fn complete_submit(&mut self, result: TestResult) -> bool {
        if self.phase != (Phase::Submitting { failed: false }) {
            tracing::debug!("Ignoring submission response in phase {:?}", self.phase);
            return false;
        }
        self.phase = Phase::Submitted;
        self.result = Some(result);
        true
    }

    /// Marks the outstanding request as failed so `submit()` can be retried.
    pub fn fail_submit(&mut self, message: impl Into<String>) {
        if self.phase == (Phase::Submitting { failed: false }) {
            self.phase = Phase::Submitting { failed: true };
            self.last_error = Some(message.into());
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn test(&self) -> &Test {
        &self.test
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn answer_for(&self, question_id: i64) -> Option<OptionLabel> {
        self.answers.get(&question_id).copied()
    }

    pub fn is_answered(&self, question_id: i64) -> bool {
        self.answers.contains_key(&question_id)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.test.questions.get(self.current)
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    /// Running with no time left, e.g. a test without a time limit.
    pub fn is_expired(&self) -> bool {
        self.phase == Phase::Running && self.remaining == 0
    }

    pub fn is_low_on_time(&self) -> bool {
        self.remaining < TIME_WARNING_SECONDS
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn result(&self) -> Option<&TestResult> {
        self.result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            phase: self.phase,
            current_index: self.current,
            remaining_secs: self.remaining,
            answered: self.answers.len(),
            total: self.test.questions.len(),
            last_error: self.last_error.clone(),
            result: self.result.clone(),
        }
    }
}
