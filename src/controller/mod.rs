// src/controller/mod.rs

pub mod session;

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, interval_at},
};

pub use session::{Phase, SessionStatus, TestSession, TickOutcome};

use crate::{
    error::ClientError,
    identity::IdentityProvider,
    models::{
        question::OptionLabel,
        result::{SubmitAttemptRequest, TestResult},
        test::Test,
    },
};

/// External collaborator that scores a submitted attempt.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn submit_attempt(
        &self,
        test_id: i64,
        attempt: &SubmitAttemptRequest,
    ) -> Result<TestResult, ClientError>;
}

/// Result of a `submit()` call that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Scored(TestResult),
    /// Another submission is in flight or already finished; nothing was sent.
    Skipped,
}

struct Shared {
    session: Mutex<TestSession>,
    scorer: Arc<dyn Scorer>,
    status: watch::Sender<SessionStatus>,
}

impl Shared {
    /// Runs `f` on the session and publishes the resulting status.
    /// The lock is never held across an await point.
    fn update<R>(&self, f: impl FnOnce(&mut TestSession) -> R) -> R {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let out = f(&mut session);
        self.status.send_replace(session.status());
        out
    }

    fn tick(&self) -> TickOutcome {
        self.update(|s| s.tick())
    }

    fn is_expired(&self) -> bool {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_expired()
    }

    async fn submit(&self) -> Result<SubmitOutcome, ClientError> {
        let begun = self.update(|s| s.begin_submit(Instant::now()).map(|req| (s.test().id, req)));

        let Some((test_id, request)) = begun else {
            tracing::debug!("Submission already in progress or finished");
            return Ok(SubmitOutcome::Skipped);
        };

        tracing::info!(
            "Submitting test {} for {} ({} answers, {}s)",
            test_id,
            request.student_name,
            request.answers.len(),
            request.time_taken
        );

        match self.scorer.submit_attempt(test_id, &request).await {
            Ok(result) => {
                if self.update(|s| s.complete_submit(result.clone())) {
                    tracing::info!(
                        "Test {} scored {}/{} ({:.2}%)",
                        test_id,
                        result.score,
                        result.total_questions,
                        result.percentage
                    );
                    Ok(SubmitOutcome::Scored(result))
                } else {
                    Ok(SubmitOutcome::Skipped)
                }
            }
            Err(e) => {
                tracing::warn!("Submission of test {} failed: {}", test_id, e);
                self.update(|s| s.fail_submit(e.message()));
                Err(e)
            }
        }
    }
}

/// Drives one test attempt from the name prompt to a scored result.
///
/// The countdown runs as a background task that is aborted as soon as the
/// attempt leaves `Running` or the controller is dropped. The timer and
/// explicit `submit()` calls share one guard, so a finish click that races the
/// last tick still sends a single request.
pub struct TestSessionController {
    shared: Arc<Shared>,
    countdown: Mutex<Option<JoinHandle<()>>>,
    tick_period: Option<Duration>,
    account_name: Option<String>,
}

impl TestSessionController {
    pub fn new(test: Test, scorer: Arc<dyn Scorer>, identity: &dyn IdentityProvider) -> Self {
        let session = TestSession::new(test);
        let (status, _) = watch::channel(session.status());

        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                scorer,
                status,
            }),
            countdown: Mutex::new(None),
            tick_period: Some(Duration::from_secs(1)),
            account_name: identity.current_user().map(|u| u.username),
        }
    }

    /// Disables the internal countdown; the host calls [`tick`](Self::tick) itself.
    pub fn with_manual_ticks(mut self) -> Self {
        self.tick_period = None;
        self
    }

    /// Name from the signed-in account. When present it cannot be changed.
    pub fn account_name(&self) -> Option<&str> {
        self.account_name.as_deref()
    }

    /// Confirms the display name and starts the countdown.
    ///
    /// The countdown is a Tokio task, so this must be called from within a
    /// runtime unless [`with_manual_ticks`](Self::with_manual_ticks) was used.
    /// Outside one it fails with `InvalidState` and the attempt stays unstarted.
    /// A test with no time on the clock is submitted right away.
    pub fn start(&self, student_name: &str) -> Result<(), ClientError> {
        if self.tick_period.is_some() && tokio::runtime::Handle::try_current().is_err() {
            return Err(ClientError::InvalidState(
                "countdown requires a Tokio runtime".to_string(),
            ));
        }

        let name = self.account_name.as_deref().unwrap_or(student_name);
        self.shared.update(|s| s.start(name, Instant::now()))?;

        if let Some(period) = self.tick_period {
            let handle = spawn_countdown(self.shared.clone(), period);
            *self.countdown.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        }

        let (test_id, remaining) = self.view(|s| (s.test().id, s.remaining_secs()));
        tracing::info!("Started test {} with {}s on the clock", test_id, remaining);
        Ok(())
    }

    pub fn select_answer(&self, question_id: i64, label: OptionLabel) -> bool {
        self.shared.update(|s| s.select_answer(question_id, label))
    }

    pub fn answer_current(&self, label: OptionLabel) -> bool {
        self.shared.update(|s| s.answer_current(label))
    }

    pub fn go_to(&self, index: usize) -> bool {
        self.shared.update(|s| s.go_to(index))
    }

    pub fn next(&self) -> bool {
        self.shared.update(|s| s.next())
    }

    pub fn previous(&self) -> bool {
        self.shared.update(|s| s.previous())
    }

    /// One second elapsed. On expiry the attempt is submitted before returning.
    pub async fn tick(&self) -> Result<TickOutcome, ClientError> {
        let outcome = self.shared.tick();
        if outcome == TickOutcome::Expired {
            self.cancel_countdown();
            self.shared.submit().await?;
        }
        Ok(outcome)
    }

    /// Finishes the attempt. A no-op while a submission is pending or done.
    pub async fn submit(&self) -> Result<SubmitOutcome, ClientError> {
        self.cancel_countdown();
        self.shared.submit().await
    }

    pub fn status(&self) -> SessionStatus {
        self.shared.status.borrow().clone()
    }

    /// Receiver that sees every change, including timer-driven ones.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.shared.status.subscribe()
    }

    /// Read-only access to the session for rendering.
    pub fn view<R>(&self, f: impl FnOnce(&TestSession) -> R) -> R {
        let session = self
            .shared
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    fn cancel_countdown(&self) {
        let handle = self
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

impl Drop for TestSessionController {
    fn drop(&mut self) {
        self.cancel_countdown();
    }
}

/// Ticks once per `period` until the attempt stops running.
/// On expiry the submission is spawned separately so that aborting the
/// countdown can never cut a request short.
fn spawn_countdown(shared: Arc<Shared>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        if !shared.is_expired() {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                match shared.tick() {
                    TickOutcome::Counting(_) => continue,
                    TickOutcome::Ignored => return,
                    TickOutcome::Expired => break,
                }
            }
        }

        tracing::info!("Time is up, submitting automatically");
        tokio::spawn(async move {
            if let Err(e) = shared.submit().await {
                tracing::error!("Automatic submission failed: {}", e);
            }
        });
    })
}
