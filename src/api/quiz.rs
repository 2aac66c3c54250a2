// src/api/quiz.rs

use async_trait::async_trait;
use reqwest::Method;
use validator::Validate;

use crate::{
    api::ApiClient,
    controller::Scorer,
    error::ClientError,
    models::{
        question::{NewQuestion, Question},
        result::{SubmitAttemptRequest, TestResult},
        test::{CreateTestRequest, Test},
    },
};

impl ApiClient {
    /// Lists the active tests (without questions).
    pub async fn list_tests(&self) -> Result<Vec<Test>, ClientError> {
        self.get("/tests/").await
    }

    /// Fetches a test with its questions in display order.
    pub async fn get_test(&self, id: i64) -> Result<Test, ClientError> {
        let mut test: Test = self.get(&format!("/tests/{}", id)).await?;
        test.sort_questions();
        tracing::debug!(
            "Loaded test {} ({} questions, {} min)",
            test.id,
            test.question_count(),
            test.time_limit
        );
        Ok(test)
    }

    /// Sends an attempt for scoring.
    pub async fn submit_attempt(
        &self,
        test_id: i64,
        attempt: &SubmitAttemptRequest,
    ) -> Result<TestResult, ClientError> {
        self.post(&format!("/tests/{}/submit", test_id), attempt)
            .await
    }

    /// Creates a test and then adds each of `req.questions` to it.
    ///
    /// Question orders are renumbered from 1 in list order. A failure while
    /// adding questions is returned after the test itself already exists.
    pub async fn create_test(&self, req: &CreateTestRequest) -> Result<Test, ClientError> {
        req.validate()?;

        let test: Test = self.post("/tests", req).await?;
        tracing::info!("Created test {} '{}'", test.id, test.title);

        for (index, question) in req.questions.iter().enumerate() {
            let mut question = question.clone();
            question.order = index as i64 + 1;
            self.add_question(test.id, &question).await?;
        }

        Ok(test)
    }

    pub async fn add_question(&self, test_id: i64, question: &NewQuestion) -> Result<Question, ClientError> {
        question.validate()?;
        self.post(&format!("/admin/questions/{}", test_id), question)
            .await
    }

    pub async fn delete_question(&self, question_id: i64) -> Result<(), ClientError> {
        self.command(Method::DELETE, &format!("/admin/questions/{}", question_id))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Scorer for ApiClient {
    async fn submit_attempt(
        &self,
        test_id: i64,
        attempt: &SubmitAttemptRequest,
    ) -> Result<TestResult, ClientError> {
        ApiClient::submit_attempt(self, test_id, attempt).await
    }
}
