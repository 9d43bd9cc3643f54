//! Mock quiz service for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use quizflow_core::error::ServiceError;
use quizflow_core::grading::GradingResponse;
use quizflow_core::model::{AttemptMetadata, Quiz, QuizId};
use quizflow_core::selection::SubmittedAnswer;
use quizflow_core::traits::{
    Credential, QuizSource, SubmissionClient, SubmissionPayload,
};

/// A mock quiz API for exercising attempts without a server.
///
/// Serves one quiz, answers submissions with a fixed grading response, and
/// can be scripted to fail the next submissions.
pub struct MockQuizService {
    /// Quiz served by `load_quiz`. `None` answers every load with not found.
    quiz: Option<Quiz>,
    /// Grading returned for successful submissions.
    grading: GradingResponse,
    /// Failures returned, in order, by the next submissions.
    failures: Mutex<VecDeque<ServiceError>>,
    /// Token required by both operations, if any.
    required_token: Option<String>,
    load_count: AtomicU32,
    submit_count: AtomicU32,
    last_submission: Mutex<Option<SubmissionPayload>>,
}

impl MockQuizService {
    /// Serve `quiz` and accept submissions without grading data.
    pub fn new(quiz: Quiz) -> Self {
        Self::build(Some(quiz))
    }

    /// A service that knows no quiz.
    pub fn unavailable() -> Self {
        Self::build(None)
    }

    fn build(quiz: Option<Quiz>) -> Self {
        Self {
            quiz,
            grading: GradingResponse::Empty,
            failures: Mutex::new(VecDeque::new()),
            required_token: None,
            load_count: AtomicU32::new(0),
            submit_count: AtomicU32::new(0),
            last_submission: Mutex::new(None),
        }
    }

    /// Answer successful submissions with `grading`.
    pub fn with_grading(mut self, grading: GradingResponse) -> Self {
        self.grading = grading;
        self
    }

    /// Reject credentials other than `token`.
    pub fn with_required_token(mut self, token: impl Into<String>) -> Self {
        self.required_token = Some(token.into());
        self
    }

    /// Fail the next submission with `error`. Calls queue up.
    pub fn fail_next_submit(self, error: ServiceError) -> Self {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(error);
        self
    }

    pub fn load_count(&self) -> u32 {
        self.load_count.load(Ordering::Relaxed)
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count.load(Ordering::Relaxed)
    }

    /// The payload of the last submission received, including failed ones.
    pub fn last_submission(&self) -> Option<SubmissionPayload> {
        self.last_submission
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_credential(&self, credential: &Credential) -> Result<(), ServiceError> {
        match &self.required_token {
            Some(token) if token != credential.token() => {
                Err(ServiceError::Unauthorized("invalid token".into()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl QuizSource for MockQuizService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn load_quiz(
        &self,
        quiz_id: QuizId,
        credential: &Credential,
    ) -> Result<Quiz, ServiceError> {
        self.load_count.fetch_add(1, Ordering::Relaxed);
        self.check_credential(credential)?;

        match &self.quiz {
            Some(quiz) if quiz.id == quiz_id => Ok(quiz.clone()),
            _ => Err(ServiceError::NotFound(format!("quiz {quiz_id}"))),
        }
    }
}

#[async_trait]
impl SubmissionClient for MockQuizService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn submit(
        &self,
        metadata: &AttemptMetadata,
        answers: &[SubmittedAnswer],
        credential: &Credential,
    ) -> Result<GradingResponse, ServiceError> {
        self.submit_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_submission
            .lock()
            .unwrap_or_else(PoisonError::into_inner) =
            Some(SubmissionPayload::new(metadata, answers.to_vec()));
        self.check_credential(credential)?;

        let failure = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(self.grading.clone()),
        }
    }
}
