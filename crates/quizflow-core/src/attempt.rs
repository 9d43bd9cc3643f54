//! Attempt lifecycle.
//!
//! An [`Attempt`] is created once the quiz and its question set have loaded,
//! is driven through its [`NavigationController`], submitted exactly once,
//! and caches its reconciled result. Dropping an attempt before it is
//! submitted discards it; nothing is sent.

use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AttemptError;
use crate::model::{AttemptMetadata, Participant, Quiz, QuizId};
use crate::navigation::NavigationController;
use crate::reconcile::reconcile;
use crate::result::ReconciledResult;
use crate::traits::{Credential, QuizSource, SubmissionClient};

/// Terminal state of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    InProgress,
    Submitted,
}

/// How often a failed submission is re-issued automatically.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first failed submission.
    pub max_retries: u32,
    /// Delay before the first retry; doubles after each failure.
    pub retry_delay: Duration,
}

impl RetryPolicy {
    /// Submit once, never retry.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            retry_delay: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
        }
    }
}

const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// One participant's run through a quiz.
#[derive(Debug)]
pub struct Attempt {
    id: Uuid,
    metadata: AttemptMetadata,
    navigation: NavigationController,
    state: AttemptState,
    result: Option<ReconciledResult>,
    started_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
}

impl Attempt {
    /// Create an attempt for an already loaded quiz.
    pub fn new(quiz: Quiz, participant: &Participant) -> Result<Self, AttemptError> {
        let metadata = AttemptMetadata::new(&quiz, participant);
        let navigation = NavigationController::new(quiz.questions)
            .map_err(|_| AttemptError::NoContent)?;
        let id = Uuid::new_v4();
        tracing::info!(
            attempt = %id,
            quiz = %metadata.quiz_id,
            questions = navigation.questions().len(),
            "attempt started"
        );
        Ok(Self {
            id,
            metadata,
            navigation,
            state: AttemptState::InProgress,
            result: None,
            started_at: Utc::now(),
            submitted_at: None,
        })
    }

    /// Load a quiz from `source` and start an attempt on it.
    ///
    /// A load failure or an empty question set is fatal to the flow: no
    /// attempt is created and the caller should leave.
    pub async fn start(
        source: &dyn QuizSource,
        quiz_id: QuizId,
        credential: &Credential,
        participant: &Participant,
    ) -> Result<Self, AttemptError> {
        let quiz = source.load_quiz(quiz_id, credential).await.map_err(|e| {
            tracing::error!("failed to load quiz {quiz_id} from {}: {e}", source.name());
            AttemptError::Load(e)
        })?;
        Self::new(quiz, participant)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn metadata(&self) -> &AttemptMetadata {
        &self.metadata
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn is_submitted(&self) -> bool {
        self.state == AttemptState::Submitted
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    /// Mutable access for participant input; `None` once submitted.
    pub fn navigation_mut(&mut self) -> Option<&mut NavigationController> {
        match self.state {
            AttemptState::InProgress => Some(&mut self.navigation),
            AttemptState::Submitted => None,
        }
    }

    /// The reconciled result, once submitted.
    pub fn result(&self) -> Option<&ReconciledResult> {
        self.result.as_ref()
    }

    /// Submit the completed attempt and reconcile the grading response.
    ///
    /// On failure the attempt stays in progress with the same selections, so
    /// calling `submit` again re-issues the identical submission.
    pub async fn submit(
        &mut self,
        client: &dyn SubmissionClient,
        credential: &Credential,
    ) -> Result<ReconciledResult, AttemptError> {
        if self.is_submitted() {
            return Err(AttemptError::AlreadySubmitted);
        }
        if !self.navigation.is_completed() {
            return Err(AttemptError::NotCompleted);
        }

        let answers = self.navigation.selections().entries();
        tracing::info!(
            attempt = %self.id,
            quiz = %self.metadata.quiz_id,
            answers = answers.len(),
            client = client.name(),
            "submitting attempt"
        );

        let response = client
            .submit(&self.metadata, &answers, credential)
            .await
            .map_err(|e| {
                tracing::warn!(attempt = %self.id, "submission failed: {e}");
                AttemptError::Submission(e)
            })?;

        let result = reconcile(
            self.navigation.questions(),
            self.navigation.selections(),
            Some(&response),
        );
        tracing::info!(
            attempt = %self.id,
            grading = response.kind(),
            records = response.records().len(),
            source = ?result.detail_source,
            score = result.score,
            total = result.total_questions,
            "attempt submitted"
        );

        self.state = AttemptState::Submitted;
        self.submitted_at = Some(Utc::now());
        self.result = Some(result.clone());
        Ok(result)
    }

    /// Submit, retrying transient failures with exponential backoff.
    pub async fn submit_with_retry(
        &mut self,
        client: &dyn SubmissionClient,
        credential: &Credential,
        policy: &RetryPolicy,
    ) -> Result<ReconciledResult, AttemptError> {
        let mut retry_delay = policy.retry_delay;
        let mut retry = 0;
        loop {
            match self.submit(client, credential).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && retry < policy.max_retries => {
                    retry += 1;
                    tracing::info!(
                        attempt = %self.id,
                        "retrying submission ({retry}/{}) in {retry_delay:?}",
                        policy.max_retries
                    );
                    tokio::time::sleep(retry_delay).await;
                    retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Abandon the attempt without submitting.
    pub fn discard(self) {
        tracing::info!(
            attempt = %self.id,
            answered = self.navigation.selections().answered_count(),
            "attempt discarded"
        );
    }
}
