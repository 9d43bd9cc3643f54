//! Collaborator traits for loading quizzes and submitting attempts.
//!
//! These async traits are implemented by the `quizflow-client` crate. The
//! bearer credential is passed in explicitly so the attempt flow never
//! reaches for session state.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::grading::GradingResponse;
use crate::model::{AttemptMetadata, Quiz, QuizId};
use crate::selection::SubmittedAnswer;

/// Opaque bearer credential for the quiz API.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// No credential, for sources that do not need one.
    pub fn anonymous() -> Self {
        Self(String::new())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            f.write_str("Credential(anonymous)")
        } else {
            f.write_str("Credential(***)")
        }
    }
}

// ---------------------------------------------------------------------------
// Question source
// ---------------------------------------------------------------------------

/// Where quizzes and their question sets come from.
#[async_trait]
pub trait QuizSource: Send + Sync {
    /// Human-readable source name (e.g. "http").
    fn name(&self) -> &str;

    /// Load a quiz with its ordered question set.
    async fn load_quiz(&self, quiz_id: QuizId, credential: &Credential)
        -> Result<Quiz, ServiceError>;
}

// ---------------------------------------------------------------------------
// Submission client
// ---------------------------------------------------------------------------

/// Body of a submission: participant display name plus the ordered answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub first_name: String,
    pub last_name: String,
    pub answers: Vec<SubmittedAnswer>,
}

impl SubmissionPayload {
    pub fn new(metadata: &AttemptMetadata, answers: Vec<SubmittedAnswer>) -> Self {
        Self {
            first_name: metadata.first_name.clone(),
            last_name: metadata.last_name.clone(),
            answers,
        }
    }
}

/// Sends a completed answer set to the grading authority.
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    /// Human-readable client name (e.g. "http").
    fn name(&self) -> &str;

    /// Submit the answers of a completed attempt.
    async fn submit(
        &self,
        metadata: &AttemptMetadata,
        answers: &[SubmittedAnswer],
        credential: &Credential,
    ) -> Result<GradingResponse, ServiceError>;
}
