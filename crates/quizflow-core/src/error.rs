//! Error types for the attempt flow.
//!
//! `ServiceError` represents failures of the external collaborators (question
//! loading and submission). It is defined here, not in `quizflow-client`, so
//! the attempt flow can classify errors for retry decisions without string
//! matching.

use thiserror::Error;

use crate::model::QuestionId;

/// Errors raised by a question source or submission client.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The credential was rejected (HTTP 401/403).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The requested quiz does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// A local source (file, fixture) could not provide the data.
    #[error("{0}")]
    Source(String),
}

impl ServiceError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ServiceError::Unauthorized(_) | ServiceError::NotFound(_) | ServiceError::Decode(_)
        )
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ServiceError::Unauthorized(_))
    }
}

/// Errors from the navigation controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The question set is empty; there is nothing to navigate.
    #[error("quiz has no questions")]
    NoContent,

    /// The finishing action was refused because some questions are unanswered.
    #[error("{} question(s) still unanswered", unanswered.len())]
    Incomplete { unanswered: Vec<QuestionId> },

    /// The finishing action was invoked before reaching the last question.
    #[error("finish is only available on the last question (at {position} of {total})")]
    NotOnLastQuestion { position: usize, total: usize },

    /// The attempt has already been completed.
    #[error("attempt already completed")]
    AlreadyCompleted,
}

/// Errors from the attempt lifecycle.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The question set could not be loaded; no attempt exists.
    #[error("failed to load quiz: {0}")]
    Load(#[source] ServiceError),

    /// The loaded quiz has no questions.
    #[error("quiz has no questions")]
    NoContent,

    /// Submission was requested before the finishing action succeeded.
    #[error("attempt is not complete, finish it before submitting")]
    NotCompleted,

    /// The grading authority could not be reached or rejected the submission.
    /// The attempt keeps its selections and can be submitted again.
    #[error("submission failed: {0}")]
    Submission(#[source] ServiceError),

    /// The attempt was already submitted.
    #[error("attempt already submitted")]
    AlreadySubmitted,
}

impl AttemptError {
    /// Whether re-issuing the same submission may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AttemptError::Submission(e) => !e.is_permanent(),
            _ => false,
        }
    }

    /// Whether the caller should leave the attempt flow entirely.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AttemptError::Load(_) | AttemptError::NoContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_errors() {
        assert!(ServiceError::Unauthorized("bad token".into()).is_permanent());
        assert!(ServiceError::NotFound("quiz 9".into()).is_permanent());
        assert!(!ServiceError::Timeout(30).is_permanent());
        assert!(!ServiceError::Network("reset".into()).is_permanent());
        assert!(!ServiceError::Api {
            status: 502,
            message: "bad gateway".into()
        }
        .is_permanent());
    }

    #[test]
    fn attempt_error_classification() {
        assert!(AttemptError::Submission(ServiceError::Timeout(5)).is_retryable());
        assert!(!AttemptError::Submission(ServiceError::Unauthorized("x".into())).is_retryable());
        assert!(AttemptError::Load(ServiceError::NotFound("1".into())).is_fatal());
        assert!(AttemptError::NoContent.is_fatal());
        assert!(!AttemptError::AlreadySubmitted.is_fatal());
    }

    #[test]
    fn incomplete_message_counts_questions() {
        let err = NavigationError::Incomplete {
            unanswered: vec![QuestionId(2), QuestionId(4)],
        };
        assert_eq!(err.to_string(), "2 question(s) still unanswered");
    }
}
