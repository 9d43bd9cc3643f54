//! Offline collaborators backed by local quiz files.
//!
//! [`FileQuizSource`] serves quizzes from TOML files and [`OfflineGrader`]
//! accepts every submission without grading it, so results are recomputed
//! from the locally known correct answers.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use quizflow_core::error::ServiceError;
use quizflow_core::grading::GradingResponse;
use quizflow_core::model::{AttemptMetadata, Quiz, QuizId};
use quizflow_core::parser::load_quizzes;
use quizflow_core::selection::SubmittedAnswer;
use quizflow_core::traits::{Credential, QuizSource, SubmissionClient};

/// Loads quizzes from a TOML file or a directory of them.
pub struct FileQuizSource {
    path: PathBuf,
}

impl FileQuizSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuizSource for FileQuizSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn load_quiz(
        &self,
        quiz_id: QuizId,
        _credential: &Credential,
    ) -> Result<Quiz, ServiceError> {
        let path = self.path.clone();
        let quizzes = tokio::task::spawn_blocking(move || load_quizzes(&path))
            .await
            .map_err(|e| ServiceError::Source(e.to_string()))?
            .map_err(|e| ServiceError::Source(format!("{e:#}")))?;

        quizzes
            .into_iter()
            .find(|q| q.id == quiz_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("quiz {quiz_id} in {}", self.path.display()))
            })
    }
}

/// Accepts submissions without grading them.
#[derive(Debug, Default)]
pub struct OfflineGrader;

#[async_trait]
impl SubmissionClient for OfflineGrader {
    fn name(&self) -> &str {
        "offline"
    }

    async fn submit(
        &self,
        metadata: &AttemptMetadata,
        answers: &[SubmittedAnswer],
        _credential: &Credential,
    ) -> Result<GradingResponse, ServiceError> {
        tracing::info!(
            quiz = %metadata.quiz_id,
            answers = answers.len(),
            "offline submission, grading locally"
        );
        Ok(GradingResponse::Empty)
    }
}
