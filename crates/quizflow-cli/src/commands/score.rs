//! The `quizflow score` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use quizflow_core::grading::GradingResponse;
use quizflow_core::model::{AttemptMetadata, Participant};
use quizflow_core::parser::parse_quiz;
use quizflow_core::reconcile::reconcile;
use quizflow_core::selection::{SelectionStore, SubmittedAnswer};
use quizflow_core::traits::SubmissionPayload;
use quizflow_report::ReportHeader;

use super::output::{emit_report, ensure_report_format};

/// A saved answer file: either the bare answer list or a full submission.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswerFile {
    Submission(SubmissionPayload),
    Answers(Vec<SubmittedAnswer>),
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what}: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {what}: {}", path.display()))
}

pub fn execute(
    quiz_path: PathBuf,
    answers_path: PathBuf,
    grading_path: Option<PathBuf>,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    ensure_report_format(&format)?;

    let quiz = parse_quiz(&quiz_path)?;

    let (participant, answers) = match read_json::<AnswerFile>(&answers_path, "answers")? {
        AnswerFile::Submission(payload) => (
            Participant::new(payload.first_name, payload.last_name),
            payload.answers,
        ),
        AnswerFile::Answers(answers) => (Participant::default(), answers),
    };

    let grading = grading_path
        .as_deref()
        .map(|path| read_json::<GradingResponse>(path, "grading response"))
        .transpose()?;

    let selections = SelectionStore::from_entries(&quiz.questions, &answers);
    let unanswered = selections.unanswered();
    if !unanswered.is_empty() {
        tracing::warn!("{} question(s) have no answer", unanswered.len());
    }

    let result = reconcile(&quiz.questions, &selections, grading.as_ref());
    let header = ReportHeader::new(&AttemptMetadata::new(&quiz, &participant));

    emit_report(&format, &header, &result, output.as_deref())
}
