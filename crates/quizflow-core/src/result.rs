//! The reconciled, display-ready result of an attempt.
//!
//! This is the only shape handed to presentation code.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::QuestionId;

/// An answer as displayed: its text and, when known, whether it is correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerText {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

/// Per-question outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerDetail {
    pub question_id: QuestionId,
    pub question_text: String,
    /// What the participant answered.
    pub your_answers: Vec<AnswerText>,
    pub correct_answers: Vec<AnswerText>,
    pub is_correct: bool,
}

/// Where the per-question details came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailSource {
    /// Grading records supplied by the authority.
    Authority,
    /// Recomputed from locally known correctness.
    Local,
    /// Authority records for some questions, local recomputation for the
    /// questions it did not grade.
    Mixed,
}

impl DetailSource {
    pub fn describe(self) -> &'static str {
        match self {
            DetailSource::Authority => "graded by the server",
            DetailSource::Local => "scored locally",
            DetailSource::Mixed => "partly graded by the server, the rest scored locally",
        }
    }
}

/// Aggregate score plus per-question breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledResult {
    /// Number of correctly answered questions.
    pub score: u32,
    pub total_questions: u32,
    pub percentage: f64,
    /// Ordered by question position.
    pub details: Vec<AnswerDetail>,
    pub detail_source: DetailSource,
}

/// `score / total * 100`, or `0` for an empty quiz.
pub fn percentage(score: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(score) / f64::from(total) * 100.0
    }
}

impl ReconciledResult {
    /// Number of details marked correct. Differs from `score` when the
    /// authority's aggregate disagrees with its records or details were omitted.
    pub fn correct_details(&self) -> usize {
        self.details.iter().filter(|d| d.is_correct).count()
    }

    pub fn incorrect_details(&self) -> impl Iterator<Item = &AnswerDetail> {
        self.details.iter().filter(|d| !d.is_correct)
    }

    /// Save the result as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize result")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read result from {}", path.display()))?;
        let result: ReconciledResult =
            serde_json::from_str(&content).context("failed to parse result JSON")?;
        Ok(result)
    }
}
