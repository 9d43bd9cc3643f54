//! quizflow-report: Presentation of reconciled attempt results.

use chrono::{DateTime, Utc};

use quizflow_core::model::AttemptMetadata;

pub mod html;
pub mod text;

/// What a report is about, shown above the results.
#[derive(Debug, Clone)]
pub struct ReportHeader {
    pub quiz_title: String,
    pub participant: String,
    pub generated_at: DateTime<Utc>,
}

impl ReportHeader {
    pub fn new(metadata: &AttemptMetadata) -> Self {
        Self {
            quiz_title: metadata.quiz_title.clone(),
            participant: metadata.display_name(),
            generated_at: Utc::now(),
        }
    }

    /// A header for a result re-rendered without its attempt.
    pub fn titled(quiz_title: impl Into<String>) -> Self {
        Self {
            quiz_title: quiz_title.into(),
            participant: String::new(),
            generated_at: Utc::now(),
        }
    }
}
