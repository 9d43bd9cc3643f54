//! Grading data returned by the grading authority.
//!
//! The authority may answer with per-question records, with aggregate numbers
//! only, or with nothing at all. The wire form carries all of these as
//! optional fields; it is classified into [`GradingResponse`] once, on
//! receipt, so the reconciler dispatches on an explicit variant.

use serde::{Deserialize, Serialize};

use crate::model::{OptionId, QuestionId};

/// An option as reported in a grading record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedOption {
    pub id: OptionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

/// The authority's verdict for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingRecord {
    pub question_id: QuestionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    /// Options the participant chose.
    #[serde(default)]
    pub chosen: Vec<GradedOption>,
    /// Correct options. Empty when the authority did not disclose them.
    #[serde(default)]
    pub correct: Vec<GradedOption>,
    pub is_correct: bool,
}

/// Aggregate numbers, each of which the authority may omit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateScore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl AggregateScore {
    pub fn is_empty(&self) -> bool {
        self.score.is_none() && self.total_questions.is_none() && self.percentage.is_none()
    }
}

/// What the grading authority returned for a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GradingPayload", into = "GradingPayload")]
pub enum GradingResponse {
    /// Per-question records, possibly with aggregate numbers.
    Full {
        aggregate: AggregateScore,
        records: Vec<GradingRecord>,
    },
    /// Aggregate numbers without per-question detail.
    AggregateOnly(AggregateScore),
    /// A successful response without any grading data.
    Empty,
}

impl GradingResponse {
    /// Classify optional wire fields into a variant.
    pub fn classify(aggregate: AggregateScore, records: Vec<GradingRecord>) -> Self {
        if !records.is_empty() {
            GradingResponse::Full { aggregate, records }
        } else if !aggregate.is_empty() {
            GradingResponse::AggregateOnly(aggregate)
        } else {
            GradingResponse::Empty
        }
    }

    pub fn aggregate(&self) -> Option<&AggregateScore> {
        match self {
            GradingResponse::Full { aggregate, .. } => Some(aggregate),
            GradingResponse::AggregateOnly(aggregate) => Some(aggregate),
            GradingResponse::Empty => None,
        }
    }

    pub fn records(&self) -> &[GradingRecord] {
        match self {
            GradingResponse::Full { records, .. } => records,
            _ => &[],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GradingResponse::Full { .. } => "full",
            GradingResponse::AggregateOnly(_) => "aggregate-only",
            GradingResponse::Empty => "empty",
        }
    }
}

/// Wire shape of a grading response: every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingPayload {
    #[serde(flatten)]
    pub aggregate: AggregateScore,
    #[serde(default, alias = "answers", skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<GradingRecord>>,
}

impl From<GradingPayload> for GradingResponse {
    fn from(payload: GradingPayload) -> Self {
        GradingResponse::classify(payload.aggregate, payload.details.unwrap_or_default())
    }
}

impl From<GradingResponse> for GradingPayload {
    fn from(response: GradingResponse) -> Self {
        match response {
            GradingResponse::Full { aggregate, records } => GradingPayload {
                aggregate,
                details: Some(records),
            },
            GradingResponse::AggregateOnly(aggregate) => GradingPayload {
                aggregate,
                details: None,
            },
            GradingResponse::Empty => GradingPayload::default(),
        }
    }
}
