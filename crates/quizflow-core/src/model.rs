//! Core data model types for quizflow.
//!
//! These are the types that describe a quiz as the participant sees it:
//! questions, their answer options, and the metadata attached to an attempt.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Identity of a quiz.
    QuizId
);
id_type!(
    /// Identity of a question within a quiz.
    QuestionId
);
id_type!(
    /// Identity of an answer option within a question.
    OptionId
);

/// How many options a participant picks for a question.
///
/// Decided once when the question set is loaded; never inferred from the
/// shape of stored answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectArity {
    #[default]
    Single,
    Multi,
}

impl SelectArity {
    /// Arity from the `multiple` flag used by the quiz API and TOML files.
    pub fn from_multiple(multiple: bool) -> Self {
        if multiple {
            SelectArity::Multi
        } else {
            SelectArity::Single
        }
    }
}

impl fmt::Display for SelectArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectArity::Single => write!(f, "single"),
            SelectArity::Multi => write!(f, "multi"),
        }
    }
}

impl FromStr for SelectArity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "one" => Ok(SelectArity::Single),
            "multi" | "multiple" | "many" => Ok(SelectArity::Multi),
            other => Err(format!("unknown select arity: {other}")),
        }
    }
}

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    /// Display text.
    pub text: String,
    /// Ordinal position within the question.
    pub position: u32,
    /// Locally known correctness. `None` when the grading authority
    /// withholds it before submission.
    #[serde(default)]
    pub is_correct: Option<bool>,
}

/// A single question of a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    /// Ordinal position within the quiz.
    pub position: u32,
    /// Display text.
    pub text: String,
    #[serde(default)]
    pub arity: SelectArity,
    /// Answer options, ordered by position.
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Look up one of this question's options.
    pub fn option(&self, id: OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Whether `id` names one of this question's options.
    pub fn has_option(&self, id: OptionId) -> bool {
        self.option(id).is_some()
    }

    /// Options whose local flag marks them correct, in position order.
    pub fn known_correct_options(&self) -> impl Iterator<Item = &AnswerOption> {
        self.options.iter().filter(|o| o.is_correct == Some(true))
    }

    pub fn is_multi(&self) -> bool {
        self.arity == SelectArity::Multi
    }

    fn sort_options(&mut self) {
        self.options.sort_by_key(|o| (o.position, o.id));
    }
}

/// A quiz with its ordered question set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Build a quiz, ordering questions and their options by position.
    pub fn new(id: QuizId, title: impl Into<String>, mut questions: Vec<Question>) -> Self {
        for question in &mut questions {
            question.sort_options();
        }
        questions.sort_by_key(|q| (q.position, q.id));
        Self {
            id,
            title: title.into(),
            description: String::new(),
            questions,
        }
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// The participant's display name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Participant {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// Who is taking the quiz and which quiz it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptMetadata {
    pub quiz_id: QuizId,
    #[serde(default)]
    pub quiz_title: String,
    pub first_name: String,
    pub last_name: String,
}

impl AttemptMetadata {
    pub fn new(quiz: &Quiz, participant: &Participant) -> Self {
        Self {
            quiz_id: quiz.id,
            quiz_title: quiz.title.clone(),
            first_name: participant.first_name.clone(),
            last_name: participant.last_name.clone(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_display_and_parse() {
        assert_eq!(SelectArity::Single.to_string(), "single");
        assert_eq!(SelectArity::Multi.to_string(), "multi");
        assert_eq!("multiple".parse::<SelectArity>().unwrap(), SelectArity::Multi);
        assert_eq!("Single".parse::<SelectArity>().unwrap(), SelectArity::Single);
        assert!("several".parse::<SelectArity>().is_err());
        assert_eq!(SelectArity::from_multiple(true), SelectArity::Multi);
    }

    #[test]
    fn quiz_new_orders_by_position() {
        let mut q2 = fixtures::single(2);
        q2.position = 1;
        q2.options.reverse();
        let mut q1 = fixtures::single(1);
        q1.position = 2;

        let quiz = Quiz::new(QuizId(1), "Ordering", vec![q1, q2]);
        assert_eq!(quiz.questions[0].id, QuestionId(2));
        assert_eq!(quiz.questions[1].id, QuestionId(1));
        let positions: Vec<u32> = quiz.questions[0].options.iter().map(|o| o.position).collect();
        assert_eq!(positions, vec![21, 22, 23]);
    }

    #[test]
    fn known_correct_options_skip_withheld_flags() {
        let q = fixtures::question(
            1,
            SelectArity::Multi,
            vec![
                fixtures::option(1, "a", Some(true)),
                fixtures::option(2, "b", None),
                fixtures::option(3, "c", Some(true)),
            ],
        );
        let ids: Vec<OptionId> = q.known_correct_options().map(|o| o.id).collect();
        assert_eq!(ids, vec![OptionId(1), OptionId(3)]);
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&QuestionId(42)).unwrap();
        assert_eq!(json, "42");
        let id: OptionId = serde_json::from_str("7").unwrap();
        assert_eq!(id, OptionId(7));
    }

    #[test]
    fn display_name_trims_missing_parts() {
        let meta = AttemptMetadata {
            quiz_id: QuizId(1),
            quiz_title: String::new(),
            first_name: "Ada".into(),
            last_name: String::new(),
        };
        assert_eq!(meta.display_name(), "Ada");
    }
}
