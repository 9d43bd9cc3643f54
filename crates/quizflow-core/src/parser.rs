//! TOML quiz parser.
//!
//! Loads quizzes from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{AnswerOption, OptionId, Question, QuestionId, Quiz, QuizId, SelectArity};

/// Intermediate TOML structure for parsing quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuizHeader {
    id: u64,
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u64,
    #[serde(default)]
    position: Option<u32>,
    text: String,
    #[serde(default)]
    multiple: bool,
    #[serde(default)]
    answers: Vec<TomlAnswer>,
}

#[derive(Debug, Deserialize)]
struct TomlAnswer {
    id: u64,
    #[serde(default)]
    position: Option<u32>,
    text: String,
    /// Omitted when correctness is withheld.
    #[serde(default)]
    correct: Option<bool>,
}

/// Parse a single TOML file into a `Quiz`.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a TOML string into a `Quiz` (useful for testing).
///
/// Missing positions default to the declaration order.
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(qi, q)| Question {
            id: QuestionId(q.id),
            position: q.position.unwrap_or(qi as u32 + 1),
            text: q.text,
            arity: SelectArity::from_multiple(q.multiple),
            options: q
                .answers
                .into_iter()
                .enumerate()
                .map(|(ai, a)| AnswerOption {
                    id: OptionId(a.id),
                    text: a.text,
                    position: a.position.unwrap_or(ai as u32 + 1),
                    is_correct: a.correct,
                })
                .collect(),
        })
        .collect();

    let mut quiz = Quiz::new(QuizId(parsed.quiz.id), parsed.quiz.title, questions);
    quiz.description = parsed.quiz.description;
    Ok(quiz)
}

/// Recursively load all `.toml` quiz files from a directory.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<Quiz>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_quiz(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        }
    }

    Ok(quizzes)
}

/// Load a quiz file, or every quiz in a directory.
pub fn load_quizzes(path: &Path) -> Result<Vec<Quiz>> {
    if path.is_dir() {
        load_quiz_directory(path)
    } else {
        Ok(vec![parse_quiz(path)?])
    }
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<QuestionId>,
    /// Warning message.
    pub message: String,
}

/// Validate a quiz for common issues.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let warn = |question: &Question, message: String| ValidationWarning {
        question_id: Some(question.id),
        message,
    };

    let mut seen_questions = HashSet::new();
    let mut seen_options = HashSet::new();

    for question in &quiz.questions {
        if !seen_questions.insert(question.id) {
            warnings.push(warn(question, format!("duplicate question ID: {}", question.id)));
        }

        if question.text.trim().is_empty() {
            warnings.push(warn(question, "question text is empty".into()));
        }

        if question.options.is_empty() {
            warnings.push(warn(question, "question has no answers".into()));
            continue;
        }

        for option in &question.options {
            if !seen_options.insert(option.id) {
                warnings.push(warn(question, format!("duplicate answer ID: {}", option.id)));
            }
        }

        let correct = question.known_correct_options().count();
        if correct == 0 {
            warnings.push(warn(
                question,
                "no answer is marked correct; it can only be scored by the server".into(),
            ));
        } else if question.arity == SelectArity::Single && correct > 1 {
            warnings.push(warn(
                question,
                format!("single-select question has {correct} correct answers"),
            ));
        }
    }

    if quiz.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "quiz has no questions".into(),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[quiz]
id = 7
title = "Rust basics"
description = "Warm-up questions"

[[questions]]
id = 2
position = 2
text = "Which of these are integer types?"
multiple = true

[[questions.answers]]
id = 21
text = "u8"
correct = true

[[questions.answers]]
id = 22
text = "i64"
correct = true

[[questions.answers]]
id = 23
text = "f32"
correct = false

[[questions]]
id = 1
position = 1
text = "Which keyword declares an immutable binding?"

[[questions.answers]]
id = 11
text = "let"
correct = true

[[questions.answers]]
id = 12
text = "var"
correct = false
"#;

    #[test]
    fn parse_valid_toml() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("quiz.toml")).unwrap();
        assert_eq!(quiz.id, QuizId(7));
        assert_eq!(quiz.title, "Rust basics");
        assert_eq!(quiz.description, "Warm-up questions");
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[0].id, QuestionId(1));
        assert_eq!(quiz.questions[1].arity, SelectArity::Multi);
        assert_eq!(quiz.questions[1].options[2].position, 3);
        assert_eq!(quiz.questions[1].options[2].is_correct, Some(false));
        assert!(validate_quiz(&quiz).is_empty());
    }

    #[test]
    fn withheld_correctness_parses_as_none() {
        let toml = r#"
[quiz]
id = 1
title = "Withheld"

[[questions]]
id = 1
text = "Pick one"

[[questions.answers]]
id = 1
text = "a"

[[questions.answers]]
id = 2
text = "b"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("quiz.toml")).unwrap();
        assert!(quiz.questions[0].options.iter().all(|o| o.is_correct.is_none()));
        let warnings = validate_quiz(&quiz);
        assert!(warnings.iter().any(|w| w.message.contains("no answer is marked correct")));
    }

    #[test]
    fn validate_duplicate_ids_and_arity() {
        let toml = r#"
[quiz]
id = 1
title = "Dupes"

[[questions]]
id = 1
text = "First"

[[questions.answers]]
id = 1
text = "a"
correct = true

[[questions.answers]]
id = 2
text = "b"
correct = true

[[questions]]
id = 1
text = "Second"

[[questions.answers]]
id = 2
text = "c"
correct = true

[[questions]]
id = 3
text = " "
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("quiz.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate question ID")));
        assert!(warnings.iter().any(|w| w.message.contains("duplicate answer ID")));
        assert!(warnings.iter().any(|w| w.message.contains("2 correct answers")));
        assert!(warnings.iter().any(|w| w.message.contains("text is empty")));
        assert!(warnings.iter().any(|w| w.message.contains("no answers")));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        let result = parse_quiz_str(bad, &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_directory_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quiz.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "[quiz]\nid = \"x\"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let quizzes = load_quizzes(dir.path()).unwrap();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].id, QuizId(7));
    }
}
