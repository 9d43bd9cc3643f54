//! The `quizflow validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizflow_core::parser::{load_quizzes, validate_quiz};

pub fn execute(quiz_path: PathBuf) -> Result<()> {
    let quizzes = load_quizzes(&quiz_path)?;
    anyhow::ensure!(
        !quizzes.is_empty(),
        "no quiz files found in {}",
        quiz_path.display()
    );

    let mut total_warnings = 0;

    for quiz in &quizzes {
        println!(
            "Quiz {}: {} ({} questions)",
            quiz.id,
            quiz.title,
            quiz.questions.len()
        );

        let warnings = validate_quiz(quiz);
        for w in &warnings {
            let prefix = w
                .question_id
                .map(|id| format!("  [question {id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All quizzes valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
