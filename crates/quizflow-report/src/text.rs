//! Plain text and Markdown renderings of a result.

use std::fmt::Write;

use quizflow_core::result::{AnswerText, ReconciledResult};

use crate::ReportHeader;

fn join(answers: &[AnswerText]) -> String {
    if answers.is_empty() {
        return "-".to_string();
    }
    answers
        .iter()
        .map(|a| a.text.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn verdict(is_correct: bool) -> &'static str {
    if is_correct {
        "correct"
    } else {
        "incorrect"
    }
}

/// Render a result for the terminal.
pub fn to_text(header: &ReportHeader, result: &ReconciledResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", header.quiz_title);
    if !header.participant.is_empty() {
        let _ = writeln!(out, "Participant: {}", header.participant);
    }
    let _ = writeln!(
        out,
        "Score: {}/{} ({:.1}%)",
        result.score, result.total_questions, result.percentage
    );
    if !result.details.is_empty() {
        let _ = writeln!(
            out,
            "Details: {} correct, {} incorrect ({})",
            result.correct_details(),
            result.incorrect_details().count(),
            result.detail_source.describe()
        );
    }

    for (i, detail) in result.details.iter().enumerate() {
        let _ = writeln!(
            out,
            "\n{}. {} [{}]",
            i + 1,
            detail.question_text,
            verdict(detail.is_correct)
        );
        let _ = writeln!(out, "   your answer: {}", join(&detail.your_answers));
        let _ = writeln!(out, "   correct:     {}", join(&detail.correct_answers));
    }
    out
}

fn md_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Render a result as a Markdown document.
pub fn to_markdown(header: &ReportHeader, result: &ReconciledResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", header.quiz_title);
    if !header.participant.is_empty() {
        let _ = writeln!(out, "**Participant:** {}  ", header.participant);
    }
    let _ = writeln!(
        out,
        "**Score:** {}/{} ({:.1}%)  ",
        result.score, result.total_questions, result.percentage
    );
    let _ = writeln!(
        out,
        "**Generated:** {}\n",
        header.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if result.details.is_empty() {
        out.push_str("_No per-question details are available._\n");
        return out;
    }
    let _ = writeln!(out, "Answers {}.\n", result.detail_source.describe());

    out.push_str("| # | Question | Your answers | Correct answers | Result |\n");
    out.push_str("|---|----------|--------------|-----------------|--------|\n");
    for (i, detail) in result.details.iter().enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            i + 1,
            md_cell(&detail.question_text),
            md_cell(&join(&detail.your_answers)),
            md_cell(&join(&detail.correct_answers)),
            if detail.is_correct { "✅" } else { "❌" }
        );
    }
    out
}
