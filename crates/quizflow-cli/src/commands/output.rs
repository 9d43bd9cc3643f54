//! Result output shared by `take`, `score`, and `show`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, Table};

use quizflow_core::result::{AnswerText, ReconciledResult};
use quizflow_report::html::{generate_html, write_html_report};
use quizflow_report::text::{to_markdown, to_text};
use quizflow_report::ReportHeader;

fn join(answers: &[AnswerText]) -> String {
    answers
        .iter()
        .map(|a| a.text.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Per-question summary table.
pub fn summary_table(result: &ReconciledResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct answer", "Result"]);

    for (i, detail) in result.details.iter().enumerate() {
        let verdict = if detail.is_correct {
            Cell::new("correct").fg(Color::Green)
        } else {
            Cell::new("incorrect").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&detail.question_text),
            Cell::new(join(&detail.your_answers)),
            Cell::new(join(&detail.correct_answers)),
            verdict,
        ]);
    }
    table
}

pub fn print_summary(result: &ReconciledResult) {
    println!(
        "\nScore: {}/{} ({:.1}%)",
        result.score, result.total_questions, result.percentage
    );
    if !result.details.is_empty() {
        println!("{}", summary_table(result));
    }
}

/// Check a `score`/`show` report format.
pub fn ensure_report_format(format: &str) -> Result<()> {
    anyhow::ensure!(
        matches!(format, "text" | "json" | "markdown" | "html"),
        "unknown format: {format} (expected text, json, markdown, or html)"
    );
    Ok(())
}

/// Render a result in `format` and print it, or write it to `output` and
/// print the summary table instead.
pub fn emit_report(
    format: &str,
    header: &ReportHeader,
    result: &ReconciledResult,
    output: Option<&Path>,
) -> Result<()> {
    let rendered = match format {
        "json" => serde_json::to_string_pretty(result)?,
        "markdown" => to_markdown(header, result),
        "html" => generate_html(header, result),
        _ => to_text(header, result),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Result written to: {}", path.display());
            print_summary(result);
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Formats accepted by `take --format`.
pub fn file_formats(format: &str) -> Result<Vec<&str>> {
    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };
    for fmt in &formats {
        anyhow::ensure!(
            matches!(*fmt, "text" | "json" | "html"),
            "unknown format: {fmt} (expected text, json, html, or all)"
        );
    }
    Ok(formats.into_iter().filter(|f| *f != "text").collect())
}

/// Write result files into `dir`, named with a timestamp. Returns the paths written.
pub fn write_result_files(
    dir: &Path,
    formats: &[&str],
    header: &ReportHeader,
    result: &ReconciledResult,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if formats.is_empty() {
        return Ok(written);
    }

    std::fs::create_dir_all(dir)?;
    let timestamp = header.generated_at.format("%Y-%m-%dT%H%M%S");

    for fmt in formats {
        match *fmt {
            "json" => {
                let path = dir.join(format!("result-{timestamp}.json"));
                result.save_json(&path)?;
                written.push(path);
            }
            "html" => {
                let path = dir.join(format!("result-{timestamp}.html"));
                write_html_report(header, result, &path)?;
                written.push(path);
            }
            _ => {}
        }
    }
    Ok(written)
}
