//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use quizflow_core::result::{AnswerText, ReconciledResult};

use crate::ReportHeader;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn answer_list(answers: &[AnswerText]) -> String {
    if answers.is_empty() {
        return "<span class=\"muted\">-</span>".to_string();
    }
    let mut out = String::from("<ul>");
    for answer in answers {
        let class = match answer.is_correct {
            Some(true) => " class=\"pass\"",
            Some(false) => " class=\"fail\"",
            None => "",
        };
        out.push_str(&format!("<li{class}>{}</li>", html_escape(&answer.text)));
    }
    out.push_str("</ul>");
    out
}

/// Generate an HTML report from a reconciled result.
pub fn generate_html(header: &ReportHeader, result: &ReconciledResult) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizflow result: {}</title>\n",
        html_escape(&header.quiz_title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&header.quiz_title)));
    html.push_str(&format!(
        "<p class=\"meta\">{} | {}</p>\n",
        html_escape(&header.participant),
        header.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score
    let grade_class = if result.percentage >= 80.0 {
        "pass"
    } else if result.percentage >= 50.0 {
        "warn"
    } else {
        "fail"
    };
    html.push_str("<section class=\"score\">\n");
    html.push_str(&format!(
        "<p class=\"big {grade_class}\">{} / {} ({:.1}%)</p>\n",
        result.score, result.total_questions, result.percentage
    ));
    html.push_str(&format!(
        "<div class=\"bar\"><div class=\"fill {grade_class}\" style=\"width: {:.1}%\"></div></div>\n",
        result.percentage.clamp(0.0, 100.0)
    ));
    html.push_str("</section>\n");

    // Per-question breakdown
    html.push_str("<section class=\"details\">\n");
    html.push_str("<h2>Answers</h2>\n");
    if result.details.is_empty() {
        html.push_str("<p class=\"muted\">No per-question details are available.</p>\n");
    } else {
        html.push_str("<table>\n");
        html.push_str("<thead><tr><th>#</th><th>Question</th><th>Your answers</th><th>Correct answers</th><th>Result</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for (i, detail) in result.details.iter().enumerate() {
            let (class, verdict) = if detail.is_correct {
                ("pass", "correct")
            } else {
                ("fail", "incorrect")
            };
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{class}\">{verdict}</td></tr>\n",
                i + 1,
                html_escape(&detail.question_text),
                answer_list(&detail.your_answers),
                answer_list(&detail.correct_answers),
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(result).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(header: &ReportHeader, result: &ReconciledResult, path: &Path) -> Result<()> {
    let html = generate_html(header, result);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --warn: #fef9c3; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --warn: #713f12; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, .muted { color: #6b7280; }
.big { font-size: 2rem; font-weight: bold; padding: 0.5rem 1rem; border-radius: 8px; display: inline-block; }
.bar { height: 12px; background: var(--border); border-radius: 6px; overflow: hidden; max-width: 480px; }
.fill { height: 100%; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); }
ul { margin: 0; padding-left: 1.2rem; }
.pass { background: var(--pass); }
.warn { background: var(--warn); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&fixtures::header(), &fixtures::result());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Rust &lt;basics&gt;"));
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("1 / 2 (50.0%)"));
        assert!(html.contains("Which are integer types?"));
        assert!(html.contains("incorrect"));
    }

    #[test]
    fn html_report_without_details() {
        let mut result = fixtures::result();
        result.details.clear();
        let html = generate_html(&fixtures::header(), &result);
        assert!(html.contains("No per-question details"));
    }

    #[test]
    fn html_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("result.html");

        write_html_report(&fixtures::header(), &fixtures::result(), &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
