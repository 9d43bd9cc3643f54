//! The `quizflow show` command.

use std::path::PathBuf;

use anyhow::Result;

use quizflow_core::result::ReconciledResult;
use quizflow_report::ReportHeader;

use super::output::{emit_report, ensure_report_format};

pub fn execute(
    result_path: PathBuf,
    title: Option<String>,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    ensure_report_format(&format)?;
    let result = ReconciledResult::load_json(&result_path)?;

    let quiz_title = title.unwrap_or_else(|| {
        result_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Quiz result".to_string())
    });
    let header = ReportHeader::titled(quiz_title);

    emit_report(&format, &header, &result, output.as_deref())
}
