//! Scoring reconciliation.
//!
//! Turns the question set, the participant's selections and whatever the
//! grading authority returned into one [`ReconciledResult`]:
//!
//! 1. per-question grading records, when present, are authoritative;
//! 2. every question without a record is recomputed from locally known
//!    correctness, and questions that cannot be resolved are omitted;
//! 3. aggregate numbers supplied by the authority pass through verbatim,
//!    missing ones are computed from the details.
//!
//! [`reconcile`] is pure: it borrows its inputs and the same inputs always
//! produce the same result.

use std::collections::BTreeMap;

use crate::grading::{GradedOption, GradingRecord, GradingResponse};
use crate::model::{AnswerOption, Question, QuestionId, SelectArity};
use crate::result::{percentage, AnswerDetail, AnswerText, DetailSource, ReconciledResult};
use crate::selection::{Selection, SelectionStore};

/// Reconcile an attempt into its display-ready result.
pub fn reconcile(
    questions: &[Question],
    selections: &SelectionStore,
    grading: Option<&GradingResponse>,
) -> ReconciledResult {
    let mut ordered: Vec<&Question> = questions.iter().collect();
    ordered.sort_by_key(|q| (q.position, q.id));

    let (details, detail_source) = match grading {
        Some(GradingResponse::Full { records, .. }) => {
            authoritative_details(&ordered, selections, records)
        }
        Some(GradingResponse::AggregateOnly(_)) | Some(GradingResponse::Empty) | None => {
            (local_details(&ordered, selections), DetailSource::Local)
        }
    };

    let computed_score = details.iter().filter(|d| d.is_correct).count() as u32;
    let aggregate = grading.and_then(GradingResponse::aggregate);

    let score = aggregate.and_then(|a| a.score).unwrap_or(computed_score);
    let total_questions = aggregate
        .and_then(|a| a.total_questions)
        .unwrap_or(questions.len() as u32);
    let percentage = aggregate
        .and_then(|a| a.percentage)
        .unwrap_or_else(|| percentage(score, total_questions));

    tracing::debug!(
        grading = grading.map_or("absent", GradingResponse::kind),
        details = details.len(),
        score,
        total_questions,
        "reconciled attempt"
    );

    ReconciledResult {
        score,
        total_questions,
        percentage,
        details,
        detail_source,
    }
}

// ---------------------------------------------------------------------------
// Correctness resolution
// ---------------------------------------------------------------------------

/// Which step of the resolution policy decided a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerdictSource {
    /// Every chosen option carried a declared correctness flag.
    Declared,
    /// Chosen identities compared with the known correct identities.
    Structural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Verdict {
    is_correct: bool,
    source: VerdictSource,
}

/// Two-step correctness policy shared by single- and multi-select questions.
///
/// Step one uses the declared flags of the chosen options. A multi-select
/// answer is only fully correct when, in addition, no known correct option
/// was left out. Step two, used when some chosen option has no declared
/// flag, compares identities: the chosen option must be a known correct one
/// (single-select), or the chosen set must equal the correct set
/// (multi-select).
fn resolve_verdict(
    arity: SelectArity,
    chosen: &[&AnswerOption],
    correct: &[&AnswerOption],
) -> Verdict {
    let declared: Option<Vec<bool>> = chosen.iter().map(|o| o.is_correct).collect();
    let covers_correct = || correct.iter().all(|c| chosen.iter().any(|o| o.id == c.id));

    if let Some(flags) = declared {
        let all_declared_correct = flags.iter().all(|f| *f);
        let is_correct = match arity {
            SelectArity::Single => all_declared_correct,
            SelectArity::Multi => all_declared_correct && covers_correct(),
        };
        return Verdict {
            is_correct,
            source: VerdictSource::Declared,
        };
    }

    let is_correct = match arity {
        SelectArity::Single => {
            chosen.len() == 1 && correct.iter().any(|c| c.id == chosen[0].id)
        }
        SelectArity::Multi => {
            chosen.len() == correct.len()
                && covers_correct()
                && chosen.iter().all(|o| correct.iter().any(|c| c.id == o.id))
        }
    };
    Verdict {
        is_correct,
        source: VerdictSource::Structural,
    }
}

fn answer_text(option: &AnswerOption) -> AnswerText {
    AnswerText {
        text: option.text.clone(),
        is_correct: option.is_correct,
    }
}

/// Chosen options in question order; `None` when a chosen id is unknown.
fn chosen_options<'q>(question: &'q Question, selection: &Selection) -> Option<Vec<&'q AnswerOption>> {
    let ids = selection.option_ids();
    if ids.is_empty() || !ids.iter().all(|id| question.has_option(*id)) {
        return None;
    }
    Some(
        question
            .options
            .iter()
            .filter(|o| selection.contains(o.id))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Local recomputation
// ---------------------------------------------------------------------------

fn local_details(questions: &[&Question], selections: &SelectionStore) -> Vec<AnswerDetail> {
    questions
        .iter()
        .filter_map(|q| local_detail(q, selections))
        .collect()
}

fn local_detail(question: &Question, selections: &SelectionStore) -> Option<AnswerDetail> {
    let selection = selections.get(question.id)?;
    let Some(chosen) = chosen_options(question, selection) else {
        tracing::debug!("question {} has no resolvable choice, omitted", question.id);
        return None;
    };
    let correct: Vec<&AnswerOption> = question.known_correct_options().collect();
    if correct.is_empty() {
        tracing::debug!("question {} has no known correct option, omitted", question.id);
        return None;
    }

    let verdict = resolve_verdict(question.arity, &chosen, &correct);
    tracing::trace!(
        question = %question.id,
        correct = verdict.is_correct,
        source = ?verdict.source,
        "local verdict"
    );

    Some(AnswerDetail {
        question_id: question.id,
        question_text: question.text.clone(),
        your_answers: chosen.iter().map(|o| answer_text(o)).collect(),
        correct_answers: correct.iter().map(|o| answer_text(o)).collect(),
        is_correct: verdict.is_correct,
    })
}

// ---------------------------------------------------------------------------
// Authoritative records
// ---------------------------------------------------------------------------

/// Details from the authority's records, with questions it did not grade
/// recomputed locally. The returned source says which of the two produced
/// the details.
fn authoritative_details(
    questions: &[&Question],
    selections: &SelectionStore,
    records: &[GradingRecord],
) -> (Vec<AnswerDetail>, DetailSource) {
    let mut by_question: BTreeMap<QuestionId, &GradingRecord> = BTreeMap::new();
    for record in records {
        if !questions.iter().any(|q| q.id == record.question_id) {
            tracing::warn!(
                "grading record for unknown question {} dropped",
                record.question_id
            );
            continue;
        }
        if by_question.contains_key(&record.question_id) {
            tracing::warn!(
                "duplicate grading record for question {}, keeping the first",
                record.question_id
            );
            continue;
        }
        by_question.insert(record.question_id, record);
    }

    let mut details = Vec::with_capacity(questions.len());
    let (mut graded, mut recomputed) = (0usize, 0usize);
    for question in questions {
        match by_question.get(&question.id) {
            Some(record) => {
                if let Some(detail) = authoritative_detail(question, selections, record) {
                    graded += 1;
                    details.push(detail);
                }
            }
            None => {
                if let Some(detail) = local_detail(question, selections) {
                    recomputed += 1;
                    details.push(detail);
                }
            }
        }
    }
    if recomputed > 0 {
        tracing::debug!(graded, recomputed, "authority graded only part of the attempt");
    }

    let source = match (graded, recomputed) {
        (0, _) => DetailSource::Local,
        (_, 0) => DetailSource::Authority,
        _ => DetailSource::Mixed,
    };
    (details, source)
}

/// Text for an option the authority reported, falling back to the local
/// option text when the record omits it.
fn graded_text(question: &Question, option: &GradedOption) -> Option<AnswerText> {
    let text = option
        .text
        .clone()
        .or_else(|| question.option(option.id).map(|o| o.text.clone()))?;
    Some(AnswerText {
        text,
        is_correct: option.is_correct,
    })
}

fn authoritative_detail(
    question: &Question,
    selections: &SelectionStore,
    record: &GradingRecord,
) -> Option<AnswerDetail> {
    let mut your_answers: Vec<AnswerText> = record
        .chosen
        .iter()
        .filter_map(|o| graded_text(question, o))
        .collect();
    if your_answers.is_empty() {
        let selection = selections.get(question.id)?;
        your_answers = chosen_options(question, selection)?
            .into_iter()
            .map(answer_text)
            .collect();
    }

    let mut correct_answers: Vec<AnswerText> = record
        .correct
        .iter()
        .filter_map(|o| graded_text(question, o))
        .collect();
    if correct_answers.is_empty() {
        correct_answers = question.known_correct_options().map(answer_text).collect();
    }
    if correct_answers.is_empty() {
        tracing::debug!(
            "question {} has no correct answer from the authority or locally, omitted",
            question.id
        );
        return None;
    }

    Some(AnswerDetail {
        question_id: question.id,
        question_text: record
            .question_text
            .clone()
            .unwrap_or_else(|| question.text.clone()),
        your_answers,
        correct_answers,
        is_correct: record.is_correct,
    })
}
