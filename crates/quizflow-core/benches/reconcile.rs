use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use quizflow_core::grading::{AggregateScore, GradedOption, GradingRecord, GradingResponse};
use quizflow_core::model::{AnswerOption, OptionId, Question, QuestionId, SelectArity};
use quizflow_core::reconcile::reconcile;
use quizflow_core::selection::SelectionStore;

fn make_questions(n: u64) -> Vec<Question> {
    (1..=n)
        .map(|i| Question {
            id: QuestionId(i),
            position: i as u32,
            text: format!("Question {i}"),
            arity: SelectArity::from_multiple(i % 2 == 0),
            options: (1..=4)
                .map(|j| AnswerOption {
                    id: OptionId(i * 10 + j),
                    text: format!("Option {j}"),
                    position: j as u32,
                    is_correct: Some(j == 1 || (i % 2 == 0 && j == 2)),
                })
                .collect(),
        })
        .collect()
}

fn make_selections(questions: &[Question]) -> SelectionStore {
    let mut store = SelectionStore::new(questions);
    for q in questions {
        if q.arity == SelectArity::Multi {
            store.toggle(q.id, OptionId(q.id.0 * 10 + 1));
            store.toggle(q.id, OptionId(q.id.0 * 10 + 3));
        } else {
            store.select(q.id, OptionId(q.id.0 * 10 + 1));
        }
    }
    store
}

fn make_full_response(questions: &[Question]) -> GradingResponse {
    let records = questions
        .iter()
        .map(|q| GradingRecord {
            question_id: q.id,
            question_text: Some(q.text.clone()),
            chosen: vec![GradedOption {
                id: OptionId(q.id.0 * 10 + 1),
                text: None,
                is_correct: Some(true),
            }],
            correct: vec![GradedOption {
                id: OptionId(q.id.0 * 10 + 1),
                text: None,
                is_correct: None,
            }],
            is_correct: q.arity == SelectArity::Single,
        })
        .collect();
    GradingResponse::Full {
        aggregate: AggregateScore::default(),
        records,
    }
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for &n in &[10u64, 100, 1000] {
        let questions = make_questions(n);
        let selections = make_selections(&questions);
        let full = make_full_response(&questions);

        group.bench_with_input(BenchmarkId::new("local", n), &n, |b, _| {
            b.iter(|| reconcile(black_box(&questions), black_box(&selections), None))
        });

        group.bench_with_input(BenchmarkId::new("authoritative", n), &n, |b, _| {
            b.iter(|| reconcile(black_box(&questions), black_box(&selections), Some(&full)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
