//! The `quizflow take` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use quizflow_client::{create_client, load_config_from, FileQuizSource, OfflineGrader};
use quizflow_core::attempt::{Attempt, RetryPolicy};
use quizflow_core::model::QuizId;
use quizflow_core::result::ReconciledResult;
use quizflow_core::traits::{Credential, QuizSource, SubmissionClient};
use quizflow_report::ReportHeader;

use super::output::{file_formats, print_summary, write_result_files};

#[derive(Args)]
pub struct TakeArgs {
    /// Quiz ID
    #[arg(long)]
    quiz: u64,

    /// Take the quiz from a local .toml file or directory instead of the API
    #[arg(long)]
    quiz_file: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Participant first name
    #[arg(long)]
    first_name: Option<String>,

    /// Participant last name
    #[arg(long)]
    last_name: Option<String>,

    /// Output directory
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format: text, json, html, all
    #[arg(long, default_value = "text")]
    format: String,
}

pub async fn execute(args: TakeArgs) -> Result<()> {
    let formats = file_formats(&args.format)?;
    let config = load_config_from(args.config.as_deref())?;

    let mut participant = config.participant.clone();
    if let Some(first) = args.first_name {
        participant.first_name = first;
    }
    if let Some(last) = args.last_name {
        participant.last_name = last;
    }

    let (source, client, credential, policy): (
        Arc<dyn QuizSource>,
        Arc<dyn SubmissionClient>,
        Credential,
        RetryPolicy,
    ) = match &args.quiz_file {
        Some(path) => (
            Arc::new(FileQuizSource::new(path)) as Arc<dyn QuizSource>,
            Arc::new(OfflineGrader) as Arc<dyn SubmissionClient>,
            Credential::anonymous(),
            RetryPolicy::none(),
        ),
        None => {
            let http = Arc::new(create_client(&config)?);
            (
                http.clone() as Arc<dyn QuizSource>,
                http as Arc<dyn SubmissionClient>,
                config.credential(),
                config.retry_policy(),
            )
        }
    };

    let quiz_id = QuizId(args.quiz);
    let mut attempt = Attempt::start(source.as_ref(), quiz_id, &credential, &participant)
        .await
        .with_context(|| format!("cannot start quiz {quiz_id}"))?;

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();

    let outcome = run_session(
        &mut attempt,
        client.as_ref(),
        &credential,
        &policy,
        &mut input,
        &mut out,
    )
    .await?;

    match outcome {
        Outcome::Submitted(result) => {
            print_summary(&result);

            let header = ReportHeader::new(attempt.metadata());
            let dir = args.output.unwrap_or_else(|| config.output_dir.clone());
            for path in write_result_files(&dir, &formats, &header, &result)? {
                eprintln!("Results saved to: {}", path.display());
            }
        }
        Outcome::Discarded => {
            attempt.discard();
            println!("Attempt discarded, nothing was submitted.");
        }
    }

    Ok(())
}

/// How an interactive session ended.
#[derive(Debug)]
pub enum Outcome {
    Submitted(ReconciledResult),
    Discarded,
}

/// One line of participant input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    /// 1-based option number.
    Option(usize),
    Next,
    Previous,
    Finish,
    Retry,
    Edit,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    match line.trim().to_lowercase().as_str() {
        "n" | "next" => Input::Next,
        "p" | "prev" | "previous" => Input::Previous,
        "f" | "finish" => Input::Finish,
        "r" | "retry" => Input::Retry,
        "e" | "edit" => Input::Edit,
        "q" | "quit" => Input::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => Input::Option(n),
            _ => Input::Unknown,
        },
    }
}

fn read_input<R: BufRead>(input: &mut R) -> Result<Option<Input>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(parse_input(&line)))
}

fn render_question<W: Write>(out: &mut W, attempt: &Attempt) -> Result<()> {
    let navigation = attempt.navigation();
    let Some(question) = navigation.current_question() else {
        return Ok(());
    };
    let progress = navigation.progress();
    let selection = navigation.selections().get(question.id);

    writeln!(
        out,
        "\nQuestion {}/{} ({} choice, {} answered)",
        progress.position,
        progress.total,
        question.arity,
        progress.answered
    )?;
    writeln!(out, "{}", question.text)?;
    for (i, option) in question.options.iter().enumerate() {
        let chosen = selection.is_some_and(|s| s.contains(option.id));
        let marker = match (question.is_multi(), chosen) {
            (true, true) => "[x]",
            (true, false) => "[ ]",
            (false, true) => "(*)",
            (false, false) => "( )",
        };
        writeln!(out, "  {}) {marker} {}", i + 1, option.text)?;
    }
    writeln!(
        out,
        "[1-{}] choose, n next, p previous, f finish, q quit",
        question.options.len()
    )?;
    out.flush()?;
    Ok(())
}

/// Drive an attempt from line-based input until it is submitted or quit.
///
/// End of input quits the attempt.
pub async fn run_session<R: BufRead, W: Write>(
    attempt: &mut Attempt,
    client: &dyn SubmissionClient,
    credential: &Credential,
    policy: &RetryPolicy,
    input: &mut R,
    out: &mut W,
) -> Result<Outcome> {
    writeln!(
        out,
        "{} ({} questions)",
        attempt.metadata().quiz_title,
        attempt.navigation().questions().len()
    )?;

    loop {
        render_question(out, attempt)?;
        let Some(command) = read_input(input)? else {
            return Ok(Outcome::Discarded);
        };
        let Some(navigation) = attempt.navigation_mut() else {
            anyhow::bail!("attempt is no longer editable");
        };

        match command {
            Input::Option(n) => {
                let choice = navigation
                    .current_question()
                    .and_then(|q| q.options.get(n - 1).map(|o| (o.id, q.is_multi())));
                match choice {
                    Some((id, true)) => navigation.toggle(id),
                    Some((id, false)) => navigation.select(id),
                    None => writeln!(out, "There is no option {n}.")?,
                }
            }
            Input::Next => {
                if !navigation.next() {
                    if navigation.progress().position == navigation.progress().total {
                        writeln!(out, "This is the last question, use f to finish.")?;
                    } else {
                        writeln!(out, "Answer this question before moving on.")?;
                    }
                }
            }
            Input::Previous => {
                if !navigation.previous() {
                    writeln!(out, "This is the first question.")?;
                }
            }
            Input::Finish => match navigation.finish() {
                Ok(()) => {
                    match submit_until_done(attempt, client, credential, policy, input, out)
                        .await?
                    {
                        Submission::Done => {
                            if let Some(result) = attempt.result() {
                                return Ok(Outcome::Submitted(result.clone()));
                            }
                            return Ok(Outcome::Discarded);
                        }
                        Submission::Edit => {
                            if let Some(navigation) = attempt.navigation_mut() {
                                navigation.reopen();
                            }
                            writeln!(out, "Editing answers, use f to submit again.")?;
                        }
                        Submission::Quit => return Ok(Outcome::Discarded),
                    }
                }
                Err(e) => writeln!(out, "Cannot finish yet: {e}.")?,
            },
            Input::Quit => return Ok(Outcome::Discarded),
            Input::Retry | Input::Edit | Input::Unknown => {
                writeln!(out, "Unrecognized input.")?;
            }
        }
    }
}

/// What the participant chose after submitting.
enum Submission {
    Done,
    Edit,
    Quit,
}

/// Submit, offering a retry or a return to editing after each failure.
async fn submit_until_done<R: BufRead, W: Write>(
    attempt: &mut Attempt,
    client: &dyn SubmissionClient,
    credential: &Credential,
    policy: &RetryPolicy,
    input: &mut R,
    out: &mut W,
) -> Result<Submission> {
    loop {
        writeln!(out, "Submitting...")?;
        match attempt.submit_with_retry(client, credential, policy).await {
            Ok(_) => return Ok(Submission::Done),
            Err(e) => {
                writeln!(out, "{e}")?;
                writeln!(out, "Your answers are kept. r retry, e edit answers, q quit")?;
            }
        }

        loop {
            match read_input(input)? {
                Some(Input::Retry) => break,
                Some(Input::Edit) => return Ok(Submission::Edit),
                Some(Input::Quit) | None => return Ok(Submission::Quit),
                Some(_) => writeln!(out, "r retry, e edit answers, q quit")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use quizflow_client::MockQuizService;
    use quizflow_core::error::ServiceError;
    use quizflow_core::grading::{AggregateScore, GradingResponse};
    use quizflow_core::selection::Choice;
    use quizflow_core::model::{
        AnswerOption, OptionId, Participant, Question, QuestionId, Quiz, SelectArity,
    };

    fn quiz() -> Quiz {
        let option = |id: u64, text: &str, correct: bool| AnswerOption {
            id: OptionId(id),
            text: text.into(),
            position: id as u32 % 10,
            is_correct: Some(correct),
        };
        Quiz::new(
            QuizId(1),
            "Session",
            vec![
                Question {
                    id: QuestionId(1),
                    position: 1,
                    text: "Pick one".into(),
                    arity: SelectArity::Single,
                    options: vec![option(11, "yes", true), option(12, "no", false)],
                },
                Question {
                    id: QuestionId(2),
                    position: 2,
                    text: "Pick many".into(),
                    arity: SelectArity::Multi,
                    options: vec![
                        option(21, "a", true),
                        option(22, "b", true),
                        option(23, "c", false),
                    ],
                },
            ],
        )
    }

    async fn session(
        service: &MockQuizService,
        script: &str,
    ) -> (Attempt, Outcome, String) {
        let mut attempt = Attempt::new(quiz(), &Participant::new("Ada", "Lovelace")).unwrap();
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let outcome = run_session(
            &mut attempt,
            service,
            &Credential::anonymous(),
            &RetryPolicy::none(),
            &mut input,
            &mut out,
        )
        .await
        .unwrap();
        (attempt, outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parse_inputs() {
        assert_eq!(parse_input("2\n"), Input::Option(2));
        assert_eq!(parse_input(" N "), Input::Next);
        assert_eq!(parse_input("previous"), Input::Previous);
        assert_eq!(parse_input("f"), Input::Finish);
        assert_eq!(parse_input("e"), Input::Edit);
        assert_eq!(parse_input("0"), Input::Unknown);
        assert_eq!(parse_input("maybe"), Input::Unknown);
    }

    #[tokio::test]
    async fn full_session_submits_local_result() {
        let service = MockQuizService::new(quiz());
        let (attempt, outcome, out) = session(&service, "1\nn\n1\n2\nf\n").await;

        let Outcome::Submitted(result) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert_eq!(result.score, 2);
        assert_eq!(result.total_questions, 2);
        assert!(attempt.is_submitted());
        assert!(out.contains("Question 2/2 (multi choice"));
        assert!(out.contains("[x] a"));
        assert_eq!(service.submit_count(), 1);
    }

    #[tokio::test]
    async fn next_is_refused_until_answered() {
        let service = MockQuizService::new(quiz());
        let (attempt, outcome, out) = session(&service, "n\nf\nq\n").await;

        assert!(matches!(outcome, Outcome::Discarded));
        assert!(out.contains("Answer this question before moving on."));
        assert!(out.contains("Cannot finish yet"));
        assert!(!attempt.is_submitted());
        assert_eq!(service.submit_count(), 0);
    }

    #[tokio::test]
    async fn deselecting_every_multi_option_blocks_finish() {
        let service = MockQuizService::new(quiz());
        let (_, outcome, out) = session(&service, "1\nn\n1\n1\nf\n").await;

        assert!(matches!(outcome, Outcome::Discarded));
        assert!(out.contains("1 question(s) still unanswered"));
        assert_eq!(service.submit_count(), 0);
    }

    #[tokio::test]
    async fn failed_submission_can_be_retried() {
        let grading = GradingResponse::AggregateOnly(AggregateScore {
            score: Some(1),
            total_questions: Some(2),
            percentage: Some(50.0),
        });
        let service = MockQuizService::new(quiz())
            .with_grading(grading)
            .fail_next_submit(ServiceError::Network("connection reset".into()));

        let (attempt, outcome, out) = session(&service, "1\nn\n1\nf\nr\n").await;

        let Outcome::Submitted(result) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert!(out.contains("connection reset"));
        assert_eq!(result.score, 1);
        assert_eq!(result.percentage, 50.0);
        assert!(attempt.is_submitted());
        assert_eq!(service.submit_count(), 2);
    }

    #[tokio::test]
    async fn answers_can_be_edited_after_a_failed_submission() {
        let service = MockQuizService::new(quiz())
            .fail_next_submit(ServiceError::Api {
                status: 503,
                message: "maintenance".into(),
            });

        let (attempt, outcome, out) = session(&service, "1\nn\n1\nf\ne\n2\nf\n").await;

        let Outcome::Submitted(result) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert!(out.contains("Editing answers"));
        assert!(out.contains("[x] b"));
        assert_eq!(result.score, 2);
        assert!(attempt.is_submitted());
        assert_eq!(service.submit_count(), 2);

        let submitted = service.last_submission().unwrap();
        assert_eq!(
            submitted.answers[1].choice,
            Choice::Many(vec![OptionId(21), OptionId(22)])
        );
    }

    #[tokio::test]
    async fn end_of_input_discards() {
        let service = MockQuizService::new(quiz());
        let (attempt, outcome, _) = session(&service, "1\n").await;
        assert!(matches!(outcome, Outcome::Discarded));
        assert!(!attempt.is_submitted());
        assert_eq!(attempt.navigation().selections().answered_count(), 1);
    }
}
