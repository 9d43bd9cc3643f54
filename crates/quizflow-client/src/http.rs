//! HTTP quiz API client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use quizflow_core::error::ServiceError;
use quizflow_core::grading::GradingResponse;
use quizflow_core::model::{
    AnswerOption, AttemptMetadata, OptionId, Question, QuestionId, Quiz, QuizId, SelectArity,
};
use quizflow_core::selection::SubmittedAnswer;
use quizflow_core::traits::{Credential, QuizSource, SubmissionClient, SubmissionPayload};

use crate::error::{from_reqwest, from_status};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Loads quizzes from and submits attempts to the quiz API.
pub struct HttpQuizClient {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpQuizClient {
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs: timeout.as_secs(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        credential: &Credential,
    ) -> reqwest::RequestBuilder {
        if credential.is_anonymous() {
            request
        } else {
            request.bearer_auth(credential.token())
        }
    }

    async fn error_for_status(
        &self,
        response: reqwest::Response,
        what: &str,
    ) -> Result<reqwest::Response, ServiceError> {
        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(from_status(status, body, what));
        }
        Ok(response)
    }
}

#[derive(Deserialize)]
struct WireQuiz {
    id: u64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    questions: Vec<WireQuestion>,
}

#[derive(Deserialize)]
struct WireQuestion {
    id: u64,
    #[serde(default)]
    position: u32,
    text: String,
    #[serde(default)]
    multiple: bool,
    #[serde(default)]
    answers: Vec<WireAnswer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAnswer {
    id: u64,
    #[serde(default)]
    position: u32,
    text: String,
    #[serde(default)]
    is_correct: Option<bool>,
}

impl From<WireQuiz> for Quiz {
    fn from(wire: WireQuiz) -> Self {
        let questions = wire
            .questions
            .into_iter()
            .map(|q| Question {
                id: QuestionId(q.id),
                position: q.position,
                text: q.text,
                arity: SelectArity::from_multiple(q.multiple),
                options: q
                    .answers
                    .into_iter()
                    .map(|a| AnswerOption {
                        id: OptionId(a.id),
                        text: a.text,
                        position: a.position,
                        is_correct: a.is_correct,
                    })
                    .collect(),
            })
            .collect();

        let mut quiz = Quiz::new(QuizId(wire.id), wire.title, questions);
        quiz.description = wire.description.unwrap_or_default();
        quiz
    }
}

/// Decode a submission response body. An empty body is a successful
/// submission without grading data.
fn decode_grading(body: &str) -> Result<GradingResponse, ServiceError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(GradingResponse::Empty);
    }
    serde_json::from_str(trimmed)
        .map_err(|e| ServiceError::Decode(format!("failed to parse grading response: {e}")))
}

#[async_trait]
impl QuizSource for HttpQuizClient {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, credential), fields(quiz_id = %quiz_id))]
    async fn load_quiz(
        &self,
        quiz_id: QuizId,
        credential: &Credential,
    ) -> Result<Quiz, ServiceError> {
        let start = Instant::now();
        let request = self
            .client
            .get(format!("{}/api/quizzes/{quiz_id}", self.base_url))
            .header("accept", "application/json");

        let response = self
            .authorize(request, credential)
            .send()
            .await
            .map_err(|e| from_reqwest(e, self.timeout_secs))?;
        let response = self
            .error_for_status(response, &format!("quiz {quiz_id}"))
            .await?;

        let wire: WireQuiz = response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(format!("failed to parse quiz: {e}")))?;
        let quiz = Quiz::from(wire);

        tracing::info!(
            questions = quiz.questions.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "quiz loaded"
        );
        Ok(quiz)
    }
}

#[async_trait]
impl SubmissionClient for HttpQuizClient {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(
        skip(self, metadata, answers, credential),
        fields(quiz_id = %metadata.quiz_id, answers = answers.len())
    )]
    async fn submit(
        &self,
        metadata: &AttemptMetadata,
        answers: &[SubmittedAnswer],
        credential: &Credential,
    ) -> Result<GradingResponse, ServiceError> {
        let start = Instant::now();
        let body = SubmissionPayload::new(metadata, answers.to_vec());
        let request = self
            .client
            .post(format!(
                "{}/api/quizzes/{}/submit",
                self.base_url, metadata.quiz_id
            ))
            .json(&body);

        let response = self
            .authorize(request, credential)
            .send()
            .await
            .map_err(|e| from_reqwest(e, self.timeout_secs))?;
        let response = self
            .error_for_status(response, &format!("quiz {}", metadata.quiz_id))
            .await?;

        let text = response
            .text()
            .await
            .map_err(|e| from_reqwest(e, self.timeout_secs))?;
        let grading = decode_grading(&text)?;

        tracing::info!(
            grading = grading.kind(),
            latency_ms = start.elapsed().as_millis() as u64,
            "submission graded"
        );
        Ok(grading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizflow_core::selection::Choice;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HttpQuizClient {
        HttpQuizClient::new(Some(server.uri()), Duration::from_secs(5)).unwrap()
    }

    fn metadata() -> AttemptMetadata {
        AttemptMetadata {
            quiz_id: QuizId(7),
            quiz_title: "Rust basics".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        }
    }

    #[tokio::test]
    async fn load_quiz_sorts_by_position() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "id": 7,
            "title": "Rust basics",
            "questions": [
                {"id": 2, "position": 2, "text": "second", "multiple": true, "answers": [
                    {"id": 22, "position": 2, "text": "b"},
                    {"id": 21, "position": 1, "text": "a"}
                ]},
                {"id": 1, "position": 1, "text": "first", "multiple": false, "answers": [
                    {"id": 11, "position": 1, "text": "x", "isCorrect": true}
                ]}
            ]
        });

        Mock::given(method("GET"))
            .and(path("/api/quizzes/7"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let quiz = client(&server)
            .load_quiz(QuizId(7), &Credential::new("test-token"))
            .await
            .unwrap();

        assert_eq!(quiz.title, "Rust basics");
        assert_eq!(quiz.questions[0].id, QuestionId(1));
        assert_eq!(quiz.questions[0].options[0].is_correct, Some(true));
        assert_eq!(quiz.questions[1].arity, SelectArity::Multi);
        assert_eq!(quiz.questions[1].options[0].id, OptionId(21));
        assert_eq!(quiz.questions[1].options[0].is_correct, None);
    }

    #[tokio::test]
    async fn load_quiz_maps_status_codes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/quizzes/1"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/quizzes/2"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/quizzes/3"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let client = client(&server);
        let credential = Credential::anonymous();

        let err = client.load_quiz(QuizId(1), &credential).await.unwrap_err();
        assert!(err.is_unauthorized());

        let err = client.load_quiz(QuizId(2), &credential).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = client.load_quiz(QuizId(3), &credential).await.unwrap_err();
        assert!(matches!(err, ServiceError::Api { status: 500, .. }));
        assert!(err.to_string().contains("internal error"));
    }

    #[tokio::test]
    async fn submit_sends_payload_and_decodes_records() {
        let server = MockServer::start().await;

        let expected_body = serde_json::json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "answers": [
                {"questionId": 1, "optionId": 11},
                {"questionId": 2, "optionId": [21, 22]}
            ]
        });
        let response_body = serde_json::json!({
            "score": 1,
            "totalQuestions": 2,
            "percentage": 50.0,
            "details": [
                {"questionId": 1, "chosen": [{"id": 11}], "correct": [{"id": 11}], "isCorrect": true},
                {"questionId": 2, "chosen": [{"id": 21}, {"id": 22}], "correct": [{"id": 21}], "isCorrect": false}
            ]
        });

        Mock::given(method("POST"))
            .and(path("/api/quizzes/7/submit"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_json(&expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&server)
            .await;

        let answers = vec![
            SubmittedAnswer {
                question_id: QuestionId(1),
                choice: Choice::One(OptionId(11)),
            },
            SubmittedAnswer {
                question_id: QuestionId(2),
                choice: Choice::Many(vec![OptionId(21), OptionId(22)]),
            },
        ];

        let grading = client(&server)
            .submit(&metadata(), &answers, &Credential::new("test-token"))
            .await
            .unwrap();

        assert_eq!(grading.kind(), "full");
        assert_eq!(grading.records().len(), 2);
        assert_eq!(grading.aggregate().and_then(|a| a.score), Some(1));
    }

    #[tokio::test]
    async fn submit_with_empty_body_is_empty_grading() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/quizzes/7/submit"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let grading = client(&server)
            .submit(&metadata(), &[], &Credential::anonymous())
            .await
            .unwrap();
        assert_eq!(grading, GradingResponse::Empty);
    }

    #[tokio::test]
    async fn submit_aggregate_only_and_bad_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/quizzes/7/submit"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"score": 3, "totalQuestions": 4})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/quizzes/8/submit"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client(&server);
        let grading = client
            .submit(&metadata(), &[], &Credential::anonymous())
            .await
            .unwrap();
        assert_eq!(grading.kind(), "aggregate-only");

        let mut other = metadata();
        other.quiz_id = QuizId(8);
        let err = client
            .submit(&other, &[], &Credential::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)));
        assert!(err.is_permanent());
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        // Nothing listens on port 9 locally.
        let client =
            HttpQuizClient::new(Some("http://127.0.0.1:9".into()), Duration::from_secs(2)).unwrap();
        let err = client
            .load_quiz(QuizId(1), &Credential::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Network(_) | ServiceError::Timeout(_)
        ));
        assert!(!err.is_permanent());
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client =
            HttpQuizClient::new(Some("http://quiz.test/".into()), Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://quiz.test");
    }
}
