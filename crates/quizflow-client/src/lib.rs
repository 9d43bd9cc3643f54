//! quizflow-client: Quiz API collaborators.
//!
//! Implements the `QuizSource` and `SubmissionClient` traits over HTTP, over
//! local quiz files, and as a scriptable mock for tests.

pub mod config;
mod error;
pub mod http;
pub mod mock;
pub mod offline;

pub use config::{create_client, load_config, load_config_from, QuizflowConfig};
pub use http::HttpQuizClient;
pub use mock::MockQuizService;
pub use offline::{FileQuizSource, OfflineGrader};
