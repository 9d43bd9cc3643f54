//! Client configuration and factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizflow_core::attempt::RetryPolicy;
use quizflow_core::model::Participant;
use quizflow_core::traits::Credential;

use crate::http::{HttpQuizClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Top-level quizflow configuration.
///
/// Note: Custom Debug impl masks the token to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct QuizflowConfig {
    /// Base URL of the quiz API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token. Empty for anonymous access.
    #[serde(default)]
    pub token: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Automatic retries after a failed submission.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Output directory for results.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Default participant name.
    #[serde(default)]
    pub participant: Participant,
}

impl std::fmt::Debug for QuizflowConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizflowConfig")
            .field("base_url", &self.base_url)
            .field("token", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("output_dir", &self.output_dir)
            .field("participant", &self.participant)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_retries() -> u32 {
    2
}
fn default_retry_delay() -> u64 {
    500
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizflow-results")
}

impl Default for QuizflowConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            output_dir: default_output_dir(),
            participant: Participant::default(),
        }
    }
}

impl QuizflowConfig {
    pub fn credential(&self) -> Credential {
        Credential::new(self.token.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizflow.toml` in the current directory
/// 2. `~/.config/quizflow/config.toml`
///
/// Environment variable overrides: `QUIZFLOW_TOKEN`, `QUIZFLOW_BASE_URL`.
pub fn load_config() -> Result<QuizflowConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizflowConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizflow.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QuizflowConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => QuizflowConfig::default(),
    };

    config.base_url = resolve_env_vars(&config.base_url);
    config.token = resolve_env_vars(&config.token);

    // Apply env var overrides
    if let Ok(token) = std::env::var("QUIZFLOW_TOKEN") {
        if !token.is_empty() {
            config.token = token;
        }
    }
    if let Ok(url) = std::env::var("QUIZFLOW_BASE_URL") {
        if !url.is_empty() {
            config.base_url = url;
        }
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizflow"))
}

/// Create the HTTP client described by a configuration.
pub fn create_client(config: &QuizflowConfig) -> Result<HttpQuizClient> {
    HttpQuizClient::new(Some(config.base_url.clone()), config.timeout())
        .context("failed to create quiz API client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZFLOW_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZFLOW_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZFLOW_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_QUIZFLOW_UNSET_VAR}"), "");
        assert_eq!(resolve_env_vars("no ${ closing"), "no ${ closing");
        std::env::remove_var("_QUIZFLOW_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizflowConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_policy().retry_delay, Duration::from_millis(500));
        assert!(config.credential().is_anonymous());
    }

    #[test]
    fn debug_masks_token() {
        let config = QuizflowConfig {
            token: "super-secret".into(),
            ..QuizflowConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn load_config_from_file() {
        std::env::set_var("_QUIZFLOW_CONFIG_TOKEN", "from-env");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizflow.toml");
        std::fs::write(
            &path,
            r#"
base_url = "https://quiz.example.com"
token = "${_QUIZFLOW_CONFIG_TOKEN}"
max_retries = 5

[participant]
first_name = "Ada"
last_name = "Lovelace"
"#,
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        if std::env::var("QUIZFLOW_BASE_URL").is_err() {
            assert_eq!(config.base_url, "https://quiz.example.com");
        }
        if std::env::var("QUIZFLOW_TOKEN").is_err() {
            assert_eq!(config.token, "from-env");
        }
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.participant.first_name, "Ada");
        std::env::remove_var("_QUIZFLOW_CONFIG_TOKEN");
    }

    #[test]
    fn missing_explicit_config_is_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/quizflow.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
