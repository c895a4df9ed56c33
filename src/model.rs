use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub user_agent: String,
}

/// User-visible classification of the most recent execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Running,
    Success,
    Failure,
}

/// One request to the remote execution service, built fresh per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub language: String,
    pub version: String,
    pub source: String,
    pub stdin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i64>,
    /// Wall-clock round trip measured locally, not reported by the service.
    pub elapsed_ms: u64,
    #[serde(default)]
    pub timestamp_utc: String,
}

impl ExecutionResult {
    /// Stdout for display, with an explicit marker when the program printed nothing.
    pub fn display_stdout(&self) -> &str {
        if self.stdout.is_empty() {
            "(no output)"
        } else {
            &self.stdout
        }
    }
}

/// Mutable state owned by the session controller. Never persisted; only the
/// per-language source text goes to the code store.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub current_language_key: String,
    pub status: Status,
    /// Informational or hint message (empty-input hint, nonzero exit code report).
    pub note: Option<String>,
    pub last_result: Option<ExecutionResult>,
    /// Shown in place of stderr when the request itself failed and there is no result.
    pub error_text: Option<String>,
    pub in_flight: bool,
}

impl SessionState {
    pub fn new(current_language_key: String) -> Self {
        Self {
            current_language_key,
            status: Status::Idle,
            note: None,
            last_result: None,
            error_text: None,
            in_flight: false,
        }
    }
}

/// Pure projection of the session state for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub status: Status,
    pub note: Option<String>,
    pub result: Option<ExecutionResult>,
    pub error_text: Option<String>,
}

impl StatusView {
    pub fn elapsed_ms(&self) -> Option<u64> {
        self.result.as_ref().map(|r| r.elapsed_ms)
    }
}
