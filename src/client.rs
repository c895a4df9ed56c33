//! HTTP client for the remote execution service.
//!
//! The service is a Piston-compatible black box: one `POST /execute` per run,
//! one complete JSON document back. Responses carry the captured streams
//! either under a top-level `run` object or directly at the top level.

use crate::model::{ExecutionRequest, RunConfig};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("request timed out after {}", humantime::format_duration(*.0))]
    Timeout(Duration),
    #[error("network error: {0}")]
    Transport(String),
    #[error("server error: HTTP {0}")]
    RemoteHttp(u16),
    #[error("unexpected response")]
    MalformedResponse,
}

#[derive(Debug, Serialize)]
struct FilePayload<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ExecutePayload<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<FilePayload<'a>>,
    stdin: &'a str,
}

/// Captured output of one remote run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i64>,
}

pub struct PistonClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl PistonClient {
    pub fn new(cfg: &RunConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            client,
            timeout: cfg.request_timeout,
        })
    }

    /// Submit one execution request and await the complete response.
    pub async fn execute(&self, req: &ExecutionRequest) -> Result<RunOutput, ExecuteError> {
        let url = format!("{}/execute", self.base_url);
        let payload = ExecutePayload {
            language: &req.language,
            version: &req.version,
            files: vec![FilePayload {
                content: &req.source,
            }],
            stdin: &req.stdin,
        };

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExecuteError::Timeout(self.timeout)
                } else {
                    ExecuteError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExecuteError::RemoteHttp(status.as_u16()));
        }

        // A timeout or transport failure can also strike mid-body, after the
        // status line was already read; keep those in their own buckets and
        // reserve MalformedResponse for bodies that are not JSON.
        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ExecuteError::Timeout(self.timeout)
            } else if e.is_decode() {
                ExecuteError::MalformedResponse
            } else {
                ExecuteError::Transport(e.to_string())
            }
        })?;
        parse_run_output(&body)
    }
}

/// Extract the run object from a response body.
///
/// Accepts `{ "run": { ... } }` or the fields directly at the top level. An
/// object carrying none of the expected fields is rejected rather than read
/// as an empty run.
fn parse_run_output(body: &Value) -> Result<RunOutput, ExecuteError> {
    let run = body.get("run").unwrap_or(body);
    let obj = run.as_object().ok_or(ExecuteError::MalformedResponse)?;
    if !obj.contains_key("stdout") && !obj.contains_key("stderr") && !obj.contains_key("code") {
        return Err(ExecuteError::MalformedResponse);
    }
    Ok(RunOutput {
        stdout: obj
            .get("stdout")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        stderr: obj
            .get("stderr")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        code: obj.get("code").and_then(Value::as_i64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_wrapped_run_object() {
        let body = json!({ "run": { "stdout": "hi\n", "stderr": "", "code": 0 } });
        let out = parse_run_output(&body).unwrap();
        assert_eq!(out.stdout, "hi\n");
        assert_eq!(out.stderr, "");
        assert_eq!(out.code, Some(0));
    }

    #[test]
    fn parses_top_level_fields() {
        let body = json!({ "stdout": "x", "stderr": "boom", "code": 1 });
        let out = parse_run_output(&body).unwrap();
        assert_eq!(out.stdout, "x");
        assert_eq!(out.stderr, "boom");
        assert_eq!(out.code, Some(1));
    }

    #[test]
    fn missing_fields_default() {
        let body = json!({ "run": { "stdout": "only out" } });
        let out = parse_run_output(&body).unwrap();
        assert_eq!(out.stdout, "only out");
        assert_eq!(out.stderr, "");
        assert_eq!(out.code, None);
    }

    #[test]
    fn null_code_is_absent() {
        let body = json!({ "run": { "stdout": "", "stderr": "", "code": null } });
        let out = parse_run_output(&body).unwrap();
        assert_eq!(out.code, None);
    }

    #[test]
    fn empty_object_is_malformed() {
        let body = json!({});
        assert!(matches!(
            parse_run_output(&body),
            Err(ExecuteError::MalformedResponse)
        ));
    }

    #[test]
    fn non_object_run_is_malformed() {
        let body = json!({ "run": "nope" });
        assert!(matches!(
            parse_run_output(&body),
            Err(ExecuteError::MalformedResponse)
        ));
    }

    #[test]
    fn array_body_is_malformed() {
        let body = json!([1, 2, 3]);
        assert!(matches!(
            parse_run_output(&body),
            Err(ExecuteError::MalformedResponse)
        ));
    }

    #[test]
    fn timeout_error_names_duration() {
        let e = ExecuteError::Timeout(Duration::from_secs(30));
        assert_eq!(e.to_string(), "request timed out after 30s");
    }

    #[test]
    fn payload_wire_shape() {
        let payload = ExecutePayload {
            language: "python",
            version: "*",
            files: vec![FilePayload {
                content: "print(\"hi\")",
            }],
            stdin: "",
        };
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            v,
            json!({
                "language": "python",
                "version": "*",
                "files": [{ "content": "print(\"hi\")" }],
                "stdin": ""
            })
        );
    }
}
