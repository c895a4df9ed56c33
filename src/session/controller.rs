//! Execution session controller.
//!
//! Mediates every user action that touches execution state: language
//! selection, editor resets, and the single in-flight request. Guarantees at
//! most one request outstanding at a time, so responses apply in submission
//! order and a stale response can never overwrite a newer one.

use crate::client::{PistonClient, RunOutput};
use crate::editor::EditorWidget;
use crate::languages::{self, LanguageProfile};
use crate::model::{
    ExecutionRequest, ExecutionResult, RunConfig, SessionState, Status, StatusView,
};
use crate::storage::CodeStore;
use std::time::Instant;
use thiserror::Error;

/// Errors recovered at the controller boundary. None of these leave the
/// session in an invalid state; submit remains possible afterwards.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Unknown language key: a configuration error, not a runtime condition.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    #[error("write some code first")]
    EmptyInput,
    #[error("a run is already in progress")]
    AlreadyRunning,
}

pub struct SessionController<E: EditorWidget, S: CodeStore> {
    client: PistonClient,
    editor: E,
    store: S,
    profile: &'static LanguageProfile,
    state: SessionState,
}

impl<E: EditorWidget, S: CodeStore> SessionController<E, S> {
    /// Build a controller with `key` as the current language. The initial
    /// selection goes through the same path as a user-driven switch, so the
    /// editor starts with saved or example code.
    pub fn new(cfg: &RunConfig, key: &str, editor: E, store: S) -> anyhow::Result<Self> {
        let profile = languages::profile(key)
            .ok_or_else(|| SessionError::UnknownLanguage(key.to_string()))?;
        let client = PistonClient::new(cfg)?;
        let mut controller = Self {
            client,
            editor,
            store,
            profile,
            state: SessionState::new(profile.key.to_string()),
        };
        controller.select_language(key)?;
        Ok(controller)
    }

    pub fn current_profile(&self) -> &'static LanguageProfile {
        self.profile
    }

    pub fn source(&self) -> String {
        self.editor.text()
    }

    /// Replace the editor content without touching status or storage.
    pub fn set_source(&mut self, text: &str) {
        self.editor.set_text(text);
    }

    /// Switch the current language. Loads the saved source for that language
    /// if one exists, else the bundled example; resets status and output.
    /// Unknown keys are rejected with no effect on state.
    pub fn select_language(&mut self, key: &str) -> Result<(), SessionError> {
        let profile = languages::profile(key)
            .ok_or_else(|| SessionError::UnknownLanguage(key.to_string()))?;
        self.profile = profile;
        self.state.current_language_key = profile.key.to_string();
        self.editor.set_mode(profile.editor_mode);
        match self.store.get(&languages::storage_key(profile.key)) {
            Some(saved) => self.editor.set_text(&saved),
            None => self.editor.set_text(profile.example_source),
        }
        self.reset_output();
        Ok(())
    }

    /// Overwrite the editor with the bundled example, even when a saved copy
    /// exists. Saved code is what `select_language` restores; this action is
    /// the way back to the starter snippet. Storage is untouched.
    pub fn load_example(&mut self) {
        self.editor.set_text(self.profile.example_source);
        self.reset_output();
    }

    /// Empty the editor and reset status/output. Storage is untouched.
    pub fn clear_editor(&mut self) {
        self.editor.set_text("");
        self.reset_output();
    }

    /// Drop the last result and return to Idle. Editor is untouched.
    pub fn clear_output(&mut self) {
        self.reset_output();
    }

    /// Pure projection of the current state for rendering.
    pub fn status_view(&self) -> StatusView {
        StatusView {
            status: self.state.status,
            note: self.state.note.clone(),
            result: self.state.last_result.clone(),
            error_text: self.state.error_text.clone(),
        }
    }

    /// Submit the current editor content for execution and await the outcome.
    ///
    /// Empty (after trimming) source and an already-outstanding request are
    /// rejected before any network action. Every completion path clears
    /// `in_flight` and persists the submitted source under the current
    /// language key; remote and transport failures are converted into the
    /// Failure status rather than propagated.
    pub async fn submit(&mut self, stdin: &str) -> Result<StatusView, SessionError> {
        if self.state.in_flight {
            return Err(SessionError::AlreadyRunning);
        }
        let source = self.editor.text().trim().to_string();
        if source.is_empty() {
            self.state.note = Some(SessionError::EmptyInput.to_string());
            return Err(SessionError::EmptyInput);
        }

        self.state.status = Status::Running;
        self.state.in_flight = true;
        self.state.last_result = None;
        self.state.error_text = None;
        self.state.note = None;

        let request = ExecutionRequest {
            language: self.profile.execution_id.to_string(),
            version: self.profile.version_selector.to_string(),
            source: source.clone(),
            stdin: stdin.to_string(),
        };

        let start = Instant::now();
        let outcome = self.client.execute(&request).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        self.state.in_flight = false;
        self.store
            .set(&languages::storage_key(self.profile.key), &source);

        match outcome {
            Ok(run) => self.apply_run(run, elapsed_ms),
            Err(e) => {
                self.state.status = Status::Failure;
                self.state.last_result = None;
                self.state.error_text = Some(e.to_string());
            }
        }
        Ok(self.status_view())
    }

    /// Classify a structurally valid response.
    fn apply_run(&mut self, run: RunOutput, elapsed_ms: u64) {
        let result = ExecutionResult {
            stdout: run.stdout,
            stderr: run.stderr,
            exit_code: run.code,
            elapsed_ms,
            timestamp_utc: now_rfc3339(),
        };
        if !result.stderr.is_empty() {
            self.state.status = Status::Failure;
        } else if result.exit_code == Some(0) {
            self.state.status = Status::Success;
        } else {
            // Third bucket: the program wrote nothing to stderr but did not
            // exit zero. Reported as informational, neither success nor failure.
            self.state.status = Status::Idle;
            self.state.note = Some(match result.exit_code {
                Some(code) => format!("finished with exit code {code}"),
                None => "finished with unknown exit code".to_string(),
            });
        }
        self.state.last_result = Some(result);
    }

    fn reset_output(&mut self) {
        self.state.status = Status::Idle;
        self.state.note = None;
        self.state.last_result = None;
        self.state.error_text = None;
    }
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "now".into())
}
