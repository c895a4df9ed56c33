use crate::editor::BufferEditor;
use crate::languages;
use crate::model::{RunConfig, Status, StatusView};
use crate::session::SessionController;
use crate::storage::{CodeStore, FileCodeStore, MemoryCodeStore};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;

/// Output routing for the stdout/stderr writer: the program's captured
/// streams go to our matching streams, diagnostics to stderr.
enum OutputChunk {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputChunk>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputChunk>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = stdout.lock();
        let mut err = stderr.lock();

        while let Some(chunk) = rx.blocking_recv() {
            match chunk {
                OutputChunk::Stdout(text) => {
                    let _ = write!(out, "{}", text);
                }
                OutputChunk::Stderr(text) => {
                    let _ = write!(err, "{}", text);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "codepad",
    version,
    about = "Run code snippets through a remote Piston-compatible execution service"
)]
pub struct Cli {
    /// Source file to run; falls back to saved or example code when omitted
    pub file: Option<std::path::PathBuf>,

    /// Language key (see --list-languages)
    #[arg(short, long, default_value = languages::DEFAULT_LANGUAGE)]
    pub language: String,

    /// Base URL of the execution service
    #[arg(long, default_value = "https://emkc.org/api/v2/piston")]
    pub base_url: String,

    /// Text fed to the program's standard input
    #[arg(long, default_value = "")]
    pub stdin: String,

    /// Read the program's standard input from a file (overrides --stdin)
    #[arg(long)]
    pub stdin_file: Option<std::path::PathBuf>,

    /// Per-request timeout
    #[arg(long, default_value = "30s")]
    pub timeout: humantime::Duration,

    /// Print the run outcome as JSON instead of the text rendering
    #[arg(long)]
    pub json: bool,

    /// Ignore saved code and run the bundled example
    #[arg(long)]
    pub example: bool,

    /// Use --auto-save true or --auto-save false to override
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub auto_save: bool,

    /// List supported languages and exit
    #[arg(long)]
    pub list_languages: bool,
}

/// Build a `RunConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> RunConfig {
    RunConfig {
        base_url: args.base_url.clone(),
        request_timeout: Duration::from(args.timeout),
        user_agent: format!("codepad-cli/{}", env!("CARGO_PKG_VERSION")),
    }
}

/// Run the CLI and return the process exit code.
pub async fn run(args: Cli) -> Result<i32> {
    if args.list_languages {
        for p in languages::profiles() {
            println!("{:<12} {:<10} (version {})", p.key, p.display_file_name, p.version_selector);
        }
        return Ok(0);
    }

    let cfg = build_config(&args);
    let store: Box<dyn CodeStore> = if args.auto_save {
        Box::new(FileCodeStore::new().context("failed to open the code store")?)
    } else {
        Box::new(MemoryCodeStore::default())
    };

    let mut controller =
        SessionController::new(&cfg, &args.language, BufferEditor::default(), store)
            .with_context(|| {
                format!(
                    "failed to start a session for language '{}'",
                    args.language
                )
            })?;

    if let Some(path) = args.file.as_deref() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        controller.set_source(&text);
    } else if args.example {
        controller.load_example();
    }

    let stdin_text = match args.stdin_file.as_deref() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => args.stdin.clone(),
    };

    let (out_tx, out_handle) = spawn_output_writer();

    if !args.json {
        let profile = controller.current_profile();
        let _ = out_tx.send(OutputChunk::Stderr(format!(
            "Running {} ({})...\n",
            profile.display_file_name, profile.key
        )));
    }

    let exit_code = match controller.submit(&stdin_text).await {
        Ok(view) => {
            if args.json {
                let _ = out_tx.send(OutputChunk::Stdout(format!(
                    "{}\n",
                    serde_json::to_string_pretty(&view)?
                )));
            } else {
                render_text(&view, &out_tx);
            }
            match view.status {
                Status::Failure => 1,
                _ => 0,
            }
        }
        // EmptyInput / AlreadyRunning: recovered locally, no request issued.
        Err(e) => {
            let _ = out_tx.send(OutputChunk::Stderr(format!("{e}\n")));
            2
        }
    };

    drop(out_tx);
    let _ = out_handle.await;
    Ok(exit_code)
}

/// Text rendering: captured stdout to stdout, captured stderr (or the
/// failure reason) to stderr, then a status line with the elapsed time.
fn render_text(view: &StatusView, out_tx: &mpsc::UnboundedSender<OutputChunk>) {
    if let Some(result) = view.result.as_ref() {
        let mut stdout_text = result.display_stdout().to_string();
        if !stdout_text.ends_with('\n') {
            stdout_text.push('\n');
        }
        let _ = out_tx.send(OutputChunk::Stdout(stdout_text));
        if !result.stderr.is_empty() {
            let mut stderr_text = result.stderr.clone();
            if !stderr_text.ends_with('\n') {
                stderr_text.push('\n');
            }
            let _ = out_tx.send(OutputChunk::Stderr(stderr_text));
        }
    } else if let Some(reason) = view.error_text.as_deref() {
        let _ = out_tx.send(OutputChunk::Stderr(format!("{reason}\n")));
    }

    let _ = out_tx.send(OutputChunk::Stderr(format!("{}\n", status_line(view))));
}

/// Human-readable status line for the end of a run.
fn status_line(view: &StatusView) -> String {
    let elapsed = view
        .elapsed_ms()
        .map(|ms| format!(" (~{ms} ms)"))
        .unwrap_or_default();
    match view.status {
        Status::Success => format!("Execution finished successfully{elapsed}"),
        Status::Failure => format!("Execution finished with errors{elapsed}"),
        Status::Running => "Running".to_string(),
        Status::Idle => match view.note.as_deref() {
            Some(note) => format!("{note}{elapsed}"),
            None => "Idle".to_string(),
        },
    }
}
