//! Runs one MAS generation job and turns the agent's messages into the
//! events streamed back to the browser.

use claude_agent::{
    ContentBlock, Message, PermissionMode, QueryOptions, ResultMessage, ResultSubtype,
};
use futures::{Stream, StreamExt};
use pomasa_core::config::AgentConfig;
use pomasa_core::creation::PreparedCreation;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// Capacity of the per-request event channel.
pub const EVENT_BUFFER: usize = 64;

const COMPLETED_BANNER: &str = "\n--- Completed ---\n";

/// One server-sent event of a creation run.
///
/// A run emits any number of `output` / `error` events followed by exactly
/// one `done`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CreateEvent {
    Output {
        content: String,
    },
    Error {
        content: String,
    },
    Done {
        code: i32,
        #[serde(rename = "masPath")]
        mas_path: PathBuf,
    },
}

/// How a relay ended.
enum RelayEnd {
    Completed,
    Failed(String),
    Disconnected,
}

/// Agent options for a run inside `mas_path`.
pub fn agent_options(mas_path: &Path, agent: &AgentConfig) -> QueryOptions {
    QueryOptions {
        model: agent.model.clone(),
        max_turns: agent.max_turns,
        permission_mode: PermissionMode::AcceptEdits,
        cwd: Some(mas_path.to_path_buf()),
        path_to_executable: agent.executable.clone(),
    }
}

/// Output events for one assistant message, in block order.
fn assistant_output(blocks: Vec<ContentBlock>) -> impl Iterator<Item = CreateEvent> {
    blocks.into_iter().filter_map(|block| match block {
        ContentBlock::Text { text } => Some(CreateEvent::Output { content: text }),
        ContentBlock::ToolUse { name, .. } => Some(CreateEvent::Output {
            content: format!("[Tool: {name}]\n"),
        }),
        ContentBlock::Other => None,
    })
}

/// Error text for a result that reports failure.
fn failure_message(r: &ResultMessage) -> String {
    if r.subtype == ResultSubtype::Success {
        // A `success` run flagged `is_error` carries the API error as its result.
        return match r.result.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => format!("agent reported an error: {text}"),
            _ => "agent reported an error without details".to_string(),
        };
    }
    let mut content = format!("agent finished with {}", r.subtype.as_str());
    if !r.errors.is_empty() {
        content.push_str(": ");
        content.push_str(&r.errors.join("; "));
    }
    content
}

async fn relay<S>(stream: S, tx: &mpsc::Sender<CreateEvent>) -> RelayEnd
where
    S: Stream<Item = claude_agent::Result<Message>>,
{
    let mut stream = std::pin::pin!(stream);
    while let Some(item) = stream.next().await {
        let msg = match item {
            Ok(msg) => msg,
            Err(e) => return RelayEnd::Failed(e.to_string()),
        };
        match msg {
            Message::Assistant(a) => {
                for event in assistant_output(a.message.content) {
                    if tx.send(event).await.is_err() {
                        return RelayEnd::Disconnected;
                    }
                }
            }
            Message::System(s) => {
                tracing::debug!(
                    session_id = %s.session_id,
                    model = s.model.as_deref().unwrap_or("default"),
                    "agent system message: {}",
                    s.subtype
                );
            }
            Message::Result(r) if r.is_error() => return RelayEnd::Failed(failure_message(&r)),
            Message::Result(r) => {
                tracing::debug!(
                    session_id = %r.session_id,
                    turns = r.num_turns,
                    cost_usd = r.total_cost_usd,
                    "agent reported success"
                );
                let banner = CreateEvent::Output {
                    content: COMPLETED_BANNER.to_string(),
                };
                if tx.send(banner).await.is_err() {
                    return RelayEnd::Disconnected;
                }
                return RelayEnd::Completed;
            }
        }
    }
    RelayEnd::Failed("agent exited without reporting a result".to_string())
}

/// Relay `stream` into `tx`, then send the closing `done`.
///
/// Gives up on the agent when `timeout` elapses or the receiver is dropped;
/// in both cases `stream` is dropped, which stops the agent process.
/// Returns the exit code sent in `done`, or `None` if the client went away.
pub async fn forward<S>(
    stream: S,
    tx: mpsc::Sender<CreateEvent>,
    mas_path: PathBuf,
    timeout: Duration,
) -> Option<i32>
where
    S: Stream<Item = claude_agent::Result<Message>>,
{
    let end = tokio::select! {
        _ = tx.closed() => RelayEnd::Disconnected,
        end = tokio::time::timeout(timeout, relay(stream, &tx)) => match end {
            Ok(end) => end,
            Err(_) => RelayEnd::Failed(format!(
                "agent did not finish within {}s and was stopped",
                timeout.as_secs()
            )),
        },
    };

    let code = match end {
        RelayEnd::Completed => 0,
        RelayEnd::Failed(content) => {
            tracing::error!(mas_path = %mas_path.display(), "creation failed: {content}");
            if tx.send(CreateEvent::Error { content }).await.is_err() {
                return None;
            }
            1
        }
        RelayEnd::Disconnected => return None,
    };

    tx.send(CreateEvent::Done { code, mas_path }).await.ok()?;
    Some(code)
}

/// Start the agent for a prepared creation and return the event receiver.
///
/// Dropping the receiver cancels the run.
pub fn spawn_creation(
    prepared: PreparedCreation,
    agent: &AgentConfig,
) -> mpsc::Receiver<CreateEvent> {
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let opts = agent_options(&prepared.mas_path, agent);
    let timeout = Duration::from_secs(agent.timeout_minutes.saturating_mul(60));
    let run_id = uuid::Uuid::new_v4();

    tokio::spawn(async move {
        tracing::info!(
            %run_id,
            mas_path = %prepared.mas_path.display(),
            patterns = prepared.selected_patterns.len(),
            "creation started"
        );
        let stream = claude_agent::query(prepared.prompt, opts);
        match forward(stream, tx, prepared.mas_path, timeout).await {
            Some(code) => tracing::info!(%run_id, code, "creation finished"),
            None => tracing::info!(%run_id, "client disconnected, creation stopped"),
        }
    });

    rx
}
