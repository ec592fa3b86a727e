use std::process::Stdio;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::types::{Message, PermissionMode, QueryOptions};
use crate::{ClaudeAgentError, Result};

// ─── ClaudeProcess ────────────────────────────────────────────────────────

/// A running `claude --output-format stream-json --input-format stream-json`
/// subprocess.
///
/// The prompt goes in as one JSON user message on stdin; responses come back
/// as JSONL on stdout. Stderr is drained in the background and attached to
/// the error when the process exits non-zero.
///
/// The child is spawned with `kill_on_drop`, so dropping a `ClaudeProcess`
/// always terminates the agent.
pub(crate) struct ClaudeProcess {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
    stdin: Option<ChildStdin>,
    stderr_buf: Arc<Mutex<String>>,
}

impl ClaudeProcess {
    /// Spawn the `claude` binary, send `prompt`, then close stdin.
    ///
    /// `CLAUDECODE` is removed from the environment so the agent can be
    /// launched from inside another Claude session.
    pub(crate) async fn spawn(prompt: &str, opts: &QueryOptions) -> Result<Self> {
        let mut cmd = build_command(opts);
        cmd.env_remove("CLAUDECODE");

        let mut process = Self::from_command(cmd)?;

        let user_msg = serde_json::json!({
            "type": "user",
            "message": {
                "role": "user",
                "content": [{"type": "text", "text": prompt}]
            }
        });
        process.send_message(&user_msg).await?;
        process.close_stdin();

        Ok(process)
    }

    /// Spawn an arbitrary command as a mock Claude process.
    #[cfg(test)]
    pub(crate) fn spawn_command(cmd: Command) -> Result<Self> {
        Self::from_command(cmd)
    }

    fn from_command(mut cmd: Command) -> Result<Self> {
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            let exe = cmd.as_std().get_program().to_string_lossy().into_owned();
            ClaudeAgentError::Process(format!("failed to start `{exe}`: {e}"))
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClaudeAgentError::Process("stdout not captured".into()))?;

        let stdin = child.stdin.take();

        let stderr_buf = Arc::new(Mutex::new(String::new()));
        if let Some(stderr) = child.stderr.take() {
            let buf = Arc::clone(&stderr_buf);
            tokio::spawn(async move {
                let mut reader = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = reader.next_line().await {
                    if let Ok(mut b) = buf.lock() {
                        if !b.is_empty() {
                            b.push('\n');
                        }
                        b.push_str(&line);
                    }
                }
            });
        }

        Ok(Self {
            child,
            lines: BufReader::new(stdout).lines(),
            stdin,
            stderr_buf,
        })
    }

    async fn send_message(&mut self, msg: &serde_json::Value) -> Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| ClaudeAgentError::Process("stdin already closed".into()))?;

        let mut buf = serde_json::to_vec(msg).map_err(|e| {
            ClaudeAgentError::Process(format!("failed to serialize stdin message: {e}"))
        })?;
        buf.push(b'\n');

        stdin.write_all(&buf).await?;
        stdin.flush().await?;
        Ok(())
    }

    fn close_stdin(&mut self) {
        self.stdin.take();
    }

    /// Read the next non-empty JSONL line from stdout and deserialize it.
    ///
    /// Lines with a `type` this crate does not model (e.g. `user` or
    /// `rate_limit_event`) are skipped. Returns `Ok(None)` on EOF.
    pub(crate) async fn next_message(&mut self) -> Result<Option<Message>> {
        loop {
            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<Message>(trimmed) {
                Ok(msg) => return Ok(Some(msg)),
                Err(e) => {
                    if is_unknown_message_type(trimmed) {
                        tracing::trace!(line = trimmed, "skipping unmodelled message");
                        continue;
                    }
                    return Err(ClaudeAgentError::Parse {
                        line: trimmed.to_owned(),
                        source: e,
                    });
                }
            }
        }
    }

    /// Wait for the child to exit; `Some(error)` when it failed, carrying
    /// whatever it wrote to stderr.
    pub(crate) async fn wait_exit_error(&mut self) -> Option<ClaudeAgentError> {
        let status = match self.child.wait().await {
            Ok(s) => s,
            Err(e) => return Some(ClaudeAgentError::Io(e)),
        };

        if status.success() {
            return None;
        }

        let stderr = self
            .stderr_buf
            .lock()
            .ok()
            .map(|b| b.clone())
            .unwrap_or_default();

        let head = match status.code() {
            Some(code) => format!("Claude Code process exited with code {code}"),
            None => "Claude Code process terminated by signal".to_string(),
        };
        let msg = if stderr.is_empty() {
            head
        } else {
            format!("{head}\nstderr: {stderr}")
        };
        Some(ClaudeAgentError::Process(msg))
    }

    /// Kill the subprocess. Errors (already exited) are ignored.
    pub(crate) async fn kill(&mut self) {
        let _ = self.child.kill().await;
    }
}

const MODELLED_TYPES: &[&str] = &["system", "assistant", "result"];

/// Valid JSON whose `"type"` is not one of ours is an unmodelled message,
/// not a protocol error. A modelled type that fails to parse still is one.
fn is_unknown_message_type(line: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(str::to_owned))
        .is_some_and(|t| !MODELLED_TYPES.contains(&t.as_str()))
}

// ─── Command builder ──────────────────────────────────────────────────────

pub(crate) fn build_command(opts: &QueryOptions) -> Command {
    let exe = opts.path_to_executable.as_deref().unwrap_or("claude");
    let mut cmd = Command::new(exe);

    cmd.arg("--output-format")
        .arg("stream-json")
        .arg("--verbose")
        .arg("--input-format")
        .arg("stream-json");

    if let Some(model) = &opts.model {
        cmd.arg("--model").arg(model);
    }

    if let Some(max_turns) = opts.max_turns {
        cmd.arg("--max-turns").arg(max_turns.to_string());
    }

    if opts.permission_mode != PermissionMode::Default {
        cmd.arg("--permission-mode")
            .arg(opts.permission_mode.as_str());
    }

    if let Some(cwd) = &opts.cwd {
        cmd.current_dir(cwd);
    }

    // The prompt is sent over stdin, never as a positional argument.
    cmd
}
