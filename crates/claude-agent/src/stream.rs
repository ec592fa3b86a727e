use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::process::ClaudeProcess;
use crate::types::{Message, QueryOptions};
use crate::Result;

// ─── QueryStream ──────────────────────────────────────────────────────────

/// An async stream of [`Message`]s from a Claude subprocess.
///
/// Backed by a Tokio mpsc channel. A background task owns the
/// [`ClaudeProcess`] and forwards messages until the terminal `Result`
/// message or process exit. Dropping the `QueryStream` closes the channel;
/// the background task notices immediately, even while the agent is silent,
/// and kills the subprocess.
///
/// ```rust,ignore
/// use claude_agent::{query, Message, QueryOptions};
/// use futures::StreamExt;
///
/// let mut stream = query("say hello", QueryOptions::default());
/// while let Some(msg) = stream.next().await {
///     if let Ok(Message::Result(r)) = msg {
///         println!("result: {:?}", r.result);
///     }
/// }
/// ```
pub struct QueryStream {
    rx: mpsc::Receiver<Result<Message>>,
}

impl QueryStream {
    pub(crate) fn new(prompt: String, opts: QueryOptions) -> Self {
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            match ClaudeProcess::spawn(&prompt, &opts).await {
                Ok(process) => pump(process, tx).await,
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                }
            }
        });

        QueryStream { rx }
    }

    /// Wrap an already-running mock process.
    #[cfg(test)]
    pub(crate) fn from_process(process: ClaudeProcess) -> Self {
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(pump(process, tx));
        QueryStream { rx }
    }
}

/// Forward messages from `process` into `tx` until a `Result` message, EOF,
/// an error, or the receiver going away. The process is always killed on
/// the way out.
async fn pump(mut process: ClaudeProcess, tx: mpsc::Sender<Result<Message>>) {
    let mut got_result = false;
    loop {
        let next = tokio::select! {
            _ = tx.closed() => {
                tracing::debug!("query stream dropped, stopping agent");
                process.kill().await;
                return;
            }
            next = process.next_message() => next,
        };

        match next {
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                break;
            }
            Ok(None) => break,
            Ok(Some(msg)) => {
                let is_terminal = matches!(msg, Message::Result(_));
                got_result |= is_terminal;
                if tx.send(Ok(msg)).await.is_err() || is_terminal {
                    break;
                }
            }
        }
    }

    // Exited without a Result: surface a non-zero exit code and stderr.
    if !got_result && !tx.is_closed() {
        if let Some(exit_err) = process.wait_exit_error().await {
            let _ = tx.send(Err(exit_err)).await;
        }
    }

    process.kill().await;
}

impl Stream for QueryStream {
    type Item = Result<Message>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
