//! `claude-agent`: native Rust driver for the Claude CLI subprocess.
//!
//! Implements the `--output-format stream-json` protocol so POMASA can hand a
//! generation job to Claude and relay its progress without a Node.js runtime.
//!
//! # Architecture
//!
//! ```text
//! QueryOptions
//!     │
//!     ▼
//! ClaudeProcess   ← spawns `claude --output-format stream-json …`
//!     │              prompt on stdin, JSONL from stdout
//!     ▼
//! QueryStream     ← implements futures::Stream<Item = Result<Message>>
//!     │              background task + mpsc channel
//!     ▼
//! Message enum    ← system / assistant / result (other types skipped)
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use claude_agent::{query, Message, PermissionMode, QueryOptions};
//! use futures::StreamExt;
//!
//! let opts = QueryOptions {
//!     cwd: Some("/research/heat-mas".into()),
//!     permission_mode: PermissionMode::AcceptEdits,
//!     ..Default::default()
//! };
//!
//! let mut stream = query("Create the agents described in user_input.md.", opts);
//! while let Some(msg) = stream.next().await {
//!     if let Message::Result(r) = msg? {
//!         println!("{}", r.result.unwrap_or_default());
//!     }
//! }
//! ```

pub mod error;
pub mod types;

pub(crate) mod process;
pub mod stream;


pub use error::ClaudeAgentError;
pub use stream::QueryStream;
pub use types::{
    AssistantContent, AssistantMessage, ContentBlock, Message, PermissionMode, QueryOptions,
    ResultMessage, ResultSubtype, SystemMessage,
};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClaudeAgentError>;

/// Drive a single agentic query against the Claude CLI.
///
/// The returned [`QueryStream`] ends after the first [`Message::Result`] or
/// when the process exits. Dropping it kills the process.
pub fn query(prompt: impl Into<String>, opts: QueryOptions) -> QueryStream {
    QueryStream::new(prompt.into(), opts)
}
