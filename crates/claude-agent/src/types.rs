use serde::Deserialize;
use std::path::PathBuf;

// ─── Messages ─────────────────────────────────────────────────────────────

/// The stream-json lines a creation run acts on, discriminated by `"type"`.
///
/// Every other `type` (`user`, `tool_progress`, `rate_limit_event`, ...) is
/// skipped by the process reader.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    System(SystemMessage),
    Assistant(AssistantMessage),
    Result(ResultMessage),
}

/// `system` lines; only `init` carries anything useful.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemMessage {
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    pub message: AssistantContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantContent {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    /// Only the tool name is shown; inputs differ per tool and are ignored.
    ToolUse {
        name: String,
    },
    /// `thinking`, `redacted_thinking` and anything newer.
    #[serde(other)]
    Other,
}

// ─── Result ───────────────────────────────────────────────────────────────

/// `result`: the terminal message of every run.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultMessage {
    pub subtype: ResultSubtype,
    #[serde(default)]
    pub session_id: String,
    /// Set by the CLI when a `success` run still ended in an API error.
    #[serde(default)]
    pub is_error: bool,
    /// Final assistant text; present on `success`.
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub num_turns: u32,
    #[serde(default)]
    pub total_cost_usd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSubtype {
    Success,
    ErrorDuringExecution,
    ErrorMaxTurns,
    ErrorMaxBudgetUsd,
    #[serde(other)]
    OtherError,
}

impl ResultSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultSubtype::Success => "success",
            ResultSubtype::ErrorDuringExecution => "error_during_execution",
            ResultSubtype::ErrorMaxTurns => "error_max_turns",
            ResultSubtype::ErrorMaxBudgetUsd => "error_max_budget_usd",
            ResultSubtype::OtherError => "error",
        }
    }
}

impl ResultMessage {
    /// True for every error subtype, and for a `success` flagged `is_error`.
    pub fn is_error(&self) -> bool {
        self.is_error || self.subtype != ResultSubtype::Success
    }
}

// ─── QueryOptions ─────────────────────────────────────────────────────────

/// How the `claude` subprocess is launched.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Passed as `--model` when set.
    pub model: Option<String>,
    /// Passed as `--max-turns`; the run then ends with `error_max_turns`.
    pub max_turns: Option<u32>,
    pub permission_mode: PermissionMode,
    /// Working directory of the agent.
    pub cwd: Option<PathBuf>,
    /// Path to the `claude` binary (default: `"claude"` on PATH)
    pub path_to_executable: Option<String>,
}

/// Controls how tool executions are authorized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PermissionMode {
    /// The CLI's own default; no flag is passed.
    #[default]
    Default,
    /// Auto-accept file edits
    AcceptEdits,
}

impl PermissionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionMode::Default => "default",
            PermissionMode::AcceptEdits => "acceptEdits",
        }
    }
}
