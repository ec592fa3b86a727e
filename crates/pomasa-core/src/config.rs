use crate::error::Result;
use crate::{io, paths};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

fn default_port() -> u16 {
    3001
}

fn default_open_browser() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            open_browser: default_open_browser(),
        }
    }
}

// ---------------------------------------------------------------------------
// AgentConfig
// ---------------------------------------------------------------------------

/// How the external coding agent is launched for a creation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub model: Option<String>,
    /// Path to the `claude` binary; `None` means look it up on `PATH`.
    #[serde(default)]
    pub executable: Option<String>,
    #[serde(default)]
    pub max_turns: Option<u32>,
    #[serde(default = "default_timeout_minutes")]
    pub timeout_minutes: u64,
}

fn default_timeout_minutes() -> u64 {
    60
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: None,
            executable: None,
            max_turns: None,
            timeout_minutes: default_timeout_minutes(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

impl Config {
    /// Load `pomasa.yaml` from the data directory. A missing file yields the
    /// defaults; a malformed one is an error.
    pub fn load(data_dir: &Path) -> Result<Self> {
        match io::read_optional(&paths::config_path(data_dir))? {
            Some(data) => Ok(serde_yaml::from_str(&data)?),
            None => Ok(Self::default()),
        }
    }

    /// Check for settings that load fine but cannot work at runtime.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.agent.timeout_minutes == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "agent.timeout_minutes is 0: every creation run would time out \
                          immediately"
                    .to_string(),
            });
        }

        if let Some(exe) = &self.agent.executable {
            if exe.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "agent.executable is empty; remove it to use `claude` from PATH"
                        .to_string(),
                });
            }
        }

        if self.agent.max_turns == Some(0) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "agent.max_turns is 0: the agent will stop before doing any work"
                    .to_string(),
            });
        }

        warnings
    }
}
