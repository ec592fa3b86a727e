use crate::catalog::{self, Pattern};
use crate::error::{PomasaError, Result};
use crate::user_input::UserInput;
use crate::{io, paths};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Body of a MAS creation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationRequest {
    #[serde(default)]
    pub target_dir: String,
    #[serde(default)]
    pub mas_name: String,
    #[serde(default)]
    pub user_input: UserInput,
    #[serde(default)]
    pub selected_patterns: Vec<String>,
}

/// A request that passed validation and has its input document on disk.
#[derive(Debug, Clone)]
pub struct PreparedCreation {
    pub mas_path: PathBuf,
    pub selected_patterns: Vec<String>,
    /// Contents written to `user_input.md`.
    pub document: String,
    /// Full prompt handed to the agent.
    pub prompt: String,
}

impl CreationRequest {
    pub fn validate(&self) -> Result<()> {
        if self.target_dir.trim().is_empty() {
            return Err(PomasaError::MissingField("targetDir"));
        }
        let name = self.mas_name.trim();
        if name.is_empty() {
            return Err(PomasaError::MissingField("masName"));
        }
        if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
            return Err(PomasaError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    /// `targetDir/masName`, with `~` expanded in the target.
    pub fn mas_path(&self) -> PathBuf {
        paths::expand_home(self.target_dir.trim()).join(self.mas_name.trim())
    }

    /// Validate, check for a collision, then write `user_input.md` into a
    /// freshly created project directory and compose the agent prompt.
    ///
    /// Nothing is written unless validation and the collision check pass.
    /// When `catalog` is given, Required patterns missing from the selection
    /// are added back.
    pub fn prepare(
        &self,
        data_dir: &Path,
        catalog: Option<&[Pattern]>,
    ) -> Result<PreparedCreation> {
        self.validate()?;

        let mas_path = self.mas_path();
        if std::fs::symlink_metadata(&mas_path).is_ok() {
            return Err(PomasaError::AlreadyExists(mas_path.display().to_string()));
        }

        let generator_path = paths::generator_path(data_dir);
        let generator = std::fs::read_to_string(&generator_path).map_err(|_| {
            PomasaError::InstructionsUnavailable(generator_path.display().to_string())
        })?;

        let selected_patterns =
            catalog::enforce_required(catalog.unwrap_or_default(), &self.selected_patterns);

        let mut input = self.user_input.clone();
        input.dedup_references();
        let document = input.render(&selected_patterns);

        claim_dir(&mas_path)?;
        io::atomic_write(&paths::user_input_path(&mas_path), document.as_bytes())?;

        let prompt = compose_prompt(
            &generator,
            &paths::patterns_dir(data_dir),
            &document,
            &mas_path,
        );

        Ok(PreparedCreation {
            mas_path,
            selected_patterns,
            document,
            prompt,
        })
    }
}

/// Create `mas_path` itself with a single `create_dir`, so of several racing
/// requests for the same name exactly one wins.
fn claim_dir(mas_path: &Path) -> Result<()> {
    if let Some(parent) = mas_path.parent() {
        io::ensure_dir(parent)?;
    }
    std::fs::create_dir(mas_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::AlreadyExists => {
            PomasaError::AlreadyExists(mas_path.display().to_string())
        }
        _ => PomasaError::Io(e),
    })
}

/// Prompt asking the agent to build a MAS from the generator instructions and
/// the rendered input document.
pub fn compose_prompt(
    generator: &str,
    patterns_dir: &Path,
    document: &str,
    mas_path: &Path,
) -> String {
    format!(
        "Please read the generator instructions and create a MAS (Multi-Agent System).

## Generator Instructions

{generator}

## POMASA Framework Location

The POMASA pattern catalog is located at: {patterns}

## User Input

{document}

## Target Directory

Create the MAS in: {mas}

Please create all necessary files (agents/, references/, data/ directories and their contents) according to the generator instructions and user input.",
        patterns = patterns_dir.display(),
        mas = mas_path.display(),
    )
}
