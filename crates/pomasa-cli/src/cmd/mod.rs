pub mod create;
pub mod patterns;
pub mod render;
pub mod tree;
pub mod ui;

use anyhow::{Context, Result};
use pomasa_core::catalog::{self, Pattern};
use pomasa_core::user_input::UserInput;
use std::path::Path;

/// Read a `UserInput` from a `.json` file, or YAML for any other extension.
pub fn load_user_input(path: &Path) -> Result<UserInput> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read input file {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let input = if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON in {}", path.display()))?
    } else {
        serde_yaml::from_str(&text)
            .with_context(|| format!("invalid YAML in {}", path.display()))?
    };
    Ok(input)
}

/// Split `--patterns COR-01,STR-02` into ids.
pub fn parse_pattern_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Load the catalog, logging instead of failing when it is unavailable.
pub fn catalog_or_warn(data_dir: &Path) -> Option<Vec<Pattern>> {
    match catalog::load_catalog(data_dir) {
        Ok(c) => Some(c),
        Err(e) => {
            tracing::warn!("{e}; Required patterns will not be enforced");
            None
        }
    }
}

/// Explicit `--patterns`, or the catalog's default selection.
pub fn selection(explicit: Option<&str>, catalog: Option<&[Pattern]>) -> Vec<String> {
    match explicit {
        Some(raw) => parse_pattern_list(raw),
        None => catalog.map(catalog::default_selection).unwrap_or_default(),
    }
}
