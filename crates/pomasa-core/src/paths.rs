use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Data directory layout
// ---------------------------------------------------------------------------

pub const PATTERNS_DIR: &str = "patterns";
pub const CATALOG_FILE: &str = "patterns/README.md";
pub const GENERATOR_FILE: &str = "generator.md";
pub const TEMPLATE_FILE: &str = "user_input_template.md";
pub const CONFIG_FILE: &str = "pomasa.yaml";

/// Name of the rendered input document written into every new MAS.
pub const USER_INPUT_FILE: &str = "user_input.md";

pub fn patterns_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(PATTERNS_DIR)
}

pub fn catalog_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CATALOG_FILE)
}

pub fn generator_path(data_dir: &Path) -> PathBuf {
    data_dir.join(GENERATOR_FILE)
}

pub fn template_path(data_dir: &Path) -> PathBuf {
    data_dir.join(TEMPLATE_FILE)
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

pub fn user_input_path(mas_path: &Path) -> PathBuf {
    mas_path.join(USER_INPUT_FILE)
}

/// Expand a leading `~` or `~/` to the user's home directory.
///
/// Paths typed by hand in the browser often start with `~`; anything else is
/// returned unchanged, as is `~` when no home directory can be determined.
pub fn expand_home(raw: &str) -> PathBuf {
    let rest = if raw == "~" {
        Some("")
    } else {
        raw.strip_prefix("~/")
    };
    match (rest, home::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}
