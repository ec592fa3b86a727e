use std::path::{Path, PathBuf};

/// Directory name the framework data conventionally lives under.
const DATA_DIR_NAME: &str = "data";

fn is_data_dir(dir: &Path) -> bool {
    dir.join(pomasa_core::paths::GENERATOR_FILE).is_file()
}

/// Resolve the framework data directory.
///
/// Priority:
/// 1. `--data-dir` flag / `POMASA_DATA_DIR` env var (passed in as `explicit`)
/// 2. Walk upward from `start` looking for a directory with `generator.md`,
///    either the directory itself or its `data/` child
/// 3. Fall back to `start/data`
pub fn resolve_data_dir(explicit: Option<&Path>, start: &Path) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let mut dir = Some(start);
    while let Some(d) = dir {
        if is_data_dir(d) {
            return d.to_path_buf();
        }
        let nested = d.join(DATA_DIR_NAME);
        if is_data_dir(&nested) {
            return nested;
        }
        dir = d.parent();
    }

    start.join(DATA_DIR_NAME)
}

/// [`resolve_data_dir`] starting from the current directory.
pub fn resolve_from_cwd(explicit: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_data_dir(explicit, &cwd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn framework(dir: &Path) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join("generator.md"), "# Generator").unwrap();
    }

    #[test]
    fn explicit_dir_wins() {
        let dir = TempDir::new().unwrap();
        framework(&dir.path().join("data"));
        let other = TempDir::new().unwrap();
        let result = resolve_data_dir(Some(other.path()), dir.path());
        assert_eq!(result, other.path());
    }

    #[test]
    fn finds_data_child_from_a_subdirectory() {
        let dir = TempDir::new().unwrap();
        framework(&dir.path().join("data"));
        let deep = dir.path().join("web/server");
        std::fs::create_dir_all(&deep).unwrap();
        assert_eq!(resolve_data_dir(None, &deep), dir.path().join("data"));
    }

    #[test]
    fn start_inside_data_dir() {
        let dir = TempDir::new().unwrap();
        framework(dir.path());
        assert_eq!(resolve_data_dir(None, dir.path()), dir.path());
    }

    #[test]
    fn falls_back_to_data_under_start() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_data_dir(None, dir.path()), dir.path().join("data"));
    }
}
