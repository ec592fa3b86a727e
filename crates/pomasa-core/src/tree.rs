use crate::error::{PomasaError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Entry names never shown in a tree, in addition to dotfiles.
pub const IGNORED_NAMES: &[&str] = &["node_modules", "__pycache__"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    #[serde(serialize_with = "lossy_path")]
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    pub fn is_dir(&self) -> bool {
        self.node_type == NodeType::Directory
    }
}

/// Summary of a MAS directory as shown by the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasInfo {
    pub name: String,
    #[serde(serialize_with = "lossy_path")]
    pub path: PathBuf,
    pub tree: Vec<FileNode>,
}

/// JSON strings must be UTF-8; odd bytes are shown as U+FFFD instead of
/// failing the whole response.
fn lossy_path<S>(path: &Path, ser: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    ser.serialize_str(&path.to_string_lossy())
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || IGNORED_NAMES.contains(&name)
}

struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Directories first, then case-insensitive by name with a case-sensitive
/// tie-break so the order is total.
fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.path.cmp(&b.path))
}

fn unreadable(path: &Path) -> PomasaError {
    PomasaError::Unreadable(path.display().to_string())
}

/// Recursively list `root`. Symlinks are reported as files and never followed.
pub fn build_tree(root: &Path) -> Result<Vec<FileNode>> {
    let meta = std::fs::metadata(root).map_err(|_| unreadable(root))?;
    if !meta.is_dir() {
        return Err(PomasaError::NotADirectory(root.display().to_string()));
    }
    list_dir(root)
}

fn list_dir(dir: &Path) -> Result<Vec<FileNode>> {
    let mut entries: Vec<Entry> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|_| unreadable(dir))? {
        let entry = entry.map_err(|_| unreadable(dir))?;
        // Lossy only for display; the real path is kept for I/O.
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            continue;
        }
        let path = entry.path();
        let is_dir = entry
            .file_type()
            .map(|ft| ft.is_dir())
            .map_err(|_| unreadable(&path))?;
        entries.push(Entry { name, path, is_dir });
    }
    entries.sort_by(compare_entries);

    entries
        .into_iter()
        .map(|Entry { name, path, is_dir }| {
            let (node_type, children) = if is_dir {
                (NodeType::Directory, Some(list_dir(&path)?))
            } else {
                (NodeType::File, None)
            };
            Ok(FileNode {
                name,
                path,
                node_type,
                children,
            })
        })
        .collect()
}

/// Build the browser view of a MAS directory: its base name, path and tree.
pub fn describe_dir(root: &Path) -> Result<MasInfo> {
    let tree = build_tree(root)?;
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    Ok(MasInfo {
        name,
        path: root.to_path_buf(),
        tree,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "x").unwrap();
    }

    fn names(nodes: &[FileNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_keep_their_real_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "user_input.md");
        let odd_dir = dir.path().join(OsStr::from_bytes(b"data\xff"));
        std::fs::create_dir(&odd_dir).unwrap();
        std::fs::write(odd_dir.join("raw.csv"), "x").unwrap();
        let odd_file = dir.path().join(OsStr::from_bytes(b"notes\xfe.md"));
        std::fs::write(&odd_file, "x").unwrap();

        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree[0].name, "data\u{FFFD}");
        assert_eq!(tree[0].path, odd_dir);
        let children = tree[0].children.as_ref().unwrap();
        assert_eq!(children[0].path, odd_dir.join("raw.csv"));

        let file = tree.iter().find(|n| n.path == odd_file).unwrap();
        assert_eq!(file.name, "notes\u{FFFD}.md");
        assert!(std::fs::read(&file.path).is_ok());

        let json = serde_json::to_value(describe_dir(dir.path()).unwrap()).unwrap();
        assert_eq!(json["tree"][0]["name"], "data\u{FFFD}");
    }

    #[test]
    fn directories_sort_before_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.md");
        touch(dir.path(), "zeta/one.md");
        touch(dir.path(), "Beta/two.md");
        touch(dir.path(), "B.txt");

        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(names(&tree), ["Beta", "zeta", "a.md", "B.txt"]);
        assert!(tree[0].is_dir());
        assert!(!tree[2].is_dir());
        assert!(tree[2].children.is_none());
    }

    #[test]
    fn case_insensitive_with_stable_tie_break() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "readme.md");
        touch(dir.path(), "README.md");
        touch(dir.path(), "Agents.md");

        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(names(&tree), ["Agents.md", "README.md", "readme.md"]);
    }

    #[test]
    fn hidden_and_ignored_entries_are_skipped_at_every_depth() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".git/config");
        touch(dir.path(), ".env");
        touch(dir.path(), "node_modules/pkg/index.js");
        touch(dir.path(), "agents/.DS_Store");
        touch(dir.path(), "agents/__pycache__/x.pyc");
        touch(dir.path(), "agents/01_collector.md");

        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(names(&tree), ["agents"]);
        let children = tree[0].children.as_ref().unwrap();
        assert_eq!(names(children), ["01_collector.md"]);
    }

    #[test]
    fn nodes_carry_full_paths() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "data/raw/source.csv");

        let tree = build_tree(dir.path()).unwrap();
        let raw = &tree[0].children.as_ref().unwrap()[0];
        let file = &raw.children.as_ref().unwrap()[0];
        assert_eq!(file.path, dir.path().join("data/raw/source.csv"));
    }

    #[test]
    fn empty_directory_has_empty_children() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("references")).unwrap();
        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(tree[0].children.as_deref(), Some(&[][..]));
    }

    #[test]
    fn missing_root_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let err = build_tree(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, PomasaError::Unreadable(_)));
    }

    #[test]
    fn file_root_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "file.md");
        let err = build_tree(&dir.path().join("file.md")).unwrap_err();
        assert!(matches!(err, PomasaError::NotADirectory(_)));
    }

    #[test]
    fn serializes_type_and_omits_file_children() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "agents/a.md");
        touch(dir.path(), "user_input.md");

        let json = serde_json::to_value(build_tree(dir.path()).unwrap()).unwrap();
        assert_eq!(json[0]["type"], "directory");
        assert!(json[0]["children"].is_array());
        assert_eq!(json[1]["type"], "file");
        assert!(json[1].get("children").is_none());
    }

    #[test]
    fn describe_dir_uses_base_name() {
        let dir = TempDir::new().unwrap();
        let mas = dir.path().join("my-mas");
        touch(&mas, "user_input.md");
        let info = describe_dir(&mas).unwrap();
        assert_eq!(info.name, "my-mas");
        assert_eq!(info.path, mas);
        assert_eq!(info.tree.len(), 1);
    }
}
