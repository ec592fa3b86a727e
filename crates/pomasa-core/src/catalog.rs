use crate::error::{PomasaError, Result};
use crate::paths;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::SystemTime;

// ---------------------------------------------------------------------------
// Category / Necessity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Cor,
    Str,
    Bhv,
    Qua,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cor => "COR",
            Category::Str => "STR",
            Category::Bhv => "BHV",
            Category::Qua => "QUA",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "COR" => Some(Category::Cor),
            "STR" => Some(Category::Str),
            "BHV" => Some(Category::Bhv),
            "QUA" => Some(Category::Qua),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strongly a pattern is recommended. `Required` patterns cannot be
/// deselected; `Recommended` ones start selected; `Optional` ones start off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Necessity {
    Required,
    Recommended,
    Optional,
}

impl Necessity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Necessity::Required => "Required",
            Necessity::Recommended => "Recommended",
            Necessity::Optional => "Optional",
        }
    }

    /// Whether the wizard pre-selects patterns of this level.
    pub fn selected_by_default(&self) -> bool {
        !matches!(self, Necessity::Optional)
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Required" => Some(Necessity::Required),
            "Recommended" => Some(Necessity::Recommended),
            "Optional" => Some(Necessity::Optional),
            _ => None,
        }
    }
}

impl std::fmt::Display for Necessity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    /// Canonical id, e.g. `COR-01`.
    pub id: String,
    pub name: String,
    pub category: Category,
    pub necessity: Necessity,
    pub description: String,
    /// Detail document for this pattern inside the catalog directory.
    pub file_path: PathBuf,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn row_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\|\s*(COR|STR|BHV|QUA)-(\d+)\s*\|\s*\[([^\]]+)\]\([^)]+\)\s*\|\s*(Required|Recommended|Optional)\s*\|\s*([^|]+)\|",
        )
        .expect("pattern row regex is valid")
    })
}

fn candidate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*\|\s*(COR|STR|BHV|QUA)-").expect("candidate row regex is valid")
    })
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex is valid"))
}

/// Left-pad the numeric suffix of an id to at least two digits.
fn canonical_id(prefix: &str, number: &str) -> String {
    format!("{prefix}-{number:0>2}")
}

/// File name of a pattern's detail document: `{id}-{lower-cased, hyphenated name}.md`.
pub fn pattern_file_name(id: &str, name: &str) -> String {
    let slug = whitespace_regex().replace_all(&name.to_lowercase(), "-").into_owned();
    format!("{id}-{slug}.md")
}

/// Extract every pattern row from catalog markdown.
///
/// Lines that do not have the four-column shape are skipped without error.
/// Later rows repeating an id already seen are dropped.
pub fn parse_catalog(text: &str, patterns_dir: &Path) -> Vec<Pattern> {
    let mut patterns: Vec<Pattern> = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let Some(caps) = row_regex().captures(line) else {
            if candidate_regex().is_match(line) {
                tracing::debug!(line = lineno + 1, "skipping malformed pattern row");
            }
            continue;
        };

        let (Some(category), Some(necessity)) =
            (Category::from_tag(&caps[1]), Necessity::from_label(&caps[4]))
        else {
            continue;
        };
        let id = canonical_id(&caps[1], &caps[2]);
        if patterns.iter().any(|p| p.id == id) {
            tracing::warn!(id = %id, line = lineno + 1, "duplicate pattern id in catalog");
            continue;
        }

        let name = caps[3].trim().to_string();
        let file_path = patterns_dir.join(pattern_file_name(&id, &name));
        patterns.push(Pattern {
            id,
            name,
            category,
            necessity,
            description: caps[5].trim().to_string(),
            file_path,
        });
    }

    patterns
}

/// Read and parse `patterns/README.md` under `data_dir`.
pub fn load_catalog(data_dir: &Path) -> Result<Vec<Pattern>> {
    let path = paths::catalog_path(data_dir);
    let text = std::fs::read_to_string(&path)
        .map_err(|_| PomasaError::CatalogUnavailable(path.display().to_string()))?;
    Ok(parse_catalog(&text, &paths::patterns_dir(data_dir)))
}

pub fn find<'a>(catalog: &'a [Pattern], id: &str) -> Option<&'a Pattern> {
    catalog.iter().find(|p| p.id == id)
}

/// Read the detail document of one pattern.
pub fn load_pattern_document(pattern: &Pattern) -> Result<String> {
    std::fs::read_to_string(&pattern.file_path)
        .map_err(|_| PomasaError::Unreadable(pattern.file_path.display().to_string()))
}

/// Ids selected by default in the wizard: every Required and Recommended pattern.
pub fn default_selection(catalog: &[Pattern]) -> Vec<String> {
    catalog
        .iter()
        .filter(|p| p.necessity.selected_by_default())
        .map(|p| p.id.clone())
        .collect()
}

/// Normalize a user selection: drop repeats (first occurrence wins), then
/// append every Required pattern the caller left out, in catalog order.
pub fn enforce_required(catalog: &[Pattern], selected: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(selected.len());
    for id in selected {
        if !out.contains(id) {
            out.push(id.clone());
        }
    }
    for p in catalog.iter().filter(|p| p.necessity == Necessity::Required) {
        if !out.contains(&p.id) {
            tracing::info!(id = %p.id, "re-adding deselected required pattern");
            out.push(p.id.clone());
        }
    }
    out
}

// ---------------------------------------------------------------------------
// CatalogCache
// ---------------------------------------------------------------------------

struct CachedCatalog {
    path: PathBuf,
    modified: SystemTime,
    len: u64,
    patterns: Arc<Vec<Pattern>>,
}

/// Parsed catalog shared between requests, re-parsed only when the README's
/// modification time or size changes.
#[derive(Default)]
pub struct CatalogCache {
    inner: Mutex<Option<CachedCatalog>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, data_dir: &Path) -> Result<Arc<Vec<Pattern>>> {
        let path = paths::catalog_path(data_dir);
        let unavailable = || PomasaError::CatalogUnavailable(path.display().to_string());
        let meta = std::fs::metadata(&path).map_err(|_| unavailable())?;
        let modified = meta.modified().map_err(|_| unavailable())?;
        let len = meta.len();

        {
            let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = guard.as_ref() {
                if cached.path == path && cached.modified == modified && cached.len == len {
                    return Ok(Arc::clone(&cached.patterns));
                }
            }
        }

        let patterns = Arc::new(load_catalog(data_dir)?);
        tracing::debug!(count = patterns.len(), "pattern catalog parsed");
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(CachedCatalog {
            path,
            modified,
            len,
            patterns: Arc::clone(&patterns),
        });
        Ok(patterns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    const CATALOG: &str = "\
# POMASA Patterns

## Core

| ID | Pattern | Necessity | Description |
|----|---------|-----------|-------------|
| COR-1 | [Foo Pattern](COR-01-foo-pattern.md) | Required | desc |
| COR-02 | [Agent  Blueprint](COR-02-agent-blueprint.md) | Recommended | Blueprint per agent |

## Quality

| ID | Pattern | Necessity | Description |
|----|---------|-----------|-------------|
| QUA-3 | [Self Review](QUA-03.md) | Optional |   Reviews its own output   |
| QUA-4 | Missing Link | Optional | no markdown link |
| XYZ-1 | [Unknown](x.md) | Required | bad category |
| STR-1 | [Pipeline](s.md) | Mandatory | bad necessity |
";

    fn dir() -> PathBuf {
        PathBuf::from("/data/patterns")
    }

    #[test]
    fn parses_spec_example_row() {
        let patterns = parse_catalog(
            "| COR-1 | [Foo Pattern](x.md) | Required | desc |",
            &dir(),
        );
        assert_eq!(patterns.len(), 1);
        let p = &patterns[0];
        assert_eq!(p.id, "COR-01");
        assert_eq!(p.name, "Foo Pattern");
        assert_eq!(p.category, Category::Cor);
        assert_eq!(p.necessity, Necessity::Required);
        assert_eq!(p.description, "desc");
        assert_eq!(p.file_path, dir().join("COR-01-foo-pattern.md"));
    }

    #[test]
    fn skips_rows_with_the_wrong_shape() {
        let patterns = parse_catalog(CATALOG, &dir());
        let ids: Vec<_> = patterns.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["COR-01", "COR-02", "QUA-03"]);
    }

    #[test]
    fn trims_description_and_collapses_whitespace_in_file_name() {
        let patterns = parse_catalog(CATALOG, &dir());
        assert_eq!(patterns[2].description, "Reviews its own output");
        assert_eq!(
            patterns[1].file_path,
            dir().join("COR-02-agent-blueprint.md")
        );
    }

    #[test]
    fn ids_of_three_digits_are_not_truncated() {
        let patterns = parse_catalog("| BHV-123 | [Big](b.md) | Optional | d |", &dir());
        assert_eq!(patterns[0].id, "BHV-123");
    }

    #[test]
    fn duplicate_ids_keep_the_first_row() {
        let text = "| STR-1 | [First](a.md) | Optional | a |\n| STR-01 | [Second](b.md) | Required | b |";
        let patterns = parse_catalog(text, &dir());
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].name, "First");
    }

    #[test]
    fn empty_document_yields_no_patterns() {
        assert!(parse_catalog("", &dir()).is_empty());
        assert!(parse_catalog("# Title\n\nJust prose.", &dir()).is_empty());
    }

    #[test]
    fn pattern_serializes_with_camel_case_file_path() {
        let patterns = parse_catalog("| COR-1 | [Foo](x.md) | Required | d |", &dir());
        let json = serde_json::to_value(&patterns[0]).unwrap();
        assert_eq!(json["category"], "COR");
        assert_eq!(json["necessity"], "Required");
        assert_eq!(json["filePath"], "/data/patterns/COR-01-foo.md");
    }

    #[test]
    fn load_catalog_fails_when_readme_missing() {
        let tmp = TempDir::new().unwrap();
        let err = load_catalog(tmp.path()).unwrap_err();
        assert!(matches!(err, PomasaError::CatalogUnavailable(_)));
    }

    #[test]
    fn default_selection_excludes_optional() {
        let patterns = parse_catalog(CATALOG, &dir());
        assert_eq!(default_selection(&patterns), ["COR-01", "COR-02"]);
    }

    #[test]
    fn enforce_required_appends_missing_required() {
        let patterns = parse_catalog(CATALOG, &dir());
        let selected = vec!["QUA-03".to_string(), "QUA-03".to_string()];
        assert_eq!(enforce_required(&patterns, &selected), ["QUA-03", "COR-01"]);
    }

    #[test]
    fn enforce_required_keeps_unknown_ids() {
        let patterns = parse_catalog(CATALOG, &dir());
        let selected = vec!["COR-01".to_string(), "EXT-9".to_string()];
        assert_eq!(enforce_required(&patterns, &selected), ["COR-01", "EXT-9"]);
    }

    #[test]
    fn cache_reparses_after_modification() {
        let tmp = TempDir::new().unwrap();
        let readme = tmp.path().join("patterns/README.md");
        std::fs::create_dir_all(readme.parent().unwrap()).unwrap();
        std::fs::write(&readme, "| COR-1 | [Foo](x.md) | Required | d |\n").unwrap();

        let cache = CatalogCache::new();
        let first = cache.get(tmp.path()).unwrap();
        assert_eq!(first.len(), 1);
        let again = cache.get(tmp.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        std::fs::write(
            &readme,
            "| COR-1 | [Foo](x.md) | Required | d |\n| COR-2 | [Bar](y.md) | Optional | e |\n",
        )
        .unwrap();
        let file = std::fs::File::options().write(true).open(&readme).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();

        let updated = cache.get(tmp.path()).unwrap();
        assert_eq!(updated.len(), 2);
    }

    #[test]
    fn cache_reports_unavailable_catalog() {
        let tmp = TempDir::new().unwrap();
        let cache = CatalogCache::new();
        assert!(matches!(
            cache.get(tmp.path()),
            Err(PomasaError::CatalogUnavailable(_))
        ));
    }
}
