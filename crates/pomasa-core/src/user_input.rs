use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const NONE: &str = "None";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFile {
    pub path: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Simple,
    #[default]
    Standard,
    Strict,
}

impl QualityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Simple => "simple",
            QualityLevel::Standard => "standard",
            QualityLevel::Strict => "strict",
        }
    }
}

/// Everything the wizard collects about the MAS to generate.
///
/// Never persisted as-is: it is rendered into `user_input.md`, which is what
/// the agent reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInput {
    pub blueprint_language: String,
    pub report_language: String,
    pub project_id: String,
    pub research_topic: String,
    pub initial_ideas: String,
    pub data_sources: String,
    pub references: Vec<ReferenceFile>,
    pub analysis_methods: String,
    pub report_format: String,
    pub report_structure: String,
    pub quality_level: QualityLevel,
    pub pattern_overrides: String,
    pub other_requirements: String,
}

impl Default for UserInput {
    fn default() -> Self {
        Self {
            blueprint_language: "English".to_string(),
            report_language: "English".to_string(),
            project_id: String::new(),
            research_topic: String::new(),
            initial_ideas: String::new(),
            data_sources: String::new(),
            references: Vec::new(),
            analysis_methods: String::new(),
            report_format: String::new(),
            report_structure: String::new(),
            quality_level: QualityLevel::default(),
            pattern_overrides: String::new(),
            other_requirements: String::new(),
        }
    }
}

fn or_none(value: &str) -> &str {
    if value.trim().is_empty() {
        NONE
    } else {
        value
    }
}

impl UserInput {
    /// Drop later references whose path repeats an earlier one.
    pub fn dedup_references(&mut self) {
        let mut seen: Vec<String> = Vec::with_capacity(self.references.len());
        self.references.retain(|r| {
            if seen.contains(&r.path) {
                false
            } else {
                seen.push(r.path.clone());
                true
            }
        });
    }

    fn references_block(&self) -> String {
        if self.references.is_empty() {
            return NONE.to_string();
        }
        self.references
            .iter()
            .map(|r| {
                if r.description.is_empty() {
                    format!("- {}", r.path)
                } else {
                    format!("- {} - {}", r.path, r.description)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the input document the generator instructions expect.
    ///
    /// Section order and headings are fixed; any empty value is written as
    /// `None` so no section is ever blank.
    pub fn render(&self, selected_patterns: &[String]) -> String {
        let selected = if selected_patterns.is_empty() {
            NONE.to_string()
        } else {
            selected_patterns.join(", ")
        };

        let mut doc = String::new();
        // Writing into a String cannot fail.
        let _ = write!(
            doc,
            "# User Input

## Language Settings

**Agent Blueprint Language**: {blueprint}

**Report Output Language**: {report}

---

## Research Project Basic Information

**Project Identifier**: {project_id}

**Research Topic and Core Questions**:

{topic}

**Initial Ideas and Insights**:

{ideas}

---

## Data Collection

**Data Sources**:

{sources}

**Existing Reference Materials**:

{references}

---

## Analysis Methods

**Analysis Methods**:

{methods}

---

## Output Format

**Report Format**:

{format}

**Report Structure**:

{structure}

---

## Pattern Selection

**Quality Assurance Level**: {quality}

**Selected Patterns**: {selected}

**Other Patterns to Enable or Disable**:

{overrides}

---

## Other Requirements

{other}
",
            blueprint = or_none(&self.blueprint_language),
            report = or_none(&self.report_language),
            project_id = or_none(&self.project_id),
            topic = or_none(&self.research_topic),
            ideas = or_none(&self.initial_ideas),
            sources = or_none(&self.data_sources),
            references = self.references_block(),
            methods = or_none(&self.analysis_methods),
            format = or_none(&self.report_format),
            structure = or_none(&self.report_structure),
            quality = self.quality_level.as_str(),
            selected = selected,
            overrides = or_none(&self.pattern_overrides),
            other = or_none(&self.other_requirements),
        );
        doc
    }
}
