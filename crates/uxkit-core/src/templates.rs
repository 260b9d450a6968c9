//! Built-in markdown templates for research artifacts.
//!
//! Templates use `{{name}}` placeholders. `uxkit init` copies the built-ins
//! into `.uxkit/templates/` so a project can edit them; rendering prefers the
//! project copy and falls back to the built-in text.

use crate::error::{Result, UxkitError};
use crate::{io, paths};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Questions,
    Sources,
    Summary,
    Interview,
    Synthesis,
}

impl TemplateKind {
    pub fn all() -> &'static [TemplateKind] {
        &[
            TemplateKind::Questions,
            TemplateKind::Sources,
            TemplateKind::Summary,
            TemplateKind::Interview,
            TemplateKind::Synthesis,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::Questions => "questions",
            TemplateKind::Sources => "sources",
            TemplateKind::Summary => "summary",
            TemplateKind::Interview => "interview",
            TemplateKind::Synthesis => "synthesis",
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            TemplateKind::Questions => "questions-template.md",
            TemplateKind::Sources => "sources-template.md",
            TemplateKind::Summary => "summary-template.md",
            TemplateKind::Interview => "interview-template.md",
            TemplateKind::Synthesis => "synthesis-template.md",
        }
    }

    pub fn builtin(self) -> &'static str {
        match self {
            TemplateKind::Questions => QUESTIONS_TEMPLATE,
            TemplateKind::Sources => SOURCES_TEMPLATE,
            TemplateKind::Summary => SUMMARY_TEMPLATE,
            TemplateKind::Interview => INTERVIEW_TEMPLATE,
            TemplateKind::Synthesis => SYNTHESIS_TEMPLATE,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TemplateKind {
    type Err = UxkitError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TemplateKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UxkitError::UnknownTemplate(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

fn placeholder_re() -> &'static Regex {
    PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*\}\}").unwrap())
}

/// Substitute `{{name}}` placeholders. Unknown placeholders are left intact.
pub fn render_str(template: &str, vars: &BTreeMap<&str, String>) -> String {
    placeholder_re()
        .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
            Some(v) => v.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Load the project override for `kind`, or the built-in text.
pub fn load(root: &Path, kind: TemplateKind) -> Result<String> {
    let override_path = paths::templates_dir(root).join(kind.filename());
    match io::read_optional(&override_path)? {
        Some(text) => Ok(text),
        None => Ok(kind.builtin().to_string()),
    }
}

pub fn render(root: &Path, kind: TemplateKind, vars: &BTreeMap<&str, String>) -> Result<String> {
    Ok(render_str(&load(root, kind)?, vars))
}

/// Write every built-in template into `.uxkit/templates/` unless already present.
/// Returns the filenames that were created.
pub fn install_defaults(root: &Path) -> Result<Vec<&'static str>> {
    let dir = paths::templates_dir(root);
    io::ensure_dir(&dir)?;
    let mut created = Vec::new();
    for kind in TemplateKind::all() {
        if io::write_if_missing(&dir.join(kind.filename()), kind.builtin().as_bytes())? {
            created.push(kind.filename());
        }
    }
    Ok(created)
}

// ---------------------------------------------------------------------------
// Built-in templates
// ---------------------------------------------------------------------------

const QUESTIONS_TEMPLATE: &str = r#"# Research Questions: {{topic}}

**Study:** {{study_name}} (`{{study_id}}`)
**Generated:** {{date}}

## Objective

Understand {{topic}} from the participant's point of view.

## Questions

{{questions}}

## Notes

- Keep questions open-ended; avoid leading language.
- Probe for concrete past behaviour rather than hypotheticals.
"#;

const SOURCES_TEMPLATE: &str = r#"# Research Sources

**Study:** {{study_name}} (`{{study_id}}`)
**Collected:** {{date}}
**Count:** {{count}}

## Sources

{{sources}}
"#;

const SUMMARY_TEMPLATE: &str = r#"# Source Summary: {{source_id}}

**Study:** {{study_name}} (`{{study_id}}`)
**Source:** {{source}}
**Summarized:** {{date}}

## Key Points

{{excerpt}}

## Relevance

_Describe how this source relates to the study's research questions._
"#;

const INTERVIEW_TEMPLATE: &str = r#"# Interview: {{participant}}

**Study:** {{study_name}} (`{{study_id}}`)
**Processed:** {{date}}
**Transcript:** {{transcript_path}} ({{word_count}} words)

## Observations

_Record notable quotes, behaviours and pain points._

## Transcript

{{transcript}}
"#;

const SYNTHESIS_TEMPLATE: &str = r#"# Research Synthesis

**Study:** {{study_name}} (`{{study_id}}`)
**Synthesized:** {{date}}
**Focus:** {{focus}}

## Inputs

{{inputs}}

## Themes

_Group related observations into themes._

## Insights

_State each insight with the evidence that supports it._

## Recommendations

_List the design changes these insights suggest._
"#;
