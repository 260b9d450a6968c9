use crate::error::{Result, UxkitError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const UXKIT_DIR: &str = ".uxkit";
pub const STUDIES_DIR: &str = ".uxkit/studies";
pub const TEMPLATES_DIR: &str = ".uxkit/templates";
pub const MEMORY_DIR: &str = ".uxkit/memory";

pub const CONFIG_FILE: &str = ".uxkit/config.yaml";

pub const CODEX_PROMPTS_DIR: &str = ".codex/prompts";

pub const STUDY_MANIFEST: &str = "study.yaml";
pub const QUESTIONS_MD: &str = "questions.md";
pub const SOURCES_MD: &str = "sources.md";
pub const SYNTHESIS_MD: &str = "synthesis.md";
pub const RAW_SOURCES_DIR: &str = "sources";
pub const SUMMARIES_DIR: &str = "summaries";
pub const INTERVIEWS_DIR: &str = "interviews";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn uxkit_dir(root: &Path) -> PathBuf {
    root.join(UXKIT_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn studies_dir(root: &Path) -> PathBuf {
    root.join(STUDIES_DIR)
}

pub fn templates_dir(root: &Path) -> PathBuf {
    root.join(TEMPLATES_DIR)
}

pub fn study_dir(root: &Path, id: &str) -> PathBuf {
    studies_dir(root).join(id)
}

pub fn study_manifest(root: &Path, id: &str) -> PathBuf {
    study_dir(root, id).join(STUDY_MANIFEST)
}

pub fn questions_path(root: &Path, id: &str) -> PathBuf {
    study_dir(root, id).join(QUESTIONS_MD)
}

pub fn sources_path(root: &Path, id: &str) -> PathBuf {
    study_dir(root, id).join(SOURCES_MD)
}

pub fn raw_sources_dir(root: &Path, id: &str) -> PathBuf {
    study_dir(root, id).join(RAW_SOURCES_DIR)
}

pub fn summary_path(root: &Path, id: &str, source_id: &str) -> PathBuf {
    study_dir(root, id)
        .join(SUMMARIES_DIR)
        .join(format!("{source_id}.md"))
}

pub fn interview_path(root: &Path, id: &str, participant: &str) -> PathBuf {
    study_dir(root, id)
        .join(INTERVIEWS_DIR)
        .join(format!("{participant}.md"))
}

pub fn synthesis_path(root: &Path, id: &str) -> PathBuf {
    study_dir(root, id).join(SYNTHESIS_MD)
}

pub fn codex_prompts_dir(root: &Path) -> PathBuf {
    root.join(CODEX_PROMPTS_DIR)
}

/// Path relative to the project root, for display in messages.
pub fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(UxkitError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

/// Derive a slug from free text: lowercase, alphanumerics kept, every other
/// run of characters collapsed to a single hyphen.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug.truncate(64);
    slug.trim_end_matches('-').to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
