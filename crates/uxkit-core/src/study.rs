use crate::error::{Result, UxkitError};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Study
// ---------------------------------------------------------------------------

/// A research study: one directory under `.uxkit/studies/<id>/` holding a
/// `study.yaml` manifest plus the generated research artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Study {
    /// Sequence-prefixed slug, e.g. `003-checkout-flow`.
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Study {
    fn new(id: String, slug: String, name: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            slug,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(
        root: &Path,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self> {
        if !paths::uxkit_dir(root).is_dir() {
            return Err(UxkitError::NotInitialized);
        }

        let name = name.into();
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(UxkitError::InvalidName("name must not be empty".into()));
        }

        let slug = paths::slugify(&name);
        paths::validate_slug(&slug)?;

        let existing = Self::list(root)?;
        if existing.iter().any(|s| s.slug == slug) {
            return Err(UxkitError::StudyExists(slug));
        }

        let next_seq = existing
            .iter()
            .filter_map(|s| sequence_number(&s.id))
            .max()
            .unwrap_or(0)
            + 1;
        let id = format!("{next_seq:03}-{slug}");

        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let study = Self::new(id, slug, name, description);
        study.save(root)?;
        tracing::info!(study = %study.id, "created study");
        Ok(study)
    }

    /// Resolve a study by full id, slug, the name it was created with, or
    /// numeric prefix (`3` or `003`).
    pub fn load(root: &Path, key: &str) -> Result<Self> {
        if paths::validate_slug(key).is_ok() {
            let manifest = paths::study_manifest(root, key);
            if manifest.exists() {
                return Self::read_manifest(&manifest);
            }
        }

        let wanted_slug = paths::slugify(key);
        let wanted_seq = key.parse::<u32>().ok();
        Self::list(root)?
            .into_iter()
            .find(|s| {
                s.slug == key
                    || (!wanted_slug.is_empty() && s.slug == wanted_slug)
                    || s.name.eq_ignore_ascii_case(key.trim())
                    || (wanted_seq.is_some() && sequence_number(&s.id) == wanted_seq)
            })
            .ok_or_else(|| UxkitError::StudyNotFound(key.to_string()))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::study_manifest(root, &self.id);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let studies_dir = paths::studies_dir(root);
        if !studies_dir.exists() {
            return Ok(Vec::new());
        }

        let mut studies = Vec::new();
        for entry in std::fs::read_dir(&studies_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let manifest = entry.path().join(paths::STUDY_MANIFEST);
            if !manifest.exists() {
                tracing::warn!(dir = %entry.path().display(), "skipping study dir without manifest");
                continue;
            }
            studies.push(Self::read_manifest(&manifest)?);
        }
        studies.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(studies)
    }

    /// Remove the study directory and everything in it.
    pub fn delete(root: &Path, key: &str) -> Result<Self> {
        let study = Self::load(root, key)?;
        std::fs::remove_dir_all(study.base_path(root))?;
        tracing::info!(study = %study.id, "deleted study");
        Ok(study)
    }

    pub fn base_path(&self, root: &Path) -> PathBuf {
        paths::study_dir(root, &self.id)
    }

    /// Each research artifact a study can hold, paired with whether it exists.
    pub fn artifacts(&self, root: &Path) -> Vec<(&'static str, bool)> {
        let base = self.base_path(root);
        [
            paths::QUESTIONS_MD,
            paths::SOURCES_MD,
            paths::SUMMARIES_DIR,
            paths::INTERVIEWS_DIR,
            paths::SYNTHESIS_MD,
        ]
        .into_iter()
        .map(|name| (name, base.join(name).exists()))
        .collect()
    }

    pub fn touch(&mut self, root: &Path) -> Result<()> {
        self.updated_at = Utc::now();
        self.save(root)
    }

    fn read_manifest(manifest: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(manifest)?;
        Ok(serde_yaml::from_str(&data)?)
    }
}

fn sequence_number(id: &str) -> Option<u32> {
    id.split_once('-').and_then(|(seq, _)| seq.parse().ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(paths::STUDIES_DIR)).unwrap();
        dir
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let dir = project();
        let a = Study::create(dir.path(), "Onboarding Flow", None).unwrap();
        let b = Study::create(dir.path(), "Checkout", Some("  mobile  ".into())).unwrap();
        assert_eq!(a.id, "001-onboarding-flow");
        assert_eq!(b.id, "002-checkout");
        assert_eq!(b.description.as_deref(), Some("mobile"));
        assert!(paths::study_manifest(dir.path(), &b.id).exists());
    }

    #[test]
    fn create_requires_init() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Study::create(dir.path(), "x", None),
            Err(UxkitError::NotInitialized)
        ));
    }

    #[test]
    fn create_rejects_duplicates_and_blank_names() {
        let dir = project();
        Study::create(dir.path(), "Search", None).unwrap();
        assert!(matches!(
            Study::create(dir.path(), "search", None),
            Err(UxkitError::StudyExists(_))
        ));
        assert!(matches!(
            Study::create(dir.path(), "   ", None),
            Err(UxkitError::InvalidName(_))
        ));
        assert!(matches!(
            Study::create(dir.path(), "???", None),
            Err(UxkitError::InvalidSlug(_))
        ));
    }

    #[test]
    fn load_by_id_slug_or_number() {
        let dir = project();
        Study::create(dir.path(), "Alpha", None).unwrap();
        let beta = Study::create(dir.path(), "Beta", None).unwrap();

        assert_eq!(Study::load(dir.path(), "002-beta").unwrap().id, beta.id);
        assert_eq!(Study::load(dir.path(), "beta").unwrap().id, beta.id);
        assert_eq!(Study::load(dir.path(), "2").unwrap().id, beta.id);
        assert_eq!(Study::load(dir.path(), "002").unwrap().id, beta.id);
        assert!(matches!(
            Study::load(dir.path(), "gamma"),
            Err(UxkitError::StudyNotFound(_))
        ));
    }

    #[test]
    fn load_by_created_name() {
        let dir = project();
        let s = Study::create(dir.path(), "Checkout Flow", None).unwrap();

        assert_eq!(Study::load(dir.path(), "Checkout Flow").unwrap().id, s.id);
        assert_eq!(Study::load(dir.path(), "checkout flow").unwrap().id, s.id);
        assert!(matches!(
            Study::load(dir.path(), "../001-checkout-flow"),
            Err(UxkitError::StudyNotFound(_))
        ));
    }

    #[test]
    fn delete_removes_directory() {
        let dir = project();
        let s = Study::create(dir.path(), "Gone Soon", None).unwrap();
        let base = s.base_path(dir.path());
        assert!(base.is_dir());
        Study::delete(dir.path(), "gone-soon").unwrap();
        assert!(!base.exists());
        assert!(Study::list(dir.path()).unwrap().is_empty());
    }
}
