//! Backend that performs slash commands against a `.uxkit/` project on disk.

use super::backend::{
    CommandBackend, ExecResult, ExecutionError, InterviewArgs, QuestionsArgs, SourcesArgs,
    StudyCreateArgs, StudyDeleteArgs, StudyListArgs, StudyShowArgs, SummarizeArgs,
    SynthesizeArgs,
};
use crate::error::UxkitError;
use crate::study::Study;
use crate::{paths, research};
use std::path::{Component, Path, PathBuf};

/// Transcript extensions looked up under a study's `sources/` directory.
const TRANSCRIPT_EXTENSIONS: &[&str] = &["txt", "md"];

/// A participant names a transcript directly under `sources/`, so it must be a
/// single plain path component.
fn participant_stem(participant: &str) -> Result<&str, UxkitError> {
    let mut components = Path::new(participant).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !participant.contains(['/', '\\']) => Ok(participant),
        _ => Err(UxkitError::InvalidParticipant(participant.to_string())),
    }
}

#[derive(Debug, Clone)]
pub struct WorkspaceBackend {
    root: PathBuf,
}

impl WorkspaceBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn rel(&self, path: &Path) -> String {
        paths::display_relative(&self.root, path)
    }

    fn artifact_status(&self, study: &Study) -> Vec<String> {
        study
            .artifacts(&self.root)
            .into_iter()
            .map(|(name, present)| {
                let mark = if present { "x" } else { " " };
                format!("[{mark}] {name}")
            })
            .collect()
    }
}

impl CommandBackend for WorkspaceBackend {
    fn research_questions(&self, a: &QuestionsArgs) -> ExecResult {
        let art = research::generate_questions(&self.root, &a.study, &a.topic, a.count as usize)?;
        Ok(format!("{}\nFile: {}", art.message, self.rel(&art.file_path)))
    }

    fn research_sources(&self, a: &SourcesArgs) -> ExecResult {
        let keywords: Vec<String> = a
            .keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .take(a.limit as usize)
            .map(|k| format!("search: {k}"))
            .collect();
        let art = research::collect_sources(&self.root, &a.study, &keywords, true)?;
        Ok(format!("{}\nFile: {}", art.message, self.rel(&art.file_path)))
    }

    fn research_summarize(&self, a: &SummarizeArgs) -> ExecResult {
        let study = Study::load(&self.root, &a.study)?;
        let sources = research::read_sources(&self.root, &study.id)?;
        if sources.is_empty() {
            return Err(ExecutionError::Failed(format!(
                "study '{}' has no sources; run /research:sources first",
                study.id
            )));
        }
        let mut lines = vec![format!(
            "Summarized {} source(s) for '{}' (length: {})",
            sources.len(),
            study.name,
            a.length
        )];
        for source in &sources {
            let art = research::summarize_source(&self.root, &study.id, &source.id)?;
            lines.push(format!("- {}", self.rel(&art.file_path)));
        }
        Ok(lines.join("\n"))
    }

    fn research_interview(&self, a: &InterviewArgs) -> ExecResult {
        let stem = participant_stem(&a.participant)?;
        let study = Study::load(&self.root, &a.study)?;
        let raw = paths::raw_sources_dir(&self.root, &study.id);
        let transcript = TRANSCRIPT_EXTENSIONS
            .iter()
            .map(|ext| raw.join(format!("{stem}.{ext}")))
            .find(|p| p.is_file())
            .ok_or_else(|| {
                UxkitError::TranscriptNotFound(format!("{}/{stem}.txt", self.rel(&raw)))
            })?;
        let art = research::process_interview(&self.root, &study.id, &transcript, &a.participant)?;
        Ok(format!("{}\nFile: {}", art.message, self.rel(&art.file_path)))
    }

    fn research_synthesize(&self, a: &SynthesizeArgs) -> ExecResult {
        let art = research::synthesize_insights(&self.root, &a.study, Some(a.insights.as_str()))?;
        Ok(format!("{}\nFile: {}", art.message, self.rel(&art.file_path)))
    }

    fn study_create(&self, a: &StudyCreateArgs) -> ExecResult {
        let study = Study::create(&self.root, &a.name, Some(a.description.clone()))?;
        Ok(format!(
            "Study created successfully: {}\nPath: {}",
            study.id,
            self.rel(&study.base_path(&self.root))
        ))
    }

    fn study_list(&self, a: &StudyListArgs) -> ExecResult {
        let filter = a.filter.as_deref().map(str::to_lowercase);
        let studies: Vec<Study> = Study::list(&self.root)?
            .into_iter()
            .filter(|s| match &filter {
                Some(f) => s.id.contains(f.as_str()) || s.name.to_lowercase().contains(f.as_str()),
                None => true,
            })
            .collect();

        let mut out = format!("Studies listed successfully ({} found)", studies.len());
        for s in &studies {
            out.push_str(&format!("\n- {} — {}", s.id, s.name));
        }
        Ok(out)
    }

    fn study_show(&self, a: &StudyShowArgs) -> ExecResult {
        let study = Study::load(&self.root, &a.name)?;
        let mut out = format!("Study: {} — {}", study.id, study.name);
        if let Some(desc) = &study.description {
            out.push_str(&format!("\nDescription: {desc}"));
        }
        out.push_str(&format!(
            "\nCreated: {}",
            study.created_at.format("%Y-%m-%d %H:%M")
        ));
        if a.details {
            out.push_str("\nArtifacts:");
            for line in self.artifact_status(&study) {
                out.push_str(&format!("\n  {line}"));
            }
        }
        Ok(out)
    }

    fn study_delete(&self, a: &StudyDeleteArgs) -> ExecResult {
        let study = Study::delete(&self.root, &a.name)?;
        Ok(format!("Study deleted successfully: {}", study.id))
    }
}
