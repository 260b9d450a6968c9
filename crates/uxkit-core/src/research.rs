//! Research artifact generation for a study: questions, sources, source
//! summaries, interview notes and the final synthesis.

use crate::error::{Result, UxkitError};
use crate::study::Study;
use crate::templates::{self, TemplateKind};
use crate::{io, paths};
use chrono::Utc;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Lines of a local source file copied into its summary.
const EXCERPT_LINES: usize = 20;

/// Outcome of a research operation: the file written and a one-line message.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchArtifact {
    pub file_path: PathBuf,
    pub message: String,
}

/// One entry of a study's `sources.md`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntry {
    pub id: String,
    pub location: String,
}

const QUESTION_BANK: &[&str] = &[
    "Walk me through the last time you dealt with {topic}.",
    "What were you trying to accomplish when {topic} came up?",
    "What is the most frustrating part of {topic} today?",
    "How do you currently work around problems with {topic}?",
    "What tools or people do you rely on for {topic}?",
    "What would make {topic} noticeably easier for you?",
    "Tell me about a time {topic} went better than expected.",
    "How often does {topic} come up in a typical week?",
    "What happens when {topic} goes wrong?",
    "Who else is affected by how {topic} works?",
    "What have you tried before to improve {topic}?",
    "If you could change one thing about {topic}, what would it be?",
];

fn base_vars(study: &Study) -> BTreeMap<&'static str, String> {
    let mut vars = BTreeMap::new();
    vars.insert("study_name", study.name.clone());
    vars.insert("study_id", study.id.clone());
    vars.insert("date", Utc::now().format("%Y-%m-%d").to_string());
    vars
}

fn write_artifact(root: &Path, study: &mut Study, path: &Path, body: &str) -> Result<()> {
    io::atomic_write(path, body.as_bytes())?;
    study.touch(root)?;
    tracing::info!(study = %study.id, path = %path.display(), "wrote research artifact");
    Ok(())
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// Write `questions.md` with up to `count` open-ended questions about `topic`.
pub fn generate_questions(
    root: &Path,
    study_key: &str,
    topic: &str,
    count: usize,
) -> Result<ResearchArtifact> {
    let mut study = Study::load(root, study_key)?;
    let topic = topic.trim();

    let questions: Vec<String> = QUESTION_BANK
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q.replace("{topic}", topic)))
        .collect();

    let mut vars = base_vars(&study);
    vars.insert("topic", topic.to_string());
    vars.insert("questions", questions.join("\n"));
    let body = templates::render(root, TemplateKind::Questions, &vars)?;

    let path = paths::questions_path(root, &study.id);
    write_artifact(root, &mut study, &path, &body)?;

    Ok(ResearchArtifact {
        message: format!(
            "Generated {} research questions for '{}'",
            questions.len(),
            study.name
        ),
        file_path: path,
    })
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

static SOURCE_LINE_RE: OnceLock<Regex> = OnceLock::new();

fn source_line_re() -> &'static Regex {
    SOURCE_LINE_RE.get_or_init(|| Regex::new(r"^- \*\*(S\d+)\*\*: (.+)$").unwrap())
}

/// Parse the entries of an existing `sources.md`.
pub fn read_sources(root: &Path, study_id: &str) -> Result<Vec<SourceEntry>> {
    let Some(text) = io::read_optional(&paths::sources_path(root, study_id))? else {
        return Ok(Vec::new());
    };
    Ok(text
        .lines()
        .filter_map(|line| source_line_re().captures(line))
        .map(|caps| SourceEntry {
            id: caps[1].to_string(),
            location: caps[2].trim().to_string(),
        })
        .collect())
}

fn discover_sources(root: &Path, study_id: &str) -> Result<Vec<String>> {
    let dir = paths::raw_sources_dir(root, study_id);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            found.push(format!(
                "{}/{}",
                paths::RAW_SOURCES_DIR,
                entry.file_name().to_string_lossy()
            ));
        }
    }
    found.sort();
    Ok(found)
}

/// Merge `sources` (and, with `auto_discover`, files under the study's
/// `sources/` directory) into `sources.md`. Existing ids are kept stable.
pub fn collect_sources(
    root: &Path,
    study_key: &str,
    sources: &[String],
    auto_discover: bool,
) -> Result<ResearchArtifact> {
    let mut study = Study::load(root, study_key)?;

    let mut entries = read_sources(root, &study.id)?;
    let mut candidates: Vec<String> = sources
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if auto_discover {
        candidates.extend(discover_sources(root, &study.id)?);
    }

    let mut next_seq = entries
        .iter()
        .filter_map(|e| e.id[1..].parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    let mut added = 0;
    for location in candidates {
        if entries.iter().any(|e| e.location == location) {
            continue;
        }
        next_seq += 1;
        entries.push(SourceEntry {
            id: format!("S{next_seq}"),
            location,
        });
        added += 1;
    }

    if entries.is_empty() {
        return Err(UxkitError::NoSources(study.id));
    }

    let listing: Vec<String> = entries
        .iter()
        .map(|e| format!("- **{}**: {}", e.id, e.location))
        .collect();
    let mut vars = base_vars(&study);
    vars.insert("count", entries.len().to_string());
    vars.insert("sources", listing.join("\n"));
    let body = templates::render(root, TemplateKind::Sources, &vars)?;

    let path = paths::sources_path(root, &study.id);
    write_artifact(root, &mut study, &path, &body)?;

    Ok(ResearchArtifact {
        message: format!(
            "Collected {added} new source(s); {} total for '{}'",
            entries.len(),
            study.name
        ),
        file_path: path,
    })
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

fn excerpt_for(root: &Path, study: &Study, location: &str) -> Result<String> {
    let candidates = [study.base_path(root).join(location), root.join(location)];
    for candidate in candidates {
        if candidate.is_file() {
            let text = std::fs::read_to_string(&candidate)?;
            let lines: Vec<String> = text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .take(EXCERPT_LINES)
                .map(|l| format!("> {l}"))
                .collect();
            if lines.is_empty() {
                return Ok("_Source file is empty._".to_string());
            }
            return Ok(lines.join("\n"));
        }
    }
    Ok("_External source: add key points manually._".to_string())
}

pub fn summarize_source(root: &Path, study_key: &str, source_id: &str) -> Result<ResearchArtifact> {
    let mut study = Study::load(root, study_key)?;
    let wanted = source_id.trim().to_ascii_uppercase();
    let entry = read_sources(root, &study.id)?
        .into_iter()
        .find(|e| e.id == wanted)
        .ok_or_else(|| UxkitError::SourceNotFound {
            study: study.id.clone(),
            source_id: source_id.to_string(),
        })?;

    let mut vars = base_vars(&study);
    vars.insert("source_id", entry.id.clone());
    vars.insert("source", entry.location.clone());
    vars.insert("excerpt", excerpt_for(root, &study, &entry.location)?);
    let body = templates::render(root, TemplateKind::Summary, &vars)?;

    let path = paths::summary_path(root, &study.id, &entry.id);
    write_artifact(root, &mut study, &path, &body)?;

    Ok(ResearchArtifact {
        message: format!("Summarized source {} ({})", entry.id, entry.location),
        file_path: path,
    })
}

// ---------------------------------------------------------------------------
// Interviews
// ---------------------------------------------------------------------------

pub fn process_interview(
    root: &Path,
    study_key: &str,
    transcript: &Path,
    participant: &str,
) -> Result<ResearchArtifact> {
    let mut study = Study::load(root, study_key)?;

    let participant_id = paths::slugify(participant);
    if participant_id.is_empty() {
        return Err(UxkitError::InvalidName(format!(
            "participant id '{participant}' has no usable characters"
        )));
    }

    let transcript_path = if transcript.is_absolute() {
        transcript.to_path_buf()
    } else {
        root.join(transcript)
    };
    if !transcript_path.is_file() {
        return Err(UxkitError::TranscriptNotFound(
            transcript.display().to_string(),
        ));
    }
    let text = std::fs::read_to_string(&transcript_path)?;
    let word_count = text.split_whitespace().count();

    let mut vars = base_vars(&study);
    vars.insert("participant", participant_id.clone());
    vars.insert("transcript_path", transcript.display().to_string());
    vars.insert("word_count", word_count.to_string());
    vars.insert("transcript", text.trim_end().to_string());
    let body = templates::render(root, TemplateKind::Interview, &vars)?;

    let path = paths::interview_path(root, &study.id, &participant_id);
    write_artifact(root, &mut study, &path, &body)?;

    Ok(ResearchArtifact {
        message: format!("Processed interview with {participant_id} ({word_count} words)"),
        file_path: path,
    })
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

fn markdown_files(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_file() && name.ends_with(".md") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Write `synthesis.md` indexing every artifact the study has so far.
/// `focus` names the insight area the synthesis should concentrate on.
pub fn synthesize_insights(
    root: &Path,
    study_key: &str,
    focus: Option<&str>,
) -> Result<ResearchArtifact> {
    let mut study = Study::load(root, study_key)?;
    let base = study.base_path(root);

    let mut inputs = Vec::new();
    if paths::questions_path(root, &study.id).exists() {
        inputs.push(format!("- [Research questions]({})", paths::QUESTIONS_MD));
    }
    for name in markdown_files(&base.join(paths::SUMMARIES_DIR))? {
        inputs.push(format!("- [Summary {}]({}/{name})", name.trim_end_matches(".md"), paths::SUMMARIES_DIR));
    }
    for name in markdown_files(&base.join(paths::INTERVIEWS_DIR))? {
        inputs.push(format!("- [Interview {}]({}/{name})", name.trim_end_matches(".md"), paths::INTERVIEWS_DIR));
    }
    if inputs.is_empty() {
        return Err(UxkitError::NothingToSynthesize(study.id));
    }

    let mut vars = base_vars(&study);
    vars.insert("inputs", inputs.join("\n"));
    vars.insert(
        "focus",
        focus
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or("all findings")
            .to_string(),
    );
    let body = templates::render(root, TemplateKind::Synthesis, &vars)?;

    let path = paths::synthesis_path(root, &study.id);
    write_artifact(root, &mut study, &path, &body)?;

    Ok(ResearchArtifact {
        message: format!("Synthesized {} input(s) for '{}'", inputs.len(), study.name),
        file_path: path,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project_with_study() -> (TempDir, Study) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(paths::STUDIES_DIR)).unwrap();
        let study = Study::create(dir.path(), "Checkout", None).unwrap();
        (dir, study)
    }

    #[test]
    fn questions_respect_count_and_topic() {
        let (dir, study) = project_with_study();
        let art = generate_questions(dir.path(), &study.id, "guest checkout", 3).unwrap();
        let text = std::fs::read_to_string(&art.file_path).unwrap();
        assert!(text.contains("# Research Questions: guest checkout"));
        assert!(text.contains("3. What is the most frustrating part of guest checkout today?"));
        assert!(!text.contains("4. "));
        assert!(art.message.contains("Generated 3"));
    }

    #[test]
    fn questions_cap_at_bank_size() {
        let (dir, _study) = project_with_study();
        let art = generate_questions(dir.path(), "checkout", "x", 100).unwrap();
        assert!(art.message.contains(&format!("Generated {}", QUESTION_BANK.len())));
    }

    #[test]
    fn sources_merge_and_keep_ids() {
        let (dir, study) = project_with_study();
        collect_sources(dir.path(), &study.id, &["https://a.example".into()], false).unwrap();

        let raw = paths::raw_sources_dir(dir.path(), &study.id);
        std::fs::create_dir_all(&raw).unwrap();
        std::fs::write(raw.join("notes.txt"), "hello").unwrap();

        let art = collect_sources(
            dir.path(),
            &study.id,
            &["https://a.example".into(), "https://b.example".into()],
            true,
        )
        .unwrap();
        assert!(art.message.contains("Collected 2 new source(s); 3 total"));

        let entries = read_sources(dir.path(), &study.id).unwrap();
        assert_eq!(
            entries,
            vec![
                SourceEntry { id: "S1".into(), location: "https://a.example".into() },
                SourceEntry { id: "S2".into(), location: "https://b.example".into() },
                SourceEntry { id: "S3".into(), location: "sources/notes.txt".into() },
            ]
        );
    }

    #[test]
    fn sources_empty_is_error() {
        let (dir, study) = project_with_study();
        assert!(matches!(
            collect_sources(dir.path(), &study.id, &[], true),
            Err(UxkitError::NoSources(_))
        ));
    }

    #[test]
    fn summary_quotes_local_file() {
        let (dir, study) = project_with_study();
        let raw = paths::raw_sources_dir(dir.path(), &study.id);
        std::fs::create_dir_all(&raw).unwrap();
        std::fs::write(raw.join("survey.md"), "Users abandon at shipping.\n\nToo many fields.").unwrap();
        collect_sources(dir.path(), &study.id, &[], true).unwrap();

        let art = summarize_source(dir.path(), &study.id, "s1").unwrap();
        let text = std::fs::read_to_string(&art.file_path).unwrap();
        assert!(text.contains("> Users abandon at shipping."));
        assert!(text.contains("> Too many fields."));
        assert!(art.file_path.ends_with("summaries/S1.md"));
    }

    #[test]
    fn summary_unknown_source() {
        let (dir, study) = project_with_study();
        assert!(matches!(
            summarize_source(dir.path(), &study.id, "S9"),
            Err(UxkitError::SourceNotFound { .. })
        ));
    }

    #[test]
    fn interview_embeds_transcript() {
        let (dir, study) = project_with_study();
        std::fs::write(dir.path().join("p1.txt"), "I never find the coupon field.\n").unwrap();
        let art = process_interview(dir.path(), &study.id, Path::new("p1.txt"), "P1").unwrap();
        let text = std::fs::read_to_string(&art.file_path).unwrap();
        assert!(text.contains("# Interview: p1"));
        assert!(text.contains("(6 words)"));
        assert!(text.contains("I never find the coupon field."));
    }

    #[test]
    fn interview_missing_transcript() {
        let (dir, study) = project_with_study();
        assert!(matches!(
            process_interview(dir.path(), &study.id, Path::new("nope.txt"), "p2"),
            Err(UxkitError::TranscriptNotFound(_))
        ));
    }

    #[test]
    fn synthesis_requires_inputs_then_indexes_them() {
        let (dir, study) = project_with_study();
        assert!(matches!(
            synthesize_insights(dir.path(), &study.id, None),
            Err(UxkitError::NothingToSynthesize(_))
        ));

        generate_questions(dir.path(), &study.id, "checkout", 2).unwrap();
        std::fs::write(dir.path().join("t.txt"), "words here").unwrap();
        process_interview(dir.path(), &study.id, Path::new("t.txt"), "ana").unwrap();

        let art = synthesize_insights(dir.path(), &study.id, None).unwrap();
        let text = std::fs::read_to_string(&art.file_path).unwrap();
        assert!(text.contains("- [Research questions](questions.md)"));
        assert!(text.contains("- [Interview ana](interviews/ana.md)"));
        assert!(text.contains("**Focus:** all findings"));
        assert!(art.message.contains("2 input(s)"));
    }
}
