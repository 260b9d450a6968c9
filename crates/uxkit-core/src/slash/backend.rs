//! Typed invocations and the pluggable command bodies behind them.
//!
//! A validated [`ParsedCommand`] becomes an [`Invocation`] with every
//! optional parameter resolved to its default. [`execute`] routes the
//! invocation to a [`CommandBackend`]; [`PreviewBackend`] describes what would
//! happen without touching disk.

use super::parser::{ParamValue, ParsedCommand};
use crate::error::UxkitError;
use thiserror::Error;

pub const DEFAULT_FORMAT: &str = "markdown";
pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const DEFAULT_SOURCE_LIMIT: u32 = 10;
pub const DEFAULT_LENGTH: &str = "medium";
pub const DEFAULT_TEMPLATE: &str = "standard";
pub const DEFAULT_OUTPUT: &str = "report";

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Deletion requires confirmation. Use --confirm flag.")]
    ConfirmationRequired,

    #[error("{0}")]
    Workspace(#[from] UxkitError),

    #[error("{0}")]
    Failed(String),
}

pub type ExecResult = std::result::Result<String, ExecutionError>;

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionsArgs {
    pub study: String,
    pub topic: String,
    pub count: u32,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourcesArgs {
    pub study: String,
    pub keywords: String,
    pub format: String,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummarizeArgs {
    pub study: String,
    pub format: String,
    pub length: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterviewArgs {
    pub study: String,
    pub participant: String,
    pub format: String,
    pub template: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizeArgs {
    pub study: String,
    pub insights: String,
    pub format: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudyCreateArgs {
    pub name: String,
    pub description: String,
    pub template: String,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudyListArgs {
    pub format: String,
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudyShowArgs {
    pub name: String,
    pub format: String,
    pub details: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudyDeleteArgs {
    pub name: String,
    pub confirm: bool,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Questions(QuestionsArgs),
    Sources(SourcesArgs),
    Summarize(SummarizeArgs),
    Interview(InterviewArgs),
    Synthesize(SynthesizeArgs),
    StudyCreate(StudyCreateArgs),
    StudyList(StudyListArgs),
    StudyShow(StudyShowArgs),
    StudyDelete(StudyDeleteArgs),
}

struct Params<'a>(&'a ParsedCommand);

impl Params<'_> {
    /// Validation guarantees string-typed keys hold strings.
    fn text(&self, key: &str, default: &str) -> String {
        match self.0.get(key) {
            Some(ParamValue::String(s)) => s.clone(),
            _ => default.to_string(),
        }
    }

    fn optional_text(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|v| v.to_string())
    }

    /// Numbers are truncated toward zero; negatives clamp to 0.
    fn count(&self, key: &str, default: u32) -> u32 {
        self.0
            .get(key)
            .and_then(ParamValue::as_f64)
            .map(|n| n.max(0.0).min(u32::MAX as f64) as u32)
            .unwrap_or(default)
    }

    fn flag(&self, key: &str) -> bool {
        self.0.get(key).and_then(ParamValue::as_bool).unwrap_or(false)
    }
}

impl Invocation {
    /// Resolve a parsed command into its typed form. `None` for commands
    /// outside the table.
    pub fn from_parsed(parsed: &ParsedCommand) -> Option<Self> {
        let p = Params(parsed);
        let inv = match parsed.command.as_str() {
            "research:questions" => Invocation::Questions(QuestionsArgs {
                study: p.text("study", ""),
                topic: p.text("topic", ""),
                count: p.count("count", DEFAULT_QUESTION_COUNT),
                format: p.text("format", DEFAULT_FORMAT),
            }),
            "research:sources" => Invocation::Sources(SourcesArgs {
                study: p.text("study", ""),
                keywords: p.text("keywords", ""),
                format: p.text("format", DEFAULT_FORMAT),
                limit: p.count("limit", DEFAULT_SOURCE_LIMIT),
            }),
            "research:summarize" => Invocation::Summarize(SummarizeArgs {
                study: p.text("study", ""),
                format: p.text("format", DEFAULT_FORMAT),
                length: p.text("length", DEFAULT_LENGTH),
            }),
            "research:interview" => Invocation::Interview(InterviewArgs {
                study: p.text("study", ""),
                participant: p.text("participant", ""),
                format: p.text("format", DEFAULT_FORMAT),
                template: p.text("template", DEFAULT_TEMPLATE),
            }),
            "research:synthesize" => Invocation::Synthesize(SynthesizeArgs {
                study: p.text("study", ""),
                insights: p.text("insights", ""),
                format: p.text("format", DEFAULT_FORMAT),
                output: p.text("output", DEFAULT_OUTPUT),
            }),
            "study:create" => Invocation::StudyCreate(StudyCreateArgs {
                name: p.text("name", ""),
                description: p.text("description", ""),
                template: p.text("template", DEFAULT_TEMPLATE),
                format: p.text("format", DEFAULT_FORMAT),
            }),
            "study:list" => Invocation::StudyList(StudyListArgs {
                format: p.text("format", DEFAULT_FORMAT),
                filter: p.optional_text("filter"),
            }),
            "study:show" => Invocation::StudyShow(StudyShowArgs {
                name: p.text("name", ""),
                format: p.text("format", DEFAULT_FORMAT),
                details: p.flag("details"),
            }),
            "study:delete" => Invocation::StudyDelete(StudyDeleteArgs {
                name: p.text("name", ""),
                confirm: p.flag("confirm"),
                force: p.flag("force"),
            }),
            _ => return None,
        };
        Some(inv)
    }

    pub fn command_name(&self) -> &'static str {
        match self {
            Invocation::Questions(_) => "research:questions",
            Invocation::Sources(_) => "research:sources",
            Invocation::Summarize(_) => "research:summarize",
            Invocation::Interview(_) => "research:interview",
            Invocation::Synthesize(_) => "research:synthesize",
            Invocation::StudyCreate(_) => "study:create",
            Invocation::StudyList(_) => "study:list",
            Invocation::StudyShow(_) => "study:show",
            Invocation::StudyDelete(_) => "study:delete",
        }
    }
}

// ---------------------------------------------------------------------------
// CommandBackend
// ---------------------------------------------------------------------------

/// The bodies of the slash commands, one method per command.
pub trait CommandBackend {
    fn research_questions(&self, args: &QuestionsArgs) -> ExecResult;
    fn research_sources(&self, args: &SourcesArgs) -> ExecResult;
    fn research_summarize(&self, args: &SummarizeArgs) -> ExecResult;
    fn research_interview(&self, args: &InterviewArgs) -> ExecResult;
    fn research_synthesize(&self, args: &SynthesizeArgs) -> ExecResult;
    fn study_create(&self, args: &StudyCreateArgs) -> ExecResult;
    fn study_list(&self, args: &StudyListArgs) -> ExecResult;
    fn study_show(&self, args: &StudyShowArgs) -> ExecResult;
    /// Only called once `args.confirm` is set.
    fn study_delete(&self, args: &StudyDeleteArgs) -> ExecResult;
}

/// Route an invocation to `backend`. Unconfirmed deletes fail here so no
/// backend can skip the check.
pub fn execute(backend: &dyn CommandBackend, invocation: &Invocation) -> ExecResult {
    tracing::debug!(command = invocation.command_name(), "executing slash command");
    match invocation {
        Invocation::Questions(a) => backend.research_questions(a),
        Invocation::Sources(a) => backend.research_sources(a),
        Invocation::Summarize(a) => backend.research_summarize(a),
        Invocation::Interview(a) => backend.research_interview(a),
        Invocation::Synthesize(a) => backend.research_synthesize(a),
        Invocation::StudyCreate(a) => backend.study_create(a),
        Invocation::StudyList(a) => backend.study_list(a),
        Invocation::StudyShow(a) => backend.study_show(a),
        Invocation::StudyDelete(a) => {
            if !a.confirm {
                return Err(ExecutionError::ConfirmationRequired);
            }
            backend.study_delete(a)
        }
    }
}

// ---------------------------------------------------------------------------
// PreviewBackend
// ---------------------------------------------------------------------------

/// Describes what each command would do. No file I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewBackend;

impl CommandBackend for PreviewBackend {
    fn research_questions(&self, a: &QuestionsArgs) -> ExecResult {
        Ok(format!(
            "Research questions generated successfully\nStudy: {}\nTopic: {}\nQuestions: {}\nFormat: {}",
            a.study, a.topic, a.count, a.format
        ))
    }

    fn research_sources(&self, a: &SourcesArgs) -> ExecResult {
        Ok(format!(
            "Research sources collected successfully\nStudy: {}\nKeywords: {}\nLimit: {}\nFormat: {}",
            a.study, a.keywords, a.limit, a.format
        ))
    }

    fn research_summarize(&self, a: &SummarizeArgs) -> ExecResult {
        Ok(format!(
            "Research summary generated successfully\nStudy: {}\nLength: {}\nFormat: {}",
            a.study, a.length, a.format
        ))
    }

    fn research_interview(&self, a: &InterviewArgs) -> ExecResult {
        Ok(format!(
            "Interview processed successfully\nStudy: {}\nParticipant: {}\nTemplate: {}\nFormat: {}",
            a.study, a.participant, a.template, a.format
        ))
    }

    fn research_synthesize(&self, a: &SynthesizeArgs) -> ExecResult {
        Ok(format!(
            "Research insights synthesized successfully\nStudy: {}\nInsights: {}\nOutput: {}\nFormat: {}",
            a.study, a.insights, a.output, a.format
        ))
    }

    fn study_create(&self, a: &StudyCreateArgs) -> ExecResult {
        Ok(format!(
            "Study created successfully\nName: {}\nDescription: {}\nTemplate: {}\nFormat: {}",
            a.name, a.description, a.template, a.format
        ))
    }

    fn study_list(&self, a: &StudyListArgs) -> ExecResult {
        Ok(format!(
            "Studies listed successfully\nFilter: {}\nFormat: {}",
            a.filter.as_deref().unwrap_or("none"),
            a.format
        ))
    }

    fn study_show(&self, a: &StudyShowArgs) -> ExecResult {
        Ok(format!(
            "Study details retrieved successfully\nName: {}\nDetails: {}\nFormat: {}",
            a.name, a.details, a.format
        ))
    }

    fn study_delete(&self, a: &StudyDeleteArgs) -> ExecResult {
        Ok(format!(
            "Study deleted successfully\nName: {}\nForce: {}",
            a.name, a.force
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slash::parser::CommandParser;

    fn invocation(s: &str) -> Invocation {
        Invocation::from_parsed(&CommandParser::new().parse(s).unwrap()).unwrap()
    }

    #[test]
    fn defaults_are_applied() {
        assert_eq!(
            invocation("/research:questions --study=s --topic=t"),
            Invocation::Questions(QuestionsArgs {
                study: "s".into(),
                topic: "t".into(),
                count: 5,
                format: "markdown".into(),
            })
        );
        assert_eq!(
            invocation("/research:synthesize --study=s --insights=i"),
            Invocation::Synthesize(SynthesizeArgs {
                study: "s".into(),
                insights: "i".into(),
                format: "markdown".into(),
                output: "report".into(),
            })
        );
        assert_eq!(
            invocation("/study:delete --name=s"),
            Invocation::StudyDelete(StudyDeleteArgs {
                name: "s".into(),
                confirm: false,
                force: false,
            })
        );
    }

    #[test]
    fn numbers_truncate_and_clamp() {
        let Invocation::Sources(a) = invocation("/research:sources --study=s --keywords=k --limit=3.9") else {
            panic!("expected sources");
        };
        assert_eq!(a.limit, 3);
        let Invocation::Questions(q) = invocation("/research:questions --study=s --topic=t --count=-2") else {
            panic!("expected questions");
        };
        assert_eq!(q.count, 0);
    }

    #[test]
    fn unknown_command_has_no_invocation() {
        let parsed = CommandParser::new().parse("/study:archive").unwrap();
        assert!(Invocation::from_parsed(&parsed).is_none());
    }

    #[test]
    fn unconfirmed_delete_fails_before_backend() {
        let err = execute(&PreviewBackend, &invocation("/study:delete --name=s")).unwrap_err();
        assert!(matches!(err, ExecutionError::ConfirmationRequired));
        assert_eq!(
            err.to_string(),
            "Deletion requires confirmation. Use --confirm flag."
        );

        let ok = execute(&PreviewBackend, &invocation("/study:delete --name=s --confirm")).unwrap();
        assert!(ok.starts_with("Study deleted successfully"));
    }

    #[test]
    fn preview_list_mentions_filter() {
        let text = execute(&PreviewBackend, &invocation("/study:list --filter=checkout")).unwrap();
        assert!(text.contains("Studies listed successfully"));
        assert!(text.contains("Filter: checkout"));
    }
}
