use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use std::path::{Path, PathBuf};
use uxkit_core::{config::Config, paths, research, research::ResearchArtifact};

#[derive(Subcommand)]
pub enum ResearchSubcommand {
    /// Generate open-ended research questions
    Questions {
        #[arg(long, short = 's')]
        study: String,
        #[arg(long)]
        topic: String,
        /// Number of questions (default: research.question_count)
        #[arg(long)]
        count: Option<usize>,
    },
    /// Collect sources into sources.md
    Sources {
        #[arg(long, short = 's')]
        study: String,
        /// A URL, file path or note; repeatable
        #[arg(long = "source")]
        sources: Vec<String>,
        /// Also pick up files dropped into the study's sources/ directory
        #[arg(long)]
        auto_discover: bool,
    },
    /// Summarize one collected source
    Summarize {
        #[arg(long, short = 's')]
        study: String,
        /// Source id from sources.md, e.g. S1
        #[arg(long)]
        source_id: String,
    },
    /// Process an interview transcript
    Interview {
        #[arg(long, short = 's')]
        study: String,
        /// Transcript file; relative paths resolve against the project root
        #[arg(long)]
        transcript: PathBuf,
        #[arg(long)]
        participant: String,
    },
    /// Synthesize every artifact of a study into synthesis.md
    Synthesize {
        #[arg(long, short = 's')]
        study: String,
        /// Insight area to concentrate on
        #[arg(long)]
        focus: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: ResearchSubcommand, json: bool) -> anyhow::Result<()> {
    let artifact = match subcmd {
        ResearchSubcommand::Questions {
            study,
            topic,
            count,
        } => {
            let count = match count {
                Some(n) => n,
                None => {
                    let config = Config::load(root).context("failed to load config")?;
                    config.research.question_count as usize
                }
            };
            research::generate_questions(root, &study, &topic, count)
                .with_context(|| format!("failed to generate questions for '{study}'"))?
        }
        ResearchSubcommand::Sources {
            study,
            sources,
            auto_discover,
        } => research::collect_sources(root, &study, &sources, auto_discover)
            .with_context(|| format!("failed to collect sources for '{study}'"))?,
        ResearchSubcommand::Summarize { study, source_id } => {
            research::summarize_source(root, &study, &source_id)
                .with_context(|| format!("failed to summarize {source_id} in '{study}'"))?
        }
        ResearchSubcommand::Interview {
            study,
            transcript,
            participant,
        } => research::process_interview(root, &study, &transcript, &participant)
            .with_context(|| format!("failed to process interview for '{study}'"))?,
        ResearchSubcommand::Synthesize { study, focus } => {
            research::synthesize_insights(root, &study, focus.as_deref())
                .with_context(|| format!("failed to synthesize '{study}'"))?
        }
    };
    report(root, &artifact, json)
}

fn report(root: &Path, artifact: &ResearchArtifact, json: bool) -> anyhow::Result<()> {
    let rel = paths::display_relative(root, &artifact.file_path);
    if json {
        print_json(&serde_json::json!({
            "success": true,
            "message": artifact.message,
            "data": { "file_path": rel },
        }))
    } else {
        println!("{}", artifact.message);
        println!("  wrote: {rel}");
        Ok(())
    }
}
